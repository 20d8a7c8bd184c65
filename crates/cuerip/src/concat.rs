// Concat: Merges the extracted segments into a single media file via ffmpeg.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::CueRipError;

/// Runs ffmpeg over the generated playlist, stream-copying every segment
/// into `target`. ffmpeg follows the local playlist itself, so decryption
/// keys and init segments are picked up the same way a player would.
pub async fn concat_segments(manifest: &Path, target: &Path) -> Result<(), CueRipError> {
    debug!(
        "Running ffmpeg concat: {} -> {}",
        manifest.display(),
        target.display()
    );

    let output = Command::new("ffmpeg")
        .args(["-nostdin", "-loglevel", "error", "-y"])
        .args(["-allowed_extensions", "ALL"])
        .arg("-i")
        .arg(manifest)
        .args(["-c", "copy"])
        .arg(target)
        .output()
        .await
        .map_err(|e| CueRipError::ConcatFailed(format!("Failed to run ffmpeg: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CueRipError::ConcatFailed(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    info!("Concatenated segments into {}", target.display());
    Ok(())
}
