// Playlist Assembler: Builds the local VOD playlist from rewritten segments.

use std::path::{Path, PathBuf};

use m3u8_rs::{MediaPlaylist, MediaPlaylistType};
use tracing::debug;

use crate::error::CueRipError;
use crate::rewrite::RewrittenSegment;

/// Filename of the generated playlist inside the output directory.
pub const MANIFEST_NAME: &str = "index.m3u8";

/// Builds a finished VOD playlist from the rewritten segments.
///
/// The target duration is the longest retained segment duration rounded up
/// to a whole second. The playlist is always terminated, so players treat
/// it as complete even when nothing was retained.
pub fn assemble(segments: Vec<RewrittenSegment>, max_duration: f32) -> MediaPlaylist {
    MediaPlaylist {
        version: Some(3),
        target_duration: max_duration.ceil() as u64,
        playlist_type: Some(MediaPlaylistType::Vod),
        end_list: true,
        segments: segments
            .into_iter()
            .map(RewrittenSegment::into_media_segment)
            .collect(),
        ..Default::default()
    }
}

/// Serializes the playlist into the output directory and returns its path.
pub async fn write_manifest(
    playlist: &MediaPlaylist,
    outdir: &Path,
) -> Result<PathBuf, CueRipError> {
    let mut buf = Vec::new();
    playlist.write_to(&mut buf)?;
    let path = outdir.join(MANIFEST_NAME);
    tokio::fs::write(&path, &buf).await?;
    debug!(
        "Wrote playlist with {} segments to {}",
        playlist.segments.len(),
        path.display()
    );
    Ok(path)
}
