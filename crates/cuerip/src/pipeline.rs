// Extraction Pipeline: Drives a full run from playlist URL to local VOD output.

use m3u8_rs::{MediaPlaylist, Playlist};
use tracing::{debug, info};
use url::Url;

use std::path::PathBuf;

use crate::client::create_client;
use crate::concat;
use crate::config::CueRipConfig;
use crate::cue;
use crate::error::CueRipError;
use crate::fetch::{ByteFetcher, HttpFetcher};
use crate::keys::KeyStore;
use crate::output;
use crate::resolve;
use crate::rewrite::SegmentRewriter;

/// What a completed run produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// The playlist carried no cue metadata at all; nothing was extracted
    NoCueSegments,
    /// Segments were extracted and a local playlist written
    Saved(RunSummary),
}

/// Counters and paths from a successful extraction.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Path of the rewritten playlist
    pub manifest_path: PathBuf,
    /// Segments downloaded into the output directory
    pub segments_saved: usize,
    /// Segments dropped by the inclusion policy
    pub segments_skipped: usize,
    /// Distinct decryption keys localized
    pub keys_saved: usize,
    /// Concatenated media file, when requested
    pub concat_target: Option<PathBuf>,
}

/// One-shot cue extractor.
///
/// Downloads an HLS playlist, keeps the segments selected by the inclusion
/// policy, localizes their keys and init segments, and writes a
/// self-contained VOD playlist next to them.
pub struct CueRip {
    config: CueRipConfig,
    fetcher: Box<dyn ByteFetcher>,
}

impl CueRip {
    /// Creates an extractor backed by a real HTTP client.
    pub fn new(config: CueRipConfig) -> Result<Self, CueRipError> {
        let client = create_client(&config.fetch)?;
        Ok(Self {
            config,
            fetcher: Box::new(HttpFetcher::new(client)),
        })
    }

    /// Creates an extractor with a caller-supplied fetcher.
    pub fn with_fetcher(config: CueRipConfig, fetcher: Box<dyn ByteFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Runs a full extraction against `playlist_url`.
    ///
    /// Master playlists are followed to their highest-bandwidth variant;
    /// a media playlist with no segments at all is rejected. The first
    /// failed transfer aborts the run; files already written stay in the
    /// output directory.
    pub async fn run(&self, playlist_url: &str) -> Result<RunOutcome, CueRipError> {
        let url = Url::parse(playlist_url)
            .map_err(|e| CueRipError::InvalidInputUrl(format!("{playlist_url}: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CueRipError::InvalidInputUrl(format!(
                "Unsupported URL scheme: {}",
                url.scheme()
            )));
        }

        let outdir = self.config.output_dir.clone();
        tokio::fs::create_dir_all(&outdir)
            .await
            .map_err(|e| CueRipError::OutdirCreation {
                path: outdir.clone(),
                source: e,
            })?;

        let (playlist, media_url) = self.load_media_playlist(&url).await?;
        if playlist.segments.is_empty() {
            return Err(CueRipError::PlaylistError(format!(
                "Playlist {media_url} contains no segments"
            )));
        }
        let base_url = media_url.join(".").map_err(|e| {
            CueRipError::PlaylistError(format!("Failed to determine base URL: {e}"))
        })?;
        debug!("Resolving segment URIs against {}", base_url);

        let cue_tagged = playlist
            .segments
            .iter()
            .filter(|s| cue::has_cue_metadata(s))
            .count();
        if cue_tagged == 0 {
            info!("No cue markers found in {}", media_url);
            return Ok(RunOutcome::NoCueSegments);
        }
        info!(
            "Found {} cue-tagged segments among {}",
            cue_tagged,
            playlist.segments.len()
        );

        let mut keys = KeyStore::new();
        let mut rewriter = SegmentRewriter::new(
            self.fetcher.as_ref(),
            &base_url,
            &outdir,
            self.config.include_cue_out,
        );
        let outcome = rewriter.process_all(&playlist.segments, &mut keys).await?;

        let segments_saved = outcome.retained;
        let segments_skipped = outcome.skipped;
        let local_playlist = output::assemble(outcome.segments, outcome.max_duration);
        let manifest_path = output::write_manifest(&local_playlist, &outdir).await?;

        if let Some(target) = &self.config.concat_target {
            concat::concat_segments(&manifest_path, target).await?;
        }

        info!(
            "Saved {} segments ({} skipped, {} keys) under {}",
            segments_saved,
            segments_skipped,
            keys.len(),
            outdir.display()
        );
        Ok(RunOutcome::Saved(RunSummary {
            manifest_path,
            segments_saved,
            segments_skipped,
            keys_saved: keys.len(),
            concat_target: self.config.concat_target.clone(),
        }))
    }

    /// Fetches and parses a playlist, following a master playlist to its
    /// highest-bandwidth variant.
    async fn load_media_playlist(&self, url: &Url) -> Result<(MediaPlaylist, Url), CueRipError> {
        let bytes = self.fetcher.fetch_bytes(url, None).await?;
        match m3u8_rs::parse_playlist_res(&bytes) {
            Ok(Playlist::MediaPlaylist(playlist)) => Ok((playlist, url.clone())),
            Ok(Playlist::MasterPlaylist(master)) => {
                let variant = master
                    .variants
                    .iter()
                    .max_by_key(|v| v.bandwidth)
                    .ok_or_else(|| {
                        CueRipError::PlaylistError("Master playlist has no variants".to_string())
                    })?;
                let variant_url = resolve::resolve(&variant.uri, url)?;
                info!(
                    "Following master playlist to variant {} ({} bps)",
                    variant_url, variant.bandwidth
                );

                let bytes = self.fetcher.fetch_bytes(&variant_url, None).await?;
                match m3u8_rs::parse_playlist_res(&bytes) {
                    Ok(Playlist::MediaPlaylist(playlist)) => Ok((playlist, variant_url)),
                    Ok(Playlist::MasterPlaylist(_)) => Err(CueRipError::PlaylistError(format!(
                        "Variant playlist {variant_url} is itself a master playlist"
                    ))),
                    Err(e) => Err(CueRipError::PlaylistError(format!(
                        "Failed to parse playlist from {variant_url}: {e}"
                    ))),
                }
            }
            Err(e) => Err(CueRipError::PlaylistError(format!(
                "Failed to parse playlist from {url}: {e}"
            ))),
        }
    }
}
