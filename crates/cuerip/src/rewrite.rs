// Segment Selector & Rewriter: Walks the parsed playlist in order, downloads
// what the inclusion policy retains and rewrites each kept segment for local
// playback.

use std::collections::HashMap;
use std::path::Path;

use m3u8_rs::{Key, Map, MediaSegment};
use tracing::{debug, warn};
use url::Url;

use crate::cue;
use crate::error::CueRipError;
use crate::fetch::ByteFetcher;
use crate::keys::KeyStore;
use crate::resolve;

/// A segment rewritten for local playback.
///
/// Produced once the segment payload is on disk. URIs point at local files
/// and live-streaming metadata (timestamps, date ranges, cue markers, byte
/// ranges) is gone.
#[derive(Debug, Clone)]
pub struct RewrittenSegment {
    /// Local filename of the downloaded payload
    pub local_uri: String,
    /// Duration copied from the source segment, in seconds
    pub duration: f32,
    /// Decryption key with its URI already localized
    pub key: Option<Key>,
    /// Init segment reference with its URI already localized
    pub map: Option<Map>,
}

impl RewrittenSegment {
    /// Converts into an output playlist entry with its boundary marked.
    ///
    /// Every extracted segment may come from a different part of the source
    /// stream, so each one carries a discontinuity.
    pub fn into_media_segment(self) -> MediaSegment {
        MediaSegment {
            uri: self.local_uri,
            duration: self.duration,
            key: self.key,
            map: self.map,
            discontinuity: true,
            ..MediaSegment::empty()
        }
    }
}

/// Results of a selector pass over a playlist's segments.
#[derive(Debug, Default)]
pub struct RewriteOutcome {
    /// Rewritten segments in source order
    pub segments: Vec<RewrittenSegment>,
    /// Longest retained segment duration, in seconds
    pub max_duration: f32,
    /// Segments downloaded and rewritten
    pub retained: usize,
    /// Segments dropped by the inclusion policy
    pub skipped: usize,
}

/// Ordered, single-pass segment processor.
///
/// `EXT-X-KEY` and `EXT-X-MAP` apply to every segment that follows them, so
/// the rewriter tracks the active key and init segment while walking and
/// stamps them onto each retained segment. That keeps the output playable
/// even when the segment the tag appeared on was skipped.
pub struct SegmentRewriter<'a> {
    fetcher: &'a dyn ByteFetcher,
    base_url: &'a Url,
    outdir: &'a Path,
    include_cue_out: bool,
    fetched_maps: HashMap<String, String>,
    seen_names: HashMap<String, String>,
}

impl<'a> SegmentRewriter<'a> {
    pub fn new(
        fetcher: &'a dyn ByteFetcher,
        base_url: &'a Url,
        outdir: &'a Path,
        include_cue_out: bool,
    ) -> Self {
        Self {
            fetcher,
            base_url,
            outdir,
            include_cue_out,
            fetched_maps: HashMap::new(),
            seen_names: HashMap::new(),
        }
    }

    /// Processes the full segment list in source order.
    ///
    /// Transfers run strictly one at a time; the first failure aborts the
    /// pass and whatever was already written stays on disk.
    pub async fn process_all(
        &mut self,
        segments: &[MediaSegment],
        keys: &mut KeyStore,
    ) -> Result<RewriteOutcome, CueRipError> {
        let mut outcome = RewriteOutcome::default();
        let mut active_key: Option<&Key> = None;
        let mut active_map: Option<&Map> = None;

        for segment in segments {
            if let Some(key) = &segment.key {
                active_key = Some(key);
            }
            if let Some(map) = &segment.map {
                active_map = Some(map);
            }

            let segment_url = resolve::resolve(&segment.uri, self.base_url)?;
            let local = resolve::local_name(&segment_url)?;

            if !self.include_cue_out && !cue::is_cue_in(segment) {
                debug!("Skipping non-boundary segment: {}", segment.uri);
                outcome.skipped += 1;
                continue;
            }

            self.note_local_name(&local, &segment_url);
            let bytes = self
                .fetcher
                .fetch_bytes(&segment_url, segment.byte_range.as_ref())
                .await?;
            let path = self.outdir.join(&local);
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| CueRipError::StoreFailed {
                    url: segment_url.to_string(),
                    path,
                    source: e,
                })?;
            debug!("Stored segment {} as {} ({} bytes)", segment_url, local, bytes.len());

            let key = match active_key {
                Some(key) if key.uri.is_some() => {
                    let local_key = keys
                        .ensure_key(key, self.base_url, self.fetcher, self.outdir)
                        .await?;
                    Some(Key {
                        uri: Some(local_key),
                        ..key.clone()
                    })
                }
                Some(key) => Some(key.clone()),
                None => None,
            };

            let map = match active_map {
                Some(map) => Some(self.localize_map(map).await?),
                None => None,
            };

            if segment.duration > outcome.max_duration {
                outcome.max_duration = segment.duration;
            }
            outcome.retained += 1;
            outcome.segments.push(RewrittenSegment {
                local_uri: local,
                duration: segment.duration,
                key,
                map,
            });
        }

        Ok(outcome)
    }

    /// Fetches the init segment behind an `EXT-X-MAP` at most once per
    /// distinct URI and returns the reference rewritten to its local file.
    async fn localize_map(&mut self, map_info: &Map) -> Result<Map, CueRipError> {
        let map_url = resolve::resolve(&map_info.uri, self.base_url)?;
        if let Some(local) = self.fetched_maps.get(map_url.as_str()) {
            return Ok(Map {
                uri: local.clone(),
                byte_range: None,
                ..map_info.clone()
            });
        }

        let local = resolve::local_name(&map_url)?;
        let bytes = self
            .fetcher
            .fetch_bytes(&map_url, map_info.byte_range.as_ref())
            .await?;
        let path = self.outdir.join(&local);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CueRipError::StoreFailed {
                url: map_url.to_string(),
                path,
                source: e,
            })?;
        debug!("Stored init segment {} as {}", map_url, local);

        self.fetched_maps.insert(map_url.to_string(), local.clone());
        Ok(Map {
            uri: local,
            byte_range: None,
            ..map_info.clone()
        })
    }

    fn note_local_name(&mut self, name: &str, url: &Url) {
        if let Some(previous) = self
            .seen_names
            .insert(name.to_string(), url.to_string())
        {
            if previous != url.as_str() {
                warn!(
                    "Local filename collision: {} and {} both write {}",
                    previous, url, name
                );
            }
        }
    }
}
