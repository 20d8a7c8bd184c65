// Key Store: Localizes decryption keys, fetching each distinct URI at most once.

use std::collections::HashMap;
use std::path::Path;

use m3u8_rs::Key;
use tracing::debug;
use url::Url;

use crate::error::CueRipError;
use crate::fetch::ByteFetcher;
use crate::resolve;

/// Tracks the decryption keys fetched during a run.
///
/// Maps the resolved remote key URI to the local filename its bytes were
/// written under. The first sighting of a URI fetches and writes the key;
/// later sightings are answered from the map without touching the network
/// or the filesystem.
#[derive(Debug, Default)]
pub struct KeyStore {
    fetched: HashMap<String, String>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self {
            fetched: HashMap::new(),
        }
    }

    /// Number of distinct keys fetched so far.
    pub fn len(&self) -> usize {
        self.fetched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetched.is_empty()
    }

    /// Ensures the referenced key is on disk and returns its local filename.
    pub async fn ensure_key(
        &mut self,
        key: &Key,
        base: &Url,
        fetcher: &dyn ByteFetcher,
        outdir: &Path,
    ) -> Result<String, CueRipError> {
        let key_uri = match &key.uri {
            Some(uri) => uri,
            None => return Err(CueRipError::InvalidUri("Key URI is missing".to_string())),
        };

        let key_url = resolve::resolve(key_uri, base)?;
        if let Some(local) = self.fetched.get(key_url.as_str()) {
            return Ok(local.clone());
        }

        let local = resolve::local_name(&key_url)?;
        let bytes = match fetcher.fetch_bytes(&key_url, None).await {
            Ok(bytes) => bytes,
            Err(CueRipError::FetchFailed { url, detail }) => {
                return Err(CueRipError::KeyFetchFailed { url, detail });
            }
            Err(e) => return Err(e),
        };

        let path = outdir.join(&local);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CueRipError::StoreFailed {
                url: key_url.to_string(),
                path,
                source: e,
            })?;
        debug!("Stored decryption key {} as {}", key_url, local);

        self.fetched.insert(key_url.to_string(), local.clone());
        Ok(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StubFetcher;
    use m3u8_rs::MediaSegment;

    fn parse_segments(playlist: &str) -> Vec<MediaSegment> {
        match m3u8_rs::parse_playlist_res(playlist.as_bytes()) {
            Ok(m3u8_rs::Playlist::MediaPlaylist(pl)) => pl.segments,
            other => panic!("fixture did not parse as a media playlist: {other:?}"),
        }
    }

    fn keyed_segments() -> Vec<MediaSegment> {
        parse_segments(
            "#EXTM3U\n\
             #EXT-X-VERSION:3\n\
             #EXT-X-TARGETDURATION:6\n\
             #EXT-X-KEY:METHOD=AES-128,URI=\"keys/k1.key\",IV=0x9c7db8778570d05c3177c349fd9236aa\n\
             #EXTINF:6.0,\n\
             s1.ts\n\
             #EXT-X-KEY:METHOD=AES-128,URI=\"keys/k1.key\",IV=0x9c7db8778570d05c3177c349fd9236ab\n\
             #EXTINF:6.0,\n\
             s2.ts\n\
             #EXT-X-KEY:METHOD=AES-128,URI=\"keys/k2.key\"\n\
             #EXTINF:6.0,\n\
             s3.ts\n\
             #EXT-X-ENDLIST\n",
        )
    }

    fn base() -> Url {
        Url::parse("https://cdn.example.com/live/stream/").unwrap()
    }

    #[tokio::test]
    async fn test_same_key_uri_fetched_once() {
        let segments = keyed_segments();
        let stub = StubFetcher::new();
        stub.insert(
            "https://cdn.example.com/live/stream/keys/k1.key",
            &b"0123456789abcdef"[..],
        );
        let outdir = tempfile::tempdir().unwrap();

        let mut store = KeyStore::new();
        let first = store
            .ensure_key(
                segments[0].key.as_ref().unwrap(),
                &base(),
                &stub,
                outdir.path(),
            )
            .await
            .unwrap();
        let second = store
            .ensure_key(
                segments[1].key.as_ref().unwrap(),
                &base(),
                &stub,
                outdir.path(),
            )
            .await
            .unwrap();

        assert_eq!(first, "k1.key");
        assert_eq!(second, "k1.key");
        assert_eq!(stub.requested_urls().len(), 1);
        assert_eq!(store.len(), 1);

        let written = std::fs::read(outdir.path().join("k1.key")).unwrap();
        assert_eq!(written, b"0123456789abcdef");
    }

    #[tokio::test]
    async fn test_distinct_key_uris_fetched_separately() {
        let segments = keyed_segments();
        let stub = StubFetcher::new();
        stub.insert(
            "https://cdn.example.com/live/stream/keys/k1.key",
            &b"0123456789abcdef"[..],
        );
        stub.insert(
            "https://cdn.example.com/live/stream/keys/k2.key",
            &b"fedcba9876543210"[..],
        );
        let outdir = tempfile::tempdir().unwrap();

        let mut store = KeyStore::new();
        store
            .ensure_key(
                segments[0].key.as_ref().unwrap(),
                &base(),
                &stub,
                outdir.path(),
            )
            .await
            .unwrap();
        let other = store
            .ensure_key(
                segments[2].key.as_ref().unwrap(),
                &base(),
                &stub,
                outdir.path(),
            )
            .await
            .unwrap();

        assert_eq!(other, "k2.key");
        assert_eq!(stub.requested_urls().len(), 2);
        assert_eq!(store.len(), 2);
        assert!(outdir.path().join("k2.key").exists());
    }

    #[tokio::test]
    async fn test_failed_key_fetch_is_fatal() {
        let segments = keyed_segments();
        let stub = StubFetcher::new();
        let outdir = tempfile::tempdir().unwrap();

        let mut store = KeyStore::new();
        let err = store
            .ensure_key(
                segments[0].key.as_ref().unwrap(),
                &base(),
                &stub,
                outdir.path(),
            )
            .await
            .unwrap_err();

        match err {
            CueRipError::KeyFetchFailed { url, .. } => {
                assert_eq!(url, "https://cdn.example.com/live/stream/keys/k1.key");
            }
            other => panic!("expected KeyFetchFailed, got {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failed_key_write_names_the_key() {
        let segments = keyed_segments();
        let stub = StubFetcher::new();
        stub.insert(
            "https://cdn.example.com/live/stream/keys/k1.key",
            &b"0123456789abcdef"[..],
        );
        let outdir = tempfile::tempdir().unwrap();
        // Occupy the key's local filename so the write fails
        std::fs::create_dir(outdir.path().join("k1.key")).unwrap();

        let mut store = KeyStore::new();
        let err = store
            .ensure_key(
                segments[0].key.as_ref().unwrap(),
                &base(),
                &stub,
                outdir.path(),
            )
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(matches!(err, CueRipError::StoreFailed { .. }), "{msg}");
        assert!(msg.contains("k1.key"), "{msg}");
        assert!(store.is_empty());
    }
}
