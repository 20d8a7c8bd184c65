// Byte Fetcher: Handles the raw download of playlists, segments and keys.

use async_trait::async_trait;
use bytes::Bytes;
use m3u8_rs::ByteRange;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::CueRipError;

/// Byte-level fetch abstraction over HTTP.
///
/// The pipeline performs every transfer through this trait, so tests can
/// substitute an in-memory implementation and observe exactly which URLs
/// were requested.
#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch_bytes(
        &self,
        url: &Url,
        byte_range: Option<&ByteRange>,
    ) -> Result<Bytes, CueRipError>;
}

/// Formats the HTTP `Range` header for an `EXT-X-BYTERANGE` sub-range.
///
/// Without an explicit offset the range is taken from the start of the
/// resource. A zero-length range has no valid header form; `None` means
/// the whole resource is fetched instead.
pub(crate) fn range_header_value(range: &ByteRange) -> Option<String> {
    if range.length == 0 {
        return None;
    }
    let value = if let Some(offset) = range.offset {
        format!("bytes={}-{}", offset, offset + range.length - 1)
    } else {
        format!("bytes=0-{}", range.length - 1)
    };
    Some(value)
}

pub struct HttpFetcher {
    http_client: Client,
}

impl HttpFetcher {
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl ByteFetcher for HttpFetcher {
    async fn fetch_bytes(
        &self,
        url: &Url,
        byte_range: Option<&ByteRange>,
    ) -> Result<Bytes, CueRipError> {
        let mut request_builder = self.http_client.get(url.clone());
        if let Some(value) = byte_range.and_then(range_header_value) {
            request_builder = request_builder.header(reqwest::header::RANGE, value);
        }

        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                return Err(CueRipError::FetchFailed {
                    url: url.to_string(),
                    detail: e.to_string(),
                });
            }
        };

        if !response.status().is_success() {
            return Err(CueRipError::FetchFailed {
                url: url.to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CueRipError::FetchFailed {
                url: url.to_string(),
                detail: e.to_string(),
            })?;

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}
