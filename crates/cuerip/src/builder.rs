//! # Builder for CueRipConfig
//!
//! This module provides a builder pattern implementation for creating and customizing
//! CueRipConfig instances with a fluent API.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use cuerip_engine::CueRipConfig;
//!
//! // Create a config with the builder
//! let config = CueRipConfig::builder()
//!     .with_output_dir("./cues")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_connect_timeout(Duration::from_secs(15))
//!     .with_user_agent("MyApp/1.0")
//!     .with_header("X-Api-Key", "my-secret-key")
//!     .with_include_cue_out(false)
//!     .build();
//! ```

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::CueRipConfig;

/// Builder for creating CueRipConfig instances with a fluent API
#[derive(Debug, Clone)]
pub struct CueRipConfigBuilder {
    /// Internal config being built
    config: CueRipConfig,
}

impl CueRipConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CueRipConfig::default(),
        }
    }

    /// Set the output directory for segments, keys and the playlist
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set whether segments outside CUE-IN boundaries are kept
    pub fn with_include_cue_out(mut self, include: bool) -> Self {
        self.config.include_cue_out = include;
        self
    }

    /// Set the target file for ffmpeg concatenation after extraction
    pub fn with_concat_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.config.concat_target = Some(target.into());
        self
    }

    /// Set the overall timeout for the entire HTTP request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch.timeout = timeout;
        self
    }

    /// Set the connection timeout (time to establish initial connection)
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch.connect_timeout = timeout;
        self
    }

    /// Set the read timeout (maximum time between receiving data chunks)
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch.read_timeout = timeout;
        self
    }

    /// Set whether to follow redirects
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.config.fetch.follow_redirects = follow;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.fetch.user_agent = user_agent.into();
        self
    }

    /// Add a custom HTTP header
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.as_ref().parse::<reqwest::header::HeaderName>(),
            HeaderValue::from_str(value.as_ref()),
        ) {
            self.config.fetch.headers.insert(name, value);
        }
        self
    }

    /// Set all HTTP headers, replacing any existing headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.config.fetch.headers = headers;
        self
    }

    /// Set whether to use system proxy settings if available
    pub fn with_system_proxy(mut self, use_system_proxy: bool) -> Self {
        self.config.fetch.use_system_proxy = use_system_proxy;
        self
    }

    /// Build the CueRipConfig instance
    pub fn build(self) -> CueRipConfig {
        self.config
    }
}

impl Default for CueRipConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn test_builder_defaults() {
        let config = CueRipConfigBuilder::new().build();
        assert_eq!(config.output_dir, Path::new("./cues"));
        assert!(config.include_cue_out);
        assert!(config.concat_target.is_none());
        assert_eq!(config.fetch.timeout, Duration::from_secs(30));
        assert_eq!(config.fetch.connect_timeout, Duration::from_secs(10));
        assert!(config.fetch.follow_redirects);
        assert!(config.fetch.use_system_proxy);
    }

    #[test]
    fn test_builder_customization() {
        let config = CueRipConfigBuilder::new()
            .with_output_dir("/tmp/ads")
            .with_include_cue_out(false)
            .with_concat_target("/tmp/ads/break.ts")
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(20))
            .with_follow_redirects(false)
            .with_user_agent("CustomUserAgent/1.0")
            .with_header("X-Custom-Header", "CustomValue")
            .with_system_proxy(false)
            .build();

        assert_eq!(config.output_dir, Path::new("/tmp/ads"));
        assert!(!config.include_cue_out);
        assert_eq!(
            config.concat_target.as_deref(),
            Some(Path::new("/tmp/ads/break.ts"))
        );
        assert_eq!(config.fetch.timeout, Duration::from_secs(60));
        assert_eq!(config.fetch.connect_timeout, Duration::from_secs(20));
        assert!(!config.fetch.follow_redirects);
        assert_eq!(config.fetch.user_agent, "CustomUserAgent/1.0");
        assert!(!config.fetch.use_system_proxy);

        // Verify custom header
        let header_value = config.fetch.headers.get("X-Custom-Header").unwrap();
        assert_eq!(header_value.to_str().unwrap(), "CustomValue");
    }

    #[test]
    fn test_default_headers_kept_when_adding_custom_one() {
        let config = CueRipConfigBuilder::new()
            .with_header("Referer", "https://player.example.com/")
            .build();

        assert!(config.fetch.headers.get(reqwest::header::ACCEPT).is_some());
        assert!(config.fetch.headers.get("Referer").is_some());
    }
}
