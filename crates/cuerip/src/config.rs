use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Configurable options for HTTP fetching
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Overall timeout for the entire HTTP request
    pub timeout: Duration,

    /// Connection timeout (time to establish initial connection)
    pub connect_timeout: Duration,

    /// Read timeout (maximum time between receiving data chunks)
    pub read_timeout: Duration,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// User agent string
    pub user_agent: String,

    /// Custom HTTP headers for requests
    pub headers: HeaderMap,

    /// Whether to use system proxy settings if available
    pub use_system_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            headers: FetchConfig::get_default_headers(),
            use_system_proxy: true, // Enable system proxy by default
        }
    }
}

impl FetchConfig {
    pub fn get_default_headers() -> HeaderMap {
        let mut default_headers = HeaderMap::new();

        default_headers.insert(
            reqwest::header::ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate, br"),
        );

        default_headers.insert(
            reqwest::header::CONNECTION,
            HeaderValue::from_static("keep-alive"),
        );

        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5,zh-CN;q=0.3,zh;q=0.2"),
        );
        default_headers
    }
}

/// Options for a single cue extraction run
#[derive(Debug, Clone)]
pub struct CueRipConfig {
    /// Directory receiving the segments, keys and the rewritten playlist
    pub output_dir: PathBuf,

    /// Whether segments outside CUE-IN boundaries are kept.
    ///
    /// When false, only the segment closing each ad interval is saved.
    pub include_cue_out: bool,

    /// Optional path for an ffmpeg stream-copy of the extracted playlist
    pub concat_target: Option<PathBuf>,

    /// HTTP fetch configuration
    pub fetch: FetchConfig,
}

impl Default for CueRipConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./cues"),
            include_cue_out: true,
            concat_target: None,
            fetch: FetchConfig::default(),
        }
    }
}

impl CueRipConfig {
    pub fn builder() -> crate::builder::CueRipConfigBuilder {
        crate::builder::CueRipConfigBuilder::new()
    }
}
