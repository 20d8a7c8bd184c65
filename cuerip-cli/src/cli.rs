use clap::Parser;
use std::path::PathBuf;

/// Define CLI arguments
#[derive(Parser)]
#[command(
    author = "hua0512 <https://github.com/hua0512>",
    version,
    about = "SCTE-35 cue extraction tool for HLS playlists",
    long_about = "Downloads an HLS media playlist, finds the ad intervals announced by\n\
                  SCTE-35 cue markers (EXT-X-DATERANGE, EXT-X-CUE-OUT/CUE-IN) and saves\n\
                  the segments covering them together with their decryption keys and\n\
                  init segments. The result is rewritten into a self-contained local\n\
                  VOD playlist that players and ffmpeg can consume offline.\n\
                  \n\
                  Master playlists are followed to their highest-bandwidth variant.\n\
                  With --concat, ffmpeg merges the extracted segments into one file."
)]
pub struct CliArgs {
    /// HLS playlist URL to scan for cue markers
    #[arg(
        required = true,
        help = "URL of the HLS media or master playlist to process"
    )]
    pub url: String,

    /// Output directory for extracted segments
    #[arg(
        short,
        long,
        help = "Directory where segments, keys and the rewritten playlist are saved (default: ./cues)"
    )]
    pub output_dir: Option<PathBuf>,

    /// Keep only the segment closing each cue interval
    #[arg(
        long = "cue-in-only",
        help = "Save only the segments that close an ad interval (CUE-IN boundaries)"
    )]
    pub cue_in_only: bool,

    /// Concatenate the extracted segments with ffmpeg
    #[arg(
        long,
        value_name = "FILE",
        help = "Merge the extracted segments into FILE with ffmpeg after extraction (requires ffmpeg on PATH)"
    )]
    pub concat: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable detailed debug logging")]
    pub verbose: bool,

    /// Overall timeout in seconds
    #[arg(
        long,
        default_value = "30",
        help = "Overall timeout in seconds for HTTP requests. Use 0 for unlimited."
    )]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value = "10",
        help = "Connection timeout in seconds (time to establish initial connection)"
    )]
    pub connect_timeout: u64,

    /// Read timeout in seconds
    #[arg(
        long,
        default_value = "30",
        help = "Read timeout in seconds (maximum time between receiving data chunks)"
    )]
    pub read_timeout: u64,

    /// Custom HTTP headers for playlist, segment and key requests
    #[arg(
        long = "header",
        short = 'H',
        help = "Add custom HTTP header to requests (can be used multiple times). Format: 'Name: Value'",
        value_name = "HEADER"
    )]
    pub headers: Vec<String>,

    /// Use system proxy settings for downloads
    #[arg(
        long,
        default_value = "true",
        help = "Use system proxy settings for downloads if available"
    )]
    pub use_system_proxy: bool,
}
