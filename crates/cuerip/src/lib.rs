//! # CueRip Engine
//!
//! A library for extracting SCTE-35 cue intervals from HLS media playlists.
//! Downloads the segments between CUE-OUT and CUE-IN markers together with
//! their decryption keys and init segments, then rewrites everything into a
//! self-contained local VOD playlist.
//!
//! ## Features
//!
//! - SCTE-35 cue detection via DATERANGE and discrete CUE-OUT/CUE-IN tags
//! - Master playlist handling with highest-bandwidth variant selection
//! - At-most-once localization of decryption keys and init segments
//! - Byte-range segment support
//! - Optional ffmpeg stream-copy of the extracted interval

pub mod builder;
pub mod client;
pub mod concat;
pub mod config;
pub mod cue;
pub mod error;
pub mod fetch;
pub mod keys;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod rewrite;

pub use builder::CueRipConfigBuilder;
pub use config::{CueRipConfig, FetchConfig};
pub use error::CueRipError;

// Re-export the transfer seam so callers can substitute their own fetcher
pub use fetch::{ByteFetcher, HttpFetcher};

// Re-export pipeline entry points
pub use pipeline::{CueRip, RunOutcome, RunSummary};

// Re-export the pieces the pipeline is assembled from
pub use concat::concat_segments;
pub use cue::CueMarker;
pub use keys::KeyStore;
pub use output::MANIFEST_NAME;
pub use rewrite::{RewriteOutcome, RewrittenSegment, SegmentRewriter};

// Re-export client utilities
pub use client::create_client;
