use std::{path::PathBuf, time::Duration};

use clap::Parser;
use cuerip_engine::{CueRip, CueRipConfig, RunOutcome};
use error::AppError;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod cli;
mod error;
mod utils;

use cli::CliArgs;

fn main() {
    if let Err(e) = bootstrap() {
        eprintln!("Error: {e}");
        // Log the full error for debugging
        error!(error = ?e, "Application failed");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn bootstrap() -> Result<(), AppError> {
    // Parse command-line arguments
    let args = CliArgs::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("cuerip.log")?;

    let multi_writer = MakeWriterExt::and(std::io::stdout, log_file);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(multi_writer)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Initialization(e.to_string()))?;

    info!(" ██████╗██╗   ██╗███████╗██████╗ ██╗██████╗ ");
    info!("██╔════╝██║   ██║██╔════╝██╔══██╗██║██╔══██╗");
    info!("██║     ██║   ██║█████╗  ██████╔╝██║██████╔╝");
    info!("██║     ██║   ██║██╔══╝  ██╔══██╗██║██╔═══╝ ");
    info!("╚██████╗╚██████╔╝███████╗██║  ██║██║██║     ");
    info!(" ╚═════╝ ╚═════╝ ╚══════╝╚═╝  ╚═╝╚═╝╚═╝     ");
    info!("");
    info!("SCTE-35 cue extraction tool for HLS playlists by hua0512");
    info!("GitHub: https://github.com/hua0512/cuerip");
    info!("==================================================================");

    // Log HTTP timeout settings
    info!(
        "HTTP timeout configuration: overall={}s, connect={}s, read={}s",
        args.timeout, args.connect_timeout, args.read_timeout
    );

    if args.cue_in_only {
        info!("Keeping only cue interval boundary segments (--cue-in-only)");
    }

    // Determine output directory
    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("./cues"));

    // Create the extraction configuration
    let mut builder = CueRipConfig::builder()
        .with_output_dir(output_dir)
        .with_include_cue_out(!args.cue_in_only)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_connect_timeout(Duration::from_secs(args.connect_timeout))
        .with_read_timeout(Duration::from_secs(args.read_timeout))
        .with_headers(utils::build_headers(&args.headers))
        .with_system_proxy(args.use_system_proxy);
    if let Some(target) = &args.concat {
        builder = builder.with_concat_target(target);
    }
    let config = builder.build();

    let extractor = CueRip::new(config)?;
    match extractor.run(&args.url).await? {
        RunOutcome::NoCueSegments => {
            info!("No SCTE-35 cue markers found; nothing to extract");
        }
        RunOutcome::Saved(summary) => {
            info!(
                "Extraction complete: {} segments saved ({} skipped), {} keys",
                summary.segments_saved, summary.segments_skipped, summary.keys_saved
            );
            info!("Local playlist: {}", summary.manifest_path.display());
            if let Some(target) = summary.concat_target {
                info!("Concatenated output: {}", target.display());
            }
        }
    }
    Ok(())
}
