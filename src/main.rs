//! topsnap - CLI entry point.
//!
//! Parses top(1) batch output from a file or from stdin and prints one JSON
//! document per snapshot block. Logging goes to stderr; stdout carries only
//! parsed output.

use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, Level};

use topsnap::cli::{Args, LogLevel};
use topsnap::config::{resolve_config, show_config, validate_effective_config, Config};
use topsnap::output::{render, OutputOptions};
use topsnap::parser::parse_top_output;
use topsnap::stream::{stream_blocks, StreamOptions};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Maps the effective config onto rendering options.
fn output_options(config: &Config) -> OutputOptions {
    OutputOptions {
        summary: config.summary.unwrap_or(false),
        filter: config.filter.unwrap_or(false),
        pretty: config.pretty.unwrap_or(false),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(&args);

    let config = resolve_config(&args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    if args.check_config {
        println!("✅ Configuration valid");
        return Ok(());
    }

    if args.show_config {
        print!("{}", show_config(&config, &args.config_format)?);
        return Ok(());
    }

    let options = output_options(&config);

    // Whole-file mode: parse once, print one document.
    if let Some(path) = &args.input {
        let text = std::fs::read_to_string(path)?;
        let snapshots = parse_top_output(&text)?;
        info!("Parsed {} snapshot(s) from {}", snapshots.len(), path.display());
        println!("{}", render(snapshots, &options)?);
        return Ok(());
    }

    // Stream mode: reassemble stdin chunks into snapshot blocks. A malformed
    // block is logged and skipped; it does not terminate the stream.
    let stream_options = StreamOptions {
        idle_timeout: match config.idle_timeout_ms.unwrap_or(0) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        },
    };

    stream_blocks(tokio::io::stdin(), &stream_options, |block| {
        match parse_top_output(&block) {
            Ok(snapshots) => match render(snapshots, &options) {
                Ok(text) => println!("{text}"),
                Err(e) => error!("Failed to serialize snapshot block: {e}"),
            },
            Err(e) => error!("Skipping malformed snapshot block: {e}"),
        }
    })
    .await?;

    Ok(())
}
