//! # graystego Binary Entry Point
//!
//! Thin wrapper around the library: checks carriers, embeds messages and
//! extracts them.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin graystego -- check cover.jpg other.png
//! cargo run --bin graystego -- embed cover.jpg -o out.png --message "hello"
//! cargo run --bin graystego -- extract out.png
//! ```
//!
//! An optional `--config config/graystego.toml` selects the log level, whether
//! non-grayscale carriers are refused, and the decoder cutoff.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use graystego::common::config::{load_config, StegoConfig};
use graystego::processing::{encoder, Decoder};
use graystego::CarrierImage;

/// Command-line arguments for the graystego binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    ///
    /// Example: config/graystego.toml
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report whether images are clean carriers and whether they hold a message
    Check {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Embed a message into a grayscale carrier and save it as PNG
    Embed {
        cover: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Message text
        #[arg(short, long, conflicts_with = "message_file", required_unless_present = "message_file")]
        message: Option<String>,

        /// Read the message from a file
        #[arg(long)]
        message_file: Option<PathBuf>,
    },
    /// Print the message hidden in an image
    Extract { image: PathBuf },
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger(level: LevelFilter) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .init();
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "YES"
    } else {
        "NO"
    }
}

fn run_check(images: &[PathBuf]) -> anyhow::Result<()> {
    for path in images {
        let carrier = CarrierImage::open(path)
            .with_context(|| format!("failed to load {}", path.display()))?;

        println!("File............: {}", path.display());
        println!("Format..........: {:?}", carrier.format());
        println!("Valid carrier...: {}", yes_no(carrier.is_valid_clean_image()));
        println!("Contains message: {}", yes_no(carrier.is_valid_message_image()));
        println!();
    }
    Ok(())
}

fn run_embed(
    config: &StegoConfig,
    cover: &Path,
    output: &Path,
    message: Option<String>,
    message_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut carrier = CarrierImage::open(cover)
        .with_context(|| format!("failed to load {}", cover.display()))?;

    if !carrier.is_valid_clean_image() {
        if config.encoder.require_clean {
            bail!("{} is not a grayscale image and cannot carry a message", cover.display());
        }
        warn!("⚠️ {} is not grayscale, the result may not decode", cover.display());
    }

    let summary = match (message, message_file) {
        (Some(text), _) => carrier.embed_message(&text)?,
        (None, Some(path)) => {
            let bytes = fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            encoder::embed_bytes(&mut carrier, &bytes)?
        }
        (None, None) => bail!("embed requires --message or --message-file"),
    };

    carrier
        .save_as(output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "✅ Embedded {} codes ({} modified pixels) into {}",
        summary.codes,
        summary.modified_pixels,
        output.display()
    );
    Ok(())
}

fn run_extract(config: &StegoConfig, image: &Path) -> anyhow::Result<()> {
    let carrier = CarrierImage::open(image)
        .with_context(|| format!("failed to load {}", image.display()))?;

    if !carrier.is_valid_message_image() {
        info!("No message found in {}", image.display());
    }

    let message = carrier.extract_message_with(&Decoder::from_config(&config.decoder))?;
    println!("{}", message);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration, falling back to defaults when no file is given
    let config: StegoConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => StegoConfig::default(),
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config
            .logging
            .level
            .parse::<LevelFilter>()
            .map_err(|_| anyhow!("invalid log level '{}'", config.logging.level))?
    };
    init_logger(level);

    match args.command {
        Command::Check { images } => run_check(&images),
        Command::Embed {
            cover,
            output,
            message,
            message_file,
        } => run_embed(&config, &cover, &output, message, message_file),
        Command::Extract { image } => run_extract(&config, &image),
    }
}
