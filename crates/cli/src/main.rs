//! UODecode - decode a captured Ultima Online packet stream to JSON
//!
//! Reads `ID HEXBODY` lines, decodes each body for the configured client
//! version and prints one JSON object per decoded packet.

mod capture;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uodecode_config::DecoderConfig;
use uodecode_core::ClientVersion;
use uodecode_protocol::Packet;

use capture::Session;

#[derive(Parser)]
#[command(
    name = "uodecode",
    version,
    about = "Decode Ultima Online server packets from a hex capture"
)]
struct Cli {
    /// Decoder settings file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Client version, overriding the settings file (e.g. 7.0.34.6 or 5.0.0a).
    #[arg(long)]
    version: Option<ClientVersion>,
    /// Capture file with one `ID HEXBODY` packet per line.
    capture: PathBuf,
}

#[derive(Serialize)]
struct Record<'a> {
    line: usize,
    id: String,
    #[serde(flatten)]
    packet: &'a Packet,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DecoderConfig::load_from_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => DecoderConfig::default(),
    };
    if let Some(version) = cli.version {
        config.client_version = version;
    }

    // Initialize tracing on stderr so stdout stays pure JSON
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    config.display();

    let content = fs::read_to_string(&cli.capture)
        .with_context(|| format!("read capture {}", cli.capture.display()))?;

    let mut session = Session::new(
        config.protocol_era(),
        config.max_body_length,
        config.desync_threshold,
    );

    let decoded = capture::run(&content, &mut session, |line, packet_id, packet| {
        let record = Record {
            line,
            id: format!("0x{:02X}", packet_id),
            packet,
        };
        println!("{}", serde_json::to_string(&record)?);
        Ok(())
    })?;

    info!("Decoded {} packet(s)", decoded);
    Ok(())
}
