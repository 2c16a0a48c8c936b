// Snapshot accessors are not all reached from the binary
#![allow(dead_code)]

//! Director DNS Records
//!
//! Builds versioned, fingerprinted snapshots of instance DNS records for
//! DNS-serving agents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DIRECTOR DNS RECORDS                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Placements (JSON)   ──→ one fact per instance + network   │
//! │  DnsRecordSet        ──→ records + record_infos rows       │
//! │  DnsSnapshot         ──→ canonical JSON + Blake3 digest    │
//! │  SnapshotPublisher   ──→ records.json, rewritten on change │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

mod config;
mod crypto;
mod distribution;
mod encoder;
mod naming;
mod records;
mod types;

use config::DnsRecordsConfig;
use distribution::{PublishOutcome, SnapshotPublisher};

/// Director DNS - versioned DNS record snapshots
#[derive(Parser, Debug)]
#[command(name = "director-dns")]
#[command(version = "0.1.0")]
#[command(about = "Builds versioned DNS record snapshots for deployment instances", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "director-dns.toml")]
    config: PathBuf,

    /// Placements file (JSON array)
    #[arg(short, long)]
    placements: PathBuf,

    /// Records file to publish to (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Snapshot version (defaults to the next published version)
    #[arg(long, conflicts_with = "watch")]
    snapshot_version: Option<u64>,

    /// Also publish index-based names
    #[arg(long)]
    include_index_records: bool,

    /// Domain for placements that do not name one (overrides config)
    #[arg(long)]
    domain: Option<String>,

    /// Keep republishing on the configured interval
    #[arg(long)]
    watch: bool,

    /// Print the snapshot to stdout instead of publishing it
    #[arg(long, conflicts_with = "watch")]
    print: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .init();

    info!("🌐 Director DNS v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = if args.config.exists() {
        DnsRecordsConfig::load(&args.config)?
    } else {
        warn!("Config file not found, using defaults");
        DnsRecordsConfig::default()
    };

    // Override config with CLI args
    let config = config
        .with_output_path(args.output)
        .with_include_index_records(args.include_index_records)
        .with_default_domain(args.domain);

    config.validate()?;

    info!("⚙️  Configuration:");
    info!("   Output: {:?}", config.output_path);
    info!("   Default domain: {}", config.default_domain);
    info!("   Index records: {}", config.include_index_records);
    info!("   Known AZs: {}", config.az_names.len());

    let shared_config = Arc::new(config);
    let publisher = SnapshotPublisher::new(shared_config.clone());

    if args.print {
        let placements = distribution::load_placements(&args.placements).await?;
        let snapshot = publisher.build(args.snapshot_version.unwrap_or(1), &placements)?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(snapshot.content())?;
        stdout.write_all(b"\n")?;

        info!("🔏 Digest: {}", snapshot.digest());
        return Ok(());
    }

    if !args.watch {
        let placements = distribution::load_placements(&args.placements).await?;
        match publisher.publish(&placements, args.snapshot_version).await? {
            PublishOutcome::Published { snapshot, records } => {
                info!("✅ Published v{} ({} records)", snapshot.version, records);
                println!("{}", snapshot.digest);
            }
            PublishOutcome::Unchanged(snapshot) => {
                info!("✅ Records file already current at v{}", snapshot.version);
                println!("{}", snapshot.digest);
            }
        }
        return Ok(());
    }

    let publication_handle = tokio::spawn(distribution::run_periodic_publication(
        publisher,
        args.placements,
        shared_config.publish_interval_secs,
    ));

    info!("✅ Watching placements");
    info!("   Press Ctrl+C to shutdown gracefully");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Shutdown signal received");
        }
        result = publication_handle => {
            error!("Publication task exited: {:?}", result);
        }
    }

    info!("👋 Director DNS shutting down");
    Ok(())
}
