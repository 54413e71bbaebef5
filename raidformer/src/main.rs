// SPDX-License-Identifier: GPL-3.0-only

//! raidformer - one-shot RAID provisioning for EC2 instances
//!
//! Creates and attaches EBS volumes (optionally restored from snapshots),
//! assembles them into an md array, layers LVM on top, optionally formats
//! the logical volume and mounts it.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod pipeline;

use cli::Args;

fn main() -> Result<()> {
    // Diagnostics go to stderr; command echo and output go to stdout
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("raidformer=info,raidformer_sys=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.resolve()?;
    raidformer_sys::check_preconditions(&config)?;

    tracing::info!(
        "raidformer v{}: {} member(s) at RAID level {} on {}",
        env!("CARGO_PKG_VERSION"),
        config.count,
        config.raid_level,
        config.md_device.display()
    );

    let report = pipeline::run(&config)?;
    tracing::info!(
        "Done: {} volume(s) provisioned, {} of {} command(s) executed",
        report.volumes.len(),
        report.executed(),
        report.outcomes.len()
    );
    Ok(())
}
