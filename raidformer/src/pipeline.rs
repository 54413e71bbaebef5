// SPDX-License-Identifier: GPL-3.0-only

//! Provisioning pipeline: volumes, then command composition, then execution.

use anyhow::{Context, Result};
use raidformer_sys::{
    BlockStorage, CommandOutcome, Ec2Cli, compose, execute_plan, provision_volumes,
    warn_missing_tools,
};
use raidformer_types::{ProvisionConfig, VolumeRecord};
use tracing::info;

#[derive(Debug, Default)]
pub struct RunReport {
    pub volumes: Vec<VolumeRecord>,
    pub outcomes: Vec<CommandOutcome>,
}

impl RunReport {
    pub fn executed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.executed).count()
    }
}

pub fn run(config: &ProvisionConfig) -> Result<RunReport> {
    run_with(config, || {
        Ec2Cli::connect(config.region.clone()).context("failed to reach the EC2 API")
    })
}

/// Run the pipeline, connecting to the cloud only if volumes are provisioned.
pub fn run_with<B, C>(config: &ProvisionConfig, connect: C) -> Result<RunReport>
where
    B: BlockStorage,
    C: FnOnce() -> Result<B>,
{
    let devices = config.device_series();
    let mut report = RunReport::default();

    if config.provisions_volumes() {
        let storage = connect()?;
        report.volumes = provision_volumes(&storage, config, &devices)
            .context("volume provisioning failed")?;
    } else if config.attach || !config.snapshots.is_empty() {
        info!("Dry run: skipping volume creation and attachment");
    }

    if !config.dry_run {
        warn_missing_tools();
    }

    let mountpoint_exists = config.mountpoint.is_dir();
    if !mountpoint_exists {
        info!("Mount point {} does not exist; it will be created", config.mountpoint.display());
    }
    let plan = compose(config, devices.attached(), mountpoint_exists);
    report.outcomes = execute_plan(&plan);
    Ok(report)
}
