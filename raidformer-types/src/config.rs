// SPDX-License-Identifier: GPL-3.0-only

//! Resolved run configuration
//!
//! `ProvisionConfig` is built once from the command line and then handed by
//! reference to each pipeline stage.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DeviceSeries, FilesystemKind, RaidLevel};

pub const DEFAULT_LOGICAL_VOLUME: &str = "LogVolData";
pub const DEFAULT_VOLUME_GROUP: &str = "VolGroupData";
pub const DEFAULT_MD_DEVICE: &str = "/dev/md0";
pub const DEFAULT_TAG: &str = "ebs_raid";

/// How long to wait for attached volumes to show up as device nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl WaitPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

    /// A zero interval would turn the wait into a busy loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroWaitInterval);
        }
        Ok(())
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Create and attach volumes before assembling the array
    pub attach: bool,

    /// Number of member volumes; equals `snapshots.len()` when restoring
    pub count: u32,

    /// Starting block device, one of `ALLOWED_DEVICES`
    pub device: String,

    pub filesystem: FilesystemKind,

    pub logical_volume: String,

    pub mountpoint: PathBuf,

    /// RAID array device path
    pub md_device: PathBuf,

    pub raid_level: RaidLevel,

    /// Size of each created volume in GiB
    pub size_gib: Option<u32>,

    /// Print composed commands without running them or touching the cloud account
    pub dry_run: bool,

    /// Value of the `Name` tag applied to created volumes
    pub tag: String,

    pub volume_group: String,

    /// Format the logical volume
    pub wipe: bool,

    /// Snapshot ids restored in order onto the device series
    pub snapshots: Vec<String>,

    pub wait: WaitPolicy,

    /// Detach and delete volumes created by this run when provisioning fails
    pub rollback: bool,

    /// Region override; defaults to the region in the instance identity
    pub region: Option<String>,
}

impl ProvisionConfig {
    /// Check the invariants that do not depend on the state of the machine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !crate::is_allowed_device(&self.device) {
            return Err(ConfigError::InvalidDevice {
                device: self.device.clone(),
            });
        }
        if self.count < 1 {
            return Err(ConfigError::InvalidCount(self.count));
        }
        if !self.snapshots.is_empty() && self.wipe {
            return Err(ConfigError::WipeWithSnapshots);
        }
        if self.creates_blank_volumes() && self.size_gib.is_none() {
            return Err(ConfigError::MissingSize);
        }
        self.wait.validate()?;
        self.raid_level.check_member_count(self.count)
    }

    pub fn device_series(&self) -> DeviceSeries {
        DeviceSeries::new(&self.device, self.count)
    }

    /// Whether volumes are created at all during this run
    pub fn provisions_volumes(&self) -> bool {
        (self.attach || !self.snapshots.is_empty()) && !self.dry_run
    }

    fn creates_blank_volumes(&self) -> bool {
        self.provisions_volumes() && self.snapshots.is_empty()
    }

    /// Snapshot to restore into slot `index`, if restoring
    pub fn snapshot_for(&self, index: usize) -> Option<&str> {
        self.snapshots.get(index).map(String::as_str)
    }

    /// `/dev/<volume group>/<logical volume>`
    pub fn logical_volume_path(&self) -> PathBuf {
        Path::new("/dev")
            .join(&self.volume_group)
            .join(&self.logical_volume)
    }
}

/// Split a comma-separated snapshot id list, preserving order.
pub fn parse_snapshot_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(|id| {
            let id = id.trim();
            if id.is_empty() {
                Err(ConfigError::EmptySnapshotId(raw.to_string()))
            } else {
                Ok(id.to_string())
            }
        })
        .collect()
}
