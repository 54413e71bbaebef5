// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use raidformer_types::config::{
    DEFAULT_LOGICAL_VOLUME, DEFAULT_MD_DEVICE, DEFAULT_TAG, DEFAULT_VOLUME_GROUP,
};
use raidformer_types::{
    ConfigError, DEFAULT_DEVICE, FilesystemKind, ProvisionConfig, RaidLevel, WaitPolicy,
    parse_snapshot_list,
};

#[derive(Debug, Parser)]
#[command(name = "raidformer", version)]
#[command(about = "Create, attach and assemble EBS volumes into a RAID-backed LVM volume")]
pub struct Args {
    /// Do the volume creation and attachment
    #[arg(short, long)]
    pub attach: bool,

    /// Number of EBS volumes
    #[arg(short, long, default_value_t = 1)]
    pub count: u32,

    /// Block device to start with
    #[arg(short, long, default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Filesystem type (ext4 or xfs)
    #[arg(short, long, default_value = "ext4")]
    pub filesystem: String,

    /// Logical volume name
    #[arg(short, long, default_value = DEFAULT_LOGICAL_VOLUME)]
    pub logvol: String,

    /// Mount point
    #[arg(short, long)]
    pub mountpoint: Option<PathBuf>,

    /// md device name
    #[arg(long = "md", default_value = DEFAULT_MD_DEVICE)]
    pub md_device: PathBuf,

    /// RAID level
    #[arg(short, long)]
    pub raidlevel: Option<u8>,

    /// Size of EBS volumes in GiB
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Dry run: print the mdadm and LVM commands without running them
    #[arg(short, long)]
    pub test: bool,

    /// Name tag for the EBS volumes
    #[arg(long, default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Volume group name
    #[arg(short, long, default_value = DEFAULT_VOLUME_GROUP)]
    pub volgroup: String,

    /// Format the new filesystem
    #[arg(short, long)]
    pub wipe: bool,

    /// Create volumes from one or more EBS snapshots (comma separated, order is preserved)
    #[arg(long = "from-snapshot")]
    pub from_snapshot: Option<String>,

    /// Seconds between checks for attached device nodes
    #[arg(long, default_value_t = WaitPolicy::DEFAULT_INTERVAL.as_secs())]
    pub wait_interval: u64,

    /// Seconds to wait for attached device nodes before giving up
    #[arg(long, default_value_t = WaitPolicy::DEFAULT_TIMEOUT.as_secs())]
    pub wait_timeout: u64,

    /// Keep created volumes when provisioning fails
    #[arg(long)]
    pub keep_on_failure: bool,

    /// AWS region (defaults to the instance's region)
    #[arg(long)]
    pub region: Option<String>,
}

impl Args {
    /// Apply defaults and overrides, then validate.
    pub fn resolve(self) -> Result<ProvisionConfig, ConfigError> {
        let filesystem: FilesystemKind = self.filesystem.parse()?;
        let mountpoint = self.mountpoint.ok_or(ConfigError::MissingMountpoint)?;
        let raid_level = RaidLevel::try_from(self.raidlevel.ok_or(ConfigError::MissingRaidLevel)?)?;

        let snapshots = self
            .from_snapshot
            .as_deref()
            .map(parse_snapshot_list)
            .transpose()?
            .unwrap_or_default();
        let count = if snapshots.is_empty() {
            self.count
        } else {
            u32::try_from(snapshots.len()).unwrap_or(u32::MAX)
        };

        let config = ProvisionConfig {
            attach: self.attach,
            count,
            device: self.device,
            filesystem,
            logical_volume: self.logvol,
            mountpoint,
            md_device: self.md_device,
            raid_level,
            size_gib: self.size,
            dry_run: self.test,
            tag: self.tag,
            volume_group: self.volgroup,
            wipe: self.wipe,
            snapshots,
            wait: WaitPolicy {
                interval: Duration::from_secs(self.wait_interval),
                timeout: Duration::from_secs(self.wait_timeout),
            },
            rollback: !self.keep_on_failure,
            region: self.region,
        };
        config.validate()?;
        Ok(config)
    }
}
