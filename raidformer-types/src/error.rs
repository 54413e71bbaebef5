// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use thiserror::Error;

/// Pre-flight rejections. Raised before anything on the instance or in the
/// cloud account is touched, so correcting the invocation is always enough.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "you must use a valid device ({device} is not one of {allowed}); see https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/device_naming.html",
        allowed = crate::ALLOWED_DEVICES.join(", ")
    )]
    InvalidDevice { device: String },

    #[error("a mount point is required (--mountpoint)")]
    MissingMountpoint,

    #[error("a RAID level is required (--raidlevel)")]
    MissingRaidLevel,

    #[error("unsupported RAID level {0}; expected one of 0, 1, 4, 5, 6, 10")]
    UnsupportedRaidLevel(u8),

    #[error("unsupported filesystem '{0}'; expected ext4 or xfs")]
    UnsupportedFilesystem(String),

    #[error("volume count must be at least 1 (got {0})")]
    InvalidCount(u32),

    #[error(
        "cowardly refusing to wipe volumes restored from snapshots; drop --wipe to restore from snapshots"
    )]
    WipeWithSnapshots,

    #[error("snapshot list contains an empty entry: '{0}'")]
    EmptySnapshotId(String),

    #[error("--size is required when creating new blank volumes")]
    MissingSize,

    #[error("--wait-interval must be greater than zero")]
    ZeroWaitInterval,

    #[error("number of volumes ({count}) is not compatible with RAID level {level}")]
    OddMemberCount { level: u8, count: u32 },

    #[error("devices starting with {device} already exist: {list}", list = .existing.join(", "))]
    DevicesPresent {
        device: String,
        existing: Vec<String>,
    },

    #[error("device {} already exists", .0.display())]
    ArrayExists(PathBuf),
}
