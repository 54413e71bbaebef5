// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem table
//!
//! Every supported kind carries both its format invocation and its fstab
//! mount options, so an unsupported kind is rejected while the options are
//! resolved instead of when the command list is composed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Mount options used for kinds without a tuned entry
pub const DEFAULT_MOUNT_OPTIONS: &str = "defaults";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilesystemKind {
    /// ext4 filesystem (journaled)
    #[default]
    Ext4,

    /// XFS filesystem
    Xfs,
}

impl FilesystemKind {
    pub const ALL: [FilesystemKind; 2] = [Self::Ext4, Self::Xfs];

    /// Name as used in fstab and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ext4 => "ext4",
            Self::Xfs => "xfs",
        }
    }

    /// Formatting invocation; the target device is appended by the caller.
    pub fn format_command(&self) -> &'static str {
        match self {
            Self::Ext4 => "mkfs.ext4 -j",
            Self::Xfs => "mkfs.xfs",
        }
    }

    /// Options column of the fstab entry
    pub fn mount_options(&self) -> &'static str {
        match self {
            Self::Ext4 => DEFAULT_MOUNT_OPTIONS,
            Self::Xfs => "noatime,noexec,nodiratime",
        }
    }
}

impl FromStr for FilesystemKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ext4" => Ok(Self::Ext4),
            "xfs" => Ok(Self::Xfs),
            _ => Err(ConfigError::UnsupportedFilesystem(s.to_string())),
        }
    }
}

impl fmt::Display for FilesystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
