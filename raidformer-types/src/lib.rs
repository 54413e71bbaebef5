// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for raidformer
//!
//! These types are shared between the system layer (`raidformer-sys`) and the
//! command-line front end (`raidformer`):
//!
//! - `ProvisionConfig` → the fully resolved run options, passed explicitly to every stage
//! - `DeviceSeries` → requested block-device paths and their attached counterparts
//! - `RaidLevel` / `FilesystemKind` → the supported assembly and format tables
//! - `VolumeRecord` → a cloud volume created during this run
//!
//! Nothing in this crate performs I/O.

pub mod config;
pub mod devices;
pub mod error;
pub mod filesystem;
pub mod raid;
pub mod volume;

pub use config::{ProvisionConfig, WaitPolicy, parse_snapshot_list};
pub use devices::{
    ALLOWED_DEVICES, ATTACHED_DEVICE_PREFIX, BLOCK_DEVICE_PREFIX, DEFAULT_DEVICE, DeviceSeries,
    attached_name, is_allowed_device,
};
pub use error::ConfigError;
pub use filesystem::FilesystemKind;
pub use raid::RaidLevel;
pub use volume::{InstanceIdentity, VolumeRecord, VolumeSpec};
