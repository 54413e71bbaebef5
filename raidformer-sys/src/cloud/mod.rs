// SPDX-License-Identifier: GPL-3.0-only

//! Cloud block storage collaborator

mod ec2;
mod metadata;

pub use ec2::Ec2Cli;
pub use metadata::MetadataClient;

use raidformer_types::{InstanceIdentity, VolumeSpec};

use crate::Result;

/// Block volume operations needed to provision array members.
///
/// Calls are blocking and issued one at a time.
pub trait BlockStorage {
    /// Identity and placement of the instance this process runs on
    fn instance_identity(&self) -> Result<InstanceIdentity>;

    /// Create a volume and return its id once it can be attached.
    fn create_volume(&self, spec: &VolumeSpec) -> Result<String>;

    fn attach_volume(&self, volume_id: &str, instance_id: &str, device: &str) -> Result<()>;

    fn tag_volume(&self, volume_id: &str, key: &str, value: &str) -> Result<()>;

    /// Force-detach a volume and wait until it is free again.
    fn detach_volume(&self, volume_id: &str) -> Result<()>;

    fn delete_volume(&self, volume_id: &str) -> Result<()>;
}
