//! Cloud volume models

use serde::{Deserialize, Serialize};

/// Identity of the running instance, as published by the instance metadata
/// service identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceIdentity {
    pub instance_id: String,
    pub availability_zone: String,
    pub region: String,
}

/// Parameters for one volume creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSpec {
    /// Size in GiB; may be omitted when restoring from a snapshot
    pub size_gib: Option<u32>,

    pub availability_zone: String,

    /// Snapshot to restore into the new volume
    pub snapshot_id: Option<String>,
}

/// A volume created by this run and the slot it was attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRecord {
    pub volume_id: String,

    /// Device path given to the attach request (e.g. "/dev/sdf1")
    pub device: String,

    /// Device node the kernel exposes (e.g. "/dev/xvdf1")
    pub attached_device: String,

    pub snapshot_id: Option<String>,

    /// Whether the attach request succeeded
    pub attached: bool,
}
