// SPDX-License-Identifier: GPL-3.0-only

//! Volume provisioning
//!
//! Creates one volume per device slot (blank or restored from the slot's
//! snapshot), attaches it to this instance, tags it, then waits for the
//! kernel to expose every member. Volumes created by a failed run are
//! detached and deleted unless the configuration asks to keep them.

use raidformer_types::{DeviceSeries, InstanceIdentity, ProvisionConfig, VolumeRecord, VolumeSpec};
use tracing::{error, info, warn};

use crate::cloud::BlockStorage;
use crate::error::Result;
use crate::wait::wait_for_devices;

/// Tag key carrying the configured volume name
pub const NAME_TAG: &str = "Name";

pub fn provision_volumes<B>(
    storage: &B,
    config: &ProvisionConfig,
    devices: &DeviceSeries,
) -> Result<Vec<VolumeRecord>>
where
    B: BlockStorage + ?Sized,
{
    provision_volumes_with(storage, config, devices, |attached| {
        wait_for_devices(attached, &config.wait)
    })
}

/// Provision with an injected device wait.
pub fn provision_volumes_with<B, W>(
    storage: &B,
    config: &ProvisionConfig,
    devices: &DeviceSeries,
    wait: W,
) -> Result<Vec<VolumeRecord>>
where
    B: BlockStorage + ?Sized,
    W: FnOnce(&[String]) -> Result<()>,
{
    let mut created = Vec::with_capacity(devices.len());

    let result = storage.instance_identity().and_then(|identity| {
        create_and_attach(storage, config, devices, &identity, &mut created)?;
        wait(devices.attached())
    });

    match result {
        Ok(()) => {
            if let Ok(summary) = serde_json::to_string(&created) {
                info!("Provisioned volumes: {}", summary);
            }
            Ok(created)
        }
        Err(e) => {
            error!("Provisioning failed: {}", e);
            if config.rollback {
                rollback(storage, &created);
            } else if !created.is_empty() {
                let ids: Vec<&str> = created.iter().map(|v| v.volume_id.as_str()).collect();
                warn!("Leaving volumes in place: {}", ids.join(", "));
            }
            Err(e)
        }
    }
}

fn create_and_attach<B>(
    storage: &B,
    config: &ProvisionConfig,
    devices: &DeviceSeries,
    identity: &InstanceIdentity,
    created: &mut Vec<VolumeRecord>,
) -> Result<()>
where
    B: BlockStorage + ?Sized,
{
    for (index, (device, attached_device)) in devices.pairs().enumerate() {
        let snapshot_id = config.snapshot_for(index).map(ToString::to_string);
        match &snapshot_id {
            Some(snapshot) => info!("Restoring snapshot {} to device {}", snapshot, device),
            None => info!("Creating new volume on device {}", device),
        }

        let spec = VolumeSpec {
            size_gib: config.size_gib,
            availability_zone: identity.availability_zone.clone(),
            snapshot_id: snapshot_id.clone(),
        };
        let volume_id = storage.create_volume(&spec)?;
        info!("Created volume: {}", volume_id);
        created.push(VolumeRecord {
            volume_id: volume_id.clone(),
            device: device.to_string(),
            attached_device: attached_device.to_string(),
            snapshot_id,
            attached: false,
        });

        storage.attach_volume(&volume_id, &identity.instance_id, device)?;
        if let Some(record) = created.last_mut() {
            record.attached = true;
        }
        info!("Attached volume: {}", volume_id);

        storage.tag_volume(&volume_id, NAME_TAG, &config.tag)?;
    }
    Ok(())
}

/// Best-effort detach and delete, newest first. Failures are only logged.
fn rollback<B>(storage: &B, created: &[VolumeRecord])
where
    B: BlockStorage + ?Sized,
{
    for record in created.iter().rev() {
        if record.attached {
            warn!("Detaching volume {} from {}", record.volume_id, record.device);
            if let Err(e) = storage.detach_volume(&record.volume_id) {
                warn!("Failed to detach {}: {}", record.volume_id, e);
            }
        }
        warn!("Deleting volume {}", record.volume_id);
        if let Err(e) = storage.delete_volume(&record.volume_id) {
            warn!(
                "Failed to delete {}; remove it manually: {}",
                record.volume_id, e
            );
        }
    }
}
