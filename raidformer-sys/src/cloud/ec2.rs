// SPDX-License-Identifier: GPL-3.0-only

//! EC2 volume operations through the `aws` command-line tool

use std::path::PathBuf;
use std::process::Command;

use raidformer_types::{InstanceIdentity, VolumeSpec};
use serde::Deserialize;
use tracing::{debug, info, warn};
use which::which;

use super::{BlockStorage, MetadataClient};
use crate::error::{Result, SysError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateVolumeResponse {
    volume_id: String,
}

/// AWS CLI wrapper bound to the current instance
pub struct Ec2Cli {
    /// Path to the aws binary
    binary_path: PathBuf,
    identity: InstanceIdentity,
    region: String,
}

impl Ec2Cli {
    /// Locate the aws binary and read the instance identity.
    ///
    /// `region` overrides the region reported by instance metadata.
    pub fn connect(region: Option<String>) -> Result<Self> {
        let binary_path = which("aws").map_err(|_| SysError::ToolNotFound("aws".to_string()))?;
        info!("Found aws binary at {:?}", binary_path);

        let identity = MetadataClient::new()?.identity()?;
        let region = region.unwrap_or_else(|| identity.region.clone());
        info!(
            "Running on {} in {} ({})",
            identity.instance_id, identity.availability_zone, region
        );

        Ok(Self {
            binary_path,
            identity,
            region,
        })
    }

    fn run(&self, args: &[String]) -> Result<String> {
        let mut full = vec!["ec2".to_string()];
        full.extend_from_slice(args);
        full.extend([
            "--region".to_string(),
            self.region.clone(),
            "--output".to_string(),
            "json".to_string(),
        ]);
        let rendered = format!("aws {}", full.join(" "));
        debug!("{}", rendered);

        let output = Command::new(&self.binary_path)
            .args(&full)
            .output()
            .map_err(|e| SysError::CommandFailed {
                command: rendered.clone(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("{} failed: {}", rendered, stderr.trim());
            return Err(SysError::CommandFailed {
                command: rendered,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn wait_available(&self, volume_id: &str) -> Result<()> {
        self.run(&owned(&["wait", "volume-available", "--volume-ids", volume_id]))?;
        Ok(())
    }
}

impl BlockStorage for Ec2Cli {
    fn instance_identity(&self) -> Result<InstanceIdentity> {
        Ok(self.identity.clone())
    }

    fn create_volume(&self, spec: &VolumeSpec) -> Result<String> {
        let stdout = self.run(&create_volume_args(spec))?;
        let volume_id = parse_create_volume(&stdout)?;
        self.wait_available(&volume_id)?;
        Ok(volume_id)
    }

    fn attach_volume(&self, volume_id: &str, instance_id: &str, device: &str) -> Result<()> {
        self.run(&owned(&[
            "attach-volume",
            "--volume-id",
            volume_id,
            "--instance-id",
            instance_id,
            "--device",
            device,
        ]))?;
        Ok(())
    }

    fn tag_volume(&self, volume_id: &str, key: &str, value: &str) -> Result<()> {
        let tag = format!("Key={key},Value={value}");
        self.run(&owned(&[
            "create-tags",
            "--resources",
            volume_id,
            "--tags",
            tag.as_str(),
        ]))?;
        Ok(())
    }

    fn detach_volume(&self, volume_id: &str) -> Result<()> {
        self.run(&owned(&["detach-volume", "--volume-id", volume_id, "--force"]))?;
        self.wait_available(volume_id)
    }

    fn delete_volume(&self, volume_id: &str) -> Result<()> {
        self.run(&owned(&["delete-volume", "--volume-id", volume_id]))?;
        Ok(())
    }
}

fn owned(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

fn create_volume_args(spec: &VolumeSpec) -> Vec<String> {
    let mut args = owned(&[
        "create-volume",
        "--availability-zone",
        spec.availability_zone.as_str(),
    ]);
    if let Some(size) = spec.size_gib {
        args.push("--size".to_string());
        args.push(size.to_string());
    }
    if let Some(snapshot_id) = &spec.snapshot_id {
        args.push("--snapshot-id".to_string());
        args.push(snapshot_id.clone());
    }
    args
}

fn parse_create_volume(stdout: &str) -> Result<String> {
    let response: CreateVolumeResponse =
        serde_json::from_str(stdout).map_err(|e| SysError::UnexpectedOutput {
            command: "aws ec2 create-volume".to_string(),
            reason: e.to_string(),
        })?;
    Ok(response.volume_id)
}
