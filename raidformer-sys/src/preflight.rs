// SPDX-License-Identifier: GPL-3.0-only

//! Pre-flight checks against the local device namespace
//!
//! Nothing here mutates the machine; a failed check aborts the run before any
//! volume is created or any command is run.

use std::path::{Path, PathBuf};

use raidformer_types::{ConfigError, ProvisionConfig, attached_name};
use tracing::{debug, warn};

/// Tools the command list relies on
const REQUIRED_TOOLS: [&str; 6] = ["mdadm", "dd", "pvcreate", "vgcreate", "lvcreate", "mount"];

/// Check the configuration against the live filesystem.
pub fn check_preconditions(config: &ProvisionConfig) -> Result<(), ConfigError> {
    check_preconditions_in(config, Path::new("/"))
}

/// Same as [`check_preconditions`], resolving absolute device paths under `root`.
pub fn check_preconditions_in(config: &ProvisionConfig, root: &Path) -> Result<(), ConfigError> {
    if config.attach || !config.snapshots.is_empty() {
        let existing = existing_devices_with_prefix(root, &config.device);
        if !existing.is_empty() {
            return Err(ConfigError::DevicesPresent {
                device: config.device.clone(),
                existing,
            });
        }
    }

    if rooted(root, &config.md_device).exists() {
        return Err(ConfigError::ArrayExists(config.md_device.clone()));
    }

    Ok(())
}

/// Log a warning for every tool the command list needs but PATH lacks.
pub fn warn_missing_tools() {
    for tool in REQUIRED_TOOLS {
        if which::which(tool).is_err() {
            warn!("{} not found in PATH; commands using it will fail", tool);
        }
    }
}

/// Device nodes whose name starts with the device base name, in either the
/// requested (`sdf*`) or the attached (`xvdf*`) form.
fn existing_devices_with_prefix(root: &Path, device: &str) -> Vec<String> {
    let device_path = Path::new(device);
    let (Some(parent), Some(base)) = (device_path.parent(), device_path.file_name()) else {
        return Vec::new();
    };
    let base = base.to_string_lossy().to_string();
    let attached_base = attached_name(&base);

    let dir = rooted(root, parent);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(error) => {
            debug!("Cannot list {:?}: {}", dir, error);
            return Vec::new();
        }
    };

    let mut existing: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with(&base) || name.starts_with(&attached_base))
        .map(|name| parent.join(name).display().to_string())
        .collect();
    existing.sort();
    existing
}

fn rooted(root: &Path, path: &Path) -> PathBuf {
    root.join(path.strip_prefix("/").unwrap_or(path))
}
