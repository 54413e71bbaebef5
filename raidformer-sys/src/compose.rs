// SPDX-License-Identifier: GPL-3.0-only

//! Command composer
//!
//! Turns the resolved configuration and the attached member devices into the
//! ordered shell commands that build the array, the LVM stack on top of it,
//! the optional filesystem, and the mount.

use raidformer_types::ProvisionConfig;

/// Array configuration scanned after assembly so the array reassembles on boot
pub const MDADM_CONF: &str = "/etc/mdadm.conf";
pub const FSTAB: &str = "/etc/fstab";
pub const CHUNK_SIZE_KIB: u32 = 256;
/// Bytes zeroed at the start of the array to clear stale signatures
pub const SIGNATURE_CLEAR_BYTES: u32 = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub steps: Vec<String>,
    pub dry_run: bool,
}

/// Build the full command list. `mountpoint_exists` is sampled by the caller
/// so composition stays free of side effects.
pub fn compose(
    config: &ProvisionConfig,
    attached: &[String],
    mountpoint_exists: bool,
) -> CommandPlan {
    let mut steps = raid_commands(config, attached);
    steps.extend(volume_commands(config, mountpoint_exists));
    CommandPlan {
        steps,
        dry_run: config.dry_run,
    }
}

fn raid_commands(config: &ProvisionConfig, attached: &[String]) -> Vec<String> {
    let md = config.md_device.display();
    vec![
        format!(
            "echo Y | mdadm --verbose --create {md} --level={} --chunk={CHUNK_SIZE_KIB} --raid-devices={} {}",
            config.raid_level,
            attached.len(),
            attached.join(" ")
        ),
        format!("mdadm --detail --scan > {MDADM_CONF}"),
        format!("dd if=/dev/zero of={md} bs={SIGNATURE_CLEAR_BYTES} count=1"),
        format!("pvcreate {md}"),
    ]
}

fn volume_commands(config: &ProvisionConfig, mountpoint_exists: bool) -> Vec<String> {
    let mut steps = vec![
        format!(
            "vgcreate {} {}",
            config.volume_group,
            config.md_device.display()
        ),
        format!(
            "lvcreate -l 100%VG -n {} {}",
            config.logical_volume, config.volume_group
        ),
    ];

    if config.wipe {
        steps.push(format!(
            "{} {}",
            config.filesystem.format_command(),
            config.logical_volume_path().display()
        ));
    }

    steps.push(format!("echo \"{}\" >> {FSTAB}", fstab_entry(config)));

    if !mountpoint_exists {
        steps.push(format!("mkdir -p {}", config.mountpoint.display()));
    }

    steps.push(format!("mount {}", config.mountpoint.display()));
    steps
}

/// fstab line for the logical volume
pub fn fstab_entry(config: &ProvisionConfig) -> String {
    format!(
        "{} {} {} {} 1 1",
        config.logical_volume_path().display(),
        config.mountpoint.display(),
        config.filesystem,
        config.filesystem.mount_options()
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use raidformer_types::{FilesystemKind, RaidLevel, WaitPolicy};

    use super::*;

    fn config(wipe: bool, filesystem: FilesystemKind) -> ProvisionConfig {
        ProvisionConfig {
            attach: false,
            count: 3,
            device: "/dev/sdf".to_string(),
            filesystem,
            logical_volume: "LogVolData".to_string(),
            mountpoint: PathBuf::from("/data"),
            md_device: PathBuf::from("/dev/md0"),
            raid_level: RaidLevel::Raid5,
            size_gib: None,
            dry_run: true,
            tag: "ebs_raid".to_string(),
            volume_group: "VolGroupData".to_string(),
            wipe,
            snapshots: Vec::new(),
            wait: WaitPolicy::default(),
            rollback: true,
            region: None,
        }
    }

    fn is_format(step: &str) -> bool {
        step.starts_with("mkfs.")
    }

    #[test]
    fn raid_create_lists_members_in_order() {
        let config = config(false, FilesystemKind::Ext4);
        let plan = compose(&config, config.device_series().attached(), true);

        assert_eq!(
            plan.steps[0],
            "echo Y | mdadm --verbose --create /dev/md0 --level=5 --chunk=256 --raid-devices=3 /dev/xvdf1 /dev/xvdf2 /dev/xvdf3"
        );
        assert!(plan.dry_run);
    }

    #[test]
    fn assembly_order_is_fixed() {
        let config = config(true, FilesystemKind::Xfs);
        let plan = compose(&config, config.device_series().attached(), false);

        assert_eq!(
            plan.steps[1..],
            [
                "mdadm --detail --scan > /etc/mdadm.conf",
                "dd if=/dev/zero of=/dev/md0 bs=512 count=1",
                "pvcreate /dev/md0",
                "vgcreate VolGroupData /dev/md0",
                "lvcreate -l 100%VG -n LogVolData VolGroupData",
                "mkfs.xfs /dev/VolGroupData/LogVolData",
                "echo \"/dev/VolGroupData/LogVolData /data xfs noatime,noexec,nodiratime 1 1\" >> /etc/fstab",
                "mkdir -p /data",
                "mount /data",
            ]
        );
    }

    #[test]
    fn format_only_when_wiping() {
        for kind in FilesystemKind::ALL {
            let keep = config(false, kind);
            let plan = compose(&keep, keep.device_series().attached(), true);
            assert!(!plan.steps.iter().any(|step| is_format(step)));

            let wipe = config(true, kind);
            let plan = compose(&wipe, wipe.device_series().attached(), true);
            assert_eq!(plan.steps.iter().filter(|step| is_format(step)).count(), 1);
        }
    }

    #[test]
    fn fstab_entry_is_written_without_wipe() {
        let config = config(false, FilesystemKind::Ext4);
        let plan = compose(&config, config.device_series().attached(), true);
        assert!(plan.steps.contains(
            &"echo \"/dev/VolGroupData/LogVolData /data ext4 defaults 1 1\" >> /etc/fstab"
                .to_string()
        ));
    }

    #[test]
    fn mount_is_last_and_mkdir_only_when_missing() {
        let config = config(false, FilesystemKind::Ext4);
        let attached = config.device_series();

        let existing = compose(&config, attached.attached(), true);
        assert_eq!(existing.steps.last().map(String::as_str), Some("mount /data"));
        assert!(!existing.steps.iter().any(|step| step.starts_with("mkdir")));

        let missing = compose(&config, attached.attached(), false);
        assert_eq!(missing.steps.last().map(String::as_str), Some("mount /data"));
        let mkdir = missing
            .steps
            .iter()
            .position(|step| step == "mkdir -p /data")
            .expect("mkdir step");
        assert_eq!(mkdir, missing.steps.len() - 2);
    }
}
