//! Device naming
//!
//! Volumes are attached under the `sd*` names EC2 documents, but a Xen based
//! instance exposes them to the kernel under `xvd*`. The mapping between the
//! two is a fixed prefix substitution.

use serde::{Deserialize, Serialize};

/// Names EC2 accepts as attachment points for data volumes
pub const ALLOWED_DEVICES: [&str; 11] = [
    "/dev/sdf", "/dev/sdg", "/dev/sdh", "/dev/sdi", "/dev/sdj", "/dev/sdk", "/dev/sdl", "/dev/sdm",
    "/dev/sdn", "/dev/sdo", "/dev/sdp",
];

pub const DEFAULT_DEVICE: &str = ALLOWED_DEVICES[0];

/// Prefix used when requesting an attachment
pub const BLOCK_DEVICE_PREFIX: &str = "sd";

/// Prefix the kernel uses for the attached device node
pub const ATTACHED_DEVICE_PREFIX: &str = "xvd";

pub fn is_allowed_device(device: &str) -> bool {
    ALLOWED_DEVICES.contains(&device)
}

/// Map a requested device path to the node the kernel exposes after attachment.
pub fn attached_name(device: &str) -> String {
    device.replace(BLOCK_DEVICE_PREFIX, ATTACHED_DEVICE_PREFIX)
}

/// Ordered member device paths, requested and attached, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSeries {
    requested: Vec<String>,
    attached: Vec<String>,
}

impl DeviceSeries {
    /// Build `count` entries by appending a 1-based index to `base`
    /// (`/dev/sdf` → `/dev/sdf1`, `/dev/sdf2`, ...).
    pub fn new(base: &str, count: u32) -> Self {
        let requested: Vec<String> = (1..=count).map(|n| format!("{base}{n}")).collect();
        let attached = requested.iter().map(|name| attached_name(name)).collect();
        Self {
            requested,
            attached,
        }
    }

    /// Paths used when attaching volumes through the cloud API
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// Paths the kernel exposes; these become the RAID members
    pub fn attached(&self) -> &[String] {
        &self.attached
    }

    pub fn len(&self) -> usize {
        self.requested.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requested.is_empty()
    }

    /// Iterate `(requested, attached)` pairs in order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.requested
            .iter()
            .map(String::as_str)
            .zip(self.attached.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_appends_one_based_index() {
        let series = DeviceSeries::new("/dev/sdf", 3);
        assert_eq!(series.requested(), ["/dev/sdf1", "/dev/sdf2", "/dev/sdf3"]);
        assert_eq!(series.attached(), ["/dev/xvdf1", "/dev/xvdf2", "/dev/xvdf3"]);
    }

    #[test]
    fn series_length_matches_count() {
        for base in ALLOWED_DEVICES {
            for count in 1..=12u32 {
                let series = DeviceSeries::new(base, count);
                assert_eq!(series.len(), count as usize);
                assert_eq!(series.attached().len(), count as usize);
                for (i, (requested, attached)) in series.pairs().enumerate() {
                    assert_eq!(requested, format!("{base}{}", i + 1));
                    assert_eq!(attached, attached_name(requested));
                }
            }
        }
    }

    #[test]
    fn attached_name_substitutes_every_occurrence() {
        assert_eq!(attached_name("/dev/sdp11"), "/dev/xvdp11");
        assert_eq!(attached_name("/dev/sdsd"), "/dev/xvdxvd");
        assert_eq!(attached_name("/dev/nvme1n1"), "/dev/nvme1n1");
    }

    #[test]
    fn only_documented_devices_are_allowed() {
        assert!(is_allowed_device(DEFAULT_DEVICE));
        assert!(is_allowed_device("/dev/sdp"));
        assert!(!is_allowed_device("/dev/sda"));
        assert!(!is_allowed_device("/dev/sdf1"));
        assert!(!is_allowed_device("/dev/sdq"));
    }
}
