//! RAID levels accepted by the array assembly step.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// RAID level passed to `mdadm --level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RaidLevel {
    /// Striping
    Raid0,
    /// Mirroring
    Raid1,
    /// Striping with dedicated parity
    Raid4,
    /// Striping with distributed parity
    Raid5,
    /// Striping with double distributed parity
    Raid6,
    /// Mirrored stripes
    Raid10,
}

impl RaidLevel {
    pub const ALL: [RaidLevel; 6] = [
        Self::Raid0,
        Self::Raid1,
        Self::Raid4,
        Self::Raid5,
        Self::Raid6,
        Self::Raid10,
    ];

    /// Numeric level as understood by mdadm
    pub fn number(self) -> u8 {
        match self {
            Self::Raid0 => 0,
            Self::Raid1 => 1,
            Self::Raid4 => 4,
            Self::Raid5 => 5,
            Self::Raid6 => 6,
            Self::Raid10 => 10,
        }
    }

    /// Levels built from mirrored pairs need an even number of members.
    pub fn requires_even_members(self) -> bool {
        matches!(self, Self::Raid10)
    }

    /// Check that `count` member devices can form an array at this level.
    pub fn check_member_count(self, count: u32) -> Result<(), ConfigError> {
        if self.requires_even_members() && count % 2 != 0 {
            return Err(ConfigError::OddMemberCount {
                level: self.number(),
                count,
            });
        }
        Ok(())
    }
}

impl TryFrom<u8> for RaidLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|level| level.number() == value)
            .ok_or(ConfigError::UnsupportedRaidLevel(value))
    }
}

impl From<RaidLevel> for u8 {
    fn from(level: RaidLevel) -> Self {
        level.number()
    }
}

impl fmt::Display for RaidLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
