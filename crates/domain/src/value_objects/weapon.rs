//! Weapon firing modes and range categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Firing mode of a stun-capable weapon.
///
/// Each mode fixes the target number the struck character must beat on
/// their consciousness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaserMode {
    #[default]
    Stun,
    Heavy,
    Kill,
}

impl PhaserMode {
    /// Cycle order: stun -> heavy -> kill -> stun.
    pub fn next(self) -> Self {
        match self {
            Self::Stun => Self::Heavy,
            Self::Heavy => Self::Kill,
            Self::Kill => Self::Stun,
        }
    }

    pub fn target_number(self) -> i32 {
        match self {
            Self::Stun => 14,
            Self::Heavy => 17,
            Self::Kill => 20,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Stun => "STUN",
            Self::Heavy => "HEAVY STUN",
            Self::Kill => "KILL",
        }
    }
}

impl fmt::Display for PhaserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (TN {})", self.label(), self.target_number())
    }
}

impl FromStr for PhaserMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stun" => Ok(Self::Stun),
            "heavy" => Ok(Self::Heavy),
            "kill" => Ok(Self::Kill),
            _ => Err(DomainError::parse(format!("Unknown phaser mode: {}", s))),
        }
    }
}

/// Range category used as the target of attack talents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeCategory {
    Melee,
    Ranged,
}

impl RangeCategory {
    /// Map a free-text weapon range label to a category.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "melee" | "close" | "touch" | "reach" | "engaged" => Self::Melee,
            _ => Self::Ranged,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Melee => "melee",
            Self::Ranged => "ranged",
        }
    }
}

impl fmt::Display for RangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
