//! Starship subsystems and their discrete damage levels.
//!
//! Combat hits only ever raise a subsystem's level. The manual cycle used for
//! bookkeeping wraps around from destroyed back to nominal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Shields,
    Impulse,
    Warp,
    Phasers,
    Torpedoes,
    Sensors,
}

impl Subsystem {
    /// Canonical order; index + 1 is the d6 face that selects the subsystem.
    pub const ALL: [Subsystem; 6] = [
        Self::Shields,
        Self::Impulse,
        Self::Warp,
        Self::Phasers,
        Self::Torpedoes,
        Self::Sensors,
    ];

    /// Map a d6 face (1..=6) to a subsystem.
    pub fn from_die(face: i32) -> Result<Self, DomainError> {
        usize::try_from(face - 1)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or_else(|| DomainError::validation(format!("d6 face out of range: {}", face)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shields => "shields",
            Self::Impulse => "impulse",
            Self::Warp => "warp",
            Self::Phasers => "phasers",
            Self::Torpedoes => "torpedoes",
            Self::Sensors => "sensors",
        }
    }

    /// Whether this subsystem can be used as the firing weapon of an attack.
    pub fn is_weapon(&self) -> bool {
        matches!(self, Self::Phasers | Self::Torpedoes)
    }

    /// Sheet path of the stored level.
    pub fn level_path(&self) -> String {
        format!("system.subsystems.{}.value", self.as_str())
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subsystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|sub| sub.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown subsystem: {}", s)))
    }
}

/// Damage level of one subsystem: 0 nominal, 1 damaged, 2 offline, 3 destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DamageLevel(u8);

impl DamageLevel {
    pub const NOMINAL: DamageLevel = DamageLevel(0);
    pub const DAMAGED: DamageLevel = DamageLevel(1);
    pub const OFFLINE: DamageLevel = DamageLevel(2);
    pub const DESTROYED: DamageLevel = DamageLevel(3);

    pub fn new(level: u8) -> Result<Self, DomainError> {
        if level > 3 {
            return Err(DomainError::validation(format!(
                "damage level must be 0..=3, got {}",
                level
            )));
        }
        Ok(Self(level))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// (level + 1) mod 4
    pub fn cycled(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    /// Level 1: usable with a penalty.
    pub fn is_damaged(self) -> bool {
        self == Self::DAMAGED
    }

    /// Level 2 or worse: unusable.
    pub fn is_offline(self) -> bool {
        self >= Self::OFFLINE
    }

    pub fn status(self) -> &'static str {
        match self.0 {
            0 => "nominal",
            1 => "damaged",
            2 => "offline",
            _ => "destroyed",
        }
    }
}

impl TryFrom<u8> for DamageLevel {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DamageLevel> for u8 {
    fn from(value: DamageLevel) -> Self {
        value.0
    }
}

impl fmt::Display for DamageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.status())
    }
}

/// Severity of a combat hit on a subsystem (1 graze, 2 direct, 3 critical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const GRAZE: Severity = Severity(1);
    pub const DIRECT: Severity = Severity(2);
    pub const CRITICAL: Severity = Severity(3);

    pub fn new(value: u8) -> Result<Self, DomainError> {
        if !(1..=3).contains(&value) {
            return Err(DomainError::validation(format!(
                "severity must be 1..=3, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_level(self) -> DamageLevel {
        DamageLevel(self.0)
    }
}

impl TryFrom<u8> for Severity {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value.0
    }
}

/// Outcome of an automated hit against one subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SubsystemHitOutcome {
    /// The level was raised to the severity.
    #[serde(rename_all = "camelCase")]
    Applied {
        subsystem: Subsystem,
        previous: DamageLevel,
        level: DamageLevel,
    },
    /// The subsystem was already at or beyond the severity.
    #[serde(rename_all = "camelCase")]
    NoChange {
        subsystem: Subsystem,
        current: DamageLevel,
        severity: Severity,
    },
}

impl SubsystemHitOutcome {
    pub fn subsystem(&self) -> Subsystem {
        match self {
            Self::Applied { subsystem, .. } | Self::NoChange { subsystem, .. } => *subsystem,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Damage levels of all six subsystems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsystemDamage {
    pub shields: DamageLevel,
    pub impulse: DamageLevel,
    pub warp: DamageLevel,
    pub phasers: DamageLevel,
    pub torpedoes: DamageLevel,
    pub sensors: DamageLevel,
}

impl SubsystemDamage {
    pub fn level(&self, subsystem: Subsystem) -> DamageLevel {
        match subsystem {
            Subsystem::Shields => self.shields,
            Subsystem::Impulse => self.impulse,
            Subsystem::Warp => self.warp,
            Subsystem::Phasers => self.phasers,
            Subsystem::Torpedoes => self.torpedoes,
            Subsystem::Sensors => self.sensors,
        }
    }

    pub fn set(&mut self, subsystem: Subsystem, level: DamageLevel) {
        let slot = match subsystem {
            Subsystem::Shields => &mut self.shields,
            Subsystem::Impulse => &mut self.impulse,
            Subsystem::Warp => &mut self.warp,
            Subsystem::Phasers => &mut self.phasers,
            Subsystem::Torpedoes => &mut self.torpedoes,
            Subsystem::Sensors => &mut self.sensors,
        };
        *slot = level;
    }

    /// Decide the effect of a hit without writing it.
    pub fn evaluate_hit(&self, subsystem: Subsystem, severity: Severity) -> SubsystemHitOutcome {
        let current = self.level(subsystem);
        if severity.as_level() > current {
            SubsystemHitOutcome::Applied {
                subsystem,
                previous: current,
                level: severity.as_level(),
            }
        } else {
            SubsystemHitOutcome::NoChange {
                subsystem,
                current,
                severity,
            }
        }
    }

    /// Raise the subsystem to `severity` if it is currently lower.
    pub fn apply_hit(&mut self, subsystem: Subsystem, severity: Severity) -> SubsystemHitOutcome {
        let outcome = self.evaluate_hit(subsystem, severity);
        if let SubsystemHitOutcome::Applied { level, .. } = outcome {
            self.set(subsystem, level);
        }
        outcome
    }

    /// Manual bookkeeping toggle; returns the new level.
    pub fn cycle(&mut self, subsystem: Subsystem) -> DamageLevel {
        let next = self.level(subsystem).cycled();
        self.set(subsystem, next);
        next
    }
}
