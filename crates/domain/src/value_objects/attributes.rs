//! The four core attributes shared by characters, NPCs and ships.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Attribute keys as stored on the actor sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKey {
    /// Strength
    St,
    /// Dexterity
    Dx,
    /// Intelligence
    Iq,
    /// Charisma
    Ca,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 4] = [Self::St, Self::Dx, Self::Iq, Self::Ca];

    /// Short key used on the sheet and as a talent target.
    pub fn key(&self) -> &'static str {
        match self {
            Self::St => "st",
            Self::Dx => "dx",
            Self::Iq => "iq",
            Self::Ca => "ca",
        }
    }

    /// Upper-case label used in roll announcements.
    pub fn label(&self) -> &'static str {
        match self {
            Self::St => "STRENGTH",
            Self::Dx => "DEXTERITY",
            Self::Iq => "INTELLIGENCE",
            Self::Ca => "CHARISMA",
        }
    }

    /// The stat a defender rolls against a weapon governed by this attribute.
    pub fn defense_stat(&self) -> AttributeKey {
        match self {
            Self::Dx => Self::Dx,
            _ => Self::St,
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AttributeKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "st" | "strength" => Ok(Self::St),
            "dx" | "dexterity" => Ok(Self::Dx),
            "iq" | "intelligence" => Ok(Self::Iq),
            "ca" | "charisma" => Ok(Self::Ca),
            _ => Err(DomainError::parse(format!("Unknown attribute: {}", s))),
        }
    }
}

/// Stored attribute values. Negative values are legal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub st: i32,
    pub dx: i32,
    pub iq: i32,
    pub ca: i32,
}

impl Attributes {
    pub fn new(st: i32, dx: i32, iq: i32, ca: i32) -> Self {
        Self { st, dx, iq, ca }
    }

    pub fn get(&self, key: AttributeKey) -> i32 {
        match key {
            AttributeKey::St => self.st,
            AttributeKey::Dx => self.dx,
            AttributeKey::Iq => self.iq,
            AttributeKey::Ca => self.ca,
        }
    }

    /// Returns a copy with each attribute shifted by `bonus(key)`.
    pub fn adjusted(&self, mut bonus: impl FnMut(AttributeKey) -> i32) -> Self {
        Self {
            st: self.st + bonus(AttributeKey::St),
            dx: self.dx + bonus(AttributeKey::Dx),
            iq: self.iq + bonus(AttributeKey::Iq),
            ca: self.ca + bonus(AttributeKey::Ca),
        }
    }
}
