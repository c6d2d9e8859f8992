//! Partial updates of named actor fields.
//!
//! A patch lists the leaf fields it writes and, optionally, the values some
//! fields must still hold for the write to go through (compare-and-set).
//! Patches are applied all-or-nothing by [`crate::Actor::apply_patch`].

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;
use crate::value_objects::{DamageLevel, PhaserMode, ShipPool, Subsystem};

/// Expected current value of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum FieldGuard {
    FatePoints { expected: u32 },
    Wounds { expected: u32 },
    SubsystemLevel {
        subsystem: Subsystem,
        expected: DamageLevel,
    },
    PoolValue { pool: ShipPool, expected: i32 },
    #[serde(rename_all = "camelCase")]
    WeaponMode { item_id: ItemId, expected: PhaserMode },
}

impl FieldGuard {
    pub fn path(&self) -> String {
        match self {
            Self::FatePoints { .. } => FATE_PATH.to_string(),
            Self::Wounds { .. } => WOUNDS_PATH.to_string(),
            Self::SubsystemLevel { subsystem, .. } => subsystem.level_path(),
            Self::PoolValue { pool, .. } => pool.value_path(),
            Self::WeaponMode { item_id, .. } => weapon_mode_path(*item_id),
        }
    }
}

fn weapon_mode_path(item_id: ItemId) -> String {
    format!("items.{}.flags.phaserMode", item_id)
}

/// A single leaf field write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum FieldUpdate {
    Wounds { value: u32 },
    FatePoints { value: u32 },
    SubsystemLevel {
        subsystem: Subsystem,
        level: DamageLevel,
    },
    PoolValue { pool: ShipPool, value: i32 },
    /// Sets the firing mode flag and rewrites the weapon's stored TN.
    #[serde(rename_all = "camelCase")]
    WeaponMode { item_id: ItemId, mode: PhaserMode },
}

pub const WOUNDS_PATH: &str = "system.wounds.value";
pub const FATE_PATH: &str = "system.resources.fate.value";

impl FieldUpdate {
    pub fn path(&self) -> String {
        match self {
            Self::Wounds { .. } => WOUNDS_PATH.to_string(),
            Self::FatePoints { .. } => FATE_PATH.to_string(),
            Self::SubsystemLevel { subsystem, .. } => subsystem.level_path(),
            Self::PoolValue { pool, .. } => pool.value_path(),
            Self::WeaponMode { item_id, .. } => weapon_mode_path(*item_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorPatch {
    pub guards: Vec<FieldGuard>,
    pub updates: Vec<FieldUpdate>,
}

impl ActorPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, update: FieldUpdate) -> Self {
        self.updates.push(update);
        self
    }

    pub fn guard(mut self, guard: FieldGuard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Paths written by this patch, in order.
    pub fn paths(&self) -> Vec<String> {
        self.updates.iter().map(FieldUpdate::path).collect()
    }
}
