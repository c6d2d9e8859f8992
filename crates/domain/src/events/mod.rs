//! Domain Events
//!
//! Announcements of completed rolls and state changes. The engine publishes
//! them after the matching write has gone through; their presentation is up
//! to whoever listens.

use serde::{Deserialize, Serialize};

use crate::ids::{ActorId, ItemId};
use crate::rules::{EffectResolution, PoolChange};
use crate::value_objects::{
    AttributeKey, CheckResult, DamageLevel, DiceRollResult, PhaserMode, Subsystem,
    SubsystemHitOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainEvent {
    // Character checks
    #[serde(rename_all = "camelCase")]
    CheckRolled {
        actor_id: ActorId,
        result: CheckResult,
    },
    #[serde(rename_all = "camelCase")]
    WeaponAttackRolled {
        actor_id: ActorId,
        item_id: ItemId,
        result: CheckResult,
        defense_stat: AttributeKey,
        weapon_tn: i32,
        mode: Option<PhaserMode>,
    },
    #[serde(rename_all = "camelCase")]
    SurvivalResolved {
        actor_id: ActorId,
        result: CheckResult,
        wounds: u32,
    },
    #[serde(rename_all = "camelCase")]
    FateRerolled {
        actor_id: ActorId,
        label: String,
        roll: DiceRollResult,
        remaining_fate: u32,
    },
    #[serde(rename_all = "camelCase")]
    WeaponModeChanged {
        actor_id: ActorId,
        item_id: ItemId,
        weapon: String,
        mode: PhaserMode,
        weapon_tn: i32,
    },

    // Ship subsystems
    #[serde(rename_all = "camelCase")]
    SubsystemCycled {
        actor_id: ActorId,
        subsystem: Subsystem,
        level: DamageLevel,
    },
    #[serde(rename_all = "camelCase")]
    SubsystemHit {
        actor_id: ActorId,
        die: i32,
        outcome: SubsystemHitOutcome,
    },

    // Ship combat
    #[serde(rename_all = "camelCase")]
    ShipAttackRolled {
        actor_id: ActorId,
        weapon: Subsystem,
        result: CheckResult,
    },
    #[serde(rename_all = "camelCase")]
    ShipEffectResolved {
        actor_id: ActorId,
        target_id: Option<ActorId>,
        resolution: EffectResolution,
    },
    #[serde(rename_all = "camelCase")]
    ShieldsDrained {
        actor_id: ActorId,
        change: PoolChange,
    },
    #[serde(rename_all = "camelCase")]
    StructureDamaged {
        actor_id: ActorId,
        change: PoolChange,
    },
    #[serde(rename_all = "camelCase")]
    PoolRepaired {
        actor_id: ActorId,
        roll: CheckResult,
        change: PoolChange,
    },
    /// The invoker could not update the target; their rolls still stand.
    #[serde(rename_all = "camelCase")]
    RemoteDamageRefused {
        actor_id: ActorId,
        target_id: ActorId,
        reason: String,
    },
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CheckRolled { .. } => "check_rolled",
            Self::WeaponAttackRolled { .. } => "weapon_attack_rolled",
            Self::SurvivalResolved { .. } => "survival_resolved",
            Self::FateRerolled { .. } => "fate_rerolled",
            Self::WeaponModeChanged { .. } => "weapon_mode_changed",
            Self::SubsystemCycled { .. } => "subsystem_cycled",
            Self::SubsystemHit { .. } => "subsystem_hit",
            Self::ShipAttackRolled { .. } => "ship_attack_rolled",
            Self::ShipEffectResolved { .. } => "ship_effect_resolved",
            Self::ShieldsDrained { .. } => "shields_drained",
            Self::StructureDamaged { .. } => "structure_damaged",
            Self::PoolRepaired { .. } => "pool_repaired",
            Self::RemoteDamageRefused { .. } => "remote_damage_refused",
        }
    }

    /// The actor the event is spoken by.
    pub fn actor_id(&self) -> ActorId {
        match self {
            Self::CheckRolled { actor_id, .. }
            | Self::WeaponAttackRolled { actor_id, .. }
            | Self::SurvivalResolved { actor_id, .. }
            | Self::FateRerolled { actor_id, .. }
            | Self::WeaponModeChanged { actor_id, .. }
            | Self::SubsystemCycled { actor_id, .. }
            | Self::SubsystemHit { actor_id, .. }
            | Self::ShipAttackRolled { actor_id, .. }
            | Self::ShipEffectResolved { actor_id, .. }
            | Self::ShieldsDrained { actor_id, .. }
            | Self::StructureDamaged { actor_id, .. }
            | Self::PoolRepaired { actor_id, .. }
            | Self::RemoteDamageRefused { actor_id, .. } => *actor_id,
        }
    }
}
