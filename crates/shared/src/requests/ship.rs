use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fartrek_domain::{ShipPool, Subsystem};

/// Automated hit on a random subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemHitRequest {
    /// 1 graze, 2 direct hit, 3 critical
    pub severity: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipAttackRequest {
    #[serde(default = "default_weapon")]
    pub weapon: Subsystem,
    /// Crew skill added to the attack roll.
    #[serde(default)]
    pub skill: i32,
    /// Optional to-hit TN; a miss skips the effect roll.
    #[serde(default)]
    pub to_hit: Option<i32>,
    /// Explicit target. Falls back to the invoker's selected target.
    #[serde(default)]
    pub target_id: Option<Uuid>,
    /// Rating to subtract when no target ship can be resolved.
    #[serde(default)]
    pub target_rating: Option<i32>,
    /// Situational modifier on the effect roll.
    #[serde(default)]
    pub modifier: i32,
}

fn default_weapon() -> Subsystem {
    Subsystem::Phasers
}

/// Incoming hit on the invoker's ship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingHitRequest {
    /// Structure damage to apply if the shields do not take the hit.
    #[serde(default)]
    pub structure_damage: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequest {
    pub pool: ShipPool,
    #[serde(default)]
    pub skill: i32,
}
