//! Response payloads
//!
//! Structured results only: totals, breakdowns and state changes. Turning
//! them into chat cards is the client's business.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fartrek_domain::rules::{EffectResolution, PoolChange};
use fartrek_domain::{
    Attributes, CheckResult, DiceRollResult, PhaserMode, ShipPool, Subsystem,
};

// =============================================================================
// Response Result
// =============================================================================

/// Envelope for every API response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseResult {
    /// Operation succeeded
    Success {
        /// Optional data payload (varies by request type)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// Operation failed
    Error {
        /// Error classification code
        code: ErrorCode,
        /// Human-readable error message
        message: String,
    },
}

impl ResponseResult {
    /// Create a success response with data
    pub fn success<T: Serialize>(data: T) -> Self {
        ResponseResult::Success {
            data: Some(serde_json::to_value(data).unwrap_or_default()),
        }
    }

    /// Create a success response without data
    pub fn success_empty() -> Self {
        ResponseResult::Success { data: None }
    }

    /// Create an error response
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ResponseResult::Error {
            code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseResult::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseResult::Error { .. })
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Request was malformed or invalid
    BadRequest,
    /// Invoker identity missing or malformed
    Unauthorized,
    /// Invoker lacks update rights on the actor
    Forbidden,
    NotFound,
    /// Actor state changed underneath the request
    Conflict,
    /// A rule precondition does not hold (no fate, subsystem offline, ...)
    PreconditionFailed,
    InternalError,
}

// =============================================================================
// Actor sheet
// =============================================================================

/// Stored actor plus the values the sheet derives from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSheetResponse {
    pub actor: serde_json::Value,
    /// Attributes including attribute talents.
    pub effective_attributes: Attributes,
    pub fate_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield_percent: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shields_active: Option<bool>,
}

// =============================================================================
// Character checks
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResponse {
    pub actor_id: Uuid,
    pub check: CheckResult,
    /// Whether a fate reroll can be spent on this roll right now.
    pub fate_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponAttackResponse {
    #[serde(flatten)]
    pub roll: RollResponse,
    pub item_id: Uuid,
    /// Defender's stat label, "DEXTERITY" or "STRENGTH".
    pub defense_stat: String,
    /// Base TN of the consciousness check the hit forces.
    #[serde(rename = "weaponTN")]
    pub weapon_tn: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PhaserMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "itemType", rename_all = "camelCase")]
pub enum ItemRollResponse {
    Skill(RollResponse),
    Weapon(WeaponAttackResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalResponse {
    #[serde(flatten)]
    pub roll: RollResponse,
    pub wounds_before: u32,
    pub wounds_after: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponModeResponse {
    pub item_id: Uuid,
    pub weapon: String,
    pub previous: PhaserMode,
    pub mode: PhaserMode,
    #[serde(rename = "weaponTN")]
    pub weapon_tn: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FateRerollResponse {
    pub actor_id: Uuid,
    pub label: String,
    pub roll: DiceRollResult,
    pub remaining_fate: u32,
}

// =============================================================================
// Ship subsystems and combat
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemCycleResponse {
    pub subsystem: Subsystem,
    pub previous: u8,
    pub level: u8,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemHitResponse {
    /// The d6 face that picked the subsystem.
    pub die: i32,
    pub subsystem: Subsystem,
    pub severity: u8,
    /// False when the subsystem was already at or beyond the severity.
    pub applied: bool,
    pub previous: u8,
    pub level: u8,
}

/// What happened on the target's side of a ship attack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RemoteDamageData {
    /// The attack roll missed; no effect roll was made.
    Missed,
    /// No target ship; the outcome is reported only.
    NoTarget,
    #[serde(rename_all = "camelCase")]
    Refused { target_id: Uuid, reason: String },
    #[serde(rename_all = "camelCase")]
    ShieldsDrained { target_id: Uuid, change: PoolChange },
    #[serde(rename_all = "camelCase")]
    SubsystemHit {
        target_id: Uuid,
        hit: SubsystemHitResponse,
    },
    /// The target changed underneath the write; nothing was applied.
    #[serde(rename_all = "camelCase")]
    Failed { target_id: Uuid, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipAttackResponse {
    pub actor_id: Uuid,
    pub attack: CheckResult,
    pub hit: bool,
    /// Rating subtracted in the effect roll.
    pub target_rating: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<EffectResolution>,
    pub remote: RemoteDamageData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingHitResponse {
    pub actor_id: Uuid,
    /// Which pool took the hit.
    pub pool: ShipPool,
    /// The 1d6x5 drain roll when the shields took it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drain_roll: Option<DiceRollResult>,
    pub change: PoolChange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairResponse {
    pub actor_id: Uuid,
    pub roll: CheckResult,
    /// Separate 1d6x5 roll for shield repairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield_roll: Option<DiceRollResult>,
    pub change: PoolChange,
}

// =============================================================================
// Announcements
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementData {
    pub sequence: u64,
    pub event_type: String,
    pub actor_id: Uuid,
    /// RFC 3339 timestamp
    pub published_at: String,
    pub event: serde_json::Value,
}
