//! Far Trek rules domain: actors, items, talents, checks and starship damage.
//!
//! No I/O happens here. Dice are rolled through a `FnMut(min, max) -> i32`
//! supplied by the caller.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod rules;
pub mod value_objects;

pub use aggregates::{Actor, ActorKind, PatchError, Resources, ShipState};
pub use entities::{EquipmentData, Item, ItemKind, SkillData, TalentData, WeaponData};
pub use error::DomainError;
pub use events::DomainEvent;
pub use ids::{ActorId, ItemId, UserId};

pub use value_objects::{
    aggregate_bonus, effective_rating, evaluate_check, survival_tn, ActorPatch, AttributeKey,
    Attributes, CheckKind, CheckResult, CheckSpec, CheckTerm, DamageLevel, DiceFormula,
    DiceParseError, DiceRollResult, EffectClass, FieldGuard, FieldUpdate, HealthPool,
    ModifierKind, PhaserMode, RangeCategory, Severity, ShipPool, ShipStats, Subsystem,
    SubsystemDamage, SubsystemHitOutcome, TalentModifier, WeaponClass,
};
