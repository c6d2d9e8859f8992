//! Value objects - Immutable objects defined by their attributes

mod attributes;
mod check;
mod dice;
mod patch;
mod ship_combat;
mod ship_stats;
mod subsystem;
mod survival;
mod talent;
mod weapon;

pub use attributes::{AttributeKey, Attributes};
pub use check::{evaluate_check, CheckKind, CheckResult, CheckSpec, CheckTerm};
pub use dice::{DiceFormula, DiceParseError, DiceRollResult};
pub use patch::{ActorPatch, FieldGuard, FieldUpdate, FATE_PATH, WOUNDS_PATH};
pub use ship_combat::EffectClass;
pub use ship_stats::{effective_rating, HealthPool, ShipPool, ShipStats};
pub use subsystem::{DamageLevel, Severity, Subsystem, SubsystemDamage, SubsystemHitOutcome};
pub use survival::{survival_tn, WeaponClass, WOUND_TN_STEP};
pub use talent::{aggregate_bonus, ModifierKind, TalentModifier, ALL_TARGETS};
pub use weapon::{PhaserMode, RangeCategory};
