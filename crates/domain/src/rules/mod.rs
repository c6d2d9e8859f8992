//! Rules that turn an actor snapshot into rolls and patches.

pub mod checks;
pub mod ship;

pub use checks::{
    attribute_test, initiative, item_check, skill_check, survival, survival_patch,
    toggle_weapon_mode, weapon_attack, ItemCheck, ModeToggle, WeaponAttack,
};
pub use ship::{
    cycle_subsystem, damage_structure, drain_shields, effect_roll, incoming_hit_target, repair,
    repair_amount, restore_pool, shield_roll, ship_attack, subsystem_die, subsystem_hit,
    EffectResolution, IncomingHit, PoolChange, SubsystemCycle, DAMAGED_WEAPON_PENALTY,
};
