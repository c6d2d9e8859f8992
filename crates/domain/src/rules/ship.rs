//! Starship combat: attack and effect rolls, subsystem hits, shield and
//! structure damage, and repairs.
//!
//! Each function reads a ship snapshot and returns the roll to make or the
//! patch to write; nothing here mutates an actor directly.

use serde::{Deserialize, Serialize};

use crate::aggregates::{Actor, ShipState};
use crate::error::DomainError;
use crate::value_objects::{
    ActorPatch, CheckKind, CheckResult, CheckSpec, DamageLevel, DiceFormula, EffectClass,
    FieldGuard, FieldUpdate, Severity, ShipPool, Subsystem, SubsystemHitOutcome,
};

/// Penalty for firing through a damaged weapon subsystem.
pub const DAMAGED_WEAPON_PENALTY: i32 = -2;

/// Attack roll: 3d6 + tactical + skill, with the firing subsystem's state.
///
/// Fails before any dice are rolled when the firing subsystem is offline.
pub fn ship_attack(
    attacker: &Actor,
    weapon: Subsystem,
    skill: i32,
    to_hit: Option<i32>,
) -> Result<CheckSpec, DomainError> {
    let ship = attacker.require_ship()?;
    if !weapon.is_weapon() {
        return Err(DomainError::validation(format!(
            "{} is not a weapon subsystem",
            weapon
        )));
    }
    let level = ship.level(weapon);
    if level.is_offline() {
        return Err(DomainError::constraint(format!(
            "{} are {}",
            weapon,
            level.status()
        )));
    }
    let mut spec = CheckSpec::new(CheckKind::ShipAttack, format!("{} attack", weapon))
        .term("TACTICAL", ship.stats.tactical)
        .term("SKILL", skill);
    if level.is_damaged() {
        spec = spec.term("DAMAGED", DAMAGED_WEAPON_PENALTY);
    }
    if let Some(tn) = to_hit {
        spec = spec.with_target(tn);
    }
    Ok(spec)
}

/// Effect roll: 3d6 + weapon rating - target rating (+ situational modifier).
pub fn effect_roll(attacker: &Actor, target_rating: i32, modifier: i32) -> Result<CheckSpec, DomainError> {
    let ship = attacker.require_ship()?;
    Ok(CheckSpec::new(CheckKind::ShipEffect, "Weapon effect")
        .term("WR", ship.stats.weapon_rating)
        .term("TARGET SR", -target_rating)
        .term("MOD", modifier))
}

/// Classified effect roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectResolution {
    pub roll: CheckResult,
    pub class: EffectClass,
    pub severity: Option<Severity>,
}

impl EffectResolution {
    pub fn from_roll(roll: CheckResult) -> Self {
        let class = EffectClass::classify(roll.total);
        Self {
            severity: class.severity(),
            class,
            roll,
        }
    }
}

/// A planned write of one pool value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolChange {
    pub pool: ShipPool,
    pub amount: i32,
    pub previous: i32,
    pub current: i32,
    pub max: i32,
}

impl PoolChange {
    /// Writes `current`, guarded on the pool still holding `previous`.
    pub fn patch(&self) -> ActorPatch {
        ActorPatch::new()
            .guard(FieldGuard::PoolValue {
                pool: self.pool,
                expected: self.previous,
            })
            .set(FieldUpdate::PoolValue {
                pool: self.pool,
                value: self.current,
            })
    }
}

/// Shields lose `amount` percentage points, floored at zero.
pub fn drain_shields(ship: &ShipState, amount: i32) -> PoolChange {
    PoolChange {
        pool: ShipPool::Shields,
        amount,
        previous: ship.shields.value,
        current: ship.shields.drained(amount),
        max: ship.shields.max,
    }
}

/// Where an incoming hit lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncomingHit {
    /// Shields are up and holding: drain 1d6x5 from them.
    Shields,
    /// Shields down or depleted: the entered amount hits structure.
    Structure,
}

pub fn incoming_hit_target(ship: &ShipState) -> IncomingHit {
    if ship.shields_active() && ship.shields.value > 0 {
        IncomingHit::Shields
    } else {
        IncomingHit::Structure
    }
}

/// Structure loses `amount`, floored at zero.
pub fn damage_structure(ship: &ShipState, amount: i32) -> Result<PoolChange, DomainError> {
    if amount < 0 {
        return Err(DomainError::validation("structure damage cannot be negative"));
    }
    Ok(PoolChange {
        pool: ShipPool::Structure,
        amount,
        previous: ship.structure.value,
        current: ship.structure.drained(amount),
        max: ship.structure.max,
    })
}

/// Repair roll: 3d6 + skill + engineering.
///
/// Shield repairs need working generators.
pub fn repair(ship_actor: &Actor, pool: ShipPool, skill: i32) -> Result<CheckSpec, DomainError> {
    let ship = ship_actor.require_ship()?;
    if pool == ShipPool::Shields && ship.subsystems.shields.is_offline() {
        return Err(DomainError::constraint("shield generators are offline"));
    }
    Ok(CheckSpec::new(CheckKind::Repair, format!("Repair {}", pool))
        .term("SKILL", skill)
        .term("ENGINEERING", ship.stats.engineering))
}

/// How much a repair restores. Shields use their own 1d6x5 roll; structure
/// and power get a fifth of the repair total, at least 1.
pub fn repair_amount(pool: ShipPool, repair_total: i32, shield_roll: Option<i32>) -> i32 {
    match pool {
        ShipPool::Shields => shield_roll.unwrap_or(0).max(0),
        ShipPool::Structure | ShipPool::Power => repair_total.div_euclid(5).max(1),
    }
}

/// Add `amount` to the pool, capped at its maximum.
pub fn restore_pool(ship: &ShipState, pool: ShipPool, amount: i32) -> PoolChange {
    let current = ship.pool(pool);
    PoolChange {
        pool,
        amount,
        previous: current.value,
        current: current.restored(amount),
        max: current.max,
    }
}

/// Evaluate an automated hit and the guarded patch that writes it.
///
/// The guard pins the level that was read, so a concurrent hit that already
/// raised the subsystem makes this write fail instead of lowering it.
pub fn subsystem_hit(
    target: &Actor,
    subsystem: Subsystem,
    severity: Severity,
) -> Result<(SubsystemHitOutcome, Option<ActorPatch>), DomainError> {
    let ship = target.require_ship()?;
    let outcome = ship.subsystems.evaluate_hit(subsystem, severity);
    let patch = match outcome {
        SubsystemHitOutcome::Applied {
            subsystem,
            previous,
            level,
        } => Some(
            ActorPatch::new()
                .guard(FieldGuard::SubsystemLevel {
                    subsystem,
                    expected: previous,
                })
                .set(FieldUpdate::SubsystemLevel { subsystem, level }),
        ),
        SubsystemHitOutcome::NoChange { .. } => None,
    };
    Ok((outcome, patch))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsystemCycle {
    pub subsystem: Subsystem,
    pub previous: DamageLevel,
    pub level: DamageLevel,
    pub patch: ActorPatch,
}

/// Manual bookkeeping toggle: (level + 1) mod 4.
pub fn cycle_subsystem(target: &Actor, subsystem: Subsystem) -> Result<SubsystemCycle, DomainError> {
    let ship = target.require_ship()?;
    let previous = ship.level(subsystem);
    let level = previous.cycled();
    Ok(SubsystemCycle {
        subsystem,
        previous,
        level,
        patch: ActorPatch::new()
            .guard(FieldGuard::SubsystemLevel {
                subsystem,
                expected: previous,
            })
            .set(FieldUpdate::SubsystemLevel { subsystem, level }),
    })
}

/// The 1d6 that selects which subsystem a hit lands on.
pub fn subsystem_die() -> DiceFormula {
    DiceFormula::d6()
}

/// The 1d6x5 used for shield attrition and shield repair.
pub fn shield_roll() -> DiceFormula {
    DiceFormula::shield_percent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::ActorKind;
    use crate::value_objects::{HealthPool, ShipStats};

    fn fixed(face: i32) -> impl FnMut(i32, i32) -> i32 {
        move |_, _| face
    }

    fn ship_with(configure: impl FnOnce(&mut ShipState)) -> Actor {
        let mut state = ShipState {
            stats: ShipStats {
                tactical: 3,
                engineering: 2,
                helm: 4,
                sensors: 1,
                weapon_rating: 5,
            },
            ..ShipState::default()
        };
        configure(&mut state);
        Actor::new("USS Tiber", ActorKind::Ship)
            .unwrap()
            .with_ship(state)
            .unwrap()
    }

    mod attack {
        use super::*;

        #[test]
        fn nominal_weapon() {
            let ship = ship_with(|_| {});
            let spec = ship_attack(&ship, Subsystem::Phasers, 2, None).unwrap();
            assert_eq!(spec.modifier(), 5);
        }

        #[test]
        fn damaged_weapon_penalty() {
            let ship = ship_with(|s| s.subsystems.torpedoes = DamageLevel::DAMAGED);
            let spec = ship_attack(&ship, Subsystem::Torpedoes, 2, Some(12)).unwrap();
            assert_eq!(spec.modifier(), 3);
            assert_eq!(spec.target_number, Some(12));
        }

        #[test]
        fn offline_weapon_refused() {
            let ship = ship_with(|s| s.subsystems.phasers = DamageLevel::OFFLINE);
            assert!(matches!(
                ship_attack(&ship, Subsystem::Phasers, 2, None),
                Err(DomainError::Constraint(_))
            ));
            let ship = ship_with(|s| s.subsystems.phasers = DamageLevel::DESTROYED);
            assert!(ship_attack(&ship, Subsystem::Phasers, 2, None).is_err());
        }

        #[test]
        fn only_weapon_subsystems_fire() {
            let ship = ship_with(|_| {});
            assert!(matches!(
                ship_attack(&ship, Subsystem::Warp, 0, None),
                Err(DomainError::Validation(_))
            ));
        }

        #[test]
        fn non_ship_cannot_attack() {
            let npc = Actor::new("Smuggler", ActorKind::Npc).unwrap();
            assert!(ship_attack(&npc, Subsystem::Phasers, 0, None).is_err());
        }
    }

    mod effect {
        use super::*;

        #[test]
        fn subtracts_target_rating() {
            let ship = ship_with(|_| {});
            let spec = effect_roll(&ship, 4, 0).unwrap();
            assert_eq!(spec.modifier(), 1);
            // 3 + 3 + 3 + 1
            let resolution = EffectResolution::from_roll(spec.roll(fixed(3)));
            assert_eq!(resolution.roll.total, 10);
            assert_eq!(resolution.class, EffectClass::Graze);
            assert_eq!(resolution.severity, Some(Severity::GRAZE));
        }

        #[test]
        fn low_roll_is_absorbed() {
            let ship = ship_with(|_| {});
            let resolution = EffectResolution::from_roll(effect_roll(&ship, 0, -8).unwrap().roll(fixed(1)));
            assert_eq!(resolution.class, EffectClass::ShieldAbsorption);
            assert_eq!(resolution.severity, None);
        }
    }

    mod damage {
        use super::*;

        #[test]
        fn shields_take_hits_while_active() {
            let ship = ship_with(|_| {});
            let state = ship.ship().unwrap();
            assert_eq!(incoming_hit_target(state), IncomingHit::Shields);
            let change = drain_shields(state, 20);
            assert_eq!((change.previous, change.current), (100, 80));
        }

        #[test]
        fn structure_takes_hits_when_shields_down_or_empty() {
            let lowered = ship_with(|s| s.shields_up = false);
            assert_eq!(incoming_hit_target(lowered.ship().unwrap()), IncomingHit::Structure);

            let empty = ship_with(|s| s.shields = HealthPool::new(0, 100).unwrap());
            assert_eq!(incoming_hit_target(empty.ship().unwrap()), IncomingHit::Structure);

            let offline = ship_with(|s| s.subsystems.shields = DamageLevel::OFFLINE);
            assert_eq!(incoming_hit_target(offline.ship().unwrap()), IncomingHit::Structure);
        }

        #[test]
        fn structure_floors_at_zero() {
            let ship = ship_with(|s| s.structure = HealthPool::new(6, 20).unwrap());
            let change = damage_structure(ship.ship().unwrap(), 9).unwrap();
            assert_eq!(change.current, 0);
            assert!(damage_structure(ship.ship().unwrap(), -1).is_err());
        }

        #[test]
        fn shield_drain_floors_at_zero() {
            let ship = ship_with(|s| s.shields = HealthPool::new(10, 100).unwrap());
            assert_eq!(drain_shields(ship.ship().unwrap(), 30).current, 0);
        }
    }

    mod repairs {
        use super::*;

        #[test]
        fn repair_roll_terms() {
            let ship = ship_with(|_| {});
            let spec = repair(&ship, ShipPool::Structure, 3).unwrap();
            assert_eq!(spec.modifier(), 5);
        }

        #[test]
        fn shield_repair_blocked_when_generators_offline() {
            let ship = ship_with(|s| s.subsystems.shields = DamageLevel::OFFLINE);
            assert!(matches!(
                repair(&ship, ShipPool::Shields, 3),
                Err(DomainError::Constraint(_))
            ));
            assert!(repair(&ship, ShipPool::Power, 3).is_ok());
        }

        #[test]
        fn amounts() {
            assert_eq!(repair_amount(ShipPool::Structure, 14, None), 2);
            assert_eq!(repair_amount(ShipPool::Power, 3, None), 1);
            assert_eq!(repair_amount(ShipPool::Power, -4, None), 1);
            assert_eq!(repair_amount(ShipPool::Shields, 14, Some(25)), 25);
        }

        #[test]
        fn restore_caps_at_max() {
            let ship = ship_with(|s| s.power = HealthPool::new(18, 20).unwrap());
            let change = restore_pool(ship.ship().unwrap(), ShipPool::Power, 5);
            assert_eq!(change.current, 20);
        }

        #[test]
        fn stale_pool_write_is_rejected() {
            let mut ship = ship_with(|s| s.shields = HealthPool::new(100, 100).unwrap());
            let change = drain_shields(ship.ship().unwrap(), 20);

            // Another hit lands between the read and the write.
            let other = drain_shields(ship.ship().unwrap(), 30);
            ship.apply_patch(&other.patch()).unwrap();

            let err = ship.apply_patch(&change.patch()).unwrap_err();
            assert!(matches!(err, crate::PatchError::GuardFailed { .. }));
            assert_eq!(ship.ship().unwrap().shields.value, 70);
        }
    }

    mod subsystems {
        use super::*;

        #[test]
        fn hit_applies_with_guard() {
            let mut ship = ship_with(|_| {});
            let (outcome, patch) = subsystem_hit(&ship, Subsystem::Warp, Severity::GRAZE).unwrap();
            assert!(outcome.is_applied());
            let patch = patch.unwrap();
            assert_eq!(patch.guards.len(), 1);
            ship.apply_patch(&patch).unwrap();
            assert_eq!(ship.ship().unwrap().subsystems.warp, DamageLevel::DAMAGED);
        }

        #[test]
        fn no_change_has_no_patch() {
            let ship = ship_with(|s| s.subsystems.warp = DamageLevel::DESTROYED);
            let (outcome, patch) = subsystem_hit(&ship, Subsystem::Warp, Severity::CRITICAL).unwrap();
            assert!(!outcome.is_applied());
            assert!(patch.is_none());
        }

        #[test]
        fn cycle_wraps_from_destroyed() {
            let ship = ship_with(|s| s.subsystems.sensors = DamageLevel::DESTROYED);
            let cycle = cycle_subsystem(&ship, Subsystem::Sensors).unwrap();
            assert_eq!(cycle.level, DamageLevel::NOMINAL);
        }
    }
}
