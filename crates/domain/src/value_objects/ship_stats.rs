//! Ship stat block, health pools and the derived maneuver rating.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::DamageLevel;

/// Crew-station stats of a ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipStats {
    pub tactical: i32,
    pub engineering: i32,
    pub helm: i32,
    pub sensors: i32,
    /// Weapon rating used in the effect roll.
    pub weapon_rating: i32,
}

/// A current/maximum pool such as structure or power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPool {
    pub value: i32,
    pub max: i32,
}

impl HealthPool {
    pub fn new(value: i32, max: i32) -> Result<Self, DomainError> {
        if max < 0 || value < 0 || value > max {
            return Err(DomainError::validation(format!(
                "pool value {} must be within 0..={}",
                value, max
            )));
        }
        Ok(Self { value, max })
    }

    /// A pool filled to its maximum.
    pub fn full(max: i32) -> Self {
        let max = max.max(0);
        Self { value: max, max }
    }

    /// Current value as a whole-number percentage of the maximum.
    pub fn percent(&self) -> i32 {
        if self.max <= 0 {
            return 0;
        }
        let percent = i64::from(self.value) * 100 / i64::from(self.max);
        i32::try_from(percent).unwrap_or(if percent < 0 { i32::MIN } else { i32::MAX })
    }

    /// Value after losing `amount`, floored at zero.
    pub fn drained(&self, amount: i32) -> i32 {
        self.value.saturating_sub(amount.max(0)).max(0)
    }

    /// Value after gaining `amount`, capped at the maximum.
    pub fn restored(&self, amount: i32) -> i32 {
        self.value.saturating_add(amount.max(0)).min(self.max)
    }
}

impl Default for HealthPool {
    fn default() -> Self {
        Self::full(100)
    }
}

/// The three health pools of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipPool {
    Structure,
    Shields,
    Power,
}

impl ShipPool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Shields => "shields",
            Self::Power => "power",
        }
    }

    pub fn value_path(&self) -> String {
        format!("system.{}.value", self.as_str())
    }
}

impl fmt::Display for ShipPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipPool {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structure" => Ok(Self::Structure),
            "shields" => Ok(Self::Shields),
            "power" => Ok(Self::Power),
            _ => Err(DomainError::parse(format!("Unknown ship pool: {}", s))),
        }
    }
}

/// Every full 25% of missing shields costs one point of rating.
const SHIELD_PENALTY_STEP: i32 = 25;
const DAMAGED_IMPULSE_PENALTY: i32 = 2;

/// Effective maneuver/shield rating.
///
/// `helm - floor((100 - shield%) / 25)`, then -2 for damaged impulse or
/// halved (rounding down) for offline impulse, never below zero.
///
/// Offline impulse never rates better than damaged impulse: at a base of 2
/// halving would give 1 while the flat penalty gives 0.
pub fn effective_rating(helm: i32, shield_percent: i32, impulse: DamageLevel) -> i32 {
    let penalty = (100 - shield_percent).div_euclid(SHIELD_PENALTY_STEP);
    let mut rating = helm - penalty;
    if impulse.is_damaged() {
        rating -= DAMAGED_IMPULSE_PENALTY;
    } else if impulse.is_offline() {
        rating = rating
            .div_euclid(2)
            .min(rating - DAMAGED_IMPULSE_PENALTY);
    }
    rating.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_shields_no_penalty() {
        assert_eq!(effective_rating(6, 100, DamageLevel::NOMINAL), 6);
    }

    #[test]
    fn shield_penalty_steps_every_quarter() {
        assert_eq!(effective_rating(6, 76, DamageLevel::NOMINAL), 6);
        assert_eq!(effective_rating(6, 75, DamageLevel::NOMINAL), 5);
        assert_eq!(effective_rating(6, 50, DamageLevel::NOMINAL), 4);
        assert_eq!(effective_rating(6, 0, DamageLevel::NOMINAL), 2);
    }

    #[test]
    fn impulse_damage() {
        assert_eq!(effective_rating(6, 100, DamageLevel::DAMAGED), 4);
        assert_eq!(effective_rating(7, 100, DamageLevel::OFFLINE), 3);
        assert_eq!(effective_rating(7, 100, DamageLevel::DESTROYED), 3);
    }

    #[test]
    fn offline_impulse_not_better_than_damaged() {
        assert_eq!(effective_rating(2, 100, DamageLevel::DAMAGED), 0);
        assert_eq!(effective_rating(2, 100, DamageLevel::OFFLINE), 0);
    }

    #[test]
    fn never_negative() {
        assert_eq!(effective_rating(1, 0, DamageLevel::DAMAGED), 0);
        assert_eq!(effective_rating(-3, 100, DamageLevel::OFFLINE), 0);
    }

    #[test]
    fn non_increasing_as_shields_drop_or_impulse_degrades() {
        for helm in 0..10 {
            let mut last = i32::MAX;
            for pct in (0..=100).rev() {
                let r = effective_rating(helm, pct, DamageLevel::NOMINAL);
                assert!(r >= 0);
                assert!(r <= last);
                last = r;
            }
            for pct in [0, 40, 100] {
                let levels = [
                    DamageLevel::NOMINAL,
                    DamageLevel::DAMAGED,
                    DamageLevel::OFFLINE,
                    DamageLevel::DESTROYED,
                ];
                let ratings: Vec<i32> = levels
                    .iter()
                    .map(|l| effective_rating(helm, pct, *l))
                    .collect();
                assert!(ratings.windows(2).all(|w| w[0] >= w[1]), "helm {helm} pct {pct}: {ratings:?}");
            }
        }
    }

    #[test]
    fn pool_drain_and_restore_are_bounded() {
        let pool = HealthPool::new(10, 40).unwrap();
        assert_eq!(pool.drained(25), 0);
        assert_eq!(pool.restored(45), 40);
        assert_eq!(pool.restored(5), 15);
        assert_eq!(pool.percent(), 25);
        assert!(HealthPool::new(50, 40).is_err());
    }

    #[test]
    fn large_pools_do_not_overflow() {
        let pool = HealthPool::new(30_000_000, 30_000_000).unwrap();
        assert_eq!(pool.percent(), 100);
        assert_eq!(HealthPool::new(i32::MAX / 2, i32::MAX).unwrap().percent(), 49);
        assert_eq!(pool.restored(i32::MAX), 30_000_000);
    }
}
