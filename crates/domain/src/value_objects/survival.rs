use serde::{Deserialize, Serialize};

/// Weapon classes offered by the consciousness check, with their base TN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeaponClass {
    Unarmed,
    Knife,
    Pistol,
    Stun,
    HeavyStun,
    Kill,
}

impl WeaponClass {
    pub const ALL: [WeaponClass; 6] = [
        Self::Unarmed,
        Self::Knife,
        Self::Pistol,
        Self::Stun,
        Self::HeavyStun,
        Self::Kill,
    ];

    pub fn base_tn(self) -> i32 {
        match self {
            Self::Unarmed => 5,
            Self::Knife => 8,
            Self::Pistol => 11,
            Self::Stun => 14,
            Self::HeavyStun => 17,
            Self::Kill => 20,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unarmed => "Fist / Unarmed",
            Self::Knife => "Knife / Dagger",
            Self::Pistol => "Pistol",
            Self::Stun => "Rifle / Phaser Stun",
            Self::HeavyStun => "Heavy Stun",
            Self::Kill => "Phaser Kill / Disruptor",
        }
    }
}

/// Each existing wound raises the consciousness TN by this much.
pub const WOUND_TN_STEP: i32 = 3;

/// Consciousness-check target number for a hit of `weapon_tn` on a
/// character already carrying `wounds`.
pub fn survival_tn(weapon_tn: i32, wounds: u32) -> i32 {
    weapon_tn + wounds as i32 * WOUND_TN_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ascending_by_three() {
        let tns: Vec<i32> = WeaponClass::ALL.iter().map(|c| c.base_tn()).collect();
        assert_eq!(tns, vec![5, 8, 11, 14, 17, 20]);
    }

    #[test]
    fn wounds_raise_tn() {
        assert_eq!(survival_tn(WeaponClass::Stun.base_tn(), 2), 20);
        assert_eq!(survival_tn(5, 0), 5);
    }
}
