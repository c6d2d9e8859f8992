use serde::{Deserialize, Serialize};

use crate::value_objects::Severity;

/// Classification of a ship effect roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectClass {
    /// 9 or less: shields soak the hit and lose 1d6x5%.
    ShieldAbsorption,
    /// 10-14
    Graze,
    /// 15-17
    DirectHit,
    /// 18+
    Critical,
}

impl EffectClass {
    pub fn classify(total: i32) -> Self {
        match total {
            i32::MIN..=9 => Self::ShieldAbsorption,
            10..=14 => Self::Graze,
            15..=17 => Self::DirectHit,
            _ => Self::Critical,
        }
    }

    /// Subsystem damage severity, if the effect gets past the shields.
    pub fn severity(self) -> Option<Severity> {
        match self {
            Self::ShieldAbsorption => None,
            Self::Graze => Some(Severity::GRAZE),
            Self::DirectHit => Some(Severity::DIRECT),
            Self::Critical => Some(Severity::CRITICAL),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ShieldAbsorption => "NO EFFECT. Target loses 1d6x5% Shields.",
            Self::Graze => "GRAZE! Level 1 Damage.",
            Self::DirectHit => "DIRECT HIT! Level 2 Damage.",
            Self::Critical => "CRITICAL HIT! Level 3 Damage.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(EffectClass::classify(-4), EffectClass::ShieldAbsorption);
        assert_eq!(EffectClass::classify(9), EffectClass::ShieldAbsorption);
        assert_eq!(EffectClass::classify(10), EffectClass::Graze);
        assert_eq!(EffectClass::classify(14), EffectClass::Graze);
        assert_eq!(EffectClass::classify(15), EffectClass::DirectHit);
        assert_eq!(EffectClass::classify(17), EffectClass::DirectHit);
        assert_eq!(EffectClass::classify(18), EffectClass::Critical);
        assert_eq!(EffectClass::classify(40), EffectClass::Critical);
    }

    #[test]
    fn severities() {
        assert_eq!(EffectClass::classify(12).severity(), Some(Severity::GRAZE));
        assert_eq!(EffectClass::classify(8).severity(), None);
        assert_eq!(EffectClass::classify(19).severity().map(|s| s.value()), Some(3));
    }
}
