use serde::{Deserialize, Serialize};

use fartrek_domain::{AttributeKey, WeaponClass};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeTestRequest {
    pub attribute: AttributeKey,
    #[serde(default)]
    pub modifier: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeRequest {
    #[serde(default)]
    pub modifier: i32,
}

/// Roll a skill or weapon item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRollRequest {
    #[serde(default)]
    pub modifier: i32,
}

/// Consciousness check. Give either a weapon class from the table or a raw
/// base TN; an explicit TN wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalRequest {
    #[serde(default)]
    pub weapon_class: Option<WeaponClass>,
    #[serde(default, rename = "weaponTN")]
    pub weapon_tn: Option<i32>,
    #[serde(default)]
    pub modifier: i32,
}

impl SurvivalRequest {
    pub fn base_tn(&self) -> Option<i32> {
        self.weapon_tn
            .or_else(|| self.weapon_class.map(WeaponClass::base_tn))
    }
}
