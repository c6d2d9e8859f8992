//! Item entity - Skills, weapons, talents and equipment embedded in an actor
//!
//! Items are a tagged union. Missing fields in stored JSON fall back to the
//! same defaults a freshly created item sheet shows.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::ItemId;
use crate::value_objects::{AttributeKey, PhaserMode, RangeCategory, TalentModifier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "system", rename_all = "lowercase")]
pub enum ItemKind {
    Skill(SkillData),
    Weapon(WeaponData),
    Talent(TalentData),
    Equipment(EquipmentData),
}

impl ItemKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Skill(_) => "skill",
            Self::Weapon(_) => "weapon",
            Self::Talent(_) => "talent",
            Self::Equipment(_) => "equipment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillData {
    pub attribute: AttributeKey,
    pub rank: u32,
}

impl Default for SkillData {
    fn default() -> Self {
        Self {
            attribute: AttributeKey::Iq,
            rank: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeaponData {
    /// Target number of the consciousness check this weapon forces.
    #[serde(rename = "weaponTN")]
    pub weapon_tn: i32,
    pub attack_attribute: AttributeKey,
    /// Matched case-insensitively against the owner's skill items.
    pub attack_skill_name: String,
    pub has_stun: bool,
    /// Free-text range label such as "Melee" or "Far".
    pub range: String,
    pub notes: String,
    /// Only meaningful on stun-capable weapons; unset reads as stun.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phaser_mode: Option<PhaserMode>,
}

impl Default for WeaponData {
    fn default() -> Self {
        Self {
            weapon_tn: 5,
            attack_attribute: AttributeKey::Dx,
            attack_skill_name: "Marksmanship".to_string(),
            has_stun: false,
            range: "Ranged".to_string(),
            notes: String::new(),
            phaser_mode: None,
        }
    }
}

impl WeaponData {
    /// Current firing mode, if the weapon has a stun setting at all.
    pub fn mode(&self) -> Option<PhaserMode> {
        self.has_stun.then(|| self.phaser_mode.unwrap_or_default())
    }

    pub fn range_category(&self) -> RangeCategory {
        RangeCategory::from_label(&self.range)
    }

    /// Switch firing mode and rewrite the stored TN to match.
    pub fn set_mode(&mut self, mode: PhaserMode) -> Result<(), DomainError> {
        if !self.has_stun {
            return Err(DomainError::constraint("weapon has no stun setting"));
        }
        self.phaser_mode = Some(mode);
        self.weapon_tn = mode.target_number();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TalentData {
    #[serde(flatten)]
    pub modifier: TalentModifier,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentData {
    pub notes: String,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            kind,
        }
    }

    pub fn skill(name: impl Into<String>, attribute: AttributeKey, rank: u32) -> Self {
        Self::new(name, ItemKind::Skill(SkillData { attribute, rank }))
    }

    pub fn weapon(name: impl Into<String>, data: WeaponData) -> Self {
        Self::new(name, ItemKind::Weapon(data))
    }

    pub fn talent(name: impl Into<String>, modifier: TalentModifier) -> Self {
        Self::new(
            name,
            ItemKind::Talent(TalentData {
                modifier,
                notes: String::new(),
            }),
        )
    }

    pub fn equipment(name: impl Into<String>, notes: impl Into<String>) -> Self {
        Self::new(
            name,
            ItemKind::Equipment(EquipmentData {
                notes: notes.into(),
            }),
        )
    }

    pub fn as_skill(&self) -> Option<&SkillData> {
        match &self.kind {
            ItemKind::Skill(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_weapon(&self) -> Option<&WeaponData> {
        match &self.kind {
            ItemKind::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_weapon_mut(&mut self) -> Option<&mut WeaponData> {
        match &mut self.kind {
            ItemKind::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_talent(&self) -> Option<&TalentModifier> {
        match &self.kind {
            ItemKind::Talent(t) => Some(&t.modifier),
            _ => None,
        }
    }

    /// Reject combinations the sheet can never produce.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if let ItemKind::Weapon(w) = &self.kind {
            if !w.has_stun && w.phaser_mode.is_some() {
                return Err(DomainError::validation(format!(
                    "weapon '{}' has a firing mode but no stun setting",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ModifierKind;

    #[test]
    fn weapon_defaults_from_empty_system() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "id": "0d9f0c2e-4c0b-4a77-9d55-8f3c8c3c1a10",
            "name": "Type II Phaser",
            "type": "weapon",
            "system": {}
        }))
        .unwrap();
        let weapon = item.as_weapon().unwrap();
        assert_eq!(weapon.weapon_tn, 5);
        assert_eq!(weapon.attack_attribute, AttributeKey::Dx);
        assert_eq!(weapon.attack_skill_name, "Marksmanship");
        assert!(!weapon.has_stun);
        assert_eq!(weapon.range_category(), RangeCategory::Ranged);
        assert_eq!(weapon.mode(), None);
    }

    #[test]
    fn skill_defaults_to_intelligence_rank_zero() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "id": "0d9f0c2e-4c0b-4a77-9d55-8f3c8c3c1a11",
            "name": "Science",
            "type": "skill",
            "system": {}
        }))
        .unwrap();
        assert_eq!(item.as_skill(), Some(&SkillData::default()));
        assert_eq!(item.as_skill().unwrap().attribute, AttributeKey::Iq);
    }

    #[test]
    fn talent_fields_flatten_into_system() {
        let item = Item::talent(
            "Sharpshooter",
            TalentModifier::new(ModifierKind::Attack, "ranged", 1),
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "talent");
        assert_eq!(json["system"]["modifierKind"], "attack");
        assert_eq!(json["system"]["modifierTarget"], "ranged");
        assert_eq!(json["system"]["active"], true);

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn stun_weapon_reads_unset_mode_as_stun() {
        let weapon = WeaponData {
            has_stun: true,
            ..WeaponData::default()
        };
        assert_eq!(weapon.mode(), Some(PhaserMode::Stun));
    }

    #[test]
    fn set_mode_rewrites_tn() {
        let mut weapon = WeaponData {
            has_stun: true,
            ..WeaponData::default()
        };
        weapon.set_mode(PhaserMode::Kill).unwrap();
        assert_eq!(weapon.weapon_tn, 20);
        assert_eq!(weapon.mode(), Some(PhaserMode::Kill));
    }

    #[test]
    fn set_mode_requires_stun() {
        let mut weapon = WeaponData::default();
        assert!(weapon.set_mode(PhaserMode::Heavy).is_err());
        assert_eq!(weapon.weapon_tn, 5);
    }

    #[test]
    fn validate_rejects_mode_without_stun() {
        let item = Item::weapon(
            "Knife",
            WeaponData {
                phaser_mode: Some(PhaserMode::Kill),
                ..WeaponData::default()
            },
        );
        assert!(item.validate().is_err());
        assert!(Item::equipment("Tricorder", "").validate().is_ok());
        assert!(Item::equipment("  ", "").validate().is_err());
    }
}
