//! Domain entities

mod item;

pub use item::{EquipmentData, Item, ItemKind, SkillData, TalentData, WeaponData};
