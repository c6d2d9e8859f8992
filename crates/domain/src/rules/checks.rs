//! Character checks: attribute tests, initiative, skills, weapon attacks and
//! the consciousness check, plus the weapon mode toggle.

use serde::{Deserialize, Serialize};

use crate::aggregates::Actor;
use crate::entities::{Item, ItemKind};
use crate::error::DomainError;
use crate::ids::ItemId;
use crate::value_objects::{
    evaluate_check, survival_tn, ActorPatch, AttributeKey, CheckKind, CheckResult, CheckSpec,
    CheckTerm, FieldGuard, FieldUpdate, ModifierKind, PhaserMode, RangeCategory,
};

/// Generic attribute test. Attribute talents count as the talent term, so the
/// total equals the displayed value plus dice and modifier.
pub fn attribute_test(actor: &Actor, key: AttributeKey, modifier: i32) -> CheckSpec {
    evaluate_check(
        CheckKind::Attribute,
        key.label(),
        CheckTerm::new(key.label(), actor.attributes().get(key)),
        0,
        actor.talent_bonus(ModifierKind::Attribute, Some(key.key())),
        modifier,
    )
}

/// Initiative: dexterity plus every initiative talent.
pub fn initiative(actor: &Actor, modifier: i32) -> CheckSpec {
    evaluate_check(
        CheckKind::Initiative,
        "Initiative",
        CheckTerm::new(AttributeKey::Dx.label(), actor.attributes().dx),
        0,
        actor.talent_bonus(ModifierKind::Initiative, None),
        modifier,
    )
}

pub fn skill_check(actor: &Actor, item: &Item, modifier: i32) -> Result<CheckSpec, DomainError> {
    let skill = item
        .as_skill()
        .ok_or_else(|| DomainError::constraint(format!("{} is not a skill", item.name)))?;
    Ok(evaluate_check(
        CheckKind::Skill,
        item.name.clone(),
        CheckTerm::new(skill.attribute.label(), actor.attributes().get(skill.attribute)),
        skill.rank as i32,
        actor.talent_bonus(ModifierKind::Skill, Some(&item.name)),
        modifier,
    ))
}

/// A weapon attack and what the defender faces if it lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponAttack {
    pub check: CheckSpec,
    pub range: RangeCategory,
    /// Stat the defender rolls to avoid the hit.
    pub defense_stat: AttributeKey,
    /// Base TN of the consciousness check the weapon forces.
    pub weapon_tn: i32,
    pub mode: Option<PhaserMode>,
}

pub fn weapon_attack(actor: &Actor, item: &Item, modifier: i32) -> Result<WeaponAttack, DomainError> {
    let weapon = item
        .as_weapon()
        .ok_or_else(|| DomainError::constraint(format!("{} is not a weapon", item.name)))?;
    let range = weapon.range_category();
    let check = evaluate_check(
        CheckKind::WeaponAttack,
        item.name.clone(),
        CheckTerm::new(
            weapon.attack_attribute.label(),
            actor.attributes().get(weapon.attack_attribute),
        ),
        actor.skill_rank(&weapon.attack_skill_name),
        actor.talent_bonus(ModifierKind::Attack, Some(range.as_str())),
        modifier,
    );
    Ok(WeaponAttack {
        check,
        range,
        defense_stat: weapon.attack_attribute.defense_stat(),
        weapon_tn: weapon.weapon_tn,
        mode: weapon.mode(),
    })
}

/// The check an item rolls when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCheck {
    Skill(CheckSpec),
    Weapon(WeaponAttack),
}

impl ItemCheck {
    pub fn spec(&self) -> &CheckSpec {
        match self {
            Self::Skill(spec) => spec,
            Self::Weapon(attack) => &attack.check,
        }
    }
}

pub fn item_check(actor: &Actor, item_id: ItemId, modifier: i32) -> Result<ItemCheck, DomainError> {
    let item = actor
        .item(item_id)
        .ok_or_else(|| DomainError::not_found("Item", item_id.to_string()))?;
    match &item.kind {
        ItemKind::Skill(_) => skill_check(actor, item, modifier).map(ItemCheck::Skill),
        ItemKind::Weapon(_) => weapon_attack(actor, item, modifier).map(ItemCheck::Weapon),
        other => Err(DomainError::constraint(format!(
            "{} items cannot be rolled",
            other.type_name()
        ))),
    }
}

/// Consciousness check after being hit by a weapon of `weapon_tn`.
pub fn survival(actor: &Actor, weapon_tn: i32, modifier: i32) -> CheckSpec {
    let resources = actor.resources();
    CheckSpec::new(CheckKind::Survival, "Consciousness")
        .term(AttributeKey::St.label(), actor.attributes().st)
        .term("ARMOR", resources.armor)
        .term("MOD", modifier)
        .with_target(survival_tn(weapon_tn, resources.wounds))
}

/// A passed consciousness check costs exactly one wound; a failed one changes
/// nothing on the sheet.
pub fn survival_patch(actor: &Actor, result: &CheckResult) -> Option<ActorPatch> {
    if !result.succeeded() {
        return None;
    }
    let wounds = actor.resources().wounds;
    Some(
        ActorPatch::new()
            .guard(FieldGuard::Wounds { expected: wounds })
            .set(FieldUpdate::Wounds { value: wounds + 1 }),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeToggle {
    pub item_id: ItemId,
    pub weapon: String,
    pub previous: PhaserMode,
    pub next: PhaserMode,
    pub patch: ActorPatch,
}

/// Advance a stun-capable weapon to its next firing mode.
pub fn toggle_weapon_mode(actor: &Actor, item_id: ItemId) -> Result<ModeToggle, DomainError> {
    let item = actor
        .item(item_id)
        .ok_or_else(|| DomainError::not_found("Item", item_id.to_string()))?;
    let weapon = item
        .as_weapon()
        .ok_or_else(|| DomainError::constraint(format!("{} is not a weapon", item.name)))?;
    let previous = weapon
        .mode()
        .ok_or_else(|| DomainError::constraint(format!("{} has no stun setting", item.name)))?;
    let next = previous.next();
    Ok(ModeToggle {
        item_id,
        weapon: item.name.clone(),
        previous,
        next,
        patch: ActorPatch::new()
            .guard(FieldGuard::WeaponMode {
                item_id,
                expected: previous,
            })
            .set(FieldUpdate::WeaponMode {
                item_id,
                mode: next,
            }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::{ActorKind, Resources};
    use crate::entities::WeaponData;
    use crate::value_objects::{Attributes, TalentModifier};

    fn faces(values: &'static [i32]) -> impl FnMut(i32, i32) -> i32 {
        let mut idx = 0;
        move |_, _| {
            let v = values[idx % values.len()];
            idx += 1;
            v
        }
    }

    fn phaser() -> Item {
        Item::weapon(
            "Type II Phaser",
            WeaponData {
                weapon_tn: 14,
                has_stun: true,
                range: "Far".to_string(),
                ..WeaponData::default()
            },
        )
    }

    fn officer(wounds: u32) -> Actor {
        Actor::new("Ens. Okafor", ActorKind::Character)
            .unwrap()
            .with_attributes(Attributes::new(2, 3, 1, 0))
            .with_resources(Resources {
                fate: 1,
                wounds,
                armor: 1,
            })
            .with_item(Item::skill("Marksmanship", AttributeKey::Dx, 2))
            .unwrap()
            .with_item(Item::skill("Medicine", AttributeKey::Iq, 3))
            .unwrap()
            .with_item(Item::talent(
                "Sharpshooter",
                TalentModifier::new(ModifierKind::Attack, "ranged", 1),
            ))
            .unwrap()
            .with_item(Item::talent(
                "Brawler",
                TalentModifier::new(ModifierKind::Attack, "melee", 4),
            ))
            .unwrap()
            .with_item(Item::talent(
                "Field Medic",
                TalentModifier::new(ModifierKind::Skill, "medicine", 1),
            ))
            .unwrap()
            .with_item(Item::talent(
                "Alert",
                TalentModifier::new(ModifierKind::Initiative, "all", 2),
            ))
            .unwrap()
            .with_item(Item::talent(
                "Wiry",
                TalentModifier::new(ModifierKind::Attribute, "st", 1),
            ))
            .unwrap()
            .with_item(phaser())
            .unwrap()
    }

    fn item_named(actor: &Actor, name: &str) -> ItemId {
        actor.items().iter().find(|i| i.name == name).unwrap().id
    }

    mod weapon {
        use super::*;

        #[test]
        fn ranged_attack_constant() {
            // dexterity 3 + rank 2 + ranged talent 1 + mod 0
            let actor = officer(0);
            let item = actor.item(item_named(&actor, "Type II Phaser")).unwrap();
            let attack = weapon_attack(&actor, item, 0).unwrap();
            assert_eq!(attack.check.modifier(), 6);
            assert_eq!(attack.range, RangeCategory::Ranged);
            assert_eq!(attack.defense_stat, AttributeKey::Dx);
            assert_eq!(attack.weapon_tn, 14);
            assert_eq!(attack.mode, Some(PhaserMode::Stun));
        }

        #[test]
        fn missing_skill_falls_back_to_zero() {
            let club = Item::weapon(
                "Club",
                WeaponData {
                    attack_attribute: AttributeKey::St,
                    attack_skill_name: "Melee Weapons".to_string(),
                    range: "Melee".to_string(),
                    ..WeaponData::default()
                },
            );
            let actor = officer(0).with_item(club.clone()).unwrap();
            let attack = weapon_attack(&actor, &club, -1).unwrap();
            // st 2 + rank 0 + melee talent 4 - 1
            assert_eq!(attack.check.modifier(), 5);
            assert_eq!(attack.defense_stat, AttributeKey::St);
            assert_eq!(attack.mode, None);
        }

        #[test]
        fn item_check_dispatches_by_variant() {
            let actor = officer(0);
            let phaser = item_named(&actor, "Type II Phaser");
            assert!(matches!(
                item_check(&actor, phaser, 0).unwrap(),
                ItemCheck::Weapon(_)
            ));
            let medicine = item_named(&actor, "Medicine");
            assert!(matches!(
                item_check(&actor, medicine, 0).unwrap(),
                ItemCheck::Skill(_)
            ));
            let talent = item_named(&actor, "Alert");
            assert!(matches!(
                item_check(&actor, talent, 0),
                Err(DomainError::Constraint(_))
            ));
            assert!(matches!(
                item_check(&actor, ItemId::new(), 0),
                Err(DomainError::NotFound { .. })
            ));
        }
    }

    mod checks {
        use super::*;

        #[test]
        fn skill_uses_named_talent() {
            let actor = officer(0);
            let item = actor.item(item_named(&actor, "Medicine")).unwrap();
            let spec = skill_check(&actor, item, 2).unwrap();
            // iq 1 + rank 3 + talent 1 + mod 2
            assert_eq!(spec.modifier(), 7);
            assert_eq!(spec.label, "Medicine");
        }

        #[test]
        fn initiative_uses_dexterity_and_initiative_talents() {
            let actor = officer(0);
            assert_eq!(initiative(&actor, 0).modifier(), 5);
        }

        #[test]
        fn attribute_test_includes_attribute_talents() {
            let actor = officer(0);
            let spec = attribute_test(&actor, AttributeKey::St, 1);
            assert_eq!(
                spec.modifier(),
                actor.effective_attribute(AttributeKey::St) + 1
            );
            assert_eq!(spec.label, "STRENGTH");
        }
    }

    mod survival {
        use super::*;

        #[test]
        fn target_number_grows_with_wounds() {
            let actor = officer(2);
            let spec = survival(&actor, 14, 0);
            assert_eq!(spec.target_number, Some(20));
            // st 2 + armor 1
            assert_eq!(spec.modifier(), 3);
        }

        #[test]
        fn success_adds_one_wound() {
            let actor = officer(2);
            let result = survival(&actor, 14, 0).roll(faces(&[6, 6, 5]));
            assert_eq!(result.total, 20);
            assert_eq!(result.success, Some(true));
            let patch = survival_patch(&actor, &result).unwrap();
            assert_eq!(patch.updates, vec![FieldUpdate::Wounds { value: 3 }]);
        }

        #[test]
        fn failure_changes_nothing() {
            let actor = officer(2);
            let result = survival(&actor, 14, 0).roll(faces(&[6, 6, 4]));
            assert_eq!(result.total, 19);
            assert!(survival_patch(&actor, &result).is_none());
        }
    }

    mod mode {
        use super::*;

        #[test]
        fn toggle_advances_and_patches() {
            let mut actor = officer(0);
            let id = item_named(&actor, "Type II Phaser");
            let expected = [PhaserMode::Heavy, PhaserMode::Kill, PhaserMode::Stun];
            for mode in expected {
                let toggle = toggle_weapon_mode(&actor, id).unwrap();
                assert_eq!(toggle.next, mode);
                actor.apply_patch(&toggle.patch).unwrap();
                let weapon = actor.item(id).and_then(Item::as_weapon).unwrap();
                assert_eq!(weapon.weapon_tn, mode.target_number());
            }
        }

        #[test]
        fn stale_toggle_is_rejected() {
            let mut actor = officer(0);
            let id = item_named(&actor, "Type II Phaser");
            let first = toggle_weapon_mode(&actor, id).unwrap();
            let second = toggle_weapon_mode(&actor, id).unwrap();
            actor.apply_patch(&first.patch).unwrap();

            assert!(actor.apply_patch(&second.patch).is_err());
            let weapon = actor.item(id).and_then(Item::as_weapon).unwrap();
            assert_eq!(weapon.mode(), Some(PhaserMode::Heavy));
        }

        #[test]
        fn toggle_requires_stun_weapon() {
            let knife = Item::weapon("Knife", WeaponData::default());
            let id = knife.id;
            let actor = officer(0).with_item(knife).unwrap();
            assert!(toggle_weapon_mode(&actor, id).is_err());
            let skill = item_named(&actor, "Medicine");
            assert!(toggle_weapon_mode(&actor, skill).is_err());
        }
    }
}
