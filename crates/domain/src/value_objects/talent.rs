//! Talent modifiers and their aggregation into a single roll bonus.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Wildcard talent target matching every target of its kind.
pub const ALL_TARGETS: &str = "all";

/// Which roll category a talent feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    #[default]
    None,
    Skill,
    Attack,
    Initiative,
    Attribute,
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Skill => "skill",
            Self::Attack => "attack",
            Self::Initiative => "initiative",
            Self::Attribute => "attribute",
        };
        f.write_str(s)
    }
}

impl FromStr for ModifierKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "skill" => Ok(Self::Skill),
            "attack" => Ok(Self::Attack),
            "initiative" => Ok(Self::Initiative),
            "attribute" => Ok(Self::Attribute),
            _ => Err(DomainError::parse(format!("Unknown modifier kind: {}", s))),
        }
    }
}

/// The data carried by a talent item.
///
/// Toggling `active` only changes whether the modifier participates in
/// aggregation; the value and target are kept intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TalentModifier {
    pub modifier_kind: ModifierKind,
    /// Attribute key, skill name, range category, or `all`.
    pub modifier_target: String,
    pub modifier_value: i32,
    pub active: bool,
}

impl Default for TalentModifier {
    fn default() -> Self {
        Self {
            modifier_kind: ModifierKind::None,
            modifier_target: ALL_TARGETS.to_string(),
            modifier_value: 0,
            active: true,
        }
    }
}

impl TalentModifier {
    pub fn new(kind: ModifierKind, target: impl Into<String>, value: i32) -> Self {
        Self {
            modifier_kind: kind,
            modifier_target: target.into(),
            modifier_value: value,
            active: true,
        }
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether this talent contributes to a roll of `kind` against `target`.
    ///
    /// `None` as the target matches every talent of the kind.
    pub fn applies_to(&self, kind: ModifierKind, target: Option<&str>) -> bool {
        if !self.active || self.modifier_kind != kind {
            return false;
        }
        match target {
            None => true,
            Some(target) => {
                self.modifier_target.eq_ignore_ascii_case(target)
                    || self.modifier_target.eq_ignore_ascii_case(ALL_TARGETS)
            }
        }
    }
}

/// Sum of the values of every active talent matching `kind` and `target`.
///
/// Zero when nothing matches. Order of the input does not matter.
pub fn aggregate_bonus<'a>(
    talents: impl IntoIterator<Item = &'a TalentModifier>,
    kind: ModifierKind,
    target: Option<&str>,
) -> i32 {
    talents
        .into_iter()
        .filter(|t| t.applies_to(kind, target))
        .map(|t| t.modifier_value)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TalentModifier> {
        vec![
            TalentModifier::new(ModifierKind::Skill, "Piloting", 2),
            TalentModifier::new(ModifierKind::Skill, "all", 1),
            TalentModifier::new(ModifierKind::Skill, "Medicine", 5),
            TalentModifier::new(ModifierKind::Attack, "ranged", 3),
            TalentModifier::new(ModifierKind::Skill, "piloting", 4).deactivated(),
        ]
    }

    #[test]
    fn matches_target_case_insensitively_plus_wildcard() {
        let talents = sample();
        assert_eq!(
            aggregate_bonus(&talents, ModifierKind::Skill, Some("PILOTING")),
            3
        );
    }

    #[test]
    fn unspecified_target_sums_whole_kind() {
        let talents = sample();
        assert_eq!(aggregate_bonus(&talents, ModifierKind::Skill, None), 8);
    }

    #[test]
    fn no_match_is_zero() {
        let talents = sample();
        assert_eq!(
            aggregate_bonus(&talents, ModifierKind::Initiative, None),
            0
        );
        assert_eq!(aggregate_bonus(&talents, ModifierKind::Attack, Some("melee")), 0);
    }

    #[test]
    fn order_independent() {
        let mut talents = sample();
        let forward = aggregate_bonus(&talents, ModifierKind::Skill, Some("Medicine"));
        talents.reverse();
        let backward = aggregate_bonus(&talents, ModifierKind::Skill, Some("Medicine"));
        assert_eq!(forward, backward);
        assert_eq!(forward, 6);
    }

    #[test]
    fn deactivation_removes_contribution_without_mutation() {
        let talent = TalentModifier::new(ModifierKind::Initiative, "all", 2);
        let off = talent.clone().deactivated();
        assert_eq!(aggregate_bonus([&off], ModifierKind::Initiative, None), 0);
        assert_eq!(off.modifier_value, 2);
        assert_eq!(aggregate_bonus([&talent], ModifierKind::Initiative, None), 2);
    }

    #[test]
    fn defaults_match_new_item_sheet() {
        let talent: TalentModifier = serde_json::from_str("{}").unwrap();
        assert_eq!(talent.modifier_kind, ModifierKind::None);
        assert_eq!(talent.modifier_target, "all");
        assert_eq!(talent.modifier_value, 0);
        assert!(talent.active);
    }
}
