//! The 3d6 check: a labelled sum of flat terms plus three six-sided dice.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{DiceFormula, DiceRollResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckKind {
    Attribute,
    Initiative,
    Skill,
    WeaponAttack,
    Survival,
    ShipAttack,
    ShipEffect,
    Repair,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Attribute => "ATTRIBUTE",
            Self::Initiative => "INITIATIVE",
            Self::Skill => "SKILL",
            Self::WeaponAttack => "ATTACK",
            Self::Survival => "CONSCIOUSNESS",
            Self::ShipAttack => "SHIP ATTACK",
            Self::ShipEffect => "EFFECT",
            Self::Repair => "REPAIR",
        };
        f.write_str(s)
    }
}

/// One named flat contribution to a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTerm {
    pub label: String,
    pub value: i32,
}

impl CheckTerm {
    pub fn new(label: impl Into<String>, value: i32) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// What to roll, before the dice hit the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSpec {
    pub label: String,
    pub kind: CheckKind,
    pub terms: Vec<CheckTerm>,
    pub target_number: Option<i32>,
}

impl CheckSpec {
    pub fn new(kind: CheckKind, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind,
            terms: Vec::new(),
            target_number: None,
        }
    }

    pub fn term(mut self, label: impl Into<String>, value: i32) -> Self {
        self.terms.push(CheckTerm::new(label, value));
        self
    }

    pub fn with_target(mut self, target_number: i32) -> Self {
        self.target_number = Some(target_number);
        self
    }

    /// Sum of all flat terms. No clamping; negative is fine.
    pub fn modifier(&self) -> i32 {
        self.terms.iter().map(|t| t.value).sum()
    }

    pub fn dice(&self) -> DiceFormula {
        DiceFormula::three_d6(self.modifier())
    }

    /// Re-executable formula keeping every term, e.g. "3d6 + 3 + 2 + 1 + 0".
    pub fn formula(&self) -> String {
        let mut out = String::from("3d6");
        for term in &self.terms {
            out.push_str(&format!(" + {}", term.value));
        }
        out
    }

    pub fn roll(&self, rng: impl FnMut(i32, i32) -> i32) -> CheckResult {
        let roll = self.dice().roll(rng);
        CheckResult::from_roll(self, roll)
    }
}

/// A rolled check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub label: String,
    pub kind: CheckKind,
    pub terms: Vec<CheckTerm>,
    pub dice: Vec<i32>,
    pub total: i32,
    pub target_number: Option<i32>,
    /// `Some` only when a target number was set.
    pub success: Option<bool>,
    pub formula: String,
}

impl CheckResult {
    fn from_roll(spec: &CheckSpec, roll: DiceRollResult) -> Self {
        let success = spec.target_number.map(|tn| roll.total >= tn);
        Self {
            label: spec.label.clone(),
            kind: spec.kind,
            terms: spec.terms.clone(),
            dice: roll.individual_rolls,
            total: roll.total,
            target_number: spec.target_number,
            success,
            formula: spec.formula(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.success.unwrap_or(false)
    }
}

/// Assemble the standard check: 3d6 + base + rank + talent + situational.
pub fn evaluate_check(
    kind: CheckKind,
    label: impl Into<String>,
    base: CheckTerm,
    rank: i32,
    talent: i32,
    situational: i32,
) -> CheckSpec {
    CheckSpec::new(kind, label)
        .term(base.label, base.value)
        .term("RANK", rank)
        .term("TALENT", talent)
        .term("MOD", situational)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(face: i32) -> impl FnMut(i32, i32) -> i32 {
        move |_, _| face
    }

    #[test]
    fn standard_check_sums_every_term() {
        let spec = evaluate_check(
            CheckKind::WeaponAttack,
            "Phaser",
            CheckTerm::new("DEXTERITY", 3),
            2,
            1,
            0,
        );
        assert_eq!(spec.modifier(), 6);
        assert_eq!(spec.dice(), DiceFormula::three_d6(6));
        assert_eq!(spec.formula(), "3d6 + 3 + 2 + 1 + 0");
    }

    #[test]
    fn negative_totals_are_not_clamped() {
        let spec = evaluate_check(
            CheckKind::Attribute,
            "STRENGTH",
            CheckTerm::new("STRENGTH", -4),
            0,
            0,
            -5,
        );
        let result = spec.roll(fixed(1));
        assert_eq!(result.total, -6);
    }

    #[test]
    fn formula_round_trips_through_parser() {
        let spec = evaluate_check(
            CheckKind::Skill,
            "Medicine",
            CheckTerm::new("INTELLIGENCE", 2),
            3,
            -1,
            -2,
        );
        let parsed = DiceFormula::parse(&spec.formula()).unwrap();
        assert_eq!(parsed, spec.dice());
    }

    #[test]
    fn success_only_reported_with_target() {
        let open = CheckSpec::new(CheckKind::Initiative, "Initiative").term("DEXTERITY", 2);
        let result = open.roll(fixed(3));
        assert_eq!(result.total, 11);
        assert_eq!(result.success, None);
        assert!(!result.succeeded());

        let gated = open.clone().with_target(11);
        assert_eq!(gated.roll(fixed(3)).success, Some(true));
        let gated = open.with_target(12);
        assert_eq!(gated.roll(fixed(3)).success, Some(false));
    }
}
