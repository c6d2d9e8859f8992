//! Dice rolling value objects and parsing
//!
//! Supports dice formulas like "3d6+4", "3d6 + 2 + 1 - 1", "1d6*5", etc.
//! Randomness is injected by the caller as a `FnMut(min, max) -> i32` closure,
//! so the domain never owns an RNG.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected XdY, XdY*M or XdY+Z...
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
    /// Multiplier must be at least 1
    #[error("Multiplier must be at least 1")]
    InvalidMultiplier,
    /// A term, or the lowest or highest total, does not fit in an i32
    #[error("Formula total is out of range")]
    ModifierOverflow,
}

/// A parsed dice formula like "3d6+4" or "1d6*5"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    /// Number of dice to roll (X in XdY)
    pub dice_count: u8,
    /// Size of each die (Y in XdY)
    pub die_size: u8,
    /// Factor applied to the dice sum (M in XdY*M)
    pub multiplier: i32,
    /// Flat modifier added after rolling (sum of every +Z / -Z term)
    pub modifier: i32,
}

impl DiceFormula {
    /// Create a new dice formula
    pub fn new(dice_count: u8, die_size: u8, modifier: i32) -> Result<Self, DiceParseError> {
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if die_size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        Ok(Self {
            dice_count,
            die_size,
            multiplier: 1,
            modifier,
        })
    }

    /// The core resolution roll: 3d6 plus a flat modifier.
    pub fn three_d6(modifier: i32) -> Self {
        Self {
            dice_count: 3,
            die_size: 6,
            multiplier: 1,
            modifier,
        }
    }

    /// A single six-sided die (used to pick a random subsystem).
    pub fn d6() -> Self {
        Self {
            dice_count: 1,
            die_size: 6,
            multiplier: 1,
            modifier: 0,
        }
    }

    /// Shield attrition / shield repair amount: 1d6 x 5 percentage points.
    pub fn shield_percent() -> Self {
        Self {
            dice_count: 1,
            die_size: 6,
            multiplier: 5,
            modifier: 0,
        }
    }

    /// Create a copy with the given multiplier.
    pub fn with_multiplier(self, multiplier: i32) -> Result<Self, DiceParseError> {
        if multiplier < 1 {
            return Err(DiceParseError::InvalidMultiplier);
        }
        Ok(Self { multiplier, ..self })
    }

    /// Parse a dice formula string
    ///
    /// Supported formats (whitespace is ignored):
    /// - "XdY" - Roll X dice of size Y
    /// - "dY" - Roll 1 die of size Y (shorthand)
    /// - "XdY*M" / "XdYxM" - Multiply the dice sum by M
    /// - "XdY+Z-W+..." - Any number of signed flat terms, including "+ -2"
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        // Find 'd' separator
        let d_pos = input.find('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        // Parse dice count (before 'd')
        let dice_count_str = &input[..d_pos];
        let dice_count: u8 = if dice_count_str.is_empty() {
            1 // "d6" means "1d6"
        } else {
            dice_count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", dice_count_str))
            })?
        };

        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }

        // Parse die size (digits right after 'd')
        let after_d = &input[d_pos + 1..];
        let (die_size_str, mut rest) = split_leading_digits(after_d);
        let die_size: u8 = die_size_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", die_size_str))
        })?;

        if die_size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }

        // Optional multiplier
        let mut multiplier = 1;
        if let Some(after_mul) = rest.strip_prefix('*').or_else(|| rest.strip_prefix('x')) {
            let (mul_str, tail) = split_leading_digits(after_mul);
            multiplier = mul_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid multiplier: '{}'", after_mul))
            })?;
            if multiplier < 1 {
                return Err(DiceParseError::InvalidMultiplier);
            }
            rest = tail;
        }

        let modifier = parse_flat_terms(rest)?;

        let formula = Self {
            dice_count,
            die_size,
            multiplier,
            modifier,
        };
        formula.checked_bounds().ok_or(DiceParseError::ModifierOverflow)?;
        Ok(formula)
    }

    /// Lowest and highest possible totals, or `None` when either does not
    /// fit in an `i32`.
    pub fn checked_bounds(&self) -> Option<(i32, i32)> {
        let count = i32::from(self.dice_count);
        let min = count
            .checked_mul(self.multiplier)?
            .checked_add(self.modifier)?;
        let max = count
            .checked_mul(i32::from(self.die_size))?
            .checked_mul(self.multiplier)?
            .checked_add(self.modifier)?;
        Some((min, max))
    }

    /// Roll the dice with the injected random source.
    ///
    /// `rng(min, max)` must return a value in the inclusive range.
    pub fn roll(&self, mut rng: impl FnMut(i32, i32) -> i32) -> DiceRollResult {
        let individual_rolls: Vec<i32> = (0..self.dice_count)
            .map(|_| rng(1, self.die_size as i32))
            .collect();

        let dice_total = individual_rolls
            .iter()
            .fold(0i32, |sum, face| sum.saturating_add(*face));
        // Parsed formulas are bounded; hand-built ones saturate.
        let total = dice_total
            .saturating_mul(self.multiplier)
            .saturating_add(self.modifier);

        DiceRollResult {
            formula: *self,
            individual_rolls,
            dice_total,
            modifier_applied: self.modifier,
            total,
        }
    }

    /// Get the minimum possible roll
    pub fn min_roll(&self) -> i32 {
        i32::from(self.dice_count)
            .saturating_mul(self.multiplier)
            .saturating_add(self.modifier)
    }

    /// Get the maximum possible roll
    pub fn max_roll(&self) -> i32 {
        (i32::from(self.dice_count) * i32::from(self.die_size))
            .saturating_mul(self.multiplier)
            .saturating_add(self.modifier)
    }

    /// Format as a display string (e.g., "3d6+4", "1d6*5")
    pub fn display(&self) -> String {
        let mut out = format!("{}d{}", self.dice_count, self.die_size);
        if self.multiplier != 1 {
            out.push_str(&format!("*{}", self.multiplier));
        }
        if self.modifier > 0 {
            out.push_str(&format!("+{}", self.modifier));
        } else if self.modifier < 0 {
            out.push_str(&format!("{}", self.modifier));
        }
        out
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn split_leading_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Sum a run of signed terms such as "+3+2-1" or "+-2".
fn parse_flat_terms(mut rest: &str) -> Result<i32, DiceParseError> {
    let mut total: i32 = 0;
    while let Some(first) = rest.chars().next() {
        let mut sign = match first {
            '+' => 1,
            '-' => -1,
            _ => {
                return Err(DiceParseError::InvalidFormat(format!(
                    "Unexpected term: '{}'",
                    rest
                )))
            }
        };
        let mut tail = &rest[1..];
        if let Some(stripped) = tail.strip_prefix('-') {
            sign = -sign;
            tail = stripped;
        } else if let Some(stripped) = tail.strip_prefix('+') {
            tail = stripped;
        }

        let (digits, remaining) = split_leading_digits(tail);
        if digits.is_empty() {
            return Err(DiceParseError::InvalidFormat(format!(
                "Invalid modifier: '{}'",
                rest
            )));
        }
        let value: i32 = digits
            .parse()
            .map_err(|_| DiceParseError::ModifierOverflow)?;
        total = total
            .checked_add(sign * value)
            .ok_or(DiceParseError::ModifierOverflow)?;
        rest = remaining;
    }
    Ok(total)
}

/// Result of rolling dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollResult {
    /// The formula that was rolled
    pub formula: DiceFormula,
    /// Individual die results
    pub individual_rolls: Vec<i32>,
    /// Sum of dice before multiplier and modifier
    pub dice_total: i32,
    /// Modifier that was applied
    pub modifier_applied: i32,
    /// Final total (dice_total * multiplier + modifier)
    pub total: i32,
}

impl DiceRollResult {
    /// Format as a breakdown string (e.g., "3d6[4, 2, 6] + 5 = 17")
    pub fn breakdown(&self) -> String {
        let rolls_str: Vec<String> = self
            .individual_rolls
            .iter()
            .map(|r| r.to_string())
            .collect();
        let mut out = format!(
            "{}d{}[{}]",
            self.formula.dice_count,
            self.formula.die_size,
            rolls_str.join(", ")
        );
        if self.formula.multiplier != 1 {
            out.push_str(&format!(" x {}", self.formula.multiplier));
        }
        if self.modifier_applied > 0 {
            out.push_str(&format!(" + {}", self.modifier_applied));
        } else if self.modifier_applied < 0 {
            out.push_str(&format!(" - {}", -self.modifier_applied));
        }
        format!("{} = {}", out, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns the given faces in order, cycling.
    fn faces(values: &'static [i32]) -> impl FnMut(i32, i32) -> i32 {
        let mut idx = 0;
        move |_, _| {
            let v = values[idx % values.len()];
            idx += 1;
            v
        }
    }

    #[test]
    fn test_parse_three_d6() {
        let formula = DiceFormula::parse("3d6").unwrap();
        assert_eq!(formula.dice_count, 3);
        assert_eq!(formula.die_size, 6);
        assert_eq!(formula.multiplier, 1);
        assert_eq!(formula.modifier, 0);
    }

    #[test]
    fn test_parse_shorthand_d6() {
        let formula = DiceFormula::parse("d6").unwrap();
        assert_eq!(formula.dice_count, 1);
        assert_eq!(formula.die_size, 6);
    }

    #[test]
    fn test_parse_spaced_terms() {
        // Shape produced by the check evaluator for reroll buttons
        let formula = DiceFormula::parse("3d6 + 3 + 2 + 1 + 0").unwrap();
        assert_eq!(formula.dice_count, 3);
        assert_eq!(formula.modifier, 6);
    }

    #[test]
    fn test_parse_negative_embedded_term() {
        let formula = DiceFormula::parse("3d6 + 2 + -3").unwrap();
        assert_eq!(formula.modifier, -1);
    }

    #[test]
    fn test_parse_subtraction() {
        let formula = DiceFormula::parse("3d6-2-1").unwrap();
        assert_eq!(formula.modifier, -3);
    }

    #[test]
    fn test_parse_multiplier() {
        let formula = DiceFormula::parse("1d6 * 5").unwrap();
        assert_eq!(formula, DiceFormula::shield_percent());

        let formula = DiceFormula::parse("1d6x5").unwrap();
        assert_eq!(formula.multiplier, 5);
    }

    #[test]
    fn test_parse_case_insensitive() {
        let formula = DiceFormula::parse("3D6+5").unwrap();
        assert_eq!(formula.die_size, 6);
        assert_eq!(formula.modifier, 5);
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(DiceFormula::parse("  "), Err(DiceParseError::Empty)));
    }

    #[test]
    fn test_parse_invalid_no_d() {
        assert!(matches!(
            DiceFormula::parse("20"),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_invalid_zero_dice() {
        assert!(matches!(
            DiceFormula::parse("0d6"),
            Err(DiceParseError::InvalidDiceCount)
        ));
    }

    #[test]
    fn test_parse_invalid_die_size() {
        assert!(matches!(
            DiceFormula::parse("1d1"),
            Err(DiceParseError::InvalidDieSize)
        ));
    }

    #[test]
    fn test_parse_zero_multiplier() {
        assert!(matches!(
            DiceFormula::parse("1d6*0"),
            Err(DiceParseError::InvalidMultiplier)
        ));
    }

    #[test]
    fn test_parse_trailing_garbage() {
        assert!(matches!(
            DiceFormula::parse("3d6+@attr"),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unrepresentable_totals() {
        assert_eq!(
            DiceFormula::parse("3d6+2147483647"),
            Err(DiceParseError::ModifierOverflow)
        );
        assert_eq!(
            DiceFormula::parse("3d6*1000000000"),
            Err(DiceParseError::ModifierOverflow)
        );
        assert_eq!(
            DiceFormula::parse("1d6-2147483647"),
            Ok(DiceFormula {
                dice_count: 1,
                die_size: 6,
                multiplier: 1,
                modifier: -2147483647,
            })
        );
        assert_eq!(
            DiceFormula::parse("3d6*2147483647"),
            Err(DiceParseError::ModifierOverflow)
        );
    }

    #[test]
    fn test_hand_built_formula_saturates() {
        let formula = DiceFormula {
            dice_count: 3,
            die_size: 6,
            multiplier: 1,
            modifier: i32::MAX,
        };
        assert_eq!(formula.roll(faces(&[6])).total, i32::MAX);
        assert_eq!(formula.max_roll(), i32::MAX);
        assert_eq!(formula.checked_bounds(), None);
    }

    #[test]
    fn test_roll_uses_injected_faces() {
        let result = DiceFormula::three_d6(4).roll(faces(&[6, 5, 1]));
        assert_eq!(result.individual_rolls, vec![6, 5, 1]);
        assert_eq!(result.dice_total, 12);
        assert_eq!(result.total, 16);
    }

    #[test]
    fn test_roll_multiplier() {
        let result = DiceFormula::shield_percent().roll(faces(&[4]));
        assert_eq!(result.total, 20);
    }

    #[test]
    fn test_min_max() {
        let shield = DiceFormula::shield_percent();
        assert_eq!(shield.min_roll(), 5);
        assert_eq!(shield.max_roll(), 30);
        let check = DiceFormula::three_d6(-2);
        assert_eq!(check.min_roll(), 1);
        assert_eq!(check.max_roll(), 16);
    }

    #[test]
    fn test_breakdown() {
        let result = DiceFormula::three_d6(3).roll(faces(&[4, 5, 2]));
        assert_eq!(result.breakdown(), "3d6[4, 5, 2] + 3 = 14");

        let result = DiceFormula::shield_percent().roll(faces(&[3]));
        assert_eq!(result.breakdown(), "1d6[3] x 5 = 15");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for formula in [
            DiceFormula::three_d6(0),
            DiceFormula::three_d6(6),
            DiceFormula::three_d6(-2),
            DiceFormula::shield_percent(),
        ] {
            assert_eq!(DiceFormula::parse(&formula.display()).unwrap(), formula);
        }
    }
}
