//! Power meter and proximity hints.
//!
//! Tier boundaries are fractions of the range span, rounded up. They are kept
//! in per-mille and evaluated with integer math so a boundary such as 5% of 99
//! lands exactly on 5.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::SkillId;
use crate::numbers::{is_fibonacci, is_perfect_square, is_prime};

pub const MAX_POWER: u8 = 100;

/// `ceil(span * permille / 1000)`
fn threshold(span: u32, permille: u32) -> u32 {
    (span as u64 * permille as u64).div_ceil(1000) as u32
}

/// Power change for a guess, before any skill adjustments.
pub fn power_delta(secret: u32, guess: u32, min: u32, max: u32) -> i32 {
    let diff = secret.abs_diff(guess);
    let span = max - min;
    match diff {
        0 => 30,
        d if d <= threshold(span, 50) => 15,
        d if d <= threshold(span, 150) => 8,
        d if d <= threshold(span, 300) => 0,
        d if d <= threshold(span, 500) => -5,
        _ => -10,
    }
}

/// Returns the clamped new power and the delta that was requested.
pub fn update_power(secret: u32, guess: u32, min: u32, max: u32, power: u8) -> (u8, i32) {
    let delta = power_delta(secret, guess, min, max);
    (apply_delta(power, delta), delta)
}

pub fn apply_delta(power: u8, delta: i32) -> u8 {
    (power as i32 + delta).clamp(0, MAX_POWER as i32) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HintTier {
    Found,
    Quantum,
    Stellar,
    Dimensional,
    Oracle,
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub text: String,
    pub emoji: &'static str,
    pub tier: HintTier,
}

pub fn generate_hint(secret: u32, guess: u32, min: u32, max: u32, skills: &BTreeSet<SkillId>) -> Hint {
    let diff = secret.abs_diff(guess);
    if diff == 0 {
        return Hint {
            text: "🎉 COSMIC HARMONY ACHIEVED! You've found the number! 🎉".into(),
            emoji: "🎊",
            tier: HintTier::Found,
        };
    }

    let span = max - min;
    // Range Sense scales every boundary by 0.8.
    let scale = if skills.contains(&SkillId::RangeBoost) { 8 } else { 10 };
    let within = |percent: u32| diff <= threshold(span, percent * scale);

    let (tier, emoji, base) = if within(2) {
        (HintTier::Quantum, "⚡", "⚡ QUANTUM RESONANCE! You're within the atomic field!")
    } else if within(5) {
        (HintTier::Stellar, "🌟", "🌟 STELLAR CONVERGENCE! Cosmic forces align nearby!")
    } else if within(10) {
        (HintTier::Dimensional, "🌀", "🌀 DIMENSIONAL ECHO! The number's vibration is strong!")
    } else if within(20) {
        (HintTier::Oracle, "🔮", "🔮 ORACLE'S WHISPER! You're on the right cosmic path...")
    } else {
        (HintTier::Static, "🌌", "🌌 COSMIC STATIC! The signal is faint across the void...")
    };

    let mut text = String::from(base);
    if skills.contains(&SkillId::PrimeVision) && is_prime(secret) {
        text.push_str(" The number resonates with prime energy!");
    }
    if skills.contains(&SkillId::CosmicInsight) {
        if is_perfect_square(secret) {
            text.push_str(" Geometric patterns detected!");
        } else if is_fibonacci(secret) {
            text.push_str(" Golden ratio harmonics present!");
        }
    }
    if guess < secret {
        text.push_str(" Ascend to higher frequencies!");
    } else {
        text.push_str(" Descend to lower vibrations!");
    }

    Hint { text, emoji, tier }
}

/// Suffix appended to the hint so the player sees the meter move.
pub fn power_suffix(delta: i32) -> String {
    match delta {
        d if d > 0 => format!(" +{d}% power!"),
        d if d < 0 => format!(" {d}% power."),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_skills() -> BTreeSet<SkillId> {
        BTreeSet::new()
    }

    #[test]
    fn test_power_tiers_on_explorer_range() {
        // span = 99: thresholds 5, 15, 30, 50
        assert_eq!(power_delta(50, 50, 1, 100), 30);
        assert_eq!(power_delta(50, 55, 1, 100), 15);
        assert_eq!(power_delta(50, 56, 1, 100), 8);
        assert_eq!(power_delta(50, 65, 1, 100), 8);
        assert_eq!(power_delta(50, 80, 1, 100), 0);
        assert_eq!(power_delta(50, 81, 1, 100), -5);
        assert_eq!(power_delta(1, 51, 1, 100), -5);
        assert_eq!(power_delta(1, 52, 1, 100), -10);
    }

    #[test]
    fn test_power_clamps() {
        assert_eq!(update_power(10, 10, 1, 100, 100), (100, 30));
        assert_eq!(update_power(1, 100, 1, 100, 0), (0, -10));
        assert_eq!(update_power(1, 100, 1, 100, 4), (0, -10));
    }

    #[test]
    fn test_hint_tiers_and_direction() {
        // span 99: 2% -> 2, 5% -> 5, 10% -> 10, 20% -> 20
        let h = generate_hint(50, 48, 1, 100, &no_skills());
        assert_eq!(h.tier, HintTier::Quantum);
        assert!(h.text.ends_with("Ascend to higher frequencies!"));
        assert_eq!(generate_hint(50, 55, 1, 100, &no_skills()).tier, HintTier::Stellar);
        assert_eq!(generate_hint(50, 60, 1, 100, &no_skills()).tier, HintTier::Dimensional);
        let h = generate_hint(50, 70, 1, 100, &no_skills());
        assert_eq!(h.tier, HintTier::Oracle);
        assert!(h.text.ends_with("Descend to lower vibrations!"));
        assert_eq!(generate_hint(50, 71, 1, 100, &no_skills()).tier, HintTier::Static);
        assert_eq!(generate_hint(50, 50, 1, 100, &no_skills()).tier, HintTier::Found);
    }

    #[test]
    fn test_range_boost_narrows_thresholds() {
        // 20% of 99 is 20, scaled to 16% it is 16.
        let skills: BTreeSet<_> = [SkillId::RangeBoost].into();
        assert_eq!(generate_hint(50, 70, 1, 100, &no_skills()).tier, HintTier::Oracle);
        assert_eq!(generate_hint(50, 70, 1, 100, &skills).tier, HintTier::Static);
        assert_eq!(generate_hint(50, 66, 1, 100, &skills).tier, HintTier::Oracle);
    }

    #[test]
    fn test_insight_clauses() {
        let skills: BTreeSet<_> = [SkillId::PrimeVision, SkillId::CosmicInsight].into();
        let prime = generate_hint(37, 10, 1, 100, &skills);
        assert!(prime.text.contains("prime energy"));
        assert!(!prime.text.contains("37"));
        let square = generate_hint(64, 10, 1, 100, &skills);
        assert!(square.text.contains("Geometric patterns"));
        assert!(!square.text.contains("prime energy"));
        let fib = generate_hint(21, 10, 1, 100, &skills);
        assert!(fib.text.contains("Golden ratio"));
        assert!(!generate_hint(37, 10, 1, 100, &no_skills()).text.contains("prime energy"));
    }

    #[test]
    fn test_power_suffix() {
        assert_eq!(power_suffix(15), " +15% power!");
        assert_eq!(power_suffix(-5), " -5% power.");
        assert_eq!(power_suffix(0), "");
    }
}
