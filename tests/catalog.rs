// Invariants of the static game data.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use cosmic_guess::catalog::{DifficultyId, LEVELS, SKILLS, SPECIAL_NUMBERS, ThemeId};
use cosmic_guess::numbers::is_interesting;

#[test]
fn level_thresholds_strictly_ascend_from_zero() {
    assert_eq!(LEVELS[0].xp, 0);
    for pair in LEVELS.windows(2) {
        assert!(pair[0].xp < pair[1].xp, "'{}' is not below '{}'", pair[0].title, pair[1].title);
    }
}

#[test]
fn skills_are_unique_and_ordered_by_cost() {
    let mut seen = HashSet::new();
    for skill in SKILLS {
        assert!(seen.insert(skill.id), "duplicate skill {:?}", skill.id);
        assert_eq!(skill.id.skill(), skill);
        assert_eq!(skill.id.as_str().parse(), Ok(skill.id));
        assert!(skill.cost > 0);
    }
    assert!(SKILLS.windows(2).all(|w| w[0].cost < w[1].cost));
}

#[test]
fn difficulty_ranges_are_sane() {
    for d in DifficultyId::ALL {
        let s = d.settings();
        assert!(s.min < s.max, "{d} has an empty range");
        assert!(s.max <= 500);
        assert!(s.xp_multiplier > 0.0);
        assert_eq!(d.as_str().parse(), Ok(d));
    }
}

#[test]
fn legendary_numbers_are_unique_and_interesting() {
    let mut seen = HashSet::new();
    for special in SPECIAL_NUMBERS {
        assert!(seen.insert(special.value), "duplicate legendary number {}", special.value);
        assert!(is_interesting(special.value));
        assert!(!special.name.is_empty());
    }
}

#[test]
fn theme_ids_round_trip() {
    for t in ThemeId::ALL {
        assert_eq!(t.as_str().parse(), Ok(t));
    }
    assert!("disco".parse::<ThemeId>().is_err());
}
