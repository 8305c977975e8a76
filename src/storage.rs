//! Persistence of [`PlayerProgress`] in a flat key-value store.
//!
//! Each field lives under its own key so that a single corrupt entry only
//! resets that field. Sets are stored as JSON arrays.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::catalog::{LEVELS, SkillId, level_for_xp, special_number};
use crate::error::StorageError;
use crate::game::PlayerProgress;

pub const KEY_XP: &str = "xp";
pub const KEY_LEVEL: &str = "level";
pub const KEY_TOTAL_GUESSES: &str = "totalGuesses";
pub const KEY_NUMBERS_FOUND: &str = "numbersFound";
pub const KEY_UNLOCKED_SKILLS: &str = "unlockedSkills";
pub const KEY_COLLECTED_NUMBERS: &str = "collectedNumbers";
pub const KEY_THEME: &str = "currentTheme";
pub const KEY_CURRENT_STREAK: &str = "currentStreak";
pub const KEY_BEST_STREAK: &str = "bestStreak";
pub const KEY_DIFFICULTY: &str = "difficulty";
pub const KEY_BEST_TIME_ATTACK: &str = "bestTimeAttackScore";
pub const KEY_MUSIC_ENABLED: &str = "musicEnabled";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and headless use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StorageError::Write(key.to_string()))
    }
}

/// Either store, so the web adapter can degrade to memory when storage is blocked.
pub enum BrowserStore {
    Local(LocalStore),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match LocalStore::open() {
            Ok(local) => Self::Local(local),
            Err(e) => {
                log::warn!("{e}; progress will not survive a reload");
                Self::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            Self::Local(s) => s.get(key),
            Self::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(s) => s.set(key, value),
            Self::Memory(s) => s.set(key, value),
        }
    }
}

// -----------------------------------------------------------------------------
// Load / save
// -----------------------------------------------------------------------------

fn field<T: FromStr>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        log::warn!("ignoring unreadable value for '{key}'");
    }
    parsed
}

fn json_field<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    let parsed = serde_json::from_str(&raw).ok();
    if parsed.is_none() {
        log::warn!("ignoring unreadable value for '{key}'");
    }
    parsed
}

/// Reads progress, substituting the default for every missing or corrupt field.
pub fn load_progress(store: &impl KeyValueStore) -> PlayerProgress {
    let defaults = PlayerProgress::default();

    let xp = field(store, KEY_XP).unwrap_or(defaults.xp);
    let stored_level: u32 = field(store, KEY_LEVEL).unwrap_or(defaults.level);
    let level = stored_level.max(level_for_xp(xp)).clamp(1, LEVELS.len() as u32);

    let unlocked_skills = json_field::<Vec<String>>(store, KEY_UNLOCKED_SKILLS)
        .map(|ids| ids.iter().filter_map(|id| id.parse::<SkillId>().ok()).collect())
        .unwrap_or_default();

    let collected_numbers = json_field::<Vec<serde_json::Value>>(store, KEY_COLLECTED_NUMBERS)
        .map(|keys| {
            keys.iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) => s.parse::<u32>().ok(),
                    other => other.as_u64().and_then(|n| u32::try_from(n).ok()),
                })
                .filter(|&n| special_number(n).is_some())
                .map(|n| n.to_string())
                .collect()
        })
        .unwrap_or_default();

    let current_streak: u32 = field(store, KEY_CURRENT_STREAK).unwrap_or(defaults.current_streak);
    let best_streak = field::<u32>(store, KEY_BEST_STREAK)
        .unwrap_or(defaults.best_streak)
        .max(current_streak);

    PlayerProgress {
        xp,
        level,
        total_guesses: field(store, KEY_TOTAL_GUESSES).unwrap_or(defaults.total_guesses),
        numbers_found: field(store, KEY_NUMBERS_FOUND).unwrap_or(defaults.numbers_found),
        current_streak,
        best_streak,
        unlocked_skills,
        collected_numbers,
        difficulty: field(store, KEY_DIFFICULTY).unwrap_or(defaults.difficulty),
        theme: field(store, KEY_THEME).unwrap_or(defaults.theme),
        best_time_attack_score: field(store, KEY_BEST_TIME_ATTACK)
            .unwrap_or(defaults.best_time_attack_score),
        music_enabled: field(store, KEY_MUSIC_ENABLED).unwrap_or(defaults.music_enabled),
    }
}

/// Writes every field. Callers invoke this once per action, after all fields
/// that change together (xp and level, streaks) have been updated.
pub fn save_progress(
    store: &mut impl KeyValueStore,
    progress: &PlayerProgress,
) -> Result<(), StorageError> {
    let skills: Vec<&str> = progress.unlocked_skills.iter().map(|s| s.as_str()).collect();
    let skills = serde_json::to_string(&skills).map_err(|_| StorageError::Write(KEY_UNLOCKED_SKILLS.into()))?;
    let collected = serde_json::to_string(&progress.collected_numbers)
        .map_err(|_| StorageError::Write(KEY_COLLECTED_NUMBERS.into()))?;

    store.set(KEY_XP, &progress.xp.to_string())?;
    store.set(KEY_LEVEL, &progress.level.to_string())?;
    store.set(KEY_TOTAL_GUESSES, &progress.total_guesses.to_string())?;
    store.set(KEY_NUMBERS_FOUND, &progress.numbers_found.to_string())?;
    store.set(KEY_UNLOCKED_SKILLS, &skills)?;
    store.set(KEY_COLLECTED_NUMBERS, &collected)?;
    store.set(KEY_THEME, progress.theme.as_str())?;
    store.set(KEY_CURRENT_STREAK, &progress.current_streak.to_string())?;
    store.set(KEY_BEST_STREAK, &progress.best_streak.to_string())?;
    store.set(KEY_DIFFICULTY, progress.difficulty.as_str())?;
    store.set(KEY_BEST_TIME_ATTACK, &progress.best_time_attack_score.to_string())?;
    store.set(KEY_MUSIC_ENABLED, &progress.music_enabled.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DifficultyId, ThemeId};

    #[test]
    fn test_empty_store_yields_defaults() {
        assert_eq!(load_progress(&MemoryStore::new()), PlayerProgress::default());
    }

    #[test]
    fn test_save_then_load_is_identity() {
        let mut progress = PlayerProgress {
            xp: 321,
            level: 3,
            total_guesses: 12,
            numbers_found: 9,
            current_streak: 2,
            best_streak: 5,
            difficulty: DifficultyId::Master,
            theme: ThemeId::Ocean,
            best_time_attack_score: 7,
            music_enabled: true,
            ..Default::default()
        };
        progress.unlocked_skills.insert(SkillId::PrimeVision);
        progress.unlocked_skills.insert(SkillId::RangeBoost);
        progress.collected_numbers.insert("7".into());
        progress.collected_numbers.insert("137".into());

        let mut store = MemoryStore::new();
        save_progress(&mut store, &progress).unwrap();
        assert_eq!(store.len(), 12);
        assert_eq!(load_progress(&store), progress);
        assert_eq!(store.get(KEY_UNLOCKED_SKILLS).as_deref(), Some(r#"["range-boost","prime-vision"]"#));
    }

    #[test]
    fn test_corrupt_fields_fall_back_individually() {
        let store = MemoryStore::new()
            .with_entry(KEY_XP, "lots")
            .with_entry(KEY_TOTAL_GUESSES, "17")
            .with_entry(KEY_UNLOCKED_SKILLS, "{broken")
            .with_entry(KEY_DIFFICULTY, "impossible")
            .with_entry(KEY_THEME, "nebula")
            .with_entry(KEY_MUSIC_ENABLED, "maybe");
        let p = load_progress(&store);
        assert_eq!(p.xp, 0);
        assert_eq!(p.total_guesses, 17);
        assert!(p.unlocked_skills.is_empty());
        assert_eq!(p.difficulty, DifficultyId::Explorer);
        assert_eq!(p.theme, ThemeId::Nebula);
        assert!(!p.music_enabled);
    }

    #[test]
    fn test_load_repairs_inconsistent_values() {
        let store = MemoryStore::new()
            .with_entry(KEY_XP, "350")
            .with_entry(KEY_LEVEL, "1")
            .with_entry(KEY_CURRENT_STREAK, "4")
            .with_entry(KEY_BEST_STREAK, "2")
            .with_entry(KEY_UNLOCKED_SKILLS, r#"["time-warp","x-ray"]"#)
            .with_entry(KEY_COLLECTED_NUMBERS, r#"["42", 7, "8"]"#);
        let p = load_progress(&store);
        assert_eq!(p.level, 3);
        assert_eq!(p.best_streak, 4);
        assert_eq!(p.unlocked_skills.into_iter().collect::<Vec<_>>(), vec![SkillId::TimeWarp]);
        assert_eq!(
            p.collected_numbers.into_iter().collect::<Vec<_>>(),
            vec!["42".to_string(), "7".to_string()]
        );
    }
}
