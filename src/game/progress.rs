//! Durable player progression: xp, levels, streaks, skills and the gallery of
//! legendary numbers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{
    DifficultyId, LEVELS, Skill, SkillId, SpecialNumber, ThemeId, level_for_xp, level_requirement,
    special_number,
};
use crate::error::UnlockError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgress {
    pub xp: u32,
    pub level: u32,
    pub total_guesses: u32,
    pub numbers_found: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub unlocked_skills: BTreeSet<SkillId>,
    /// Legendary numbers discovered so far, keyed by their decimal string.
    pub collected_numbers: BTreeSet<String>,
    pub difficulty: DifficultyId,
    pub theme: ThemeId,
    pub best_time_attack_score: u32,
    pub music_enabled: bool,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            total_guesses: 0,
            numbers_found: 0,
            current_streak: 0,
            best_streak: 0,
            unlocked_skills: BTreeSet::new(),
            collected_numbers: BTreeSet::new(),
            difficulty: DifficultyId::default(),
            theme: ThemeId::default(),
            best_time_attack_score: 0,
            music_enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub level: u32,
    pub title: &'static str,
}

/// Xp earned by a classic win, itemized for the victory banner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundXp {
    pub base: f64,
    pub special_bonus: u32,
    pub streak_bonus: u32,
    pub total: u32,
}

pub fn compute_round_xp(attempts: u32, multiplier: f64, is_special: bool, streak: u32) -> RoundXp {
    let base = 50u32.saturating_sub(attempts).max(10) as f64 * multiplier;
    let special_bonus = if is_special { 25 } else { 0 };
    let streak_bonus = streak / 5 * 10;
    let total = (base + special_bonus as f64 + streak_bonus as f64).round() as u32;
    RoundXp {
        base,
        special_bonus,
        streak_bonus,
        total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillStatus {
    Unlocked,
    Available,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub title: &'static str,
    pub next_threshold: u32,
    /// Percent of the way to the next title, capped at 100.
    pub percent: f64,
}

impl PlayerProgress {
    /// Adds xp and raises the level when a threshold is crossed. Levels never
    /// go down, even after skill purchases spend xp.
    pub fn add_xp(&mut self, amount: u32) -> Option<LevelUp> {
        self.xp = self.xp.saturating_add(amount);
        let reached = level_for_xp(self.xp);
        if reached > self.level {
            self.level = reached;
            return Some(LevelUp {
                level: reached,
                title: level_requirement(reached).title,
            });
        }
        None
    }

    pub fn record_win(&mut self) {
        self.numbers_found += 1;
        self.total_guesses += 1;
        self.current_streak += 1;
        self.best_streak = self.best_streak.max(self.current_streak);
    }

    pub fn reset_streak(&mut self) {
        self.current_streak = 0;
    }

    pub fn unlock_skill(&mut self, id: SkillId) -> Result<&'static Skill, UnlockError> {
        let skill = id.skill();
        if self.unlocked_skills.contains(&id) {
            return Err(UnlockError::AlreadyUnlocked);
        }
        if self.xp < skill.cost {
            return Err(UnlockError::InsufficientXp {
                have: self.xp,
                cost: skill.cost,
            });
        }
        self.xp -= skill.cost;
        self.unlocked_skills.insert(id);
        Ok(skill)
    }

    /// Records a legendary number the first time it is guessed.
    pub fn collect(&mut self, n: u32) -> Option<&'static SpecialNumber> {
        let special = special_number(n)?;
        self.collected_numbers.insert(n.to_string()).then_some(special)
    }

    /// Returns true when `score` beats the stored record.
    pub fn record_time_attack_score(&mut self, score: u32) -> bool {
        if score > self.best_time_attack_score {
            self.best_time_attack_score = score;
            return true;
        }
        false
    }

    pub fn accuracy_percent(&self) -> u32 {
        if self.total_guesses == 0 {
            return 0;
        }
        (self.numbers_found as f64 / self.total_guesses as f64 * 100.0).round() as u32
    }

    pub fn level_progress(&self) -> LevelProgress {
        let current = level_requirement(self.level);
        let next = LEVELS.get(self.level as usize).unwrap_or(&LEVELS[LEVELS.len() - 1]);
        let needed = next.xp.saturating_sub(current.xp);
        let percent = if needed == 0 {
            100.0
        } else {
            (self.xp.saturating_sub(current.xp) as f64 / needed as f64 * 100.0).min(100.0)
        };
        LevelProgress {
            level: self.level,
            title: current.title,
            next_threshold: next.xp,
            percent,
        }
    }

    pub fn skill_status(&self, id: SkillId) -> SkillStatus {
        if self.unlocked_skills.contains(&id) {
            SkillStatus::Unlocked
        } else if self.xp >= id.skill().cost {
            SkillStatus::Available
        } else {
            SkillStatus::Locked
        }
    }
}
