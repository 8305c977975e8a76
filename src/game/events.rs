//! Notifications for the rendering layer. Each action returns the events it
//! produced, in order; the page subscribes to them as JSON.

use serde::Serialize;

use super::Mode;
use super::progress::RoundXp;
use super::scoring::HintTier;
use super::timer::Urgency;
use crate::catalog::{DifficultyId, SkillId, ThemeId};
use crate::numbers::NumberTag;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    RoundStarted {
        mode: Mode,
        difficulty: DifficultyId,
        min: u32,
        max: u32,
        hint: String,
        emoji: &'static str,
        title: String,
        story: String,
        tags: Vec<NumberTag>,
    },
    HintUpdated {
        guess: u32,
        attempts: u32,
        text: String,
        emoji: &'static str,
        tier: HintTier,
        power_delta: i32,
        power: u8,
    },
    ValidationFailed {
        message: String,
    },
    Discovery {
        number: u32,
        name: &'static str,
        description: &'static str,
    },
    WinResult {
        secret: u32,
        attempts: u32,
        xp: RoundXp,
        story: String,
        tags: Vec<NumberTag>,
    },
    TimeAttackPoint {
        score: u32,
    },
    TimeBonus {
        seconds: u32,
        time_left: u32,
    },
    TimerTick {
        time_left: u32,
        duration: u32,
        urgency: Urgency,
    },
    RoundExpired {
        score: u32,
        best: u32,
        duration: u32,
        duration_text: String,
    },
    LevelUp {
        level: u32,
        title: &'static str,
    },
    SkillUnlocked {
        skill: SkillId,
        name: &'static str,
        xp_left: u32,
    },
    NewRecord {
        score: u32,
        duration_text: String,
    },
    /// Preference or stat change the page may want to re-render.
    ProgressChanged {
        theme: ThemeId,
        music_enabled: bool,
    },
}
