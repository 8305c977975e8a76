//! Game engine: one [`Game`] owns the live session, the player's progress,
//! the RNG and the progress store. The page drives it through
//! [`Game::dispatch`] and renders the returned [`GameEvent`]s.
//!
//! Round lifecycle:
//! - Classic: `Idle -> Active -> Won -> Idle`; the next guess (or an explicit
//!   new game) starts another round.
//! - Time attack: `Active` rounds chain into each other on every find while
//!   the clock runs; when it reaches zero the session is `Expired` (inactive).

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;

mod events;
mod generator;
mod progress;
mod scoring;
mod session;
mod timer;

pub use events::GameEvent;
pub use generator::generate;
pub use progress::{
    LevelProgress, LevelUp, PlayerProgress, RoundXp, SkillStatus, compute_round_xp,
};
pub use scoring::{
    Hint, HintTier, MAX_POWER, apply_delta, generate_hint, power_delta, update_power,
};
pub use session::{GameSession, Mode};
pub use timer::{TickOutcome, TimerState, TimerTicket, Urgency, duration_text};

use crate::catalog::{DifficultyId, SKILLS, SkillId, ThemeId, special_number};
use crate::config::EngineConfig;
use crate::numbers::NumberProfile;
use crate::storage::{KeyValueStore, load_progress, save_progress};

/// Everything the page can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Raw text from the guess box.
    SubmitGuess(String),
    StartNewGame,
    ChangeDifficulty(DifficultyId),
    ChangeMode(Mode),
    ChangeTimeAttackDuration(u32),
    UnlockSkill(SkillId),
    ChangeTheme(ThemeId),
    SetMusicEnabled(bool),
    Tick(TimerTicket),
}

pub struct Game<S: KeyValueStore> {
    config: EngineConfig,
    session: GameSession,
    progress: PlayerProgress,
    rng: SmallRng,
    store: S,
}

/// Read-only view for rendering. Never contains the secret.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub session: &'a GameSession,
    pub progress: &'a PlayerProgress,
    pub level_progress: LevelProgress,
    pub accuracy_percent: u32,
    pub skills: Vec<SkillView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillView {
    pub id: SkillId,
    pub name: &'static str,
    pub cost: u32,
    pub description: &'static str,
    pub status: SkillStatus,
}

impl<S: KeyValueStore> Game<S> {
    pub fn new(config: EngineConfig, store: S) -> Self {
        Self::with_rng(config, store, SmallRng::from_entropy())
    }

    /// Deterministic construction for tests and replays.
    pub fn with_rng(config: EngineConfig, store: S, rng: SmallRng) -> Self {
        let progress = load_progress(&store);
        let session = GameSession::idle(
            &progress.difficulty.settings(),
            config.default_time_attack_duration,
        );
        Self {
            config,
            session,
            progress,
            rng,
            store,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The countdown the host should be ticking, if any.
    pub fn timer_ticket(&self) -> Option<TimerTicket> {
        self.session.timer.ticket()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            session: &self.session,
            progress: &self.progress,
            level_progress: self.progress.level_progress(),
            accuracy_percent: self.progress.accuracy_percent(),
            skills: SKILLS
                .iter()
                .map(|s| SkillView {
                    id: s.id,
                    name: s.name,
                    cost: s.cost,
                    description: s.description,
                    status: self.progress.skill_status(s.id),
                })
                .collect(),
        }
    }

    /// Applies one action and returns what happened, in order. Progress is
    /// written back to the store once, after the action, if it changed.
    pub fn dispatch(&mut self, action: Action) -> Vec<GameEvent> {
        let before = self.progress.clone();
        let mut events = Vec::new();

        match action {
            Action::SubmitGuess(input) => self.submit_guess(&input, &mut events),
            Action::StartNewGame => self.start_round(&mut events),
            Action::ChangeDifficulty(difficulty) => {
                self.progress.difficulty = difficulty;
                self.progress.reset_streak();
                self.start_round(&mut events);
            }
            Action::ChangeMode(mode) => {
                self.session.mode = mode;
                self.start_round(&mut events);
            }
            Action::ChangeTimeAttackDuration(secs) => self.change_duration(secs, &mut events),
            Action::UnlockSkill(id) => match self.progress.unlock_skill(id) {
                Ok(skill) => events.push(GameEvent::SkillUnlocked {
                    skill: id,
                    name: skill.name,
                    xp_left: self.progress.xp,
                }),
                Err(e) => log::debug!("unlock {} ignored: {e}", id.as_str()),
            },
            Action::ChangeTheme(theme) => {
                self.progress.theme = theme;
                events.push(self.preferences_event());
            }
            Action::SetMusicEnabled(enabled) => {
                self.progress.music_enabled = enabled;
                events.push(self.preferences_event());
            }
            Action::Tick(ticket) => self.tick(ticket, &mut events),
        }

        if self.progress != before {
            if let Err(e) = save_progress(&mut self.store, &self.progress) {
                log::warn!("progress not saved: {e}");
            }
        }
        events
    }

    fn preferences_event(&self) -> GameEvent {
        GameEvent::ProgressChanged {
            theme: self.progress.theme,
            music_enabled: self.progress.music_enabled,
        }
    }

    fn start_round(&mut self, events: &mut Vec<GameEvent>) {
        let settings = self.progress.difficulty.settings();
        let session = &mut self.session;
        session.min_range = settings.min;
        session.max_range = settings.max;
        session.secret_number = generate(&settings, self.config.special_bias, &mut self.rng);
        session.attempts = 0;
        session.active = true;
        session.power = MAX_POWER;

        session.timer.stop();
        if session.mode == Mode::TimeAttack {
            session.time_attack_score = 0;
            session.timer.start();
        }
        log::debug!("secret number: {}", session.secret_number);

        events.push(self.round_started_event());
        if self.session.mode == Mode::TimeAttack {
            events.push(self.timer_event());
        }
    }

    fn round_started_event(&self) -> GameEvent {
        let profile = NumberProfile::of(self.session.secret_number);
        GameEvent::RoundStarted {
            mode: self.session.mode,
            difficulty: self.progress.difficulty,
            min: self.session.min_range,
            max: self.session.max_range,
            hint: format!(
                "{} Explore between {} and {}.",
                profile.hint, self.session.min_range, self.session.max_range
            ),
            emoji: profile.emoji,
            title: profile.title,
            story: profile.story,
            tags: profile.tags,
        }
    }

    fn timer_event(&self) -> GameEvent {
        let timer = &self.session.timer;
        GameEvent::TimerTick {
            time_left: timer.time_left,
            duration: timer.duration,
            urgency: timer.urgency(),
        }
    }

    fn submit_guess(&mut self, input: &str, events: &mut Vec<GameEvent>) {
        if !self.session.active {
            // Submitting after a finished round simply starts the next one.
            self.start_round(events);
            return;
        }

        let guess = match self.session.validate_guess(input) {
            Ok(guess) => guess,
            Err(e) => {
                log::debug!("guess rejected: {e}");
                events.push(GameEvent::ValidationFailed {
                    message: format!(
                        "Please enter a valid number between {} and {}",
                        self.session.min_range, self.session.max_range
                    ),
                });
                return;
            }
        };

        let session = &mut self.session;
        let skills = &self.progress.unlocked_skills;
        session.attempts += 1;

        let delta = power_delta(session.secret_number, guess, session.min_range, session.max_range);
        session.power = apply_delta(session.power, delta);

        let hint = generate_hint(
            session.secret_number,
            guess,
            session.min_range,
            session.max_range,
            skills,
        );
        events.push(GameEvent::HintUpdated {
            guess,
            attempts: session.attempts,
            text: format!("{}{}", hint.text, scoring::power_suffix(delta)),
            emoji: hint.emoji,
            tier: hint.tier,
            power_delta: delta,
            power: session.power,
        });

        if let Some(special) = self.progress.collect(guess) {
            log::info!("discovered legendary number {}", special.value);
            events.push(GameEvent::Discovery {
                number: special.value,
                name: special.name,
                description: special.description,
            });
        }

        if guess == self.session.secret_number {
            match self.session.mode {
                Mode::Classic => self.win_classic(events),
                Mode::TimeAttack => self.win_time_attack(events),
            }
        }
    }

    fn win_classic(&mut self, events: &mut Vec<GameEvent>) {
        let secret = self.session.secret_number;
        let attempts = self.session.attempts;
        self.session.active = false;
        self.progress.record_win();

        let xp = compute_round_xp(
            attempts,
            self.progress.difficulty.settings().xp_multiplier,
            special_number(secret).is_some(),
            self.progress.current_streak,
        );
        let level_up = self.progress.add_xp(xp.total);
        log::info!("found {secret} in {attempts} attempts, +{} xp", xp.total);

        let profile = NumberProfile::of(secret);
        events.push(GameEvent::WinResult {
            secret,
            attempts,
            xp,
            story: profile.reveal(secret),
            tags: profile.tags,
        });
        if let Some(LevelUp { level, title }) = level_up {
            log::info!("reached level {level}: {title}");
            events.push(GameEvent::LevelUp { level, title });
        }
    }

    fn win_time_attack(&mut self, events: &mut Vec<GameEvent>) {
        // Counted before the next secret resets the attempt counter.
        let found_in = self.session.attempts;
        self.progress.record_win();
        self.session.time_attack_score += 1;
        events.push(GameEvent::TimeAttackPoint {
            score: self.session.time_attack_score,
        });

        let settings = self.progress.difficulty.settings();
        self.session.secret_number = generate(&settings, self.config.special_bias, &mut self.rng);
        self.session.attempts = 0;
        log::debug!("secret number: {}", self.session.secret_number);

        if found_in <= self.config.time_bonus_attempts {
            let bonus = self.config.time_bonus(self.session.timer.duration);
            let granted = self.session.timer.add_bonus(bonus);
            if granted > 0 {
                events.push(GameEvent::TimeBonus {
                    seconds: granted,
                    time_left: self.session.timer.time_left,
                });
            }
        }
        events.push(self.round_started_event());
    }

    fn tick(&mut self, ticket: TimerTicket, events: &mut Vec<GameEvent>) {
        match self.session.timer.tick(ticket) {
            TickOutcome::Stale => {}
            TickOutcome::Running { .. } => events.push(self.timer_event()),
            TickOutcome::Expired => {
                events.push(self.timer_event());
                self.session.active = false;

                let score = self.session.time_attack_score;
                let duration = self.session.timer.duration;
                if self.progress.record_time_attack_score(score) {
                    log::info!("new time attack record: {score}");
                    events.push(GameEvent::NewRecord {
                        score,
                        duration_text: duration_text(duration),
                    });
                }
                events.push(GameEvent::RoundExpired {
                    score,
                    best: self.progress.best_time_attack_score,
                    duration,
                    duration_text: duration_text(duration),
                });
            }
        }
    }

    fn change_duration(&mut self, secs: u32, events: &mut Vec<GameEvent>) {
        if secs == 0 {
            events.push(GameEvent::ValidationFailed {
                message: "Time attack duration must be at least one second".into(),
            });
            return;
        }

        let session = &mut self.session;
        session.timer.set_duration(secs);
        if session.mode == Mode::TimeAttack && session.active {
            session.time_attack_score = 0;
            session.timer.start();
        } else {
            session.timer.time_left = secs;
        }
        events.push(self.timer_event());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn game() -> Game<MemoryStore> {
        Game::with_rng(EngineConfig::default(), MemoryStore::new(), SmallRng::seed_from_u64(42))
    }

    fn guess(g: &mut Game<MemoryStore>, n: u32) -> Vec<GameEvent> {
        g.dispatch(Action::SubmitGuess(n.to_string()))
    }

    /// A wrong guess for the current secret.
    fn miss(g: &Game<MemoryStore>) -> u32 {
        let s = g.session();
        if s.secret_number() == s.min_range { s.max_range } else { s.min_range }
    }

    #[test]
    fn test_new_game_is_idle_until_started() {
        let mut g = game();
        assert!(!g.session().active);
        let events = guess(&mut g, 10);
        assert!(matches!(events.as_slice(), [GameEvent::RoundStarted { .. }]));
        assert!(g.session().active);
        assert_eq!(g.session().attempts, 0);
    }

    #[test]
    fn test_invalid_guess_changes_nothing() {
        let mut g = game();
        g.dispatch(Action::StartNewGame);
        let before = g.session().clone();
        for bad in ["0", "101", "seven", ""] {
            let events = g.dispatch(Action::SubmitGuess(bad.into()));
            assert!(matches!(events.as_slice(), [GameEvent::ValidationFailed { .. }]));
        }
        assert_eq!(g.session(), &before);
        assert!(g.store().is_empty());
    }

    #[test]
    fn test_classic_round_to_win() {
        let mut g = game();
        g.dispatch(Action::StartNewGame);
        let wrong = miss(&g);
        let events = guess(&mut g, wrong);
        assert!(matches!(events[0], GameEvent::HintUpdated { attempts: 1, .. }));
        assert!(g.session().active);

        let secret = g.session().secret_number();
        let events = guess(&mut g, secret);
        let win = events
            .iter()
            .find_map(|e| match e {
                GameEvent::WinResult { attempts, xp, .. } => Some((*attempts, *xp)),
                _ => None,
            })
            .unwrap();
        assert_eq!(win.0, 2);
        assert_eq!(g.progress().xp, win.1.total);
        assert!(!g.session().active);
        assert_eq!(g.progress().current_streak, 1);
        assert_eq!(g.progress().numbers_found, 1);
        assert_eq!(g.session().power, MAX_POWER);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut g = game();
        g.dispatch(Action::ChangeMode(Mode::TimeAttack));
        let first = g.timer_ticket().unwrap();
        g.dispatch(Action::StartNewGame);
        let second = g.timer_ticket().unwrap();
        assert_ne!(first, second);
        assert!(g.dispatch(Action::Tick(first)).is_empty());
        assert_eq!(g.session().timer.time_left, 60);
        assert_eq!(g.dispatch(Action::Tick(second)).len(), 1);
        assert_eq!(g.session().timer.time_left, 59);
    }

    #[test]
    fn test_power_ignores_unlocked_skills() {
        let store = MemoryStore::new().with_entry(
            crate::storage::KEY_UNLOCKED_SKILLS,
            r#"["time-warp","range-boost","prime-vision","cosmic-insight"]"#,
        );
        let mut g = Game::with_rng(EngineConfig::default(), store, SmallRng::seed_from_u64(42));
        g.dispatch(Action::StartNewGame);
        let s = g.session();
        let (secret, min, max) = (s.secret_number(), s.min_range, s.max_range);
        // Whichever end is further away is at least half the range off.
        let far = if secret - min >= max - secret { min } else { max };
        let expected = power_delta(secret, far, min, max);
        assert!(expected <= -5);

        let events = guess(&mut g, far);
        assert!(matches!(
            events[0],
            GameEvent::HintUpdated { power_delta, power, .. }
                if power_delta == expected && power as i32 == MAX_POWER as i32 + expected
        ));
    }

    #[test]
    fn test_unlock_without_xp_is_silent() {
        let mut g = game();
        assert!(g.dispatch(Action::UnlockSkill(SkillId::RangeBoost)).is_empty());
        assert!(g.progress().unlocked_skills.is_empty());
    }
}
