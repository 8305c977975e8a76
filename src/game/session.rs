//! The live round: secret, attempts, power meter and the time attack clock.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::scoring::MAX_POWER;
use super::timer::TimerState;
use crate::catalog::DifficultySettings;
use crate::error::{GuessError, ParseIdError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Classic,
    TimeAttack,
}

impl FromStr for Mode {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Self::Classic),
            "timeAttack" => Ok(Self::TimeAttack),
            other => Err(ParseIdError::new("mode", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    #[serde(skip)]
    pub(crate) secret_number: u32,
    pub attempts: u32,
    pub active: bool,
    pub mode: Mode,
    pub power: u8,
    pub min_range: u32,
    pub max_range: u32,
    pub timer: TimerState,
    pub time_attack_score: u32,
}

impl GameSession {
    /// An idle session; the first action starts a real round.
    pub fn idle(settings: &DifficultySettings, time_attack_duration: u32) -> Self {
        Self {
            secret_number: settings.min,
            attempts: 0,
            active: false,
            mode: Mode::Classic,
            power: MAX_POWER,
            min_range: settings.min,
            max_range: settings.max,
            timer: TimerState::new(time_attack_duration),
            time_attack_score: 0,
        }
    }

    pub fn secret_number(&self) -> u32 {
        self.secret_number
    }

    /// Parses raw input from the guess box and checks it against the range.
    pub fn validate_guess(&self, input: &str) -> Result<u32, GuessError> {
        let trimmed = input.trim();
        let guess: i64 = trimmed
            .parse()
            .map_err(|_| GuessError::NotANumber(trimmed.to_string()))?;
        if guess < self.min_range as i64 || guess > self.max_range as i64 {
            return Err(GuessError::OutOfRange {
                guess,
                min: self.min_range,
                max: self.max_range,
            });
        }
        Ok(guess as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DifficultyId;

    #[test]
    fn test_validate_guess() {
        let s = GameSession::idle(&DifficultyId::Novice.settings(), 60);
        assert_eq!(s.validate_guess(" 25 "), Ok(25));
        assert_eq!(s.validate_guess("1"), Ok(1));
        assert_eq!(s.validate_guess("50"), Ok(50));
        assert_eq!(
            s.validate_guess("51"),
            Err(GuessError::OutOfRange { guess: 51, min: 1, max: 50 })
        );
        assert!(matches!(s.validate_guess("-3"), Err(GuessError::OutOfRange { .. })));
        assert_eq!(s.validate_guess("abc"), Err(GuessError::NotANumber("abc".into())));
        assert!(matches!(s.validate_guess("2.5"), Err(GuessError::NotANumber(_))));
        assert!(matches!(s.validate_guess(""), Err(GuessError::NotANumber(_))));
    }

    #[test]
    fn test_mode_parses_page_values() {
        assert_eq!("timeAttack".parse::<Mode>(), Ok(Mode::TimeAttack));
        assert_eq!("classic".parse::<Mode>(), Ok(Mode::Classic));
        assert!("zen".parse::<Mode>().is_err());
    }

    #[test]
    fn test_idle_session_is_in_range() {
        let s = GameSession::idle(&DifficultyId::Cosmic.settings(), 60);
        assert!(!s.active);
        assert!((s.min_range..=s.max_range).contains(&s.secret_number()));
        assert!(s.min_range < s.max_range);
    }
}
