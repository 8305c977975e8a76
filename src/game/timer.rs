//! Time attack countdown.
//!
//! The countdown itself is driven from outside (a 1 s interval in the browser,
//! explicit ticks in tests). Every (re)start issues a new [`TimerTicket`]; a
//! tick that presents an older ticket belongs to a cancelled countdown and is
//! ignored.

use serde::Serialize;

/// Only the engine issues tickets:
///
/// ```compile_fail
/// let forged = cosmic_guess::game::TimerTicket(1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TimerTicket(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Urgency {
    Calm,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub time_left: u32,
    pub duration: u32,
    pub running: bool,
    #[serde(skip)]
    epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Stale,
    Running { time_left: u32 },
    Expired,
}

impl TimerState {
    pub fn new(duration: u32) -> Self {
        Self {
            time_left: duration,
            duration,
            running: false,
            epoch: 0,
        }
    }

    /// Resets the clock to full and starts it, cancelling any previous countdown.
    pub fn start(&mut self) -> TimerTicket {
        self.epoch += 1;
        self.time_left = self.duration;
        self.running = true;
        TimerTicket(self.epoch)
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.epoch += 1;
        }
    }

    /// Changes the duration without touching a running countdown.
    pub fn set_duration(&mut self, duration: u32) {
        self.duration = duration;
    }

    /// Ticket of the live countdown, if one is running.
    pub fn ticket(&self) -> Option<TimerTicket> {
        self.running.then_some(TimerTicket(self.epoch))
    }

    pub fn tick(&mut self, ticket: TimerTicket) -> TickOutcome {
        if self.ticket() != Some(ticket) {
            return TickOutcome::Stale;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.stop();
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                time_left: self.time_left,
            }
        }
    }

    /// Adds bonus seconds without exceeding the session duration.
    pub fn add_bonus(&mut self, secs: u32) -> u32 {
        let before = self.time_left;
        self.time_left = self.time_left.saturating_add(secs).min(self.duration);
        self.time_left - before
    }

    pub fn urgency(&self) -> Urgency {
        // Compare percentages without floats: left/duration <= 25% etc.
        let left = self.time_left as u64 * 100;
        let duration = self.duration.max(1) as u64;
        if left <= duration * 25 {
            Urgency::Critical
        } else if left <= duration * 50 {
            Urgency::Warning
        } else {
            Urgency::Calm
        }
    }
}

/// Human readable duration for the results banner.
pub fn duration_text(secs: u32) -> String {
    match secs {
        60 => "1 minute".into(),
        120 => "2 minutes".into(),
        300 => "5 minutes".into(),
        _ => format!("{secs} seconds"),
    }
}
