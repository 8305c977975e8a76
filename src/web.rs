//! Browser glue: the single live [`Game`], the 1 s countdown interval, and the
//! bridge that turns engine events into DOM `CustomEvent`s.
//!
//! Every exported action runs the engine with the game borrowed, releases the
//! borrow, reconciles the countdown with the session's timer ticket, and only
//! then notifies the page. Page listeners may therefore call straight back into
//! the exported functions.

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, console, window};

use crate::config::EngineConfig;
use crate::game::{Action, Game, GameEvent, Mode, TimerTicket};
use crate::storage::BrowserStore;

/// Name of the `CustomEvent` dispatched on `window` for every engine event.
/// `event.detail` holds the JSON-encoded [`GameEvent`].
pub const EVENT_NAME: &str = "cosmic-guess";

const TICK_MS: i32 = 1_000;

struct Countdown {
    ticket: TimerTicket,
    handle: i32,
    callback: Closure<dyn FnMut()>,
}

#[derive(Default)]
struct Scheduler {
    live: Option<Countdown>,
    // Cancelled callbacks; one of them may still be on the stack, so they are
    // only dropped once no tick is running.
    retired: Vec<Closure<dyn FnMut()>>,
}

thread_local! {
    static GAME: RefCell<Option<Game<BrowserStore>>> = RefCell::new(None);
    static SCHEDULER: RefCell<Scheduler> = RefCell::new(Scheduler::default());
    static IN_TICK: Cell<bool> = Cell::new(false);
}

// --- Logging -----------------------------------------------------------------

/// `log` backend writing to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => console::error_1(&line),
            log::Level::Warn => console::warn_1(&line),
            log::Level::Info => console::info_1(&line),
            log::Level::Debug | log::Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

pub(crate) fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

// --- Lifecycle ---------------------------------------------------------------

pub(crate) fn start(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => EngineConfig::from_json(json).unwrap_or_else(|e| {
            log::warn!("{e}; using defaults");
            EngineConfig::default()
        }),
        None => EngineConfig::default(),
    };
    let game = Game::new(config, BrowserStore::open());
    GAME.with(|cell| cell.replace(Some(game)));
    run(Action::StartNewGame)
}

/// Drops the live game and cancels its countdown.
#[wasm_bindgen]
pub fn shutdown_game() -> Result<(), JsValue> {
    GAME.with(|cell| cell.replace(None));
    sync_countdown(None)
}

fn run(action: Action) -> Result<(), JsValue> {
    let outcome = GAME.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map(|game| (game.dispatch(action), game.timer_ticket()))
    });
    let Some((events, ticket)) = outcome else {
        return Err(JsValue::from_str("start_game has not been called"));
    };
    sync_countdown(ticket)?;
    emit(&events)
}

/// Makes the browser interval match the engine's live ticket: at most one
/// countdown exists, and it is replaced whenever the ticket changes.
fn sync_countdown(ticket: Option<TimerTicket>) -> Result<(), JsValue> {
    SCHEDULER.with(|cell| {
        let mut sched = cell.borrow_mut();
        if !IN_TICK.with(Cell::get) {
            sched.retired.clear();
        }
        if sched.live.as_ref().map(|c| c.ticket) == ticket {
            return Ok(());
        }
        if let Some(old) = sched.live.take() {
            if let Some(win) = window() {
                win.clear_interval_with_handle(old.handle);
            }
            sched.retired.push(old.callback);
        }
        let Some(ticket) = ticket else {
            return Ok(());
        };

        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = Closure::wrap(Box::new(move || {
            IN_TICK.with(|t| t.set(true));
            let result = run(Action::Tick(ticket));
            IN_TICK.with(|t| t.set(false));
            if let Err(e) = result {
                log::error!("countdown tick failed: {e:?}");
            }
        }) as Box<dyn FnMut()>);
        let handle = win.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            TICK_MS,
        )?;
        sched.live = Some(Countdown {
            ticket,
            handle,
            callback,
        });
        Ok(())
    })
}

fn emit(events: &[GameEvent]) -> Result<(), JsValue> {
    if events.is_empty() {
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    for event in events {
        let json = serde_json::to_string(event).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let init = CustomEventInit::new();
        init.set_detail(&JsValue::from_str(&json));
        let dom_event = CustomEvent::new_with_event_init_dict(EVENT_NAME, &init)?;
        win.dispatch_event(&dom_event)?;
    }
    Ok(())
}

/// Parses an identifier coming from the page. Unknown values are logged and
/// the action is dropped.
fn parse_or_ignore<T>(raw: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| log::warn!("{e}"))
        .ok()
}

// --- Action surface ----------------------------------------------------------

#[wasm_bindgen]
pub fn submit_guess(value: String) -> Result<(), JsValue> {
    run(Action::SubmitGuess(value))
}

#[wasm_bindgen]
pub fn start_new_game() -> Result<(), JsValue> {
    run(Action::StartNewGame)
}

#[wasm_bindgen]
pub fn change_difficulty(id: &str) -> Result<(), JsValue> {
    match parse_or_ignore(id) {
        Some(difficulty) => run(Action::ChangeDifficulty(difficulty)),
        None => Ok(()),
    }
}

#[wasm_bindgen]
pub fn change_mode(mode: &str) -> Result<(), JsValue> {
    match parse_or_ignore::<Mode>(mode) {
        Some(mode) => run(Action::ChangeMode(mode)),
        None => Ok(()),
    }
}

#[wasm_bindgen]
pub fn change_time_attack_duration(seconds: u32) -> Result<(), JsValue> {
    run(Action::ChangeTimeAttackDuration(seconds))
}

#[wasm_bindgen]
pub fn unlock_skill(id: &str) -> Result<(), JsValue> {
    match parse_or_ignore(id) {
        Some(skill) => run(Action::UnlockSkill(skill)),
        None => Ok(()),
    }
}

#[wasm_bindgen]
pub fn change_theme(id: &str) -> Result<(), JsValue> {
    match parse_or_ignore(id) {
        Some(theme) => run(Action::ChangeTheme(theme)),
        None => Ok(()),
    }
}

#[wasm_bindgen]
pub fn set_music_enabled(enabled: bool) -> Result<(), JsValue> {
    run(Action::SetMusicEnabled(enabled))
}

/// JSON view of the session and progress for a full re-render.
#[wasm_bindgen]
pub fn snapshot() -> Result<String, JsValue> {
    GAME.with(|cell| {
        let guard = cell.borrow();
        let game = guard
            .as_ref()
            .ok_or_else(|| JsValue::from_str("start_game has not been called"))?;
        serde_json::to_string(&game.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    })
}
