//! Caca Cliqueur: tap the turd, buy upgrades, beat your best score.

pub mod actions;
pub mod config;
pub mod engine;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;
pub mod store;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::audio::{BackgroundMusic, MusicPlayer};
use crate::input::{ClickState, InputEvent};
use crate::time::{Interval, Pulse};

use engine::GameEngine;
use logic::format_number;
use state::{GameEvent, GameSnapshot, Upgrade};
use store::KeyValueStore;

/// Auto-click period.
pub const TICK_INTERVAL_MS: u32 = 1000;

/// How long the "+N" tap feedback stays on screen.
pub const FEEDBACK_MS: u32 = 500;

const LOG_CAPACITY: usize = 50;

/// Log entry shown in the side panel.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// What a player gesture asks for, once keys and clicks are normalised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Tap,
    BuyMultiplier,
    BuyAutoClicker,
    AskRestart,
    ToggleMute,
    ConfirmRestart,
    CancelRestart,
}

fn command_for(event: &InputEvent, confirming: bool) -> Option<Command> {
    if confirming {
        return match event {
            InputEvent::Key('o' | 'y' | '\n') => Some(Command::ConfirmRestart),
            InputEvent::Key('n') | InputEvent::Cancel => Some(Command::CancelRestart),
            InputEvent::Click(actions::CONFIRM_RESTART) => Some(Command::ConfirmRestart),
            InputEvent::Click(actions::CANCEL_RESTART) => Some(Command::CancelRestart),
            _ => None,
        };
    }
    match event {
        InputEvent::Key('c' | ' ' | '\n') | InputEvent::Click(actions::TAP) => Some(Command::Tap),
        InputEvent::Key('m') | InputEvent::Click(actions::BUY_MULTIPLIER) => {
            Some(Command::BuyMultiplier)
        }
        InputEvent::Key('a') | InputEvent::Click(actions::BUY_AUTO_CLICKER) => {
            Some(Command::BuyAutoClicker)
        }
        InputEvent::Key('r') | InputEvent::Click(actions::ASK_RESTART) => Some(Command::AskRestart),
        InputEvent::Key('s') | InputEvent::Click(actions::TOGGLE_MUTE) => Some(Command::ToggleMute),
        _ => None,
    }
}

/// Everything the renderer needs for one frame.
pub struct View<'a> {
    pub snapshot: GameSnapshot,
    /// Gain of the last tap while its feedback is still visible.
    pub feedback: Option<u64>,
    pub log: &'a [LogEntry],
    pub confirm_restart: bool,
    pub muted: bool,
}

/// The game as the browser sees it: engine plus timers, music, dialog and log.
pub struct CliqueurGame<S: KeyValueStore, P: MusicPlayer> {
    pub engine: GameEngine<S>,
    music: BackgroundMusic<P>,
    auto_timer: Interval,
    /// Rate the auto timer was last (re)started for.
    timer_rate: u64,
    feedback: Pulse,
    last_gain: u64,
    confirm_restart: bool,
    /// Browsers only allow playback after a user gesture.
    gesture_seen: bool,
    log: Vec<LogEntry>,
    now_ms: f64,
}

impl<S: KeyValueStore, P: MusicPlayer> CliqueurGame<S, P> {
    pub fn new(engine: GameEngine<S>, music: BackgroundMusic<P>) -> Self {
        let timer_rate = engine.state().auto_rate;
        let mut game = Self {
            engine,
            music,
            auto_timer: Interval::new(TICK_INTERVAL_MS),
            timer_rate,
            feedback: Pulse::new(),
            last_gain: 0,
            confirm_restart: false,
            gesture_seen: false,
            log: Vec::new(),
            now_ms: 0.0,
        };
        game.add_log("Bienvenue dans Caca Cliqueur !", true);
        game
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let command = match command_for(event, self.confirm_restart) {
            Some(c) => c,
            None => return false,
        };

        if !self.gesture_seen {
            self.gesture_seen = true;
            self.music.on_resume();
        }

        match command {
            Command::Tap => {
                self.last_gain = self.engine.tap();
                self.feedback.trigger(self.now_ms, FEEDBACK_MS);
            }
            Command::BuyMultiplier => {
                self.engine.buy_multiplier();
            }
            Command::BuyAutoClicker => {
                self.engine.buy_auto_clicker();
            }
            Command::AskRestart => self.confirm_restart = true,
            Command::ConfirmRestart => {
                self.engine.restart();
                self.feedback.cancel();
                self.confirm_restart = false;
            }
            Command::CancelRestart => self.confirm_restart = false,
            Command::ToggleMute => {
                if self.music.toggle_mute() {
                    self.add_log("Musique coupée", false);
                } else {
                    self.add_log("Musique activée", false);
                }
            }
        }
        self.collect_events();
        true
    }

    /// Advance timers to `now_ms` (a `performance.now()` timestamp).
    pub fn advance(&mut self, now_ms: f64) {
        self.now_ms = now_ms;

        // Buying an auto-clicker (or restarting) starts a fresh period.
        let rate = self.engine.state().auto_rate;
        if rate != self.timer_rate {
            self.timer_rate = rate;
            self.auto_timer.reset(now_ms);
        }

        let fired = self.auto_timer.update(now_ms);
        if rate > 0 {
            for _ in 0..fired {
                self.engine.tick();
            }
        }

        self.feedback.update(now_ms);
        self.collect_events();
    }

    /// Page visibility changed.
    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden {
            self.music.on_pause();
        } else {
            self.music.on_resume();
        }
    }

    /// Page is going away; the game keeps running but stays silent.
    pub fn release_music(&mut self) {
        self.music.release();
    }

    pub fn view(&self) -> View<'_> {
        View {
            snapshot: self.engine.snapshot(),
            feedback: self.feedback.is_active().then_some(self.last_gain),
            log: &self.log,
            confirm_restart: self.confirm_restart,
            muted: self.music.is_muted(),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.view(), f, area, click_state);
    }

    fn collect_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                GameEvent::Tapped { gain, score } | GameEvent::AutoClicked { gain, score } => {
                    log::trace!("+{gain} -> {score}");
                }
                GameEvent::Bought {
                    upgrade: Upgrade::Multiplier,
                    cost,
                    level,
                } => self.add_log(
                    &format!("Multiplicateur acheté ! x{} (-{})", level, format_number(cost)),
                    false,
                ),
                GameEvent::Bought {
                    upgrade: Upgrade::AutoClicker,
                    cost,
                    level,
                } => self.add_log(
                    &format!("Clic automatique acheté ! {}/sec (-{})", level, format_number(cost)),
                    false,
                ),
                GameEvent::PurchaseDeclined {
                    upgrade,
                    cost,
                    score,
                } => self.add_log(
                    &format!(
                        "Pas assez de clics pour le {} ({}/{})",
                        upgrade.name(),
                        format_number(score),
                        format_number(cost)
                    ),
                    false,
                ),
                GameEvent::QuestCompleted { index, description } => {
                    log::trace!("quest {index} shown in log");
                    self.add_log(&format!("★ Quête terminée : {}", description), true)
                }
                GameEvent::Restarted { final_score } => self.add_log(
                    &format!("Partie recommencée (score final : {})", format_number(final_score)),
                    true,
                ),
            }
        }
    }

    fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > LOG_CAPACITY {
            self.log.remove(0);
        }
    }
}
