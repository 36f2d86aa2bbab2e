//! Semantic action IDs for Caca Cliqueur click targets.
//!
//! These IDs are registered during render and dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const TAP: u16 = 0;

// ── Shop ────────────────────────────────────────────────────────
pub const BUY_MULTIPLIER: u16 = 10;
pub const BUY_AUTO_CLICKER: u16 = 11;

// ── Menu ────────────────────────────────────────────────────────
pub const ASK_RESTART: u16 = 20;
pub const TOGGLE_MUTE: u16 = 21;

// ── Restart confirmation dialog ─────────────────────────────────
pub const CONFIRM_RESTART: u16 = 30;
pub const CANCEL_RESTART: u16 = 31;

/// Backdrop behind the dialog; swallows clicks that miss the buttons.
pub const DIALOG_BACKDROP: u16 = 39;
