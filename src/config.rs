//! Application-level configuration constants.

// Entries shown on first load
pub const SEED_NAMES: [&str; 8] = [
    "Ali", "Beatriz", "Charles", "Diya", "Eric", "Fatima", "Gabriel", "Hanna",
];

// UI Behavior
pub const RESIZE_DEBOUNCE_MS: u32 = 250;
/// Pause between the wheel stopping and the winner dialog opening, so the
/// win chord starts before the dialog takes focus.
pub const WINNER_DIALOG_DELAY_MS: u32 = 600;

/// Most boundary ticks voiced for a single frame of a fast spin.
pub const MAX_TICKS_PER_FRAME: u32 = 3;

// Element ids
pub const CANVAS_ID: &str = "wheelCanvas";
