//! Simple bot for headless runs
//!
//! Keeps the middle of the bar's hit-box on the fish, leading the bar's
//! motion a few ticks so it does not overshoot.

use super::state::Snapshot;

/// Ticks of bar motion to anticipate
const LOOKAHEAD_TICKS: f32 = 6.0;
/// Hit-box sits this far above the drawn bar
const HITBOX_OFFSET: f32 = 32.0;

/// Whether to hold the button this tick
pub fn hold_button(snapshot: &Snapshot) -> bool {
    let predicted = snapshot.bar_position + snapshot.bar_velocity * LOOKAHEAD_TICKS;
    let center = predicted - HITBOX_OFFSET + snapshot.bar_height / 2.0;
    snapshot.bobber_position < center
}
