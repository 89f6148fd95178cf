//! Catch bar physics and the bar hit-box
//!
//! The bar falls under gravity and rises while the button is held. It
//! bounces off both rails; lead bobbers deaden the floor bounce.

use super::config::SimulationConfig;
use super::state::CatchBarState;
use crate::consts::*;

/// Bar hit-box starts this far above the bar's drawn top edge
const BAR_HITBOX_OFFSET: f32 = 32.0;
/// Marker extends this far below its position
const MARKER_BELOW: f32 = 12.0;
/// Marker extends this far above its position
const MARKER_ABOVE: f32 = 16.0;
/// Bar counts as on the floor within this distance
const FLOOR_SNAP: f32 = 4.0;

/// Gravity multiplier while the fish is in the bar
const IN_BAR_GRAVITY: f32 = 0.6;
/// Gravity multiplier while the fish is in the bar with a barbed hook
const BARBED_GRAVITY: f32 = 0.3;
/// Extra gravity damping per barbed hook after the first
const BARBED_STACK_GRAVITY: f32 = 0.9;
/// Velocity nudge toward the fish from the first barbed hook
const BARBED_NUDGE: f32 = 0.2;
/// Velocity nudge from each further barbed hook
const BARBED_STACK_NUDGE: f32 = 0.05;

/// Whether a marker (fish or treasure) sits inside the bar's hit-box
#[inline]
pub fn marker_in_bar(marker: f32, bar: &CatchBarState) -> bool {
    let top = bar.position - BAR_HITBOX_OFFSET;
    marker + MARKER_BELOW <= top + bar.height && marker - MARKER_ABOVE >= top
}

/// Whether the fish counts as in the bar this tick
///
/// Tall bars resting on the floor also catch a fish at the bottom of the
/// track, even if the hit-box alone would miss it.
pub fn bobber_in_bar(bobber: f32, bar: &CatchBarState) -> bool {
    let edge_snap =
        bobber >= BOBBER_TRACK_MAX - bar.height && bar.position >= bar.floor() - FLOOR_SNAP;
    marker_in_bar(bobber, bar) || edge_snap
}

/// Advance the bar by one tick
pub fn advance_bar(
    bar: &CatchBarState,
    bobber: f32,
    bobber_in_bar: bool,
    config: &SimulationConfig,
    button_held: bool,
) -> CatchBarState {
    let mut next = *bar;
    let mut gravity = if button_held { -BAR_GRAVITY } else { BAR_GRAVITY };

    // Pressed against a rail: drop leftover bounce so the bar does not chatter
    if button_held && (next.position == 0.0 || next.position == next.floor()) {
        next.velocity = 0.0;
    }

    if bobber_in_bar {
        let hooks = config.bar_attraction_stacks;
        gravity *= if hooks > 0 { BARBED_GRAVITY } else { IN_BAR_GRAVITY };
        for i in 0..hooks {
            let nudge = if i == 0 { BARBED_NUDGE } else { BARBED_STACK_NUDGE };
            if bobber + MARKER_ABOVE < next.position + next.height / 2.0 {
                next.velocity -= nudge;
            } else {
                next.velocity += nudge;
            }
            if i > 0 {
                gravity *= BARBED_STACK_GRAVITY;
            }
        }
    }

    next.velocity += gravity;
    next.position += next.velocity;

    // `position + height` can round back onto the track height
    if next.position > next.floor() {
        next.position = next.floor();
        next.velocity = -next.velocity * BAR_RESTITUTION * config.bounce_dampening();
    } else if next.position < 0.0 {
        next.position = 0.0;
        next.velocity = -next.velocity * BAR_RESTITUTION;
    }

    next
}
