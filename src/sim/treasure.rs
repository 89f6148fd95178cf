//! Treasure chest mini-game
//!
//! After a random delay a chest appears somewhere away from the bar. Holding
//! it in the bar fills its catch meter; letting it go drains the meter.

use rand::RngCore;

use super::bar::marker_in_bar;
use super::rng::next_int;
use super::state::{CatchBarState, TreasureState};
use crate::consts::*;

/// Bar top position above which the chest spawns above the bar
const SPAWN_SPLIT: f32 = 274.0;

/// Fresh treasure with a random appear delay
pub fn spawn_treasure(rng: &mut dyn RngCore) -> TreasureState {
    TreasureState::new(next_int(rng, TREASURE_DELAY_MIN_MS, TREASURE_DELAY_MAX_MS))
}

/// Where the chest shows up, given where the bar is
pub fn placement(bar: &CatchBarState, rng: &mut dyn RngCore) -> f32 {
    let position = if bar.position > SPAWN_SPLIT {
        next_int(rng, 8, bar.position as i32 - 20)
    } else {
        let below_bar = (bar.position + bar.height).min(528.0) as i32;
        next_int(rng, below_bar, 500)
    };
    position as f32
}

/// Advance the treasure by one tick
///
/// With `decay_grace` (treasure hunter) the first miss after holding the
/// chest costs nothing.
pub fn advance_treasure(
    treasure: &TreasureState,
    bar: &CatchBarState,
    tick_ms: u32,
    decay_grace: bool,
    rng: &mut dyn RngCore,
) -> TreasureState {
    let mut next = *treasure;
    if next.caught {
        return next;
    }

    let elapsed = i32::try_from(tick_ms).unwrap_or(i32::MAX);
    next.appear_delay_ms = next.appear_delay_ms.saturating_sub(elapsed).max(0);
    if next.appear_delay_ms > 0 {
        return next;
    }

    if !next.visible {
        next.position = placement(bar, rng);
        next.visible = true;
        log::debug!("Treasure appeared at {}", next.position);
    }

    next.in_bar = marker_in_bar(next.position, bar);
    if next.in_bar {
        next.catch_level += TREASURE_GAIN;
        next.grace_armed = decay_grace;
        if next.catch_level >= 1.0 {
            next.catch_level = 1.0;
            next.caught = true;
            next.in_bar = false;
            log::debug!("Treasure caught");
        }
    } else if next.grace_armed {
        next.grace_armed = false;
    } else {
        next.catch_level = (next.catch_level - TREASURE_DECAY).max(0.0);
    }

    next
}
