//! Catch progress: accrues while the fish is in the bar, drains while it isn't

use super::config::SimulationConfig;
use super::state::ProgressState;
use crate::consts::*;

/// Penalty removed by the first trap bobber; each further one removes half as much
const TRAP_FIRST_REDUCTION: f32 = 0.001;

/// Total penalty-rate reduction from `stack_count` trap bobbers
pub fn reduction_rate(stack_count: u32) -> f32 {
    let mut step = TRAP_FIRST_REDUCTION;
    let mut total = 0.0;
    for _ in 0..stack_count {
        total += step;
        step /= 2.0;
    }
    total
}

/// Progress lost per missed tick
pub fn penalty_rate(config: &SimulationConfig) -> f32 {
    let base = if config.beginner_rod {
        TRAINING_PENALTY_RATE
    } else {
        PENALTY_RATE
    };
    let rate = (base - reduction_rate(config.penalty_reduction_stacks)).max(MIN_PENALTY_RATE);
    rate * config.distance_from_catch_penalty_modifier
}

/// Advance progress by one tick
///
/// `treasure_shield` is set while a treasure hunter holds the treasure in
/// the bar; a miss then costs neither size nor progress.
pub fn update_progress(
    progress: &ProgressState,
    bobber_in_bar: bool,
    config: &SimulationConfig,
    tick_ms: u32,
    has_caught_before: bool,
    treasure_shield: bool,
) -> ProgressState {
    let mut next = *progress;
    next.bobber_in_bar = bobber_in_bar;

    if bobber_in_bar {
        next.distance_from_catching += PROGRESS_GAIN;
    } else {
        // Challenge bait loses a fish every time this one slips out
        if progress.bobber_in_bar && next.challenge_fish > 1 {
            next.challenge_fish -= 1;
        }

        if !treasure_shield {
            let elapsed = i32::try_from(tick_ms).unwrap_or(i32::MAX);
            next.size_reduction_timer_ms = next.size_reduction_timer_ms.saturating_sub(elapsed);
            if next.size_reduction_timer_ms <= 0 {
                next.fish_size = (next.fish_size - 1).max(config.min_fish_size);
                next.size_reduction_timer_ms = SIZE_REDUCTION_MS;
            }

            if has_caught_before {
                next.distance_from_catching -= penalty_rate(config);
                next.perfect = false;
            }
        }
    }

    next.distance_from_catching = next.distance_from_catching.clamp(0.0, 1.0);
    next
}
