//! Terminal outcome of a session
//!
//! Nothing here ends a session by itself; the session calls
//! [`try_finalize`] once per tick and stops at the first `Some`.

use rand::RngCore;

use super::config::SimulationConfig;
use super::rng::chance;
use super::state::{FishQuality, Outcome, ProgressState, TreasureReward, TreasureState};

/// Base double-catch chance with wild bait, before luck
const DOUBLE_CATCH_CHANCE: f64 = 0.25;

/// Outcome once progress hits either bound, `None` while still fighting
pub fn try_finalize(
    progress: &ProgressState,
    treasure: Option<&TreasureState>,
    treasure_reward: TreasureReward,
    config: &SimulationConfig,
    rng: &mut dyn RngCore,
) -> Option<Outcome> {
    if progress.pending_failure() {
        return Some(Outcome::failed(false));
    }
    if !progress.pending_success() {
        return None;
    }

    let treasure_caught = treasure.is_some_and(|t| t.caught);
    Some(Outcome {
        success: true,
        aborted: false,
        perfect: progress.perfect,
        fish_size: progress.fish_size,
        quality: fish_quality(progress.fish_size, progress.perfect, config),
        treasure_caught,
        treasure_reward: treasure_caught.then_some(treasure_reward),
        number_caught: number_caught(progress, config, rng),
        boss_fish: config.boss_fish,
    })
}

/// Outcome for a player who walked away mid-fight
pub fn abort_outcome() -> Outcome {
    Outcome::failed(true)
}

/// Quality tier for a landed fish
pub fn fish_quality(fish_size: i32, perfect: bool, config: &SimulationConfig) -> FishQuality {
    if config.beginner_rod {
        return FishQuality::Normal;
    }
    let span = config.max_fish_size - config.min_fish_size;
    let fraction = if span > 0 {
        (fish_size - config.min_fish_size) as f32 / span as f32
    } else {
        0.0
    };
    let bonus = config.quality_stacks + u32::from(perfect);
    FishQuality::from_size_fraction(fraction).raised(bonus)
}

/// How many fish come out of the water
pub fn number_caught(
    progress: &ProgressState,
    config: &SimulationConfig,
    rng: &mut dyn RngCore,
) -> i32 {
    let mut caught = 1;
    if config.double_catch_bait
        && chance(rng, DOUBLE_CATCH_CHANCE + config.luck as f64 / 2.0)
    {
        caught = 2;
    }
    if config.challenge_bait_fish_count >= 0 {
        caught = progress.challenge_fish;
    }
    caught
}
