//! Per-tick simulation state and the terminal outcome

use serde::{Deserialize, Serialize};

use super::config::SimulationConfig;
use crate::consts::*;

/// The fish marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BobberState {
    /// Track position, 0 = top
    pub position: f32,
    pub velocity: f32,
    /// Last approach acceleration toward the target
    pub acceleration: f32,
    /// Floater/sinker drift added to the position every tick
    pub drift: f32,
    /// Where the fish is heading, `NO_TARGET` when idle
    pub target: f32,
}

impl Default for BobberState {
    fn default() -> Self {
        Self {
            position: BOBBER_START,
            velocity: 0.0,
            acceleration: 0.0,
            drift: 0.0,
            target: NO_TARGET,
        }
    }
}

impl BobberState {
    pub fn at(position: f32) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn has_target(&self) -> bool {
        self.target != NO_TARGET
    }
}

/// The player-controlled catch window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchBarState {
    /// Top edge on the track
    pub position: f32,
    pub velocity: f32,
    pub height: f32,
}

impl CatchBarState {
    /// Bar resting on the floor
    pub fn resting(height: i32) -> Self {
        let height = height as f32;
        Self {
            position: TRACK_HEIGHT - height,
            velocity: 0.0,
            height,
        }
    }

    /// Lowest top-edge position the bar may take
    #[inline]
    pub fn floor(&self) -> f32 {
        TRACK_HEIGHT - self.height
    }
}

/// Catch progress and fish condition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// 0 = fish escapes, 1 = fish caught
    pub distance_from_catching: f32,
    pub fish_size: i32,
    pub size_reduction_timer_ms: i32,
    /// No penalty decay has happened yet
    pub perfect: bool,
    pub bobber_in_bar: bool,
    /// Challenge bait fish still on the line, -1 without challenge bait
    pub challenge_fish: i32,
}

impl ProgressState {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            distance_from_catching: START_PROGRESS,
            fish_size: config.starting_fish_size(),
            size_reduction_timer_ms: SIZE_REDUCTION_MS,
            perfect: true,
            bobber_in_bar: true,
            challenge_fish: config.challenge_bait_fish_count,
        }
    }

    pub fn pending_success(&self) -> bool {
        self.distance_from_catching >= 1.0
    }

    pub fn pending_failure(&self) -> bool {
        self.distance_from_catching <= 0.0
    }
}

/// The optional treasure chest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreasureState {
    pub position: f32,
    pub catch_level: f32,
    /// Time left before the treasure shows up
    pub appear_delay_ms: i32,
    pub visible: bool,
    pub caught: bool,
    pub in_bar: bool,
    /// Treasure hunter: the next miss skips decay
    pub grace_armed: bool,
}

impl TreasureState {
    pub fn new(appear_delay_ms: i32) -> Self {
        Self {
            position: 0.0,
            catch_level: 0.0,
            appear_delay_ms,
            visible: false,
            caught: false,
            in_bar: false,
            grace_armed: false,
        }
    }
}

/// Fish quality tiers (value matches the item quality id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum FishQuality {
    #[default]
    Normal = 0,
    Silver = 1,
    Gold = 2,
    Iridium = 4,
}

impl FishQuality {
    const TIERS: [FishQuality; 4] = [
        FishQuality::Normal,
        FishQuality::Silver,
        FishQuality::Gold,
        FishQuality::Iridium,
    ];

    /// Tier from a size fraction in thirds
    pub fn from_size_fraction(fraction: f32) -> Self {
        if fraction < 0.33 {
            FishQuality::Normal
        } else if fraction < 0.66 {
            FishQuality::Silver
        } else {
            FishQuality::Gold
        }
    }

    /// Move up `steps` tiers, capped at iridium
    pub fn raised(self, steps: u32) -> Self {
        let index = Self::TIERS.iter().position(|q| *q == self).unwrap_or(0);
        let raised = (index + steps as usize).min(Self::TIERS.len() - 1);
        Self::TIERS[raised]
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

/// What the treasure turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasureReward {
    /// Ordinary chest
    Standard,
    /// The one-of-a-kind reward, granted by the claim service
    Unique,
}

/// Terminal result of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    /// Ended by the player leaving early
    pub aborted: bool,
    pub perfect: bool,
    pub fish_size: i32,
    pub quality: FishQuality,
    pub treasure_caught: bool,
    pub treasure_reward: Option<TreasureReward>,
    pub number_caught: i32,
    pub boss_fish: bool,
}

impl Outcome {
    /// The fish got away, nothing to hand out
    pub fn failed(aborted: bool) -> Self {
        Self {
            success: false,
            aborted,
            perfect: false,
            fish_size: 0,
            quality: FishQuality::Normal,
            treasure_caught: false,
            treasure_reward: None,
            number_caught: 0,
            boss_fish: false,
        }
    }
}

/// Read-only view for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub bobber_position: f32,
    pub bar_position: f32,
    pub bar_velocity: f32,
    pub bar_height: f32,
    pub distance_from_catching: f32,
    pub bobber_in_bar: bool,
    pub perfect: bool,
    pub treasure: Option<TreasureView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreasureView {
    pub position: f32,
    pub catch_level: f32,
    pub visible: bool,
    pub caught: bool,
}

impl From<&TreasureState> for TreasureView {
    fn from(t: &TreasureState) -> Self {
        Self {
            position: t.position,
            catch_level: t.catch_level,
            visible: t.visible,
            caught: t.caught,
        }
    }
}
