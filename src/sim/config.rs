//! Immutable per-session parameters
//!
//! Built once from fish data and the angler's loadout, validated up front so
//! a session never starts from a bad config.

use serde::{Deserialize, Serialize};

use super::motion::MotionType;
use crate::consts::*;
use crate::error::ConfigError;
use crate::loadout::{Bait, Loadout, Tackle, count};
use crate::registry::FishData;

/// Fish count granted by challenge bait
pub const CHALLENGE_BAIT_FISH: i32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 0-100
    pub difficulty: f32,
    pub motion: MotionType,
    pub min_fish_size: i32,
    pub max_fish_size: i32,
    /// Where in the size range this fish starts, 0..1
    pub size_fraction: f32,
    pub bar_height: i32,
    pub boss_fish: bool,
    pub beginner_rod: bool,
    pub distance_from_catch_penalty_modifier: f32,
    /// -1 disables challenge bait
    pub challenge_bait_fish_count: i32,
    pub treasure_enabled: bool,
    /// Reward id that must be claimed through the exclusive-claim service
    pub unique_treasure: Option<String>,
    /// Lead bobbers
    pub bounce_dampening_stacks: u32,
    /// Barbed hooks
    pub bar_attraction_stacks: u32,
    /// Trap bobbers
    pub penalty_reduction_stacks: u32,
    pub quality_stacks: u32,
    pub treasure_hunter: bool,
    pub double_catch_bait: bool,
    pub luck: f32,
    /// Penalty decay only applies once the player has a catch on record
    pub has_caught_before: bool,
}

impl SimulationConfig {
    /// Plain config with no equipment
    pub fn new(
        difficulty: f32,
        motion: MotionType,
        min_fish_size: i32,
        max_fish_size: i32,
        bar_height: i32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            difficulty,
            motion,
            min_fish_size,
            max_fish_size,
            size_fraction: 0.5,
            bar_height,
            boss_fish: false,
            beginner_rod: false,
            distance_from_catch_penalty_modifier: 1.0,
            challenge_bait_fish_count: -1,
            treasure_enabled: false,
            unique_treasure: None,
            bounce_dampening_stacks: 0,
            bar_attraction_stacks: 0,
            penalty_reduction_stacks: 0,
            quality_stacks: 0,
            treasure_hunter: false,
            double_catch_bait: false,
            luck: 0.0,
            has_caught_before: true,
        };
        config.validate()?;
        Ok(config)
    }

    /// Derive the config for `fish` hooked with `loadout`
    pub fn resolve(
        fish: &FishData,
        loadout: &Loadout,
        size_fraction: f32,
        treasure: bool,
    ) -> Result<Self, ConfigError> {
        let tackle = loadout.resolve_tackle()?;
        let bait = loadout.bait_kind();

        let mut config = Self::new(
            fish.difficulty,
            fish.motion,
            fish.min_size,
            fish.max_size,
            loadout.bar_height()?,
        )?;
        config.size_fraction = size_fraction.clamp(0.0, 1.0);
        config.boss_fish = fish.boss;
        config.beginner_rod = loadout.rod.is_beginner();
        config.treasure_enabled = treasure;
        config.bounce_dampening_stacks = count(&tackle, Tackle::LeadBobber);
        config.bar_attraction_stacks = count(&tackle, Tackle::BarbedHook);
        config.penalty_reduction_stacks = count(&tackle, Tackle::TrapBobber);
        config.quality_stacks = count(&tackle, Tackle::QualityBobber);
        config.treasure_hunter = tackle.contains(&Tackle::TreasureHunter);
        config.double_catch_bait = bait == Bait::Wild;
        config.challenge_bait_fish_count = if bait == Bait::Challenge {
            CHALLENGE_BAIT_FISH
        } else {
            -1
        };
        config.luck = loadout.luck;
        config.has_caught_before = loadout.has_caught_before;
        config.validate()?;
        Ok(config)
    }

    /// Make the treasure a one-of-a-kind reward
    pub fn with_unique_treasure(mut self, reward_id: impl Into<String>) -> Self {
        self.treasure_enabled = true;
        self.unique_treasure = Some(reward_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_fish_size > self.max_fish_size {
            return Err(ConfigError::InvertedSizeRange {
                min: self.min_fish_size,
                max: self.max_fish_size,
            });
        }
        if !(0.0..=100.0).contains(&self.difficulty) {
            return Err(ConfigError::DifficultyOutOfRange {
                difficulty: self.difficulty,
            });
        }
        if self.bar_height <= 0 || self.bar_height as f32 >= TRACK_HEIGHT {
            return Err(ConfigError::BarTooTall {
                bar_height: self.bar_height,
            });
        }

        let modifier = self.distance_from_catch_penalty_modifier;
        if !modifier.is_finite() || modifier < 0.0 {
            return Err(ConfigError::InvalidModifier {
                name: "penalty modifier",
                value: modifier,
            });
        }
        if !(0.0..=1.0).contains(&self.size_fraction) {
            return Err(ConfigError::InvalidModifier {
                name: "size fraction",
                value: self.size_fraction,
            });
        }
        if !self.luck.is_finite() {
            return Err(ConfigError::InvalidModifier {
                name: "luck",
                value: self.luck,
            });
        }
        Ok(())
    }

    /// Fish size at the start of the session
    pub fn starting_fish_size(&self) -> i32 {
        let span = (self.max_fish_size - self.min_fish_size) as f32;
        self.min_fish_size + (span * self.size_fraction).floor() as i32 + 1
    }

    /// Bounce multiplier on the floor rail
    pub fn bounce_dampening(&self) -> f32 {
        LEAD_BOUNCE_FACTOR.powi(self.bounce_dampening_stacks as i32)
    }
}
