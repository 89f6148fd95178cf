//! Bobber Bar - fishing minigame simulation
//!
//! Core modules:
//! - `sim`: Deterministic tick simulation (fish motion, catch bar, progress, treasure)
//! - `registry`: Fish data lookup
//! - `loadout`: Rod, bait and tackle the angler brings to the session
//! - `error`: Configuration and session errors

pub mod error;
pub mod loadout;
pub mod registry;
pub mod sim;

pub use error::{ConfigError, SessionError};
pub use loadout::{Bait, Loadout, RodKind, Tackle};
pub use registry::{FishData, FishRegistry};
pub use sim::{FishingSession, MotionType, Outcome, SimulationConfig, Snapshot};

/// Simulation constants
pub mod consts {
    /// Default tick length (one frame at ~60 Hz)
    pub const DEFAULT_TICK_MS: u32 = 16;

    /// Full height of the catch bar track
    pub const TRACK_HEIGHT: f32 = 568.0;
    /// Lowest position the bobber may occupy after a full tick
    pub const BOBBER_TRACK_MAX: f32 = 548.0;
    /// Lowest position the bobber may occupy while moving
    pub const BOBBER_ACTIVE_MAX: f32 = 532.0;
    /// Sentinel for "no active target"
    pub const NO_TARGET: f32 = -1.0;

    /// Bobber starting position (inside the resting bar)
    pub const BOBBER_START: f32 = 508.0;
    /// Starting catch progress
    pub const START_PROGRESS: f32 = 0.3;

    /// Bar height at fishing level 0
    pub const BASE_BAR_HEIGHT: i32 = 96;
    /// Extra bar height per fishing level
    pub const BAR_HEIGHT_PER_LEVEL: i32 = 8;
    /// Training rod bonus below this fishing level
    pub const TRAINING_ROD_LEVEL_CAP: i32 = 5;
    /// Training rod bonus at level 0
    pub const TRAINING_ROD_BONUS: i32 = 40;
    /// Extra bar height per cork bobber
    pub const CORK_BAR_BONUS: i32 = 24;

    /// Bar gravity (positive pulls toward the floor)
    pub const BAR_GRAVITY: f32 = 0.25;
    /// Restitution when the bar bounces off a rail
    pub const BAR_RESTITUTION: f32 = 2.0 / 3.0;
    /// Bounce factor applied per lead bobber on the floor rail
    pub const LEAD_BOUNCE_FACTOR: f32 = 0.1;

    /// Progress gained per tick while the bobber is in the bar
    pub const PROGRESS_GAIN: f32 = 0.002;
    /// Progress lost per tick on a miss
    pub const PENALTY_RATE: f32 = 0.003;
    /// Progress lost per tick on a miss with a training rod
    pub const TRAINING_PENALTY_RATE: f32 = 0.002;
    /// Penalty rate never drops below this, however many trap bobbers
    pub const MIN_PENALTY_RATE: f32 = 0.001;
    /// Milliseconds out of the bar before the fish shrinks by one
    pub const SIZE_REDUCTION_MS: i32 = 800;

    /// Treasure catch level gained per overlapping tick
    pub const TREASURE_GAIN: f32 = 0.0135;
    /// Treasure catch level lost per missed tick
    pub const TREASURE_DECAY: f32 = 0.01;
    /// Treasure appear delay range (ms, half-open)
    pub const TREASURE_DELAY_MIN_MS: i32 = 1000;
    pub const TREASURE_DELAY_MAX_MS: i32 = 3000;

    /// How long a unique treasure claim may stay pending
    pub const CLAIM_TIMEOUT_MS: u32 = 5000;
}
