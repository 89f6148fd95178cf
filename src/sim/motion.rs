//! Fish behavior: how the bobber evades the catch bar
//!
//! Each motion type is its own strategy behind [`FishMotion`]. The shared tick
//! pipeline in [`advance_bobber`] asks the strategy at each decision point:
//!
//! 1. Retarget roll (weighted per strategy, smooth fish only when idle)
//! 2. Drift (floaters rise, sinkers sink)
//! 3. Approach the target with smoothed velocity, or idle-jump / go idle
//! 4. Strategy burst (darters)
//! 5. Clamp target, integrate, clamp to the active track

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::rng::{chance, next_int};
use super::state::BobberState;
use crate::consts::*;

/// Drift change per tick for floaters and sinkers
pub const DRIFT_STEP: f32 = 0.01;
/// Drift magnitude cap
pub const DRIFT_CAP: f32 = 1.5;

/// Movement archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionType {
    Mixed,
    Dart,
    Smooth,
    Sinker,
    Floater,
}

impl MotionType {
    pub const ALL: [MotionType; 5] = [
        MotionType::Mixed,
        MotionType::Dart,
        MotionType::Smooth,
        MotionType::Sinker,
        MotionType::Floater,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MotionType::Mixed => "mixed",
            MotionType::Dart => "dart",
            MotionType::Smooth => "smooth",
            MotionType::Sinker => "sinker",
            MotionType::Floater => "floater",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mixed" => Some(MotionType::Mixed),
            "dart" => Some(MotionType::Dart),
            "smooth" => Some(MotionType::Smooth),
            "sinker" => Some(MotionType::Sinker),
            "floater" => Some(MotionType::Floater),
            _ => None,
        }
    }

    /// Strategy implementing this motion type
    pub fn strategy(self) -> &'static dyn FishMotion {
        match self {
            MotionType::Mixed => &MixedMotion,
            MotionType::Dart => &DartMotion,
            MotionType::Smooth => &SmoothMotion,
            MotionType::Sinker => &SinkerMotion,
            MotionType::Floater => &FloaterMotion,
        }
    }
}

/// Per-archetype decisions. Defaults describe a mixed fish.
pub trait FishMotion {
    /// Multiplier on the per-tick retarget chance
    fn retarget_weight(&self) -> f32 {
        1.0
    }

    /// Whether a retarget roll may replace the current target
    fn may_retarget(&self, bobber: &BobberState) -> bool {
        let _ = bobber;
        true
    }

    /// Drift after one more tick
    fn drift(&self, drift: f32) -> f32 {
        drift
    }

    /// Whether an idle fish sometimes jumps to a nearby spot
    fn idle_jumps(&self) -> bool {
        true
    }

    /// Extra high-amplitude retarget after the approach step
    fn burst(&self, bobber: &mut BobberState, difficulty: f32, rng: &mut dyn RngCore) {
        let _ = (bobber, difficulty, rng);
    }
}

pub struct MixedMotion;
pub struct DartMotion;
pub struct SmoothMotion;
pub struct SinkerMotion;
pub struct FloaterMotion;

impl FishMotion for MixedMotion {}

impl FishMotion for DartMotion {
    fn burst(&self, bobber: &mut BobberState, difficulty: f32, rng: &mut dyn RngCore) {
        if chance(rng, (difficulty / 1000.0) as f64) {
            let reach = difficulty as i32 * 2;
            let offset = if chance(rng, 0.5) {
                next_int(rng, -100 - reach, -51)
            } else {
                next_int(rng, 50, 101 + reach)
            };
            bobber.target = bobber.position + offset as f32;
        }
    }
}

impl FishMotion for SmoothMotion {
    fn retarget_weight(&self) -> f32 {
        20.0
    }

    fn may_retarget(&self, bobber: &BobberState) -> bool {
        !bobber.has_target()
    }

    fn idle_jumps(&self) -> bool {
        false
    }
}

impl FishMotion for SinkerMotion {
    fn drift(&self, drift: f32) -> f32 {
        (drift + DRIFT_STEP).min(DRIFT_CAP)
    }
}

impl FishMotion for FloaterMotion {
    fn drift(&self, drift: f32) -> f32 {
        (drift - DRIFT_STEP).max(-DRIFT_CAP)
    }
}

/// Advance the bobber by one tick
pub fn advance_bobber(
    motion: &dyn FishMotion,
    bobber: &BobberState,
    difficulty: f32,
    rng: &mut dyn RngCore,
) -> BobberState {
    let mut next = *bobber;
    retarget(motion, &mut next, difficulty, rng);
    next.drift = motion.drift(next.drift);
    approach(motion, &mut next, difficulty, rng);
    motion.burst(&mut next, difficulty, rng);
    next.target = next.target.clamp(NO_TARGET, BOBBER_TRACK_MAX);
    integrate(&mut next);
    next
}

/// Roll for a fresh target somewhere on the track
pub fn retarget(
    motion: &dyn FishMotion,
    bobber: &mut BobberState,
    difficulty: f32,
    rng: &mut dyn RngCore,
) {
    let p = difficulty * motion.retarget_weight() / 4000.0;
    if !(chance(rng, p as f64) && motion.may_retarget(bobber)) {
        return;
    }

    let space_below = BOBBER_TRACK_MAX - bobber.position;
    let space_above = bobber.position;
    let percent = (difficulty + next_int(rng, 10, 45) as f32).min(99.0) / 100.0;
    let offset = next_int(rng, (-space_above).min(space_below) as i32, space_below as i32);
    bobber.target = bobber.position + offset as f32 * percent;
}

/// Steer toward the target, or pick what to do once there
pub fn approach(
    motion: &dyn FishMotion,
    bobber: &mut BobberState,
    difficulty: f32,
    rng: &mut dyn RngCore,
) {
    if bobber.has_target() && (bobber.position - bobber.target).abs() > 3.0 {
        let sluggishness = next_int(rng, 10, 30) as f32 + (100.0 - difficulty.min(100.0));
        bobber.acceleration = (bobber.target - bobber.position) / sluggishness;
        bobber.velocity += (bobber.acceleration - bobber.velocity) / 5.0;
    } else if motion.idle_jumps() && chance(rng, (difficulty / 2000.0) as f64) {
        let offset = if chance(rng, 0.5) {
            next_int(rng, -100, -51)
        } else {
            next_int(rng, 50, 101)
        };
        bobber.target = bobber.position + offset as f32;
    } else {
        bobber.target = NO_TARGET;
    }
}

/// Move by velocity plus drift, staying on the active track
pub fn integrate(bobber: &mut BobberState) {
    bobber.position += bobber.velocity + bobber.drift;
    bobber.position = bobber.position.clamp(0.0, BOBBER_ACTIVE_MAX);
}
