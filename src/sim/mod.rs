//! Deterministic fishing simulation
//!
//! All minigame logic lives here. This module must be pure and deterministic:
//! - One tick per host frame, no internal clocks or threads
//! - Session-owned seeded RNG only
//! - No rendering, audio or input-device dependencies

pub mod autopilot;
pub mod bar;
pub mod claim;
pub mod config;
pub mod motion;
pub mod progress;
pub mod result;
pub mod rng;
pub mod session;
pub mod state;
pub mod treasure;

pub use bar::{advance_bar, bobber_in_bar, marker_in_bar};
pub use claim::{
    ClaimDecision, ClaimResponder, ClaimStatus, ClaimTracker, ExclusiveClaim,
    InMemoryClaimRegistry,
};
pub use config::SimulationConfig;
pub use motion::{FishMotion, MotionType, advance_bobber};
pub use progress::{penalty_rate, reduction_rate, update_progress};
pub use result::{abort_outcome, try_finalize};
pub use session::{FishingSession, SessionPhase};
pub use state::{
    BobberState, CatchBarState, FishQuality, Outcome, ProgressState, Snapshot, TreasureReward,
    TreasureState, TreasureView,
};
pub use treasure::advance_treasure;
