//! Fishing session: one fish, one fight, one outcome
//!
//! Order of a tick:
//! 1. Poll any pending treasure claim
//! 2. Fish moves
//! 3. Overlap check, then the catch bar moves
//! 4. Treasure (if any), requesting the unique claim when it is caught
//! 5. Progress accrues or drains
//! 6. Outer bobber clamp, then the outcome check
//!
//! A unique-treasure claim that ends up unpaid (failed or aborted fight,
//! timed-out answer) is released back to the claim service.

use rand::Rng;

use super::bar::{advance_bar, bobber_in_bar};
use super::claim::{ClaimStatus, ClaimTracker, ExclusiveClaim};
use super::config::SimulationConfig;
use super::motion::advance_bobber;
use super::progress::update_progress;
use super::result::{abort_outcome, try_finalize};
use super::rng::{SessionRng, seeded};
use super::state::{
    BobberState, CatchBarState, Outcome, ProgressState, Snapshot, TreasureReward, TreasureState,
    TreasureView,
};
use super::treasure::{advance_treasure, spawn_treasure};
use crate::consts::*;
use crate::error::{ConfigError, SessionError};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Fighting,
    Finished,
}

pub struct FishingSession<R: Rng = SessionRng> {
    config: SimulationConfig,
    rng: R,
    bobber: BobberState,
    bar: CatchBarState,
    progress: ProgressState,
    treasure: Option<TreasureState>,
    claim: ClaimTracker,
    claims: Option<Box<dyn ExclusiveClaim>>,
    tick: u64,
    phase: SessionPhase,
}

impl FishingSession<SessionRng> {
    /// Session driven by a seeded PCG generator
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, seeded(seed))
    }
}

impl<R: Rng> FishingSession<R> {
    pub fn new(config: SimulationConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let treasure = config.treasure_enabled.then(|| spawn_treasure(&mut rng));
        log::info!(
            "Fishing session start: difficulty={}, motion={}, bar={}, treasure={}",
            config.difficulty,
            config.motion.as_str(),
            config.bar_height,
            treasure.is_some()
        );

        Ok(Self {
            bar: CatchBarState::resting(config.bar_height),
            progress: ProgressState::new(&config),
            bobber: BobberState::default(),
            treasure,
            claim: ClaimTracker::new(),
            claims: None,
            tick: 0,
            phase: SessionPhase::Fighting,
            rng,
            config,
        })
    }

    /// Attach the service that arbitrates unique treasure
    pub fn with_claims(mut self, service: impl ExclusiveClaim + 'static) -> Self {
        self.claims = Some(Box::new(service));
        self
    }

    /// Advance one tick. Returns the outcome on the tick the fight ends,
    /// `None` before and after.
    pub fn update(&mut self, tick_ms: u32, button_held: bool) -> Option<Outcome> {
        if self.phase == SessionPhase::Finished {
            log::warn!("update() on a finished fishing session ignored");
            return None;
        }
        self.tick += 1;

        if self.claim.status().is_pending()
            && self.claim.poll(tick_ms) == ClaimStatus::TimedOut
        {
            self.release_claim();
        }

        let motion = self.config.motion.strategy();
        self.bobber = advance_bobber(motion, &self.bobber, self.config.difficulty, &mut self.rng);

        let in_bar = bobber_in_bar(self.bobber.position, &self.bar);
        self.bar = advance_bar(
            &self.bar,
            self.bobber.position,
            in_bar,
            &self.config,
            button_held,
        );

        let mut treasure_shield = false;
        if let Some(treasure) = self.treasure {
            let next = advance_treasure(
                &treasure,
                &self.bar,
                tick_ms,
                self.config.treasure_hunter,
                &mut self.rng,
            );
            treasure_shield = self.config.treasure_hunter && next.in_bar && !next.caught;
            self.treasure = Some(next);
            if next.caught && !treasure.caught {
                self.on_treasure_caught();
            }
        }

        self.progress = update_progress(
            &self.progress,
            in_bar,
            &self.config,
            tick_ms,
            self.config.has_caught_before,
            treasure_shield,
        );
        self.bobber.position = self.bobber.position.clamp(0.0, BOBBER_TRACK_MAX);

        if self.progress.pending_success() || self.progress.pending_failure() {
            self.claim.settle();
        }
        let outcome = try_finalize(
            &self.progress,
            self.treasure.as_ref(),
            self.claim.reward(),
            &self.config,
            &mut self.rng,
        );
        if let Some(outcome) = &outcome {
            self.finish(outcome);
        }
        outcome
    }

    /// Player left early. Always a failure; only valid once.
    pub fn abort(&mut self) -> Result<Outcome, SessionError> {
        if self.phase == SessionPhase::Finished {
            log::warn!("abort() on a finished fishing session");
            return Err(SessionError::AlreadyFinished);
        }
        self.claim.settle();
        let outcome = abort_outcome();
        self.finish(&outcome);
        Ok(outcome)
    }

    fn on_treasure_caught(&mut self) {
        let Some(reward_id) = &self.config.unique_treasure else {
            return;
        };
        match self.claims.as_mut() {
            Some(service) => {
                self.claim.request(&mut **service, reward_id);
                // In-process services answer right away
                self.claim.poll(0);
            }
            None => log::warn!("No claim service for {reward_id}, granting standard treasure"),
        }
    }

    fn release_claim(&mut self) {
        if let Some(service) = self.claims.as_mut() {
            self.claim.release(&mut **service);
        }
    }

    fn finish(&mut self, outcome: &Outcome) {
        self.phase = SessionPhase::Finished;
        if outcome.treasure_reward != Some(TreasureReward::Unique) {
            self.release_claim();
        }
        log::info!(
            "Fishing session end after {} ticks: success={}, perfect={}, size={}, quality={:?}, count={}",
            self.tick,
            outcome.success,
            outcome.perfect,
            outcome.fish_size,
            outcome.quality,
            outcome.number_caught
        );
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            bobber_position: self.bobber.position,
            bar_position: self.bar.position,
            bar_velocity: self.bar.velocity,
            bar_height: self.bar.height,
            distance_from_catching: self.progress.distance_from_catching,
            bobber_in_bar: self.progress.bobber_in_bar,
            perfect: self.progress.perfect,
            treasure: self.treasure.as_ref().map(TreasureView::from),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn claim_status(&self) -> ClaimStatus {
        self.claim.status()
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::claim::{ClaimResponder, InMemoryClaimRegistry};
    use crate::sim::MotionType;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TICK: u32 = DEFAULT_TICK_MS;

    fn config(difficulty: f32, motion: MotionType) -> SimulationConfig {
        SimulationConfig::new(difficulty, motion, 1, 10, 96).unwrap()
    }

    fn run(session: &mut FishingSession, button_held: bool, max_ticks: u32) -> Option<Outcome> {
        (0..max_ticks).find_map(|_| session.update(TICK, button_held))
    }

    /// Parks a session with the fish resting in the bar, one tick from landing
    /// it, and a treasure one tick from being caught.
    fn about_to_land(session: &mut FishingSession) {
        session.progress.distance_from_catching = 0.999;
        session.treasure = Some(TreasureState {
            position: 480.0,
            catch_level: 0.99,
            visible: true,
            ..TreasureState::new(0)
        });
    }

    #[derive(Clone, Default)]
    struct Deferred {
        held: Rc<RefCell<Vec<ClaimResponder>>>,
        released: Rc<RefCell<Vec<String>>>,
    }

    impl ExclusiveClaim for Deferred {
        fn request(&mut self, _reward_id: &str, responder: ClaimResponder) {
            self.held.borrow_mut().push(responder);
        }

        fn release(&mut self, reward_id: &str) {
            self.released.borrow_mut().push(reward_id.to_string());
        }
    }

    #[test]
    fn test_first_catch_grace_lands_easy_fish_with_button_held() {
        let mut config = config(0.0, MotionType::Floater);
        config.has_caught_before = false;
        let mut session = FishingSession::with_seed(config, 7).unwrap();
        let outcome = run(&mut session, true, 3000).expect("session should end");
        assert!(outcome.success);
        assert!(session.is_finished());
    }

    #[test]
    fn test_held_button_loses_easy_fish_once_penalties_apply() {
        // Holding pins the bar to the top rail, away from a fish near the floor
        for motion in MotionType::ALL {
            let mut session = FishingSession::with_seed(config(0.0, motion), 7).unwrap();
            let outcome = run(&mut session, true, 3000).expect("session should end");
            assert!(!outcome.success, "{motion:?}");
        }
    }

    #[test]
    fn test_bar_stays_on_floor_rail_replay() {
        let mut config = config(0.0, MotionType::Mixed);
        config.treasure_enabled = true;
        let mut session = FishingSession::with_seed(config, 14_022_895_539_613).unwrap();
        let presses = [
            true, false, true, true, false, false, true, false, false, false, false,
        ];
        for held in presses {
            session.update(TICK, held);
            let s = session.snapshot();
            assert!(s.bar_position >= 0.0);
            assert!(s.bar_position <= TRACK_HEIGHT - s.bar_height, "{}", s.bar_position);
        }
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let play = |seed| {
            let mut session =
                FishingSession::with_seed(config(0.0, MotionType::Floater), seed).unwrap();
            let outcome = run(&mut session, true, 3000);
            (outcome, session.ticks())
        };
        assert_eq!(play(99), play(99));

        let hard = |seed| {
            let mut session =
                FishingSession::with_seed(config(85.0, MotionType::Dart), seed).unwrap();
            let mut held = false;
            let outcome = (0..20_000).find_map(|i| {
                if i % 7 == 0 {
                    held = !held;
                }
                session.update(TICK, held)
            });
            (outcome, session.ticks())
        };
        assert_eq!(hard(1234), hard(1234));
    }

    #[test]
    fn test_hard_fish_idle_button_fails() {
        let mut session =
            FishingSession::with_seed(config(100.0, MotionType::Floater), 3).unwrap();
        let outcome = run(&mut session, false, 20_000).expect("session should end");
        assert!(!outcome.success);
        assert!(!outcome.aborted);
        assert_eq!(session.snapshot().distance_from_catching, 0.0);
    }

    #[test]
    fn test_outcome_emitted_once() {
        let mut session = FishingSession::with_seed(config(100.0, MotionType::Floater), 3).unwrap();
        assert!(run(&mut session, false, 20_000).is_some());
        let ticks = session.ticks();
        assert!(session.update(TICK, true).is_none());
        assert_eq!(session.ticks(), ticks);
        assert_eq!(session.abort(), Err(SessionError::AlreadyFinished));
    }

    #[test]
    fn test_abort_mid_session() {
        let mut session = FishingSession::with_seed(config(40.0, MotionType::Mixed), 5).unwrap();
        for _ in 0..50 {
            assert!(session.update(TICK, false).is_none());
        }
        let outcome = session.abort().unwrap();
        assert!(!outcome.success);
        assert!(outcome.aborted);
        assert_eq!(outcome.number_caught, 0);
        assert_eq!(session.abort(), Err(SessionError::AlreadyFinished));
        assert!(session.update(TICK, false).is_none());
    }

    #[test]
    fn test_abort_with_high_progress_still_fails() {
        let mut session = FishingSession::with_seed(config(0.0, MotionType::Mixed), 5).unwrap();
        session.progress.distance_from_catching = 0.998;
        let outcome = session.abort().unwrap();
        assert!(!outcome.success);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config(10.0, MotionType::Mixed);
        config.min_fish_size = 20;
        assert!(matches!(
            FishingSession::with_seed(config, 1),
            Err(ConfigError::InvertedSizeRange { .. })
        ));
    }

    #[test]
    fn test_bad_penalty_modifier_rejected() {
        for modifier in [f32::NAN, -1.0] {
            let mut config = config(10.0, MotionType::Mixed);
            config.distance_from_catch_penalty_modifier = modifier;
            assert!(matches!(
                FishingSession::with_seed(config, 1),
                Err(ConfigError::InvalidModifier { .. })
            ));
        }
    }

    #[test]
    fn test_huge_ticks_saturate() {
        let mut config = config(10.0, MotionType::Mixed);
        config.treasure_enabled = true;
        let mut session = FishingSession::with_seed(config, 1).unwrap();
        session.bobber = BobberState::at(100.0);
        session.update(u32::MAX / 2 + 1, false);
        session.update(u32::MAX, false);
        let s = session.snapshot();
        assert!(s.treasure.unwrap().visible);
        assert!((0.0..=1.0).contains(&s.distance_from_catching));
    }

    #[test]
    fn test_unique_treasure_granted_once() {
        let registry = InMemoryClaimRegistry::new();
        let config = config(0.0, MotionType::Mixed).with_unique_treasure("golden-walnut");

        let mut first = FishingSession::with_seed(config.clone(), 1)
            .unwrap()
            .with_claims(registry.clone());
        about_to_land(&mut first);
        let outcome = first.update(TICK, false).unwrap();
        assert!(outcome.success);
        assert!(outcome.treasure_caught);
        assert_eq!(outcome.treasure_reward, Some(TreasureReward::Unique));

        let mut second = FishingSession::with_seed(config, 2)
            .unwrap()
            .with_claims(registry.clone());
        about_to_land(&mut second);
        let outcome = second.update(TICK, false).unwrap();
        assert_eq!(outcome.treasure_reward, Some(TreasureReward::Standard));
    }

    #[test]
    fn test_pending_claim_keeps_ticking() {
        let service = Deferred::default();
        let config = config(0.0, MotionType::Mixed).with_unique_treasure("golden-walnut");
        let mut session = FishingSession::with_seed(config, 1)
            .unwrap()
            .with_claims(service.clone());
        about_to_land(&mut session);
        session.progress.distance_from_catching = 0.5;

        assert!(session.update(TICK, false).is_none());
        assert!(session.claim_status().is_pending());
        for _ in 0..10 {
            assert!(session.update(TICK, false).is_none());
        }
        assert!(session.snapshot().distance_from_catching > 0.5);
        assert_eq!(service.held.borrow().len(), 1);

        service.held.borrow_mut().pop().unwrap().grant();
        let outcome = run(&mut session, false, 1000).unwrap();
        assert_eq!(session.claim_status(), ClaimStatus::Granted);
        assert_eq!(outcome.treasure_reward, Some(TreasureReward::Unique));
    }

    #[test]
    fn test_claim_pending_at_landing_falls_back_and_is_released() {
        let service = Deferred::default();
        let config = config(0.0, MotionType::Mixed).with_unique_treasure("golden-walnut");
        let mut session = FishingSession::with_seed(config, 1)
            .unwrap()
            .with_claims(service.clone());
        about_to_land(&mut session);
        let outcome = session.update(TICK, false).unwrap();
        assert_eq!(session.claim_status(), ClaimStatus::Released);
        assert_eq!(outcome.treasure_reward, Some(TreasureReward::Standard));
        assert_eq!(*service.released.borrow(), vec!["golden-walnut".to_string()]);
    }

    #[test]
    fn test_timed_out_claim_is_released() {
        let service = Deferred::default();
        let config = config(0.0, MotionType::Mixed).with_unique_treasure("golden-walnut");
        let mut session = FishingSession::with_seed(config, 1)
            .unwrap()
            .with_claims(service.clone());
        about_to_land(&mut session);
        session.progress.distance_from_catching = 0.5;

        assert!(session.update(TICK, false).is_none());
        assert!(session.claim_status().is_pending());
        assert!(session.update(CLAIM_TIMEOUT_MS, false).is_none());
        assert_eq!(session.claim_status(), ClaimStatus::Released);
        assert_eq!(service.released.borrow().len(), 1);

        // too late: the session already gave the claim back
        service.held.borrow_mut().pop().unwrap().grant();
        let outcome = run(&mut session, false, 1000).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.treasure_reward, Some(TreasureReward::Standard));
        assert_eq!(service.released.borrow().len(), 1);
    }

    /// Catches the unique treasure mid-fight and returns the session
    fn claimed_mid_fight(registry: &InMemoryClaimRegistry) -> FishingSession {
        let config = config(0.0, MotionType::Mixed).with_unique_treasure("golden-walnut");
        let mut session = FishingSession::with_seed(config, 1)
            .unwrap()
            .with_claims(registry.clone());
        about_to_land(&mut session);
        session.progress.distance_from_catching = 0.5;
        assert!(session.update(TICK, false).is_none());
        assert_eq!(session.claim_status(), ClaimStatus::Granted);
        assert!(registry.is_claimed("golden-walnut"));
        session
    }

    fn lands_unique(registry: &InMemoryClaimRegistry) -> bool {
        let config = config(0.0, MotionType::Mixed).with_unique_treasure("golden-walnut");
        let mut session = FishingSession::with_seed(config, 2)
            .unwrap()
            .with_claims(registry.clone());
        about_to_land(&mut session);
        let outcome = session.update(TICK, false).unwrap();
        outcome.treasure_reward == Some(TreasureReward::Unique)
    }

    #[test]
    fn test_abort_releases_unique_treasure() {
        let registry = InMemoryClaimRegistry::new();
        let mut session = claimed_mid_fight(&registry);

        let outcome = session.abort().unwrap();
        assert_eq!(outcome.treasure_reward, None);
        assert_eq!(session.claim_status(), ClaimStatus::Released);
        assert!(!registry.is_claimed("golden-walnut"));
        assert!(lands_unique(&registry));
    }

    #[test]
    fn test_escaped_fish_releases_unique_treasure() {
        let registry = InMemoryClaimRegistry::new();
        let mut session = claimed_mid_fight(&registry);

        // fish far above the resting bar, progress about to run out
        session.bobber = BobberState::at(100.0);
        session.progress.distance_from_catching = 0.001;
        let outcome = session.update(TICK, false).unwrap();
        assert!(!outcome.success);
        assert_eq!(session.claim_status(), ClaimStatus::Released);
        assert!(!registry.is_claimed("golden-walnut"));
        assert!(lands_unique(&registry));
    }

    #[test]
    fn test_missing_claim_service_falls_back() {
        let config = config(0.0, MotionType::Mixed).with_unique_treasure("golden-walnut");
        let mut session = FishingSession::with_seed(config, 1).unwrap();
        about_to_land(&mut session);
        let outcome = session.update(TICK, false).unwrap();
        assert_eq!(outcome.treasure_reward, Some(TreasureReward::Standard));
    }

    #[test]
    fn test_treasure_hunter_shields_progress() {
        let mut config = config(0.0, MotionType::Mixed);
        config.treasure_enabled = true;
        config.treasure_hunter = true;
        let mut session = FishingSession::with_seed(config, 1).unwrap();
        // fish parked above the bar, treasure inside it
        session.bobber = BobberState::at(100.0);
        session.treasure = Some(TreasureState {
            position: 480.0,
            visible: true,
            ..TreasureState::new(0)
        });
        for _ in 0..20 {
            session.update(TICK, false);
        }
        let snapshot = session.snapshot();
        assert!(!snapshot.bobber_in_bar);
        assert_eq!(snapshot.distance_from_catching, START_PROGRESS);
        assert!(snapshot.perfect);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut config = config(30.0, MotionType::Smooth);
        config.treasure_enabled = true;
        let mut session = FishingSession::with_seed(config, 8).unwrap();
        let start = session.snapshot();
        assert_eq!(start.tick, 0);
        assert_eq!(start.bobber_position, BOBBER_START);
        assert_eq!(start.bar_position, TRACK_HEIGHT - 96.0);
        assert_eq!(start.distance_from_catching, START_PROGRESS);
        assert!(!start.treasure.unwrap().visible);

        session.update(TICK, true);
        assert_eq!(session.snapshot().tick, 1);
    }

    proptest! {
        #[test]
        fn prop_session_stays_in_bounds(
            seed in any::<u64>(),
            difficulty in 0.0f32..=100.0,
            kind in 0usize..5,
            presses in proptest::collection::vec(any::<bool>(), 1..400),
        ) {
            let mut config = config(difficulty, MotionType::ALL[kind]);
            config.treasure_enabled = true;
            let mut session = FishingSession::with_seed(config, seed).unwrap();
            let mut in_bar_run: Option<f32> = None;
            for held in presses {
                let done = session.update(TICK, held).is_some();
                let s = session.snapshot();
                prop_assert!(s.bobber_position >= 0.0 && s.bobber_position <= BOBBER_TRACK_MAX);
                prop_assert!(s.bar_position >= 0.0 && s.bar_position <= TRACK_HEIGHT - s.bar_height);
                prop_assert!((0.0..=1.0).contains(&s.distance_from_catching));
                if s.bobber_in_bar {
                    if let Some(prev) = in_bar_run {
                        prop_assert!(s.distance_from_catching >= prev);
                    }
                    in_bar_run = Some(s.distance_from_catching);
                } else {
                    in_bar_run = None;
                }
                if done {
                    break;
                }
            }
        }
    }
}
