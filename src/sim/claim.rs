//! Exclusive claims for one-of-a-kind treasure
//!
//! Only one player may ever receive a unique reward, so the session asks an
//! [`ExclusiveClaim`] service instead of granting it locally. The service
//! answers through a [`ClaimResponder`], now or on a later tick, possibly
//! from another thread. The session polls the answer once per tick and keeps
//! simulating meanwhile.
//!
//! A claim the session will not pay out (the fish got away, the player left,
//! or the answer came too late) is handed back with
//! [`ExclusiveClaim::release`], so the reward stays available to others.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use super::state::TreasureReward;
use crate::consts::CLAIM_TIMEOUT_MS;

/// Service answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClaimDecision {
    Granted,
    Denied,
}

/// One-shot reply handle handed to the service
#[derive(Debug)]
pub struct ClaimResponder {
    tx: Sender<ClaimDecision>,
}

impl ClaimResponder {
    pub fn grant(self) {
        self.answer(ClaimDecision::Granted);
    }

    pub fn deny(self) {
        self.answer(ClaimDecision::Denied);
    }

    pub fn answer(self, decision: ClaimDecision) {
        // The session may already be gone; a late answer is simply dropped
        let _ = self.tx.send(decision);
    }
}

/// Arbitrates who gets a unique reward
pub trait ExclusiveClaim {
    fn request(&mut self, reward_id: &str, responder: ClaimResponder);

    /// Give back a claim this session asked for but will not pay out.
    /// Only called after a grant or a timeout, never after a denial.
    fn release(&mut self, reward_id: &str);
}

/// Where a claim stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClaimStatus {
    Idle,
    Pending { waited_ms: u32 },
    Granted,
    Denied,
    /// No answer within the timeout, or still pending when the session ended
    TimedOut,
    /// The service dropped the responder without answering
    Unanswered,
    /// Handed back to the service
    Released,
}

impl ClaimStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, ClaimStatus::Pending { .. })
    }
}

/// Session-side bookkeeping for a single claim
#[derive(Debug)]
pub struct ClaimTracker {
    status: ClaimStatus,
    rx: Option<Receiver<ClaimDecision>>,
    reward_id: Option<String>,
}

impl Default for ClaimTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimTracker {
    pub fn new() -> Self {
        Self {
            status: ClaimStatus::Idle,
            rx: None,
            reward_id: None,
        }
    }

    pub fn status(&self) -> ClaimStatus {
        self.status
    }

    /// Send the request. Only the first call does anything.
    pub fn request(&mut self, service: &mut dyn ExclusiveClaim, reward_id: &str) {
        if self.status != ClaimStatus::Idle {
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);
        self.reward_id = Some(reward_id.to_string());
        self.status = ClaimStatus::Pending { waited_ms: 0 };
        log::debug!("Requesting exclusive claim on {reward_id}");
        service.request(reward_id, ClaimResponder { tx });
    }

    /// Check for an answer, charging `tick_ms` of waiting if there is none
    pub fn poll(&mut self, tick_ms: u32) -> ClaimStatus {
        let ClaimStatus::Pending { waited_ms } = self.status else {
            return self.status;
        };
        let Some(rx) = &self.rx else {
            self.status = ClaimStatus::Unanswered;
            return self.status;
        };

        match rx.try_recv() {
            Ok(decision) => {
                log::debug!("Exclusive claim resolved: {decision:?}");
                self.resolve(match decision {
                    ClaimDecision::Granted => ClaimStatus::Granted,
                    ClaimDecision::Denied => ClaimStatus::Denied,
                });
            }
            Err(TryRecvError::Disconnected) => {
                log::warn!("Claim service dropped the request without answering");
                self.resolve(ClaimStatus::Unanswered);
            }
            Err(TryRecvError::Empty) => {
                let waited_ms = waited_ms.saturating_add(tick_ms);
                if waited_ms >= CLAIM_TIMEOUT_MS {
                    log::warn!("Exclusive claim timed out after {waited_ms} ms");
                    self.resolve(ClaimStatus::TimedOut);
                } else {
                    self.status = ClaimStatus::Pending { waited_ms };
                }
            }
        }
        self.status
    }

    /// Final check at session end; a claim still pending falls back
    pub fn settle(&mut self) -> ClaimStatus {
        if self.poll(0).is_pending() {
            log::warn!("Session ended with the claim still pending");
            self.resolve(ClaimStatus::TimedOut);
        }
        self.status
    }

    /// Whether the service may be holding the reward for this session
    pub fn needs_release(&self) -> bool {
        matches!(self.status, ClaimStatus::Granted | ClaimStatus::TimedOut)
    }

    /// Hand a granted or timed-out claim back to the service
    pub fn release(&mut self, service: &mut dyn ExclusiveClaim) {
        if !self.needs_release() {
            return;
        }
        if let Some(reward_id) = self.reward_id.take() {
            log::debug!("Releasing exclusive claim on {reward_id}");
            service.release(&reward_id);
        }
        self.resolve(ClaimStatus::Released);
    }

    fn resolve(&mut self, status: ClaimStatus) {
        self.status = status;
        self.rx = None;
    }

    /// Treasure handed out for the current status
    pub fn reward(&self) -> TreasureReward {
        match self.status {
            ClaimStatus::Granted => TreasureReward::Unique,
            _ => TreasureReward::Standard,
        }
    }
}

/// In-process claim service: each reward id is granted once, to the first
/// session that asks. Clones share the same ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClaimRegistry {
    claimed: Arc<Mutex<HashSet<String>>>,
}

impl InMemoryClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self, reward_id: &str) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(reward_id)
    }
}

impl ExclusiveClaim for InMemoryClaimRegistry {
    fn request(&mut self, reward_id: &str, responder: ClaimResponder) {
        let first = self
            .claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(reward_id.to_string());
        if first {
            responder.grant();
        } else {
            responder.deny();
        }
    }

    fn release(&mut self, reward_id: &str) {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(reward_id);
    }
}
