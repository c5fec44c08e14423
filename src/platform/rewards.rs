//! Rewarded ads
//!
//! The ad SDK is optional and unreliable. A `RewardRequest` is started once,
//! polled from the frame loop, and yields exactly one `RewardOutcome`: when
//! the SDK reports, when the timeout elapses, or when the caller cancels.
//! Nothing in the simulation waits on it.

use thiserror::Error;

/// Seconds before an unanswered request resolves as not granted
pub const DEFAULT_TIMEOUT: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardOutcome {
    Granted,
    NotGranted,
}

/// One poll of the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdPoll {
    Pending,
    /// Ad watched to the end
    Rewarded,
    /// Closed early or failed to play
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdError {
    #[error("no ad SDK is available")]
    Unavailable,
    #[error("ad SDK error: {0}")]
    Sdk(String),
}

/// A third-party ad integration
pub trait AdProvider {
    /// False when no SDK is present (standalone build)
    fn is_available(&self) -> bool;
    fn show_reward_ad(&mut self) -> Result<(), AdError>;
    fn poll_reward(&mut self) -> AdPoll;
}

/// No SDK: rewards are granted immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct Standalone;

impl AdProvider for Standalone {
    fn is_available(&self) -> bool {
        false
    }

    fn show_reward_ad(&mut self) -> Result<(), AdError> {
        Err(AdError::Unavailable)
    }

    fn poll_reward(&mut self) -> AdPoll {
        AdPoll::Rewarded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestState {
    Waiting,
    /// Resolved but not yet handed to the caller
    Ready(RewardOutcome),
    Delivered,
}

#[derive(Debug, Clone)]
pub struct RewardRequest {
    state: RequestState,
    elapsed: f32,
    timeout: f32,
}

impl RewardRequest {
    /// Ask the provider to show an ad. Standalone builds resolve as granted;
    /// SDK errors resolve as not granted.
    pub fn start(provider: &mut dyn AdProvider, timeout: f32) -> Self {
        let state = if !provider.is_available() {
            RequestState::Ready(RewardOutcome::Granted)
        } else {
            match provider.show_reward_ad() {
                Ok(()) => RequestState::Waiting,
                Err(e) => {
                    log::warn!("Reward ad failed to start: {e}");
                    RequestState::Ready(RewardOutcome::NotGranted)
                }
            }
        };
        Self {
            state,
            elapsed: 0.0,
            timeout,
        }
    }

    /// Advance by `dt` and return the outcome the first time it is known
    pub fn poll(&mut self, provider: &mut dyn AdProvider, dt: f32) -> Option<RewardOutcome> {
        if self.state == RequestState::Waiting {
            self.elapsed += dt;
            self.state = match provider.poll_reward() {
                AdPoll::Rewarded => RequestState::Ready(RewardOutcome::Granted),
                AdPoll::Dismissed => RequestState::Ready(RewardOutcome::NotGranted),
                AdPoll::Pending if self.elapsed >= self.timeout => {
                    log::warn!("Reward ad timed out after {:.0}s", self.elapsed);
                    RequestState::Ready(RewardOutcome::NotGranted)
                }
                AdPoll::Pending => RequestState::Waiting,
            };
        }
        self.take()
    }

    /// Abandon the request. Returns `NotGranted` unless an outcome was
    /// already delivered.
    pub fn cancel(&mut self) -> Option<RewardOutcome> {
        match self.state {
            RequestState::Delivered => None,
            RequestState::Ready(outcome) => {
                self.state = RequestState::Delivered;
                Some(outcome)
            }
            RequestState::Waiting => {
                self.state = RequestState::Delivered;
                Some(RewardOutcome::NotGranted)
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == RequestState::Delivered
    }

    fn take(&mut self) -> Option<RewardOutcome> {
        if let RequestState::Ready(outcome) = self.state {
            self.state = RequestState::Delivered;
            return Some(outcome);
        }
        None
    }
}
