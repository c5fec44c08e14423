//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, files or memory natively)
//! - Time (fixed-step accumulator, wall-clock day)
//! - Rewarded ads (SDK may be absent; outcome always delivered once)

pub mod rewards;
pub mod storage;
pub mod time;

pub use rewards::{AdPoll, AdProvider, RewardOutcome, RewardRequest, Standalone};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use time::FixedStep;
