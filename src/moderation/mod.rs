//! Moderation decision engine.
//!
//! Everything in here is synchronous and free of I/O. The only shared
//! mutable data is the violation map inside [`ModerationState`].

pub mod engine;
pub mod normalize;
pub mod patterns;
pub mod spam;
pub mod state;
pub mod words;

pub use engine::Moderator;
pub use normalize::normalize;
pub use patterns::match_patterns;
pub use spam::score_spam;
pub use state::{ModerationState, StatsSnapshot, ViolationTracker};
pub use words::match_words;
