pub mod message;
pub mod types;

pub use message::MessagePayload;
pub use types::{
    ModerationConfig, PatternCategory, PatternMatch, Verdict, VerdictCategory,
};
