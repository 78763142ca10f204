use std::sync::Arc;

use crate::domain::{MessagePayload, ModerationConfig, Verdict, VerdictCategory};

use super::{match_patterns, match_words, normalize, score_spam, ModerationState};

/// Spam score at which a message is removed as spam.
pub const SPAM_REMOVAL_SCORE: u8 = 6;

#[derive(Clone)]
pub struct Moderator {
    state: Arc<ModerationState>,
}

impl Moderator {
    pub fn new(state: Arc<ModerationState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ModerationState {
        &self.state
    }

    /// Decides what to do with one message. The violation counter is the
    /// only thing mutated, and only when the message is flagged.
    pub fn evaluate(
        &self,
        payload: &MessagePayload,
        banned_words: &[String],
        nsfw_words: &[String],
        config: &ModerationConfig,
    ) -> Verdict {
        let violations = self.state.violations();
        let text = payload.combined_text();
        if text.is_empty() {
            return Verdict::pass(violations.count(payload.sender_id));
        }

        let matched_patterns = match_patterns(&text);
        let normalized = normalize(&text);
        let matched_banned = match_words(&normalized, banned_words);
        let matched_nsfw = match_words(&normalized, nsfw_words);
        let spam_score = score_spam(&text);

        let is_scam = !matched_banned.is_empty()
            || matched_patterns.iter().any(|m| m.category.is_scam());
        let is_nsfw =
            !matched_nsfw.is_empty() || matched_patterns.iter().any(|m| m.category.is_nsfw());
        let is_spam = spam_score >= SPAM_REMOVAL_SCORE;

        let category = if is_scam {
            VerdictCategory::Scam
        } else if is_nsfw {
            VerdictCategory::Nsfw
        } else if is_spam {
            VerdictCategory::Spam
        } else {
            VerdictCategory::None
        };

        let mut matched_words = matched_banned;
        matched_words.extend(matched_nsfw);

        if category == VerdictCategory::None {
            return Verdict {
                should_remove: false,
                category,
                matched_words,
                matched_patterns,
                spam_score,
                violation_count_after: violations.count(payload.sender_id),
                should_ban: false,
            };
        }

        let count = violations.record_violation(payload.sender_id);
        self.state.record_removal(category);
        let should_ban = config.auto_ban_enabled && count >= config.ban_threshold;

        tracing::debug!(
            target: "moderation",
            sender_id = payload.sender_id,
            category = %category,
            spam_score,
            violations = count,
            should_ban,
            "message flagged"
        );

        Verdict {
            should_remove: true,
            category,
            matched_words,
            matched_patterns,
            spam_score,
            violation_count_after: count,
            should_ban,
        }
    }
}
