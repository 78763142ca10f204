use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use teloxide::{prelude::*, types::Message, RequestError};

use crate::{
    config::AppConfig,
    domain::{MessagePayload, Verdict},
    infrastructure::notifier::{escape_html, notify_admin_group},
};

/// What happened when the verdict was acted on. Failures here never touch
/// the violation counters.
#[derive(Debug)]
pub struct EnforcementOutcome {
    pub deleted: Result<(), RequestError>,
    pub banned: Option<Result<(), RequestError>>,
}

/// Deletes the message and, when the verdict asks for it, bans the sender.
/// The ban is attempted even if deletion failed.
pub async fn enforce(
    bot: &Bot,
    config: &AppConfig,
    msg: &Message,
    sender: UserId,
    payload: &MessagePayload,
    verdict: &Verdict,
) -> EnforcementOutcome {
    let preview: Vec<&str> = verdict.matched_words.iter().take(3).map(String::as_str).collect();
    let deleted = bot.delete_message(msg.chat.id, msg.id).await.map(|_| ());
    match &deleted {
        Ok(()) => tracing::warn!(
            target: "enforcement",
            chat_id = msg.chat.id.0,
            message_id = msg.id.0,
            sender = %payload.sender_handle,
            sender_id = payload.sender_id,
            category = %verdict.category,
            matched = ?preview,
            violations = verdict.violation_count_after,
            "deleted message"
        ),
        Err(err) => tracing::error!(
            target: "enforcement",
            error = %err,
            chat_id = msg.chat.id.0,
            message_id = msg.id.0,
            sender_id = payload.sender_id,
            "failed to delete message"
        ),
    }

    let banned = if verdict.should_ban {
        let result = bot.ban_chat_member(msg.chat.id, sender).await.map(|_| ());
        match &result {
            Ok(()) => tracing::warn!(
                target: "enforcement",
                chat_id = msg.chat.id.0,
                sender = %payload.sender_handle,
                sender_id = payload.sender_id,
                violations = verdict.violation_count_after,
                "banned user"
            ),
            Err(err) => tracing::error!(
                target: "enforcement",
                error = %err,
                chat_id = msg.chat.id.0,
                sender_id = payload.sender_id,
                "failed to ban user"
            ),
        }
        Some(result)
    } else {
        None
    };

    let outcome = EnforcementOutcome { deleted, banned };

    if config.admin_group_id.is_some() {
        let tz: Tz = config.timezone.parse().unwrap_or(Tz::UTC);
        let entry = ModerationLogEntry {
            chat_title: msg.chat.title(),
            chat_id: msg.chat.id.0,
            payload,
            verdict,
            sent_at: msg.date,
            handled_at: Utc::now(),
            deleted: outcome.deleted.is_ok(),
            banned: outcome.banned.as_ref().map(Result::is_ok),
        };
        notify_admin_group(bot, config, &format_moderation_log(&entry, tz)).await;
    }

    outcome
}

pub struct ModerationLogEntry<'a> {
    pub chat_title: Option<&'a str>,
    pub chat_id: i64,
    pub payload: &'a MessagePayload,
    pub verdict: &'a Verdict,
    pub sent_at: DateTime<Utc>,
    pub handled_at: DateTime<Utc>,
    pub deleted: bool,
    pub banned: Option<bool>,
}

pub fn format_moderation_log(entry: &ModerationLogEntry<'_>, tz: Tz) -> String {
    let verdict = entry.verdict;
    let patterns = verdict
        .matched_patterns
        .iter()
        .map(|m| format!("{} ({})", m.category, m.matched))
        .collect::<Vec<_>>()
        .join(", ");
    let action = match (entry.deleted, entry.banned) {
        (true, Some(true)) => "deleted, sender banned",
        (true, Some(false)) => "deleted, ban failed",
        (true, None) => "deleted",
        (false, Some(true)) => "delete failed, sender banned",
        (false, Some(false)) => "delete and ban failed",
        (false, None) => "delete failed",
    };

    format!(
        "<b>Moderation log</b>\n\n\
         Chat: {}\n\
         Chat ID: {}\n\
         User: {}\n\
         User ID: {}\n\
         Category: {}\n\
         Matched words: {}\n\
         Matched patterns: {}\n\
         Spam score: {}\n\
         Violations: {}\n\
         Action: {}\n\
         Sent at: {}\n\
         Handled at: {}\n\n\
         Message:\n<pre>{}</pre>",
        escape_html(entry.chat_title.unwrap_or("Unknown")),
        entry.chat_id,
        escape_html(&entry.payload.sender_handle),
        entry.payload.sender_id,
        verdict.category,
        escape_html(&or_dash(verdict.matched_words.join(", "))),
        escape_html(&or_dash(patterns)),
        verdict.spam_score,
        verdict.violation_count_after,
        action,
        entry.sent_at.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S"),
        entry.handled_at.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S"),
        escape_html(&entry.payload.combined_text()),
    )
}

fn or_dash(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{PatternCategory, PatternMatch, VerdictCategory};

    #[test]
    fn log_includes_verdict_details_and_escapes_text() {
        let payload = MessagePayload::new(99, "spammer").with_text("<b>claim</b> airdrop now");
        let verdict = Verdict {
            should_remove: true,
            category: VerdictCategory::Scam,
            matched_words: vec!["airdrop".to_string()],
            matched_patterns: vec![PatternMatch {
                category: PatternCategory::CryptoScam,
                matched: "airdrop now".to_string(),
            }],
            spam_score: 2,
            violation_count_after: 3,
            should_ban: true,
        };
        let sent_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let entry = ModerationLogEntry {
            chat_title: Some("Rust & Friends"),
            chat_id: -100123,
            payload: &payload,
            verdict: &verdict,
            sent_at,
            handled_at: sent_at,
            deleted: true,
            banned: Some(false),
        };

        let log = format_moderation_log(&entry, chrono_tz::Asia::Tokyo);
        assert!(log.contains("Chat: Rust &amp; Friends"));
        assert!(log.contains("Category: scam"));
        assert!(log.contains("Matched patterns: crypto_scam (airdrop now)"));
        assert!(log.contains("Action: deleted, ban failed"));
        assert!(log.contains("Sent at: 2025-01-02 12:04:05"));
        assert!(log.contains("<pre>&lt;b&gt;claim&lt;/b&gt; airdrop now</pre>"));
    }
}
