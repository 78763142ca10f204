use std::convert::TryFrom;

use chrono::{DateTime, TimeDelta, Utc};
use teloxide::types::{Message, User};

use crate::{domain::MessagePayload, moderation::StatsSnapshot};

pub const TOP_VIOLATORS: usize = 5;

/// Collects text, caption and forward origin of a message. `None` when the
/// message has no sender.
pub fn build_payload(msg: &Message) -> Option<MessagePayload> {
    let from = msg.from.as_ref()?;
    let sender_id = user_to_i64(from);
    let handle = sender_handle(from.username.as_deref(), sender_id);

    let mut payload = MessagePayload::new(sender_id, handle);
    if let Some(text) = msg.text() {
        payload = payload.with_text(text);
    }
    if let Some(caption) = msg.caption() {
        payload = payload.with_caption(caption);
    }
    if let Some(origin) = msg.forward_from_user() {
        let name = Some(origin.first_name.clone()).filter(|n| !n.trim().is_empty());
        payload = payload.with_forwarded_sender(name, origin.username.clone());
    }
    Some(payload)
}

pub fn sender_handle(username: Option<&str>, user_id: i64) -> String {
    match username {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("user_{user_id}"),
    }
}

pub fn format_user_display(user: &User) -> String {
    if let Some(username) = &user.username {
        format!("@{}", username)
    } else {
        let mut parts = vec![user.first_name.as_str()];
        if let Some(last) = &user.last_name {
            parts.push(last.as_str());
        }
        let name = parts.join(" ").trim().to_string();
        if name.is_empty() {
            "Unknown".to_string()
        } else {
            name
        }
    }
}

pub fn user_to_i64(user: &User) -> i64 {
    i64::try_from(user.id.0).unwrap_or(i64::MAX)
}

pub fn format_uptime(uptime: TimeDelta) -> String {
    let total = uptime.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    if days > 0 {
        format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

pub fn format_stats(stats: &StatsSnapshot, now: DateTime<Utc>) -> String {
    let mut msg = format!(
        "📊 Moderation statistics\n\
         ⏱ Uptime: {}\n\
         🛡 Scams blocked: {}\n\
         🔞 NSFW blocked: {}\n\
         📢 Spam blocked: {}\n\
         👥 Users tracked: {}\n",
        format_uptime(now - stats.started_at),
        stats.scams,
        stats.nsfw,
        stats.spam,
        stats.tracked_users,
    );
    if !stats.top_violators.is_empty() {
        msg.push_str("\nTop violators:\n");
        for (user_id, count) in &stats.top_violators {
            msg.push_str(&format!("  • User {user_id}: {count} violations\n"));
        }
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_falls_back_to_id() {
        assert_eq!(sender_handle(Some("alice"), 1), "alice");
        assert_eq!(sender_handle(Some(""), 1), "user_1");
        assert_eq!(sender_handle(None, 42), "user_42");
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(TimeDelta::seconds(59)), "00:00:59");
        assert_eq!(format_uptime(TimeDelta::seconds(3_725)), "01:02:05");
        assert_eq!(format_uptime(TimeDelta::seconds(2 * 86_400 + 61)), "2d 00:01:01");
        assert_eq!(format_uptime(TimeDelta::seconds(-5)), "00:00:00");
    }

    #[test]
    fn stats_lists_top_violators() {
        let started_at = Utc::now();
        let stats = StatsSnapshot {
            started_at,
            scams: 4,
            nsfw: 1,
            spam: 2,
            tracked_users: 3,
            top_violators: vec![(77, 3), (12, 1)],
        };
        let text = format_stats(&stats, started_at + TimeDelta::seconds(90));
        assert!(text.contains("Uptime: 00:01:30"));
        assert!(text.contains("Scams blocked: 4"));
        assert!(text.contains("Spam blocked: 2"));
        assert!(text.contains("  • User 77: 3 violations\n  • User 12: 1 violations\n"));
    }

    #[test]
    fn stats_without_violators_has_no_section() {
        let stats = StatsSnapshot {
            started_at: Utc::now(),
            scams: 0,
            nsfw: 0,
            spam: 0,
            tracked_users: 0,
            top_violators: Vec::new(),
        };
        assert!(!format_stats(&stats, stats.started_at).contains("Top violators"));
    }
}
