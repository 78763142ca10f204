use teloxide::{prelude::*, types::ParseMode};

use crate::config::AppConfig;

/// Sends an HTML message to the configured admin group, logging a warning
/// on failure. Returns whether the message went out.
pub async fn notify_admin_group(bot: &Bot, config: &AppConfig, text: &str) -> bool {
    let Some(admin_group_id) = config.admin_group_id else {
        return false;
    };
    match bot
        .send_message(ChatId(admin_group_id), text)
        .parse_mode(ParseMode::Html)
        .await
    {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(
                target: "telegram",
                error = %err,
                admin_group_id,
                "failed to send admin notification"
            );
            false
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"free" & 'fast'</b>"#),
            "&lt;b&gt;&quot;free&quot; &amp; &#39;fast&#39;&lt;/b&gt;"
        );
    }
}
