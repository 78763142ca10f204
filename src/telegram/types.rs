use std::sync::Arc;

use teloxide::utils::command::BotCommands;

use crate::{config::AppConfig, moderation::Moderator, settings::SettingsStore};

pub type BotResult<T> = Result<T, teloxide::RequestError>;

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub settings: Arc<SettingsStore>,
    pub moderator: Moderator,
}

impl AppState {
    /// Admins come from `ADMIN_USER_IDS` and from the settings file.
    pub fn is_admin_user(&self, user_id: i64) -> bool {
        self.config.admin_user_ids.contains(&user_id)
            || self.settings.snapshot().admin_users.contains(&user_id)
    }
}

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "what this bot does")]
    Start,
    #[command(description = "what this bot does")]
    Hello,
    #[command(description = "show this help")]
    Help,
    #[command(description = "show your user id")]
    Whoami,
    #[command(description = "moderation statistics (admin only)")]
    Stats,
    #[command(description = "ban a word (admin only)")]
    Ban(String),
    #[command(description = "unban a word (admin only)")]
    Unban(String),
    #[command(description = "add an NSFW word (admin only)")]
    Nsfw(String),
    #[command(description = "remove an NSFW word (admin only)")]
    Unnsfw(String),
    #[command(description = "reload the settings file (admin only)")]
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEdit {
    Add,
    Remove,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_commands_take_the_rest_of_the_line() {
        assert_eq!(
            Command::parse("/ban free money", "shams_bot").unwrap(),
            Command::Ban("free money".to_string())
        );
        assert_eq!(
            Command::parse("/unnsfw@shams_bot xxx", "shams_bot").unwrap(),
            Command::Unnsfw("xxx".to_string())
        );
        assert_eq!(Command::parse("/stats", "shams_bot").unwrap(), Command::Stats);
    }
}
