use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use teloxide::{
    dispatching::Dispatcher, prelude::*, types::Message, update_listeners,
    utils::command::BotCommands,
};

use crate::{
    config::AppConfig,
    infrastructure::shutdown::ShutdownListener,
    moderation::{normalize, Moderator},
    settings::{SettingsError, SettingsStore, WordListKind},
};

use super::{
    enforcement,
    monitor::UpdateListenerMonitor,
    types::{AppState, BotResult, Command, ListEdit},
    utils::{build_payload, format_stats, format_user_display, user_to_i64, TOP_VIOLATORS},
};

const INTRO: &str = "🤖 Shams Moderation Bot\n\n\
    I automatically detect and remove:\n\
    • Scam messages (crypto, airdrops, fake investments)\n\
    • NSFW content\n\
    • Bulk spam\n\n\
    Repeat offenders are banned automatically.\n\
    Send /help for the command list.";

pub struct TelegramService {
    bot: Bot,
    state: Arc<AppState>,
}

impl TelegramService {
    pub fn new(
        bot: Bot,
        config: Arc<AppConfig>,
        settings: Arc<SettingsStore>,
        moderator: Moderator,
    ) -> Self {
        let state = Arc::new(AppState {
            config,
            settings,
            moderator,
        });
        Self { bot, state }
    }

    pub async fn run(&self, mut shutdown: ShutdownListener) -> Result<()> {
        self.bot.set_my_commands(Command::bot_commands()).await?;
        let me = self.bot.get_me().await?;
        if let Some(expected_username) = &self.state.config.bot_username {
            if me.username.as_deref() != Some(expected_username.as_str()) {
                tracing::warn!(
                    target: "telegram",
                    expected = expected_username.as_str(),
                    actual = ?me.username,
                    "BOT_USERNAME does not match the bot account"
                );
            }
        }
        tracing::info!(
            target: "telegram",
            bot_id = me.id.0,
            username = ?me.username,
            "connected to Telegram"
        );

        let handler = Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(Self::on_command),
            )
            .branch(dptree::endpoint(Self::on_plain_message));

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![self.state.clone()])
            .default_handler(|update| async move {
                tracing::debug!(target: "telegram", ?update, "unhandled update");
            })
            .build();

        let listener = update_listeners::polling_default(self.bot.clone()).await;
        let monitor = UpdateListenerMonitor::new(self.bot.clone(), self.state.config.clone());

        let shutdown_token = dispatcher.shutdown_token();
        let mut dispatcher_future = Box::pin(dispatcher.dispatch_with_listener(listener, monitor));
        let mut dispatcher_finished = false;

        tokio::select! {
            _ = shutdown.notified() => {
                tracing::info!(target: "telegram", "dispatcher shutdown requested");
                if let Ok(wait) = shutdown_token.shutdown() {
                    wait.await;
                }
            }
            _ = &mut dispatcher_future => {
                dispatcher_finished = true;
                tracing::info!(target: "telegram", "dispatcher stopped");
            }
        }

        if !dispatcher_finished {
            dispatcher_future.await;
        }

        Ok(())
    }

    async fn on_plain_message(bot: Bot, msg: Message, state: Arc<AppState>) -> BotResult<()> {
        Self::moderate(&bot, &msg, &state).await?;
        Ok(())
    }

    /// Evaluates a group message and enforces the verdict. Returns whether
    /// the message was flagged for removal.
    async fn moderate(bot: &Bot, msg: &Message, state: &AppState) -> BotResult<bool> {
        if msg.chat.is_private() {
            return Ok(false);
        }
        let Some(sender) = msg.from.as_ref().map(|user| user.id) else {
            return Ok(false);
        };
        let Some(payload) = build_payload(msg) else {
            return Ok(false);
        };

        let settings = state.settings.snapshot();
        let verdict = state.moderator.evaluate(
            &payload,
            &settings.banned_words,
            &settings.nsfw_words,
            &settings.moderation_config(),
        );
        if !verdict.should_remove {
            return Ok(false);
        }

        let outcome = enforcement::enforce(
            bot,
            state.config.as_ref(),
            msg,
            sender,
            &payload,
            &verdict,
        )
        .await;
        tracing::debug!(
            target: "enforcement",
            deleted = outcome.deleted.is_ok(),
            banned = ?outcome.banned.as_ref().map(Result::is_ok),
            "enforcement finished"
        );
        Ok(true)
    }

    async fn on_command(
        bot: Bot,
        msg: Message,
        cmd: Command,
        state: Arc<AppState>,
    ) -> BotResult<()> {
        // Commands from non-admins carry user text like any other message.
        let sender_is_admin = msg
            .from
            .as_ref()
            .map(|user| state.is_admin_user(user_to_i64(user)))
            .unwrap_or(false);
        if !sender_is_admin && Self::moderate(&bot, &msg, &state).await? {
            return Ok(());
        }

        match cmd {
            Command::Start | Command::Hello => {
                bot.send_message(msg.chat.id, INTRO).await?;
            }
            Command::Help => {
                bot.send_message(msg.chat.id, Command::descriptions().to_string())
                    .await?;
            }
            Command::Whoami => {
                let reply = match msg.from.as_ref() {
                    Some(user) => format!(
                        "👤 Your info:\nID: {}\nUsername: @{}",
                        user_to_i64(user),
                        user.username.as_deref().unwrap_or("none")
                    ),
                    None => "👤 Your info:\nID: 0\nUsername: @unknown".to_string(),
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
            Command::Stats => {
                if Self::require_admin(&bot, &msg, &state).await? {
                    let stats = state.moderator.state().stats(TOP_VIOLATORS);
                    bot.send_message(msg.chat.id, format_stats(&stats, Utc::now()))
                        .await?;
                }
            }
            Command::Ban(word) => {
                Self::edit_word_list(&bot, &msg, &state, WordListKind::Banned, ListEdit::Add, &word)
                    .await?;
            }
            Command::Unban(word) => {
                Self::edit_word_list(
                    &bot,
                    &msg,
                    &state,
                    WordListKind::Banned,
                    ListEdit::Remove,
                    &word,
                )
                .await?;
            }
            Command::Nsfw(word) => {
                Self::edit_word_list(&bot, &msg, &state, WordListKind::Nsfw, ListEdit::Add, &word)
                    .await?;
            }
            Command::Unnsfw(word) => {
                Self::edit_word_list(&bot, &msg, &state, WordListKind::Nsfw, ListEdit::Remove, &word)
                    .await?;
            }
            Command::Reload => {
                if Self::require_admin(&bot, &msg, &state).await? {
                    let reply = match state.settings.reload() {
                        Ok(settings) => format!(
                            "✅ Settings reloaded: {} banned words, {} NSFW words, ban threshold {}",
                            settings.banned_words.len(),
                            settings.nsfw_words.len(),
                            settings.ban_threshold
                        ),
                        Err(err) => {
                            tracing::error!(target: "settings", error = %err, "reload failed");
                            format!("❌ Reload failed, keeping previous settings: {err}")
                        }
                    };
                    bot.send_message(msg.chat.id, reply).await?;
                }
            }
        }
        Ok(())
    }

    /// Replies with a refusal and returns `false` for non-admins.
    async fn require_admin(bot: &Bot, msg: &Message, state: &AppState) -> BotResult<bool> {
        let is_admin = msg
            .from
            .as_ref()
            .map(|user| state.is_admin_user(user_to_i64(user)))
            .unwrap_or(false);
        if !is_admin {
            bot.send_message(msg.chat.id, "❌ Admin only command").await?;
        }
        Ok(is_admin)
    }

    async fn edit_word_list(
        bot: &Bot,
        msg: &Message,
        state: &AppState,
        kind: WordListKind,
        edit: ListEdit,
        word: &str,
    ) -> BotResult<()> {
        if !Self::require_admin(bot, msg, state).await? {
            return Ok(());
        }

        let result = match edit {
            ListEdit::Add => state.settings.add_word(kind, word),
            ListEdit::Remove => state.settings.remove_word(kind, word),
        };
        let word = normalize(word);
        let reply = match (edit, result) {
            (ListEdit::Add, Ok(true)) => format!("✅ Added to {} list: {word}", kind.label()),
            (ListEdit::Add, Ok(false)) => format!("⚠️ Already in {} list: {word}", kind.label()),
            (ListEdit::Remove, Ok(true)) => {
                format!("✅ Removed from {} list: {word}", kind.label())
            }
            (ListEdit::Remove, Ok(false)) => {
                format!("⚠️ Not in {} list: {word}", kind.label())
            }
            (_, Err(SettingsError::EmptyWord)) => {
                let usage = match (kind, edit) {
                    (WordListKind::Banned, ListEdit::Add) => "/ban",
                    (WordListKind::Banned, ListEdit::Remove) => "/unban",
                    (WordListKind::Nsfw, ListEdit::Add) => "/nsfw",
                    (WordListKind::Nsfw, ListEdit::Remove) => "/unnsfw",
                };
                format!("Usage: {usage} <word>")
            }
            (_, Err(err)) => {
                tracing::error!(
                    target: "settings",
                    error = %err,
                    list = kind.label(),
                    "failed to update word list"
                );
                "❌ Failed to update the word list".to_string()
            }
        };

        if let Some(admin) = msg.from.as_ref() {
            tracing::info!(
                target: "settings",
                admin = %format_user_display(admin),
                list = kind.label(),
                ?edit,
                word = %word,
                "word list command"
            );
        }
        bot.send_message(msg.chat.id, reply).await?;
        Ok(())
    }
}
