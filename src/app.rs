use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use teloxide::prelude::*;

use crate::{
    config::AppConfig,
    infrastructure::{directories::ResolvedPaths, notifier::notify_admin_group, shutdown::Shutdown},
    moderation::{patterns, ModerationState, Moderator},
    settings::SettingsStore,
    telegram::TelegramService,
};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ShamsApp {
    telegram: TelegramService,
    shutdown: Shutdown,
    config: Arc<AppConfig>,
    bot: Bot,
}

impl ShamsApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let rules = patterns::catalog().len();
        tracing::info!(target: "lifecycle", rules, "pattern catalog compiled");

        let settings = SettingsStore::open(&paths.settings_path).with_context(|| {
            format!(
                "failed to load moderation settings from {}",
                paths.settings_path.display()
            )
        })?;
        let snapshot = settings.snapshot();
        tracing::info!(
            target: "lifecycle",
            path = %paths.settings_path.display(),
            banned = snapshot.banned_words.len(),
            nsfw = snapshot.nsfw_words.len(),
            ban_threshold = snapshot.ban_threshold,
            auto_ban = snapshot.auto_ban,
            "moderation settings loaded"
        );

        let config = Arc::new(config);
        let moderator = Moderator::new(Arc::new(ModerationState::new()));
        let bot = Bot::new(&config.telegram_bot_token);
        let telegram = TelegramService::new(
            bot.clone(),
            config.clone(),
            Arc::new(settings),
            moderator,
        );

        Ok(Self {
            telegram,
            shutdown,
            config,
            bot,
        })
    }

    pub async fn run(self) -> Result<()> {
        let ShamsApp {
            telegram,
            shutdown,
            config,
            bot,
        } = self;

        tracing::info!(target: "lifecycle", "Shams started, listening for messages");
        notify_admin_group(&bot, config.as_ref(), "Moderation bot started.").await;

        let mut shutdown_listener = shutdown.subscribe();
        let mut telegram_future = Box::pin(telegram.run(shutdown.subscribe()));
        let mut telegram_completed = false;

        tokio::select! {
            _ = shutdown_listener.notified() => {
                tracing::info!(target: "lifecycle", "shutdown signal received");
            }
            res = &mut telegram_future => {
                telegram_completed = true;
                if let Err(err) = res {
                    tracing::error!(target: "lifecycle", ?err, "Telegram dispatcher failed");
                } else {
                    tracing::info!(target: "lifecycle", "Telegram dispatcher stopped");
                }
            }
        }

        shutdown.trigger();

        if !telegram_completed {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut telegram_future).await {
                Ok(Err(err)) => {
                    tracing::error!(target: "lifecycle", ?err, "Telegram dispatcher failed");
                }
                Ok(Ok(())) => {}
                Err(_) => {
                    tracing::warn!(
                        target: "lifecycle",
                        "Telegram dispatcher did not stop within {:?}; forcing exit",
                        SHUTDOWN_TIMEOUT
                    );
                }
            }
        }

        notify_admin_group(&bot, config.as_ref(), "Moderation bot stopped.").await;
        tracing::info!(target: "lifecycle", "shutdown complete");
        Ok(())
    }
}
