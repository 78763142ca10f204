use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use teloxide::{error_handlers::ErrorHandler, prelude::*, RequestError};
use tokio::time::Instant;

use crate::{config::AppConfig, infrastructure::notifier::notify_admin_group};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NetworkIssueKind {
    Timeout,
    Connection,
    Other,
}

impl NetworkIssueKind {
    fn label(&self) -> &'static str {
        match self {
            NetworkIssueKind::Timeout => "request timeout",
            NetworkIssueKind::Connection => "connection failure",
            NetworkIssueKind::Other => "network error",
        }
    }
}

#[derive(Default)]
struct FailureWindow {
    first_error_at: Option<Instant>,
    consecutive_errors: u32,
    last_alert_at: Option<Instant>,
}

impl FailureWindow {
    /// Counts one failure at `now`. Returns the streak length when an admin
    /// alert is due.
    fn record(&mut self, now: Instant, window: Duration, threshold: u32, cooldown: Duration) -> Option<u32> {
        if self
            .first_error_at
            .map(|ts| now.duration_since(ts) > window)
            .unwrap_or(true)
        {
            self.first_error_at = Some(now);
            self.consecutive_errors = 0;
        }
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);

        if self.consecutive_errors < threshold {
            return None;
        }
        let cooling = self
            .last_alert_at
            .map(|ts| now.duration_since(ts) < cooldown)
            .unwrap_or(false);
        if cooling {
            return None;
        }
        let streak = self.consecutive_errors;
        self.last_alert_at = Some(now);
        self.first_error_at = None;
        self.consecutive_errors = 0;
        Some(streak)
    }
}

/// Error handler for the polling listener: logs every failure and alerts
/// the admin group when network errors pile up.
pub struct UpdateListenerMonitor {
    bot: Bot,
    config: Arc<AppConfig>,
    window: Mutex<FailureWindow>,
}

impl UpdateListenerMonitor {
    pub fn new(bot: Bot, config: Arc<AppConfig>) -> Arc<Self> {
        Arc::new(Self {
            bot,
            config,
            window: Mutex::new(FailureWindow::default()),
        })
    }

    async fn process_error(&self, error: RequestError) {
        let RequestError::Network(source) = &error else {
            tracing::error!(target: "telegram", error = %error, "update listener error");
            return;
        };

        let req_err = source.as_ref();
        let kind = if req_err.is_timeout() {
            NetworkIssueKind::Timeout
        } else if req_err.is_connect() {
            NetworkIssueKind::Connection
        } else {
            NetworkIssueKind::Other
        };

        let resilience = &self.config.resilience;
        let streak = self.window.lock().record(
            Instant::now(),
            resilience.network_error_window,
            resilience.network_error_threshold,
            resilience.alert_cooldown,
        );

        tracing::error!(
            target: "telegram",
            issue = kind.label(),
            error = %error,
            "Telegram polling network failure"
        );

        if let Some(streak) = streak {
            tracing::warn!(target: "telegram", streak, "repeated polling failures, alerting admins");
            let summary = format!(
                "⚠️ Update listener reported {streak} network failures within {}s (last: {}).\n{}",
                resilience.network_error_window.as_secs(),
                kind.label(),
                crate::infrastructure::notifier::escape_html(&error.to_string()),
            );
            notify_admin_group(&self.bot, self.config.as_ref(), &summary).await;
        }
    }
}

impl ErrorHandler<RequestError> for UpdateListenerMonitor {
    fn handle_error(self: Arc<Self>, error: RequestError) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            self.process_error(error).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);
    const COOLDOWN: Duration = Duration::from_secs(600);

    #[test]
    fn alerts_once_threshold_is_reached() {
        let mut window = FailureWindow::default();
        let start = Instant::now();
        assert_eq!(window.record(start, WINDOW, 3, COOLDOWN), None);
        assert_eq!(window.record(start + Duration::from_secs(1), WINDOW, 3, COOLDOWN), None);
        assert_eq!(window.record(start + Duration::from_secs(2), WINDOW, 3, COOLDOWN), Some(3));
    }

    #[test]
    fn streak_resets_after_window() {
        let mut window = FailureWindow::default();
        let start = Instant::now();
        window.record(start, WINDOW, 2, COOLDOWN);
        assert_eq!(window.record(start + Duration::from_secs(61), WINDOW, 2, COOLDOWN), None);
        assert_eq!(window.record(start + Duration::from_secs(62), WINDOW, 2, COOLDOWN), Some(2));
    }

    #[test]
    fn cooldown_suppresses_repeat_alerts() {
        let mut window = FailureWindow::default();
        let start = Instant::now();
        assert_eq!(window.record(start, WINDOW, 1, COOLDOWN), Some(1));
        assert_eq!(window.record(start + Duration::from_secs(5), WINDOW, 1, COOLDOWN), None);
        assert_eq!(window.record(start + Duration::from_secs(601), WINDOW, 1, COOLDOWN), Some(1));
    }
}
