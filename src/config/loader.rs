use std::{env, str::FromStr, time::Duration};

use super::env::{AppConfig, ConfigError, DirectoryConfig, LoggingConfig, ResilienceConfig};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let telegram_bot_token = non_empty("TELEGRAM_BOT_TOKEN")
            .or_else(|| non_empty("TELEGRAM_BOT_API"))
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let bot_username = non_empty("BOT_USERNAME");
        let admin_user_ids = env::var("ADMIN_USER_IDS")
            .ok()
            .map(|value| parse_id_list("ADMIN_USER_IDS", &value))
            .transpose()?
            .unwrap_or_default();
        let admin_group_id = parse_var::<i64>("ADMIN_GROUP_ID")?
            .filter(|id| *id != 0)
            .map(|id| if id > 0 { -id } else { id });

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            settings_filename: env::var("SETTINGS_FILENAME")
                .unwrap_or_else(|_| "moderation.json".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let timezone = env::var("BOT_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());

        let resilience = ResilienceConfig {
            network_error_window: Duration::from_secs(
                parse_var("NETWORK_ERROR_WINDOW_SECS")?.unwrap_or(60),
            ),
            network_error_threshold: parse_var("NETWORK_ERROR_THRESHOLD")?.unwrap_or(5),
            alert_cooldown: Duration::from_secs(
                parse_var("NETWORK_ALERT_COOLDOWN_SECS")?.unwrap_or(600),
            ),
        };

        Ok(Self {
            telegram_bot_token,
            bot_username,
            admin_user_ids,
            admin_group_id,
            directories,
            logging,
            timezone,
            resilience,
        })
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match non_empty(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn parse_id_list(key: &'static str, value: &str) -> Result<Vec<i64>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>().map_err(|_| ConfigError::Invalid {
                key,
                value: part.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_skips_blanks() {
        assert_eq!(
            parse_id_list("ADMIN_USER_IDS", " 12, ,-34,56 ").unwrap(),
            vec![12, -34, 56]
        );
    }

    #[test]
    fn id_list_rejects_garbage() {
        let err = parse_id_list("ADMIN_USER_IDS", "12,abc").unwrap_err();
        assert_eq!(err.to_string(), "invalid value for ADMIN_USER_IDS: abc");
    }
}
