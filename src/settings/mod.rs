mod store;

pub use store::{ModerationSettings, SettingsError, SettingsStore, WordListKind};
