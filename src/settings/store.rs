use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{domain::ModerationConfig, moderation::normalize};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("ban_threshold must be a positive integer")]
    InvalidThreshold,
    #[error("word must not be empty")]
    EmptyWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordListKind {
    Banned,
    Nsfw,
}

impl WordListKind {
    pub fn label(&self) -> &'static str {
        match self {
            WordListKind::Banned => "banned",
            WordListKind::Nsfw => "nsfw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationSettings {
    #[serde(default)]
    pub banned_words: Vec<String>,
    #[serde(default)]
    pub nsfw_words: Vec<String>,
    #[serde(default)]
    pub admin_users: Vec<i64>,
    #[serde(default = "default_ban_threshold")]
    pub ban_threshold: u32,
    #[serde(default = "default_auto_ban")]
    pub auto_ban: bool,
}

fn default_ban_threshold() -> u32 {
    3
}

fn default_auto_ban() -> bool {
    true
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            banned_words: Vec::new(),
            nsfw_words: Vec::new(),
            admin_users: Vec::new(),
            ban_threshold: default_ban_threshold(),
            auto_ban: default_auto_ban(),
        }
    }
}

impl ModerationSettings {
    pub fn moderation_config(&self) -> ModerationConfig {
        ModerationConfig {
            ban_threshold: self.ban_threshold,
            auto_ban_enabled: self.auto_ban,
        }
    }

    pub fn words(&self, kind: WordListKind) -> &[String] {
        match kind {
            WordListKind::Banned => &self.banned_words,
            WordListKind::Nsfw => &self.nsfw_words,
        }
    }

    fn words_mut(&mut self, kind: WordListKind) -> &mut Vec<String> {
        match kind {
            WordListKind::Banned => &mut self.banned_words,
            WordListKind::Nsfw => &mut self.nsfw_words,
        }
    }

    /// Brings list entries into the form the word matcher compares against,
    /// dropping blanks and duplicates while keeping first-seen order.
    fn normalize_words(&mut self) {
        for list in [&mut self.banned_words, &mut self.nsfw_words] {
            let mut seen = Vec::with_capacity(list.len());
            for word in list.drain(..) {
                let word = normalize(&word);
                if !word.is_empty() && !seen.contains(&word) {
                    seen.push(word);
                }
            }
            *list = seen;
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.ban_threshold == 0 {
            return Err(SettingsError::InvalidThreshold);
        }
        Ok(())
    }
}

/// JSON-file-backed moderation settings.
///
/// Readers get an immutable `Arc` snapshot; every change builds a new
/// snapshot, persists it and swaps the pointer, so a reader never sees a
/// half-edited list.
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<Arc<ModerationSettings>>,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Loads the file, writing defaults first when it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = if path.exists() {
            read_settings(&path)?
        } else {
            let defaults = ModerationSettings::default();
            write_settings(&path, &defaults)?;
            tracing::info!(
                target: "settings",
                path = %path.display(),
                "created default moderation settings"
            );
            defaults
        };

        Ok(Self {
            path,
            current: RwLock::new(Arc::new(settings)),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Arc<ModerationSettings> {
        self.current.read().clone()
    }

    /// Re-reads the file. On error the previous snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<ModerationSettings>, SettingsError> {
        let _guard = self.write_lock.lock();
        let settings = Arc::new(read_settings(&self.path)?);
        *self.current.write() = settings.clone();
        tracing::info!(
            target: "settings",
            banned = settings.banned_words.len(),
            nsfw = settings.nsfw_words.len(),
            "moderation settings reloaded"
        );
        Ok(settings)
    }

    /// Adds a word to a list. Returns `false` if it was already present.
    pub fn add_word(&self, kind: WordListKind, word: &str) -> Result<bool, SettingsError> {
        let word = clean_word(word)?;
        self.update(|settings| {
            let list = settings.words_mut(kind);
            if list.contains(&word) {
                false
            } else {
                list.push(word.clone());
                true
            }
        })
    }

    /// Removes a word from a list. Returns `false` if it was not present.
    pub fn remove_word(&self, kind: WordListKind, word: &str) -> Result<bool, SettingsError> {
        let word = clean_word(word)?;
        self.update(|settings| {
            let list = settings.words_mut(kind);
            let before = list.len();
            list.retain(|existing| existing != &word);
            list.len() != before
        })
    }

    fn update<F>(&self, edit: F) -> Result<bool, SettingsError>
    where
        F: FnOnce(&mut ModerationSettings) -> bool,
    {
        let _guard = self.write_lock.lock();
        let mut next = ModerationSettings::clone(&self.current.read());
        if !edit(&mut next) {
            return Ok(false);
        }
        write_settings(&self.path, &next)?;
        *self.current.write() = Arc::new(next);
        Ok(true)
    }
}

fn clean_word(word: &str) -> Result<String, SettingsError> {
    let word = normalize(word);
    if word.is_empty() {
        return Err(SettingsError::EmptyWord);
    }
    Ok(word)
}

fn read_settings(path: &Path) -> Result<ModerationSettings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut settings: ModerationSettings =
        serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    settings.validate()?;
    settings.normalize_words();
    Ok(settings)
}

// Written to a sibling temp file and renamed so a crash mid-write cannot
// leave a truncated file behind.
fn write_settings(path: &Path, settings: &ModerationSettings) -> Result<(), SettingsError> {
    let io_err = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    let body = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}
