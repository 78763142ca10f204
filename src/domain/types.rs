use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    CryptoScam,
    MoneyScam,
    CryptoMention,
    InvestmentScam,
    ContactScam,
    Phishing,
    Scam,
    DmScam,
    Nsfw,
    NsfwPromo,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::CryptoScam => "crypto_scam",
            PatternCategory::MoneyScam => "money_scam",
            PatternCategory::CryptoMention => "crypto_mention",
            PatternCategory::InvestmentScam => "investment_scam",
            PatternCategory::ContactScam => "contact_scam",
            PatternCategory::Phishing => "phishing",
            PatternCategory::Scam => "scam",
            PatternCategory::DmScam => "dm_scam",
            PatternCategory::Nsfw => "nsfw",
            PatternCategory::NsfwPromo => "nsfw_promo",
        }
    }

    /// Categories that mark a message as a scam on their own.
    pub fn is_scam(&self) -> bool {
        matches!(
            self,
            PatternCategory::CryptoScam
                | PatternCategory::MoneyScam
                | PatternCategory::InvestmentScam
                | PatternCategory::Scam
                | PatternCategory::Phishing
                | PatternCategory::ContactScam
                | PatternCategory::DmScam
        )
    }

    pub fn is_nsfw(&self) -> bool {
        matches!(self, PatternCategory::Nsfw | PatternCategory::NsfwPromo)
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub category: PatternCategory,
    pub matched: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictCategory {
    None,
    Scam,
    Nsfw,
    Spam,
}

impl VerdictCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictCategory::None => "none",
            VerdictCategory::Scam => "scam",
            VerdictCategory::Nsfw => "nsfw",
            VerdictCategory::Spam => "spam",
        }
    }
}

impl fmt::Display for VerdictCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationConfig {
    pub ban_threshold: u32,
    pub auto_ban_enabled: bool,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            ban_threshold: 3,
            auto_ban_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub should_remove: bool,
    pub category: VerdictCategory,
    pub matched_words: Vec<String>,
    pub matched_patterns: Vec<PatternMatch>,
    pub spam_score: u8,
    pub violation_count_after: u32,
    pub should_ban: bool,
}

impl Verdict {
    /// Verdict for a message with nothing to inspect.
    pub fn pass(violation_count: u32) -> Self {
        Self {
            should_remove: false,
            category: VerdictCategory::None,
            matched_words: Vec::new(),
            matched_patterns: Vec::new(),
            spam_score: 0,
            violation_count_after: violation_count,
            should_ban: false,
        }
    }
}
