use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{PatternCategory, PatternMatch};

pub struct PatternRule {
    pub category: PatternCategory,
    pub regex: Regex,
}

const CATALOG_SOURCE: &[(PatternCategory, &str)] = &[
    (
        PatternCategory::CryptoScam,
        r"\b(?:airdrop|presale|claim|token)s?\b.{0,30}?\b(?:now|free|link)\b|\b(?:double|triple)\b.{0,20}?\b(?:your|btc|eth|usdt)\b",
    ),
    (PatternCategory::MoneyScam, r"\b(?:earn|make|win)\s+\$?\s?\d[\d,]*"),
    (
        PatternCategory::CryptoMention,
        r"\b\d+(?:[.,]\d+)?\s*(?:btc|eth|usdt|usdc|bnb|sol|xrp|doge|ton|bitcoins?|ethereum|tether|solana|dogecoin)\b",
    ),
    (PatternCategory::InvestmentScam, r"\binvest\w*\s+(?:with|now|today)\b"),
    (PatternCategory::ContactScam, r"\bcontact\s+(?:me|us|admin)\s+(?:for|to)\b"),
    (PatternCategory::Phishing, r"\bclick\s+(?:here|link|below)\b"),
    (PatternCategory::Scam, r"\bguaranteed\s+(?:profit|return|income)s?\b"),
    (PatternCategory::DmScam, r"\b(?:dm|pm)\s+(?:me|for)\b"),
    (
        PatternCategory::Nsfw,
        r"\b(?:18|21)\+\s*(?:only|content)\b|\b(?:nude|naked|sex)\s*(?:pics|photos|videos)\b|\b(?:hot|sexy)\s+(?:girls|boys|pics)\b",
    ),
    (
        PatternCategory::NsfwPromo,
        r"\b(?:onlyfans|fansly|patreon)\b.{0,30}?\b(?:link|free)\b",
    ),
];

static CATALOG: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    CATALOG_SOURCE
        .iter()
        .map(|(category, source)| PatternRule {
            category: *category,
            regex: Regex::new(&format!("(?is){source}")).expect("valid moderation pattern"),
        })
        .collect()
});

/// Compiles the rule catalog. Called once during startup so a broken rule
/// aborts the process before any message is evaluated.
pub fn catalog() -> &'static [PatternRule] {
    CATALOG.as_slice()
}

/// Returns one entry per matching rule, in catalog order, carrying the
/// first matched substring.
pub fn match_patterns(raw_text: &str) -> Vec<PatternMatch> {
    catalog()
        .iter()
        .filter_map(|rule| {
            rule.regex.find(raw_text).map(|m| PatternMatch {
                category: rule.category,
                matched: m.as_str().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(text: &str) -> Vec<PatternCategory> {
        match_patterns(text).into_iter().map(|m| m.category).collect()
    }

    #[test]
    fn catalog_compiles_in_declared_order() {
        let rules = catalog();
        assert_eq!(rules.len(), 10);
        assert_eq!(rules[0].category, PatternCategory::CryptoScam);
        assert_eq!(rules[9].category, PatternCategory::NsfwPromo);
    }

    #[test]
    fn airdrop_message_is_crypto_scam() {
        let matches = match_patterns("Get your FREE airdrop now!!! claim token");
        assert_eq!(matches[0].category, PatternCategory::CryptoScam);
        assert_eq!(matches[0].matched, "airdrop now");
    }

    #[test]
    fn one_entry_per_rule_even_with_repeats() {
        let matches = match_patterns("click here, then click below, then click link");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category, PatternCategory::Phishing);
        assert_eq!(matches[0].matched, "click here");
    }

    #[test]
    fn results_follow_catalog_order() {
        let found = categories("DM me to earn $500 daily, guaranteed profit, 2 BTC bonus");
        assert_eq!(
            found,
            vec![
                PatternCategory::MoneyScam,
                PatternCategory::CryptoMention,
                PatternCategory::Scam,
                PatternCategory::DmScam,
            ]
        );
    }

    #[test]
    fn individual_rules() {
        assert_eq!(categories("We DOUBLE your BTC overnight"), vec![PatternCategory::CryptoScam]);
        assert_eq!(categories("invest with us"), vec![PatternCategory::InvestmentScam]);
        assert_eq!(categories("contact admin for details"), vec![PatternCategory::ContactScam]);
        assert_eq!(categories("18+ only channel"), vec![PatternCategory::Nsfw]);
        assert_eq!(categories("sexy girls nearby"), vec![PatternCategory::Nsfw]);
        assert_eq!(categories("my OnlyFans link in bio"), vec![PatternCategory::NsfwPromo]);
        assert_eq!(categories("sent 0.5 eth yesterday"), vec![PatternCategory::CryptoMention]);
    }

    #[test]
    fn ordinary_chat_matches_nothing() {
        assert!(match_patterns("hello team, meeting at 5pm").is_empty());
        assert!(match_patterns("the admin tokenizer is now in main").is_empty());
        assert!(match_patterns("please pm the slides").is_empty());
    }
}
