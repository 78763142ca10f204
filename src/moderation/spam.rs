use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_SPAM_SCORE: u8 = 10;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://\S+|www\.\S+|t\.me/\S+").expect("valid spam url regex")
});

fn is_emoji(ch: char) -> bool {
    let code = ch as u32;
    (0x1F600..=0x1F64F).contains(&code) // emoticons
        || (0x1F300..=0x1F5FF).contains(&code) // symbols & pictographs
        || (0x1F680..=0x1F6FF).contains(&code) // transport & map
        || (0x1F900..=0x1F9FF).contains(&code) // supplemental symbols
        || (0x1FA70..=0x1FAFF).contains(&code)
        || (0x1F1E6..=0x1F1FF).contains(&code) // regional indicators
        || (0x2600..=0x26FF).contains(&code)
        || (0x2700..=0x27BF).contains(&code)
}

/// Heuristic bulk-spam score in `0..=10`, computed on raw text.
pub fn score_spam(raw_text: &str) -> u8 {
    let mut score: u32 = 0;

    let emoji_count = raw_text.chars().filter(|ch| is_emoji(*ch)).count();
    if emoji_count > 5 {
        score += (emoji_count / 2).min(3) as u32;
    }

    if raw_text.chars().count() > 20 && is_all_caps(raw_text) {
        score += 2;
    }

    let exclamations = raw_text.matches('!').count();
    let questions = raw_text.matches('?').count();
    if exclamations > 3 || questions > 3 {
        score += 1;
    }

    let words: Vec<&str> = raw_text.split_whitespace().collect();
    if words.len() > 5 {
        let unique: HashSet<&str> = words.iter().copied().collect();
        if unique.len() < words.len() {
            score += 2;
        }
    }

    if URL_REGEX.is_match(raw_text) {
        score += 2;
    }

    score.min(MAX_SPAM_SCORE as u32) as u8
}

// At least one cased letter and no lowercase ones.
fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_scores_zero() {
        assert_eq!(score_spam("hello team, meeting at 5pm"), 0);
        assert_eq!(score_spam(""), 0);
    }

    #[test]
    fn emoji_contribution_is_capped() {
        assert_eq!(score_spam("🚀🚀🚀🚀🚀"), 0);
        assert_eq!(score_spam("🚀🚀🚀🚀🚀🚀"), 3);
        assert_eq!(score_spam("🔥 💰 🚀 💎 🌙 🎉 🤑 ✅ ⭐ 🎁"), 3);
    }

    #[test]
    fn caps_needs_length_over_twenty() {
        assert_eq!(score_spam("BUY THIS TODAY"), 0);
        assert_eq!(score_spam("THIS IS A VERY LOUD MESSAGE"), 2);
        assert_eq!(score_spam("12345678901234567890123"), 0);
    }

    #[test]
    fn punctuation_bursts() {
        assert_eq!(score_spam("wow!!!!"), 1);
        assert_eq!(score_spam("what????"), 1);
        assert_eq!(score_spam("ok!!! why???"), 0);
    }

    #[test]
    fn repeated_words_in_longer_text() {
        assert_eq!(score_spam("join join join join join join"), 2);
        assert_eq!(score_spam("one two three four five six"), 0);
        assert_eq!(score_spam("join join now"), 0);
    }

    #[test]
    fn url_like_tokens() {
        assert_eq!(score_spam("see https://example.com"), 2);
        assert_eq!(score_spam("see WWW.example.com"), 2);
        assert_eq!(score_spam("join T.ME/channel"), 2);
        assert_eq!(score_spam("see example dot com"), 0);
    }

    #[test]
    fn extreme_input_is_clamped() {
        let mut text = "!".repeat(1000);
        text.push_str(&" 😀".repeat(50));
        text.push_str(" FREE MONEY FREE MONEY CLICK NOW");
        for _ in 0..10 {
            text.push_str(" HTTPS://SPAM.EXAMPLE/X");
        }
        assert_eq!(score_spam(&text), MAX_SPAM_SCORE);
    }
}
