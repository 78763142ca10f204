/// Every non-empty list entry found as a substring of the normalized text,
/// in list order.
pub fn match_words(normalized_text: &str, word_list: &[String]) -> Vec<String> {
    word_list
        .iter()
        .filter(|word| !word.trim().is_empty() && normalized_text.contains(word.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn returns_matches_in_list_order() {
        let words = list(&["presale", "airdrop", "giveaway", "free money"]);
        assert_eq!(
            match_words("free money airdrop and presale", &words),
            list(&["presale", "airdrop", "free money"])
        );
    }

    #[test]
    fn substring_semantics() {
        let words = list(&["scam"]);
        assert_eq!(match_words("scammers everywhere", &words), list(&["scam"]));
    }

    #[test]
    fn blank_entries_never_match() {
        let words = list(&["", "  "]);
        assert!(match_words("anything at all", &words).is_empty());
    }
}
