/// Runs of this many identical characters or more collapse to one.
const REPEAT_COLLAPSE_MIN: usize = 3;

/// Canonical form used for word list matching.
///
/// Lower-cases, blanks out anything that is not a letter, digit or
/// whitespace, collapses runs of 3+ identical characters, then squeezes and
/// trims whitespace. Never applied before pattern matching.
pub fn normalize(text: &str) -> String {
    let cleaned: Vec<char> = text
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect();

    collapse_repeats(&cleaned)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_repeats(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut idx = 0;
    while idx < chars.len() {
        let current = chars[idx];
        let run = chars[idx..].iter().take_while(|ch| **ch == current).count();
        if run >= REPEAT_COLLAPSE_MIN {
            out.push(current);
        } else {
            out.extend(std::iter::repeat(current).take(run));
        }
        idx += run;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_three_or_more_repeats_only() {
        assert_eq!(normalize("fffreeeee moneeey!!!"), "fre money");
        assert_eq!(normalize("coooooool"), "col");
        assert_eq!(normalize("good boot"), "good boot");
    }

    #[test]
    fn strips_punctuation_and_whitespace() {
        assert_eq!(normalize("  Free-Crypto...NOW \t\n here "), "free crypto now here");
        assert_eq!(normalize("a.i.r.d.r.o.p"), "a i r d r o p");
    }

    #[test]
    fn empty_and_symbol_only_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!!???$$$"), "");
    }

    #[test]
    fn keeps_non_latin_letters() {
        assert_eq!(normalize("Привет, МИР!!"), "привет мир");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "fffreeeee moneeey!!!",
            "GET    your FREE airdrop now!!! claim token",
            "aa!a aaa  a",
            "x---x---x",
            "İstanbul 🚀🚀🚀 t.me/channel",
            "   ",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "input: {sample:?}");
        }
    }
}
