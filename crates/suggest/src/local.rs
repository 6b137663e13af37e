use prose_protocol::{IssueType, Suggestion, SuggestionSource};

/// Common misspellings and their corrections, keyed by lowercase form.
const MISSPELLINGS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("qick", "quick"),
    ("recieve", "receive"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("occured", "occurred"),
    ("untill", "until"),
    ("wich", "which"),
    ("accomodate", "accommodate"),
    ("beleive", "believe"),
    ("thier", "their"),
    ("alot", "a lot"),
    ("goverment", "government"),
];

/// A whitespace-delimited token and its character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    start: usize,
}

fn whitespace_tokens(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut current: Option<(usize, usize)> = None; // (byte_start, char_start)

    for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
        if ch.is_whitespace() {
            if let Some((byte_start, char_start)) = current.take() {
                tokens.push(Token {
                    text: &text[byte_start..byte_idx],
                    start: char_start,
                });
            }
        } else if current.is_none() {
            current = Some((byte_idx, char_idx));
        }
    }
    if let Some((byte_start, char_start)) = current {
        tokens.push(Token {
            text: &text[byte_start..],
            start: char_start,
        });
    }
    tokens
}

fn is_edge_punctuation(ch: char) -> bool {
    !ch.is_alphanumeric()
}

/// Fixed-table spelling checker. Always available; never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDictionary;

impl LocalDictionary {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn lookup(&self, word: &str) -> Option<&'static str> {
        let lowered = word.to_lowercase();
        MISSPELLINGS
            .iter()
            .find(|(wrong, _)| *wrong == lowered)
            .map(|(_, right)| *right)
    }

    /// One suggestion per misspelled token. The span covers the whole token, so punctuation
    /// glued to the word is carried into `suggested_text` unchanged.
    #[must_use]
    pub fn check(&self, text: &str) -> Vec<Suggestion> {
        whitespace_tokens(text)
            .into_iter()
            .filter_map(|token| self.check_token(token))
            .collect()
    }

    fn check_token(&self, token: Token<'_>) -> Option<Suggestion> {
        let leading = token.text.len() - token.text.trim_start_matches(is_edge_punctuation).len();
        let core = token.text.trim_matches(is_edge_punctuation);
        if core.is_empty() {
            return None;
        }
        let replacement = self.lookup(core)?;

        let prefix = &token.text[..leading];
        let suffix = &token.text[leading + core.len()..];
        let end = token.start + token.text.chars().count();

        Some(Suggestion {
            id: format!("local-{}-{end}", token.start),
            start: token.start,
            end,
            issue_type: IssueType::Spelling,
            original_text: token.text.to_string(),
            suggested_text: format!("{prefix}{replacement}{suffix}"),
            explanation: format!("\"{core}\" looks misspelled. Did you mean \"{replacement}\"?"),
            source: SuggestionSource::Local,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_has_thirteen_entries() {
        assert_eq!(MISSPELLINGS.len(), 13);
    }

    #[test]
    fn flags_misspellings_with_character_offsets() {
        let found = LocalDictionary::new().check("Teh qick brown fox.");
        let spans: Vec<_> = found
            .iter()
            .map(|s| (s.start, s.end, s.suggested_text.as_str()))
            .collect();
        assert_eq!(spans, vec![(0, 3, "the"), (4, 8, "quick")]);
        assert!(found.iter().all(|s| s.issue_type == IssueType::Spelling));
        assert!(found.iter().all(|s| s.source == SuggestionSource::Local));
    }

    #[test]
    fn keeps_surrounding_punctuation() {
        let found = LocalDictionary::new().check("I will (recieve), then \"seperate.\"");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].original_text, "(recieve),");
        assert_eq!(found[0].suggested_text, "(receive),");
        assert_eq!((found[0].start, found[0].end), (7, 17));
        assert_eq!(found[1].suggested_text, "\"separate.\"");
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let found = LocalDictionary::new().check("Café naïve thier");
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (11, 16));
    }

    #[test]
    fn ignores_clean_and_punctuation_only_tokens() {
        let found = LocalDictionary::new().check("All good here -- nothing ... to fix!");
        assert!(found.is_empty());
        assert!(LocalDictionary::new().check("").is_empty());
    }

    #[test]
    fn tokens_split_on_any_whitespace_run() {
        let tokens = whitespace_tokens("  a\tbc \n d ");
        assert_eq!(
            tokens,
            vec![
                Token { text: "a", start: 2 },
                Token { text: "bc", start: 4 },
                Token { text: "d", start: 9 },
            ]
        );
    }
}
