use serde::Serialize;

/// Counts derived from a text snapshot. Recomputed on every call, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextMetrics {
    pub sentence_count: usize,
    pub word_count: usize,
    pub syllable_count: usize,
    pub char_count: usize,
    pub whitespace_count: usize,
}

impl TextMetrics {
    #[must_use]
    pub fn compute(text: &str) -> Self {
        let mut char_count = 0usize;
        let mut whitespace_count = 0usize;
        for ch in text.chars() {
            char_count += 1;
            if ch.is_whitespace() {
                whitespace_count += 1;
            }
        }

        let mut word_count = 0usize;
        let mut syllable_count = 0usize;
        for word in text.split_whitespace() {
            word_count += 1;
            syllable_count += count_syllables(word);
        }

        Self {
            sentence_count: count_sentences(text),
            word_count,
            syllable_count,
            char_count,
            whitespace_count,
        }
    }

    #[must_use]
    pub const fn non_whitespace_chars(&self) -> usize {
        self.char_count.saturating_sub(self.whitespace_count)
    }
}

pub(crate) const fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Segments between runs of `.`, `!` and `?` that contain something besides whitespace.
#[must_use]
pub fn count_sentences(text: &str) -> usize {
    text.split(is_sentence_terminator)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

const fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Vowel-group heuristic. Every non-empty token counts as at least one syllable, even when it
/// holds no ASCII letters, so a text never has fewer syllables than words.
#[must_use]
pub fn count_syllables(word: &str) -> usize {
    if word.is_empty() {
        return 0;
    }

    let cleaned: Vec<char> = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut count = 0usize;
    let mut prev_vowel = false;
    for &ch in &cleaned {
        let vowel = is_vowel(ch);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    // Silent trailing e.
    if cleaned.last() == Some(&'e') && count > 1 {
        count -= 1;
    }

    count.max(1)
}
