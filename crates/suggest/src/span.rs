//! Character-offset helpers. Suggestion offsets count `char`s; slicing needs bytes.

use std::ops::Range;

#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte range for the character span `start..end`, or `None` when out of bounds.
#[must_use]
pub fn byte_range(text: &str, start: usize, end: usize) -> Option<Range<usize>> {
    if start > end {
        return None;
    }
    let mut byte_start = None;
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        if char_idx == start {
            byte_start = Some(byte_idx);
        }
        if char_idx == end {
            return byte_start.map(|s| s..byte_idx);
        }
    }
    let total = char_len(text);
    if end == total {
        let s = if start == total { text.len() } else { byte_start? };
        return Some(s..text.len());
    }
    None
}

#[must_use]
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    byte_range(text, start, end).map(|r| &text[r])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_by_character() {
        let text = "café au lait";
        assert_eq!(char_slice(text, 0, 4), Some("café"));
        assert_eq!(char_slice(text, 5, 7), Some("au"));
        assert_eq!(char_slice(text, 8, 12), Some("lait"));
        assert_eq!(char_slice(text, 12, 12), Some(""));
        assert_eq!(char_slice(text, 4, 4), Some(""));
    }

    #[test]
    fn rejects_out_of_bounds() {
        assert_eq!(char_slice("abc", 2, 4), None);
        assert_eq!(char_slice("abc", 2, 1), None);
        assert_eq!(char_slice("", 0, 0), Some(""));
    }
}
