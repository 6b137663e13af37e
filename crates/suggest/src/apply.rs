//! Accepting suggestions and keeping the remaining offsets valid.

use crate::span::{byte_range, char_len};
use crate::ApplyError;
use prose_protocol::Suggestion;

/// Replaces the suggestion's span with its `suggested_text`.
///
/// Fails if the span no longer fits `text` or no longer holds `original_text`.
pub fn apply_suggestion(text: &str, suggestion: &Suggestion) -> Result<String, ApplyError> {
    let range = byte_range(text, suggestion.start, suggestion.end).ok_or_else(|| {
        ApplyError::OutOfBounds {
            start: suggestion.start,
            end: suggestion.end,
            len: char_len(text),
        }
    })?;

    let found = &text[range.clone()];
    if found != suggestion.original_text {
        return Err(ApplyError::StaleSpan {
            expected: suggestion.original_text.clone(),
            found: found.to_string(),
        });
    }

    let mut out = String::with_capacity(text.len() + suggestion.suggested_text.len());
    out.push_str(&text[..range.start]);
    out.push_str(&suggestion.suggested_text);
    out.push_str(&text[range.end..]);
    Ok(out)
}

/// Adjusts `remaining` for a text where `accepted` was just applied.
///
/// Suggestions overlapping the accepted span are dropped; those after it shift by the change in
/// length.
#[must_use]
pub fn rebase_suggestions(remaining: Vec<Suggestion>, accepted: &Suggestion) -> Vec<Suggestion> {
    let old_len = accepted.len();
    let new_len = char_len(&accepted.suggested_text);

    remaining
        .into_iter()
        .filter(|s| s.id != accepted.id && s.span() != accepted.span() && !s.overlaps(accepted))
        .map(|mut s| {
            if s.start >= accepted.end {
                s.start = s.start - old_len + new_len;
                s.end = s.end - old_len + new_len;
            }
            s
        })
        .collect()
}

/// Applies every non-overlapping suggestion, earliest first on conflicts.
///
/// Returns the new text and how many suggestions were applied.
pub fn apply_all(text: &str, suggestions: &[Suggestion]) -> Result<(String, usize), ApplyError> {
    let mut ordered: Vec<&Suggestion> = suggestions.iter().collect();
    ordered.sort_by_key(|s| s.start);

    let mut chosen: Vec<&Suggestion> = Vec::with_capacity(ordered.len());
    for candidate in ordered {
        let fits = chosen
            .last()
            .map_or(true, |prev| prev.end <= candidate.start && !prev.overlaps(candidate));
        if fits {
            chosen.push(candidate);
        }
    }

    // Right to left so earlier offsets stay valid.
    let mut out = text.to_string();
    for suggestion in chosen.iter().rev() {
        out = apply_suggestion(&out, suggestion)?;
    }
    Ok((out, chosen.len()))
}
