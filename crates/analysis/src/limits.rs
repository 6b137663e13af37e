use crate::{AnalysisError, Result};

/// Hard ceiling on analyzed text, in characters.
pub const MAX_TEXT_CHARS: usize = 50_000;
pub const MIN_TONE_CHARS: usize = 20;
pub const MIN_READABILITY_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Tone,
    Readability,
    Suggestions,
}

impl AnalysisKind {
    /// Minimum trimmed length in characters.
    #[must_use]
    pub const fn min_chars(self) -> usize {
        match self {
            Self::Tone => MIN_TONE_CHARS,
            Self::Readability => MIN_READABILITY_CHARS,
            Self::Suggestions => 1,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tone => "tone analysis",
            Self::Readability => "readability analysis",
            Self::Suggestions => "suggestion analysis",
        }
    }
}

/// Rejects text that is too long for any analysis, or too short for `kind`.
///
/// Returns the character count of the untrimmed text.
pub fn validate_text(text: &str, kind: AnalysisKind) -> Result<usize> {
    let total = text.chars().count();
    if total > MAX_TEXT_CHARS {
        return Err(AnalysisError::validation(format!(
            "text is {total} characters; the maximum is {MAX_TEXT_CHARS}"
        )));
    }

    let trimmed = text.trim().chars().count();
    let min = kind.min_chars();
    if trimmed < min {
        return Err(AnalysisError::validation(format!(
            "{} requires at least {min} characters (got {trimmed})",
            kind.label()
        )));
    }

    Ok(total)
}

/// Whether `text` meets the minimum for `kind`, assuming it already passed the size ceiling.
#[must_use]
pub fn meets_minimum(text: &str, kind: AnalysisKind) -> bool {
    text.trim().chars().count() >= kind.min_chars()
}
