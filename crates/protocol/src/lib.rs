//! Wire types shared by the Prose analysis crates and their callers.
//!
//! Every type here is a plain, serializable record. Offsets in [`Suggestion`] are counted in
//! Unicode scalar values of the analyzed text snapshot, never in bytes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Grammar,
    Spelling,
    Style,
    Clarity,
}

impl IssueType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Spelling => "spelling",
            Self::Style => "style",
            Self::Clarity => "clarity",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// External grammar checking service
    Remote,
    /// Built-in misspelling dictionary
    Local,
}

/// A proposed edit to the span `start..end` of the analyzed text.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Suggestion {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub issue_type: IssueType,
    pub original_text: String,
    pub suggested_text: String,
    pub explanation: String,
    pub source: SuggestionSource,
}

impl Suggestion {
    #[must_use]
    pub const fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Number of characters covered by the span.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Half-open overlap test; zero-width spans overlap a span that strictly contains them.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        if self.start == self.end || other.start == other.end {
            return self.start > other.start && self.start < other.end
                || other.start > self.start && other.start < self.end
                || self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }
}

/// Tone categories in tie-break order: on equal scores the earlier variant wins.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToneCategory {
    Formal,
    Casual,
    Confident,
    Friendly,
    Professional,
}

impl ToneCategory {
    pub const ALL: [Self; 5] = [
        Self::Formal,
        Self::Casual,
        Self::Confident,
        Self::Friendly,
        Self::Professional,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Confident => "confident",
            Self::Friendly => "friendly",
            Self::Professional => "professional",
        }
    }
}

/// Per-category tone scores. One field per [`ToneCategory`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
pub struct ToneScores {
    pub formal: u32,
    pub casual: u32,
    pub confident: u32,
    pub friendly: u32,
    pub professional: u32,
}

impl ToneScores {
    #[must_use]
    pub const fn get(&self, category: ToneCategory) -> u32 {
        match category {
            ToneCategory::Formal => self.formal,
            ToneCategory::Casual => self.casual,
            ToneCategory::Confident => self.confident,
            ToneCategory::Friendly => self.friendly,
            ToneCategory::Professional => self.professional,
        }
    }

    pub fn add(&mut self, category: ToneCategory, amount: u32) {
        let slot = match category {
            ToneCategory::Formal => &mut self.formal,
            ToneCategory::Casual => &mut self.casual,
            ToneCategory::Confident => &mut self.confident,
            ToneCategory::Friendly => &mut self.friendly,
            ToneCategory::Professional => &mut self.professional,
        };
        *slot = slot.saturating_add(amount);
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        ToneCategory::ALL
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(self.get(*c)))
    }

    /// Highest-scoring category and its score; ties resolve to the earliest category.
    #[must_use]
    pub fn dominant(&self) -> (ToneCategory, u32) {
        let mut best = (ToneCategory::Formal, self.formal);
        for category in ToneCategory::ALL.into_iter().skip(1) {
            let score = self.get(category);
            if score > best.1 {
                best = (category, score);
            }
        }
        best
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ToneResult {
    pub dominant: ToneCategory,
    /// 0..=100
    pub confidence: u8,
    pub scores: ToneScores,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadabilityKind {
    FleschReadingEase,
    FleschKincaidGrade,
    AutomatedReadability,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, JsonSchema)]
pub struct ReadabilityScore {
    #[serde(rename = "type")]
    pub kind: ReadabilityKind,
    pub value: f64,
}

/// Reading-ease bands, easiest first.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadabilityBand {
    VeryEasy,
    Easy,
    FairlyEasy,
    Plain,
    FairlyDifficult,
    Difficult,
    VeryDifficult,
}

impl ReadabilityBand {
    #[must_use]
    pub fn for_reading_ease(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::VeryEasy,
            s if s >= 80.0 => Self::Easy,
            s if s >= 70.0 => Self::FairlyEasy,
            s if s >= 60.0 => Self::Plain,
            s if s >= 50.0 => Self::FairlyDifficult,
            s if s >= 30.0 => Self::Difficult,
            _ => Self::VeryDifficult,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryEasy => "Very easy to read",
            Self::Easy => "Easy to read",
            Self::FairlyEasy => "Fairly easy to read",
            Self::Plain => "Plain English",
            Self::FairlyDifficult => "Fairly difficult to read",
            Self::Difficult => "Difficult to read",
            Self::VeryDifficult => "Very difficult to read",
        }
    }

    #[must_use]
    pub const fn audience(self) -> &'static str {
        match self {
            Self::VeryEasy => "5th grade",
            Self::Easy => "6th grade",
            Self::FairlyEasy => "7th grade",
            Self::Plain => "8th to 9th grade",
            Self::FairlyDifficult => "10th to 12th grade",
            Self::Difficult => "college",
            Self::VeryDifficult => "college graduate",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ReadabilityReport {
    /// Always reading ease, Flesch-Kincaid grade, automated readability, in that order.
    pub scores: [ReadabilityScore; 3],
    pub band: ReadabilityBand,
    pub summary: String,
}

impl ReadabilityReport {
    #[must_use]
    pub fn score(&self, kind: ReadabilityKind) -> f64 {
        self.scores
            .iter()
            .find(|s| s.kind == kind)
            .map_or(0.0, |s| s.value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct SuggestionReport {
    /// Sorted ascending by `start`, at most one entry per `(start, end)`.
    pub suggestions: Vec<Suggestion>,
    /// Set when the remote checker did not contribute to this list.
    pub degraded: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct AnalysisRequest {
    pub text: String,
    pub document_id: String,
    pub generation: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct AnalysisReport {
    pub schema_version: u32,
    pub document_id: String,
    pub generation: u64,
    /// Absent when the text is too short for tone analysis.
    pub tone: Option<ToneResult>,
    /// Absent when the text is too short or has no sentences.
    pub readability: Option<ReadabilityReport>,
    pub suggestions: SuggestionReport,
}

pub fn serialize_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn suggestion(start: usize, end: usize) -> Suggestion {
        Suggestion {
            id: format!("t-{start}-{end}"),
            start,
            end,
            issue_type: IssueType::Grammar,
            original_text: String::new(),
            suggested_text: String::new(),
            explanation: String::new(),
            source: SuggestionSource::Local,
        }
    }

    #[test]
    fn equal_scores_resolve_to_formal() {
        let scores = ToneScores {
            formal: 10,
            casual: 10,
            confident: 10,
            friendly: 10,
            professional: 10,
        };
        assert_eq!(scores.dominant(), (ToneCategory::Formal, 10));
    }

    #[test]
    fn dominant_picks_strict_maximum() {
        let mut scores = ToneScores::default();
        scores.add(ToneCategory::Friendly, 15);
        scores.add(ToneCategory::Casual, 15);
        scores.add(ToneCategory::Professional, 20);
        assert_eq!(scores.dominant(), (ToneCategory::Professional, 20));
        assert_eq!(scores.total(), 50);
    }

    #[test]
    fn band_thresholds_are_inclusive_lower_bounds() {
        assert_eq!(ReadabilityBand::for_reading_ease(90.0), ReadabilityBand::VeryEasy);
        assert_eq!(ReadabilityBand::for_reading_ease(89.9), ReadabilityBand::Easy);
        assert_eq!(ReadabilityBand::for_reading_ease(60.0), ReadabilityBand::Plain);
        assert_eq!(ReadabilityBand::for_reading_ease(29.9), ReadabilityBand::VeryDifficult);
        assert_eq!(ReadabilityBand::Easy.label(), "Easy to read");
    }

    #[test]
    fn overlap_is_half_open() {
        assert!(suggestion(0, 4).overlaps(&suggestion(3, 6)));
        assert!(!suggestion(0, 3).overlaps(&suggestion(3, 6)));
        assert!(suggestion(2, 2).overlaps(&suggestion(0, 4)));
        assert!(!suggestion(4, 4).overlaps(&suggestion(0, 4)));
    }

    #[test]
    fn wire_names_are_snake_case() {
        let score = ReadabilityScore {
            kind: ReadabilityKind::FleschKincaidGrade,
            value: 4.2,
        };
        let json = serde_json::to_value(score).unwrap();
        assert_eq!(json["type"], "flesch_kincaid_grade");

        let json = serde_json::to_value(suggestion(0, 3)).unwrap();
        assert_eq!(json["issue_type"], "grammar");
        assert_eq!(json["source"], "local");
    }
}
