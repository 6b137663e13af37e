//! Lexicon and structure based tone scoring.
//!
//! Each lexicon hit is worth [`LEXICON_WEIGHT`]. Structural boosts are applied at most once per
//! category and analysis. The dominant tone is the highest total, with ties going to the
//! category listed first in [`ToneCategory::ALL`].

use crate::limits::{validate_text, AnalysisKind};
use crate::metrics::{count_words, is_sentence_terminator};
use crate::Result;
use once_cell::sync::Lazy;
use prose_protocol::{ToneCategory, ToneResult, ToneScores};
use regex::Regex;

pub const LEXICON_WEIGHT: u32 = 5;

/// Confidence reported when no category scored at all. A fixed policy value, not derived.
pub const NEUTRAL_CONFIDENCE: u8 = 50;

const FORMAL_WORDS: &[&str] = &[
    "therefore",
    "furthermore",
    "moreover",
    "consequently",
    "hence",
    "thus",
    "accordingly",
    "nevertheless",
    "whereas",
    "herein",
];

const CASUAL_WORDS: &[&str] = &[
    "hey", "yeah", "cool", "awesome", "gonna", "wanna", "kinda", "stuff", "okay", "lol",
];

const CONFIDENT_WORDS: &[&str] = &[
    "definitely",
    "certainly",
    "absolutely",
    "clearly",
    "undoubtedly",
    "surely",
    "guarantee",
    "proven",
    "confident",
    "assured",
];

const FRIENDLY_WORDS: &[&str] = &[
    "thanks",
    "thank",
    "please",
    "appreciate",
    "glad",
    "happy",
    "welcome",
    "wonderful",
    "hope",
    "great",
];

const PROFESSIONAL_WORDS: &[&str] = &[
    "deliverable",
    "stakeholder",
    "strategy",
    "objective",
    "implement",
    "optimize",
    "leverage",
    "initiative",
    "efficiency",
    "collaborate",
];

const BUSINESS_TERMS: &[&str] = &["roi", "kpi", "b2b", "deadline", "quarterly", "revenue"];

const FORMAL_CLAUSE_BOOST: u32 = 20;
const FORMAL_PASSIVE_BOOST: u32 = 15;
const CASUAL_CONTRACTION_BOOST: u32 = 15;
const CASUAL_SHORT_SENTENCE_BOOST: u32 = 10;
const CONFIDENT_DECLARATIVE_BOOST: u32 = 15;
const FRIENDLY_EXCLAMATION_BOOST: u32 = 10;
const FRIENDLY_QUESTION_BOOST: u32 = 5;
const PROFESSIONAL_TERM_BOOST: u32 = 15;

const SHORT_SENTENCE_WORDS: f64 = 12.0;
const DECLARATIVE_RATIO: f64 = 0.7;
const MAX_CLAUSES: usize = 3;

fn word_pattern(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("lexicon pattern is valid")
}

static LEXICONS: Lazy<[(ToneCategory, Regex); 5]> = Lazy::new(|| {
    [
        (ToneCategory::Formal, word_pattern(FORMAL_WORDS)),
        (ToneCategory::Casual, word_pattern(CASUAL_WORDS)),
        (ToneCategory::Confident, word_pattern(CONFIDENT_WORDS)),
        (ToneCategory::Friendly, word_pattern(FRIENDLY_WORDS)),
        (ToneCategory::Professional, word_pattern(PROFESSIONAL_WORDS)),
    ]
});

static BUSINESS_PATTERN: Lazy<Regex> = Lazy::new(|| word_pattern(BUSINESS_TERMS));

static PASSIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:was|were|is|are|been|being)\s+\w+ed\b").expect("passive pattern")
});

static CONTRACTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\w+['’](?:t|s|re|ve|ll|d|m)\b").expect("contraction pattern")
});

static SENTENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").expect("sentence pattern"));

/// A sentence body together with the terminator run that closed it (possibly empty).
struct Sentence<'a> {
    body: &'a str,
    terminator: &'a str,
}

impl Sentence<'_> {
    fn is_declarative(&self) -> bool {
        !self.terminator.contains(['!', '?'])
    }

    fn clause_count(&self) -> usize {
        self.body
            .split(',')
            .filter(|clause| !clause.trim().is_empty())
            .count()
    }
}

fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    SENTENCE_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let raw = m.as_str();
            let cut = raw.find(is_sentence_terminator).unwrap_or(raw.len());
            let (body, terminator) = raw.split_at(cut);
            (!body.trim().is_empty()).then_some(Sentence { body, terminator })
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ToneClassifier;

impl ToneClassifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Raw per-category scores for `text`. No length validation.
    #[must_use]
    pub fn score(&self, text: &str) -> ToneScores {
        let mut scores = ToneScores::default();

        for (category, pattern) in LEXICONS.iter() {
            let hits = u32::try_from(pattern.find_iter(text).count()).unwrap_or(u32::MAX);
            scores.add(*category, hits.saturating_mul(LEXICON_WEIGHT));
        }

        let sentences = split_sentences(text);

        if sentences.iter().any(|s| s.clause_count() > MAX_CLAUSES) {
            scores.add(ToneCategory::Formal, FORMAL_CLAUSE_BOOST);
        }
        if PASSIVE_PATTERN.is_match(text) {
            scores.add(ToneCategory::Formal, FORMAL_PASSIVE_BOOST);
        }

        if CONTRACTION_PATTERN.is_match(text) {
            scores.add(ToneCategory::Casual, CASUAL_CONTRACTION_BOOST);
        }

        if !sentences.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let total = sentences.len() as f64;
            #[allow(clippy::cast_precision_loss)]
            let avg_words = count_words(text) as f64 / total;
            if avg_words < SHORT_SENTENCE_WORDS {
                scores.add(ToneCategory::Casual, CASUAL_SHORT_SENTENCE_BOOST);
            }

            #[allow(clippy::cast_precision_loss)]
            let declarative = sentences.iter().filter(|s| s.is_declarative()).count() as f64;
            if declarative / total > DECLARATIVE_RATIO {
                scores.add(ToneCategory::Confident, CONFIDENT_DECLARATIVE_BOOST);
            }
        }

        if text.contains('!') {
            scores.add(ToneCategory::Friendly, FRIENDLY_EXCLAMATION_BOOST);
        }
        if text.contains('?') {
            scores.add(ToneCategory::Friendly, FRIENDLY_QUESTION_BOOST);
        }

        if BUSINESS_PATTERN.is_match(text) {
            scores.add(ToneCategory::Professional, PROFESSIONAL_TERM_BOOST);
        }

        scores
    }

    /// Scores `text` and picks the dominant tone. No length validation.
    #[must_use]
    pub fn classify(&self, text: &str) -> ToneResult {
        let scores = self.score(text);
        let (dominant, max) = scores.dominant();
        let total = scores.total();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let confidence = if total > 0 {
            (100.0 * f64::from(max) / f64::from(total))
                .round()
                .clamp(0.0, 100.0) as u8
        } else {
            NEUTRAL_CONFIDENCE
        };

        ToneResult {
            dominant,
            confidence,
            scores,
            summary: summarize(dominant, confidence),
        }
    }
}

const fn template(category: ToneCategory) -> &'static str {
    match category {
        ToneCategory::Formal => {
            "Your writing has a formal tone, suitable for academic or official communication."
        }
        ToneCategory::Casual => "Your writing has a casual, conversational tone.",
        ToneCategory::Confident => "Your writing sounds confident and assertive.",
        ToneCategory::Friendly => "Your writing comes across as warm and friendly.",
        ToneCategory::Professional => {
            "Your writing has a professional tone appropriate for business communication."
        }
    }
}

fn summarize(dominant: ToneCategory, confidence: u8) -> String {
    let band = if confidence > 80 {
        "The tone comes through with high confidence."
    } else if confidence >= 60 {
        "The tone comes through with moderate confidence."
    } else {
        "Mixed signals give this reading lower confidence."
    };
    format!("{} {band}", template(dominant))
}

/// Validates `text` for tone analysis and classifies it.
pub fn analyze_tone(text: &str) -> Result<ToneResult> {
    validate_text(text, AnalysisKind::Tone)?;
    let result = ToneClassifier::new().classify(text);
    log::debug!(
        "tone: dominant={} confidence={}",
        result.dominant.as_str(),
        result.confidence
    );
    Ok(result)
}
