//! # Prose Analysis
//!
//! Pure, synchronous text scoring: counts, readability formulas and tone.
//!
//! ```text
//! Text snapshot
//!     │
//!     ├──> TextMetrics (sentences, words, syllables, characters)
//!     │      └─> Readability (reading ease, grade level, ARI) + band summary
//!     │
//!     └──> ToneClassifier (lexicons + structural boosts)
//!            └─> ToneResult (dominant, confidence, per-category scores)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use prose_analysis::{analyze_readability, analyze_tone};
//!
//! let text = "The happy puppy ran to the big garden. The happy puppy ran to the big garden.";
//! let tone = analyze_tone(text).unwrap();
//! let readability = analyze_readability(text).unwrap();
//! println!("{:?} / {}", tone.dominant, readability.summary);
//! ```

mod error;
pub mod limits;
mod metrics;
mod readability;
mod tone;

pub use error::{AnalysisError, Result};
pub use limits::{validate_text, AnalysisKind, MAX_TEXT_CHARS};
pub use metrics::{count_sentences, count_syllables, count_words, TextMetrics};
pub use readability::{
    analyze_readability, automated_readability_index, flesch_kincaid_grade, flesch_reading_ease,
    readability_from_metrics,
};
pub use tone::{analyze_tone, ToneClassifier, LEXICON_WEIGHT, NEUTRAL_CONFIDENCE};
