use crate::limits::{validate_text, AnalysisKind};
use crate::{AnalysisError, Result, TextMetrics};
use prose_protocol::{ReadabilityBand, ReadabilityKind, ReadabilityReport, ReadabilityScore};

/// Averages the three formulas are built from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ratios {
    words_per_sentence: f64,
    syllables_per_word: f64,
    chars_per_word: f64,
}

impl Ratios {
    #[allow(clippy::cast_precision_loss)]
    fn from_metrics(metrics: &TextMetrics) -> Result<Self> {
        if metrics.word_count == 0 {
            return Err(AnalysisError::invalid_input("text contains no words"));
        }
        if metrics.sentence_count == 0 {
            return Err(AnalysisError::invalid_input("text contains no sentences"));
        }

        let words = metrics.word_count as f64;
        Ok(Self {
            words_per_sentence: words / metrics.sentence_count as f64,
            syllables_per_word: metrics.syllable_count as f64 / words,
            chars_per_word: metrics.non_whitespace_chars() as f64 / words,
        })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn flesch_reading_ease(metrics: &TextMetrics) -> Result<f64> {
    let r = Ratios::from_metrics(metrics)?;
    let raw = 206.835 - 1.015 * r.words_per_sentence - 84.6 * r.syllables_per_word;
    Ok(round1(raw.clamp(0.0, 100.0)))
}

pub fn flesch_kincaid_grade(metrics: &TextMetrics) -> Result<f64> {
    let r = Ratios::from_metrics(metrics)?;
    let raw = 0.39 * r.words_per_sentence + 11.8 * r.syllables_per_word - 15.59;
    Ok(round1(raw.max(0.0)))
}

pub fn automated_readability_index(metrics: &TextMetrics) -> Result<f64> {
    let r = Ratios::from_metrics(metrics)?;
    let raw = 4.71 * r.chars_per_word + 0.5 * r.words_per_sentence - 21.43;
    Ok(round1(raw.max(0.0)))
}

fn recommendation(reading_ease: f64) -> &'static str {
    if reading_ease < 60.0 {
        "Consider shortening sentences and choosing simpler words to reach a wider audience."
    } else if reading_ease > 80.0 {
        "Your text is highly accessible to most readers."
    } else {
        "Your text is reasonably accessible to a general audience."
    }
}

/// Builds the three-score report from precomputed metrics. Does not apply length limits.
pub fn readability_from_metrics(metrics: &TextMetrics) -> Result<ReadabilityReport> {
    let reading_ease = flesch_reading_ease(metrics)?;
    let grade = flesch_kincaid_grade(metrics)?;
    let ari = automated_readability_index(metrics)?;

    let band = ReadabilityBand::for_reading_ease(reading_ease);
    let summary = format!(
        "{} ({} level). Flesch-Kincaid grade level {grade:.1}. {}",
        band.label(),
        band.audience(),
        recommendation(reading_ease)
    );

    Ok(ReadabilityReport {
        scores: [
            ReadabilityScore {
                kind: ReadabilityKind::FleschReadingEase,
                value: reading_ease,
            },
            ReadabilityScore {
                kind: ReadabilityKind::FleschKincaidGrade,
                value: grade,
            },
            ReadabilityScore {
                kind: ReadabilityKind::AutomatedReadability,
                value: ari,
            },
        ],
        band,
        summary,
    })
}

/// Validates `text` for readability analysis and scores it.
pub fn analyze_readability(text: &str) -> Result<ReadabilityReport> {
    validate_text(text, AnalysisKind::Readability)?;
    let metrics = TextMetrics::compute(text);
    log::debug!(
        "readability: {} sentences, {} words, {} syllables",
        metrics.sentence_count,
        metrics.word_count,
        metrics.syllable_count
    );
    readability_from_metrics(&metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn easy_text() -> String {
        vec!["The happy puppy ran to the big garden."; 10].join(" ")
    }

    #[test]
    fn short_plain_sentences_read_easily() {
        let report = analyze_readability(&easy_text()).unwrap();

        assert_eq!(report.score(ReadabilityKind::FleschReadingEase), 82.4);
        assert_eq!(report.score(ReadabilityKind::AutomatedReadability), 0.8);
        assert!(report.score(ReadabilityKind::FleschReadingEase) > 80.0);
        assert_eq!(report.band, ReadabilityBand::Easy);
        assert!(report.summary.starts_with("Easy to read"));
        assert!(report.summary.contains("highly accessible"));
    }

    #[test]
    fn scores_are_reported_in_fixed_order() {
        let report = analyze_readability(&easy_text()).unwrap();
        let kinds: Vec<_> = report.scores.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ReadabilityKind::FleschReadingEase,
                ReadabilityKind::FleschKincaidGrade,
                ReadabilityKind::AutomatedReadability,
            ]
        );
    }

    #[test]
    fn dense_vocabulary_clamps_reading_ease_to_zero() {
        let sentence = "Institutionalization notwithstanding, interdisciplinary \
                        collaborations necessitate extraordinarily sophisticated \
                        organizational infrastructures";
        let report = analyze_readability(sentence).unwrap();

        assert_eq!(report.score(ReadabilityKind::FleschReadingEase), 0.0);
        assert_eq!(report.band, ReadabilityBand::VeryDifficult);
        assert!(report.summary.contains("shortening sentences"));
        assert!(report.score(ReadabilityKind::FleschKincaidGrade) > 12.0);
    }

    #[test]
    fn text_without_sentences_is_invalid_input() {
        let dots = ".".repeat(60);
        let err = analyze_readability(&dots).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn short_text_is_a_validation_error() {
        let err = analyze_readability("Too short to measure.").unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(_)));
    }

    #[test]
    fn empty_metrics_are_invalid_input() {
        let err = readability_from_metrics(&TextMetrics::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn mid_range_ease_gets_neutral_recommendation() {
        let metrics = TextMetrics {
            sentence_count: 1,
            word_count: 12,
            syllable_count: 17,
            char_count: 71,
            whitespace_count: 11,
        };
        let report = readability_from_metrics(&metrics).unwrap();

        assert_eq!(report.score(ReadabilityKind::FleschReadingEase), 74.8);
        assert_eq!(report.band, ReadabilityBand::FairlyEasy);
        assert!(report.summary.starts_with("Fairly easy to read"));
        assert!(report.summary.contains("reasonably accessible"));
    }

    #[test]
    fn recommendation_bands_include_both_edges_in_neutral() {
        assert!(recommendation(59.9).contains("shortening sentences"));
        assert!(recommendation(60.0).contains("reasonably accessible"));
        assert!(recommendation(80.0).contains("reasonably accessible"));
        assert!(recommendation(80.1).contains("highly accessible"));
    }

    proptest! {
        #[test]
        fn scores_stay_in_range(text in "[A-Za-z]{1,12}( [A-Za-z]{1,12}){0,40}[.!?]") {
            let metrics = TextMetrics::compute(&text);
            let ease = flesch_reading_ease(&metrics).unwrap();
            prop_assert!((0.0..=100.0).contains(&ease));
            prop_assert!(flesch_kincaid_grade(&metrics).unwrap() >= 0.0);
            prop_assert!(automated_readability_index(&metrics).unwrap() >= 0.0);
        }
    }
}
