//! Lexical polarity/subjectivity model.
//!
//! Scores are the mean over matched sentiment words. A modifier scales the
//! word right after it; a negation multiplies the polarity of the next
//! sentiment word within [`NEGATION_WINDOW`] tokens by [`NEGATION_FACTOR`].

use std::collections::HashMap;

use super::lexicon::{self, LexiconEntry};

/// Polarity multiplier applied to a negated word.
pub const NEGATION_FACTOR: f64 = -0.5;

/// Tokens a negation stays active for.
pub const NEGATION_WINDOW: usize = 3;

#[derive(Debug, Clone)]
pub struct PolarityModel {
    lexicon: HashMap<&'static str, LexiconEntry>,
}

impl Default for PolarityModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityModel {
    pub fn new() -> Self {
        Self {
            lexicon: lexicon::builtin(),
        }
    }

    /// `(polarity, subjectivity)` clamped to [-1, 1] and [0, 1].
    pub fn score(&self, text: &str) -> (f64, f64) {
        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut matched = 0usize;

        let mut boost: Option<f64> = None;
        let mut negation_left = 0usize;

        for token in tokenize(text) {
            if lexicon::is_negation(&token) {
                negation_left = NEGATION_WINDOW;
                boost = None;
                continue;
            }

            match self.lexicon.get(token.as_str()) {
                Some(entry) if entry.is_modifier() => {
                    boost = Some(boost.unwrap_or(1.0) * entry.intensity);
                }
                Some(entry) => {
                    let mut polarity = entry.polarity;
                    let mut subjectivity = entry.subjectivity;
                    if let Some(factor) = boost.take() {
                        polarity *= factor;
                        subjectivity = (subjectivity * factor).min(1.0);
                    }
                    if negation_left > 0 {
                        polarity *= NEGATION_FACTOR;
                        negation_left = 0;
                    }
                    polarity_sum += polarity;
                    subjectivity_sum += subjectivity;
                    matched += 1;
                }
                None => {
                    boost = None;
                    negation_left = negation_left.saturating_sub(1);
                }
            }
        }

        if matched == 0 {
            return (0.0, 0.0);
        }
        let n = matched as f64;
        (
            (polarity_sum / n).clamp(-1.0, 1.0),
            (subjectivity_sum / n).clamp(0.0, 1.0),
        )
    }
}

/// Lower-cased word tokens. Apostrophes and hyphens stay inside words;
/// punctuation (including `!`) separates and is otherwise ignored.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unknown_words_score_zero() {
        let model = PolarityModel::new();
        assert_eq!(model.score("Apple announces quarterly dividend"), (0.0, 0.0));
        assert_eq!(model.score(""), (0.0, 0.0));
    }

    #[test]
    fn mean_over_matched_words() {
        let model = PolarityModel::new();
        let (p, s) = model.score("Good results, bad guidance");
        assert!(close(p, 0.0));
        assert!(close(s, (0.6 + 0.67) / 2.0));
    }

    #[test]
    fn modifier_scales_next_word() {
        let model = PolarityModel::new();
        let (p, _) = model.score("very good quarter");
        assert!(close(p, 0.7 * 1.3));
        let (p, _) = model.score("extremely bad");
        assert!(close(p, -1.0));
    }

    #[test]
    fn negation_flips_and_halves() {
        let model = PolarityModel::new();
        let (p, _) = model.score("not good");
        assert!(close(p, -0.35));
        let (p, _) = model.score("Earnings weren't that great");
        assert!(close(p, -0.4));
        // out of the window
        let (p, _) = model.score("no one here ever said that good");
        assert!(close(p, 0.7));
    }

    #[test]
    fn exclamation_is_ignored() {
        let model = PolarityModel::new();
        assert_eq!(model.score("great!!!"), model.score("great"));
    }

    #[test]
    fn curly_apostrophe_negates() {
        let model = PolarityModel::new();
        let (p, _) = model.score("Shares don\u{2019}t look good");
        assert!(p < 0.0);
    }
}
