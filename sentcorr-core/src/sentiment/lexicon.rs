//! Adjective-style lexicon for headline polarity and subjectivity.
//!
//! Each entry carries a polarity in [-1, 1], a subjectivity in [0, 1] and an
//! intensity. Entries with zero polarity and an intensity other than 1.0 are
//! modifiers: they scale the next sentiment word instead of being scored.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconEntry {
    pub polarity: f64,
    pub subjectivity: f64,
    pub intensity: f64,
}

impl LexiconEntry {
    const fn word(polarity: f64, subjectivity: f64) -> Self {
        Self {
            polarity,
            subjectivity,
            intensity: 1.0,
        }
    }

    const fn modifier(intensity: f64) -> Self {
        Self {
            polarity: 0.0,
            subjectivity: 0.0,
            intensity,
        }
    }

    pub fn is_modifier(&self) -> bool {
        self.polarity == 0.0 && self.intensity != 1.0
    }
}

/// Words that flip the next sentiment word.
pub const NEGATIONS: &[&str] = &["not", "never", "no", "cannot", "nor"];

/// Built-in vocabulary: general evaluative adjectives plus market-news terms.
const ENTRIES: &[(&str, LexiconEntry)] = &[
    // modifiers
    ("very", LexiconEntry::modifier(1.3)),
    ("extremely", LexiconEntry::modifier(1.5)),
    ("highly", LexiconEntry::modifier(1.3)),
    ("really", LexiconEntry::modifier(1.25)),
    ("incredibly", LexiconEntry::modifier(1.4)),
    ("hugely", LexiconEntry::modifier(1.4)),
    ("most", LexiconEntry::modifier(1.2)),
    ("quite", LexiconEntry::modifier(1.1)),
    ("slightly", LexiconEntry::modifier(0.5)),
    ("somewhat", LexiconEntry::modifier(0.7)),
    ("mildly", LexiconEntry::modifier(0.6)),
    // general evaluative words
    ("good", LexiconEntry::word(0.7, 0.6)),
    ("better", LexiconEntry::word(0.5, 0.5)),
    ("best", LexiconEntry::word(1.0, 0.3)),
    ("great", LexiconEntry::word(0.8, 0.75)),
    ("excellent", LexiconEntry::word(1.0, 1.0)),
    ("amazing", LexiconEntry::word(0.6, 0.9)),
    ("awesome", LexiconEntry::word(1.0, 1.0)),
    ("outstanding", LexiconEntry::word(0.5, 0.75)),
    ("impressive", LexiconEntry::word(1.0, 1.0)),
    ("remarkable", LexiconEntry::word(0.75, 0.75)),
    ("solid", LexiconEntry::word(0.3, 0.5)),
    ("strong", LexiconEntry::word(0.43, 0.73)),
    ("stronger", LexiconEntry::word(0.5, 0.6)),
    ("positive", LexiconEntry::word(0.23, 0.55)),
    ("optimistic", LexiconEntry::word(0.6, 0.7)),
    ("happy", LexiconEntry::word(0.8, 1.0)),
    ("successful", LexiconEntry::word(0.75, 0.95)),
    ("profitable", LexiconEntry::word(0.5, 0.6)),
    ("favorable", LexiconEntry::word(0.55, 0.6)),
    ("attractive", LexiconEntry::word(0.5, 0.75)),
    ("healthy", LexiconEntry::word(0.5, 0.5)),
    ("robust", LexiconEntry::word(0.4, 0.5)),
    ("top", LexiconEntry::word(0.5, 0.5)),
    ("new", LexiconEntry::word(0.14, 0.45)),
    ("high", LexiconEntry::word(0.16, 0.54)),
    ("higher", LexiconEntry::word(0.25, 0.5)),
    ("record", LexiconEntry::word(0.3, 0.4)),
    ("bad", LexiconEntry::word(-0.7, 0.67)),
    ("worse", LexiconEntry::word(-0.4, 0.6)),
    ("worst", LexiconEntry::word(-1.0, 1.0)),
    ("terrible", LexiconEntry::word(-1.0, 1.0)),
    ("awful", LexiconEntry::word(-1.0, 1.0)),
    ("poor", LexiconEntry::word(-0.4, 0.6)),
    ("weak", LexiconEntry::word(-0.38, 0.63)),
    ("weaker", LexiconEntry::word(-0.4, 0.6)),
    ("negative", LexiconEntry::word(-0.3, 0.4)),
    ("pessimistic", LexiconEntry::word(-0.6, 0.7)),
    ("disappointing", LexiconEntry::word(-0.6, 0.7)),
    ("sad", LexiconEntry::word(-0.5, 1.0)),
    ("risky", LexiconEntry::word(-0.3, 0.6)),
    ("volatile", LexiconEntry::word(-0.2, 0.5)),
    ("uncertain", LexiconEntry::word(-0.2, 0.6)),
    ("difficult", LexiconEntry::word(-0.5, 1.0)),
    ("tough", LexiconEntry::word(-0.39, 0.83)),
    ("low", LexiconEntry::word(-0.1, 0.3)),
    ("lower", LexiconEntry::word(-0.15, 0.3)),
    ("expensive", LexiconEntry::word(-0.5, 0.7)),
    ("cheap", LexiconEntry::word(0.4, 0.7)),
    ("wrong", LexiconEntry::word(-0.5, 0.9)),
    // market-news vocabulary
    ("bullish", LexiconEntry::word(0.6, 0.7)),
    ("bearish", LexiconEntry::word(-0.6, 0.7)),
    ("outperform", LexiconEntry::word(0.6, 0.5)),
    ("outperforms", LexiconEntry::word(0.6, 0.5)),
    ("underperform", LexiconEntry::word(-0.6, 0.5)),
    ("underperforms", LexiconEntry::word(-0.6, 0.5)),
    ("upgrade", LexiconEntry::word(0.5, 0.4)),
    ("upgrades", LexiconEntry::word(0.5, 0.4)),
    ("upgraded", LexiconEntry::word(0.5, 0.4)),
    ("downgrade", LexiconEntry::word(-0.5, 0.4)),
    ("downgrades", LexiconEntry::word(-0.5, 0.4)),
    ("downgraded", LexiconEntry::word(-0.5, 0.4)),
    ("beat", LexiconEntry::word(0.4, 0.3)),
    ("beats", LexiconEntry::word(0.4, 0.3)),
    ("miss", LexiconEntry::word(-0.4, 0.3)),
    ("misses", LexiconEntry::word(-0.4, 0.3)),
    ("missed", LexiconEntry::word(-0.4, 0.3)),
    ("gain", LexiconEntry::word(0.3, 0.3)),
    ("gains", LexiconEntry::word(0.3, 0.3)),
    ("loss", LexiconEntry::word(-0.3, 0.3)),
    ("losses", LexiconEntry::word(-0.3, 0.3)),
    ("surge", LexiconEntry::word(0.5, 0.5)),
    ("surges", LexiconEntry::word(0.5, 0.5)),
    ("soar", LexiconEntry::word(0.6, 0.5)),
    ("soars", LexiconEntry::word(0.6, 0.5)),
    ("rally", LexiconEntry::word(0.5, 0.5)),
    ("rallies", LexiconEntry::word(0.5, 0.5)),
    ("jump", LexiconEntry::word(0.35, 0.4)),
    ("jumps", LexiconEntry::word(0.35, 0.4)),
    ("rise", LexiconEntry::word(0.25, 0.3)),
    ("rises", LexiconEntry::word(0.25, 0.3)),
    ("growth", LexiconEntry::word(0.3, 0.3)),
    ("plunge", LexiconEntry::word(-0.6, 0.5)),
    ("plunges", LexiconEntry::word(-0.6, 0.5)),
    ("crash", LexiconEntry::word(-0.7, 0.5)),
    ("crashes", LexiconEntry::word(-0.7, 0.5)),
    ("tumble", LexiconEntry::word(-0.5, 0.5)),
    ("tumbles", LexiconEntry::word(-0.5, 0.5)),
    ("slump", LexiconEntry::word(-0.5, 0.5)),
    ("slumps", LexiconEntry::word(-0.5, 0.5)),
    ("fall", LexiconEntry::word(-0.25, 0.3)),
    ("falls", LexiconEntry::word(-0.25, 0.3)),
    ("drop", LexiconEntry::word(-0.3, 0.3)),
    ("drops", LexiconEntry::word(-0.3, 0.3)),
    ("decline", LexiconEntry::word(-0.3, 0.3)),
    ("declines", LexiconEntry::word(-0.3, 0.3)),
    ("lawsuit", LexiconEntry::word(-0.4, 0.4)),
    ("fraud", LexiconEntry::word(-0.8, 0.7)),
    ("recall", LexiconEntry::word(-0.4, 0.3)),
    ("layoffs", LexiconEntry::word(-0.5, 0.4)),
];

/// Lookup table built from the built-in vocabulary.
pub fn builtin() -> HashMap<&'static str, LexiconEntry> {
    ENTRIES.iter().copied().collect()
}

pub fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}
