//! Sentiment scoring and daily aggregation.
//!
//! Two models score each headline:
//! - a lexical model giving polarity in [-1, 1] and subjectivity in [0, 1]
//! - the VADER valence model giving a compound score in [-1, 1] plus
//!   positive/negative/neutral proportions
//!
//! Scored headlines are grouped per calendar date by [`aggregate_daily`].

pub mod aggregate;
pub mod analyzer;
pub mod lexicon;
pub mod polarity;
pub mod valence;

pub use aggregate::aggregate_daily;
pub use analyzer::{SentimentAnalyzer, DEFAULT_POSITIVE_THRESHOLD};
pub use polarity::PolarityModel;
pub use valence::{Valence, ValenceModel};
