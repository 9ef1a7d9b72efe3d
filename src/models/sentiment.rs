use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Urgent,
}

/// Result of one enrichment pass. Always replaced as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentData {
    /// Polarity in `[-1.0, 1.0]`.
    pub score: f64,
    pub label: SentimentLabel,
    pub summary: String,
    pub language: String,
}

impl SentimentData {
    pub fn new(
        score: f64,
        label: SentimentLabel,
        summary: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(-1.0, 1.0)
        };
        Self {
            score,
            label,
            summary: summary.into(),
            language: language.into(),
        }
    }

    /// Value substituted whenever the enrichment backend cannot answer.
    pub fn unavailable() -> Self {
        Self::new(
            0.0,
            SentimentLabel::Neutral,
            "Sentiment analysis unavailable",
            "Unknown",
        )
    }

    pub fn is_unavailable(&self) -> bool {
        *self == Self::unavailable()
    }
}
