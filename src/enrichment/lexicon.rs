use super::{BusinessListing, Enricher};
use crate::models::{SentimentData, SentimentLabel};
use anyhow::{bail, Result};
use whatlang::detect;

const POSITIVE_TERMS: &[&str] = &[
    "thank", "great", "helpful", "resolved", "quick", "excellent", "appreciate",
    "friendly", "fixed", "happy", "good",
];

const NEGATIVE_TERMS: &[&str] = &[
    "slow", "broken", "refund", "late", "never", "rude", "terrible", "worst", "overcharged",
    "damaged", "missing", "cancel", "disappointed", "awful", "bad", "unacceptable", "error",
];

const URGENT_TERMS: &[&str] = &[
    "urgent", "immediately", "emergency", "dangerous", "unsafe", "fraud", "lawsuit", "asap",
];

const SUMMARY_LIMIT: usize = 120;

/// Offline heuristic: keyword polarity plus `whatlang` language detection.
/// Translation, business lookup and geocoding need a live backend and are
/// reported as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconEnricher;

impl LexiconEnricher {
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for LexiconEnricher {
    fn analyze(&self, text: &str) -> Result<SentimentData> {
        if text.trim().is_empty() {
            bail!("Nothing to analyze");
        }
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();
        let hits = |terms: &[&str]| {
            words
                .iter()
                .filter(|w| terms.iter().any(|t| w.starts_with(t)))
                .count() as f64
        };
        let positive = hits(POSITIVE_TERMS);
        let negative = hits(NEGATIVE_TERMS);
        let urgent = hits(URGENT_TERMS);

        let score = if positive + negative + urgent == 0.0 {
            0.0
        } else {
            (positive - negative - urgent) / (positive + negative + urgent)
        };
        let label = if urgent > 0.0 {
            SentimentLabel::Urgent
        } else if score > 0.2 {
            SentimentLabel::Positive
        } else if score < -0.2 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Ok(SentimentData::new(
            score,
            label,
            summarize(text),
            detect_language(text).unwrap_or_else(|| "Unknown".to_string()),
        ))
    }

    fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        match detect_language(text) {
            Some(language) if language.eq_ignore_ascii_case(target_language) => {
                Ok(text.to_string())
            }
            _ => bail!("Offline enricher cannot translate into {target_language}"),
        }
    }

    fn draft_response(&self, complaint_text: &str, company_name: &str) -> Result<String> {
        let sentiment = self.analyze(complaint_text)?;
        let opening = match sentiment.label {
            SentimentLabel::Urgent => "We understand this needs immediate attention",
            SentimentLabel::Negative => "We are sorry about the experience you described",
            SentimentLabel::Neutral => "Thank you for bringing this to our attention",
            SentimentLabel::Positive => "Thank you for your kind words",
        };
        Ok(format!(
            "{opening}. The {company_name} support team is reviewing your report and will update this thread as soon as we know more."
        ))
    }

    fn lookup_businesses(&self, _country: &str, _industry: &str) -> Result<Vec<BusinessListing>> {
        bail!("Business lookup requires a live enrichment backend")
    }

    fn resolve_country(&self, _latitude: f64, _longitude: f64) -> Result<String> {
        bail!("Country resolution requires a live enrichment backend")
    }
}

fn detect_language(text: &str) -> Option<String> {
    detect(text).map(|info| info.lang().eng_name().to_string())
}

fn summarize(text: &str) -> String {
    let first = text
        .split_terminator(&['.', '!', '?', '\n'][..])
        .map(str::trim)
        .find(|sentence| !sentence.is_empty())
        .unwrap_or("");
    if first.chars().count() <= SUMMARY_LIMIT {
        return first.to_string();
    }
    let mut cut: String = first.chars().take(SUMMARY_LIMIT).collect();
    cut.push_str("...");
    cut
}
