//! Boundary to the sentiment/translation service.
//!
//! Every capability is best-effort. Callers go through the `*_or_fallback`
//! helpers, which swap any failure for a fixed sentinel so enrichment can
//! never fail the operation that triggered it.

mod lexicon;
mod worker;

pub use lexicon::LexiconEnricher;
pub use worker::{EnrichmentJob, EnrichmentOutput, EnrichmentResult, EnrichmentTarget, EnrichmentWorker};

use crate::models::SentimentData;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Country reported when a location cannot be resolved.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessListing {
    pub name: String,
    pub logo_url: Option<String>,
}

pub trait Enricher: Send + Sync {
    fn analyze(&self, text: &str) -> Result<SentimentData>;

    fn translate(&self, text: &str, target_language: &str) -> Result<String>;

    fn draft_response(&self, complaint_text: &str, company_name: &str) -> Result<String>;

    fn lookup_businesses(&self, country: &str, industry: &str) -> Result<Vec<BusinessListing>>;

    fn resolve_country(&self, latitude: f64, longitude: f64) -> Result<String>;
}

/// Stand-in used when no backend or credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEnricher;

impl Enricher for DisabledEnricher {
    fn analyze(&self, _text: &str) -> Result<SentimentData> {
        bail!("Enrichment backend is not configured")
    }

    fn translate(&self, _text: &str, _target_language: &str) -> Result<String> {
        bail!("Enrichment backend is not configured")
    }

    fn draft_response(&self, _complaint_text: &str, _company_name: &str) -> Result<String> {
        bail!("Enrichment backend is not configured")
    }

    fn lookup_businesses(&self, _country: &str, _industry: &str) -> Result<Vec<BusinessListing>> {
        bail!("Enrichment backend is not configured")
    }

    fn resolve_country(&self, _latitude: f64, _longitude: f64) -> Result<String> {
        bail!("Enrichment backend is not configured")
    }
}

pub fn analyze_or_fallback(enricher: &dyn Enricher, text: &str) -> SentimentData {
    enricher
        .analyze(text)
        .unwrap_or_else(|_| SentimentData::unavailable())
}

/// Falls back to the untranslated text.
pub fn translate_or_fallback(enricher: &dyn Enricher, text: &str, target_language: &str) -> String {
    enricher
        .translate(text, target_language)
        .unwrap_or_else(|_| text.to_string())
}

pub fn draft_response_or_fallback(
    enricher: &dyn Enricher,
    complaint_text: &str,
    company_name: &str,
) -> String {
    enricher
        .draft_response(complaint_text, company_name)
        .unwrap_or_else(|_| fallback_response(company_name))
}

pub fn lookup_businesses_or_empty(
    enricher: &dyn Enricher,
    country: &str,
    industry: &str,
) -> Vec<BusinessListing> {
    enricher
        .lookup_businesses(country, industry)
        .unwrap_or_default()
}

pub fn resolve_country_or_unknown(enricher: &dyn Enricher, latitude: f64, longitude: f64) -> String {
    enricher
        .resolve_country(latitude, longitude)
        .unwrap_or_else(|_| UNKNOWN_COUNTRY.to_string())
}

fn fallback_response(company_name: &str) -> String {
    format!(
        "Thank you for reaching out to {company_name}. We have received your complaint and a member of our team will follow up shortly."
    )
}
