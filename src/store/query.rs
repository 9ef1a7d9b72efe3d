//! Read-only views over the store: filtering, sorting, per-company figures
//! and the moderation queue.

use super::{ComplaintStore, EntityKind, StoreError, StoreResult};
use crate::models::{Comment, Complaint, ComplaintId, ComplaintStatus, SentimentLabel, UserId};
use crate::threads::{self, ContributorScore};
use serde::Serialize;
use std::collections::BTreeMap;

/// All set criteria must match.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub author_id: Option<UserId>,
    pub company: Option<String>,
    pub status: Option<ComplaintStatus>,
    /// Case-insensitive match against title or company name.
    pub text: Option<String>,
    pub sentiment: Option<SentimentLabel>,
}

impl ComplaintFilter {
    pub fn by_author(author_id: UserId) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    pub fn by_company(company: &str) -> Self {
        Self {
            company: Some(company.to_string()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ComplaintStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_sentiment(mut self, label: SentimentLabel) -> Self {
        self.sentiment = Some(label);
        self
    }

    pub fn matches(&self, complaint: &Complaint) -> bool {
        if let Some(author_id) = &self.author_id {
            if &complaint.author_id != author_id {
                return false;
            }
        }
        if let Some(company) = &self.company {
            if !complaint.company_name.eq_ignore_ascii_case(company.trim()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if complaint.status != status {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let needle = text.trim().to_lowercase();
            if !needle.is_empty()
                && !complaint.title.to_lowercase().contains(&needle)
                && !complaint.company_name.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(label) = self.sentiment {
            if complaint.sentiment.as_ref().map(|s| s.label) != Some(label) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    MostUpvoted,
    HighestImpact,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompanyStats {
    pub company: String,
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    /// Share of complaints currently resolved, in `[0, 1]`.
    pub resolution_rate: f64,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct FlaggedComment<'a> {
    pub complaint_id: ComplaintId,
    pub comment: &'a Comment,
}

impl ComplaintStore {
    pub fn list(&self, filter: &ComplaintFilter, order: SortOrder) -> Vec<&Complaint> {
        let mut matches: Vec<&Complaint> = self
            .complaints()
            .iter()
            .filter(|complaint| filter.matches(complaint))
            .collect();
        match order {
            SortOrder::Newest => matches.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then(b.task_seq.cmp(&a.task_seq))
            }),
            SortOrder::Oldest => matches.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then(a.task_seq.cmp(&b.task_seq))
            }),
            SortOrder::MostUpvoted => matches.sort_by(|a, b| {
                b.vote_score()
                    .cmp(&a.vote_score())
                    .then(a.task_seq.cmp(&b.task_seq))
            }),
            SortOrder::HighestImpact => matches.sort_by(|a, b| {
                b.impact_score
                    .cmp(&a.impact_score)
                    .then(a.task_seq.cmp(&b.task_seq))
            }),
        }
        matches
    }

    pub fn complaint_by_task_key(&self, task_key: &str) -> Option<&Complaint> {
        self.complaints()
            .iter()
            .find(|c| c.task_key.eq_ignore_ascii_case(task_key.trim()))
    }

    /// Highest scoring community commenter on one complaint.
    pub fn top_contributor(&self, id: &ComplaintId) -> StoreResult<Option<ContributorScore>> {
        self.complaint(id)
            .map(|complaint| threads::top_contributor(&complaint.comments))
            .ok_or_else(|| StoreError::not_found(EntityKind::Complaint, *id))
    }

    pub fn company_stats(&self, company: &str) -> CompanyStats {
        let filter = ComplaintFilter::by_company(company);
        let complaints: Vec<&Complaint> = self
            .complaints()
            .iter()
            .filter(|c| filter.matches(c))
            .collect();
        let mut by_status: BTreeMap<String, usize> = ComplaintStatus::ALL
            .iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        for complaint in &complaints {
            *by_status.entry(complaint.status.to_string()).or_default() += 1;
        }
        let resolved = complaints
            .iter()
            .filter(|c| c.status == ComplaintStatus::Resolved)
            .count();
        let ratings: Vec<f64> = complaints
            .iter()
            .filter_map(|c| c.rating.map(f64::from))
            .collect();
        CompanyStats {
            company: company.trim().to_string(),
            total: complaints.len(),
            by_status,
            resolution_rate: if complaints.is_empty() {
                0.0
            } else {
                resolved as f64 / complaints.len() as f64
            },
            average_rating: if ratings.is_empty() {
                None
            } else {
                Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
            },
        }
    }

    /// Moderation queue: every reported comment across all complaints.
    pub fn flagged_comments(&self) -> Vec<FlaggedComment<'_>> {
        self.complaints()
            .iter()
            .flat_map(|complaint| {
                threads::flagged(&complaint.comments)
                    .into_iter()
                    .map(move |comment| FlaggedComment {
                        complaint_id: complaint.id,
                        comment,
                    })
            })
            .collect()
    }
}
