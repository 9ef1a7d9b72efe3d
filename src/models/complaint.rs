use super::{Comment, SentimentData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
    Escalated,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Open,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Escalated,
    ];

    /// Moves allowed when strict transitions are switched on.
    pub fn allowed_next(self) -> &'static [ComplaintStatus] {
        match self {
            ComplaintStatus::Open => &[ComplaintStatus::InProgress, ComplaintStatus::Escalated],
            ComplaintStatus::InProgress => {
                &[ComplaintStatus::Resolved, ComplaintStatus::Escalated]
            }
            ComplaintStatus::Resolved => &[],
            ComplaintStatus::Escalated => {
                &[ComplaintStatus::InProgress, ComplaintStatus::Resolved]
            }
        }
    }

    pub fn can_transition_to(self, next: ComplaintStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComplaintStatus::Open => "OPEN",
            ComplaintStatus::InProgress => "IN_PROGRESS",
            ComplaintStatus::Resolved => "RESOLVED",
            ComplaintStatus::Escalated => "ESCALATED",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub status: ComplaintStatus,
    pub timestamp: DateTime<Utc>,
}

/// A filed issue against a company together with its discussion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Complaint {
    pub id: Uuid,
    pub task_seq: u64,
    pub task_key: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub company_name: String,
    pub status: ComplaintStatus,
    pub priority: Priority,
    pub author_id: Uuid,
    pub author_name: String,
    pub assignee_id: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub upvoted_by: BTreeSet<Uuid>,
    pub downvoted_by: BTreeSet<Uuid>,
    pub comments: Vec<Comment>,
    pub sentiment: Option<SentimentData>,
    pub language: Option<String>,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    pub tags: BTreeSet<String>,
    pub history: Vec<HistoryEntry>,
    pub rating: Option<u8>,
    pub feedback: Option<String>,
    pub attachment: Option<String>,
    pub views: u64,
    pub impact_score: u32,
}

impl Complaint {
    /// Net vote balance shown next to the title.
    pub fn vote_score(&self) -> i64 {
        self.upvoted_by.len() as i64 - self.downvoted_by.len() as i64
    }

    pub fn last_history_entry(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    pub fn is_authored_by(&self, user_id: &Uuid) -> bool {
        &self.author_id == user_id
    }
}

/// Input for filing a complaint.
#[derive(Debug, Clone, Default)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: String,
    pub company_name: String,
    pub attachment: Option<String>,
    pub tags: Vec<String>,
}

impl NewComplaint {
    pub fn new(title: &str, description: &str, category: &str, company_name: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            company_name: company_name.to_string(),
            attachment: None,
            tags: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachment = Some(attachment.into());
        self
    }
}

/// Shallow field merge for an open complaint. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct ComplaintPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub company_name: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<BTreeSet<String>>,
    pub attachment: Option<Option<String>>,
}

impl ComplaintPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.company_name.is_none()
            && self.priority.is_none()
            && self.tags.is_none()
            && self.attachment.is_none()
    }

    pub(crate) fn apply_to(self, complaint: &mut Complaint) -> bool {
        let mut changed = false;
        if let Some(title) = self.title {
            changed |= complaint.title != title;
            complaint.title = title;
        }
        if let Some(description) = self.description {
            changed |= complaint.description != description;
            complaint.description = description;
        }
        if let Some(category) = self.category {
            changed |= complaint.category != category;
            complaint.category = category;
        }
        if let Some(company_name) = self.company_name {
            changed |= complaint.company_name != company_name;
            complaint.company_name = company_name;
        }
        if let Some(priority) = self.priority {
            changed |= complaint.priority != priority;
            complaint.priority = priority;
        }
        if let Some(tags) = self.tags {
            changed |= complaint.tags != tags;
            complaint.tags = tags;
        }
        if let Some(attachment) = self.attachment {
            changed |= complaint.attachment != attachment;
            complaint.attachment = attachment;
        }
        changed
    }
}
