use super::SentimentData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A post in a complaint's discussion. Content never changes after posting;
/// only the vote/report sets and the reply list grow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_official_response: bool,
    pub attachment: Option<String>,
    #[serde(default)]
    pub replies: Vec<Comment>,
    #[serde(default)]
    pub upvotes: BTreeSet<Uuid>,
    pub sentiment: Option<SentimentData>,
    #[serde(default)]
    pub reported_by: BTreeSet<Uuid>,
}

impl Comment {
    pub fn upvote_count(&self) -> u32 {
        self.upvotes.len() as u32
    }

    pub fn is_reported(&self) -> bool {
        !self.reported_by.is_empty()
    }
}

/// Input for posting a comment or a reply.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub content: String,
    pub attachment: Option<String>,
    pub parent_id: Option<Uuid>,
    pub sentiment: Option<SentimentData>,
}

impl NewComment {
    pub fn text(content: &str) -> Self {
        Self {
            content: content.to_string(),
            ..Self::default()
        }
    }

    pub fn reply_to(parent_id: Uuid, content: &str) -> Self {
        Self {
            content: content.to_string(),
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }

    pub fn with_sentiment(mut self, sentiment: SentimentData) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachment = Some(attachment.into());
        self
    }
}
