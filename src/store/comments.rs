use super::{ComplaintStore, EntityKind, Outcome, StoreError, StoreEvent, StoreResult};
use crate::enrichment::{EnrichmentJob, EnrichmentTarget};
use crate::models::{Comment, CommentId, ComplaintId, NewComment, UserId};
use crate::threads;
use chrono::Utc;
use std::collections::BTreeSet;
use uuid::Uuid;

impl ComplaintStore {
    /// Posts a comment, or a reply when `request.parent_id` is set. Business
    /// authors post official responses. Without a supplied sentiment the
    /// comment is queued for enrichment.
    pub fn add_comment(
        &mut self,
        complaint_id: &ComplaintId,
        author_id: &UserId,
        request: NewComment,
    ) -> StoreResult<Comment> {
        let author = self.require_user(author_id)?.clone();
        if request.content.trim().is_empty() {
            return Err(StoreError::InvalidInput("Comment must not be empty".into()));
        }
        let needs_enrichment = request.sentiment.is_none();
        let parent_id = request.parent_id;
        let comment = Comment {
            id: Uuid::new_v4(),
            complaint_id: *complaint_id,
            author_id: author.id,
            author_name: author.name.clone(),
            content: request.content,
            timestamp: Utc::now(),
            is_official_response: author.is_business(),
            attachment: request.attachment,
            replies: Vec::new(),
            upvotes: BTreeSet::new(),
            sentiment: request.sentiment,
            reported_by: BTreeSet::new(),
        };

        let posted = comment.clone();
        self.modify_complaint(complaint_id, |current| {
            let mut updated = current.clone();
            updated.comments = threads::try_insert(&current.comments, comment, parent_id.as_ref())
                .ok_or_else(|| {
                    StoreError::not_found(EntityKind::Comment, parent_id.unwrap_or_default())
                })?;
            Ok(Some((
                updated,
                StoreEvent::CommentAdded {
                    complaint_id: current.id,
                    comment_id: posted.id,
                    parent_id,
                },
            )))
        })?;

        if needs_enrichment {
            self.submit_enrichment(EnrichmentJob::Sentiment {
                target: EnrichmentTarget::Comment {
                    complaint_id: *complaint_id,
                    comment_id: posted.id,
                },
                text: posted.content.clone(),
            });
        }
        Ok(posted)
    }

    pub fn toggle_comment_upvote(
        &mut self,
        complaint_id: &ComplaintId,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> StoreResult<Outcome> {
        self.require_user(user_id)?;
        let user_id = *user_id;
        let comment_id = *comment_id;
        self.modify_complaint(complaint_id, |current| {
            if !threads::contains(&current.comments, &comment_id) {
                return Err(StoreError::not_found(EntityKind::Comment, comment_id));
            }
            let mut updated = current.clone();
            updated.comments = threads::toggle_upvote(&current.comments, &comment_id, &user_id);
            Ok(Some((
                updated,
                StoreEvent::CommentUpvoteToggled {
                    complaint_id: current.id,
                    comment_id,
                    user_id,
                },
            )))
        })
    }

    /// Flags a comment for moderation. Reporting twice changes nothing.
    pub fn report_comment(
        &mut self,
        complaint_id: &ComplaintId,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> StoreResult<Outcome> {
        self.require_user(user_id)?;
        let user_id = *user_id;
        let comment_id = *comment_id;
        self.modify_complaint(complaint_id, |current| {
            let existing = threads::find(&current.comments, &comment_id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Comment, comment_id))?;
            if existing.reported_by.contains(&user_id) {
                return Ok(None);
            }
            let mut updated = current.clone();
            updated.comments = threads::mark_reported(&current.comments, &comment_id, &user_id);
            Ok(Some((
                updated,
                StoreEvent::CommentReported {
                    complaint_id: current.id,
                    comment_id,
                    user_id,
                },
            )))
        })
    }
}
