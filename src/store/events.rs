use crate::enrichment::EnrichmentTarget;
use crate::models::{CommentId, ComplaintId, ComplaintStatus, UserId};
use serde::{Deserialize, Serialize};

/// Emitted after every mutation that changed the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum StoreEvent {
    UserRegistered {
        user_id: UserId,
    },
    ProfileUpdated {
        user_id: UserId,
    },
    ComplaintCreated {
        complaint_id: ComplaintId,
        task_key: String,
    },
    ComplaintUpdated {
        complaint_id: ComplaintId,
    },
    ComplaintDeleted {
        complaint_id: ComplaintId,
        actor_id: UserId,
    },
    VoteChanged {
        complaint_id: ComplaintId,
        user_id: UserId,
        upvoted: bool,
        downvoted: bool,
    },
    StatusChanged {
        complaint_id: ComplaintId,
        from: ComplaintStatus,
        to: ComplaintStatus,
        actor_id: UserId,
    },
    Assigned {
        complaint_id: ComplaintId,
        assignee_id: UserId,
    },
    CommentAdded {
        complaint_id: ComplaintId,
        comment_id: CommentId,
        parent_id: Option<CommentId>,
    },
    CommentUpvoteToggled {
        complaint_id: ComplaintId,
        comment_id: CommentId,
        user_id: UserId,
    },
    CommentReported {
        complaint_id: ComplaintId,
        comment_id: CommentId,
        user_id: UserId,
    },
    FeedbackSubmitted {
        complaint_id: ComplaintId,
        rating: u8,
    },
    ComplaintViewed {
        complaint_id: ComplaintId,
    },
    EnrichmentApplied {
        target: EnrichmentTarget,
        fallback: bool,
    },
}

impl StoreEvent {
    pub fn complaint_id(&self) -> Option<ComplaintId> {
        match self {
            StoreEvent::UserRegistered { .. } | StoreEvent::ProfileUpdated { .. } => None,
            StoreEvent::ComplaintCreated { complaint_id, .. }
            | StoreEvent::ComplaintUpdated { complaint_id }
            | StoreEvent::ComplaintDeleted { complaint_id, .. }
            | StoreEvent::VoteChanged { complaint_id, .. }
            | StoreEvent::StatusChanged { complaint_id, .. }
            | StoreEvent::Assigned { complaint_id, .. }
            | StoreEvent::CommentAdded { complaint_id, .. }
            | StoreEvent::CommentUpvoteToggled { complaint_id, .. }
            | StoreEvent::CommentReported { complaint_id, .. }
            | StoreEvent::FeedbackSubmitted { complaint_id, .. }
            | StoreEvent::ComplaintViewed { complaint_id } => Some(*complaint_id),
            StoreEvent::EnrichmentApplied { target, .. } => Some(target.complaint_id()),
        }
    }
}

/// Receives store events synchronously, after the snapshot was saved.
pub trait StoreObserver: Send {
    fn on_event(&self, event: &StoreEvent);
}

impl<F> StoreObserver for F
where
    F: Fn(&StoreEvent) + Send,
{
    fn on_event(&self, event: &StoreEvent) {
        self(event)
    }
}
