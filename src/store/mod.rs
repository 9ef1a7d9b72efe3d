//! Single source of truth for users and complaints.
//!
//! The store is driven by one writer. Each mutation validates, builds the
//! replacement entity, swaps it in, writes the snapshot through and only
//! then notifies observers; a failed save rolls the swap back. Enrichment
//! runs detached and comes back through [`ComplaintStore::apply_enrichment`].

mod comments;
mod enrich;
mod error;
mod events;
pub mod query;
mod users;

pub use error::{EntityKind, Outcome, StoreError, StoreResult};
pub use events::{StoreEvent, StoreObserver};
pub use query::{CompanyStats, ComplaintFilter, FlaggedComment, SortOrder};

use crate::activity::ActivityLog;
use crate::config::{self, AppConfig};
use crate::enrichment::{Enricher, EnrichmentJob, EnrichmentTarget, EnrichmentWorker, LexiconEnricher};
use crate::models::{
    Complaint, ComplaintId, ComplaintPatch, ComplaintStatus, HistoryEntry, NewComplaint, Priority,
    Role, User, UserId,
};
use crate::persistence::{JsonSnapshotFile, Snapshot, SnapshotPersistence};
use anyhow::Result;
use chrono::Utc;
use enrich::PendingJob;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use uuid::Uuid;

pub struct ComplaintStore {
    config: AppConfig,
    state: Snapshot,
    persistence: Box<dyn SnapshotPersistence>,
    observers: Vec<Box<dyn StoreObserver>>,
    worker: Option<EnrichmentWorker>,
    pending: HashMap<u64, PendingJob>,
    next_ticket: u64,
}

impl ComplaintStore {
    /// Loads the last snapshot (or starts empty) and spins up the enrichment
    /// pool when enrichment is enabled.
    pub fn open(
        config: AppConfig,
        persistence: Box<dyn SnapshotPersistence>,
        enricher: Arc<dyn Enricher>,
    ) -> Result<Self> {
        let mut state = persistence.load()?.unwrap_or_else(Snapshot::empty);
        let highest_seq = state.complaints.iter().map(|c| c.task_seq).max().unwrap_or(0);
        state.next_task_seq = state.next_task_seq.max(highest_seq + 1);
        let worker = if config.enrichment.enabled {
            Some(EnrichmentWorker::new(
                enricher,
                config.enrichment.worker_threads as usize,
            )?)
        } else {
            None
        };
        Ok(Self {
            config,
            state,
            persistence,
            observers: Vec::new(),
            worker,
            pending: HashMap::new(),
            next_ticket: 1,
        })
    }

    /// Opens the store rooted at the configured workspace: JSON snapshot in
    /// `data/`, activity log in `logs/`, offline enrichment.
    pub fn open_workspace() -> Result<Self> {
        let paths = config::ensure_workspace_structure()?;
        let app_config = config::load_or_default()?;
        let mut store = Self::open(
            app_config,
            Box::new(JsonSnapshotFile::new(paths.snapshot_path())),
            Arc::new(LexiconEnricher::new()),
        )?;
        store.subscribe(Box::new(ActivityLog::new(paths.activity_log_path())));
        Ok(store)
    }

    pub fn subscribe(&mut self, observer: Box<dyn StoreObserver>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    pub fn complaints(&self) -> &[Complaint] {
        &self.state.complaints
    }

    pub fn complaint(&self, id: &ComplaintId) -> Option<&Complaint> {
        self.state.complaints.iter().find(|c| &c.id == id)
    }

    pub fn users(&self) -> &[User] {
        &self.state.users
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.state.users.iter().find(|u| &u.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.state.users.iter().find(|u| u.email_matches(email))
    }

    /// Sequence number the next complaint will receive.
    pub fn next_task_seq(&self) -> u64 {
        self.state.next_task_seq
    }

    pub fn create_complaint(
        &mut self,
        author_id: &UserId,
        request: NewComplaint,
    ) -> StoreResult<Complaint> {
        let author = self.require_user(author_id)?.clone();
        if author.role == Role::Admin {
            return Err(StoreError::Forbidden(
                "Admins moderate complaints but cannot file them".into(),
            ));
        }
        require_text("title", Some(&request.title))?;
        require_text("description", Some(&request.description))?;
        require_text("company name", Some(&request.company_name))?;

        let now = Utc::now();
        let task_seq = self.state.next_task_seq;
        let complaint = Complaint {
            id: Uuid::new_v4(),
            task_seq,
            task_key: format!("{}-{}", self.config.store.task_key_prefix, task_seq),
            title: request.title,
            description: request.description,
            category: request.category,
            company_name: request.company_name,
            status: ComplaintStatus::Open,
            priority: Priority::Medium,
            author_id: author.id,
            author_name: author.name,
            assignee_id: None,
            assignee_name: None,
            created_at: now,
            updated_at: now,
            upvoted_by: BTreeSet::new(),
            downvoted_by: BTreeSet::new(),
            comments: Vec::new(),
            sentiment: None,
            language: None,
            translations: BTreeMap::new(),
            tags: request.tags.into_iter().collect(),
            history: vec![HistoryEntry {
                status: ComplaintStatus::Open,
                timestamp: now,
            }],
            rating: None,
            feedback: None,
            attachment: request.attachment,
            views: 0,
            impact_score: self.placeholder_impact_score(),
        };

        self.state.complaints.push(complaint.clone());
        self.state.next_task_seq += 1;
        if let Err(err) = self.persist() {
            self.state.complaints.pop();
            self.state.next_task_seq = task_seq;
            return Err(err);
        }
        self.notify(&StoreEvent::ComplaintCreated {
            complaint_id: complaint.id,
            task_key: complaint.task_key.clone(),
        });
        self.submit_enrichment(EnrichmentJob::Sentiment {
            target: EnrichmentTarget::Complaint {
                complaint_id: complaint.id,
            },
            text: complaint_text(&complaint),
        });
        Ok(complaint)
    }

    /// Merges the given fields into an open complaint. Changing the title or
    /// description queues a fresh sentiment pass.
    pub fn update_complaint(
        &mut self,
        id: &ComplaintId,
        patch: ComplaintPatch,
    ) -> StoreResult<Outcome> {
        if patch.is_empty() {
            self.require_complaint(id)?;
            return Ok(Outcome::Unchanged);
        }
        require_text("title", patch.title.as_ref())?;
        require_text("description", patch.description.as_ref())?;
        require_text("company name", patch.company_name.as_ref())?;
        let text_changed = patch.title.is_some() || patch.description.is_some();
        let outcome = self.modify_complaint(id, |current| {
            if current.status != ComplaintStatus::Open {
                return Err(StoreError::InvalidState(format!(
                    "{} is {} and can no longer be edited",
                    current.task_key, current.status
                )));
            }
            let mut updated = current.clone();
            if !patch.apply_to(&mut updated) {
                return Ok(None);
            }
            updated.updated_at = Utc::now();
            Ok(Some((
                updated,
                StoreEvent::ComplaintUpdated {
                    complaint_id: current.id,
                },
            )))
        })?;
        if outcome.applied() && text_changed {
            if let Some(complaint) = self.complaint(id) {
                let job = EnrichmentJob::Sentiment {
                    target: EnrichmentTarget::Complaint { complaint_id: *id },
                    text: complaint_text(complaint),
                };
                self.submit_enrichment(job);
            }
        }
        Ok(outcome)
    }

    /// Removes a complaint with its whole thread. Only the author or an admin
    /// may delete.
    pub fn delete_complaint(&mut self, id: &ComplaintId, actor_id: &UserId) -> StoreResult<Outcome> {
        let actor = self.require_user(actor_id)?;
        let is_admin = actor.is_admin();
        let index = self.complaint_index(id)?;
        if !is_admin && !self.state.complaints[index].is_authored_by(actor_id) {
            return Err(StoreError::Forbidden(
                "Only the author or an admin can delete a complaint".into(),
            ));
        }
        let removed = self.state.complaints.remove(index);
        if let Err(err) = self.persist() {
            self.state.complaints.insert(index, removed);
            return Err(err);
        }
        self.pending
            .retain(|_, job| job.target().complaint_id() != removed.id);
        self.notify(&StoreEvent::ComplaintDeleted {
            complaint_id: removed.id,
            actor_id: *actor_id,
        });
        Ok(Outcome::Applied)
    }

    pub fn toggle_upvote(&mut self, id: &ComplaintId, user_id: &UserId) -> StoreResult<Outcome> {
        self.toggle_vote(id, user_id, true)
    }

    pub fn toggle_downvote(&mut self, id: &ComplaintId, user_id: &UserId) -> StoreResult<Outcome> {
        self.toggle_vote(id, user_id, false)
    }

    /// Flips the user's membership in one vote set and always clears the
    /// other, so a user never holds both votes.
    fn toggle_vote(&mut self, id: &ComplaintId, user_id: &UserId, up: bool) -> StoreResult<Outcome> {
        self.require_user(user_id)?;
        let user_id = *user_id;
        self.modify_complaint(id, |current| {
            let mut updated = current.clone();
            let (chosen, opposite) = if up {
                (&mut updated.upvoted_by, &mut updated.downvoted_by)
            } else {
                (&mut updated.downvoted_by, &mut updated.upvoted_by)
            };
            if !chosen.remove(&user_id) {
                chosen.insert(user_id);
            }
            opposite.remove(&user_id);
            let event = StoreEvent::VoteChanged {
                complaint_id: updated.id,
                user_id,
                upvoted: updated.upvoted_by.contains(&user_id),
                downvoted: updated.downvoted_by.contains(&user_id),
            };
            Ok(Some((updated, event)))
        })
    }

    /// Moves a complaint to `new_status`, appending to its history. A business
    /// user picking a complaint up becomes its assignee.
    pub fn update_status(
        &mut self,
        id: &ComplaintId,
        new_status: ComplaintStatus,
        actor_id: &UserId,
    ) -> StoreResult<Outcome> {
        let actor = self.require_user(actor_id)?.clone();
        if actor.role == Role::Customer {
            return Err(StoreError::Forbidden(
                "Only business or admin users can change a complaint's status".into(),
            ));
        }
        let strict = self.config.store.strict_transitions;
        self.modify_complaint(id, |current| {
            if current.status == new_status {
                return Ok(None);
            }
            if strict && !current.status.can_transition_to(new_status) {
                return Err(StoreError::InvalidState(format!(
                    "{} cannot move from {} to {}",
                    current.task_key, current.status, new_status
                )));
            }
            let mut updated = current.clone();
            let now = Utc::now();
            // Keep history ordered even if the clock steps backwards.
            let timestamp = current
                .last_history_entry()
                .map(|last| last.timestamp.max(now))
                .unwrap_or(now);
            updated.history.push(HistoryEntry {
                status: new_status,
                timestamp,
            });
            updated.status = new_status;
            updated.updated_at = timestamp;
            if new_status == ComplaintStatus::InProgress && actor.is_business() {
                updated.assignee_id = Some(actor.id);
                updated.assignee_name = Some(actor.name.clone());
            }
            Ok(Some((
                updated,
                StoreEvent::StatusChanged {
                    complaint_id: current.id,
                    from: current.status,
                    to: new_status,
                    actor_id: actor.id,
                },
            )))
        })
    }

    /// Hands a complaint to a business user.
    pub fn assign(&mut self, id: &ComplaintId, assignee_id: &UserId) -> StoreResult<Outcome> {
        let assignee = self.require_user(assignee_id)?.clone();
        if !assignee.is_business() {
            return Err(StoreError::InvalidInput(format!(
                "{} is not a business user",
                assignee.name
            )));
        }
        self.modify_complaint(id, |current| {
            if current.assignee_id == Some(assignee.id) {
                return Ok(None);
            }
            let mut updated = current.clone();
            updated.assignee_id = Some(assignee.id);
            updated.assignee_name = Some(assignee.name.clone());
            updated.updated_at = Utc::now();
            Ok(Some((
                updated,
                StoreEvent::Assigned {
                    complaint_id: current.id,
                    assignee_id: assignee.id,
                },
            )))
        })
    }

    /// Records the author's rating of a resolved complaint. A rating can only
    /// be given once.
    pub fn submit_feedback(
        &mut self,
        id: &ComplaintId,
        rating: u8,
        feedback: &str,
    ) -> StoreResult<Outcome> {
        if !(1..=5).contains(&rating) {
            return Err(StoreError::InvalidInput(format!(
                "Rating must be between 1 and 5, got {rating}"
            )));
        }
        let feedback = feedback.trim().to_string();
        self.modify_complaint(id, |current| {
            if current.status != ComplaintStatus::Resolved {
                return Err(StoreError::InvalidState(format!(
                    "{} is {}; only resolved complaints can be rated",
                    current.task_key, current.status
                )));
            }
            if current.rating.is_some() {
                return Err(StoreError::InvalidState(format!(
                    "{} has already been rated",
                    current.task_key
                )));
            }
            let mut updated = current.clone();
            updated.rating = Some(rating);
            updated.feedback = (!feedback.is_empty()).then_some(feedback);
            Ok(Some((
                updated,
                StoreEvent::FeedbackSubmitted {
                    complaint_id: current.id,
                    rating,
                },
            )))
        })
    }

    pub fn record_view(&mut self, id: &ComplaintId) -> StoreResult<Outcome> {
        self.modify_complaint(id, |current| {
            let mut updated = current.clone();
            updated.views += 1;
            Ok(Some((
                updated,
                StoreEvent::ComplaintViewed {
                    complaint_id: current.id,
                },
            )))
        })
    }

    fn placeholder_impact_score(&self) -> u32 {
        let settings = &self.config.store;
        let low = settings.impact_score_min.min(settings.impact_score_max);
        let high = settings.impact_score_min.max(settings.impact_score_max);
        rand::thread_rng().gen_range(low..=high)
    }

    fn require_user(&self, id: &UserId) -> StoreResult<&User> {
        self.user(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::User, *id))
    }

    fn require_complaint(&self, id: &ComplaintId) -> StoreResult<&Complaint> {
        self.complaint(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Complaint, *id))
    }

    fn complaint_index(&self, id: &ComplaintId) -> StoreResult<usize> {
        self.state
            .complaints
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Complaint, *id))
    }

    /// Replaces one complaint with the version built by `edit`. `Ok(None)`
    /// from `edit` means nothing changed and nothing is saved.
    fn modify_complaint<F>(&mut self, id: &ComplaintId, edit: F) -> StoreResult<Outcome>
    where
        F: FnOnce(&Complaint) -> StoreResult<Option<(Complaint, StoreEvent)>>,
    {
        let index = self.complaint_index(id)?;
        let Some((updated, event)) = edit(&self.state.complaints[index])? else {
            return Ok(Outcome::Unchanged);
        };
        let previous = std::mem::replace(&mut self.state.complaints[index], updated);
        if let Err(err) = self.persist() {
            self.state.complaints[index] = previous;
            return Err(err);
        }
        self.notify(&event);
        Ok(Outcome::Applied)
    }

    fn persist(&self) -> StoreResult<()> {
        self.persistence
            .save(&self.state)
            .map_err(StoreError::Persistence)
    }

    fn notify(&self, event: &StoreEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

/// Rejects a provided value that is blank.
fn require_text(field: &str, value: Option<&String>) -> StoreResult<()> {
    match value {
        Some(value) if value.trim().is_empty() => Err(StoreError::InvalidInput(format!(
            "Complaint {field} must not be empty"
        ))),
        _ => Ok(()),
    }
}

fn complaint_text(complaint: &Complaint) -> String {
    format!("{}. {}", complaint.title, complaint.description)
}
