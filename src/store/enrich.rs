use super::{ComplaintStore, EntityKind, Outcome, StoreError, StoreEvent, StoreResult};
use crate::enrichment::{EnrichmentJob, EnrichmentOutput, EnrichmentResult, EnrichmentTarget};
use crate::models::ComplaintId;
use crate::threads;
use std::time::{Duration, Instant};

/// A job still owed a result. `ready` holds an output whose save failed and
/// is waiting to be applied again.
pub(super) struct PendingJob {
    target: EnrichmentTarget,
    fallback: EnrichmentOutput,
    ready: Option<EnrichmentOutput>,
    issued_at: Instant,
}

impl PendingJob {
    fn new(job: &EnrichmentJob) -> Self {
        Self {
            target: job.target(),
            fallback: job.fallback(),
            ready: None,
            issued_at: Instant::now(),
        }
    }

    pub(super) fn target(&self) -> EnrichmentTarget {
        self.target
    }
}

impl ComplaintStore {
    /// Number of enrichment jobs still waiting for a result.
    pub fn pending_enrichment(&self) -> usize {
        self.pending.len()
    }

    /// Queues a translation of the complaint text. Without an explicit
    /// language the configured default is used.
    pub fn request_translation(
        &mut self,
        id: &ComplaintId,
        language: Option<&str>,
    ) -> StoreResult<()> {
        let complaint = self.require_complaint(id)?;
        let language = language
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .unwrap_or(&self.config.enrichment.default_language)
            .to_string();
        let job = EnrichmentJob::Translation {
            complaint_id: complaint.id,
            text: complaint.description.clone(),
            language,
        };
        self.submit_enrichment(job);
        Ok(())
    }

    pub(super) fn submit_enrichment(&mut self, job: EnrichmentJob) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending.insert(ticket, PendingJob::new(&job));
        match &self.worker {
            Some(worker) => worker.submit(ticket, job),
            None => {
                let result = EnrichmentResult {
                    ticket,
                    target: job.target(),
                    output: job.fallback(),
                };
                // A failed save keeps the job pending with its output ready;
                // the next drain applies it again.
                let _ = self.apply_enrichment(result);
            }
        }
    }

    /// Attaches a finished enrichment result. Results are applied in the
    /// order they arrive, so a later completion overwrites an earlier one.
    /// A target deleted in the meantime yields `NotFound` and changes nothing.
    /// If the save fails the output stays pending for the next drain.
    pub fn apply_enrichment(&mut self, result: EnrichmentResult) -> StoreResult<Outcome> {
        let EnrichmentResult {
            ticket,
            target,
            output,
        } = result;
        match self.attach(target, output.clone()) {
            Err(StoreError::Persistence(err)) => {
                let pending = self.pending.entry(ticket).or_insert_with(|| PendingJob {
                    target,
                    fallback: output.clone(),
                    ready: None,
                    issued_at: Instant::now(),
                });
                pending.ready = Some(output);
                Err(StoreError::Persistence(err))
            }
            settled => {
                self.pending.remove(&ticket);
                settled
            }
        }
    }

    fn attach(&mut self, target: EnrichmentTarget, output: EnrichmentOutput) -> StoreResult<Outcome> {
        let fallback = match &output {
            EnrichmentOutput::Sentiment(sentiment) => sentiment.is_unavailable(),
            EnrichmentOutput::Translation { .. } => false,
        };
        let event = StoreEvent::EnrichmentApplied { target, fallback };
        self.modify_complaint(&target.complaint_id(), |current| {
            let mut updated = current.clone();
            match (target, output) {
                (EnrichmentTarget::Complaint { .. }, EnrichmentOutput::Sentiment(sentiment)) => {
                    if !sentiment.is_unavailable() {
                        updated.language = Some(sentiment.language.clone());
                    }
                    updated.sentiment = Some(sentiment);
                }
                (
                    EnrichmentTarget::Complaint { .. },
                    EnrichmentOutput::Translation { language, text },
                ) => {
                    updated.translations.insert(language, text);
                }
                (
                    EnrichmentTarget::Comment { comment_id, .. },
                    EnrichmentOutput::Sentiment(sentiment),
                ) => {
                    updated.comments = threads::update(&current.comments, &comment_id, |comment| {
                        comment.sentiment = Some(sentiment)
                    })
                    .ok_or_else(|| StoreError::not_found(EntityKind::Comment, comment_id))?;
                }
                (EnrichmentTarget::Comment { .. }, EnrichmentOutput::Translation { .. }) => {
                    return Err(StoreError::InvalidInput(
                        "Comment translations are not stored".into(),
                    ));
                }
            }
            Ok(Some((updated, event)))
        })
    }

    /// Applies every result that has already arrived, retries outputs whose
    /// save failed earlier, then falls back to the sentinel for jobs pending
    /// longer than the configured timeout. Returns how many results were
    /// applied.
    pub fn drain_enrichment(&mut self) -> StoreResult<usize> {
        let mut applied = 0;
        while let Some(result) = self.next_finished(None) {
            applied += self.apply_quietly(result)?;
        }
        let timeout = Duration::from_millis(self.config.enrichment.timeout_ms);
        applied +=
            self.settle_pending(|job| job.ready.is_some() || job.issued_at.elapsed() >= timeout)?;
        Ok(applied)
    }

    /// Blocks for up to `max_wait` collecting results; whatever is still
    /// pending afterwards receives its retried output or the sentinel.
    pub fn wait_for_enrichment(&mut self, max_wait: Duration) -> StoreResult<usize> {
        let deadline = Instant::now() + max_wait;
        let mut applied = 0;
        while self.pending.values().any(|job| job.ready.is_none()) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.next_finished(Some(remaining)) {
                Some(result) => applied += self.apply_quietly(result)?,
                None => break,
            }
        }
        applied += self.settle_pending(|_| true)?;
        Ok(applied)
    }

    fn next_finished(&self, wait: Option<Duration>) -> Option<EnrichmentResult> {
        let worker = self.worker.as_ref()?;
        match wait {
            Some(timeout) => worker.recv_timeout(timeout),
            None => worker.try_recv(),
        }
    }

    /// Applies the ready output, or the fallback, of every pending job that
    /// `due` selects. Jobs whose save fails stay pending.
    fn settle_pending<P>(&mut self, due: P) -> StoreResult<usize>
    where
        P: Fn(&PendingJob) -> bool,
    {
        let mut due_jobs: Vec<EnrichmentResult> = self
            .pending
            .iter()
            .filter(|(_, job)| due(job))
            .map(|(ticket, job)| EnrichmentResult {
                ticket: *ticket,
                target: job.target,
                output: job.ready.clone().unwrap_or_else(|| job.fallback.clone()),
            })
            .collect();
        due_jobs.sort_unstable_by_key(|result| result.ticket);
        let mut applied = 0;
        for result in due_jobs {
            applied += self.apply_quietly(result)?;
        }
        Ok(applied)
    }

    /// Applies a result, treating a vanished target as a no-op.
    fn apply_quietly(&mut self, result: EnrichmentResult) -> StoreResult<usize> {
        match self.apply_enrichment(result) {
            Ok(Outcome::Applied) => Ok(1),
            Ok(Outcome::Unchanged) => Ok(0),
            Err(err) if err.is_not_found() => Ok(0),
            Err(err) => Err(err),
        }
    }
}
