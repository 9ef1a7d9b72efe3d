use super::{analyze_or_fallback, translate_or_fallback, Enricher};
use crate::models::{CommentId, ComplaintId, SentimentData};
use anyhow::{Context, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

/// Entity an enrichment result is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnrichmentTarget {
    Complaint {
        complaint_id: ComplaintId,
    },
    Comment {
        complaint_id: ComplaintId,
        comment_id: CommentId,
    },
}

impl EnrichmentTarget {
    pub fn complaint_id(&self) -> ComplaintId {
        match self {
            EnrichmentTarget::Complaint { complaint_id }
            | EnrichmentTarget::Comment { complaint_id, .. } => *complaint_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentJob {
    Sentiment {
        target: EnrichmentTarget,
        text: String,
    },
    Translation {
        complaint_id: ComplaintId,
        text: String,
        language: String,
    },
}

impl EnrichmentJob {
    pub fn target(&self) -> EnrichmentTarget {
        match self {
            EnrichmentJob::Sentiment { target, .. } => *target,
            EnrichmentJob::Translation { complaint_id, .. } => EnrichmentTarget::Complaint {
                complaint_id: *complaint_id,
            },
        }
    }

    /// Runs the job against the backend, never failing.
    pub fn run(&self, enricher: &dyn Enricher) -> EnrichmentOutput {
        match self {
            EnrichmentJob::Sentiment { text, .. } => {
                EnrichmentOutput::Sentiment(analyze_or_fallback(enricher, text))
            }
            EnrichmentJob::Translation { text, language, .. } => EnrichmentOutput::Translation {
                language: language.clone(),
                text: translate_or_fallback(enricher, text, language),
            },
        }
    }

    /// Output used when the job is abandoned or cannot run.
    pub fn fallback(&self) -> EnrichmentOutput {
        match self {
            EnrichmentJob::Sentiment { .. } => {
                EnrichmentOutput::Sentiment(SentimentData::unavailable())
            }
            EnrichmentJob::Translation { text, language, .. } => EnrichmentOutput::Translation {
                language: language.clone(),
                text: text.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutput {
    Sentiment(SentimentData),
    Translation { language: String, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    pub ticket: u64,
    pub target: EnrichmentTarget,
    pub output: EnrichmentOutput,
}

/// Runs enrichment jobs detached on a small thread pool. Finished results
/// queue up on a channel until the store's single writer collects them.
pub struct EnrichmentWorker {
    pool: ThreadPool,
    enricher: Arc<dyn Enricher>,
    sender: Sender<EnrichmentResult>,
    receiver: Receiver<EnrichmentResult>,
}

impl EnrichmentWorker {
    pub fn new(enricher: Arc<dyn Enricher>, threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|index| format!("enrichment-{index}"))
            .build()
            .context("Failed to configure enrichment thread pool")?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            pool,
            enricher,
            sender,
            receiver,
        })
    }

    pub fn submit(&self, ticket: u64, job: EnrichmentJob) {
        let enricher = Arc::clone(&self.enricher);
        let sender = self.sender.clone();
        self.pool.spawn(move || {
            let output = job.run(enricher.as_ref());
            // The receiver only goes away with the store itself.
            let _ = sender.send(EnrichmentResult {
                ticket,
                target: job.target(),
                output,
            });
        });
    }

    pub fn try_recv(&self) -> Option<EnrichmentResult> {
        self.receiver.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EnrichmentResult> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
