//! Background work started by the slideshow and the liveness bookkeeping for its results.
//!
//! Every job carries a [`Ticket`]. The UI accepts a [`Completion`] only while its ticket is
//! still the live one for that kind; anything else is stale and dropped.

use std::path::PathBuf;
use std::sync::Arc;

use calltime_client::{GiftSender, RecapSource};
use calltime_core::gifts::{SendGiftRequest, SendGiftResponse};
use calltime_core::{RecapError, RecapSnapshot};
use ratatui::buffer::Buffer;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::capture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Fetch,
    SendGifts,
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: TaskKind,
    pub generation: u64,
}

/// Live tickets, at most one per kind.
#[derive(Debug, Default)]
pub struct TaskSlots {
    generation: u64,
    live: Vec<(Ticket, CancellationToken)>,
}

impl TaskSlots {
    /// Start a task of `kind`. Any in-flight task of the same kind is cancelled and its
    /// result will be ignored.
    pub fn begin(&mut self, kind: TaskKind) -> (Ticket, CancellationToken) {
        self.cancel(kind);
        self.generation += 1;
        let ticket = Ticket {
            kind,
            generation: self.generation,
        };
        let token = CancellationToken::new();
        self.live.push((ticket, token.clone()));
        (ticket, token)
    }

    pub fn in_flight(&self, kind: TaskKind) -> bool {
        self.live.iter().any(|(t, _)| t.kind == kind)
    }

    /// Retire `ticket` if it is live. Returns false for stale results.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        match self.live.iter().position(|(t, _)| *t == ticket) {
            Some(pos) => {
                self.live.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self, kind: TaskKind) {
        self.live.retain(|(t, token)| {
            if t.kind == kind {
                token.cancel();
                false
            } else {
                true
            }
        });
    }

    pub fn cancel_all(&mut self) {
        for (_, token) in self.live.drain(..) {
            token.cancel();
        }
    }
}

// ── Jobs ──

#[derive(Debug)]
pub enum Job {
    Fetch {
        ticket: Ticket,
        token: CancellationToken,
        user_id: String,
        year: i32,
    },
    SendGifts {
        ticket: Ticket,
        token: CancellationToken,
        request: SendGiftRequest,
    },
    Capture {
        ticket: Ticket,
        token: CancellationToken,
        frame: Buffer,
        path: PathBuf,
    },
}

impl Job {
    fn ticket(&self) -> (Ticket, CancellationToken) {
        match self {
            Job::Fetch { ticket, token, .. }
            | Job::SendGifts { ticket, token, .. }
            | Job::Capture { ticket, token, .. } => (*ticket, token.clone()),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Fetched(Result<RecapSnapshot, RecapError>),
    GiftsSent(Result<SendGiftResponse, RecapError>),
    Captured(Result<PathBuf, RecapError>),
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// Backends the jobs talk to.
#[derive(Clone)]
pub struct Services {
    pub source: Arc<dyn RecapSource>,
    pub sender: Arc<dyn GiftSender>,
}

/// Run `job` on the runtime and report its outcome on `tx`, unless it is cancelled first.
pub fn spawn(
    handle: &tokio::runtime::Handle,
    services: &Services,
    job: Job,
    tx: UnboundedSender<Completion>,
) {
    let (ticket, token) = job.ticket();
    let services = services.clone();
    tracing::debug!(?ticket, "task started");
    handle.spawn(async move {
        let outcome = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(?ticket, "task cancelled");
                return;
            }
            outcome = run_job(&services, job) => outcome,
        };
        if tx.send(Completion { ticket, outcome }).is_err() {
            tracing::debug!(?ticket, "ui loop gone, result dropped");
        }
    });
}

async fn run_job(services: &Services, job: Job) -> Outcome {
    match job {
        Job::Fetch { user_id, year, .. } => {
            Outcome::Fetched(services.source.fetch(&user_id, year).await)
        }
        Job::SendGifts { request, .. } => Outcome::GiftsSent(services.sender.send(request).await),
        Job::Capture { frame, path, .. } => {
            let saved = tokio::task::spawn_blocking(move || {
                capture::save_png(&frame, &path).map(|()| path)
            })
            .await
            .unwrap_or_else(|e| Err(RecapError::Capture(e.to_string())));
            Outcome::Captured(saved)
        }
    }
}
