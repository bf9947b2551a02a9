use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use calltime_core::{Collaborator, RecapError, RecapSnapshot};

use crate::{http, mock, Backend};

/// Simulated network delay of the mock source.
pub const MOCK_FETCH_LATENCY: Duration = Duration::from_millis(500);

/// Produces the recap for one user-year.
#[async_trait::async_trait]
pub trait RecapSource: Send + Sync {
    /// Single-shot fetch. Resolves to exactly one of snapshot or fetch failure.
    async fn fetch(&self, user_id: &str, year: i32) -> Result<RecapSnapshot, RecapError>;
}

/// Bundled sample data behind a fixed delay.
pub struct MockRecapSource {
    latency: Duration,
    failure: Option<String>,
    collaborators: Option<Vec<Collaborator>>,
    calls: AtomicUsize,
}

impl MockRecapSource {
    pub fn new() -> Self {
        Self {
            latency: MOCK_FETCH_LATENCY,
            failure: None,
            collaborators: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every fetch fail with `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Replace the sample collaborator list.
    pub fn with_collaborators(mut self, collaborators: Vec<Collaborator>) -> Self {
        self.collaborators = Some(collaborators);
        self
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRecapSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RecapSource for MockRecapSource {
    async fn fetch(&self, user_id: &str, year: i32) -> Result<RecapSnapshot, RecapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(user_id, year, "mock recap fetch");
        tokio::time::sleep(self.latency).await;
        if let Some(reason) = &self.failure {
            return Err(RecapError::Fetch(reason.clone()));
        }
        let mut snapshot = mock::sample_snapshot(user_id, year);
        if let Some(collaborators) = &self.collaborators {
            snapshot.collaborators = collaborators.clone();
        }
        Ok(snapshot)
    }
}

/// `GET {base}/recap/{user_id}/{year}`.
pub struct HttpRecapSource {
    backend: Backend,
}

impl HttpRecapSource {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

#[async_trait::async_trait]
impl RecapSource for HttpRecapSource {
    async fn fetch(&self, user_id: &str, year: i32) -> Result<RecapSnapshot, RecapError> {
        let url = self.backend.url(&format!(
            "recap/{}/{year}",
            calltime_core::share::encode_uri_component(user_id)
        ));
        let token = self.backend.auth_token.clone();
        tracing::info!(url = %url, "fetching recap");
        let result = tokio::task::spawn_blocking(move || {
            http::get_json::<RecapSnapshot>(&url, token.as_deref())
        })
        .await
        .map_err(crate::ClientError::from)
        .and_then(|r| r);
        result.map_err(|e| {
            tracing::warn!(error = %e, "recap fetch failed");
            RecapError::Fetch(e.to_string())
        })
    }
}
