use std::sync::Mutex;
use std::time::Duration;

use calltime_core::gifts::{GiftHistoryEntry, SendGiftRequest, SendGiftResponse};
use calltime_core::RecapError;

use crate::{http, Backend, ClientError};

/// Simulated delivery delay of the mock sender.
pub const MOCK_SEND_LATENCY: Duration = Duration::from_millis(1500);

/// Delivers thank-you gift links to collaborators.
#[async_trait::async_trait]
pub trait GiftSender: Send + Sync {
    /// One outbound send. Backend rejections come back as [`RecapError::Send`].
    async fn send(&self, request: SendGiftRequest) -> Result<SendGiftResponse, RecapError>;

    /// Gifts previously sent by `user_id` for `year`.
    async fn history(&self, user_id: &str, year: i32) -> Result<Vec<GiftHistoryEntry>, RecapError>;
}

/// Accepts every send after a fixed delay, except for names listed as unreachable.
pub struct MockGiftSender {
    latency: Duration,
    unreachable: Vec<String>,
    sent: Mutex<Vec<SendGiftRequest>>,
}

impl MockGiftSender {
    pub fn new() -> Self {
        Self {
            latency: MOCK_SEND_LATENCY,
            unreachable: Vec::new(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Reject deliveries to these collaborators.
    pub fn with_unreachable(mut self, names: &[&str]) -> Self {
        self.unreachable = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Requests received so far (for testing).
    pub fn requests(&self) -> Vec<SendGiftRequest> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for MockGiftSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GiftSender for MockGiftSender {
    async fn send(&self, request: SendGiftRequest) -> Result<SendGiftResponse, RecapError> {
        tracing::debug!(recipients = request.recipients.len(), "mock gift send");
        tokio::time::sleep(self.latency).await;
        let failed: Vec<String> = request
            .recipients
            .iter()
            .filter(|r| self.unreachable.contains(&r.collaborator_name))
            .map(|r| r.collaborator_name.clone())
            .collect();
        let sent_count = request.recipients.len() - failed.len();
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        Ok(SendGiftResponse {
            success: failed.is_empty(),
            sent_count,
            failed_recipients: (!failed.is_empty()).then_some(failed),
            error: None,
        })
    }

    async fn history(&self, _user_id: &str, _year: i32) -> Result<Vec<GiftHistoryEntry>, RecapError> {
        Ok(Vec::new())
    }
}

/// `POST {base}/gifts/send` and `GET {base}/gifts/history/{user}/{year}`.
pub struct HttpGiftSender {
    backend: Backend,
}

impl HttpGiftSender {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

#[async_trait::async_trait]
impl GiftSender for HttpGiftSender {
    async fn send(&self, request: SendGiftRequest) -> Result<SendGiftResponse, RecapError> {
        let url = self.backend.url("gifts/send");
        let token = self.backend.auth_token.clone();
        tracing::info!(url = %url, recipients = request.recipients.len(), "sending gifts");
        let result: Result<SendGiftResponse, ClientError> = tokio::task::spawn_blocking(move || {
            http::post_json(&url, token.as_deref(), &request)
        })
        .await
        .map_err(ClientError::from)
        .and_then(|r| r);
        result.map_err(|e| {
            tracing::warn!(error = %e, "gift send failed");
            RecapError::Send(e.to_string())
        })
    }

    async fn history(&self, user_id: &str, year: i32) -> Result<Vec<GiftHistoryEntry>, RecapError> {
        let url = self.backend.url(&format!(
            "gifts/history/{}/{year}",
            calltime_core::share::encode_uri_component(user_id)
        ));
        let token = self.backend.auth_token.clone();
        let result: Result<Vec<GiftHistoryEntry>, ClientError> =
            tokio::task::spawn_blocking(move || http::get_json(&url, token.as_deref()))
                .await
                .map_err(ClientError::from)
                .and_then(|r| r);
        result.map_err(|e| RecapError::Fetch(e.to_string()))
    }
}
