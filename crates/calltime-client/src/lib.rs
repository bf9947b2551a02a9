pub mod gifts;
pub mod mock;
pub mod source;

mod http;

use std::sync::Arc;

use calltime_store::{Config, SourceKind};

pub use gifts::{GiftSender, HttpGiftSender, MockGiftSender};
pub use source::{HttpRecapSource, MockRecapSource, RecapSource};

/// Transport-level failures. Callers map these onto [`calltime_core::RecapError`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] ureq::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("empty response from {0}")]
    Empty(String),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Backend location and credentials shared by the HTTP implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl Backend {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: config.require_api_base_url()?.to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Build the recap source named by `config.source`.
pub fn recap_source(config: &Config) -> anyhow::Result<Arc<dyn RecapSource>> {
    Ok(match config.source {
        SourceKind::Mock => Arc::new(MockRecapSource::new()),
        SourceKind::Http => Arc::new(HttpRecapSource::new(Backend::from_config(config)?)),
    })
}

/// Build the gift sender named by `config.source`.
pub fn gift_sender(config: &Config) -> anyhow::Result<Arc<dyn GiftSender>> {
    Ok(match config.source {
        SourceKind::Mock => Arc::new(MockGiftSender::new()),
        SourceKind::Http => Arc::new(HttpGiftSender::new(Backend::from_config(config)?)),
    })
}
