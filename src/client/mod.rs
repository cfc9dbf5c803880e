use crate::models::ask::{ AskOutcome, AskRequest };
use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::Client as HttpClient;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The answering endpoint as seen by the widget. Never fails: every failure is
/// folded into an [`AskOutcome`].
#[async_trait]
pub trait AnswerClient: Send + Sync {
    async fn ask(&self, request: &AskRequest) -> AskOutcome;
}

#[derive(Debug, Clone)]
pub struct HttpAnswerClient {
    http: HttpClient,
    base_url: String,
}

impl HttpAnswerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), base_url)
    }

    pub fn with_client(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn ask_url(&self) -> String {
        format!("{}/ask", self.base_url.trim_end_matches('/'))
    }

    /// Posts the request and decodes whatever JSON comes back. The status code
    /// is not inspected; error bodies are classified like any other.
    pub async fn post(&self, request: &AskRequest) -> Result<Value, ClientError> {
        let resp = self.http.post(self.ask_url()).json(request).send().await?;
        debug!("/ask responded with {}", resp.status());
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AnswerClient for HttpAnswerClient {
    async fn ask(&self, request: &AskRequest) -> AskOutcome {
        match self.post(request).await {
            Ok(body) => AskOutcome::from_body(&body),
            Err(e) => {
                warn!("Answering endpoint unreachable: {}", e);
                AskOutcome::Unreachable(e.to_string())
            }
        }
    }
}
