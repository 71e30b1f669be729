// HTTP transport to the remote evaluator

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::TransportError;
use crate::types::{EvaluationRequest, SingleEvaluationRequest};

pub const EVALUATE_PATH: &str = "/api/evaluate";

/// Something that can score a submission.
///
/// Implementations return the response body as JSON whatever the status
/// code; only a failed exchange is an error.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Value, TransportError>;

    async fn evaluate_single(
        &self,
        request: &SingleEvaluationRequest,
    ) -> Result<Value, TransportError>;
}

/// `Evaluator` backed by `POST /api/evaluate`
#[derive(Debug, Clone)]
pub struct HttpEvaluator {
    client: reqwest::Client,
    url: String,
}

impl HttpEvaluator {
    /// `base_url` is the evaluator origin, e.g. `http://127.0.0.1:8000`.
    /// No request timeout is set.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: endpoint_url(base_url),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post_json<T: Serialize + ?Sized + Sync>(
        &self,
        body: &T,
    ) -> Result<Value, TransportError> {
        debug!(url = %self.url, "Posting evaluation request");

        // .json() sets Content-Type: application/json
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(TransportError::Body)?;
        debug!(status = status.as_u16(), body_bytes = bytes.len(), "Evaluator responded");

        serde_json::from_slice(&bytes).map_err(TransportError::Decode)
    }
}

#[async_trait]
impl Evaluator for HttpEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Value, TransportError> {
        self.post_json(request).await
    }

    async fn evaluate_single(
        &self,
        request: &SingleEvaluationRequest,
    ) -> Result<Value, TransportError> {
        self.post_json(request).await
    }
}

fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), EVALUATE_PATH)
}
