//! HTTP streamed assistant adapter
//!
//! Posts the question with its history and hands the raw response body to
//! the application as a stream of byte chunks. No framing is interpreted
//! here; chunk boundaries are whatever the network delivered.

use super::endpoints::Endpoints;
use async_trait::async_trait;
use duochat_application::{AssistantRequestError, AssistantStreamPort, ChunkStream, TransportError};
use duochat_domain::{AssistantRequest, preview};
use futures::StreamExt;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HttpAssistantStream {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpAssistantStream {
    pub fn new(client: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }
}

#[async_trait]
impl AssistantStreamPort for HttpAssistantStream {
    async fn open(&self, request: &AssistantRequest) -> Result<ChunkStream, AssistantRequestError> {
        let url = self.endpoints.assistant_url();
        debug!(%url, history = request.history.len(), "Opening assistant stream");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AssistantRequestError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %preview(&body, 200), "Assistant request rejected");
            return Err(AssistantRequestError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| TransportError::Io(format!("response body read: {e}")))
        });
        Ok(body.boxed())
    }
}
