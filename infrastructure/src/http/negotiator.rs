//! HTTP session negotiator

use super::endpoints::Endpoints;
use async_trait::async_trait;
use duochat_application::{NegotiationError, SessionNegotiator};
use duochat_domain::{Department, SessionId, UserName, preview};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRequestBody<'a> {
    user_name: &'a str,
    department: Department,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponseBody {
    session_id: Option<String>,
}

/// Negotiates operator sessions with `POST {base}/api/chat/request`
#[derive(Debug, Clone)]
pub struct HttpSessionNegotiator {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpSessionNegotiator {
    pub fn new(client: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }
}

#[async_trait]
impl SessionNegotiator for HttpSessionNegotiator {
    async fn negotiate(
        &self,
        user: &UserName,
        department: Department,
    ) -> Result<SessionId, NegotiationError> {
        let url = self.endpoints.negotiate_url();
        debug!(%url, user = %user, %department, "Requesting session");

        let response = self
            .client
            .post(&url)
            .json(&SessionRequestBody {
                user_name: user.as_str(),
                department,
            })
            .send()
            .await
            .map_err(|e| NegotiationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            warn!(%status, body = %preview(body.as_deref().unwrap_or(""), 200), "Session request rejected");
            return Err(NegotiationError::rejected(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NegotiationError::Transport(e.to_string()))?;
        let parsed: SessionResponseBody = serde_json::from_str(&body).map_err(|e| {
            debug!(error = %e, body = %preview(&body, 200), "Unparsable session response");
            NegotiationError::MissingSessionId
        })?;

        let session_id = parsed
            .session_id
            .ok_or(NegotiationError::MissingSessionId)
            .and_then(|id| SessionId::new(id).map_err(|_| NegotiationError::MissingSessionId))?;
        debug!(session = %session_id, "Session negotiated");
        Ok(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn negotiator(server: &MockServer) -> HttpSessionNegotiator {
        HttpSessionNegotiator::new(reqwest::Client::new(), Endpoints::new(&server.uri()))
    }

    fn ana() -> UserName {
        UserName::new("Ana").unwrap()
    }

    #[tokio::test]
    async fn test_returns_session_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/request"))
            .and(body_json(json!({"userName": "Ana", "department": "sales"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessionId": "abc123"})))
            .expect(1)
            .mount(&server)
            .await;

        let id = negotiator(&server)
            .negotiate(&ana(), Department::Sales)
            .await
            .unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[tokio::test]
    async fn test_rejection_carries_diagnostic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("no operators online"))
            .expect(1)
            .mount(&server)
            .await;

        let err = negotiator(&server)
            .negotiate(&ana(), Department::Support)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            NegotiationError::Rejected {
                status: 503,
                diagnostic: "no operators online".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_rejection_with_empty_body_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = negotiator(&server)
            .negotiate(&ana(), Department::Billing)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NegotiationError::Rejected { status: 500, ref diagnostic }
                if diagnostic == NegotiationError::GENERIC_DIAGNOSTIC
        ));
    }

    #[tokio::test]
    async fn test_missing_or_empty_session_id() {
        for body in [json!({}), json!({"sessionId": ""}), json!({"sessionId": null})] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;

            let err = negotiator(&server)
                .negotiate(&ana(), Department::Sales)
                .await
                .unwrap_err();
            assert_eq!(err, NegotiationError::MissingSessionId);
        }
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_missing_session_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let err = negotiator(&server)
            .negotiate(&ana(), Department::Sales)
            .await
            .unwrap_err();
        assert_eq!(err, NegotiationError::MissingSessionId);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let endpoints = Endpoints::new(&format!("http://{addr}"));

        let err = HttpSessionNegotiator::new(reqwest::Client::new(), endpoints)
            .negotiate(&ana(), Department::Sales)
            .await
            .unwrap_err();
        assert!(matches!(err, NegotiationError::Transport(_)));
    }
}
