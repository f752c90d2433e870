//! [`AgentClient`] for Copilot Studio's Direct-to-Engine API.

use super::error::{CopilotStudioError, Result};
use super::protocol::{
    ACTIVITY_EVENT, Activity, CONVERSATION_ID_HEADER, ExecuteTurnRequest, StartConversationRequest,
};
use super::sse::{SseFrame, SseParser};
use async_trait::async_trait;
use futures::StreamExt;
use relay_application::{AgentClient, AgentClientError};
use relay_domain::{
    AccessToken, ConnectionSettings, ConversationEvent, ConversationId, ConversationStart, Query,
};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap};
use serde::Serialize;
use tracing::{debug, trace};

/// Client bound to one agent and one credential.
///
/// Holds no conversation state; the id is passed on every call.
pub struct CopilotStudioClient {
    http: reqwest::Client,
    settings: ConnectionSettings,
    token: AccessToken,
}

impl CopilotStudioClient {
    pub fn new(http: reqwest::Client, settings: ConnectionSettings, token: AccessToken) -> Self {
        Self {
            http,
            settings,
            token,
        }
    }

    /// POST `body` and collect the activities of the event-stream reply.
    async fn post_activities<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<(HeaderMap, Vec<Activity>)> {
        let mut request = self
            .http
            .post(url)
            .header(ACCEPT, "text/event-stream")
            .json(body);
        if let Some(bearer) = self.token.bearer() {
            request = request.bearer_auth(bearer.secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    CopilotStudioError::Unauthorized {
                        status: status.as_u16(),
                        body,
                    }
                }
                _ => CopilotStudioError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let headers = response.headers().clone();
        let mut parser = SseParser::new();
        let mut activities = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            for frame in parser.push(&chunk?) {
                collect_activity(frame, &mut activities)?;
            }
        }
        if let Some(frame) = parser.finish() {
            collect_activity(frame, &mut activities)?;
        }

        debug!(url = %url, activities = activities.len(), "Received agent activities");
        Ok((headers, activities))
    }

    async fn start(&self, emit_start_event: bool) -> Result<ConversationStart> {
        let url = self.settings.conversation_url(None)?;
        let body = StartConversationRequest {
            emit_start_conversation_event: emit_start_event,
        };
        let (headers, activities) = self.post_activities(&url, &body).await?;

        let conversation_id = headers
            .get(CONVERSATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| {
                activities
                    .iter()
                    .find_map(|a| a.conversation_id().map(str::to_string))
            })
            .map(ConversationId::new)
            .ok_or(CopilotStudioError::MissingConversationId)?;

        let events = activities.into_iter().map(Activity::into_event).collect();
        Ok(ConversationStart::new(conversation_id, events))
    }

    async fn ask(
        &self,
        conversation_id: &ConversationId,
        query: &Query,
    ) -> Result<Vec<ConversationEvent>> {
        let url = self.settings.conversation_url(Some(conversation_id))?;
        let body = ExecuteTurnRequest::message(conversation_id, query);
        let (_, activities) = self.post_activities(&url, &body).await?;
        Ok(activities.into_iter().map(Activity::into_event).collect())
    }
}

fn collect_activity(frame: SseFrame, activities: &mut Vec<Activity>) -> Result<()> {
    if frame.event.as_deref() != Some(ACTIVITY_EVENT) {
        trace!(event = ?frame.event, "Skipping non-activity frame");
        return Ok(());
    }
    let activity = serde_json::from_str(&frame.data).map_err(|e| {
        CopilotStudioError::InvalidFrame {
            error: e.to_string(),
            raw: frame.data.clone(),
        }
    })?;
    activities.push(activity);
    Ok(())
}

#[async_trait]
impl AgentClient for CopilotStudioClient {
    async fn start_conversation(
        &self,
        emit_start_event: bool,
    ) -> std::result::Result<ConversationStart, AgentClientError> {
        Ok(self.start(emit_start_event).await?)
    }

    async fn ask_question(
        &self,
        conversation_id: &ConversationId,
        query: &Query,
    ) -> std::result::Result<Vec<ConversationEvent>, AgentClientError> {
        Ok(self.ask(conversation_id, query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus, header},
        response::IntoResponse,
        routing::post,
    };
    use relay_domain::BearerToken;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    // ==================== Stub Agent ====================

    #[derive(Clone, Default)]
    struct Recorded {
        authorization: Arc<Mutex<Vec<Option<String>>>>,
        bodies: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    #[derive(Clone)]
    struct StubAgent {
        recorded: Recorded,
        status: AxumStatus,
        send_header: bool,
        start_stream: &'static str,
        reply_stream: &'static str,
    }

    const GREETING_STREAM: &str = "event: activity\n\
        data: {\"type\":\"message\",\"text\":\"Hello, I'm your agent\",\"conversation\":{\"id\":\"c-from-activity\"}}\n\n\
        event: activity\n\
        data: {\"type\":\"typing\"}\n\n\
        event: end\n\
        data: end of stream\n\n";

    const REPLY_STREAM: &str = "event: activity\n\
        data: {\"type\":\"typing\"}\n\n\
        event: activity\n\
        data: {\"type\":\"message\",\"text\":\"hi there\",\"suggestedActions\":{\"actions\":[{\"value\":\"Yes\"}]}}\n\n\
        event: activity\n\
        data: {\"type\":\"endOfConversation\",\"text\":\"Goodbye\"}\n\n";

    impl StubAgent {
        fn new() -> Self {
            Self {
                recorded: Recorded::default(),
                status: AxumStatus::OK,
                send_header: true,
                start_stream: GREETING_STREAM,
                reply_stream: REPLY_STREAM,
            }
        }

        fn record(&self, id: Option<String>, headers: &AxumHeaders, body: Value) {
            let auth = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            self.recorded.authorization.lock().unwrap().push(auth);
            self.recorded.bodies.lock().unwrap().push((id, body));
        }

        fn respond(&self, stream: &'static str) -> axum::response::Response {
            if !self.status.is_success() {
                return (self.status, "denied").into_response();
            }
            let mut response =
                ([(header::CONTENT_TYPE, "text/event-stream")], stream).into_response();
            if self.send_header {
                response
                    .headers_mut()
                    .insert(CONVERSATION_ID_HEADER, "c-42".parse().unwrap());
            }
            response
        }
    }

    async fn start_handler(
        State(agent): State<StubAgent>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> axum::response::Response {
        agent.record(None, &headers, body);
        agent.respond(agent.start_stream)
    }

    async fn ask_handler(
        State(agent): State<StubAgent>,
        Path(id): Path<String>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> axum::response::Response {
        agent.record(Some(id), &headers, body);
        agent.respond(agent.reply_stream)
    }

    async fn spawn(agent: StubAgent) -> String {
        let app = Router::new()
            .route("/bots/cr123_agent/conversations", post(start_handler))
            .route("/bots/cr123_agent/conversations/{id}", post(ask_handler))
            .with_state(agent);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/bots/cr123_agent", addr)
    }

    fn client(base: &str, token: AccessToken) -> CopilotStudioClient {
        let settings = ConnectionSettings::builder()
            .tenant_id("tid")
            .app_client_id("client-123")
            .direct_connect_url(Some(base.to_string()))
            .build()
            .unwrap();
        CopilotStudioClient::new(reqwest::Client::new(), settings, token)
    }

    fn bearer(token: &str) -> AccessToken {
        AccessToken::Token(BearerToken::try_new(token).unwrap())
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_start_reads_header_id_and_greeting() {
        let agent = StubAgent::new();
        let recorded = agent.recorded.clone();
        let base = spawn(agent).await;

        let start = client(&base, bearer("svc-token"))
            .start_conversation(true)
            .await
            .unwrap();

        assert_eq!(start.conversation_id.as_str(), "c-42");
        assert_eq!(
            start.events,
            vec![
                ConversationEvent::message("Hello, I'm your agent"),
                ConversationEvent::other("typing"),
            ]
        );
        assert_eq!(
            recorded.authorization.lock().unwrap()[0].as_deref(),
            Some("Bearer svc-token")
        );
        assert_eq!(
            recorded.bodies.lock().unwrap()[0].1,
            serde_json::json!({ "emitStartConversationEvent": true })
        );
    }

    #[tokio::test]
    async fn test_start_falls_back_to_activity_conversation_id() {
        let agent = StubAgent {
            send_header: false,
            ..StubAgent::new()
        };
        let base = spawn(agent).await;

        let start = client(&base, bearer("t")).start_conversation(true).await.unwrap();
        assert_eq!(start.conversation_id.as_str(), "c-from-activity");
    }

    #[tokio::test]
    async fn test_start_without_any_id_fails() {
        let agent = StubAgent {
            send_header: false,
            start_stream: "event: activity\ndata: {\"type\":\"typing\"}\n\n",
            ..StubAgent::new()
        };
        let base = spawn(agent).await;

        let err = client(&base, bearer("t"))
            .start_conversation(true)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentClientError::MissingConversationId));
    }

    #[tokio::test]
    async fn test_ask_posts_to_conversation_and_keeps_event_order() {
        let agent = StubAgent::new();
        let recorded = agent.recorded.clone();
        let base = spawn(agent).await;

        let events = client(&base, bearer("t"))
            .ask_question(
                &ConversationId::new("c-42"),
                &Query::try_new("hello").unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            events,
            vec![
                ConversationEvent::other("typing"),
                ConversationEvent::message_with_actions("hi there", ["Yes"]),
                ConversationEvent::end_of_conversation("Goodbye"),
            ]
        );
        let bodies = recorded.bodies.lock().unwrap();
        assert_eq!(bodies[0].0.as_deref(), Some("c-42"));
        assert_eq!(bodies[0].1["activity"]["text"], "hello");
        assert_eq!(bodies[0].1["activity"]["conversation"]["id"], "c-42");
    }

    #[tokio::test]
    async fn test_unauthenticated_sends_no_header_and_surfaces_401() {
        let agent = StubAgent {
            status: AxumStatus::UNAUTHORIZED,
            ..StubAgent::new()
        };
        let recorded = agent.recorded.clone();
        let base = spawn(agent).await;

        let err = client(&base, AccessToken::Unauthenticated)
            .start_conversation(true)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AgentClientError::Unauthorized { status: 401, .. }
        ));
        assert_eq!(recorded.authorization.lock().unwrap()[0], None);
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let agent = StubAgent {
            status: AxumStatus::INTERNAL_SERVER_ERROR,
            ..StubAgent::new()
        };
        let base = spawn(agent).await;

        let err = client(&base, bearer("t"))
            .ask_question(&ConversationId::new("c-1"), &Query::try_new("q").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentClientError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_malformed_activity_is_protocol_error() {
        let agent = StubAgent {
            reply_stream: "event: activity\ndata: {not json\n\n",
            ..StubAgent::new()
        };
        let base = spawn(agent).await;

        let err = client(&base, bearer("t"))
            .ask_question(&ConversationId::new("c-1"), &Query::try_new("q").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentClientError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_truncated_greeting_frame_is_protocol_error() {
        let agent = StubAgent {
            start_stream: "event: activity\ndata: {\"type\":\"message\",\"te",
            ..StubAgent::new()
        };
        let base = spawn(agent).await;

        let err = client(&base, bearer("t"))
            .start_conversation(true)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentClientError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_missing_settings_are_configuration_errors() {
        let settings = ConnectionSettings {
            environment_id: String::new(),
            ..ConnectionSettings::builder()
                .tenant_id("tid")
                .app_client_id("client-123")
                .environment_id("env")
                .agent_identifier("cr123_agent")
                .build()
                .unwrap()
        };
        let client = CopilotStudioClient::new(reqwest::Client::new(), settings, bearer("t"));

        let err = client.start_conversation(true).await.unwrap_err();
        assert!(matches!(err, AgentClientError::Configuration(_)));
    }
}
