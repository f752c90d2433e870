//! Run Turn use case.
//!
//! One HTTP request = one turn: load settings, resolve a credential, build a
//! client, start a conversation and ask the query on it.
//!
//! # Credentials
//!
//! - [`Credential::ServiceManaged`]: token from [`AcquireTokenUseCase`]
//! - [`Credential::Caller`]: bearer token supplied by the caller
//!
//! # Continue
//!
//! [`RunTurnUseCase::continue_conversation`] opens a fresh conversation and
//! then asks the query on the caller's conversation id. The fresh
//! conversation is discarded. This is how the gateway has always behaved and
//! is kept as-is pending product clarification.

use crate::ports::agent_client::AgentClientFactory;
use crate::ports::settings_provider::{SettingsError, SettingsProvider};
use crate::use_cases::acquire_token::AcquireTokenUseCase;
use crate::use_cases::conversation_relay::{ConversationRelay, RelayError};
use relay_domain::{
    AccessToken, AggregatedResponse, BearerToken, ConnectionSettings, ConversationId,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while running a turn
#[derive(Error, Debug)]
pub enum RunTurnError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Where the turn's bearer token comes from.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Acquire silently from the service's token cache.
    ServiceManaged,
    /// Use the caller's own token verbatim.
    Caller(BearerToken),
}

/// Input for [`RunTurnUseCase::execute`].
#[derive(Debug, Clone)]
pub struct RunTurnInput {
    pub query: Option<String>,
    pub credential: Credential,
}

impl RunTurnInput {
    pub fn service_managed(query: Option<String>) -> Self {
        Self {
            query,
            credential: Credential::ServiceManaged,
        }
    }

    pub fn with_caller_token(query: Option<String>, token: BearerToken) -> Self {
        Self {
            query,
            credential: Credential::Caller(token),
        }
    }
}

/// Output of a start-and-ask turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTurnOutput {
    /// Aggregated reply; `None` when the query was empty.
    pub message: Option<AggregatedResponse>,
    pub conversation_id: ConversationId,
}

/// Use case wiring settings, credentials, client construction and the relay.
#[derive(Clone)]
pub struct RunTurnUseCase {
    settings: Arc<dyn SettingsProvider>,
    tokens: AcquireTokenUseCase,
    clients: Arc<dyn AgentClientFactory>,
    relay: ConversationRelay,
}

impl RunTurnUseCase {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        tokens: AcquireTokenUseCase,
        clients: Arc<dyn AgentClientFactory>,
        relay: ConversationRelay,
    ) -> Self {
        Self {
            settings,
            tokens,
            clients,
            relay,
        }
    }

    /// Start a new conversation and ask `input.query` on it.
    pub async fn execute(&self, input: RunTurnInput) -> Result<RunTurnOutput, RunTurnError> {
        let settings = self.settings.load().await?;
        let token = self.resolve_token(&settings, input.credential).await;

        let client = self.clients.create_client(&settings, token);

        let start = self.relay.start_conversation(client.as_ref()).await?;
        let message = self
            .relay
            .ask_question(client.as_ref(), &start.conversation_id, input.query.as_deref())
            .await?;

        Ok(RunTurnOutput {
            message,
            conversation_id: start.conversation_id,
        })
    }

    /// Ask `query` on `conversation_id` with a service-managed token.
    ///
    /// Returns `Ok(None)` without any remote call when either argument is
    /// empty. See the module docs for why a fresh conversation is opened.
    pub async fn continue_conversation(
        &self,
        query: Option<&str>,
        conversation_id: Option<&str>,
    ) -> Result<Option<AggregatedResponse>, RunTurnError> {
        let query = query.filter(|q| !q.is_empty());
        let conversation_id = conversation_id.and_then(ConversationId::try_new);
        let (Some(query), Some(conversation_id)) = (query, conversation_id) else {
            debug!("Continue request without query or conversation id; ignoring");
            return Ok(None);
        };

        let settings = self.settings.load().await?;
        let token = self
            .resolve_token(&settings, Credential::ServiceManaged)
            .await;
        let client = self.clients.create_client(&settings, token);

        let fresh = self.relay.start_conversation(client.as_ref()).await?;
        debug!(
            requested = %conversation_id,
            discarded = %fresh.conversation_id,
            "Continue opened a fresh conversation; asking on the requested id"
        );

        let message = self
            .relay
            .ask_question(client.as_ref(), &conversation_id, Some(query))
            .await?;
        Ok(message)
    }

    async fn resolve_token(
        &self,
        settings: &ConnectionSettings,
        credential: Credential,
    ) -> AccessToken {
        match credential {
            Credential::Caller(token) => {
                debug!("Using caller-supplied bearer token");
                AccessToken::Token(token)
            }
            Credential::ServiceManaged => {
                let token = self.tokens.execute(settings).await;
                if token.is_authenticated() {
                    info!("Service-managed token acquired");
                } else {
                    warn!("No service-managed token available; calling agent unauthenticated");
                }
                token
            }
        }
    }
}
