//! HTTP chat gateway.

use async_trait::async_trait;

use triphub_core::types::id::TripId;
use triphub_core::AppResult;
use triphub_entity::ChatMessage;
use triphub_realtime::gateway::ChatGateway;

use crate::client::ApiClient;

/// Transcript fetches over the admin REST API.
#[derive(Debug, Clone)]
pub struct HttpChatGateway {
    client: ApiClient,
}

impl HttpChatGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn fetch_messages(&self, trip_id: &TripId) -> AppResult<Vec<ChatMessage>> {
        let envelope = self
            .client
            .get::<Vec<ChatMessage>>(&format!(
                "/community-trip/{}/messages",
                trip_id.as_str()
            ))
            .await?;
        Ok(envelope.data)
    }
}
