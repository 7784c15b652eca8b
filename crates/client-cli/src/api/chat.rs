//! Typed wrapper over the chat endpoints

use shared::{
    Chat, ChatData, ChatsData, CreateChatRequest, SendMessageData, SendMessageRequest,
    UpdateChatRequest,
};
use std::sync::Arc;

use super::{ApiClient, ApiError};

#[derive(Clone)]
pub struct ChatClient {
    api: Arc<ApiClient>,
}

impl ChatClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// All chats for the caller, list shape (no message history).
    pub async fn list(&self) -> Result<Vec<Chat>, ApiError> {
        let data: ChatsData = self.api.get("/api/chats").await?;
        Ok(data.chats)
    }

    /// One chat, detail shape (full message history).
    pub async fn get(&self, id: &str) -> Result<Chat, ApiError> {
        let data: ChatData = self.api.get(&format!("/api/chats/{id}")).await?;
        Ok(data.chat)
    }

    /// Start a new conversation seeded with `message`.
    pub async fn create(&self, message: &str, title: Option<&str>) -> Result<Chat, ApiError> {
        let body = CreateChatRequest {
            message: message.to_string(),
            title: title.map(String::from),
        };
        let data: ChatData = self.api.post("/api/chats", &body).await?;
        Ok(data.chat)
    }

    pub async fn update(&self, id: &str, update: &UpdateChatRequest) -> Result<Chat, ApiError> {
        let data: ChatData = self.api.put(&format!("/api/chats/{id}"), update).await?;
        Ok(data.chat)
    }

    /// Append a message; the reply and the updated chat come back together.
    pub async fn send_message(
        &self,
        id: &str,
        message: &str,
        document_id: Option<&str>,
    ) -> Result<SendMessageData, ApiError> {
        let body = SendMessageRequest {
            message: message.to_string(),
            document_id: document_id.map(String::from),
        };
        self.api.post(&format!("/api/chats/{id}/message"), &body).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("/api/chats/{id}")).await
    }
}
