use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Response envelope
// ============================================================================

/// Every backend response wraps its payload in this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Business error reported by the backend inside an envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl<T> Envelope<T> {
    /// The error text of a failed response, preferring the `error` field
    /// over the looser `message` field.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "request failed".to_string())
    }

    /// Unwrap the payload, turning a failed or payload-less response into
    /// a [`BackendError`].
    pub fn into_result(self) -> Result<T, BackendError> {
        if self.success {
            if let Some(data) = self.data {
                return Ok(data);
            }
        }
        Err(BackendError {
            message: self.error_message(),
        })
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Account identity as resolved by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn is_user(self) -> bool {
        self == Role::User
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A conversation thread.
///
/// List views omit `messages` and carry only the denormalized
/// `last_message`/`message_count` pair; the detail view includes the full
/// ordered history. Use [`Chat::history`] rather than touching `messages`
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Message history in arrival order; empty when this instance came
    /// from the list endpoint.
    pub fn history(&self) -> &[Message] {
        self.messages.as_deref().unwrap_or_default()
    }
}

/// Processing state of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
        }
    }

    /// The pipeline will not move the document further.
    pub fn is_terminal(self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Failed)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded file tracked through the backend's processing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    pub file_name: String,
    pub original_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub s3_key: String,
    pub s3_url: String,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

// ============================================================================
// Response payloads (the `data` member, per endpoint)
// ============================================================================

/// POST /api/auth/login and /api/auth/signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthData {
    pub user: User,
    pub token: String,
}

/// GET /api/auth/me.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeData {
    pub user: User,
}

/// GET /api/chats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatsData {
    pub chats: Vec<Chat>,
}

/// GET/POST/PUT on a single chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatData {
    pub chat: Chat,
}

/// POST /api/chats/{id}/message - the assistant reply plus the updated chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageData {
    pub message: String,
    pub chat: Chat,
}

/// GET /api/documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsData {
    pub documents: Vec<Document>,
}

/// GET/POST on a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentData {
    pub document: Document,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn when(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_envelope_success_with_data() {
        let json = r#"{"success":true,"data":{"user":{"id":"u1","email":"a@b.c","name":"Asha","role":"user"},"token":"tok-1"}}"#;
        let envelope: Envelope<AuthData> = serde_json::from_str(json).unwrap();
        let data = envelope.into_result().unwrap();
        assert_eq!(data.token, "tok-1");
        assert_eq!(data.user.name, "Asha");
        assert_eq!(data.user.created_at, None);
    }

    #[test]
    fn test_envelope_failure_prefers_error_field() {
        let json = r#"{"success":false,"error":"Invalid credentials","message":"login rejected"}"#;
        let envelope: Envelope<AuthData> = serde_json::from_str(json).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.message, "Invalid credentials");
    }

    #[test]
    fn test_envelope_failure_falls_back_to_message() {
        let json = r#"{"success":false,"message":"temporarily unavailable"}"#;
        let envelope: Envelope<ChatsData> = serde_json::from_str(json).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.message, "temporarily unavailable");
    }

    #[test]
    fn test_envelope_success_without_data_is_an_error() {
        let json = r#"{"success":true}"#;
        let envelope: Envelope<ChatData> = serde_json::from_str(json).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.message, "request failed");
    }

    #[test]
    fn test_user_camel_case_fields() {
        let json = r#"{"id":"u1","email":"a@b.c","name":"Asha","role":"admin","createdAt":"2024-03-01T10:00:00Z"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, "admin");
        assert!(user.created_at.is_some());

        let out = serde_json::to_string(&user).unwrap();
        assert!(out.contains("\"createdAt\""));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        let role: Role = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(role, Role::System);
        assert!(Role::User.is_user());
        assert!(!Role::Assistant.is_user());
    }

    #[test]
    fn test_chat_list_shape_omits_messages() {
        let json = r#"{"id":"c1","title":"FIR 42/2024","messageCount":3,"lastMessage":"Done","createdAt":"2024-03-01T10:00:00Z","updatedAt":"2024-03-01T11:00:00Z"}"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.message_count, Some(3));
        assert_eq!(chat.last_message.as_deref(), Some("Done"));
        assert!(chat.messages.is_none());
        assert!(chat.history().is_empty());
    }

    #[test]
    fn test_chat_detail_preserves_message_order() {
        let json = r#"{"id":"c1","title":"FIR 42/2024","messages":[
            {"role":"user","content":"first","timestamp":"2024-03-01T10:00:00Z"},
            {"role":"assistant","content":"second","timestamp":"2024-03-01T10:00:05Z"}
        ],"createdAt":"2024-03-01T10:00:00Z","updatedAt":"2024-03-01T10:00:05Z"}"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        let history = chat.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].content, "second");
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[test]
    fn test_document_wire_names() {
        let json = r#"{"_id":"d1","userId":"u1","chatId":"c1","fileName":"scan-1.jpg","originalName":"fir.jpg",
            "fileSize":2048,"mimeType":"image/jpeg","s3Key":"uploads/scan-1.jpg","s3Url":"https://bucket/scan-1.jpg",
            "status":"processing","createdAt":"2024-03-01T10:00:00Z","updatedAt":"2024-03-01T10:00:01Z"}"#;
        let document: Document = serde_json::from_str(json).unwrap();
        assert_eq!(document.id, "d1");
        assert_eq!(document.chat_id.as_deref(), Some("c1"));
        assert_eq!(document.s3_key, "uploads/scan-1.jpg");
        assert_eq!(document.status, DocumentStatus::Processing);
        assert!(document.extracted_text.is_none());

        let out = serde_json::to_string(&document).unwrap();
        assert!(out.contains("\"_id\":\"d1\""));
        assert!(out.contains("\"s3Url\""));
    }

    #[test]
    fn test_document_status_lifecycle() {
        let status: DocumentStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, DocumentStatus::Pending);
        assert!(!status.is_terminal());
        assert!(DocumentStatus::Completed.is_terminal());
        assert!(DocumentStatus::Failed.is_terminal());
        assert_eq!(DocumentStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_send_message_request_skips_absent_document() {
        let req = SendMessageRequest {
            message: "summarize".to_string(),
            document_id: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("documentId"));

        let req = SendMessageRequest {
            message: "summarize".to_string(),
            document_id: Some("d1".to_string()),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"documentId\":\"d1\""));
    }

    #[test]
    fn test_create_chat_request_optional_title() {
        let req = CreateChatRequest {
            message: "hello".to_string(),
            title: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"message":"hello"}"#);
    }

    #[test]
    fn test_update_chat_request_skips_empty_fields() {
        let req = UpdateChatRequest {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"title":"Renamed"}"#);
    }

    #[test]
    fn test_message_timestamp_parses_rfc3339() {
        let json = r#"{"role":"assistant","content":"ok","timestamp":"2024-03-01T10:00:00Z"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.timestamp, when(1709287200));
    }
}
