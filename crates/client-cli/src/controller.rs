//! Chat page controller - owns the conversation list and the active chat
//!
//! All mutations go through the backend first; the local list is then
//! reconciled with the cheapest rule that keeps the display consistent:
//! prepend on create, filter on delete, full replace on refresh. The
//! local edit wins only until the next full refresh.

use shared::{Chat, UpdateChatRequest};

use crate::api::{ApiError, ChatClient};

/// View state rendered by the chat surface. Mutations are pure so the
/// reconciliation rules are testable without a backend.
#[derive(Debug, Default, Clone)]
pub struct ChatView {
    pub chats: Vec<Chat>,
    pub current: Option<Chat>,
    pub loading: bool,
}

impl ChatView {
    /// Replace the list with an authoritative fetch result.
    pub fn apply_loaded(&mut self, chats: Vec<Chat>) {
        self.chats = chats;
    }

    /// A newly created chat goes to the head of the list and becomes active.
    pub fn apply_created(&mut self, chat: Chat) {
        self.chats.insert(0, chat.clone());
        self.current = Some(chat);
    }

    pub fn apply_selected(&mut self, chat: Chat) {
        self.current = Some(chat);
    }

    /// Drop a chat; the selection is cleared only when it pointed at it.
    pub fn apply_deleted(&mut self, id: &str) {
        self.chats.retain(|chat| chat.id != id);
        let was_current = self.current.as_ref().map_or(false, |chat| chat.id == id);
        if was_current {
            self.current = None;
        }
    }

    /// Adopt the backend's copy of a retitled chat wherever it appears.
    /// Only metadata is merged - the update response comes in list shape
    /// and must not clobber the loaded history.
    pub fn apply_renamed(&mut self, updated: &Chat) {
        if let Some(slot) = self.chats.iter_mut().find(|chat| chat.id == updated.id) {
            slot.title = updated.title.clone();
            slot.updated_at = updated.updated_at;
        }
        if let Some(current) = self.current.as_mut() {
            if current.id == updated.id {
                current.title = updated.title.clone();
                current.updated_at = updated.updated_at;
            }
        }
    }

    /// Deselect without touching the list (the "new chat" affordance).
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|chat| chat.id.as_str())
    }
}

/// Where a composed message must go.
#[derive(Debug, PartialEq, Eq)]
enum SendRoute {
    /// No active chat - the message seeds a new conversation.
    NewChat,
    /// Append to the active chat.
    Existing(String),
}

fn route_for(view: &ChatView) -> SendRoute {
    match view.current_id() {
        Some(id) => SendRoute::Existing(id.to_string()),
        None => SendRoute::NewChat,
    }
}

pub struct ChatController {
    chats: ChatClient,
    pub view: ChatView,
}

impl ChatController {
    pub fn new(chats: ChatClient) -> Self {
        Self {
            chats,
            view: ChatView {
                loading: true,
                ..ChatView::default()
            },
        }
    }

    /// Fetch the full chat list. On failure the previous list is kept;
    /// the loading flag clears either way.
    pub async fn load_chats(&mut self) -> Result<(), ApiError> {
        let result = self.chats.list().await;
        self.view.loading = false;
        self.view.apply_loaded(result?);
        Ok(())
    }

    /// Start a new conversation seeded with `message` and make it active.
    pub async fn create_chat(&mut self, message: &str) -> Result<Chat, ApiError> {
        let chat = self.chats.create(message, None).await?;
        self.view.apply_created(chat.clone());
        Ok(chat)
    }

    /// Fetch full detail for a chat and make it active. On failure the
    /// previous selection is untouched.
    pub async fn select_chat(&mut self, id: &str) -> Result<(), ApiError> {
        let chat = self.chats.get(id).await?;
        self.view.apply_selected(chat);
        Ok(())
    }

    /// Rename a chat; the backend's copy of the metadata wins.
    pub async fn rename_chat(&mut self, id: &str, title: &str) -> Result<(), ApiError> {
        let update = UpdateChatRequest {
            title: Some(title.to_string()),
            ..UpdateChatRequest::default()
        };
        let chat = self.chats.update(id, &update).await?;
        self.view.apply_renamed(&chat);
        Ok(())
    }

    /// Delete a chat. Nothing is removed locally until the backend
    /// confirms, so a failure needs no rollback.
    pub async fn delete_chat(&mut self, id: &str) -> Result<(), ApiError> {
        self.chats.delete(id).await?;
        self.view.apply_deleted(id);
        Ok(())
    }

    /// Send `text`. With no active chat this routes through creation;
    /// otherwise it appends to the active chat, adopts the updated
    /// detail from the response, and refreshes the list so denormalized
    /// fields stay in step.
    pub async fn send_message(&mut self, text: &str) -> Result<(), ApiError> {
        match route_for(&self.view) {
            SendRoute::NewChat => {
                self.create_chat(text).await?;
                Ok(())
            }
            SendRoute::Existing(id) => {
                let sent = self.chats.send_message(&id, text, None).await?;
                self.view.apply_selected(sent.chat);
                match self.load_chats().await {
                    // An expired session always wins over "the send worked".
                    Err(err) if err.is_session_expired() => Err(err),
                    Err(err) => {
                        // The send itself succeeded; a stale list heals on
                        // the next refresh.
                        tracing::warn!("chat list refresh failed: {err}");
                        Ok(())
                    }
                    Ok(()) => Ok(()),
                }
            }
        }
    }
}
