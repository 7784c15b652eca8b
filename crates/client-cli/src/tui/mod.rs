//! Terminal chat surface
//!
//! The TUI runs on the main thread (crossterm polling); all network work
//! happens on a tokio task. The two sides talk over channels: commands
//! in one direction, view snapshots and notices in the other. No two
//! mutating requests overlap - the app holds a single in-flight guard.

mod app;
pub mod markdown;

pub use app::TuiOutcome;

use std::sync::mpsc;

use anyhow::Result;
use tokio::sync::mpsc as tokio_mpsc;

use crate::api::{ApiError, DocumentClient};
use crate::controller::ChatController;
use crate::session::Session;
use app::{App, Notice, UiCommand, UiEvent, ViewSnapshot};

/// Run the chat surface until the user quits, logs out, or the session
/// expires.
pub async fn run(
    session: Session,
    controller: ChatController,
    documents: DocumentClient,
) -> Result<TuiOutcome> {
    let (command_tx, command_rx) = tokio_mpsc::channel::<UiCommand>(32);
    let (event_tx, event_rx) = mpsc::channel::<UiEvent>();

    let identity = match session.user() {
        Ok(user) => format!("{} <{}>", user.name, user.email),
        Err(_) => "anonymous".to_string(),
    };

    // Network task: owns the session and controller, reacts to commands.
    let network = tokio::spawn(async move {
        run_network(session, controller, documents, command_rx, event_tx).await;
    });

    // TUI on the main thread.
    let mut app = App::new(identity, command_tx, event_rx);
    let outcome = app.run()?;

    network.abort();
    Ok(outcome)
}

async fn run_network(
    mut session: Session,
    mut controller: ChatController,
    documents: DocumentClient,
    mut command_rx: tokio_mpsc::Receiver<UiCommand>,
    event_tx: mpsc::Sender<UiEvent>,
) {
    // Initial list load before the first command.
    if let Err(err) = controller.load_chats().await {
        if report(&event_tx, &err, "Failed to load chats") {
            return;
        }
    }
    send_view(&event_tx, &controller);

    while let Some(command) = command_rx.recv().await {
        match command {
            UiCommand::SelectChat(id) => {
                if let Err(err) = controller.select_chat(&id).await {
                    if report(&event_tx, &err, "Failed to load chat") {
                        return;
                    }
                }
            }
            UiCommand::DeleteChat(id) => match controller.delete_chat(&id).await {
                Ok(()) => {
                    let _ = event_tx.send(UiEvent::Notice(Notice::info("Chat deleted")));
                }
                Err(err) => {
                    if report(&event_tx, &err, "Failed to delete chat") {
                        return;
                    }
                }
            },
            UiCommand::RenameChat { id, title } => {
                if let Err(err) = controller.rename_chat(&id, &title).await {
                    if report(&event_tx, &err, "Failed to rename chat") {
                        return;
                    }
                }
            }
            UiCommand::NewChat => controller.view.clear_current(),
            UiCommand::SendMessage(text) => {
                if let Err(err) = controller.send_message(&text).await {
                    let expired = report(&event_tx, &err, "Failed to send message");
                    let _ = event_tx.send(UiEvent::SendFailed { text });
                    if expired {
                        return;
                    }
                }
            }
            UiCommand::UploadDocument { path, chat_id } => {
                match documents.upload(&path, chat_id.as_deref()).await {
                    Ok(document) => {
                        let _ = event_tx.send(UiEvent::Notice(Notice::info(format!(
                            "Uploaded {} ({})",
                            document.original_name, document.status
                        ))));
                    }
                    Err(err) => {
                        let expired = err.is_session_expired();
                        let _ = event_tx.send(UiEvent::Notice(Notice::error(err.to_string())));
                        if expired {
                            let _ = event_tx.send(UiEvent::SessionExpired);
                            return;
                        }
                    }
                }
            }
            UiCommand::Logout => {
                session.logout().await;
                let _ = event_tx.send(UiEvent::LoggedOut);
                return;
            }
        }
        send_view(&event_tx, &controller);
    }
}

/// Convert a failure into a notice. Returns true when the session is
/// gone and the surface must exit; the expiry event is sent here, once,
/// regardless of which call noticed it.
fn report(event_tx: &mpsc::Sender<UiEvent>, err: &ApiError, context: &str) -> bool {
    if err.is_session_expired() {
        let _ = event_tx.send(UiEvent::SessionExpired);
        return true;
    }
    let text = match err {
        ApiError::Backend(message) => format!("{context}: {message}"),
        _ => format!("{context}: {err}"),
    };
    let _ = event_tx.send(UiEvent::Notice(Notice::error(text)));
    false
}

fn send_view(event_tx: &mpsc::Sender<UiEvent>, controller: &ChatController) {
    let view = &controller.view;
    let _ = event_tx.send(UiEvent::View(ViewSnapshot {
        chats: view.chats.clone(),
        current: view.current.clone(),
        loading: view.loading,
    }));
}
