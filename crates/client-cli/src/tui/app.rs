//! Chat surface: sidebar of conversations plus the chat window
//!
//! The app owns only presentation state. Every mutation is dispatched to
//! the network task as a [`UiCommand`] and comes back as a [`UiEvent`];
//! a single in-flight guard disables the controls while a request is
//! outstanding.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use shared::{Chat, Role};
use tokio::sync::mpsc as tokio_mpsc;

use super::markdown;

/// How long a transient notice stays on the status line.
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Requests from the TUI to the network task.
#[derive(Debug)]
pub enum UiCommand {
    SelectChat(String),
    DeleteChat(String),
    RenameChat {
        id: String,
        title: String,
    },
    /// Deselect the active chat so the next message starts a new one.
    NewChat,
    SendMessage(String),
    UploadDocument {
        path: PathBuf,
        chat_id: Option<String>,
    },
    Logout,
}

/// Updates from the network task to the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// Fresh view state; also clears the in-flight guard.
    View(ViewSnapshot),
    Notice(Notice),
    /// A send failed; the composed text comes back for recovery.
    SendFailed { text: String },
    SessionExpired,
    LoggedOut,
}

#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub chats: Vec<Chat>,
    pub current: Option<Chat>,
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient status-line notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Error,
        }
    }
}

/// Why the chat surface exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiOutcome {
    Quit,
    LoggedOut,
    SessionExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Sidebar,
    Composer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Message,
    UploadPath,
    RenameTitle,
}

/// Main TUI application state
pub struct App {
    /// Latest chat list from the controller task.
    chats: Vec<Chat>,
    /// Active chat, detail shape.
    current: Option<Chat>,
    /// Initial list load still pending.
    loading: bool,
    /// Identity line for the sidebar footer.
    identity: String,
    /// Composer contents.
    input: String,
    input_mode: InputMode,
    /// Chat being retitled while the composer is in rename mode.
    rename_target: Option<String>,
    focus: Focus,
    /// Sidebar cursor.
    selected: usize,
    sidebar_open: bool,
    /// Scroll offset for the message pane.
    scroll: u16,
    /// Follow the newest message unless the user scrolled away.
    auto_scroll: bool,
    notice: Option<(Notice, Instant)>,
    /// Single in-flight guard; set on dispatch, cleared by the next view.
    busy: bool,
    outcome: Option<TuiOutcome>,
    /// Channel to send commands to the network task.
    command_tx: tokio_mpsc::Sender<UiCommand>,
    /// Channel to receive events from the network task.
    event_rx: Receiver<UiEvent>,
}

impl App {
    pub fn new(
        identity: String,
        command_tx: tokio_mpsc::Sender<UiCommand>,
        event_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            chats: Vec::new(),
            current: None,
            loading: true,
            identity,
            input: String::new(),
            input_mode: InputMode::Message,
            rename_target: None,
            focus: Focus::Composer,
            selected: 0,
            sidebar_open: true,
            scroll: 0,
            auto_scroll: true,
            notice: None,
            busy: false,
            outcome: None,
            command_tx,
            event_rx,
        }
    }

    /// Run the TUI main loop
    pub fn run(&mut self) -> io::Result<TuiOutcome> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        while self.outcome.is_none() {
            // Apply pending events from the network task
            self.process_events();

            // Draw UI
            terminal.draw(|f| self.draw(f))?;

            // Handle input with timeout
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        Ok(self.outcome.unwrap_or(TuiOutcome::Quit))
    }

    /// Drain pending events from the network task
    fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                UiEvent::View(snapshot) => {
                    self.busy = false;
                    self.apply_snapshot(snapshot);
                }
                UiEvent::Notice(notice) => {
                    self.notice = Some((notice, Instant::now()));
                }
                UiEvent::SendFailed { text } => {
                    // Restore the composed text unless the user already
                    // started typing something new.
                    if self.input.is_empty() {
                        self.input = text;
                    }
                }
                UiEvent::SessionExpired => {
                    // Leave the chat surface exactly once, whichever call
                    // noticed the expiry first.
                    if self.outcome.is_none() {
                        self.outcome = Some(TuiOutcome::SessionExpired);
                    }
                }
                UiEvent::LoggedOut => {
                    self.outcome = Some(TuiOutcome::LoggedOut);
                }
            }
        }

        let stale = self
            .notice
            .as_ref()
            .map_or(false, |(_, shown_at)| shown_at.elapsed() > NOTICE_TTL);
        if stale {
            self.notice = None;
        }
    }

    fn apply_snapshot(&mut self, snapshot: ViewSnapshot) {
        let switched = match (&self.current, &snapshot.current) {
            (Some(previous), Some(next)) => previous.id != next.id,
            (None, None) => false,
            _ => true,
        };
        self.chats = snapshot.chats;
        self.current = snapshot.current;
        self.loading = snapshot.loading;
        if switched {
            self.auto_scroll = true;
        }
        self.selected = self.selected.min(self.chats.len().saturating_sub(1));
    }

    /// Handle keyboard input
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        // Global shortcuts
        if modifiers.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Char('c') => {
                    self.outcome = Some(TuiOutcome::Quit);
                }
                KeyCode::Char('n') => {
                    self.dispatch(UiCommand::NewChat);
                }
                KeyCode::Char('u') => {
                    self.input_mode = InputMode::UploadPath;
                    self.focus = Focus::Composer;
                }
                KeyCode::Char('l') => {
                    self.dispatch(UiCommand::Logout);
                }
                KeyCode::Char('b') => {
                    self.sidebar_open = !self.sidebar_open;
                }
                _ => {}
            }
            return;
        }

        if code == KeyCode::Tab {
            self.focus = match self.focus {
                Focus::Sidebar => Focus::Composer,
                Focus::Composer => Focus::Sidebar,
            };
            return;
        }

        match self.focus {
            Focus::Composer => self.handle_composer_key(code),
            Focus::Sidebar => self.handle_sidebar_key(code),
        }
    }

    fn handle_composer_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => {
                self.input.clear();
                self.input_mode = InputMode::Message;
                self.rename_target = None;
            }
            KeyCode::PageUp => {
                self.auto_scroll = false;
                self.scroll = self.scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.scroll += 10;
            }
            _ => {}
        }
    }

    fn handle_sidebar_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected + 1 < self.chats.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(chat) = self.chats.get(self.selected) {
                    let id = chat.id.clone();
                    self.dispatch(UiCommand::SelectChat(id));
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if let Some(chat) = self.chats.get(self.selected) {
                    let id = chat.id.clone();
                    self.dispatch(UiCommand::DeleteChat(id));
                }
            }
            KeyCode::Char('r') => {
                if let Some(chat) = self.chats.get(self.selected) {
                    self.rename_target = Some(chat.id.clone());
                    self.input = chat.title.clone();
                    self.input_mode = InputMode::RenameTitle;
                    self.focus = Focus::Composer;
                }
            }
            _ => {}
        }
    }

    /// Submit the composer: a message send, or an upload path.
    fn submit_input(&mut self) {
        if self.busy {
            return;
        }
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }

        match self.input_mode {
            InputMode::Message => {
                self.input.clear();
                self.dispatch(UiCommand::SendMessage(text));
            }
            InputMode::UploadPath => {
                self.input.clear();
                self.input_mode = InputMode::Message;
                let chat_id = self.current.as_ref().map(|chat| chat.id.clone());
                self.dispatch(UiCommand::UploadDocument {
                    path: PathBuf::from(text),
                    chat_id,
                });
            }
            InputMode::RenameTitle => {
                self.input.clear();
                self.input_mode = InputMode::Message;
                if let Some(id) = self.rename_target.take() {
                    self.dispatch(UiCommand::RenameChat { id, title: text });
                }
            }
        }
    }

    fn dispatch(&mut self, command: UiCommand) {
        if self.busy {
            return;
        }
        match self.command_tx.try_send(command) {
            Ok(()) => self.busy = true,
            Err(_) => {
                self.notice = Some((
                    Notice::error("Still working on the previous action"),
                    Instant::now(),
                ));
            }
        }
    }

    /// Draw the UI
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Split into main content and status bar
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let chat_area = if self.sidebar_open {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(32), Constraint::Min(0)])
                .split(main_layout[0]);
            self.draw_sidebar(frame, panes[0]);
            panes[1]
        } else {
            main_layout[0]
        };

        self.draw_chat_window(frame, chat_area);
        self.draw_status_bar(frame, main_layout[1]);
    }

    /// Draw the sidebar: chat list plus identity footer
    fn draw_sidebar(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focus == Focus::Sidebar {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let block = Block::default()
            .title(" Chats ")
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(inner);

        if self.loading {
            frame.render_widget(Paragraph::new("Loading chats..."), layout[0]);
        } else if self.chats.is_empty() {
            frame.render_widget(
                Paragraph::new("No chats yet.\nType a message to start one.")
                    .style(Style::default().fg(Color::DarkGray)),
                layout[0],
            );
        } else {
            let items: Vec<ListItem> = self.chats.iter().map(sidebar_item).collect();
            let list = List::new(items)
                .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
                .highlight_symbol("> ");
            let mut state = ListState::default();
            state.select(Some(self.selected));
            frame.render_stateful_widget(list, layout[0], &mut state);
        }

        let footer = vec![
            Line::from(Span::styled(
                self.identity.clone(),
                Style::default().fg(Color::Green),
            )),
            Line::from(Span::styled(
                "Ctrl+N new | Ctrl+L logout",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(footer), layout[1]);
    }

    fn draw_chat_window(&mut self, frame: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        self.draw_messages(frame, layout[0]);
        self.draw_composer(frame, layout[1]);
    }

    fn draw_messages(&mut self, frame: &mut Frame, area: Rect) {
        let title = match &self.current {
            Some(chat) => format!(" {} ", chat.title),
            None => " New Chat ".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let has_history = self
            .current
            .as_ref()
            .map_or(false, |chat| !chat.history().is_empty());
        if !has_history {
            self.draw_empty_state(frame, inner);
            return;
        }

        let lines = match &self.current {
            Some(chat) => transcript_lines(chat),
            None => Vec::new(),
        };
        let total = lines.len() as u16;
        let max_scroll = total.saturating_sub(inner.height);
        if self.auto_scroll || self.scroll > max_scroll {
            self.scroll = max_scroll;
        }
        if self.scroll >= max_scroll {
            self.auto_scroll = true;
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, inner);
    }

    fn draw_empty_state(&self, frame: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Lipi - Hindi document digitization",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Upload scanned government documents and ask about them"),
            Line::from(""),
            Line::from("• Supports handwritten and printed Hindi text"),
            Line::from("• Process FIRs, witness statements, court orders"),
            Line::from("• Ctrl+U uploads an image or PDF"),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
    }

    fn draw_composer(&self, frame: &mut Frame, area: Rect) {
        let title = match self.input_mode {
            InputMode::Message => " Message (Enter to send) ",
            InputMode::UploadPath => " Upload path (Esc to cancel) ",
            InputMode::RenameTitle => " New title (Esc to cancel) ",
        };
        let border_style = if self.busy {
            Style::default().fg(Color::DarkGray)
        } else if self.focus == Focus::Composer {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let cursor = if self.busy { "" } else { "_" };
        frame.render_widget(
            Paragraph::new(format!("{}{}", self.input, cursor)),
            inner,
        );
    }

    fn draw_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some((notice, _)) = &self.notice {
            let style = match notice.level {
                NoticeLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
                NoticeLevel::Info => Style::default().bg(Color::Green).fg(Color::Black),
            };
            frame.render_widget(Paragraph::new(format!(" {} ", notice.text)).style(style), area);
            return;
        }

        let status = if self.busy {
            " Working... ".to_string()
        } else {
            " Tab: Focus | Enter: Send/Open | d: Delete | r: Rename | Ctrl+N: New | Ctrl+U: Upload | Ctrl+L: Logout | Ctrl+C: Quit ".to_string()
        };
        let paragraph =
            Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
        frame.render_widget(paragraph, area);
    }
}

/// One sidebar row: title plus a dim last-message preview.
fn sidebar_item(chat: &Chat) -> ListItem<'static> {
    let mut lines = vec![Line::from(truncate(&chat.title, 28))];
    if let Some(last) = &chat.last_message {
        lines.push(Line::from(Span::styled(
            truncate(last, 28),
            Style::default().fg(Color::DarkGray),
        )));
    }
    ListItem::new(lines)
}

/// Flatten a chat's history into display lines: user messages right
/// aligned, assistant markdown styled, timestamps in local time.
fn transcript_lines(chat: &Chat) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in chat.history() {
        let stamp = message
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M")
            .to_string();
        match message.role {
            Role::User => {
                lines.push(
                    Line::from(Span::styled(
                        format!("You  {stamp}"),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ))
                    .alignment(Alignment::Right),
                );
                for text in message.content.lines() {
                    lines.push(
                        Line::from(Span::styled(
                            text.to_string(),
                            Style::default().fg(Color::Cyan),
                        ))
                        .alignment(Alignment::Right),
                    );
                }
            }
            Role::Assistant => {
                lines.push(Line::from(Span::styled(
                    format!("Assistant  {stamp}"),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )));
                lines.extend(markdown::render(&message.content));
            }
            Role::System => {
                lines.push(Line::from(Span::styled(
                    format!("[system] {}", message.content),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

/// Char-safe truncation with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut shortened: String = text.chars().take(max).collect();
        shortened.push('…');
        shortened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::Message;
    use std::sync::mpsc;

    fn chat_with_history() -> Chat {
        let at = Utc.timestamp_opt(1_709_287_200, 0).unwrap();
        Chat {
            id: "c1".to_string(),
            title: "FIR 42/2024".to_string(),
            message_count: Some(2),
            last_message: None,
            messages: Some(vec![
                Message {
                    role: Role::User,
                    content: "summarize the FIR".to_string(),
                    timestamp: at,
                },
                Message {
                    role: Role::Assistant,
                    content: "The complaint alleges **theft**.".to_string(),
                    timestamp: at,
                },
            ]),
            created_at: at,
            updated_at: at,
        }
    }

    fn app() -> (App, tokio_mpsc::Receiver<UiCommand>) {
        let (command_tx, command_rx) = tokio_mpsc::channel(8);
        let (_event_tx, event_rx) = mpsc::channel();
        (App::new("Asha <a@b.c>".to_string(), command_tx, event_rx), command_rx)
    }

    #[test]
    fn test_transcript_orders_user_then_assistant() {
        let lines = transcript_lines(&chat_with_history());
        assert!(lines[0].spans[0].content.starts_with("You"));
        assert_eq!(lines[0].alignment, Some(Alignment::Right));
        let assistant_header = lines
            .iter()
            .position(|line| line.spans[0].content.starts_with("Assistant"))
            .unwrap();
        assert!(assistant_header > 0);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 28), "short");
        let hindi = "प्राथमिकी संख्या बयालीस दो हज़ार चौबीस";
        let cut = truncate(hindi, 10);
        assert_eq!(cut.chars().count(), 11);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_empty_or_blank_input_never_dispatches() {
        let (mut app, mut command_rx) = app();

        app.submit_input();
        app.input = "   ".to_string();
        app.submit_input();

        assert!(command_rx.try_recv().is_err());
        assert!(!app.busy);
    }

    #[test]
    fn test_send_trims_and_sets_inflight_guard() {
        let (mut app, mut command_rx) = app();
        app.input = "  hello  ".to_string();

        app.submit_input();

        match command_rx.try_recv().unwrap() {
            UiCommand::SendMessage(text) => assert_eq!(text, "hello"),
            other => panic!("expected SendMessage, got {other:?}"),
        }
        assert!(app.busy);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_busy_blocks_further_submissions() {
        let (mut app, mut command_rx) = app();
        app.busy = true;
        app.input = "second".to_string();

        app.submit_input();

        assert!(command_rx.try_recv().is_err());
        // The text is not lost while the guard holds.
        assert_eq!(app.input, "second");
    }

    #[test]
    fn test_upload_without_active_chat_has_no_chat_tag() {
        let (mut app, mut command_rx) = app();
        app.input_mode = InputMode::UploadPath;
        app.input = "/scans/fir.pdf".to_string();

        app.submit_input();

        match command_rx.try_recv().unwrap() {
            UiCommand::UploadDocument { path, chat_id } => {
                assert_eq!(path, PathBuf::from("/scans/fir.pdf"));
                assert_eq!(chat_id, None);
            }
            other => panic!("expected UploadDocument, got {other:?}"),
        }
        assert_eq!(app.input_mode, InputMode::Message);
    }

    #[test]
    fn test_upload_with_active_chat_is_tagged() {
        let (mut app, mut command_rx) = app();
        app.current = Some(chat_with_history());
        app.input_mode = InputMode::UploadPath;
        app.input = "statement.jpg".to_string();

        app.submit_input();

        match command_rx.try_recv().unwrap() {
            UiCommand::UploadDocument { chat_id, .. } => {
                assert_eq!(chat_id.as_deref(), Some("c1"));
            }
            other => panic!("expected UploadDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_rename_submit_targets_selected_chat() {
        let (mut app, mut command_rx) = app();
        app.rename_target = Some("c1".to_string());
        app.input_mode = InputMode::RenameTitle;
        app.input = "Court order 7".to_string();

        app.submit_input();

        match command_rx.try_recv().unwrap() {
            UiCommand::RenameChat { id, title } => {
                assert_eq!(id, "c1");
                assert_eq!(title, "Court order 7");
            }
            other => panic!("expected RenameChat, got {other:?}"),
        }
        assert_eq!(app.input_mode, InputMode::Message);
        assert_eq!(app.rename_target, None);
    }

    #[test]
    fn test_failed_send_restores_composed_text() {
        let (mut app, _command_rx) = app();
        let (event_tx, event_rx) = mpsc::channel();
        app.event_rx = event_rx;

        event_tx
            .send(UiEvent::SendFailed {
                text: "lost message".to_string(),
            })
            .unwrap();
        app.process_events();

        assert_eq!(app.input, "lost message");
    }

    #[test]
    fn test_session_expiry_exits_exactly_once() {
        let (mut app, _command_rx) = app();
        let (event_tx, event_rx) = mpsc::channel();
        app.event_rx = event_rx;

        event_tx.send(UiEvent::SessionExpired).unwrap();
        event_tx.send(UiEvent::SessionExpired).unwrap();
        app.process_events();

        assert_eq!(app.outcome, Some(TuiOutcome::SessionExpired));
    }

    #[test]
    fn test_view_event_clears_inflight_guard() {
        let (mut app, _command_rx) = app();
        let (event_tx, event_rx) = mpsc::channel();
        app.event_rx = event_rx;
        app.busy = true;

        event_tx
            .send(UiEvent::View(ViewSnapshot {
                chats: vec![chat_with_history()],
                current: None,
                loading: false,
            }))
            .unwrap();
        app.process_events();

        assert!(!app.busy);
        assert_eq!(app.chats.len(), 1);
        assert!(!app.loading);
    }
}
