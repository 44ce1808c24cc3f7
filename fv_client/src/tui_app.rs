//! TUI application for the file vault client.
//!
//! Mirrors the route surface of the web client as screens: login,
//! registration, MFA enrollment/verification, the file table, the admin
//! roster, and the shared-file viewer. All state transitions go through
//! the injected [`SessionManager`]; the UI only reads its state and
//! branches navigation on it.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Alignment, Constraint, Flex, Layout, Position, Rect},
    style::{Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Cell, Clear, Padding, Paragraph, Row, Table, Wrap},
};

use file_vault::{AuthApi, FilesApi, UsersApi};
use file_vault::files::{self, FileId, FileRecord, to_data_uri};
use file_vault::mfa::MfaFlow;
use file_vault::session::{Role, SessionManager};
use file_vault::store::{CachedBlob, Store};
use file_vault::users::UserRecord;

use crate::api_client::ApiClient;
use crate::routes::{Route, share_link};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);
const QR_FILE: &str = "mfa-qr.png";

/// Importance label for the transient status line
#[derive(Clone, Copy, PartialEq)]
enum NoticeKind {
    Info,
    Error,
}

/// A timestamped status message shown under the active screen
struct Notice {
    datetime: DateTime<Utc>,
    kind: NoticeKind,
    content: String,
}

impl Notice {
    fn info(content: impl Into<String>) -> Self {
        Self {
            datetime: Utc::now(),
            kind: NoticeKind::Info,
            content: content.into(),
        }
    }

    fn error(content: impl Into<String>) -> Self {
        Self {
            datetime: Utc::now(),
            kind: NoticeKind::Error,
            content: content.into(),
        }
    }
}

/// One editable line in a form
struct Field {
    label: &'static str,
    value: String,
    masked: bool,
}

impl Field {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    fn masked(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: true,
        }
    }

    fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Focusable form state for the current screen
#[derive(Default)]
struct Form {
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    fn focused_mut(&mut self) -> Option<&mut Field> {
        self.fields.get_mut(self.focus)
    }

    fn next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    fn prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.value.as_str()).unwrap_or("")
    }
}

/// Modal overlay above the current screen
enum Popup {
    FileView { filename: String, blob: CachedBlob },
    ShareLink { filename: String, link: String },
    ConfirmDelete { id: FileId, filename: String },
    Upload { path: Field },
}

enum Flow {
    Continue,
    Exit,
}

/// TUI app state
pub struct TuiApp {
    session: SessionManager,
    mfa_flow: MfaFlow,
    store: Store,
    api: ApiClient,
    api_url: String,
    route: Route,
    form: Form,
    files: Vec<FileRecord>,
    users: Vec<UserRecord>,
    selected: usize,
    shared_blob: Option<CachedBlob>,
    qr_note: Option<String>,
    notice: Option<Notice>,
    popup: Option<Popup>,
}

impl TuiApp {
    pub fn new(session: SessionManager, store: Store, api: ApiClient, api_url: String) -> Self {
        Self {
            session,
            mfa_flow: MfaFlow::new(),
            store,
            api,
            api_url,
            route: Route::Login,
            form: Form::default(),
            files: Vec::new(),
            users: Vec::new(),
            selected: 0,
            shared_blob: None,
            qr_note: None,
            notice: None,
            popup: None,
        }
    }

    /// Run the TUI application
    pub async fn run(mut self, start: Route, mut terminal: DefaultTerminal) -> Result<()> {
        self.navigate(start).await;

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(POLL_TIMEOUT)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Flow::Exit = self.handle_key(key).await {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Switch screens, applying the admin gate and the on-entry effects
    /// of the target screen.
    async fn navigate(&mut self, route: Route) {
        let route = route.resolve(self.session.is_admin());

        self.session.clear_flags();
        self.popup = None;
        self.notice = None;
        self.selected = 0;

        self.form = match &route {
            Route::Login => {
                let mut username = Field::new("Username");
                username.value = self.session.state().username.clone();
                if username.value.is_empty() {
                    username.value = whoami::username();
                }
                Form::new(vec![username, Field::masked("Password")])
            }
            Route::Register => Form::new(vec![
                Field::new("Username"),
                Field::new("Email"),
                Field::masked("Password"),
                Field::masked("Confirm Password"),
                Field::new("Role (admin/user)"),
            ]),
            Route::MfaVerify => Form::new(vec![Field::new("6-digit TOTP")]),
            _ => Form::default(),
        };
        if let Route::Register = route {
            if let Some(role) = self.form.fields.last_mut() {
                role.value = "user".to_string();
            }
        }

        self.route = route;

        match self.route.clone() {
            Route::MfaVerify => self.load_qr_code().await,
            Route::Home => self.load_files().await,
            Route::Users => self.load_users().await,
            Route::SharedFile(share_id) => self.load_shared_file(&share_id).await,
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Data loading
    // ------------------------------------------------------------------

    async fn load_files(&mut self) {
        match self.api.list_files().await {
            Ok(files) => {
                // Full snapshot replacement; ordering is server-determined.
                self.files = files;
                if self.selected >= self.files.len() {
                    self.selected = self.files.len().saturating_sub(1);
                }
            }
            Err(e) => self.notice = Some(Notice::error(format!("Failed to fetch files: {e}"))),
        }
    }

    async fn load_users(&mut self) {
        match self.api.list_users().await {
            Ok(users) => self.users = users,
            Err(e) => self.notice = Some(Notice::error(format!("Failed to fetch users: {e}"))),
        }
    }

    async fn load_shared_file(&mut self, share_id: &str) {
        match files::view_shared_file(&self.store, &self.api, share_id).await {
            Ok(blob) => self.shared_blob = Some(blob),
            Err(e) => {
                self.shared_blob = None;
                self.notice = Some(Notice::error(format!("Error viewing file: {e}")));
            }
        }
    }

    /// Fetch the provisioning QR image and stash it where an image viewer
    /// can open it; the inline representation is the same data URI the
    /// blob cache uses.
    async fn load_qr_code(&mut self) {
        match self.api.mfa_qr_code().await {
            Ok(bytes) => {
                let payload = file_vault::files::BinaryPayload {
                    bytes,
                    content_type: "image/png".to_string(),
                };
                match to_data_uri(&payload) {
                    Ok(blob) => {
                        let written = self
                            .store
                            .path()
                            .and_then(|p| p.parent().map(|d| d.join(QR_FILE)))
                            .and_then(|qr_path| {
                                std::fs::write(&qr_path, &payload.bytes).ok().map(|_| qr_path)
                            });
                        self.qr_note = Some(match written {
                            Some(path) => format!(
                                "QR written to {} ({} inline bytes)",
                                path.display(),
                                blob.content.len()
                            ),
                            None => "QR fetched (inline only)".to_string(),
                        });
                    }
                    Err(e) => self.notice = Some(Notice::error(e.to_string())),
                }
            }
            Err(e) => {
                self.qr_note = None;
                self.notice = Some(Notice::error(format!("Failed to fetch QR code: {e}")));
            }
        }
    }

    fn persist_profile(&mut self) {
        if let Err(e) = self.store.save_profile(&self.session.state().profile()) {
            log::warn!("failed to persist session profile: {e}");
        }
    }

    // ------------------------------------------------------------------
    // Submissions
    // ------------------------------------------------------------------

    async fn submit_login(&mut self) {
        if self.session.state().pending {
            return;
        }
        let username = self.form.value(0).to_string();
        let password = self.form.value(1).to_string();
        self.session.login(&self.api, &username, &password).await;

        let state = self.session.state();
        if let Some(error) = &state.error {
            self.notice = Some(Notice::error(error.clone()));
            return;
        }
        if state.challenge_code.is_some() {
            // Enrolled in an earlier session: straight to verification.
            let _ = self.mfa_flow.challenge();
            self.navigate(Route::MfaVerify).await;
        } else if state.success {
            self.persist_profile();
            self.navigate(Route::Home).await;
        }
    }

    async fn submit_register(&mut self) {
        if self.session.state().pending {
            return;
        }
        let role = match self.form.value(4).trim().parse::<Role>() {
            Ok(role) => role,
            Err(_) => {
                self.notice = Some(Notice::error("Role must be 'admin' or 'user'"));
                return;
            }
        };
        let (username, email) = (self.form.value(0).to_string(), self.form.value(1).to_string());
        let (password, confirm) = (self.form.value(2).to_string(), self.form.value(3).to_string());

        self.session
            .register(&self.api, &username, &email, &password, &confirm, role)
            .await;

        let state = self.session.state();
        if let Some(error) = &state.error {
            self.notice = Some(Notice::error(error.clone()));
        } else if state.success {
            self.persist_profile();
            self.navigate(Route::MfaEnable).await;
        }
    }

    async fn submit_enable_mfa(&mut self) {
        if self.session.state().pending || self.session.state().is_mfa_enabled {
            return;
        }
        if self.mfa_flow.opt_in().is_err() {
            return;
        }
        self.session.enable_mfa(&self.api).await;

        if self.session.state().is_mfa_enabled {
            let _ = self.mfa_flow.enrollment_confirmed();
            self.persist_profile();
            self.notice = Some(Notice::info("MFA has been enabled."));
        } else {
            self.mfa_flow = MfaFlow::new();
            if let Some(error) = &self.session.state().error {
                self.notice = Some(Notice::error(error.clone()));
            }
        }
    }

    async fn submit_verify_mfa(&mut self) {
        if self.session.state().pending {
            return;
        }
        let totp = self.form.value(0).trim().to_string();
        self.session.verify_mfa(&self.api, &totp).await;

        let state = self.session.state();
        if let Some(error) = &state.error {
            self.notice = Some(Notice::error(error.clone()));
        } else if state.success {
            let _ = self.mfa_flow.verified();
            self.persist_profile();
            self.navigate(Route::Home).await;
        }
    }

    async fn submit_logout(&mut self) {
        if self.session.state().pending {
            return;
        }
        self.session.logout(&self.api).await;

        if self.session.take_logout_success() {
            if let Err(e) = self.store.clear_profile() {
                log::warn!("failed to clear persisted profile: {e}");
            }
            self.mfa_flow = MfaFlow::new();
            self.navigate(Route::Login).await;
        } else if let Some(error) = &self.session.state().error {
            self.notice = Some(Notice::error(error.clone()));
        }
    }

    async fn view_selected_file(&mut self) {
        let Some(record) = self.files.get(self.selected) else {
            return;
        };
        let (id, filename) = (record.id, record.filename.clone());
        match files::view_file(&self.store, &self.api, id).await {
            Ok(blob) => self.popup = Some(Popup::FileView { filename, blob }),
            Err(e) => self.notice = Some(Notice::error(format!("Error viewing file: {e}"))),
        }
    }

    async fn share_selected_file(&mut self) {
        let Some(record) = self.files.get(self.selected) else {
            return;
        };
        let (id, filename) = (record.id, record.filename.clone());
        match self.api.share_file(id).await {
            Ok(share_id) => {
                let link = share_link(&self.api_url, &share_id);
                self.popup = Some(Popup::ShareLink { filename, link });
            }
            Err(e) => self.notice = Some(Notice::error(format!("Error sharing file: {e}"))),
        }
    }

    async fn delete_file(&mut self, id: FileId) {
        match self.api.delete_file(id).await {
            Ok(()) => {
                self.notice = Some(Notice::info("File deleted."));
                self.load_files().await;
            }
            Err(e) => self.notice = Some(Notice::error(format!("Error deleting file: {e}"))),
        }
    }

    async fn upload_file(&mut self, path: &str) {
        let path = path.trim();
        let filename = std::path::Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.notice = Some(Notice::error(format!("Cannot read {path}: {e}")));
                return;
            }
        };

        match self.api.upload_file(&filename, bytes).await {
            Ok(()) => {
                self.notice = Some(Notice::info("File uploaded successfully."));
                self.load_files().await;
            }
            Err(e) => {
                self.notice = Some(Notice::error(format!(
                    "An error occurred while uploading the file: {e}"
                )));
            }
        }
    }

    // ------------------------------------------------------------------
    // Input handling
    // ------------------------------------------------------------------

    async fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if self.popup.is_some() {
            self.handle_popup_key(key).await;
            return Flow::Continue;
        }

        // Global chords first.
        if key.modifiers == KeyModifiers::CONTROL {
            match key.code {
                KeyCode::Char('c') => return Flow::Exit,
                KeyCode::Char('l') if self.is_authenticated() => {
                    self.submit_logout().await;
                }
                _ => {}
            }
            return Flow::Continue;
        }

        match self.route.clone() {
            Route::Login => match key.code {
                KeyCode::Esc => return Flow::Exit,
                KeyCode::Enter => self.submit_login().await,
                KeyCode::F(2) => self.navigate(Route::Register).await,
                _ => self.edit_form(key),
            },
            Route::Register => match key.code {
                KeyCode::Esc => self.navigate(Route::Login).await,
                KeyCode::Enter => self.submit_register().await,
                _ => self.edit_form(key),
            },
            Route::MfaEnable => match key.code {
                KeyCode::Esc => return Flow::Exit,
                KeyCode::Char('e') if !self.session.state().is_mfa_enabled => {
                    self.submit_enable_mfa().await;
                }
                KeyCode::Char('v') if self.session.state().is_mfa_enabled => {
                    self.navigate(Route::MfaVerify).await;
                }
                KeyCode::Char('s') if !self.session.state().is_mfa_enabled => {
                    // Declining enrollment is a legitimate terminal path.
                    let _ = self.mfa_flow.skip();
                    self.navigate(Route::Home).await;
                }
                _ => {}
            },
            Route::MfaVerify => match key.code {
                KeyCode::Esc => return Flow::Exit,
                KeyCode::Enter => self.submit_verify_mfa().await,
                _ => self.edit_form(key),
            },
            Route::Home => match key.code {
                KeyCode::Esc => return Flow::Exit,
                KeyCode::Up => self.selected = self.selected.saturating_sub(1),
                KeyCode::Down => {
                    if self.selected + 1 < self.files.len() {
                        self.selected += 1;
                    }
                }
                KeyCode::Char('r') => self.load_files().await,
                KeyCode::Char('v') => self.view_selected_file().await,
                KeyCode::Char('s') => self.share_selected_file().await,
                KeyCode::Char('u') => {
                    self.popup = Some(Popup::Upload {
                        path: Field::new("Path to file"),
                    });
                }
                KeyCode::Char('d') => {
                    if let Some(record) = self.files.get(self.selected) {
                        self.popup = Some(Popup::ConfirmDelete {
                            id: record.id,
                            filename: record.filename.clone(),
                        });
                    }
                }
                KeyCode::Char('a') => self.navigate(Route::Users).await,
                _ => {}
            },
            Route::Users => match key.code {
                KeyCode::Esc | KeyCode::Char('b') => self.navigate(Route::Home).await,
                KeyCode::Char('r') => self.load_users().await,
                KeyCode::Up => self.selected = self.selected.saturating_sub(1),
                KeyCode::Down => {
                    if self.selected + 1 < self.users.len() {
                        self.selected += 1;
                    }
                }
                _ => {}
            },
            Route::SharedFile(_) => match key.code {
                KeyCode::Esc | KeyCode::Char('b') => {
                    let back = if self.is_authenticated() {
                        Route::Home
                    } else {
                        Route::Login
                    };
                    self.shared_blob = None;
                    self.navigate(back).await;
                }
                _ => {}
            },
        }

        Flow::Continue
    }

    async fn handle_popup_key(&mut self, key: KeyEvent) {
        match self.popup.take() {
            Some(Popup::Upload { mut path }) => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => {
                    let input = path.value.clone();
                    self.upload_file(&input).await;
                }
                KeyCode::Char(c) => {
                    path.value.push(c);
                    self.popup = Some(Popup::Upload { path });
                }
                KeyCode::Backspace => {
                    path.value.pop();
                    self.popup = Some(Popup::Upload { path });
                }
                _ => self.popup = Some(Popup::Upload { path }),
            },
            Some(Popup::ConfirmDelete { id, filename }) => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.delete_file(id).await,
                KeyCode::Esc | KeyCode::Char('n') => {}
                _ => self.popup = Some(Popup::ConfirmDelete { id, filename }),
            },
            Some(popup) => match key.code {
                // View/share dialogs close on any dismissal key.
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {}
                _ => self.popup = Some(popup),
            },
            None => {}
        }
    }

    fn edit_form(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.next(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev(),
            KeyCode::Char(c) => {
                if let Some(field) = self.form.focused_mut() {
                    field.value.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.form.focused_mut() {
                    field.value.pop();
                }
            }
            _ => {}
        }
    }

    fn is_authenticated(&self) -> bool {
        !self.session.state().username.is_empty() && self.session.state().role != Role::Guest
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn draw(&mut self, frame: &mut Frame) {
        let window = Layout::vertical([
            Constraint::Min(6),    // Screen body
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help bar
        ]);
        let [body_area, status_area, help_area] = window.areas(frame.area());

        match self.route.clone() {
            Route::Login => self.draw_form_screen(frame, body_area, " login  "),
            Route::Register => self.draw_form_screen(frame, body_area, " register  "),
            Route::MfaEnable => self.draw_mfa_enable(frame, body_area),
            Route::MfaVerify => self.draw_mfa_verify(frame, body_area),
            Route::Home => self.draw_home(frame, body_area),
            Route::Users => self.draw_users(frame, body_area),
            Route::SharedFile(share_id) => self.draw_shared(frame, body_area, &share_id),
        }

        self.draw_status(frame, status_area);
        self.draw_help_bar(frame, help_area);

        if self.popup.is_some() {
            self.draw_popup(frame);
        }
    }

    fn draw_form_screen(&self, frame: &mut Frame, area: Rect, title: &str) {
        let vertical = Layout::vertical([Constraint::Max(3 * self.form.fields.len() as u16 + 2)])
            .flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(60)]).flex(Flex::Center);
        let [form_area] = vertical.areas(area);
        let [form_area] = horizontal.areas(form_area);

        let block = Block::bordered()
            .padding(Padding::horizontal(1))
            .title(title.light_green());
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let constraints = vec![Constraint::Length(3); self.form.fields.len()];
        let field_areas = Layout::vertical(constraints).split(inner);

        for (idx, field) in self.form.fields.iter().enumerate() {
            let Some(field_area) = field_areas.get(idx) else {
                continue;
            };
            let mut block = Block::bordered().title(field.label);
            if idx == self.form.focus {
                block = block.border_style(Style::default().light_green());
            }
            let text = Paragraph::new(field.display()).block(block);
            frame.render_widget(text, *field_area);

            if idx == self.form.focus {
                frame.set_cursor_position(Position::new(
                    field_area.x + field.display().chars().count() as u16 + 1,
                    field_area.y + 1,
                ));
            }
        }
    }

    fn draw_mfa_enable(&self, frame: &mut Frame, area: Rect) {
        let enabled = self.session.state().is_mfa_enabled || self.session.state().success;
        let lines: Vec<Line> = if enabled {
            vec![
                Line::from("MFA has been enabled.".light_green()),
                Line::from(""),
                Line::from(vec!["press ".into(), "v".bold().white(), " to verify".into()]),
            ]
        } else {
            vec![
                Line::from("Would you like to enable Multi-Factor Authentication (MFA)"),
                Line::from("for added security?"),
                Line::from(""),
                Line::from(vec![
                    "press ".into(),
                    "e".bold().white(),
                    " to enable, or ".into(),
                    "s".bold().white(),
                    " to skip for now".into(),
                ]),
            ]
        };

        let paragraph = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .padding(Padding::uniform(1))
                    .title(" enable multi-factor authentication  "),
            );
        frame.render_widget(paragraph, area);
    }

    fn draw_mfa_verify(&self, frame: &mut Frame, area: Rect) {
        let [info_area, input_area] =
            Layout::vertical([Constraint::Min(4), Constraint::Length(3)]).areas(area);

        let qr_line = match &self.qr_note {
            Some(note) => Line::from(note.as_str()),
            None => Line::from("Fetching provisioning QR code...".dark_gray()),
        };
        let info = Paragraph::new(Text::from(vec![
            Line::from("Scan the QR code with your authenticator app to get the TOTP."),
            Line::from(""),
            qr_line,
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" verify multi-factor authentication  "),
        );
        frame.render_widget(info, info_area);

        let code = Paragraph::new(self.form.value(0)).block(
            Block::bordered()
                .border_style(Style::default().light_green())
                .title("Enter 6-digit TOTP"),
        );
        frame.render_widget(code, input_area);
        frame.set_cursor_position(Position::new(
            input_area.x + self.form.value(0).chars().count() as u16 + 1,
            input_area.y + 1,
        ));
    }

    fn make_file_row(&self, idx: usize, record: &FileRecord) -> Row<'static> {
        let mut row = Row::new(vec![
            Cell::new(Text::from(record.filename.clone()).alignment(Alignment::Left)),
            Cell::new(Text::from(format!("{}", record.size)).alignment(Alignment::Right)),
            Cell::new(Text::from(record.content_type.clone()).alignment(Alignment::Left)),
            Cell::new(
                Text::from(record.uploaded_at.format("%Y-%m-%d %H:%M").to_string())
                    .alignment(Alignment::Left),
            ),
            Cell::new(
                Text::from(record.owner.clone().unwrap_or_default()).alignment(Alignment::Left),
            ),
        ]);
        if idx == self.selected {
            row = row.bold().white();
        }
        row
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect) {
        let username = &self.session.state().username;
        let table = Table::new(
            self.files
                .iter()
                .enumerate()
                .map(|(idx, record)| self.make_file_row(idx, record)),
            [
                Constraint::Fill(3),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Fill(2),
                Constraint::Fill(1),
            ],
        )
        .header(Row::new(["filename", "size", "type", "uploaded", "owner"]).dark_gray())
        .block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(format!(" files: {username}  ").light_green()),
        );
        frame.render_widget(table, area);
    }

    fn make_user_row(&self, idx: usize, user: &UserRecord) -> Row<'static> {
        let mfa_badge = if user.is_mfa_enabled {
            Span::from("Enabled").light_green()
        } else {
            Span::from("Disabled").light_red()
        };
        let role_badge = match user.role {
            Role::Admin => Span::from("admin").light_yellow(),
            Role::User => Span::from("user"),
            Role::Guest => Span::from("guest").dark_gray(),
        };
        let mut row = Row::new(vec![
            Cell::new(Text::from(user.username.clone()).alignment(Alignment::Left)),
            Cell::new(Text::from(user.email.clone()).alignment(Alignment::Left)),
            Cell::new(Text::from(Line::from(role_badge)).alignment(Alignment::Center)),
            Cell::new(Text::from(Line::from(mfa_badge)).alignment(Alignment::Center)),
        ]);
        if idx == self.selected {
            row = row.bold().white();
        }
        row
    }

    fn draw_users(&self, frame: &mut Frame, area: Rect) {
        let table = Table::new(
            self.users
                .iter()
                .enumerate()
                .map(|(idx, user)| self.make_user_row(idx, user)),
            [
                Constraint::Fill(2),
                Constraint::Fill(3),
                Constraint::Fill(1),
                Constraint::Fill(1),
            ],
        )
        .header(Row::new(["username", "email", "role", "MFA status"]).dark_gray())
        .block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" users  ".light_green()),
        );
        frame.render_widget(table, area);
    }

    fn draw_shared(&self, frame: &mut Frame, area: Rect, share_id: &str) {
        let lines: Vec<Line> = match &self.shared_blob {
            Some(blob) => blob_summary_lines(blob),
            None => vec![Line::from("No content.".dark_gray())],
        };
        let paragraph = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .padding(Padding::uniform(1))
                    .title(format!(" shared file {share_id}  ")),
            );
        frame.render_widget(paragraph, area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = if self.session.state().pending {
            Line::from("working...".dark_gray())
        } else if let Some(notice) = &self.notice {
            let label = match notice.kind {
                NoticeKind::Info => "INFO".light_blue(),
                NoticeKind::Error => "ERROR".light_red(),
            };
            Line::from(vec![
                format!("[{} ", notice.datetime.format("%H:%M:%S")).into(),
                label,
                format!("]: {}", notice.content).into(),
            ])
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let help = match (&self.route, self.popup.is_some()) {
            (_, true) => "Enter confirm | Esc close",
            (Route::Login, _) => "Enter login | F2 register | Tab next field | Esc exit",
            (Route::Register, _) => "Enter register | Tab next field | Esc back to login",
            (Route::MfaEnable, _) => "e enable | s skip | v verify | Esc exit",
            (Route::MfaVerify, _) => "Enter verify | Esc exit",
            (Route::Home, _) => {
                "↑/↓ select | v view | u upload | s share | d delete | r refresh | a users | Ctrl-L logout | Esc exit"
            }
            (Route::Users, _) => "↑/↓ select | r refresh | b back | Ctrl-L logout",
            (Route::SharedFile(_), _) => "b back",
        };
        frame.render_widget(Paragraph::new(Line::from(help.dark_gray())), area);
    }

    fn draw_popup(&self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Max(12)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(80)]).flex(Flex::Center);
        let [popup_area] = vertical.areas(frame.area());
        let [popup_area] = horizontal.areas(popup_area);
        frame.render_widget(Clear, popup_area);

        let (title, lines): (String, Vec<Line>) = match &self.popup {
            Some(Popup::FileView { filename, blob }) => {
                (format!(" view file: {filename}  "), blob_summary_lines(blob))
            }
            Some(Popup::ShareLink { filename, link }) => (
                format!(" share file: {filename}  "),
                vec![
                    Line::from("Copy the link below to share the file:"),
                    Line::from(""),
                    Line::from(link.clone().light_green()),
                ],
            ),
            Some(Popup::ConfirmDelete { filename, .. }) => (
                " delete file  ".to_string(),
                vec![
                    Line::from(format!(
                        "Are you sure you want to delete the file \"{filename}\"?"
                    )),
                    Line::from("This action cannot be undone."),
                    Line::from(""),
                    Line::from(vec![
                        "press ".into(),
                        "y".bold().white(),
                        " to delete, ".into(),
                        "n".bold().white(),
                        " to cancel".into(),
                    ]),
                ],
            ),
            Some(Popup::Upload { path }) => (
                " upload file  ".to_string(),
                vec![
                    Line::from("Select a file to upload."),
                    Line::from(""),
                    Line::from(vec![
                        Span::from(path.label).dark_gray(),
                        ": ".into(),
                        path.value.clone().into(),
                    ]),
                ],
            ),
            None => return,
        };

        let paragraph = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::bordered().padding(Padding::uniform(1)).title(title));
        frame.render_widget(paragraph, popup_area);
    }
}

/// Render a cached blob as text: content type plus a truncated preview of
/// the inline representation.
fn blob_summary_lines(blob: &CachedBlob) -> Vec<Line<'static>> {
    let preview: String = blob.content.chars().take(120).collect();
    vec![
        Line::from(vec![
            Span::from("content type: ").dark_gray(),
            Span::from(blob.content_type.clone()),
        ]),
        Line::from(vec![
            Span::from("inline size: ").dark_gray(),
            Span::from(format!("{} bytes", blob.content.len())),
        ]),
        Line::from(""),
        Line::from(Span::from(format!("{preview}…")).dark_gray()),
    ]
}
