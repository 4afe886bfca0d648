// App state and main event loop.
// Seeds the page, routes key presses to the controllers and applies fetch results.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::api::{HubClient, RoleOption, endpoints::SET_ROLE};
use crate::config::Config;
use crate::dom::{Document, Element, FormSubmission, UiAdapter};
use crate::error::{FetchError, Result};
use crate::state::chrome::{
    self, ADMIN_SIDEBAR, BACK_TO_TOP, LANGUAGE_FIELD, LANGUAGE_FORM, MAIN_MENU_SIDEBAR,
};
use crate::state::roles::fetch_with_timeout;
use crate::state::{
    BackToTop, FetchTicket, MessageLevel, Notifications, RoleModalIds, RoleSource,
    RoleSwitchModal, TabNavigationController,
};
use crate::ui;

/// Collapsible section inside the admin sidebar.
pub const ADMIN_SECTION: &str = "#admin-venues";

/// Lines scrolled per PageUp/PageDown.
const SCROLL_STEP: u32 = 120;

/// A finished role list request, delivered back to the UI thread.
#[derive(Debug)]
pub struct RoleFetchDone {
    pub ticket: FetchTicket,
    pub result: std::result::Result<Vec<RoleOption>, FetchError>,
}

/// Build the page the server would render for `path`.
pub fn seed_page(config: &Config, path: &str, language: &str) -> Document {
    let mut doc = Document::new(path);

    for entry in &config.menu {
        doc.insert(
            crate::state::tabs::item_id(&entry.id),
            Element::new().with_class("item").with_text(entry.label.clone()),
        );
        doc.insert(
            crate::state::tabs::panel_id(&entry.id),
            Element::new()
                .hidden()
                .with_class("tab")
                .with_text(entry.body.clone()),
        );
    }

    let ids = RoleModalIds::default();
    doc.insert(ids.modal.clone(), Element::new().hidden());
    doc.insert(
        ids.loader.clone(),
        Element::new().hidden().with_class("loader").with_class("disabled"),
    );
    doc.insert(ids.form.clone(), Element::new().hidden());
    doc.insert(ids.select.clone(), Element::new().in_form(&ids.form));
    doc.insert(ids.error.clone(), Element::new().hidden());

    doc.insert(LANGUAGE_FORM, Element::new().hidden());
    doc.insert(
        LANGUAGE_FIELD,
        Element::new()
            .hidden()
            .with_value(language)
            .in_form(LANGUAGE_FORM),
    );
    doc.insert(BACK_TO_TOP, Element::new().hidden().with_text("Back to top"));
    doc.insert(MAIN_MENU_SIDEBAR, Element::new().with_class("sidebar"));
    doc.insert(ADMIN_SIDEBAR, Element::new().with_class("sidebar"));
    doc.insert(
        ADMIN_SECTION,
        Element::new().with_class("item").with_text("Venues"),
    );

    doc
}

/// Main application state.
pub struct App<S = HubClient> {
    pub config: Config,
    pub document: Document,
    pub tabs: TabNavigationController,
    pub roles: RoleSwitchModal,
    pub messages: Notifications,
    pub back_to_top: BackToTop,
    /// Language the page is rendered in.
    pub language: String,
    /// Whether the app should exit.
    pub should_quit: bool,
    source: S,
    runtime: Handle,
    fetch_tx: UnboundedSender<RoleFetchDone>,
    fetch_rx: UnboundedReceiver<RoleFetchDone>,
}

impl<S> App<S>
where
    S: RoleSource + Clone + Send + Sync + 'static,
{
    pub fn new(config: Config, source: S, runtime: Handle) -> Result<Self> {
        config.validate()?;
        let language = config.language.clone();
        let document = seed_page(&config, &config.start_path, &language);
        let tabs = TabNavigationController::from_path(config.menu_entries(), &config.start_path)?;
        let roles = RoleSwitchModal::new(config.role_label, RoleModalIds::default());
        let back_to_top = BackToTop::new(config.scroll_threshold);
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            config,
            document,
            tabs,
            roles,
            messages: Notifications::new(),
            back_to_top,
            language,
            should_quit: false,
            source,
            runtime,
            fetch_tx,
            fetch_rx,
        };
        app.tabs.attach(&mut app.document);
        Ok(app)
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.apply_fetch_results();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            self.process_submissions();
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.document.open_modal().is_some() {
            self.handle_modal_key(code);
            return;
        }

        let doc = &mut self.document;
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Right | KeyCode::Tab => {
                self.tabs.select_next(doc);
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.tabs.select_prev(doc);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(id) = self.tabs.entries().get(index).map(|e| e.tab_id.clone()) {
                    self.tabs.select_tab(&id, doc);
                }
            }
            KeyCode::Char('r') => self.open_roles(),
            KeyCode::Char('x') => {
                self.messages.dismiss_latest(doc);
            }
            KeyCode::Char('l') => {
                if let Some(next) = chrome::next_language(&self.language, &self.config.languages) {
                    let next = next.to_string();
                    chrome::switch_language(&next, &self.config.languages, doc);
                }
            }
            KeyCode::Char('b') => {
                chrome::go_back(doc);
                self.tabs.sync_to_path(doc);
            }
            KeyCode::Char('s') => chrome::toggle_sidebar(MAIN_MENU_SIDEBAR, doc),
            KeyCode::Char('a') => chrome::toggle_sidebar(ADMIN_SIDEBAR, doc),
            KeyCode::Char('c') => chrome::toggle_section(ADMIN_SECTION, doc),
            KeyCode::PageDown => {
                doc.scroll_to(doc.scroll_top().saturating_add(SCROLL_STEP));
                self.back_to_top.on_scroll(doc);
            }
            KeyCode::PageUp => {
                doc.scroll_to(doc.scroll_top().saturating_sub(SCROLL_STEP));
                self.back_to_top.on_scroll(doc);
            }
            KeyCode::Char('t') => self.back_to_top.activate(doc),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        let doc = &mut self.document;
        match code {
            KeyCode::Esc => self.roles.close(doc),
            KeyCode::Up | KeyCode::Char('k') => self.roles.move_selection(-1, doc),
            KeyCode::Down | KeyCode::Char('j') => self.roles.move_selection(1, doc),
            KeyCode::Enter => {
                self.roles.confirm(doc);
            }
            KeyCode::Char('R') => {
                if let Some(ticket) = self.roles.retry(doc) {
                    self.spawn_fetch(ticket);
                }
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Open the role modal and start loading its list.
    pub fn open_roles(&mut self) {
        let ticket = self.roles.open(&mut self.document);
        self.spawn_fetch(ticket);
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let source = self.source.clone();
        let tx = self.fetch_tx.clone();
        let limit = self.config.fetch_timeout();
        self.runtime.spawn(async move {
            let result = fetch_with_timeout(&source, limit).await;
            // The receiver only goes away when the app shuts down.
            let _ = tx.send(RoleFetchDone { ticket, result });
        });
    }

    /// Apply every fetch result that has arrived since the last frame.
    pub fn apply_fetch_results(&mut self) {
        while let Ok(done) = self.fetch_rx.try_recv() {
            self.apply_fetch(done);
        }
    }

    fn apply_fetch(&mut self, done: RoleFetchDone) {
        self.roles
            .complete(done.ticket, done.result, &mut self.document);
    }

    /// Turn submitted forms into navigations.
    pub fn process_submissions(&mut self) {
        let submissions = self.document.take_submissions();
        if submissions.is_empty() {
            return;
        }

        let mut flashes = Vec::new();
        for submission in submissions {
            if let Some(flash) = self.navigate(&submission) {
                flashes.push(flash);
            }
        }
        self.reload();
        for (level, text) in flashes {
            self.messages.push(level, text, &mut self.document);
        }
    }

    fn navigate(&mut self, submission: &FormSubmission) -> Option<(MessageLevel, String)> {
        let ids = self.roles.ids();
        if submission.form_id == LANGUAGE_FORM {
            let code = submission.field("language")?.to_string();
            info!(code = %code, "language applied");
            self.language = code;
            Some((
                MessageLevel::Success,
                format!("Language set to {}", self.language),
            ))
        } else if submission.form_id == ids.form {
            let field = ids.select.trim_start_matches('#');
            let role_id = submission.field(field)?;
            let name = self
                .roles
                .roles()
                .iter()
                .find(|r| r.id == role_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| role_id.to_string());
            info!(role = role_id, target = SET_ROLE, "role switch submitted");
            Some((MessageLevel::Success, format!("Now acting as {}", name)))
        } else {
            warn!(form = %submission.form_id, "submission for unknown form");
            None
        }
    }

    /// Re-render the page as after a full navigation to the current path.
    fn reload(&mut self) {
        let path = self.document.current_path();
        self.document = seed_page(&self.config, &path, &self.language);
        self.roles.reset();
        self.messages = Notifications::new();
        self.back_to_top = BackToTop::new(self.config.scroll_threshold);
        // the menu was validated at startup
        if let Ok(tabs) = TabNavigationController::from_path(self.config.menu_entries(), &path) {
            self.tabs = tabs;
        }
        self.tabs.attach(&mut self.document);
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::state::ModalLoadState;

    #[derive(Clone)]
    struct StaticRoles(Vec<RoleOption>);

    impl RoleSource for StaticRoles {
        fn fetch_roles(
            &self,
        ) -> impl Future<Output = std::result::Result<Vec<RoleOption>, FetchError>> + Send {
            let roles = self.0.clone();
            async move { Ok(roles) }
        }
    }

    fn app(roles: Vec<RoleOption>) -> App<StaticRoles> {
        App::new(Config::default(), StaticRoles(roles), Handle::current()).unwrap()
    }

    async fn wait_for_fetch(app: &mut App<StaticRoles>) {
        let done = app.fetch_rx.recv().await.unwrap();
        app.apply_fetch(done);
    }

    #[tokio::test]
    async fn test_start_path_selects_tab() {
        let app = app(Vec::new());
        assert_eq!(app.tabs.active_entry_id(), "overview");
        assert!(app.document.is_visible("#overview"));
        assert!(!app.document.is_visible("#events"));
    }

    #[tokio::test]
    async fn test_arrow_keys_switch_tabs() {
        let mut app = app(Vec::new());
        app.handle_key(KeyCode::Right);
        assert_eq!(app.tabs.active_entry_id(), "events");
        assert_eq!(app.document.current_path(), "/control/venues/events/");

        app.handle_key(KeyCode::Char('4'));
        assert_eq!(app.tabs.active_entry_id(), "settings");
        assert_eq!(app.document.current_path(), "/control/venues/settings/");

        app.handle_key(KeyCode::Char('b'));
        assert_eq!(app.tabs.active_entry_id(), "events");
        assert!(app.document.is_visible("#events"));
    }

    #[tokio::test]
    async fn test_role_modal_round_trip() {
        let mut app = app(vec![RoleOption::new("1", "Org A"), RoleOption::new("2", "Org B")]);

        app.handle_key(KeyCode::Char('r'));
        assert!(app.roles.state().is_loading());
        wait_for_fetch(&mut app).await;
        assert_eq!(app.roles.state(), &ModalLoadState::Loaded);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        app.process_submissions();

        assert_eq!(app.document.open_modal(), None);
        assert_eq!(app.messages.messages().len(), 1);
        assert_eq!(app.messages.messages()[0].text, "Now acting as Org B");
    }

    #[tokio::test]
    async fn test_closed_modal_ignores_late_result() {
        let mut app = app(vec![RoleOption::new("1", "Org A")]);

        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Esc);
        wait_for_fetch(&mut app).await;

        assert_eq!(app.roles.state(), &ModalLoadState::Idle);
        assert!(app.document.options("#role-select").is_empty());
    }

    #[tokio::test]
    async fn test_response_from_before_reload_is_discarded() {
        let mut app = app(Vec::new());

        let before = app.roles.open(&mut app.document);
        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('l'));
        app.process_submissions();
        let after = app.roles.open(&mut app.document);
        assert!(after.token() > before.token());

        app.apply_fetch(RoleFetchDone {
            ticket: before,
            result: Ok(vec![RoleOption::new("old", "Stale from before reload")]),
        });
        assert!(app.roles.state().is_loading());

        app.apply_fetch(RoleFetchDone {
            ticket: after,
            result: Ok(vec![RoleOption::new("new", "Current")]),
        });
        assert_eq!(app.roles.state(), &ModalLoadState::Loaded);
        let options = app.document.options("#role-select");
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "new");
    }

    #[tokio::test]
    async fn test_language_switch_reloads_page() {
        let mut app = app(Vec::new());
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('l'));
        app.process_submissions();

        assert_eq!(app.language, "de");
        assert_eq!(app.document.value(LANGUAGE_FIELD).as_deref(), Some("de"));
        assert_eq!(app.tabs.active_entry_id(), "events");
        assert!(app.document.is_visible("#events"));
        assert_eq!(app.messages.messages()[0].text, "Language set to de");

        app.handle_key(KeyCode::Char('x'));
        assert!(app.messages.is_empty());
    }

    #[tokio::test]
    async fn test_scrolling_toggles_back_to_top() {
        let mut app = app(Vec::new());
        app.handle_key(KeyCode::PageDown);
        assert!(!app.document.is_visible(BACK_TO_TOP));
        app.handle_key(KeyCode::PageDown);
        assert!(app.document.is_visible(BACK_TO_TOP));
        app.handle_key(KeyCode::Char('t'));
        assert!(!app.document.is_visible(BACK_TO_TOP));
        assert_eq!(app.document.scroll_top(), 0);
    }
}
