// Role switch modal state.
// Fetches the selectable roles and renders them, discarding superseded responses.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::RoleOption;
use crate::dom::{SelectOption, UiAdapter};
use crate::error::FetchError;

/// Default limit for the role list request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder shown when the user has nothing to switch into.
pub const EMPTY_PLACEHOLDER: &str = "No entries found";

/// Source of the role list. Implemented by the HTTP client and by test fakes.
pub trait RoleSource {
    fn fetch_roles(&self) -> impl Future<Output = Result<Vec<RoleOption>, FetchError>> + Send;
}

/// Fetch roles, giving up after `limit`.
pub async fn fetch_with_timeout<S: RoleSource>(
    source: &S,
    limit: Duration,
) -> Result<Vec<RoleOption>, FetchError> {
    match tokio::time::timeout(limit, source.fetch_roles()).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(limit)),
    }
}

/// What the listed entries represent. Only affects wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleLabel {
    #[default]
    Actor,
    Organization,
}

impl RoleLabel {
    pub fn title(&self) -> &'static str {
        match self {
            RoleLabel::Actor => "Switch actor",
            RoleLabel::Organization => "Switch organization",
        }
    }
}

/// Loading state of the modal's list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalLoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Empty,
    Failed(String),
}

impl ModalLoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ModalLoadState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ModalLoadState::Failed(_))
    }
}

/// Element ids the modal renders into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleModalIds {
    pub modal: String,
    pub loader: String,
    pub form: String,
    pub select: String,
    pub error: String,
}

impl Default for RoleModalIds {
    fn default() -> Self {
        Self {
            modal: "#role-modal".to_string(),
            loader: "#role-loader".to_string(),
            form: "#role-form".to_string(),
            select: "#role-select".to_string(),
            error: "#role-error".to_string(),
        }
    }
}

/// Session token handed out by [`RoleSwitchModal::open`]. A response may only
/// be applied with the ticket of the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn token(&self) -> u64 {
        self.0
    }
}

/// Outcome of handing a response to the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The ticket was superseded or the modal closed; nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct RoleSwitchModal {
    label: RoleLabel,
    ids: RoleModalIds,
    state: ModalLoadState,
    /// Last token handed out. Only ever increases.
    session: u64,
    /// Token whose response is still wanted.
    pending: Option<u64>,
    roles: Vec<RoleOption>,
}

impl RoleSwitchModal {
    pub fn new(label: RoleLabel, ids: RoleModalIds) -> Self {
        Self {
            label,
            ids,
            state: ModalLoadState::Idle,
            session: 0,
            pending: None,
            roles: Vec::new(),
        }
    }

    pub fn label(&self) -> RoleLabel {
        self.label
    }

    pub fn ids(&self) -> &RoleModalIds {
        &self.ids
    }

    pub fn state(&self) -> &ModalLoadState {
        &self.state
    }

    pub fn roles(&self) -> &[RoleOption] {
        &self.roles
    }

    /// Whether a response for `ticket` would still be applied.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.pending == Some(ticket.0)
    }

    /// Show the modal in its loading state and start a new session.
    ///
    /// Any request still in flight is superseded; its response will be
    /// discarded. The caller issues the fetch and passes the result to
    /// [`complete`](Self::complete) with the returned ticket.
    pub fn open(&mut self, ui: &mut impl UiAdapter) -> FetchTicket {
        self.session += 1;
        if let Some(previous) = self.pending.replace(self.session) {
            debug!(previous, current = self.session, "superseding role request");
        }
        self.state = ModalLoadState::Loading;
        self.roles.clear();

        ui.set_text(&self.ids.modal, self.label.title());
        ui.show_modal(&self.ids.modal);
        ui.hide(&self.ids.form);
        ui.hide(&self.ids.error);
        ui.show(&self.ids.loader);
        ui.set_active(&self.ids.loader, true);
        ui.set_disabled(&self.ids.loader, false);

        FetchTicket(self.session)
    }

    /// Apply the result of the request identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<RoleOption>, FetchError>,
        ui: &mut impl UiAdapter,
    ) -> Completion {
        if !self.is_current(ticket) {
            debug!(token = ticket.0, "discarding stale role response");
            return Completion::Stale;
        }
        self.pending = None;

        match result {
            Ok(roles) if roles.is_empty() => {
                self.state = ModalLoadState::Empty;
                ui.set_options(&self.ids.select, &[SelectOption::placeholder(EMPTY_PLACEHOLDER)]);
                ui.set_disabled(&self.ids.select, true);
                ui.show(&self.ids.form);
            }
            Ok(roles) => {
                let options: Vec<SelectOption> = roles
                    .iter()
                    .map(|role| SelectOption::new(role.id.clone(), role.name.clone()))
                    .collect();
                ui.set_options(&self.ids.select, &options);
                ui.set_disabled(&self.ids.select, false);
                ui.show(&self.ids.form);
                self.roles = roles;
                self.state = ModalLoadState::Loaded;
            }
            Err(err) => {
                warn!(error = %err, "role list request failed");
                let message = err.user_message();
                ui.set_text(&self.ids.error, &message);
                ui.show(&self.ids.error);
                self.state = ModalLoadState::Failed(message);
            }
        }
        self.hide_loader(ui);
        Completion::Applied
    }

    /// Hide the modal. A response still in flight will be discarded.
    pub fn close(&mut self, ui: &mut impl UiAdapter) {
        self.pending = None;
        self.state = ModalLoadState::Idle;
        self.roles.clear();

        ui.set_options(&self.ids.select, &[]);
        ui.hide(&self.ids.error);
        self.hide_loader(ui);
        ui.hide_modal(&self.ids.modal);
    }

    /// Forget the list and any pending request after the page was re-rendered.
    ///
    /// The session counter is kept, so tickets handed out before the reset
    /// stay stale.
    pub fn reset(&mut self) {
        if let Some(token) = self.pending.take() {
            debug!(token, "dropping role request across reload");
        }
        self.state = ModalLoadState::Idle;
        self.roles.clear();
    }

    /// Start over after a failed request.
    pub fn retry(&mut self, ui: &mut impl UiAdapter) -> Option<FetchTicket> {
        if self.state.is_failed() {
            Some(self.open(ui))
        } else {
            None
        }
    }

    /// Move the selection by `offset` entries, clamped to the list.
    pub fn move_selection(&self, offset: isize, ui: &mut impl UiAdapter) {
        if self.roles.is_empty() {
            return;
        }
        let current = ui
            .value(&self.ids.select)
            .and_then(|value| self.roles.iter().position(|r| r.id == value))
            .unwrap_or(0);
        let last = self.roles.len() - 1;
        let next = current.saturating_add_signed(offset).min(last);
        ui.set_value(&self.ids.select, &self.roles[next].id);
    }

    /// The role currently chosen in the select, if any.
    pub fn selected_role<'a>(&'a self, ui: &impl UiAdapter) -> Option<&'a RoleOption> {
        let value = ui.value(&self.ids.select)?;
        self.roles.iter().find(|r| r.id == value)
    }

    /// Submit the chosen role. Returns false when nothing valid is selected.
    pub fn confirm(&self, ui: &mut impl UiAdapter) -> bool {
        if self.state != ModalLoadState::Loaded {
            debug!(state = ?self.state, "nothing to confirm");
            return false;
        }
        let Some(role) = self.selected_role(ui) else {
            debug!("no role selected");
            return false;
        };
        info!(role = %role.id, name = %role.name, "switching role");
        ui.submit_form(&self.ids.form);
        true
    }

    fn hide_loader(&self, ui: &mut impl UiAdapter) {
        ui.set_active(&self.ids.loader, false);
        ui.set_disabled(&self.ids.loader, true);
        ui.hide(&self.ids.loader);
    }
}

impl Default for RoleSwitchModal {
    fn default() -> Self {
        Self::new(RoleLabel::default(), RoleModalIds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element};

    struct FakeSource(Result<Vec<RoleOption>, u16>);

    impl RoleSource for FakeSource {
        fn fetch_roles(&self) -> impl Future<Output = Result<Vec<RoleOption>, FetchError>> + Send {
            let result = self.0.clone().map_err(|status| FetchError::Status {
                status,
                body: String::new(),
            });
            async move { result }
        }
    }

    struct JsonSource(&'static str);

    impl RoleSource for JsonSource {
        fn fetch_roles(&self) -> impl Future<Output = Result<Vec<RoleOption>, FetchError>> + Send {
            let body = self.0;
            async move { serde_json::from_str(body).map_err(FetchError::Decode) }
        }
    }

    struct HangingSource;

    impl RoleSource for HangingSource {
        fn fetch_roles(&self) -> impl Future<Output = Result<Vec<RoleOption>, FetchError>> + Send {
            std::future::pending()
        }
    }

    fn page() -> Document {
        let ids = RoleModalIds::default();
        let mut doc = Document::new("/");
        doc.insert(ids.modal.clone(), Element::new().hidden());
        doc.insert(ids.loader.clone(), Element::new().hidden().with_class("disabled"));
        doc.insert(ids.form.clone(), Element::new().hidden());
        doc.insert(ids.select.clone(), Element::new().in_form(&ids.form));
        doc.insert(ids.error.clone(), Element::new().hidden());
        doc
    }

    #[test]
    fn test_open_shows_loading_state() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::default();

        let ticket = modal.open(&mut doc);

        assert!(modal.state().is_loading());
        assert!(modal.is_current(ticket));
        assert_eq!(doc.open_modal(), Some("#role-modal"));
        assert!(doc.is_visible("#role-loader"));
        assert!(doc.has_class("#role-loader", "active"));
        assert!(!doc.has_class("#role-loader", "disabled"));
        assert!(!doc.is_visible("#role-form"));
        assert_eq!(doc.text("#role-modal"), Some("Switch actor"));
    }

    #[tokio::test]
    async fn test_empty_list_shows_placeholder() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::default();

        let ticket = modal.open(&mut doc);
        let result = fetch_with_timeout(&JsonSource("[]"), DEFAULT_FETCH_TIMEOUT).await;
        assert_eq!(modal.complete(ticket, result, &mut doc), Completion::Applied);

        assert_eq!(modal.state(), &ModalLoadState::Empty);
        let options = doc.options("#role-select");
        assert_eq!(options.len(), 1);
        assert!(options[0].disabled);
        assert_eq!(options[0].label, EMPTY_PLACEHOLDER);
        assert!(!doc.is_visible("#role-loader"));
        assert!(!modal.confirm(&mut doc));
    }

    #[tokio::test]
    async fn test_single_role_is_rendered() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::default();

        let ticket = modal.open(&mut doc);
        let source = JsonSource(r#"[{"id": "1", "name": "Org A"}]"#);
        let result = fetch_with_timeout(&source, DEFAULT_FETCH_TIMEOUT).await;
        modal.complete(ticket, result, &mut doc);

        assert_eq!(modal.state(), &ModalLoadState::Loaded);
        assert_eq!(doc.options("#role-select"), [SelectOption::new("1", "Org A")]);
        assert!(doc.is_visible("#role-form"));
        assert!(!doc.is_visible("#role-loader"));
        assert!(doc.has_class("#role-loader", "disabled"));
    }

    #[test]
    fn test_late_response_does_not_overwrite() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::default();

        let first = modal.open(&mut doc);
        let second = modal.open(&mut doc);
        assert!(second.token() > first.token());

        let applied = modal.complete(second, Ok(vec![RoleOption::new("2", "Org B")]), &mut doc);
        let stale = modal.complete(first, Ok(vec![RoleOption::new("1", "Org A")]), &mut doc);

        assert_eq!(applied, Completion::Applied);
        assert_eq!(stale, Completion::Stale);
        assert_eq!(doc.options("#role-select"), [SelectOption::new("2", "Org B")]);
        assert_eq!(modal.roles(), [RoleOption::new("2", "Org B")]);
    }

    #[test]
    fn test_second_response_for_same_ticket_is_ignored() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::default();

        let ticket = modal.open(&mut doc);
        modal.complete(ticket, Ok(vec![RoleOption::new("1", "Org A")]), &mut doc);
        let again = modal.complete(ticket, Ok(Vec::new()), &mut doc);

        assert_eq!(again, Completion::Stale);
        assert_eq!(modal.state(), &ModalLoadState::Loaded);
    }

    #[test]
    fn test_close_discards_in_flight_response() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::default();

        let ticket = modal.open(&mut doc);
        modal.close(&mut doc);
        let outcome = modal.complete(ticket, Ok(vec![RoleOption::new("1", "Org A")]), &mut doc);

        assert_eq!(outcome, Completion::Stale);
        assert_eq!(modal.state(), &ModalLoadState::Idle);
        assert!(doc.options("#role-select").is_empty());
        assert!(!doc.is_visible("#role-modal"));
        assert_eq!(doc.open_modal(), None);
    }

    #[tokio::test]
    async fn test_failure_shows_error_and_allows_retry() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::default();

        let ticket = modal.open(&mut doc);
        let result = fetch_with_timeout(&FakeSource(Err(500)), DEFAULT_FETCH_TIMEOUT).await;
        modal.complete(ticket, result, &mut doc);

        assert!(modal.state().is_failed());
        assert!(doc.is_visible("#role-error"));
        assert_eq!(doc.text("#role-error"), Some("Server answered with 500"));
        assert!(!doc.is_visible("#role-loader"));

        let retry = modal.retry(&mut doc).expect("retry after failure");
        assert!(modal.state().is_loading());
        assert!(!doc.is_visible("#role-error"));

        let result = fetch_with_timeout(
            &FakeSource(Ok(vec![RoleOption::new("3", "Org C")])),
            DEFAULT_FETCH_TIMEOUT,
        )
        .await;
        modal.complete(retry, result, &mut doc);
        assert_eq!(modal.state(), &ModalLoadState::Loaded);
    }

    #[test]
    fn test_reset_keeps_tokens_increasing() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::default();

        let before = modal.open(&mut doc);
        modal.reset();
        assert_eq!(modal.state(), &ModalLoadState::Idle);
        assert!(!modal.is_current(before));

        let mut doc = page();
        let after = modal.open(&mut doc);
        assert!(after.token() > before.token());

        let stale = modal.complete(before, Ok(vec![RoleOption::new("old", "Old")]), &mut doc);
        let applied = modal.complete(after, Ok(vec![RoleOption::new("new", "New")]), &mut doc);
        assert_eq!(stale, Completion::Stale);
        assert_eq!(applied, Completion::Applied);
        assert_eq!(doc.options("#role-select"), [SelectOption::new("new", "New")]);
    }

    #[test]
    fn test_retry_only_after_failure() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::default();
        assert!(modal.retry(&mut doc).is_none());
        modal.open(&mut doc);
        assert!(modal.retry(&mut doc).is_none());
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let limit = Duration::from_millis(20);
        let result = fetch_with_timeout(&HangingSource, limit).await;
        assert!(matches!(result, Err(FetchError::Timeout(d)) if d == limit));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let result = fetch_with_timeout(&JsonSource("{\"detail\": 1}"), DEFAULT_FETCH_TIMEOUT).await;
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_selection_and_confirm() {
        let mut doc = page();
        let mut modal = RoleSwitchModal::new(RoleLabel::Organization, RoleModalIds::default());

        let ticket = modal.open(&mut doc);
        modal.complete(
            ticket,
            Ok(vec![
                RoleOption::new("1", "Org A"),
                RoleOption::new("2", "Org B"),
            ]),
            &mut doc,
        );
        assert_eq!(doc.text("#role-modal"), Some("Switch organization"));
        assert_eq!(modal.selected_role(&doc).map(|r| r.id.as_str()), Some("1"));

        modal.move_selection(1, &mut doc);
        modal.move_selection(1, &mut doc);
        assert_eq!(modal.selected_role(&doc).map(|r| r.id.as_str()), Some("2"));
        modal.move_selection(-5, &mut doc);
        assert_eq!(modal.selected_role(&doc).map(|r| r.id.as_str()), Some("1"));

        assert!(modal.confirm(&mut doc));
        let submissions = doc.take_submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].form_id, "#role-form");
        assert_eq!(submissions[0].field("role-select"), Some("1"));
    }
}
