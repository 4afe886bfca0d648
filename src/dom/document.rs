// In-memory document model.
// Implements the UI adapter for the terminal host and for controller tests.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use super::adapter::{SelectOption, UiAdapter};

/// A single element in the document.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub visible: bool,
    pub classes: BTreeSet<String>,
    /// Display text (panel body, message text, button label).
    pub text: String,
    /// Current value for inputs and selects.
    pub value: String,
    /// Options for select elements.
    pub options: Vec<SelectOption>,
    /// Id of the form this element submits with.
    pub form: Option<String>,
}

impl Element {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn in_form(mut self, form: &str) -> Self {
        self.form = Some(form.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// A submitted form, captured for the host to turn into a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub form_id: String,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The page: elements keyed by id, plus address bar and history.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: BTreeMap<String, Element>,
    history: Vec<String>,
    submissions: Vec<FormSubmission>,
    open_modal: Option<String>,
    scroll_top: u32,
}

impl Document {
    /// Create a document whose address bar shows `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            history: vec![path.into()],
            ..Self::default()
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, element: Element) {
        self.elements.insert(id.into(), element);
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.visible)
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.has_class(class))
    }

    pub fn options(&self, id: &str) -> &[SelectOption] {
        self.elements
            .get(id)
            .map(|e| e.options.as_slice())
            .unwrap_or_default()
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    /// Ids of all elements starting with `prefix`, in key order.
    pub fn ids_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.elements
            .keys()
            .filter(move |id| id.starts_with(prefix))
            .map(String::as_str)
    }

    /// Every path pushed so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn open_modal(&self) -> Option<&str> {
        self.open_modal.as_deref()
    }

    /// Drain pending form submissions.
    pub fn take_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.submissions)
    }

    fn with_element(&mut self, id: &str, op: &str, f: impl FnOnce(&mut Element)) {
        match self.elements.get_mut(id) {
            Some(element) => f(element),
            None => debug!(id, op, "element not found, ignoring"),
        }
    }
}

impl UiAdapter for Document {
    fn exists(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn show(&mut self, id: &str) {
        self.with_element(id, "show", |e| e.visible = true);
    }

    fn hide(&mut self, id: &str) {
        self.with_element(id, "hide", |e| e.visible = false);
    }

    fn set_active(&mut self, id: &str, active: bool) {
        self.with_element(id, "set_active", |e| {
            if active {
                e.classes.insert("active".to_string());
            } else {
                e.classes.remove("active");
            }
        });
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) {
        self.with_element(id, "set_disabled", |e| {
            if disabled {
                e.classes.insert("disabled".to_string());
            } else {
                e.classes.remove("disabled");
            }
        });
    }

    fn toggle_class(&mut self, id: &str, class: &str) {
        self.with_element(id, "toggle_class", |e| {
            if !e.classes.remove(class) {
                e.classes.insert(class.to_string());
            }
        });
    }

    fn set_text(&mut self, id: &str, text: &str) {
        self.with_element(id, "set_text", |e| e.text = text.to_string());
    }

    fn current_path(&self) -> String {
        self.history.last().cloned().unwrap_or_default()
    }

    fn push_path(&mut self, path: &str) {
        debug!(path, "history push");
        self.history.push(path.to_string());
    }

    fn history_back(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
        }
    }

    fn append(&mut self, id: &str, classes: &[&str], text: &str) {
        let element = classes
            .iter()
            .fold(Element::new(), |element, class| element.with_class(class))
            .with_text(text);
        self.insert(id, element);
    }

    fn fade_out(&mut self, id: &str) {
        if self.elements.remove(id).is_none() {
            debug!(id, "fade_out: element not found, ignoring");
        }
    }

    fn show_modal(&mut self, id: &str) {
        if self.exists(id) {
            self.show(id);
            self.open_modal = Some(id.to_string());
        } else {
            debug!(id, "show_modal: element not found, ignoring");
        }
    }

    fn hide_modal(&mut self, id: &str) {
        self.hide(id);
        if self.open_modal.as_deref() == Some(id) {
            self.open_modal = None;
        }
    }

    fn set_options(&mut self, id: &str, options: &[SelectOption]) {
        self.with_element(id, "set_options", |e| {
            e.options = options.to_vec();
            e.value = options
                .iter()
                .find(|o| !o.disabled)
                .map(|o| o.value.clone())
                .unwrap_or_default();
        });
    }

    fn set_value(&mut self, id: &str, value: &str) {
        self.with_element(id, "set_value", |e| e.value = value.to_string());
    }

    fn value(&self, id: &str) -> Option<String> {
        self.elements.get(id).map(|e| e.value.clone())
    }

    fn submit_form(&mut self, id: &str) {
        if !self.exists(id) {
            debug!(id, "submit_form: form not found, ignoring");
            return;
        }
        let fields = self
            .elements
            .iter()
            .filter(|(_, e)| e.form.as_deref() == Some(id))
            .map(|(key, e)| (key.trim_start_matches('#').to_string(), e.value.clone()))
            .collect();
        info!(form = id, "form submitted");
        self.submissions.push(FormSubmission {
            form_id: id.to_string(),
            fields,
        });
    }

    fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    fn scroll_to(&mut self, top: u32) {
        self.scroll_top = top;
    }
}
