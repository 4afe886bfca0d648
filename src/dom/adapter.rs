// UI adapter seam.
// Controllers only mutate the page through this trait, never directly.

/// One entry of a select element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// A non-selectable entry shown when there is nothing to choose.
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: true,
        }
    }
}

/// Capabilities the host page provides to the controllers.
///
/// Element ids are selector-like strings such as `#overview` or
/// `.item[tab-id=overview]`. Implementations treat a missing element as a
/// no-op; none of these calls may fail.
pub trait UiAdapter {
    /// Whether an element with this id is present.
    fn exists(&self, id: &str) -> bool;

    fn show(&mut self, id: &str);
    fn hide(&mut self, id: &str);

    /// Add or remove the `active` class.
    fn set_active(&mut self, id: &str, active: bool);

    /// Add or remove the `disabled` class.
    fn set_disabled(&mut self, id: &str, disabled: bool);

    fn toggle_class(&mut self, id: &str, class: &str);

    /// Replace the text content of an element.
    fn set_text(&mut self, id: &str, text: &str);

    /// Path portion of the address bar.
    fn current_path(&self) -> String;

    /// Push a history entry without reloading the page.
    fn push_path(&mut self, path: &str);

    fn history_back(&mut self);

    /// Add a visible element carrying `classes` and `text`, replacing any
    /// element with the same id.
    fn append(&mut self, id: &str, classes: &[&str], text: &str);

    /// Fade an element out and remove it from the page.
    fn fade_out(&mut self, id: &str);

    fn show_modal(&mut self, id: &str);
    fn hide_modal(&mut self, id: &str);

    /// Replace the options of a select element.
    fn set_options(&mut self, id: &str, options: &[SelectOption]);

    fn set_value(&mut self, id: &str, value: &str);
    fn value(&self, id: &str) -> Option<String>;

    /// Submit a form. This is a full navigation handled by the server.
    fn submit_form(&mut self, id: &str);

    fn scroll_top(&self) -> u32;
    fn scroll_to(&mut self, top: u32);
}
