// Page chrome behaviour.
// Language switching, sidebar toggles, back navigation and the back-to-top button.

use tracing::{debug, info};

use crate::dom::UiAdapter;

pub const LANGUAGE_FIELD: &str = "#language";
pub const LANGUAGE_FORM: &str = "#language-form";
pub const BACK_TO_TOP: &str = "#back-up";
pub const MAIN_MENU_SIDEBAR: &str = "#main-menu-sidebar";
pub const ADMIN_SIDEBAR: &str = "#admin-sidebar";

/// Set the language field and submit the language form.
///
/// Codes outside `available` are ignored; an empty list accepts any code.
pub fn switch_language(code: &str, available: &[String], ui: &mut impl UiAdapter) -> bool {
    if !available.is_empty() && !available.iter().any(|lang| lang == code) {
        debug!(code, "unknown language, ignoring");
        return false;
    }
    info!(code, "switching language");
    ui.set_value(LANGUAGE_FIELD, code);
    ui.submit_form(LANGUAGE_FORM);
    true
}

/// The language after `current` in `available`, wrapping around.
pub fn next_language<'a>(current: &str, available: &'a [String]) -> Option<&'a str> {
    let index = available.iter().position(|lang| lang == current);
    let next = match index {
        Some(i) => (i + 1) % available.len(),
        None => 0,
    };
    available.get(next).map(String::as_str)
}

/// Slide a sidebar in or out.
pub fn toggle_sidebar(id: &str, ui: &mut impl UiAdapter) {
    ui.toggle_class(id, "visible");
}

/// Collapse or expand an admin sidebar section.
pub fn toggle_section(id: &str, ui: &mut impl UiAdapter) {
    ui.toggle_class(id, "collapsed");
}

pub fn go_back(ui: &mut impl UiAdapter) {
    ui.history_back();
}

/// Shows the back-to-top button once the page is scrolled past a threshold.
#[derive(Debug, Clone, Copy)]
pub struct BackToTop {
    threshold: u32,
    visible: bool,
}

impl BackToTop {
    pub const DEFAULT_THRESHOLD: u32 = 200;

    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Update the button after the page scrolled.
    pub fn on_scroll(&mut self, ui: &mut impl UiAdapter) {
        self.visible = ui.scroll_top() > self.threshold;
        if self.visible {
            ui.show(BACK_TO_TOP);
        } else {
            ui.hide(BACK_TO_TOP);
        }
    }

    /// Scroll to the top of the page.
    pub fn activate(&mut self, ui: &mut impl UiAdapter) {
        ui.scroll_to(0);
        self.on_scroll(ui);
    }
}

impl Default for BackToTop {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
