// Secondary navigation tab controller.
// Keeps the active menu entry, the visible panel and the address bar in sync.

use std::fmt;

use tracing::{debug, info};

use crate::dom::UiAdapter;
use crate::error::{HubError, Result};

/// One clickable item in the secondary menu, bound to a content panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub tab_id: String,
    pub label: String,
}

impl MenuEntry {
    pub fn new(tab_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            label: label.into(),
        }
    }

    /// Id of the panel this entry shows.
    pub fn panel_id(&self) -> String {
        panel_id(&self.tab_id)
    }

    /// Id of the menu item element.
    pub fn item_id(&self) -> String {
        item_id(&self.tab_id)
    }
}

pub fn panel_id(tab_id: &str) -> String {
    format!("#{}", tab_id)
}

pub fn item_id(tab_id: &str) -> String {
    format!(".item[tab-id={}]", tab_id)
}

/// The address bar path as `/`-separated segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPath {
    absolute: bool,
    segments: Vec<String>,
}

impl NavigationPath {
    pub fn parse(path: &str) -> Self {
        Self {
            absolute: path.starts_with('/'),
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The path after selecting `tab_id`.
    ///
    /// A final segment naming a known tab is replaced; anything else is kept
    /// and the tab is appended.
    pub fn with_tab(&self, tab_id: &str, is_tab: impl Fn(&str) -> bool) -> Self {
        let mut segments = self.segments.clone();
        if segments.last().is_some_and(|last| is_tab(last)) {
            segments.pop();
        }
        segments.push(tab_id.to_string());
        Self {
            absolute: self.absolute,
            segments,
        }
    }
}

impl fmt::Display for NavigationPath {
    /// Always rendered with a trailing slash.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("/")?;
        }
        for segment in &self.segments {
            write!(f, "{}/", segment)?;
        }
        Ok(())
    }
}

/// Owns which menu entry is active. The `active` classes on the page are a
/// projection of `active_entry_id`.
#[derive(Debug, Clone)]
pub struct TabNavigationController {
    entries: Vec<MenuEntry>,
    active_entry_id: String,
}

impl TabNavigationController {
    /// Controller with the first entry active.
    pub fn new(entries: Vec<MenuEntry>) -> Result<Self> {
        let first = entries
            .first()
            .map(|e| e.tab_id.clone())
            .ok_or_else(|| HubError::Config("secondary menu has no entries".to_string()))?;
        Ok(Self {
            entries,
            active_entry_id: first,
        })
    }

    /// Controller with `active` selected, falling back to the first entry.
    pub fn with_active(entries: Vec<MenuEntry>, active: &str) -> Result<Self> {
        let mut controller = Self::new(entries)?;
        if controller.entry(active).is_some() {
            controller.active_entry_id = active.to_string();
        } else {
            debug!(tab = active, "initial tab unknown, using first entry");
        }
        Ok(controller)
    }

    /// Controller whose active entry is named by the last path segment.
    pub fn from_path(entries: Vec<MenuEntry>, path: &str) -> Result<Self> {
        let path = NavigationPath::parse(path);
        match path.last_segment() {
            Some(last) => Self::with_active(entries, last),
            None => Self::new(entries),
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn entry(&self, tab_id: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.tab_id == tab_id)
    }

    pub fn active_entry_id(&self) -> &str {
        &self.active_entry_id
    }

    pub fn active_index(&self) -> usize {
        self.entries
            .iter()
            .position(|e| e.tab_id == self.active_entry_id)
            .unwrap_or(0)
    }

    /// Project the current state onto the page without touching history.
    pub fn attach(&self, ui: &mut impl UiAdapter) {
        self.project(ui);
    }

    /// Activate `entry_id`: highlight it, show its panel, push its path.
    ///
    /// Unknown entries and entries without a panel are ignored. Returns
    /// whether the selection was applied.
    pub fn select_tab(&mut self, entry_id: &str, ui: &mut impl UiAdapter) -> bool {
        let Some(entry) = self.entry(entry_id) else {
            debug!(tab = entry_id, "no menu entry, ignoring click");
            return false;
        };
        if !ui.exists(&entry.panel_id()) {
            debug!(tab = entry_id, "no panel for menu entry, ignoring click");
            return false;
        }

        self.active_entry_id = entry_id.to_string();
        self.project(ui);

        let path = self.next_path(&ui.current_path(), entry_id);
        ui.push_path(&path);
        info!(tab = entry_id, path = %path, "tab selected");
        true
    }

    /// Re-derive the active entry from the address bar after history moved
    /// (back button). Nothing is pushed. Returns whether the entry changed.
    pub fn sync_to_path(&mut self, ui: &mut impl UiAdapter) -> bool {
        let path = NavigationPath::parse(&ui.current_path());
        let Some(tab_id) = path.last_segment().filter(|id| self.entry(id).is_some()) else {
            return false;
        };
        if tab_id == self.active_entry_id || !ui.exists(&panel_id(tab_id)) {
            return false;
        }
        self.active_entry_id = tab_id.to_string();
        self.project(ui);
        debug!(tab = %self.active_entry_id, "tab restored from history");
        true
    }

    /// Select the entry after the active one, wrapping around.
    pub fn select_next(&mut self, ui: &mut impl UiAdapter) -> bool {
        let index = (self.active_index() + 1) % self.entries.len();
        let id = self.entries[index].tab_id.clone();
        self.select_tab(&id, ui)
    }

    /// Select the entry before the active one, wrapping around.
    pub fn select_prev(&mut self, ui: &mut impl UiAdapter) -> bool {
        let len = self.entries.len();
        let index = (self.active_index() + len - 1) % len;
        let id = self.entries[index].tab_id.clone();
        self.select_tab(&id, ui)
    }

    /// Path the address bar shows after selecting `entry_id` from `current`.
    pub fn next_path(&self, current: &str, entry_id: &str) -> String {
        if current.is_empty() {
            return format!("{}/", entry_id);
        }
        NavigationPath::parse(current)
            .with_tab(entry_id, |segment| self.entry(segment).is_some())
            .to_string()
    }

    fn project(&self, ui: &mut impl UiAdapter) {
        for entry in &self.entries {
            let active = entry.tab_id == self.active_entry_id;
            ui.set_active(&entry.item_id(), active);
            if active {
                ui.show(&entry.panel_id());
            } else {
                ui.hide(&entry.panel_id());
            }
        }
    }
}
