// System message state.
// Tracks dismissible notifications shown above the page content.

use chrono::{DateTime, Utc};

use crate::dom::UiAdapter;

/// Severity of a notification, mirroring the message classes of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageLevel {
    pub fn class(&self) -> &'static str {
        match self {
            MessageLevel::Info => "info",
            MessageLevel::Success => "positive",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "negative",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub level: MessageLevel,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Notifications currently on the page, oldest first.
#[derive(Debug, Default)]
pub struct Notifications {
    messages: Vec<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Notification] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Add a message and its element. Returns the element id.
    pub fn push(
        &mut self,
        level: MessageLevel,
        text: impl Into<String>,
        ui: &mut impl UiAdapter,
    ) -> String {
        self.next_id += 1;
        let id = format!("#message-{}", self.next_id);
        let text = text.into();
        ui.append(&id, &["message", level.class()], &text);
        self.messages.push(Notification {
            id: id.clone(),
            level,
            text,
            created_at: Utc::now(),
        });
        id
    }

    /// Fade out the message `id` and forget it. Returns whether it was shown.
    pub fn dismiss(&mut self, id: &str, ui: &mut impl UiAdapter) -> bool {
        let Some(index) = self.messages.iter().position(|m| m.id == id) else {
            return false;
        };
        self.messages.remove(index);
        ui.fade_out(id);
        true
    }

    /// Dismiss the most recent message.
    pub fn dismiss_latest(&mut self, ui: &mut impl UiAdapter) -> bool {
        match self.messages.last().map(|m| m.id.clone()) {
            Some(id) => self.dismiss(&id, ui),
            None => false,
        }
    }
}
