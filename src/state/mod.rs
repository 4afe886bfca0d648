// State management module.
// Controllers for secondary navigation, role switching, messages and page chrome.

pub mod chrome;
pub mod messages;
pub mod roles;
pub mod tabs;

pub use chrome::BackToTop;
pub use messages::{MessageLevel, Notification, Notifications};
pub use roles::{
    Completion, FetchTicket, ModalLoadState, RoleLabel, RoleModalIds, RoleSource, RoleSwitchModal,
};
pub use tabs::{MenuEntry, NavigationPath, TabNavigationController};
