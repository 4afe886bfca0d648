// hubnav: secondary navigation, notifications and role switching for the
// resource hub, plus a terminal host that renders the page model.

pub mod api;
pub mod app;
pub mod config;
pub mod dom;
pub mod error;
pub mod logging;
pub mod paths;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{FetchError, HubError, Result};
