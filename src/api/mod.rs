// Hub API module.
// Provides the client and types for the hub's same-origin JSON endpoints.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::HubClient;
pub use types::RoleOption;
