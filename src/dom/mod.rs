// Page model module.
// The adapter trait controllers depend on, and the in-memory document behind it.

pub mod adapter;
pub mod document;

pub use adapter::{SelectOption, UiAdapter};
pub use document::{Document, Element, FormSubmission};
