//! User-facing text.
//!
//! Every line the application prints is a [`Message`] variant; the wording
//! lives in one `Display` impl and the `msg_*` macros decide where it goes.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
