#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

//! Share button for WartaPureté score pages.
//!
//! Clicking the button composes a summary of the displayed score and hands it to the
//! best delivery the browser offers: the native share sheet, then the clipboard, then a
//! prompt holding the link.

pub mod config;
pub use config::ShareConfig;

pub mod logging;

pub mod message;
pub use message::ShareMessage;

pub mod platform;

pub mod score;
pub use score::{Category, Score, ScoreSnapshot};

mod share;
pub use share::{Delivery, ShareAction, ShareError};

pub mod share_code;
pub use share_code::{ShareCodeError, SharedScore};

/// Browser entry point and web-sys implementations of [`platform::Platform`].
#[cfg(target_arch = "wasm32")]
pub mod web;
