//! Screenlock TUI Library
//!
//! Terminal front-end for the screenlock retry prompt: rendering, the
//! passcode authenticator and the in-process lock manager.

pub mod app;
pub mod auth;
pub mod ui;

pub use app::App;
