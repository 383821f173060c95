//! Screen modules for different views

pub mod lock_prompt;
pub mod passcode;
