//! Reusable UI components

pub mod logo;
pub mod status_bar;
