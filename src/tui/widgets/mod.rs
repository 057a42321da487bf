//! TUI widgets

pub mod dashboard;
pub mod detail;
pub mod help;
