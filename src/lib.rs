//! Partner & service dashboard: CSV loading, metric aggregation and a
//! terminal front end.

pub mod services;
pub mod tui;
pub mod types;
