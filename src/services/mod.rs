//! Services for loading and aggregating dashboard data

pub mod aggregator;
pub mod config;
pub mod data_loader;
pub mod sources;

pub use aggregator::Aggregator;
pub use config::{Config, ThemeMode};
pub use data_loader::{DataLoaderService, DataSource};
pub use sources::{resolve_sources, SelectedSources};
