//! Input source selection
//!
//! The default pair in the configured data directory is used only when both
//! files exist; an explicitly given path always wins for its side.

use std::path::PathBuf;

use tracing::info;

use super::config::Config;
use super::data_loader::DataSource;

/// Sources chosen for one pass (either may be absent)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectedSources {
    pub providers: Option<DataSource>,
    pub services: Option<DataSource>,
}

impl SelectedSources {
    pub fn is_complete(&self) -> bool {
        self.providers.is_some() && self.services.is_some()
    }
}

/// Pick the provider and services sources for this pass
pub fn resolve_sources(
    explicit_providers: Option<PathBuf>,
    explicit_services: Option<PathBuf>,
    config: &Config,
) -> SelectedSources {
    let defaults = default_pair(config);
    if defaults.is_some() {
        info!(dir = %config.data_dir.display(), "default CSV pair available");
    }
    let (default_providers, default_services) = match defaults {
        Some((p, s)) => (Some(p), Some(s)),
        None => (None, None),
    };

    SelectedSources {
        providers: explicit_providers.or(default_providers).map(DataSource::Path),
        services: explicit_services.or(default_services).map(DataSource::Path),
    }
}

fn default_pair(config: &Config) -> Option<(PathBuf, PathBuf)> {
    if !config.use_defaults {
        return None;
    }
    let providers = config.default_providers_path();
    let services = config.default_services_path();
    (providers.is_file() && services.is_file()).then_some((providers, services))
}
