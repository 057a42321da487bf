use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use partnerdash::services::{resolve_sources, Aggregator, Config, DataLoaderService, SelectedSources};
use partnerdash::tui::widgets::dashboard::format_number;
use partnerdash::tui::{self, App, AppData, Theme};
use partnerdash::types::{DashboardError, MetricKey, MetricSet, Section, Subset};

/// Partner & service listing dashboard
#[derive(Parser)]
#[command(name = "partnerdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Provider CSV (overrides the default data directory)
    #[arg(long, global = true, value_name = "PATH")]
    providers: Option<PathBuf>,

    /// Services CSV (overrides the default data directory)
    #[arg(long, global = true, value_name = "PATH")]
    services: Option<PathBuf>,

    /// Never fall back to the default CSV pair
    #[arg(long, global = true)]
    no_defaults: bool,

    /// Config file (default: ~/.partnerdash/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive dashboard (default)
    Tui,

    /// Print every metric card
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the rows behind one metric (CSV by default)
    Detail {
        /// Metric name, e.g. providers_without_listings
        metric: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// JSON report for `summary --json`
#[derive(Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    sources: &'a str,
    metrics: &'a MetricSet,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if self.no_defaults {
            config.use_defaults = false;
        }

        let sources = resolve_sources(self.providers.clone(), self.services.clone(), &config);
        let loader = DataLoaderService::with_delimiter(config.delimiter_byte()?);

        match self.command {
            None | Some(Commands::Tui) => {
                // Detect before ratatui::init puts the terminal in raw mode
                let theme = Theme::from_mode(config.theme);
                let app = App::new(compute(&loader, &sources), theme);
                tui::run(app)
            }
            Some(Commands::Summary { json }) => {
                let data = compute(&loader, &sources)?;
                if json {
                    let report = Report {
                        generated_at: Utc::now(),
                        sources: &data.sources,
                        metrics: &data.metrics,
                    };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render_summary(&data.metrics));
                }
                Ok(())
            }
            Some(Commands::Detail { metric, json }) => {
                let key = MetricKey::from_name(&metric)?;
                let data = compute(&loader, &sources)?;
                let subset = data.metrics.detail(key).with_context(|| {
                    format!("{} depends on a column that is not in the data", key)
                })?;
                if json {
                    println!("{}", serde_json::to_string_pretty(subset)?);
                } else {
                    write_csv(subset, io::stdout().lock())?;
                }
                Ok(())
            }
        }
    }
}

/// One load-then-aggregate pass
fn compute(
    loader: &DataLoaderService,
    sources: &SelectedSources,
) -> Result<AppData, DashboardError> {
    let (providers, services) =
        loader.load(sources.providers.as_ref(), sources.services.as_ref())?;
    let metrics = Aggregator::aggregate(&providers, &services)?;
    Ok(AppData {
        metrics,
        sources: describe_sources(sources),
    })
}

fn describe_sources(sources: &SelectedSources) -> String {
    let describe = |s: &Option<partnerdash::services::DataSource>| {
        s.as_ref()
            .map(|s| s.describe())
            .unwrap_or_else(|| "-".to_string())
    };
    format!(
        "providers: {}  services: {}",
        describe(&sources.providers),
        describe(&sources.services)
    )
}

/// Plain-text summary grouped by dashboard section
fn render_summary(metrics: &MetricSet) -> String {
    let mut out = String::new();
    for section in Section::all() {
        let _ = writeln!(out, "{}", section.title());
        for metric in metrics.section(*section) {
            let _ = writeln!(
                out,
                "  {:<28}{:>10}",
                metric.key.label(),
                format_number(metric.count as u64)
            );
        }
    }
    out
}

fn write_csv<W: io::Write>(subset: &Subset, writer: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&subset.columns)?;
    for row in &subset.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use partnerdash::services::DataSource;

    fn sources() -> SelectedSources {
        SelectedSources {
            providers: Some(DataSource::buffer(
                "provider.csv",
                "provider_id,status,is_aadhaar_verified,company_type\n1,ACTIVE,1,Individual\n2,active,0,Organization\n",
            )),
            services: Some(DataSource::buffer(
                "services.csv",
                "provider_id,status,is_multi_city,is_remote\n1,ACTIVE,0,1\n",
            )),
        }
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["partnerdash"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.no_defaults);
    }

    #[test]
    fn test_cli_parse_summary_json() {
        let cli = Cli::try_parse_from(["partnerdash", "summary", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Summary { json: true })));
    }

    #[test]
    fn test_cli_parse_global_paths_after_subcommand() {
        let cli = Cli::try_parse_from([
            "partnerdash",
            "detail",
            "services",
            "--providers",
            "p.csv",
            "--services",
            "s.csv",
        ])
        .unwrap();
        assert_eq!(cli.providers, Some(PathBuf::from("p.csv")));
        assert_eq!(cli.services, Some(PathBuf::from("s.csv")));
        assert!(matches!(
            cli.command,
            Some(Commands::Detail { ref metric, json: false }) if metric == "services"
        ));
    }

    #[test]
    fn test_compute_from_buffers() {
        let data = compute(&DataLoaderService::new(), &sources()).unwrap();
        assert_eq!(data.metrics.count(MetricKey::ActiveProviders), 2);
        assert_eq!(data.metrics.count(MetricKey::ProvidersWithoutListings), 1);
        assert_eq!(
            data.sources,
            "providers: provider.csv  services: services.csv"
        );
    }

    #[test]
    fn test_compute_missing_input() {
        let err = compute(&DataLoaderService::new(), &SelectedSources::default()).unwrap_err();
        assert!(err.is_missing_input());
    }

    #[test]
    fn test_render_summary_lists_sections() {
        let data = compute(&DataLoaderService::new(), &sources()).unwrap();
        let text = render_summary(&data.metrics);
        assert!(text.starts_with("Providers Summary\n"));
        assert!(text.contains("On-site Services Split"));
        assert!(text.lines().any(|l| l.contains("Providers w/out Listings") && l.ends_with('1')));
    }

    #[test]
    fn test_write_csv() {
        let data = compute(&DataLoaderService::new(), &sources()).unwrap();
        let subset = data
            .metrics
            .detail(MetricKey::ProvidersWithoutListings)
            .unwrap();
        let mut out = Vec::new();
        write_csv(subset, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "provider_id,status,is_aadhaar_verified,company_type\n2,active,0,Organization\n"
        );
    }
}
