#![warn(missing_docs)]
//! # grc-risk binary
//!
//! Terminal front end for the risk dashboard.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use grc_risk_app::{
    AppError, Dashboard, DashboardConfig, SUBMIT_SUCCESS_MESSAGE, app_version, render_heatmap,
    render_summary, render_table, write_export,
};
use grc_risk_core::RiskAssessment;
use grc_risk_view::{LevelFilter, SortConfig, SortDirection, SortKey};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

/// Env var holding the tracing filter directive.
const LOG_ENV: &str = "GRC_RISK_LOG";

#[derive(Debug, Parser)]
#[command(name = "grc-risk", version = app_version(), about = "GRC risk register dashboard")]
struct Cli {
    /// Backend base URL (overrides GRC_RISK_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in milliseconds (overrides GRC_RISK_TIMEOUT_MS).
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show summary, heatmap, and the register table.
    List(ViewArgs),
    /// Submit a new risk assessment.
    Submit {
        /// Asset name.
        #[arg(long)]
        asset: String,
        /// Threat description.
        #[arg(long)]
        threat: String,
        /// Likelihood rating, 1 to 5.
        #[arg(long)]
        likelihood: i32,
        /// Impact rating, 1 to 5.
        #[arg(long)]
        impact: i32,
    },
    /// Write the current table view to a dated CSV file.
    Export {
        #[command(flatten)]
        view: ViewArgs,
        /// Output directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Check backend health.
    Health,
    /// Print the application version.
    Version,
}

#[derive(Debug, Args)]
struct ViewArgs {
    /// Level filter: All, Low, Medium, High, or Critical.
    #[arg(long, default_value = "All")]
    level: LevelFilter,
    /// Case-insensitive search over asset and threat.
    #[arg(long, default_value = "")]
    search: String,
    /// Sort column.
    #[arg(long, default_value = "score")]
    sort: SortKey,
    /// Sort direction: asc or desc.
    #[arg(long, default_value = "desc")]
    direction: SortDirection,
}

impl ViewArgs {
    fn apply_to(self, dashboard: &mut Dashboard) {
        dashboard.set_level_filter(self.level);
        dashboard.set_search(self.search);
        dashboard.set_sort(SortConfig {
            key: self.sort,
            direction: self.direction,
        });
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> DashboardConfig {
    let mut config = DashboardConfig::from_env();
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms.filter(|value| *value > 0) {
        config.timeout_ms = timeout_ms;
    }
    config
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(&cli);
    tracing::debug!(stage = "startup", api_url = %config.api_url, timeout_ms = config.timeout_ms);

    match cli.command {
        Command::Version => {
            println!("grc-risk {}", app_version());
            Ok(())
        }
        Command::Health => {
            let client = config.build_client()?;
            let health = client.health().map_err(AppError::Fetch)?;
            println!("{} (status: {})", health.message, health.status);
            Ok(())
        }
        Command::List(view) => {
            let mut dashboard = Dashboard::new(config.build_client()?);
            view.apply_to(&mut dashboard);
            dashboard.refresh()?;

            let projection = dashboard.project();
            println!("{}\n", render_summary(&projection.summary));
            println!("{}\n", render_heatmap(&projection.matrix));
            println!("{}", render_table(&projection.rows));
            Ok(())
        }
        Command::Submit {
            asset,
            threat,
            likelihood,
            impact,
        } => {
            let mut dashboard = Dashboard::new(config.build_client()?);
            let assessment = RiskAssessment {
                asset,
                threat,
                likelihood,
                impact,
            };
            let record = dashboard.submit(&assessment)?;
            println!("{SUBMIT_SUCCESS_MESSAGE}");
            println!("{}", render_table(&[record]));
            if let Some(banner) = dashboard.last_error() {
                eprintln!("{banner}");
            }
            Ok(())
        }
        Command::Export { view, dir } => {
            let mut dashboard = Dashboard::new(config.build_client()?);
            view.apply_to(&mut dashboard);
            dashboard.refresh()?;

            let today = OffsetDateTime::now_utc().date();
            let path = write_export(&dir, &dashboard.export(today))?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// CLI entry point.
fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(%error, "command failed");
            eprintln!("{}", error.user_message());
            ExitCode::FAILURE
        }
    }
}
