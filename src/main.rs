use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use client_dashboard_lib::{init_tracing, Clock, Dashboard, DashboardConfig, FixedClock, RecordStore, SystemClock};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum View {
    Snapshot,
    Summary,
    Monthly,
    Cashflow,
    Timeline,
    Table,
    Groups,
    Prospects,
    Reconcile,
}

#[derive(Parser, Debug)]
#[command(name = "client-dashboard", version, about = "Client revenue and project dashboard data")]
struct Cli {
    /// Client dataset (.json, .yaml or .yml); the built-in dataset when omitted
    #[arg(short = 'd', long = "data")]
    data: Option<PathBuf>,

    /// Dashboard configuration (.json, .yaml or .yml)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Date used for upcoming/elapsed classification (YYYY-MM-DD), defaults to today
    #[arg(long = "today")]
    today: Option<NaiveDate>,

    /// Write JSON logs to a daily-rolling file in this directory instead of stderr
    #[arg(long = "log-dir")]
    log_dir: Option<PathBuf>,

    #[arg(long = "view", value_enum, default_value = "snapshot")]
    view: View,

    #[arg(long = "pretty")]
    pretty: bool,
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    let tolerance = config.reconciliation_tolerance;
    let store = match &cli.data {
        Some(path) => RecordStore::load(path, tolerance).with_context(|| format!("loading dataset {}", path.display()))?,
        None => RecordStore::seeded(tolerance).context("loading built-in dataset")?,
    };

    let clock: Arc<dyn Clock> = match cli.today {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(SystemClock),
    };

    let dashboard = Dashboard::new(store, config, clock)?;
    tracing::info!(records = dashboard.store().len(), view = ?cli.view, "rendering dashboard view");

    match cli.view {
        View::Snapshot => write_json(&dashboard.snapshot(), cli.pretty),
        View::Summary => write_json(&dashboard.summary(), cli.pretty),
        View::Monthly => write_json(&dashboard.monthly_revenue(), cli.pretty),
        View::Cashflow => write_json(&dashboard.monthly_cashflow(), cli.pretty),
        View::Timeline => write_json(&dashboard.timeline(), cli.pretty),
        View::Table => write_json(&dashboard.table(), cli.pretty),
        View::Groups => write_json(&dashboard.groups(), cli.pretty),
        View::Prospects => write_json(&dashboard.prospects(), cli.pretty),
        View::Reconcile => write_json(&dashboard.reconciliation(), cli.pretty),
    }
}
