//! MEDBOARD — Demo CLI
//!
//! Opens a doctor's dashboard over an in-memory store seeded with fictional
//! clinic data, then prints the charts and the notification feed.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- charts --year 2024 --type1 female
//!   cargo run -p demo -- notifications
//!   cargo run -p demo -- --config medboard.toml charts

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use medboard_contracts::{
    chart::{ChartData, MONTH_LABELS},
    error::DashResult,
    notification::{NotificationId, NotificationView, SubjectId},
    patient::{Condition, GenderFilter},
    session::Session,
};
use medboard_core::RowStore;
use medboard_dashboard::{
    mock_data::{self, DOCTOR_ID, OTHER_DOCTOR_ID},
    ChartKind, Dashboard, DashboardConfig,
};
use medboard_store::InMemoryRowStore;

// ── CLI definition ────────────────────────────────────────────────────────────

/// MEDBOARD — clinical dashboard core demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "MEDBOARD clinical dashboard demo",
    long_about = "Seeds an in-memory row store with fictional patients and notifications,\n\
                  opens a doctor's dashboard and prints its charts and notification feed."
)]
struct Cli {
    /// Dashboard configuration file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the three dashboard charts.
    Charts {
        /// Year for the risk overview. Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,
        /// Gender filter for the Type 1 chart: all, male or female.
        #[arg(long)]
        type1: Option<GenderFilter>,
        /// Gender filter for the Type 2 chart: all, male or female.
        #[arg(long)]
        type2: Option<GenderFilter>,
    },
    /// Show the notification feed, a live insert and a mark-read.
    Notifications,
    /// Charts, notifications and an account switch in sequence.
    RunAll,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Charts { year, type1, type2 } => run_charts(&config, year, type1, type2),
        Command::Notifications => run_notifications(&config),
        Command::RunAll => run_all(&config),
    });

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> DashResult<DashboardConfig> {
    match path {
        Some(path) => {
            let config = DashboardConfig::from_file(path)?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(DashboardConfig::default()),
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn seeded_store(config: &DashboardConfig) -> InMemoryRowStore {
    let store = InMemoryRowStore::new();
    mock_data::seed(&store, &config.tables);
    store
}

fn open_dashboard(store: &InMemoryRowStore, config: &DashboardConfig) -> DashResult<Dashboard> {
    let shared: Arc<dyn RowStore> = Arc::new(store.clone());
    Dashboard::open(
        shared,
        config,
        &Session::doctor(),
        SubjectId::new(DOCTOR_ID),
        Utc::now(),
    )
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_all(config: &DashboardConfig) -> DashResult<()> {
    run_charts(config, None, None, None)?;
    run_notifications(config)?;

    let store = seeded_store(config);
    let mut dashboard = open_dashboard(&store, config)?;
    section(&format!("Account switch: {DOCTOR_ID} -> {OTHER_DOCTOR_ID}"));
    dashboard.switch_subject(SubjectId::new(OTHER_DOCTOR_ID));
    println!("  {}", dashboard.profile().greeting());
    println!("  patients on roster: {}", dashboard.roster().len());
    print_notifications(&dashboard.notifications());
    print_chart(ChartKind::Risk, dashboard.chart(ChartKind::Risk));
    dashboard.close();
    Ok(())
}

fn run_charts(
    config: &DashboardConfig,
    year: Option<i32>,
    type1: Option<GenderFilter>,
    type2: Option<GenderFilter>,
) -> DashResult<()> {
    let store = seeded_store(config);
    let mut dashboard = open_dashboard(&store, config)?;

    if let Some(filter) = type1 {
        dashboard.set_gender_filter(Condition::Type1Diabetes, filter);
    }
    if let Some(filter) = type2 {
        dashboard.set_gender_filter(Condition::Type2Diabetes, filter);
    }
    if let Some(year) = year {
        dashboard.set_year(year);
    }

    let filters = dashboard.filters();
    section(&format!("Charts for {}", dashboard.subject()));
    println!("  {}", dashboard.profile().greeting());
    println!(
        "  filters: type1={:?} type2={:?} year={}",
        filters.type1_gender, filters.type2_gender, filters.year
    );
    println!("  year options: {:?}", dashboard.year_options());

    for kind in ChartKind::ALL {
        print_chart(kind, dashboard.chart(kind));
    }
    dashboard.close();
    Ok(())
}

fn run_notifications(config: &DashboardConfig) -> DashResult<()> {
    let store = seeded_store(config);
    let mut dashboard = open_dashboard(&store, config)?;

    section(&format!("Notifications for {}", dashboard.subject()));
    print_notifications(&dashboard.notifications());

    println!();
    println!("  -> new notification arrives on the stream");
    store.insert(
        &config.tables.notifications,
        mock_data::notification(
            "nt-004",
            DOCTOR_ID,
            "pt-003 reported a hypoglycaemic episode",
            false,
            &Utc::now().to_rfc3339(),
        ),
    );
    let applied = dashboard.poll_notifications();
    println!("     applied: {applied}");
    print_notifications(&dashboard.notifications());

    if let Some(first) = dashboard
        .notifications()
        .records
        .iter()
        .find(|n| !n.is_read)
        .map(|n| n.id.clone())
    {
        println!();
        println!("  -> marking {first} as read");
        let outcome = dashboard.mark_read(&first);
        println!("     outcome: {outcome:?}");
        print_notifications(&dashboard.notifications());
    }

    let missing = NotificationId::new("nt-999");
    println!();
    println!("  -> marking unknown {missing} as read");
    println!("     outcome: {:?}", dashboard.mark_read(&missing));

    dashboard.close();
    Ok(())
}

// ── Output ────────────────────────────────────────────────────────────────────

fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "-".repeat(title.chars().count()));
}

fn print_chart(kind: ChartKind, chart: &ChartData) {
    println!();
    println!("  {}", kind.title());
    print!("  {:<24}", "");
    for month in MONTH_LABELS {
        print!("{month:>4}");
    }
    println!("{:>7}", "Total");
    for series in &chart.series {
        print!("  {:<24}", series.label);
        for count in series.counts {
            print!("{count:>4}");
        }
        println!("{:>7}", series.total());
    }
}

fn print_notifications(view: &NotificationView) {
    println!("  unread: {}", view.unread_count);
    if view.records.is_empty() {
        println!("  (no notifications)");
    }
    for n in &view.records {
        let marker = if n.is_read { " " } else { "*" };
        println!(
            "  {marker} {:<8} {:<28} {}",
            n.id.as_str(),
            n.created_at.as_deref().unwrap_or("-"),
            n.message
        );
    }
}

fn print_banner() {
    println!();
    println!("MEDBOARD — Clinical Dashboard Core");
    println!("==================================");
    println!();
    println!("Per dashboard:");
    println!("  [1] Roster fetched once per doctor, bucketed by month in the display zone");
    println!("  [2] Gender filter change recomputes only that condition's chart");
    println!("  [3] Year change recomputes only the risk overview");
    println!("  [4] Notifications: snapshot + live inserts, deduplicated by id");
    println!();
}
