//! CLI command implementations for the campaign dashboard.
//!
//! Provides subcommand handlers for:
//! - `insights campaigns` — filtered, sorted, paginated campaign table
//! - `insights export` — write the filtered rows as CSV
//! - `insights metrics --ticks N` — KPI cards after N simulated refreshes
//! - `insights insights [widget]` — predictions, sentiment, anomalies, optimizer
//! - `insights chat "question"` — canned assistant reply
//! - `insights theme [show|light|dark|toggle]` — theme preference
//! - `insights history` — recent activity-log events
//! - `insights health` — config, preference store and log status
//! - `insights config show|init|set|reset` — configuration management

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;

use crate::activity::{ActivityEvent, ActivityKind, ActivityLog};
use crate::assistant::{Message, format_data_point};
use crate::campaign::{self, CampaignField, CampaignStatus};
use crate::config::{self, InsightsConfig};
use crate::dashboard::Dashboard;
use crate::format;
use crate::insights::anomalies::AnomalyStatus;
use crate::insights::optimizer::OptimizationStatus;
use crate::insights::sentiment::Sentiment;
use crate::insights::{AnomalyDetector, AutoOptimizer, Level, Predictions, SentimentAnalyzer};
use crate::metrics::{MetricSnapshot, Trend};
use crate::table::{TablePage, TableQuery, TableState, csv};
use crate::theme::{FileStore, MemoryStore, PreferenceStore, ThemePreference, ThemeStyle};
use crate::web;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Which insight widget to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Widget {
    Predictions,
    Sentiment,
    Anomalies,
    Optimizer,
}

/// `insights theme` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeAction {
    #[default]
    Show,
    Light,
    Dark,
    Toggle,
}

/// Open a dashboard with the file-backed preference store and the
/// configured activity log.
pub fn open_dashboard(cfg: &InsightsConfig, now: Instant) -> Dashboard {
    let store: Box<dyn PreferenceStore> = match FileStore::default_location() {
        Some(store) => Box::new(store),
        None => Box::new(MemoryStore::new()),
    };
    Dashboard::new(cfg, store, ActivityLog::from_config(&cfg.logging), now)
}

// ---------------------------------------------------------------------------
// insights campaigns
// ---------------------------------------------------------------------------

/// Show one page of the campaign table.
pub fn run_campaigns(query: &TableQuery, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let mut table = TableState::new(campaign::mock::campaigns(), cfg.general.page_size);
    query.apply(&mut table)?;
    let page = table.view();

    match format {
        OutputFormat::Json => print_campaigns_json(&page)?,
        OutputFormat::Csv => println!("{}", csv::to_csv(page.rows.iter().copied())),
        OutputFormat::Table => print_campaigns_table(&cfg.general.title, &table, &page),
    }

    Ok(())
}

fn print_campaigns_table(title: &str, table: &TableState, page: &TablePage<'_>) {
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(60));

    let active = table.filters.active_count();
    if active > 0 {
        println!(
            "  {}",
            format!("{active} filter(s) active").dimmed()
        );
    }

    if page.rows.is_empty() {
        println!();
        println!(
            "{}",
            "No campaigns match the current filters.".yellow()
        );
        return;
    }

    let header: Vec<String> = CampaignField::ALL.iter().map(|f| f.label()).collect();
    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|record| {
            record
                .fields()
                .map(|(field, value)| format::format_cell(field, value))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!();
    println!("  {}", pad_row(&header, &widths).bold());
    println!("  {}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len()));

    for (i, (row, record)) in rows.iter().zip(&page.rows).enumerate() {
        let line = pad_row(row, &widths);
        let status = colorize_status(record.status);
        // Re-color the status column in place
        let line = line.replacen(record.status.as_str(), &status.to_string(), 1);
        if i % 2 == 0 {
            println!("  {line}");
        } else {
            println!("  {}", line.dimmed());
        }
    }

    println!();
    println!("  {}", page.meta.summary().dimmed());
    println!(
        "  {}",
        format!("Page {} of {}", page.meta.page, page.meta.total_pages.max(1)).dimmed()
    );
}

fn print_campaigns_json(page: &TablePage<'_>) -> Result<()> {
    let value = serde_json::json!({
        "rows": page.rows,
        "meta": page.meta,
        "summary": page.meta.summary(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// insights export
// ---------------------------------------------------------------------------

/// Write the filtered campaigns as CSV into `dir`.
pub fn run_export(query: &TableQuery, dir: &Path) -> Result<()> {
    let cfg = config::load();
    let mut dash = open_dashboard(&cfg, Instant::now());
    query.apply(dash.table_mut())?;

    let rows = dash.table().filtered().len();
    let path = dash.export_csv(dir)?;
    println!(
        "{} Exported {} row(s) to {}",
        "✓".green().bold(),
        rows,
        path.display()
    );
    if rows == 0 {
        println!(
            "  {}",
            "No campaigns matched; the file contains the header only.".dimmed()
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// insights metrics
// ---------------------------------------------------------------------------

/// Show the KPI cards after `ticks` simulated refresh intervals.
pub fn run_metrics(ticks: u32, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let start = Instant::now();
    let later = refresh_horizon(start, cfg.refresh.metrics_interval(), ticks)?;
    let mut dash = open_dashboard(&cfg, start);
    dash.poll(later);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(dash.metrics())?);
        }
        OutputFormat::Csv => print_metrics_csv(dash.metrics()),
        OutputFormat::Table => print_metrics_table(dash.metrics(), ticks, dash.seed()),
    }
    Ok(())
}

/// Instant reached after `ticks` refresh intervals from `start`.
fn refresh_horizon(start: Instant, interval: Duration, ticks: u32) -> Result<Instant> {
    interval
        .checked_mul(ticks)
        .and_then(|elapsed| start.checked_add(elapsed))
        .with_context(|| format!("{ticks} refreshes overflow the simulated clock"))
}

fn print_metrics_table(metrics: &[MetricSnapshot], ticks: u32, seed: u64) {
    println!("{}", "Key Metrics".bold().cyan());
    println!("{}", "=".repeat(50));
    for m in metrics {
        let change = format!("{} {}", m.trend.arrow(), m.display_change());
        let change = match m.trend {
            Trend::Up => change.green(),
            Trend::Down => change.red(),
            Trend::Flat => change.dimmed(),
        };
        println!("  {:<20} {:>14}  {}", m.title.bold(), m.display_value(), change);
    }
    println!();
    println!(
        "  {}",
        format!("after {ticks} refresh(es), seed {seed}").dimmed()
    );
}

fn print_metrics_csv(metrics: &[MetricSnapshot]) {
    println!("key,title,current,previous,change");
    for m in metrics {
        println!(
            "{},{},{:.2},{:.2},{}",
            m.key,
            csv::quote(&m.title),
            m.current,
            m.previous,
            m.change.map(|c| format!("{c:.2}")).unwrap_or_default(),
        );
    }
}

// ---------------------------------------------------------------------------
// insights insights
// ---------------------------------------------------------------------------

/// Show one insight widget, or all four when `widget` is `None`.
pub fn run_insights(widget: Option<Widget>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let now = Instant::now();
    let dash = open_dashboard(&cfg, now);

    let widgets = match widget {
        Some(w) => vec![w],
        None => vec![
            Widget::Predictions,
            Widget::Sentiment,
            Widget::Anomalies,
            Widget::Optimizer,
        ],
    };

    if format == OutputFormat::Json {
        let mut value = serde_json::Map::new();
        for w in &widgets {
            let (key, json) = match w {
                Widget::Predictions => (
                    "predictions",
                    serde_json::json!({
                        "predictions": dash.predictions(),
                        "forecast": dash.predictions().forecast(),
                    }),
                ),
                Widget::Sentiment => ("sentiment", serde_json::to_value(dash.sentiment())?),
                Widget::Anomalies => (
                    "anomalies",
                    serde_json::json!({
                        "monitoring": dash.anomalies().monitoring,
                        "stats": dash.anomalies().stats(),
                        "anomalies": dash.anomalies().anomalies,
                    }),
                ),
                Widget::Optimizer => ("optimizer", serde_json::to_value(dash.optimizer())?),
            };
            value.insert(key.to_string(), json);
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for (i, w) in widgets.iter().enumerate() {
        if i > 0 {
            println!();
        }
        match (w, format) {
            (Widget::Predictions, OutputFormat::Csv) => print_predictions_csv(dash.predictions()),
            (Widget::Predictions, _) => print_predictions_table(dash.predictions()),
            (Widget::Sentiment, OutputFormat::Csv) => print_sentiment_csv(dash.sentiment()),
            (Widget::Sentiment, _) => print_sentiment_table(dash.sentiment()),
            (Widget::Anomalies, OutputFormat::Csv) => print_anomalies_csv(dash.anomalies()),
            (Widget::Anomalies, _) => print_anomalies_table(&dash, now),
            (Widget::Optimizer, OutputFormat::Csv) => print_optimizer_csv(dash.optimizer()),
            (Widget::Optimizer, _) => print_optimizer_table(dash.optimizer()),
        }
    }
    Ok(())
}

fn print_predictions_table(p: &Predictions) {
    println!("{}", "AI Predictions".bold().cyan());
    println!("{}", "=".repeat(50));
    let rows = [
        ("Revenue", format::format_currency(p.revenue.current), format::format_currency(p.revenue.predicted), p.revenue.confidence),
        ("Conversions", format::format_number(p.conversions.current), format::format_number(p.conversions.predicted), p.conversions.confidence),
        ("Users", format::format_number(p.users.current), format::format_number(p.users.predicted), p.users.confidence),
        ("Growth", format::format_percentage(p.growth.current), format::format_percentage(p.growth.predicted), p.growth.confidence),
    ];
    println!(
        "  {:<14} {:>12} {:>12} {:>11}",
        "Metric", "Current", "Predicted", "Confidence"
    );
    println!("  {}", "-".repeat(52));
    for (name, current, predicted, confidence) in rows {
        println!(
            "  {:<14} {:>12} {:>12} {:>10}%",
            name,
            current,
            predicted.green(),
            confidence
        );
    }

    println!();
    println!("{}", "Forecast".bold().cyan());
    for point in p.forecast() {
        println!(
            "  {:<10} {:>12} {:>12}",
            point.label,
            format::format_currency(point.revenue),
            format::format_currency(point.predicted).dimmed()
        );
    }

    println!();
    println!("{}", "Insights".bold().cyan());
    for insight in &p.insights {
        println!(
            "  {} {} {}",
            colorize_level(insight.impact),
            insight.title.bold(),
            format!("({}, {}% confidence)", insight.kind.as_str(), insight.confidence).dimmed()
        );
        println!("      {}", insight.description);
        println!("      {} {}", "→".cyan(), insight.action);
    }
}

fn print_predictions_csv(p: &Predictions) {
    println!("metric,current,predicted,confidence");
    for (name, pred) in [
        ("revenue", &p.revenue),
        ("conversions", &p.conversions),
        ("users", &p.users),
        ("growth", &p.growth),
    ] {
        println!(
            "{},{:.2},{:.2},{}",
            name, pred.current, pred.predicted, pred.confidence
        );
    }
}

fn print_sentiment_table(s: &SentimentAnalyzer) {
    println!("{}", "Customer Sentiment".bold().cyan());
    println!("{}", "=".repeat(50));
    let scores = &s.scores;
    println!(
        "  {} {}%  {}",
        "Overall:".bold(),
        scores.overall,
        format!("{} {:+} pts", scores.trend.arrow(), scores.change).dimmed()
    );
    println!(
        "  {} {}%   {} {}%   {} {}%",
        "Positive".green(),
        scores.positive,
        "Neutral".yellow(),
        scores.neutral,
        "Negative".red(),
        scores.negative
    );

    println!();
    println!("{}", "Recent Feedback".bold().cyan());
    for fb in &s.feedback {
        println!(
            "  {} {} {}",
            colorize_sentiment(fb.sentiment),
            fb.text,
            format!("— {}, {}", fb.source, fb.age_label()).dimmed()
        );
    }

    let breakdown = s
        .breakdown()
        .iter()
        .map(|(sentiment, n)| format!("{} {n}", sentiment.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    println!();
    println!("  {}", format!("feedback: {breakdown}").dimmed());
}

fn print_sentiment_csv(s: &SentimentAnalyzer) {
    println!("id,sentiment,score,source,category,text");
    for fb in &s.feedback {
        println!(
            "{},{},{:.2},{},{},{}",
            fb.id,
            fb.sentiment.as_str(),
            fb.score,
            csv::quote(fb.source),
            csv::quote(fb.category),
            csv::quote(fb.text),
        );
    }
}

fn print_anomalies_table(dash: &Dashboard, now: Instant) {
    let detector = dash.anomalies();
    let wall = dash.wall_clock(now);
    let stats = detector.stats();

    println!("{}", "Anomaly Detection".bold().cyan());
    println!("{}", "=".repeat(50));
    println!(
        "  {} {}",
        "Monitoring:".bold(),
        if detector.monitoring {
            "on".green()
        } else {
            "paused".yellow()
        }
    );
    println!(
        "  Total: {}  Resolved: {}  Active: {}  False positives: {}",
        stats.total, stats.resolved, stats.active, stats.false_positive
    );

    if detector.anomalies.is_empty() {
        println!();
        println!("{}", "No anomalies detected.".green());
        return;
    }

    println!();
    println!(
        "  {:<4} {:<8} {:<18} {:<14} {:<9} Detected",
        "ID", "Severity", "Metric", "Status", "Type"
    );
    println!("  {}", "-".repeat(68));
    for a in &detector.anomalies {
        println!(
            "  {:<4} {:<17} {:<18} {:<23} {:<9} {}",
            a.id,
            colorize_level(a.severity).to_string(),
            truncate(&a.metric, 18),
            colorize_anomaly_status(a.status).to_string(),
            a.kind.as_str(),
            format::format_relative(a.detected_at, wall).dimmed()
        );
        println!("       {}", a.description.dimmed());
    }
}

fn print_anomalies_csv(detector: &AnomalyDetector) {
    println!("id,kind,metric,severity,status,value,confidence,detected_at");
    for a in &detector.anomalies {
        println!(
            "{},{},{},{},{},{},{},{}",
            a.id,
            a.kind.as_str(),
            csv::quote(&a.metric),
            a.severity,
            a.status.as_str(),
            a.value,
            a.confidence,
            a.detected_at.to_rfc3339(),
        );
    }
}

fn print_optimizer_table(opt: &AutoOptimizer) {
    println!("{}", "Auto Optimizer".bold().cyan());
    println!("{}", "=".repeat(50));
    println!(
        "  {} {}   Applied: {}  Pending: {}",
        "Auto mode:".bold(),
        if opt.auto_mode {
            "on".green()
        } else {
            "off".yellow()
        },
        opt.applied_count(),
        opt.pending_count()
    );
    println!();
    for o in &opt.optimizations {
        println!(
            "  {:<3} {} {} {}",
            o.id,
            colorize_optimization_status(o.status),
            o.campaign.bold(),
            format!("[{}]", o.kind.as_str()).dimmed()
        );
        println!(
            "      {} → {}  {}",
            o.current,
            o.suggested.to_string().green(),
            format!("{} ({}% confidence)", o.potential_gain, o.confidence).dimmed()
        );
        println!("      {}", o.description);
    }
}

fn print_optimizer_csv(opt: &AutoOptimizer) {
    println!("id,kind,campaign,status,current,suggested,confidence,potential_gain");
    for o in &opt.optimizations {
        println!(
            "{},{},{},{},{},{},{},{}",
            o.id,
            o.kind.as_str(),
            csv::quote(o.campaign),
            o.status.as_str(),
            csv::quote(&o.current.to_string()),
            csv::quote(&o.suggested.to_string()),
            o.confidence,
            csv::quote(o.potential_gain),
        );
    }
}

// ---------------------------------------------------------------------------
// insights chat
// ---------------------------------------------------------------------------

/// Ask the assistant a question and print the canned reply.
pub fn run_chat(question: &str, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let now = Instant::now();
    let mut dash = open_dashboard(&cfg, now);
    let delay = dash.thinking_delay();

    if format == OutputFormat::Table {
        println!("{}", "Analyzing your data…".dimmed());
        std::thread::sleep(delay);
    }

    let Some(reply) = dash.ask(question, now + delay) else {
        println!("{}", "Ask a question to get started.".yellow());
        return Ok(());
    };

    match format {
        OutputFormat::Json | OutputFormat::Csv => {
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        OutputFormat::Table => print_reply(&reply),
    }
    Ok(())
}

fn print_reply(reply: &Message) {
    if let Some(kind) = reply.kind {
        println!("{}", format!("[{kind}]").cyan().bold());
    }
    println!("{}", reply.content);

    if !reply.data.is_empty() {
        println!();
        for point in &reply.data {
            println!(
                "  {:<14} {}",
                format::capitalize(point.key).bold(),
                format_data_point(point.key, point.value)
            );
        }
    }
}

// ---------------------------------------------------------------------------
// insights theme
// ---------------------------------------------------------------------------

/// Show or change the theme preference.
pub fn run_theme(action: ThemeAction) -> Result<()> {
    let cfg = config::load();
    let mut dash = open_dashboard(&cfg, Instant::now());

    let style = match action {
        ThemeAction::Show => dash.theme().style(),
        ThemeAction::Light => dash.set_theme(ThemePreference::Light)?,
        ThemeAction::Dark => dash.set_theme(ThemePreference::Dark)?,
        ThemeAction::Toggle => dash.toggle_theme()?,
    };

    if action != ThemeAction::Show {
        println!(
            "{} Theme set to {}",
            "✓".green().bold(),
            style.preference.as_str().bold()
        );
    }
    print_theme(&style, &dash.theme().store().describe());
    Ok(())
}

fn print_theme(style: &ThemeStyle, store: &str) {
    println!("  {:<12} {}", "Theme:".bold(), style.preference);
    println!("  {:<12} {}", "Root class:".bold(), style.root_class);
    println!("  {:<12} {}", "Background:".bold(), style.background);
    println!("  {:<12} {}", "Surface:".bold(), style.surface);
    println!("  {:<12} {}", "Text:".bold(), style.text);
    println!("  {:<12} {}", "Accent:".bold(), style.accent);
    println!("  {:<12} {}", "Stored in:".bold(), store.dimmed());
}

// ---------------------------------------------------------------------------
// insights history
// ---------------------------------------------------------------------------

/// Show the most recent activity-log events.
pub fn run_history(limit: usize, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let log = ActivityLog::from_config(&cfg.logging);
    let events = log.read_recent(limit);

    if events.is_empty() {
        println!(
            "{}",
            "No activity yet. Export, chat or change the theme to record events.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
        OutputFormat::Csv => print_history_csv(&events),
        OutputFormat::Table => print_history_table(&events),
    }
    Ok(())
}

fn print_history_table(events: &[ActivityEvent]) {
    println!("{}", "Recent Activity".bold().cyan());
    println!("{}", "=".repeat(60));
    for (i, e) in events.iter().enumerate() {
        let time = chrono::DateTime::parse_from_rfc3339(&e.timestamp)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|_| e.timestamp.clone());
        let line = format!("  {:<19} {:<10} {}", time, e.kind, e.detail);
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_history_csv(events: &[ActivityEvent]) {
    println!("timestamp,kind,detail");
    for e in events {
        println!("{},{},{}", e.timestamp, e.kind, csv::quote(&e.detail));
    }
}

// ---------------------------------------------------------------------------
// insights serve
// ---------------------------------------------------------------------------

/// Start the web dashboard. `addr` overrides the configured address.
pub fn run_serve(addr: Option<&str>, no_open: bool) -> Result<()> {
    let cfg = config::load();
    let addr = addr.unwrap_or(&cfg.server.addr).to_string();
    let mut dash = open_dashboard(&cfg, Instant::now());
    web::serve(&mut dash, &addr, cfg.server.open_browser && !no_open)
}

// ---------------------------------------------------------------------------
// insights health
// ---------------------------------------------------------------------------

/// Check config files, preference store and activity log.
pub fn run_health() -> Result<()> {
    println!("{}", "Insights Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // 0. Config file status
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.insights/config.toml found"
        } else {
            "not found (run `insights config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".insights.toml found"
        } else {
            "none (optional)"
        },
    );
    print_health_item(
        "Page size / Theme",
        true,
        &format!("{} / {}", cfg.general.page_size, cfg.theme.preference),
    );
    print_health_item(
        "Seed",
        true,
        &cfg.refresh
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random per run".to_string()),
    );

    // 1. Preference store
    let store = FileStore::default_location();
    let store_ok = store.as_ref().is_some_and(|s| s.load().is_ok());
    print_health_item(
        "Preference store",
        store_ok,
        &match &store {
            Some(s) if store_ok => s.describe(),
            Some(s) => format!("{} is unreadable", s.describe()),
            None => "no home directory; preferences are not persisted".to_string(),
        },
    );

    // 2. Activity log
    let log = ActivityLog::from_config(&cfg.logging);
    let log_exists = log.path().is_some_and(|p| p.exists());
    print_health_item(
        "Activity log",
        log.is_enabled(),
        &match (log.is_enabled(), log_exists) {
            (false, _) => "disabled (set INSIGHTS_LOGGING=1 to enable)".to_string(),
            (true, true) => format!("{} events", log.read_all().len()),
            (true, false) => "no log file yet".to_string(),
        },
    );

    // 3. Server address
    print_health_item("Server address", true, &cfg.server.addr);

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// insights config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Insights Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    // Show source info
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.insights/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.insights/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".insights.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".insights.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "INSIGHTS_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.insights/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to customize the dashboard.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    let cfg = config::load();
    ActivityLog::from_config(&cfg.logging).record(ActivityKind::Config, format!("{key} = {value}"));
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn colorize_status(status: CampaignStatus) -> colored::ColoredString {
    match status {
        CampaignStatus::Active => status.as_str().green(),
        CampaignStatus::Paused => status.as_str().yellow(),
        CampaignStatus::Completed => status.as_str().blue(),
    }
}

fn colorize_level(level: Level) -> colored::ColoredString {
    match level {
        Level::High => level.as_str().red().bold(),
        Level::Medium => level.as_str().yellow(),
        Level::Low => level.as_str().green(),
    }
}

fn colorize_sentiment(sentiment: Sentiment) -> colored::ColoredString {
    match sentiment {
        Sentiment::Positive => "+".green().bold(),
        Sentiment::Neutral => "·".yellow().bold(),
        Sentiment::Negative => "-".red().bold(),
    }
}

fn colorize_anomaly_status(status: AnomalyStatus) -> colored::ColoredString {
    match status {
        AnomalyStatus::Active => status.as_str().red(),
        AnomalyStatus::Investigating => status.as_str().yellow(),
        AnomalyStatus::Monitoring => status.as_str().blue(),
        AnomalyStatus::Resolved => status.as_str().green(),
    }
}

fn colorize_optimization_status(status: OptimizationStatus) -> colored::ColoredString {
    match status {
        OptimizationStatus::Pending => status.as_str().yellow(),
        OptimizationStatus::Applied => status.as_str().green(),
        OptimizationStatus::Rejected => status.as_str().dimmed(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
        assert_eq!(truncate("Conversión Rate", 6), "Conve…");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn test_pad_row() {
        let cells = vec!["ab".to_string(), "c".to_string()];
        assert_eq!(pad_row(&cells, &[4, 1]), "ab    c");
    }

    #[test]
    fn refresh_horizon_scales_interval() {
        let start = Instant::now();
        let later = refresh_horizon(start, Duration::from_secs(5), 1_500).unwrap();
        assert_eq!(later - start, Duration::from_secs(7_500));
    }

    #[test]
    fn refresh_horizon_rejects_overflow() {
        let err = refresh_horizon(Instant::now(), Duration::from_secs(u64::MAX), 2).unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn theme_action_defaults_to_show() {
        assert_eq!(ThemeAction::default(), ThemeAction::Show);
    }
}
