//! The dashboard aggregate: campaign table, KPI cards, simulated widgets,
//! chat, theme and activity log behind one owner.
//!
//! Time only moves when [`Dashboard::poll`] is called. Each simulated
//! widget owns a [`Ticker`] and its own random stream, so a fixed seed and
//! the same sequence of poll instants always produce the same state.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::activity::{ActivityKind, ActivityLog};
use crate::assistant::{Conversation, Message};
use crate::campaign::{self, Campaign};
use crate::config::InsightsConfig;
use crate::insights::anomalies::Anomaly;
use crate::insights::optimizer::Optimization;
use crate::insights::{AnomalyDetector, AutoOptimizer, Predictions, SentimentAnalyzer};
use crate::metrics::rng::{SimRng, Stream};
use crate::metrics::ticker::Ticker;
use crate::metrics::{MetricSnapshot, MetricsSource, SimulatedSource};
use crate::table::{TableState, csv};
use crate::theme::{PreferenceStore, ThemeController, ThemePreference, ThemeStyle};

/// A simulated widget with its timer and random stream.
struct Timed<W> {
    widget: W,
    ticker: Ticker,
    rng: SimRng,
}

impl<W> Timed<W> {
    fn new(widget: W, interval: Duration, seed: u64, stream: Stream, start: Instant) -> Self {
        Self {
            widget,
            ticker: Ticker::new(interval, start),
            rng: SimRng::new(seed, stream),
        }
    }
}

pub struct Dashboard {
    title: String,
    seed: u64,
    started: Instant,
    started_at: DateTime<Utc>,
    table: TableState,
    metrics_source: Box<dyn MetricsSource>,
    metrics: Vec<MetricSnapshot>,
    predictions: Timed<Predictions>,
    sentiment: Timed<SentimentAnalyzer>,
    anomalies: Timed<AnomalyDetector>,
    optimizer: Timed<AutoOptimizer>,
    chat: Conversation,
    theme: ThemeController,
    log: ActivityLog,
    thinking_delay: Duration,
}

impl Dashboard {
    /// Dashboard over the mock campaigns with the simulated KPI source.
    /// Uses the configured seed, or a random one.
    pub fn new(
        config: &InsightsConfig,
        store: Box<dyn PreferenceStore>,
        log: ActivityLog,
        now: Instant,
    ) -> Self {
        let seed = config.refresh.seed.unwrap_or_else(rand::random);
        let source = SimulatedSource::new(seed, config.refresh.metrics_interval(), now);
        Self::with_metrics_source(config, seed, Box::new(source), store, log, now)
    }

    pub fn with_metrics_source(
        config: &InsightsConfig,
        seed: u64,
        mut metrics_source: Box<dyn MetricsSource>,
        store: Box<dyn PreferenceStore>,
        log: ActivityLog,
        now: Instant,
    ) -> Self {
        let refresh = &config.refresh;
        let started_at = Utc::now();
        let metrics = metrics_source.poll(now);

        Self {
            title: config.general.title.clone(),
            seed,
            started: now,
            started_at,
            table: TableState::new(campaign::mock::campaigns(), config.general.page_size),
            metrics_source,
            metrics,
            predictions: Timed::new(
                Predictions::new(),
                refresh.predictions_interval(),
                seed,
                Stream::Predictions,
                now,
            ),
            sentiment: Timed::new(
                SentimentAnalyzer::new(),
                refresh.sentiment_interval(),
                seed,
                Stream::Sentiment,
                now,
            ),
            anomalies: Timed::new(
                AnomalyDetector::new(started_at),
                refresh.anomaly_interval(),
                seed,
                Stream::Anomalies,
                now,
            ),
            optimizer: Timed::new(
                AutoOptimizer::new(),
                refresh.optimizer_interval(),
                seed,
                Stream::Optimizer,
                now,
            ),
            chat: Conversation::new(started_at),
            theme: ThemeController::new(store, config.theme.preference),
            log,
            thinking_delay: Duration::from_millis(config.assistant.thinking_delay_ms),
        }
    }

    // -- Clock --

    /// Advance every simulated component to `now`.
    pub fn poll(&mut self, now: Instant) {
        self.metrics = self.metrics_source.poll(now);

        for _ in 0..self.predictions.ticker.due(now) {
            self.predictions.widget.tick(&mut self.predictions.rng);
        }
        for _ in 0..self.sentiment.ticker.due(now) {
            self.sentiment.widget.tick(&mut self.sentiment.rng);
        }

        // Detection times are derived from the poll instant so replays
        // stay reproducible.
        let wall = self.wall_clock(now);
        for _ in 0..self.anomalies.ticker.due(now) {
            self.anomalies.widget.tick(&mut self.anomalies.rng, wall);
        }

        for _ in 0..self.optimizer.ticker.due(now) {
            for id in self.optimizer.widget.tick(&mut self.optimizer.rng) {
                self.log
                    .record(ActivityKind::Optimizer, format!("auto-applied optimization {id}"));
            }
        }
    }

    /// Wall-clock time corresponding to a poll instant.
    pub fn wall_clock(&self, now: Instant) -> DateTime<Utc> {
        let elapsed = now.saturating_duration_since(self.started);
        self.started_at + chrono::Duration::from_std(elapsed).unwrap_or_default()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    // -- Campaign table --

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableState {
        &mut self.table
    }

    /// CSV of every row that passes the current filters, in display order.
    pub fn csv(&self) -> String {
        csv::to_csv(self.table.filtered())
    }

    pub fn export_file_name(&self) -> String {
        csv::export_file_name(&self.title)
    }

    /// Write the filtered rows to `dir` and log the export.
    pub fn export_csv(&self, dir: &Path) -> Result<PathBuf> {
        let rows: Vec<&Campaign> = self.table.filtered();
        let path = csv::write_export(dir, &self.title, rows.iter().copied())?;
        self.log.record(
            ActivityKind::Export,
            format!("{} rows to {}", rows.len(), path.display()),
        );
        Ok(path)
    }

    // -- KPI cards --

    pub fn metrics(&self) -> &[MetricSnapshot] {
        &self.metrics
    }

    pub fn metrics_source_name(&self) -> &str {
        self.metrics_source.name()
    }

    // -- Widgets --

    pub fn predictions(&self) -> &Predictions {
        &self.predictions.widget
    }

    pub fn sentiment(&self) -> &SentimentAnalyzer {
        &self.sentiment.widget
    }

    pub fn anomalies(&self) -> &AnomalyDetector {
        &self.anomalies.widget
    }

    pub fn optimizer(&self) -> &AutoOptimizer {
        &self.optimizer.widget
    }

    pub fn resolve_anomaly(&mut self, id: u64) -> Result<Anomaly> {
        let anomaly = self.anomalies.widget.resolve(id)?.clone();
        self.log
            .record(ActivityKind::Anomaly, format!("resolved anomaly {id} ({})", anomaly.metric));
        Ok(anomaly)
    }

    pub fn dismiss_anomaly(&mut self, id: u64) -> Result<Anomaly> {
        let anomaly = self.anomalies.widget.dismiss(id)?;
        self.log
            .record(ActivityKind::Anomaly, format!("dismissed anomaly {id} ({})", anomaly.metric));
        Ok(anomaly)
    }

    pub fn set_monitoring(&mut self, on: bool) {
        self.anomalies.widget.set_monitoring(on);
        let state = if on { "resumed" } else { "paused" };
        self.log
            .record(ActivityKind::Anomaly, format!("monitoring {state}"));
    }

    pub fn apply_optimization(&mut self, id: u64) -> Result<Optimization> {
        let opt = self.optimizer.widget.apply(id)?.clone();
        self.log.record(
            ActivityKind::Optimizer,
            format!("applied optimization {id} ({})", opt.campaign),
        );
        Ok(opt)
    }

    pub fn reject_optimization(&mut self, id: u64) -> Result<Optimization> {
        let opt = self.optimizer.widget.reject(id)?.clone();
        self.log.record(
            ActivityKind::Optimizer,
            format!("rejected optimization {id} ({})", opt.campaign),
        );
        Ok(opt)
    }

    pub fn set_auto_mode(&mut self, on: bool) {
        self.optimizer.widget.set_auto_mode(on);
        let state = if on { "on" } else { "off" };
        self.log
            .record(ActivityKind::Optimizer, format!("auto mode {state}"));
    }

    // -- Chat --

    pub fn conversation(&self) -> &Conversation {
        &self.chat
    }

    /// Pause the CLI applies before printing a reply.
    pub fn thinking_delay(&self) -> Duration {
        self.thinking_delay
    }

    /// Ask the assistant. Blank questions return `None` and are not logged.
    pub fn ask(&mut self, question: &str, now: Instant) -> Option<Message> {
        let at = self.wall_clock(now);
        let reply = self.chat.ask(question, at)?.clone();
        self.log.record(ActivityKind::Chat, question.trim());
        Some(reply)
    }

    // -- Theme --

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn set_theme(&mut self, preference: ThemePreference) -> Result<ThemeStyle> {
        let style = self.theme.set(preference)?;
        self.log
            .record(ActivityKind::Theme, preference.as_str());
        Ok(style)
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeStyle> {
        self.set_theme(self.theme.preference().toggled())
    }

    // -- Activity --

    pub fn activity(&self) -> &ActivityLog {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::MemoryStore;

    fn dashboard(seed: u64, now: Instant) -> Dashboard {
        let mut config = InsightsConfig::default();
        config.refresh.seed = Some(seed);
        Dashboard::new(&config, Box::new(MemoryStore::new()), ActivityLog::disabled(), now)
    }

    #[test]
    fn starts_from_seed_data() {
        let now = Instant::now();
        let dash = dashboard(1, now);
        assert_eq!(dash.seed(), 1);
        assert_eq!(dash.metrics()[0].current, 485_000.0);
        assert_eq!(dash.table().records().len(), 8);
        assert_eq!(dash.conversation().messages().len(), 1);
        assert_eq!(dash.metrics_source_name(), "simulated");
    }

    #[test]
    fn poll_before_first_interval_changes_nothing() {
        let now = Instant::now();
        let mut dash = dashboard(1, now);
        dash.poll(now + Duration::from_secs(4));
        assert_eq!(dash.metrics()[0].current, 485_000.0);
        assert_eq!(dash.predictions().revenue.predicted, 520_000.0);
    }

    #[test]
    fn wall_clock_tracks_poll_instant() {
        let now = Instant::now();
        let dash = dashboard(1, now);
        let later = dash.wall_clock(now + Duration::from_secs(90));
        assert_eq!((later - dash.started_at()).num_seconds(), 90);
    }

    #[test]
    fn csv_follows_filters() {
        let now = Instant::now();
        let mut dash = dashboard(1, now);
        dash.table_mut().set_query("no such campaign");
        let csv = dash.csv();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("name,platform,status"));
        assert_eq!(dash.export_file_name(), "campaign-performance-data.csv");
    }
}
