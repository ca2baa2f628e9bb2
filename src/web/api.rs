//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a [`Reply`].
//! Invalid input is answered with a 400 reply rather than an `Err`, which
//! the server reserves for internal failures.

use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::assistant::Message;
use crate::campaign::{Campaign, CampaignField};
use crate::config;
use crate::dashboard::Dashboard;
use crate::format;
use crate::insights::anomalies::{Anomaly, DetectionStats, SeriesPoint};
use crate::insights::optimizer::Optimization;
use crate::insights::predictions::{ForecastPoint, Predictions};
use crate::insights::sentiment::{Feedback, SentimentAnalyzer};
use crate::metrics::MetricSnapshot;
use crate::table::{FilterOption, PageMeta, SortState, TableQuery};
use crate::theme::{ThemePreference, ThemeStyle};

use super::Reply;

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Column {
    key: &'static str,
    label: String,
}

#[derive(Serialize)]
struct CampaignRow<'a> {
    record: &'a Campaign,
    /// Display strings in column order.
    cells: Vec<String>,
}

#[derive(Serialize)]
struct CampaignsResponse<'a> {
    title: &'a str,
    columns: Vec<Column>,
    rows: Vec<CampaignRow<'a>>,
    meta: PageMeta,
    sort: SortState,
    summary: String,
    statuses: Vec<FilterOption>,
    platforms: Vec<FilterOption>,
    status_label: String,
    platform_label: String,
    active_filters: usize,
}

#[derive(Serialize)]
struct MetricCard<'a> {
    #[serde(flatten)]
    snapshot: &'a MetricSnapshot,
    display_value: String,
    display_change: String,
}

#[derive(Serialize)]
struct MetricsResponse<'a> {
    source: &'a str,
    metrics: Vec<MetricCard<'a>>,
}

#[derive(Serialize)]
struct PredictionsResponse<'a> {
    #[serde(flatten)]
    predictions: &'a Predictions,
    forecast: Vec<ForecastPoint>,
}

#[derive(Serialize)]
struct FeedbackItem<'a> {
    #[serde(flatten)]
    feedback: &'a Feedback,
    age: String,
}

#[derive(Serialize)]
struct SentimentResponse<'a> {
    scores: &'a crate::insights::sentiment::SentimentScores,
    feedback: Vec<FeedbackItem<'a>>,
    trend: &'a [crate::insights::sentiment::DailySentiment],
}

#[derive(Serialize)]
struct AnomalyItem<'a> {
    #[serde(flatten)]
    anomaly: &'a Anomaly,
    age: String,
}

#[derive(Serialize)]
struct AnomaliesResponse<'a> {
    monitoring: bool,
    stats: DetectionStats,
    anomalies: Vec<AnomalyItem<'a>>,
    series: Vec<SeriesPoint>,
}

#[derive(Serialize)]
struct OptimizationItem<'a> {
    #[serde(flatten)]
    optimization: &'a Optimization,
    current_label: String,
    suggested_label: String,
}

#[derive(Serialize)]
struct OptimizationsResponse<'a> {
    auto_mode: bool,
    applied: usize,
    pending: usize,
    optimizations: Vec<OptimizationItem<'a>>,
}

#[derive(Serialize)]
struct ChatResponse<'a> {
    reply: Option<Message>,
    messages: &'a [Message],
}

#[derive(Serialize)]
struct ConfigResponse {
    config: config::InsightsConfig,
    toml_text: String,
}

#[derive(Serialize)]
struct HealthResponse {
    seed: u64,
    metrics_source: String,
    uptime_secs: u64,
    config_exists: bool,
    preference_store: String,
    activity_log: Option<String>,
    activity_log_enabled: bool,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// `{"enabled": true}`; an empty body or missing field toggles.
#[derive(Deserialize, Default)]
struct SwitchRequest {
    enabled: Option<bool>,
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Deserialize)]
struct ThemeRequest {
    preference: Option<String>,
    #[serde(default)]
    toggle: bool,
}

#[derive(Deserialize)]
struct ConfigUpdateRequest {
    updates: Vec<ConfigKeyValue>,
}

#[derive(Deserialize)]
struct ConfigKeyValue {
    key: String,
    value: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success reply.
fn json_response<T: Serialize>(data: &T) -> Result<Reply> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Reply::json(200, body))
}

fn parse_body<'a, T: Deserialize<'a>>(body: Option<&'a str>, what: &str) -> Result<T> {
    serde_json::from_str(body.unwrap_or_default())
        .with_context(|| format!("invalid JSON in {what} request"))
}

/// Parse an optional switch body; blank means toggle.
fn parse_switch(body: Option<&str>) -> Result<SwitchRequest> {
    match body.map(str::trim) {
        None | Some("") => Ok(SwitchRequest::default()),
        Some(raw) => parse_body(Some(raw), "switch"),
    }
}

/// Decode the query string of `url` into `(key, value)` pairs.
///
/// `+` becomes a space and `%XX` escapes are decoded; malformed escapes are
/// kept verbatim.
pub fn query_pairs(url: &str) -> Vec<(String, String)> {
    let Some((_, query)) = url.split_once('?') else {
        return Vec::new();
    };
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(k), percent_decode(v))
        })
        .collect()
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push((hex_value(bytes[i + 1]) << 4) | hex_value(bytes[i + 2]));
                i += 3;
                continue;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Value of one ASCII hex digit.
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

fn parse_query(url: &str) -> Result<TableQuery> {
    let pairs = query_pairs(url);
    TableQuery::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

/// `GET /api/campaigns?search=&status=&platform=&from=&to=&sort=&dir=&page=`
pub fn get_campaigns(dash: &mut Dashboard, url: &str) -> Result<Reply> {
    let query = match parse_query(url) {
        Ok(q) => q,
        Err(e) => return Ok(Reply::bad_request(&e)),
    };
    if let Err(e) = query.apply(dash.table_mut()) {
        return Ok(Reply::bad_request(&e));
    }

    let table = dash.table();
    let page = table.view();
    let selected_statuses: Vec<String> =
        table.filters.statuses.iter().map(|s| s.as_str().to_string()).collect();
    let selected_platforms: Vec<String> = table.filters.platforms.iter().cloned().collect();

    let resp = CampaignsResponse {
        title: dash.title(),
        columns: CampaignField::ALL
            .iter()
            .map(|f| Column {
                key: f.key(),
                label: f.label(),
            })
            .collect(),
        rows: page
            .rows
            .iter()
            .map(|&record| CampaignRow {
                record,
                cells: record
                    .fields()
                    .map(|(field, value)| format::format_cell(field, value))
                    .collect(),
            })
            .collect(),
        meta: page.meta,
        sort: table.sort,
        summary: page.meta.summary(),
        statuses: table.status_options(),
        platforms: table.platform_options(),
        status_label: format::selection_label("All Status", &selected_statuses),
        platform_label: format::selection_label("All Platforms", &selected_platforms),
        active_filters: table.filters.active_count(),
    };

    json_response(&resp)
}

/// `GET /api/campaigns/export?…` — the filtered rows as a CSV download.
pub fn get_campaigns_export(dash: &mut Dashboard, url: &str) -> Result<Reply> {
    let query = match parse_query(url) {
        Ok(q) => q,
        Err(e) => return Ok(Reply::bad_request(&e)),
    };
    if let Err(e) = query.apply(dash.table_mut()) {
        return Ok(Reply::bad_request(&e));
    }

    let file_name = dash.export_file_name();
    let rows = dash.table().filtered().len();
    dash.activity().record(
        crate::activity::ActivityKind::Export,
        format!("{rows} rows as {file_name} (web)"),
    );
    Ok(Reply::csv(dash.csv(), &file_name))
}

// ---------------------------------------------------------------------------
// KPI cards and widgets
// ---------------------------------------------------------------------------

/// `GET /api/metrics`
pub fn get_metrics(dash: &Dashboard) -> Result<Reply> {
    let resp = MetricsResponse {
        source: dash.metrics_source_name(),
        metrics: dash
            .metrics()
            .iter()
            .map(|snapshot| MetricCard {
                snapshot,
                display_value: snapshot.display_value(),
                display_change: snapshot.display_change(),
            })
            .collect(),
    };
    json_response(&resp)
}

/// `GET /api/predictions`
pub fn get_predictions(dash: &Dashboard) -> Result<Reply> {
    let predictions = dash.predictions();
    json_response(&PredictionsResponse {
        predictions,
        forecast: predictions.forecast(),
    })
}

/// `GET /api/sentiment`
pub fn get_sentiment(dash: &Dashboard) -> Result<Reply> {
    let analyzer: &SentimentAnalyzer = dash.sentiment();
    json_response(&SentimentResponse {
        scores: &analyzer.scores,
        feedback: analyzer
            .feedback
            .iter()
            .map(|feedback| FeedbackItem {
                feedback,
                age: feedback.age_label(),
            })
            .collect(),
        trend: &analyzer.trend,
    })
}

/// `GET /api/anomalies`
pub fn get_anomalies(dash: &Dashboard, now: Instant) -> Result<Reply> {
    let detector = dash.anomalies();
    let wall = dash.wall_clock(now);
    json_response(&AnomaliesResponse {
        monitoring: detector.monitoring,
        stats: detector.stats(),
        anomalies: detector
            .anomalies
            .iter()
            .map(|anomaly| AnomalyItem {
                anomaly,
                age: format::format_relative(anomaly.detected_at, wall),
            })
            .collect(),
        series: detector.series(),
    })
}

/// `POST /api/anomalies/{id}/resolve`
pub fn post_anomaly_resolve(dash: &mut Dashboard, id: u64) -> Result<Reply> {
    match dash.resolve_anomaly(id) {
        Ok(anomaly) => json_response(&anomaly),
        Err(e) => Ok(Reply::not_found(&e)),
    }
}

/// `POST /api/anomalies/{id}/dismiss`
pub fn post_anomaly_dismiss(dash: &mut Dashboard, id: u64) -> Result<Reply> {
    match dash.dismiss_anomaly(id) {
        Ok(anomaly) => json_response(&anomaly),
        Err(e) => Ok(Reply::not_found(&e)),
    }
}

/// `POST /api/anomalies/monitoring` — body `{"enabled": bool}` or empty to
/// toggle.
pub fn post_monitoring(dash: &mut Dashboard, body: Option<&str>) -> Result<Reply> {
    let req = match parse_switch(body) {
        Ok(r) => r,
        Err(e) => return Ok(Reply::bad_request(&e)),
    };
    let on = req.enabled.unwrap_or(!dash.anomalies().monitoring);
    dash.set_monitoring(on);
    json_response(&serde_json::json!({ "monitoring": on }))
}

/// `GET /api/optimizations`
pub fn get_optimizations(dash: &Dashboard) -> Result<Reply> {
    let optimizer = dash.optimizer();
    json_response(&OptimizationsResponse {
        auto_mode: optimizer.auto_mode,
        applied: optimizer.applied_count(),
        pending: optimizer.pending_count(),
        optimizations: optimizer
            .optimizations
            .iter()
            .map(|optimization| OptimizationItem {
                optimization,
                current_label: optimization.current.to_string(),
                suggested_label: optimization.suggested.to_string(),
            })
            .collect(),
    })
}

/// `POST /api/optimizations/{id}/apply`
pub fn post_optimization_apply(dash: &mut Dashboard, id: u64) -> Result<Reply> {
    match dash.apply_optimization(id) {
        Ok(opt) => json_response(&opt),
        Err(e) => Ok(Reply::not_found(&e)),
    }
}

/// `POST /api/optimizations/{id}/reject`
pub fn post_optimization_reject(dash: &mut Dashboard, id: u64) -> Result<Reply> {
    match dash.reject_optimization(id) {
        Ok(opt) => json_response(&opt),
        Err(e) => Ok(Reply::not_found(&e)),
    }
}

/// `POST /api/optimizations/auto` — body `{"enabled": bool}` or empty to
/// toggle.
pub fn post_auto_mode(dash: &mut Dashboard, body: Option<&str>) -> Result<Reply> {
    let req = match parse_switch(body) {
        Ok(r) => r,
        Err(e) => return Ok(Reply::bad_request(&e)),
    };
    let on = req.enabled.unwrap_or(!dash.optimizer().auto_mode);
    dash.set_auto_mode(on);
    json_response(&serde_json::json!({ "auto_mode": on }))
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// `GET /api/chat` — the conversation so far.
pub fn get_chat(dash: &Dashboard) -> Result<Reply> {
    json_response(&ChatResponse {
        reply: None,
        messages: dash.conversation().messages(),
    })
}

/// `POST /api/chat` — body `{"message": "..."}`. A blank message gets a
/// `null` reply.
pub fn post_chat(dash: &mut Dashboard, body: Option<&str>, now: Instant) -> Result<Reply> {
    let req: ChatRequest = match parse_body(body, "chat") {
        Ok(r) => r,
        Err(e) => return Ok(Reply::bad_request(&e)),
    };
    let reply = dash.ask(&req.message, now);
    json_response(&ChatResponse {
        reply,
        messages: dash.conversation().messages(),
    })
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// `GET /api/theme`
pub fn get_theme(dash: &Dashboard) -> Result<Reply> {
    json_response(&dash.theme().style())
}

/// `PUT /api/theme` — body `{"preference": "dark"}` or `{"toggle": true}`.
pub fn put_theme(dash: &mut Dashboard, body: Option<&str>) -> Result<Reply> {
    let req: ThemeRequest = match parse_body(body, "theme") {
        Ok(r) => r,
        Err(e) => return Ok(Reply::bad_request(&e)),
    };

    let style: ThemeStyle = if req.toggle {
        dash.toggle_theme()?
    } else {
        let Some(raw) = req.preference else {
            return Ok(Reply::bad_request(&anyhow::anyhow!(
                "expected \"preference\" or \"toggle\""
            )));
        };
        let preference: ThemePreference = match raw.parse() {
            Ok(p) => p,
            Err(e) => return Ok(Reply::bad_request(&e)),
        };
        dash.set_theme(preference)?
    };
    json_response(&style)
}

// ---------------------------------------------------------------------------
// Config and health
// ---------------------------------------------------------------------------

/// `GET /api/config` — current effective configuration.
pub fn get_config() -> Result<Reply> {
    let cfg = config::load();
    let toml_text = toml::to_string_pretty(&cfg).unwrap_or_default();
    json_response(&ConfigResponse {
        config: cfg,
        toml_text,
    })
}

/// `PUT /api/config` — update keys in the global config file. Takes effect
/// on the next start.
///
/// Expects JSON body: `{ "updates": [{ "key": "general.page_size", "value": "10" }] }`
pub fn put_config(body: Option<&str>) -> Result<Reply> {
    let req: ConfigUpdateRequest = match parse_body(body, "config update") {
        Ok(r) => r,
        Err(e) => return Ok(Reply::bad_request(&e)),
    };

    let mut errors: Vec<String> = Vec::new();
    let mut applied: Vec<String> = Vec::new();

    for kv in &req.updates {
        match config::set_config_value(&kv.key, &kv.value) {
            Ok(_) => applied.push(format!("{} = {}", kv.key, kv.value)),
            Err(e) => errors.push(format!("{}: {e:#}", kv.key)),
        }
    }

    json_response(&serde_json::json!({
        "applied": applied,
        "errors": errors,
        "success": errors.is_empty(),
    }))
}

/// `GET /api/health`
pub fn get_health(dash: &Dashboard, now: Instant) -> Result<Reply> {
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let uptime = (dash.wall_clock(now) - dash.started_at()).num_seconds().max(0) as u64;

    json_response(&HealthResponse {
        seed: dash.seed(),
        metrics_source: dash.metrics_source_name().to_string(),
        uptime_secs: uptime,
        config_exists,
        preference_store: dash.theme().store().describe(),
        activity_log: dash.activity().path().map(|p| p.display().to_string()),
        activity_log_enabled: dash.activity().is_enabled(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_decode() {
        let pairs = query_pairs("/api/campaigns?platform=Google+Ads&search=black%20friday&status=active&status=paused");
        assert_eq!(
            pairs,
            vec![
                ("platform".to_string(), "Google Ads".to_string()),
                ("search".to_string(), "black friday".to_string()),
                ("status".to_string(), "active".to_string()),
                ("status".to_string(), "paused".to_string()),
            ]
        );
    }

    #[test]
    fn query_pairs_handle_edge_cases() {
        assert!(query_pairs("/api/campaigns").is_empty());
        assert_eq!(
            query_pairs("/x?flag&a=%zz&b=100%"),
            vec![
                ("flag".to_string(), String::new()),
                ("a".to_string(), "%zz".to_string()),
                ("b".to_string(), "100%".to_string()),
            ]
        );
        assert_eq!(query_pairs("/x?q=caf%C3%A9")[0].1, "café");
    }

    #[test]
    fn signed_escapes_stay_literal() {
        assert_eq!(query_pairs("/x?q=%+1")[0].1, "% 1");
        assert_eq!(query_pairs("/x?q=%-1")[0].1, "%-1");
        assert_eq!(query_pairs("/x?q=%2b%2B")[0].1, "++");
    }

    #[test]
    fn switch_body_defaults_to_toggle() {
        assert_eq!(parse_switch(None).unwrap().enabled, None);
        assert_eq!(parse_switch(Some("  ")).unwrap().enabled, None);
        assert_eq!(parse_switch(Some(r#"{"enabled":false}"#)).unwrap().enabled, Some(false));
        assert!(parse_switch(Some("nope")).is_err());
    }
}
