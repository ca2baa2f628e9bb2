/// Dashboard integration tests: seeded replay, theme persistence, the
/// activity log and the web API dispatch table.
use std::time::{Duration, Instant};

use brand_insights::activity::{ActivityKind, ActivityLog};
use brand_insights::config::InsightsConfig;
use brand_insights::dashboard::Dashboard;
use brand_insights::theme::{MemoryStore, PreferenceStore, Preferences, ThemePreference};
use brand_insights::web::{self, Reply};
use tiny_http::Method;

fn seeded_config(seed: u64) -> InsightsConfig {
    let mut config = InsightsConfig::default();
    config.refresh.seed = Some(seed);
    config
}

fn dashboard(seed: u64, now: Instant) -> Dashboard {
    Dashboard::new(
        &seeded_config(seed),
        Box::new(MemoryStore::new()),
        ActivityLog::disabled(),
        now,
    )
}

fn get(dash: &mut Dashboard, url: &str, now: Instant) -> Reply {
    web::dispatch(dash, &Method::Get, url, None, now).unwrap()
}

fn post(dash: &mut Dashboard, url: &str, body: Option<&str>, now: Instant) -> Reply {
    web::dispatch(dash, &Method::Post, url, body, now).unwrap()
}

fn json(reply: &Reply) -> serde_json::Value {
    serde_json::from_str(&reply.body).unwrap()
}

// ---------------------------------------------------------------------------
// Seeded replay
// ---------------------------------------------------------------------------

#[test]
fn same_seed_and_polls_give_same_state() {
    let start = Instant::now();
    let mut a = dashboard(42, start);
    let mut b = dashboard(42, start);

    for minute in 1..=10u64 {
        let at = start + Duration::from_secs(minute * 60);
        a.poll(at);
        b.poll(at);
    }

    assert_eq!(a.metrics(), b.metrics());
    assert_eq!(a.predictions().revenue, b.predictions().revenue);
    assert_eq!(
        serde_json::to_value(a.sentiment()).unwrap(),
        serde_json::to_value(b.sentiment()).unwrap()
    );
    assert_eq!(
        a.anomalies().anomalies.len(),
        b.anomalies().anomalies.len()
    );
}

#[test]
fn metrics_move_after_refresh_interval() {
    let start = Instant::now();
    let config = seeded_config(7);
    let mut dash = dashboard(7, start);
    let initial = dash.metrics().to_vec();

    dash.poll(start + config.refresh.metrics_interval() * 3 + Duration::from_secs(1));
    assert_eq!(dash.metrics().len(), initial.len());
    assert_ne!(dash.metrics(), initial.as_slice());
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[test]
fn stored_theme_wins_over_configured_default() {
    let store = MemoryStore::with(Preferences {
        theme: Some(ThemePreference::Dark),
    });
    let dash = Dashboard::new(
        &seeded_config(1),
        Box::new(store),
        ActivityLog::disabled(),
        Instant::now(),
    );
    assert_eq!(dash.theme().preference(), ThemePreference::Dark);
    assert_eq!(dash.theme().style().root_class, "dark");
}

#[test]
fn toggling_theme_persists_choice() {
    let mut dash = dashboard(1, Instant::now());
    let before = dash.theme().preference();

    let style = dash.toggle_theme().unwrap();
    assert_eq!(style.preference, before.toggled());
    assert_eq!(
        dash.theme().store().load().unwrap().theme,
        Some(before.toggled())
    );
}

// ---------------------------------------------------------------------------
// Activity log
// ---------------------------------------------------------------------------

#[test]
fn actions_are_recorded_in_activity_log() {
    let dir = tempfile::tempdir().unwrap();
    let log = ActivityLog::new(dir.path().join("activity.jsonl"), true);
    let now = Instant::now();
    let mut dash = Dashboard::new(&seeded_config(3), Box::new(MemoryStore::new()), log, now);

    dash.ask("what are my top campaigns?", now).unwrap();
    assert!(dash.ask("   ", now).is_none());
    dash.set_theme(ThemePreference::Dark).unwrap();
    dash.apply_optimization(1).unwrap();
    dash.export_csv(dir.path()).unwrap();

    let events = dash.activity().read_all();
    let kinds: Vec<ActivityKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [
            ActivityKind::Chat,
            ActivityKind::Theme,
            ActivityKind::Optimizer,
            ActivityKind::Export,
        ]
    );
    assert_eq!(events[0].detail, "what are my top campaigns?");
    assert_eq!(dash.activity().read_recent(1).len(), 1);
}

// ---------------------------------------------------------------------------
// Web API
// ---------------------------------------------------------------------------

#[test]
fn index_serves_embedded_frontend() {
    let now = Instant::now();
    let mut dash = dashboard(1, now);
    let reply = get(&mut dash, "/", now);
    assert_eq!(reply.status, 200);
    assert!(reply.content_type.starts_with("text/html"));
    assert!(reply.body.contains("<!DOCTYPE html>"));
}

#[test]
fn campaigns_endpoint_applies_query() {
    let now = Instant::now();
    let mut dash = dashboard(1, now);
    let reply = get(
        &mut dash,
        "/api/campaigns?platform=Google%20Ads&status=active&sort=budget&dir=desc",
        now,
    );
    assert_eq!(reply.status, 200);

    let body = json(&reply);
    assert_eq!(body["meta"]["filtered_count"], 2);
    assert_eq!(body["rows"][0]["record"]["name"], "New Year");
    assert_eq!(body["summary"], "Showing 1 to 2 of 2 results");
}

#[test]
fn campaigns_endpoint_rejects_unknown_sort_column() {
    let now = Instant::now();
    let mut dash = dashboard(1, now);
    let reply = get(&mut dash, "/api/campaigns?sort=colour", now);
    assert_eq!(reply.status, 400);
    assert!(json(&reply)["error"].is_string());
}

#[test]
fn export_endpoint_returns_named_attachment() {
    let now = Instant::now();
    let mut dash = dashboard(1, now);
    let reply = get(&mut dash, "/api/campaigns/export?platform=Google+Ads", now);
    assert_eq!(reply.status, 200);
    assert_eq!(
        reply.attachment.as_deref(),
        Some("campaign-performance-data.csv")
    );
    assert_eq!(reply.body.lines().count(), 5);
}

#[test]
fn widget_actions_report_missing_ids() {
    let now = Instant::now();
    let mut dash = dashboard(1, now);

    assert_eq!(post(&mut dash, "/api/anomalies/999/resolve", None, now).status, 404);
    assert_eq!(post(&mut dash, "/api/anomalies/abc/resolve", None, now).status, 400);
    assert_eq!(post(&mut dash, "/api/optimizations/999/apply", None, now).status, 404);

    let reply = post(&mut dash, "/api/optimizations/2/reject", None, now);
    assert_eq!(reply.status, 200);
    assert_eq!(json(&reply)["status"], "rejected");
}

#[test]
fn empty_switch_body_flips_current_state() {
    let now = Instant::now();
    let mut dash = dashboard(1, now);
    assert!(dash.anomalies().monitoring);
    assert!(!dash.optimizer().auto_mode);

    let reply = post(&mut dash, "/api/anomalies/monitoring", None, now);
    assert_eq!(json(&reply)["monitoring"], false);
    let reply = post(&mut dash, "/api/anomalies/monitoring", None, now);
    assert_eq!(json(&reply)["monitoring"], true);

    let reply = post(&mut dash, "/api/optimizations/auto", None, now);
    assert_eq!(json(&reply)["auto_mode"], true);
    let reply = post(&mut dash, "/api/optimizations/auto", Some(r#"{"enabled": false}"#), now);
    assert_eq!(json(&reply)["auto_mode"], false);
    assert!(!dash.optimizer().auto_mode);
}

#[test]
fn chat_endpoint_answers_from_keywords() {
    let now = Instant::now();
    let mut dash = dashboard(1, now);
    let reply = post(
        &mut dash,
        "/api/chat",
        Some(r#"{"message": "Predict next month's revenue"}"#),
        now,
    );
    assert_eq!(reply.status, 200);
    assert!(reply.body.contains("prediction"));
    assert_eq!(dash.conversation().messages().len(), 3);
}

#[test]
fn unknown_route_is_not_found() {
    let now = Instant::now();
    let mut dash = dashboard(1, now);
    assert_eq!(get(&mut dash, "/api/nope", now).status, 404);
    assert_eq!(
        web::dispatch(&mut dash, &Method::Delete, "/api/campaigns", None, now)
            .unwrap()
            .status,
        404
    );
}
