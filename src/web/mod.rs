//! Embedded web dashboard.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page campaign dashboard
//! - JSON API endpoints for the table, KPI cards, widgets, chat and theme
//!
//! Launched via `insights serve` (default: `http://127.0.0.1:9747`).

pub mod api;
mod frontend;

use std::io::Cursor;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::activity::ActivityKind;
use crate::dashboard::Dashboard;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Requests are handled one at a time against
/// the single dashboard state; a failing request gets a JSON error and the
/// loop carries on.
pub fn serve(dash: &mut Dashboard, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!(
        "{} running at {}",
        "insights dashboard".bold().cyan(),
        format!("http://{addr}").underline()
    );
    println!("Press Ctrl+C to stop.\n");
    dash.activity()
        .record(ActivityKind::Server, format!("listening on {addr}"));

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let reply = dispatch(dash, &method, &url, body.as_deref(), Instant::now())
            .unwrap_or_else(|e| Reply::error(500, &e));
        let status = reply.status;
        let _ = request.respond(reply.into_response());

        // Brief access log
        let status_text = if status < 400 {
            status.to_string().green()
        } else {
            status.to_string().red()
        };
        println!(
            "{} {} {} {}",
            method,
            url,
            status_text,
            chrono::Local::now().format("%H:%M:%S").to_string().dimmed()
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch a request to its handler after advancing the dashboard to
/// `now`.
pub fn dispatch(
    dash: &mut Dashboard,
    method: &Method,
    url: &str,
    body: Option<&str>,
    now: Instant,
) -> Result<Reply> {
    dash.poll(now);

    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        // Frontend
        (&Method::Get, [""]) | (&Method::Get, ["index.html"]) => Ok(Reply::html(frontend::INDEX_HTML)),

        // API — Campaign table
        (&Method::Get, ["api", "campaigns"]) => api::get_campaigns(dash, url),
        (&Method::Get, ["api", "campaigns", "export"]) => api::get_campaigns_export(dash, url),

        // API — KPI cards and widgets
        (&Method::Get, ["api", "metrics"]) => api::get_metrics(dash),
        (&Method::Get, ["api", "predictions"]) => api::get_predictions(dash),
        (&Method::Get, ["api", "sentiment"]) => api::get_sentiment(dash),
        (&Method::Get, ["api", "anomalies"]) => api::get_anomalies(dash, now),
        (&Method::Post, ["api", "anomalies", "monitoring"]) => api::post_monitoring(dash, body),
        (&Method::Post, ["api", "anomalies", id, action]) => {
            let Some(id) = parse_id(id) else {
                return Ok(Reply::error(400, &anyhow::anyhow!("invalid anomaly id '{id}'")));
            };
            match *action {
                "resolve" => api::post_anomaly_resolve(dash, id),
                "dismiss" => api::post_anomaly_dismiss(dash, id),
                _ => Ok(not_found()),
            }
        }
        (&Method::Get, ["api", "optimizations"]) => api::get_optimizations(dash),
        (&Method::Post, ["api", "optimizations", "auto"]) => api::post_auto_mode(dash, body),
        (&Method::Post, ["api", "optimizations", id, action]) => {
            let Some(id) = parse_id(id) else {
                return Ok(Reply::error(400, &anyhow::anyhow!("invalid optimization id '{id}'")));
            };
            match *action {
                "apply" => api::post_optimization_apply(dash, id),
                "reject" => api::post_optimization_reject(dash, id),
                _ => Ok(not_found()),
            }
        }

        // API — Chat
        (&Method::Get, ["api", "chat"]) => api::get_chat(dash),
        (&Method::Post, ["api", "chat"]) => api::post_chat(dash, body, now),

        // API — Theme
        (&Method::Get, ["api", "theme"]) => api::get_theme(dash),
        (&Method::Put, ["api", "theme"]) => api::put_theme(dash, body),

        // API — Configuration
        (&Method::Get, ["api", "config"]) => api::get_config(),
        (&Method::Put, ["api", "config"]) => api::put_config(body),

        // API — Health
        (&Method::Get, ["api", "health"]) => api::get_health(dash, now),

        // 404
        _ => Ok(not_found()),
    }
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// A response before it is handed to `tiny_http`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Suggested download name (`Content-Disposition: attachment`).
    pub attachment: Option<String>,
}

impl Reply {
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json; charset=utf-8",
            body,
            attachment: None,
        }
    }

    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.to_string(),
            attachment: None,
        }
    }

    pub fn csv(body: String, file_name: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/csv; charset=utf-8",
            body,
            attachment: Some(file_name.to_string()),
        }
    }

    /// `{"error": "..."}` with the full context chain.
    pub fn error(status: u16, err: &anyhow::Error) -> Self {
        let body = serde_json::json!({ "error": format!("{err:#}") }).to_string();
        Self::json(status, body)
    }

    pub fn bad_request(err: &anyhow::Error) -> Self {
        Self::error(400, err)
    }

    pub fn not_found(err: &anyhow::Error) -> Self {
        Self::error(404, err)
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let mut resp = Response::from_data(self.body.into_bytes())
            .with_status_code(StatusCode(self.status));
        if let Ok(header) = header("Content-Type", self.content_type) {
            resp.add_header(header);
        }
        if let Some(name) = self.attachment
            && let Ok(header) =
                header("Content-Disposition", &format!("attachment; filename=\"{name}\""))
        {
            resp.add_header(header);
        }
        resp
    }
}

/// 404 reply for unknown routes.
fn not_found() -> Reply {
    Reply::json(404, r#"{"error": "not found"}"#.to_string())
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name, value).map_err(|()| anyhow::anyhow!("invalid header {name}"))
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
