// Handlers: usage page, badge JSON, sparkline SVG, throttled update

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::badge;
use crate::models::UpdateResponse;
use crate::sparkline;
use crate::update_service::UpdateError;
use crate::version::{NAME, VERSION};

/// GET / — usage page listing the endpoints.
pub(super) async fn index_handler() -> impl IntoResponse {
    Html(
        r#"<html>
<head><title>Download Counter Service</title></head>
<body>
    <h1>Download Counter Service</h1>
    <h2>Available Endpoints:</h2>
    <ul>
        <li><strong>GET /api/&lt;plugin_id&gt;</strong> - Latest download count as JSON (shields.io endpoint schema)</li>
        <li><strong>GET /sparkline/&lt;plugin_id&gt;</strong> - Download history as an SVG sparkline (optional ?days=30)</li>
        <li><strong>POST /update/&lt;plugin_id&gt;</strong> - Refresh the count from the catalogue (throttled)</li>
    </ul>
    <h2>Badge (via shields.io):</h2>
    <pre>https://img.shields.io/endpoint?url=&lt;this host&gt;/api/&lt;plugin_id&gt;</pre>
    <h2>Sparkline embed:</h2>
    <pre>&lt;img src="&lt;this host&gt;/sparkline/&lt;plugin_id&gt;?days=30"&gt;</pre>
    <h2>Trigger an update:</h2>
    <pre>curl -X POST &lt;this host&gt;/update/&lt;plugin_id&gt;</pre>
</body>
</html>"#,
    )
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /health — liveness probe.
pub(super) async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/{plugin_id} — latest count in the shields.io endpoint schema.
/// A plugin with no stored samples gets the "no data" payload; a store
/// failure gets the "error" payload with a 500 so the badge still renders.
pub(super) async fn badge_handler(
    State(state): State<AppState>,
    Path(plugin_id): Path<String>,
) -> impl IntoResponse {
    match state.downloads_repo.latest(&plugin_id).await {
        Ok(latest) => {
            let payload = badge::format_badge(latest.map(|s| s.count), &state.config.badge);
            (StatusCode::OK, axum::Json(payload))
        }
        Err(e) => {
            tracing::error!(error = %e, plugin_id, "badge lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(badge::error_badge(&state.config.badge)),
            )
        }
    }
}

#[derive(Deserialize)]
pub(super) struct SparklineQuery {
    days: Option<String>,
}

/// GET /sparkline/{plugin_id}?days=N — history rendered as an SVG sparkline.
/// days defaults from config and is clamped to 1..=365; a non-numeric value
/// falls back to the default. An empty history renders the flat baseline
/// rather than a 404, so embedded images never break.
pub(super) async fn sparkline_handler(
    State(state): State<AppState>,
    Path(plugin_id): Path<String>,
    Query(query): Query<SparklineQuery>,
) -> impl IntoResponse {
    let default_days = state.config.sparkline.default_days;
    let days = query
        .days
        .map_or(default_days as i64, |d| parse_days(&d, default_days))
        .clamp(1, sparkline::MAX_DAYS as i64) as u32;

    match state.downloads_repo.history(&plugin_id, days).await {
        Ok(samples) => {
            let svg = sparkline::render_sparkline(&samples, &state.config.sparkline);
            svg_response(StatusCode::OK, svg)
        }
        Err(e) => {
            tracing::error!(error = %e, plugin_id, "sparkline history lookup failed");
            svg_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                sparkline::render_flat(&state.config.sparkline),
            )
        }
    }
}

/// Numeric values keep their sign and magnitude for the clamp, saturating
/// when they overflow i64; non-numeric values fall back to the default.
fn parse_days(raw: &str, default: u32) -> i64 {
    if let Ok(days) = raw.parse::<i64>() {
        return days;
    }
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if raw.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    } else {
        default as i64
    }
}

fn svg_response(
    status: StatusCode,
    svg: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    (status, [(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

/// POST /update/{plugin_id} — throttled refresh from the catalogue.
/// 200 with the stored sample on success; 429 echoing last_fetched when the
/// throttle window has not elapsed; 502/500 for fetch/storage failures.
pub(super) async fn update_handler(
    State(state): State<AppState>,
    Path(plugin_id): Path<String>,
) -> Response {
    match state.update_service.update(&plugin_id).await {
        Ok(sample) => (
            StatusCode::OK,
            axum::Json(UpdateResponse {
                success: true,
                plugin_id: sample.plugin_id,
                count: sample.count,
                timestamp: sample.timestamp,
            }),
        )
            .into_response(),
        Err(UpdateError::Throttled { last_fetched }) => (
            StatusCode::TOO_MANY_REQUESTS,
            axum::Json(serde_json::json!({
                "error": "Too many requests",
                "message": format!(
                    "Plugin was last updated at {}. Updates are throttled to once per {} hours.",
                    last_fetched, state.config.throttle.hours
                ),
                "last_fetched": last_fetched,
            })),
        )
            .into_response(),
        Err(UpdateError::Fetch(e)) => {
            tracing::error!(error = %e, plugin_id, "catalogue fetch failed");
            (
                StatusCode::BAD_GATEWAY,
                axum::Json(serde_json::json!({
                    "error": "Fetch error",
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
        Err(UpdateError::Storage(e)) => {
            tracing::error!(error = %e, plugin_id, "update write failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(serde_json::json!({
                    "error": "Internal server error",
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
