// Sparkline SVG rendering.
//
// The x axis spreads samples proportionally to elapsed time, so gaps in the
// series show up as uneven spacing instead of being flattened to equal steps.
// The y axis is min-max normalized over the visible window. Degenerate inputs
// (no samples, a single sample, constant counts, zero time span) render a
// flat mid-height baseline instead of failing.

use crate::config::SparklineConfig;
use crate::models::Sample;

/// Upper bound for the `days` query parameter.
pub const MAX_DAYS: u32 = 365;

/// Vertical padding fraction keeping the stroke inside the viewport.
const VERTICAL_PADDING_FRACTION: f64 = 0.1;

/// Renders `samples` (ascending by timestamp) as a standalone SVG document.
/// Output is deterministic for a given input: coordinates are formatted with
/// two decimal places and no timestamps or randomness leak into the markup.
pub fn render_sparkline(samples: &[Sample], config: &SparklineConfig) -> String {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return render_flat(config);
    };

    let min = samples.iter().map(|s| s.count).min().unwrap_or(0);
    let max = samples.iter().map(|s| s.count).max().unwrap_or(0);
    let span_ms = last.timestamp.timestamp_millis() - first.timestamp.timestamp_millis();
    if min == max || span_ms <= 0 {
        return render_flat(config);
    }

    let width = config.width as f64;
    let height = config.height as f64;
    let padding = height * VERTICAL_PADDING_FRACTION;
    let usable_height = height - 2.0 * padding;
    let first_ms = first.timestamp.timestamp_millis();

    let points: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| {
            let elapsed = (s.timestamp.timestamp_millis() - first_ms) as f64;
            let x = elapsed / span_ms as f64 * width;
            let normalized = (s.count - min) as f64 / (max - min) as f64;
            let y = height - padding - normalized * usable_height;
            (x, y)
        })
        .collect();

    render_svg(&points, config)
}

/// Flat mid-height baseline: the rendering for empty and constant series.
pub fn render_flat(config: &SparklineConfig) -> String {
    let mid = config.height as f64 / 2.0;
    let points = [(0.0, mid), (config.width as f64, mid)];
    render_svg(&points, config)
}

fn render_svg(points: &[(f64, f64)], config: &SparklineConfig) -> String {
    let width = config.width;
    let height = config.height;
    let color = &config.color;

    let polyline = format_points(points);

    // Area fill closes down to the bottom corners under the line.
    let mut area_points = Vec::with_capacity(points.len() + 2);
    area_points.push((0.0, height as f64));
    area_points.extend_from_slice(points);
    area_points.push((width as f64, height as f64));
    let area = format_points(&area_points);

    format!(
        r##"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
    <defs>
        <linearGradient id="gradient" x1="0%" y1="0%" x2="0%" y2="100%">
            <stop offset="0%" style="stop-color:{color};stop-opacity:0.3" />
            <stop offset="100%" style="stop-color:{color};stop-opacity:0.05" />
        </linearGradient>
    </defs>
    <polygon points="{area}" fill="url(#gradient)" />
    <polyline points="{polyline}" fill="none" stroke="{color}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" />
</svg>"##
    )
}

fn format_points(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}
