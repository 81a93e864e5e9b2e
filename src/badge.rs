// Badge formatting for the shields.io endpoint schema

use crate::config::BadgeConfig;
use crate::models::BadgePayload;

pub const BADGE_SCHEMA_VERSION: u32 = 1;

/// Badge for the latest stored count. A plugin with no stored samples gets
/// the "no data" sentinel payload rather than an error.
pub fn format_badge(latest_count: Option<u64>, config: &BadgeConfig) -> BadgePayload {
    match latest_count {
        Some(count) => BadgePayload {
            schema_version: BADGE_SCHEMA_VERSION,
            label: config.label.clone(),
            message: format_count(count),
            color: config.color.trim_start_matches('#').to_string(),
        },
        None => BadgePayload {
            schema_version: BADGE_SCHEMA_VERSION,
            label: config.label.clone(),
            message: "no data".to_string(),
            color: "lightgrey".to_string(),
        },
    }
}

/// Badge served when the store itself fails; shields.io renders it like any
/// other payload instead of showing a broken image.
pub fn error_badge(config: &BadgeConfig) -> BadgePayload {
    BadgePayload {
        schema_version: BADGE_SCHEMA_VERSION,
        label: config.label.clone(),
        message: "error".to_string(),
        color: "red".to_string(),
    }
}

/// Compact count formatting: 121, 1.5k, 2.5M.
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}k", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}
