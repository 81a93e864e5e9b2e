// Refresh throttle: pure eligibility check over last-fetched timestamps

use chrono::{DateTime, Duration, Utc};

/// Returns true when a plugin may be refreshed from the catalogue: either it
/// has never been fetched, or at least `window` has elapsed since
/// `last_fetched`. A `now` earlier than `last_fetched` (clock skew, manual
/// edits) counts as not yet elapsed.
pub fn can_refresh(
    last_fetched: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    match last_fetched {
        None => true,
        Some(last) => now.signed_duration_since(last) >= window,
    }
}
