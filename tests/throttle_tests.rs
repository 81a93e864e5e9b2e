// Refresh eligibility tests

use chrono::{Duration, TimeZone, Utc};
use plugin_counter::throttle::can_refresh;

fn window() -> Duration {
    Duration::hours(24)
}

#[test]
fn never_fetched_can_refresh() {
    assert!(can_refresh(None, Utc::now(), window()));
}

#[test]
fn within_window_cannot_refresh() {
    let last = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let now = last + Duration::hours(23) + Duration::minutes(59);
    assert!(!can_refresh(Some(last), now, window()));
}

#[test]
fn exactly_at_window_can_refresh() {
    let last = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let now = last + Duration::hours(24);
    assert!(can_refresh(Some(last), now, window()));
}

#[test]
fn past_window_can_refresh() {
    let last = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let now = last + Duration::hours(25);
    assert!(can_refresh(Some(last), now, window()));
}

#[test]
fn clock_skew_cannot_refresh() {
    // last_fetched in the future relative to now must not allow a refresh
    let last = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let now = last - Duration::hours(1);
    assert!(!can_refresh(Some(last), now, window()));
}

#[test]
fn shorter_window_is_respected() {
    let last = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let now = last + Duration::hours(2);
    assert!(can_refresh(Some(last), now, Duration::hours(1)));
    assert!(!can_refresh(Some(last), now, Duration::hours(3)));
}
