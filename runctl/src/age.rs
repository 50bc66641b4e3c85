//! Compact, human-readable resource ages.

use runctl_common::prelude::*;

/// Shown instead of an age when we don't know when a resource was created.
pub const UNKNOWN_AGE: &str = "---";

/// How long ago `created` was, relative to `now`, in the coarsest unit that
/// is at least 1: `8d`, `3h`, `2m` or `30s`.
///
/// We never look at the clock here, so the same inputs always give the same
/// output.
pub fn format_age(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let created = match created {
        Some(created) => created,
        None => return UNKNOWN_AGE.to_owned(),
    };

    // A little clock skew can put creation times in the future.
    let age = now.signed_duration_since(created);
    if age.num_days() > 0 {
        format!("{}d", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{}h", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{}m", age.num_minutes())
    } else {
        format!("{}s", age.num_seconds().max(0))
    }
}

#[test]
fn ages_use_the_coarsest_unit() {
    use runctl_common::chrono::{Duration, TimeZone};

    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let examples = &[
        (Duration::seconds(0), "0s"),
        (Duration::seconds(10), "10s"),
        (Duration::seconds(59), "59s"),
        (Duration::seconds(60), "1m"),
        (Duration::minutes(2), "2m"),
        (Duration::minutes(59) + Duration::seconds(59), "59m"),
        (Duration::hours(23), "23h"),
        (Duration::hours(200), "8d"),
        (Duration::seconds(-30), "0s"),
    ];
    for &(ago, expected) in examples {
        assert_eq!(format_age(Some(now - ago), now), expected);
    }
}

#[test]
fn unknown_creation_time_is_a_placeholder() {
    assert_eq!(format_age(None, Utc::now()), "---");
}
