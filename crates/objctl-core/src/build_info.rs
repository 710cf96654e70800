//! Facts fixed at build time.

use chrono::{DateTime, Datelike, Timelike, Utc};

pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `rustc --version` of the compiler that built this binary.
pub const RUSTC_VERSION: &str = env!("OBJCTL_RUSTC_VERSION");

/// Release token stamped in by the release pipeline, an RFC3339 timestamp
/// such as `2015-06-01T12:00:00.000Z`. Empty for local builds.
pub const RELEASE_TAG: &str = match option_env!("OBJCTL_RELEASE_TAG") {
    Some(tag) => tag,
    None => "",
};

/// Format a release token as an HTTP date (`Mon, 01 Jun 2015 12:00:00 GMT`).
///
/// Returns an empty string when the token is empty, unparseable, or the zero
/// instant.
pub fn release_line(tag: &str) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(tag.trim()) else {
        return String::new();
    };
    let utc = parsed.with_timezone(&Utc);
    if is_zero_instant(&utc) {
        return String::new();
    }
    utc.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn is_zero_instant(t: &DateTime<Utc>) -> bool {
    t.year() == 1
        && t.month() == 1
        && t.day() == 1
        && t.num_seconds_from_midnight() == 0
        && t.nanosecond() == 0
}
