//! Commit timestamp formatting

use chrono::{DateTime, Local, TimeZone, Utc};

/// Human readable distance between `timestamp` and `now`
///
/// "just now", "5 minutes ago", "in 2 days", ... Seven days and more
/// are counted in weeks until a full month has passed.
pub fn relative_time(timestamp: i64, now: DateTime<Utc>) -> String {
    let seconds = now.timestamp().saturating_sub(timestamp);
    let in_future = seconds < 0;
    let seconds = seconds.unsigned_abs();

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = days / 365;

    let (value, unit) = if years > 0 {
        (years, "year")
    } else if months > 0 {
        (months, "month")
    } else if days >= 7 {
        (days / 7, "week")
    } else if days > 0 {
        (days, "day")
    } else if hours > 0 {
        (hours, "hour")
    } else if minutes > 0 {
        (minutes, "minute")
    } else {
        return "just now".to_string();
    };

    let plural = if value == 1 { "" } else { "s" };
    if in_future {
        format!("in {} {}{}", value, unit, plural)
    } else {
        format!("{} {}{} ago", value, unit, plural)
    }
}

/// RFC 2822 date in the local timezone, empty for out of range values
pub fn absolute_time(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(date) => date.to_rfc2822(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(now: DateTime<Utc>, duration: Duration) -> String {
        relative_time((now - duration).timestamp(), now)
    }

    #[test]
    fn test_relative_units() {
        let now = Utc::now();

        assert_eq!(ago(now, Duration::seconds(30)), "just now");
        assert_eq!(ago(now, Duration::minutes(1)), "1 minute ago");
        assert_eq!(ago(now, Duration::minutes(45)), "45 minutes ago");
        assert_eq!(ago(now, Duration::hours(3)), "3 hours ago");
        assert_eq!(ago(now, Duration::days(2)), "2 days ago");
        assert_eq!(ago(now, Duration::days(7)), "1 week ago");
        assert_eq!(ago(now, Duration::days(20)), "2 weeks ago");
        assert_eq!(ago(now, Duration::days(65)), "2 months ago");
        assert_eq!(ago(now, Duration::days(800)), "2 years ago");
    }

    #[test]
    fn test_future_timestamps() {
        let now = Utc::now();
        let later = (now + Duration::days(3)).timestamp();
        assert_eq!(relative_time(later, now), "in 3 days");
    }

    #[test]
    fn test_extreme_timestamps() {
        let now = Utc::now();
        assert!(relative_time(i64::MIN, now).ends_with("years ago"));
        assert!(relative_time(i64::MAX, now).starts_with("in "));
    }

    #[test]
    fn test_absolute_time() {
        assert!(!absolute_time(1_700_000_000).is_empty());
        assert!(absolute_time(i64::MAX).is_empty());
    }
}
