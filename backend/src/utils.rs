use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;

lazy_static! {
    static ref CHANNEL_ID: Regex = Regex::new(r"^UC[a-zA-Z0-9_-]{22}$").unwrap();
}

/// Parse an ISO8601 / RFC3339 date string (`2024-01-31T10:00:00Z`)
pub fn parse_iso8601_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }
    date_str.parse::<DateTime<Utc>>().ok()
}

/// Parse an ISO8601 duration as returned by the Data API (`PT1H2M3S`, `P1DT2H`).
///
/// Fractional values are accepted; week, month and year parts are not.
pub fn parse_iso8601_duration(duration_str: &str) -> Option<Duration> {
    let rest = duration_str.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut total_seconds = 0.0;
    let mut current_number = String::new();
    let mut in_time = false;

    for ch in rest.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            current_number.push(ch);
            continue;
        }
        if ch == 'T' {
            if in_time || !current_number.is_empty() {
                return None;
            }
            in_time = true;
            continue;
        }

        let num = current_number.parse::<f64>().ok()?;
        total_seconds += match (in_time, ch) {
            (false, 'D') => num * 86_400.0, // Days
            (true, 'H') => num * 3600.0,    // Hours
            (true, 'M') => num * 60.0,      // Minutes
            (true, 'S') => num,             // Seconds
            _ => return None,
        };
        current_number.clear();
    }

    if !current_number.is_empty() {
        return None;
    }

    Duration::try_from_secs_f64(total_seconds).ok()
}

/// True for the 24 character `UC...` form of a channel id.
pub fn is_channel_id(value: &str) -> bool {
    CHANNEL_ID.is_match(value)
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// 1234567 -> "1,234,567"
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `MM:SS`, or `H:MM:SS` once the duration reaches an hour
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, remainder) = (total / 3600, total % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}
