use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Parse the timestamp shapes the backend emits: RFC 3339, naive date-times with a `T`
/// or space separator, and bare dates. Naive values are taken as UTC.
pub(crate) fn parse_timestamp(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed);
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// "March 5, 2024". Empty input renders as "N/A"; unparseable input is returned as is.
pub fn format_long_date(input: &str) -> String {
    if input.trim().is_empty() {
        return "N/A".to_string();
    }
    match parse_timestamp(input) {
        Some(ts) => ts.format("%B %-d, %Y").to_string(),
        None => input.to_string(),
    }
}

/// "Tue, Mar 5, 2024"
pub fn format_flight_date(input: &str) -> String {
    match parse_timestamp(input) {
        Some(ts) => ts.format("%a, %b %-d, %Y").to_string(),
        None => input.to_string(),
    }
}

/// "09:05 AM"
pub fn format_clock_time(input: &str) -> String {
    match parse_timestamp(input) {
        Some(ts) => ts.format("%I:%M %p").to_string(),
        None => input.to_string(),
    }
}

/// Elapsed time between departure and arrival as "2h 30m".
///
/// `None` when either side fails to parse or arrival precedes departure.
pub fn flight_duration(departure: &str, arrival: &str) -> Option<String> {
    let elapsed = parse_timestamp(arrival)? - parse_timestamp(departure)?;
    if elapsed < chrono::Duration::zero() {
        return None;
    }
    let minutes = elapsed.num_minutes();
    Some(format!("{}h {}m", minutes / 60, minutes % 60))
}
