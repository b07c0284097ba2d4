//! Time and date commands

use chrono::{Local, Utc};

/// HTTP-date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Current local time as `HH:MM:SS`
pub fn time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Current time in HTTP-date form
pub fn date() -> String {
    Utc::now().format(HTTP_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveTime};

    #[test]
    fn test_time_format() {
        let body = time();
        let parsed = NaiveTime::parse_from_str(&body, "%H:%M:%S").expect("HH:MM:SS");
        let drift = (Local::now().time() - parsed).num_seconds().abs();
        // Allow for a midnight rollover between the two reads.
        assert!(drift <= 5 || drift >= 86_395, "drift {}s", drift);
    }

    #[test]
    fn test_date_format() {
        let body = date();
        assert!(body.ends_with(" GMT"));
        let parsed = DateTime::parse_from_rfc2822(&body).expect("HTTP date");
        let drift = (Utc::now() - parsed.with_timezone(&Utc)).num_seconds().abs();
        assert!(drift <= 5, "drift {}s", drift);
    }
}
