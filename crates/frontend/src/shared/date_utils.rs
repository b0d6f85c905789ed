use chrono::DateTime;

/// Format an RFC 3339 timestamp as `DD.MM.YYYY HH:MM` (UTC).
/// Unparseable input is returned unchanged.
pub fn format_timestamp(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => ts.naive_utc().format("%d.%m.%Y %H:%M").to_string(),
        Err(_) => value.to_string(),
    }
}

/// Same as [`format_timestamp`], `-` for missing values
pub fn format_timestamp_opt(value: Option<&str>) -> String {
    value.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-03-15T14:02:26.123456+00:00"),
            "15.03.2024 14:02"
        );
        assert_eq!(format_timestamp("2024-12-31T23:59:59Z"), "31.12.2024 23:59");
        assert_eq!(format_timestamp("2024-06-01T03:00:00+03:00"), "01.06.2024 00:00");
    }

    #[test]
    fn test_invalid_and_missing() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp_opt(None), "-");
    }
}
