//! Date utilities: the fixed dd/MM/yyyy display form and its canonical
//! UTC-midnight instant, plus the lenient instant parser used when coercing
//! imported values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse fixed-width dd/MM/yyyy text.
///
/// Returns `None` unless the text has exactly that shape and names a real
/// calendar date (31/04/2025 fails, 29/02/2024 parses).
pub fn parse_fixed(text: &str) -> Option<NaiveDate> {
    let t = text.trim();
    let mut it = t.split('/');
    let (d, m, y) = (it.next()?, it.next()?, it.next()?);
    if it.next().is_some() || d.len() != 2 || m.len() != 2 || y.len() != 4 {
        return None;
    }
    let day: u32 = d.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    let year: i32 = y.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Render an instant back into the fixed dd/MM/yyyy display form.
pub fn format_fixed(instant: &DateTime<Utc>) -> String {
    instant.format("%d/%m/%Y").to_string()
}

/// Fixed-format text to its canonical sortable instant: midnight UTC of
/// that calendar date.
pub fn to_canonical(text: &str) -> Option<DateTime<Utc>> {
    let date = parse_fixed(text)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Lenient instant parsing for imported values: RFC 3339 first, then the
/// fixed display form, then common ISO date/datetime shapes without an
/// offset (taken as UTC).
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = to_canonical(t) {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
    }
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in formats {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(ndt.and_utc());
        }
    }
    None
}

/// Normalization rule for record dates: fixed parse first, then the lenient
/// parser, else `now`.
pub fn normalize_date(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    to_canonical(text)
        .or_else(|| parse_instant(text))
        .unwrap_or(now)
}

/// Inclusive range check against optional fixed-format bounds.
///
/// A bound that is absent, or that fails to parse, constrains nothing on
/// its side; only valid bound text filters.
pub fn in_range(instant: DateTime<Utc>, from: Option<&str>, to: Option<&str>) -> bool {
    let meets_from = match from.and_then(to_canonical) {
        Some(lo) => instant >= lo,
        None => true,
    };
    let meets_to = match to.and_then(to_canonical) {
        Some(hi) => instant <= hi,
        None => true,
    };
    meets_from && meets_to
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_only_fixed_width_shapes() {
        assert!(parse_fixed("15/01/2025").is_some());
        assert!(parse_fixed(" 15/01/2025 ").is_some());
        assert!(parse_fixed("1/1/2025").is_none());
        assert!(parse_fixed("15/01/25").is_none());
        assert!(parse_fixed("15-01-2025").is_none());
        assert!(parse_fixed("15/01/2025/9").is_none());
        assert!(parse_fixed("").is_none());
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert!(parse_fixed("31/04/2025").is_none()); // April has 30 days
        assert!(parse_fixed("29/02/2025").is_none());
        assert!(parse_fixed("29/02/2024").is_some());
        assert!(parse_fixed("00/01/2025").is_none());
        assert!(parse_fixed("15/13/2025").is_none());
    }

    #[test]
    fn fixed_format_round_trips_through_canonical() {
        for text in ["01/01/2025", "31/12/1999", "29/02/2024", "05/07/2031"] {
            let instant = to_canonical(text).unwrap();
            assert_eq!(format_fixed(&instant), text);
        }
    }

    #[test]
    fn canonical_is_midnight_utc() {
        let dt = to_canonical("15/01/2025").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn lenient_parser_accepts_common_instant_shapes() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(parse_instant("2025-01-15T10:30:00Z"), Some(expected));
        assert_eq!(parse_instant("2025-01-15T10:30:00+00:00"), Some(expected));
        assert_eq!(parse_instant("2025-01-15T10:30:00.000Z"), Some(expected));
        assert_eq!(parse_instant("2025-01-15 10:30:00"), Some(expected));
        assert_eq!(
            parse_instant("15/01/2025"),
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_instant("2025-01-15"),
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_instant("not a date"), None);
        assert_eq!(parse_instant(""), None);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let jan15 = to_canonical("15/01/2025").unwrap();
        assert!(in_range(jan15, Some("15/01/2025"), Some("15/01/2025")));
        assert!(in_range(jan15, Some("01/01/2025"), Some("31/01/2025")));
        assert!(!in_range(jan15, Some("16/01/2025"), None));
        assert!(!in_range(jan15, None, Some("14/01/2025")));
    }

    #[test]
    fn invalid_bound_text_means_open_side() {
        let jan15 = to_canonical("15/01/2025").unwrap();
        assert!(in_range(jan15, Some("garbage"), None));
        assert!(in_range(jan15, Some("31/04/2025"), Some("also garbage")));
        assert!(in_range(jan15, None, None));
        // A valid bound still applies when the other side is invalid.
        assert!(!in_range(jan15, Some("garbage"), Some("14/01/2025")));
    }
}
