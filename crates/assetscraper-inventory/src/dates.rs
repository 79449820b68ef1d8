//! Date reformatting shared by the parsers
//!
//! The three helpers intentionally disagree on zero padding: the epoch and
//! compact forms produce `YYYY-MM-DD`, the update form keeps `YYYY-M-D`.
//! Downstream consumers match on these exact strings.

use chrono::DateTime;

/// Unix epoch seconds to a zero-padded `YYYY-MM-DD` (UTC).
///
/// Anything that is not an integer in the representable range renders as an
/// empty string.
pub fn epoch_seconds_to_date(epoch: &str) -> String {
    epoch
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// `YYYYMMDD` to `YYYY-MM-DD`; any other length renders empty.
pub fn compact_date_to_iso(date: &str) -> String {
    let date = date.trim();
    if date.len() != 8 || !date.is_ascii() {
        return String::new();
    }
    format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..])
}

/// `M/D/YYYY` to `YYYY-M-D` by reordering the components, no padding added.
///
/// Input without exactly three `/`-separated parts renders empty.
pub fn us_date_to_ymd(date: &str) -> String {
    let parts: Vec<&str> = date.trim().split('/').collect();
    match parts.as_slice() {
        [month, day, year] if !month.is_empty() && !day.is_empty() && !year.is_empty() => {
            format!("{year}-{month}-{day}")
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_seconds_to_date() {
        assert_eq!(epoch_seconds_to_date("1679356800"), "2023-03-21");
        assert_eq!(epoch_seconds_to_date("0"), "1970-01-01");
        assert_eq!(epoch_seconds_to_date(" 1000000000\n"), "2001-09-09");
    }

    #[test]
    fn test_epoch_seconds_non_numeric() {
        assert_eq!(epoch_seconds_to_date("(none)"), "");
        assert_eq!(epoch_seconds_to_date(""), "");
    }

    #[test]
    fn test_compact_date_to_iso() {
        assert_eq!(compact_date_to_iso("20230321"), "2023-03-21");
        assert_eq!(compact_date_to_iso("2023321"), "");
        assert_eq!(compact_date_to_iso(""), "");
        assert_eq!(compact_date_to_iso("202303210"), "");
    }

    #[test]
    fn test_us_date_is_not_padded() {
        assert_eq!(us_date_to_ymd("3/21/2023"), "2023-3-21");
        assert_eq!(us_date_to_ymd("12/1/2022"), "2022-12-1");
        assert_eq!(us_date_to_ymd("03/09/2021"), "2021-03-09");
    }

    #[test]
    fn test_us_date_malformed() {
        assert_eq!(us_date_to_ymd("2023-03-21"), "");
        assert_eq!(us_date_to_ymd(""), "");
        assert_eq!(us_date_to_ymd("1//2023"), "");
    }
}
