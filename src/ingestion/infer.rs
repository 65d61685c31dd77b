//! Column type inference and shared cell parsers.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::DataType;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Infer the narrowest [`DataType`] able to hold every non-empty cell of a column.
///
/// Candidates are tried in the order `Int64`, `Float64`, `Bool`, `Timestamp`, `Utf8`.
/// Empty (or whitespace-only) cells are nulls and do not vote; a column with no non-empty
/// cells is `Utf8`.
pub fn infer_column_type<'a, I>(cells: I) -> DataType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut int = true;
    let mut float = true;
    let mut boolean = true;
    let mut timestamp = true;
    let mut seen = false;

    for raw in cells {
        let cell = raw.trim();
        if cell.is_empty() {
            continue;
        }
        seen = true;
        int = int && cell.parse::<i64>().is_ok();
        float = float && looks_like_float(cell);
        boolean = boolean && (cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false"));
        timestamp = timestamp && parse_timestamp(cell).is_some();

        if !(int || float || boolean || timestamp) {
            return DataType::Utf8;
        }
    }

    if !seen {
        DataType::Utf8
    } else if int {
        DataType::Int64
    } else if float {
        DataType::Float64
    } else if boolean {
        DataType::Bool
    } else if timestamp {
        DataType::Timestamp
    } else {
        DataType::Utf8
    }
}

// `f64::from_str` also accepts "inf"/"NaN"; text columns containing those words stay strings.
fn looks_like_float(cell: &str) -> bool {
    cell.bytes().any(|b| b.is_ascii_digit()) && cell.parse::<f64>().is_ok()
}

/// Parse a date or date/time cell.
///
/// Accepts `YYYY-MM-DD` (midnight), `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS` (both with
/// optional fractional seconds), and RFC 3339 with an offset (normalized to UTC).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

/// Parse a boolean cell for schema-first loading.
pub fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{infer_column_type, parse_timestamp};
    use crate::types::DataType;

    #[test]
    fn infers_narrowest_type() {
        assert_eq!(infer_column_type(["1", "2", "-3"]), DataType::Int64);
        assert_eq!(infer_column_type(["1", "2.5"]), DataType::Float64);
        assert_eq!(infer_column_type(["true", "FALSE"]), DataType::Bool);
        assert_eq!(
            infer_column_type(["2024-01-05", "2024-02-01 10:00:00"]),
            DataType::Timestamp
        );
        assert_eq!(infer_column_type(["AC001", "AC002"]), DataType::Utf8);
        assert_eq!(infer_column_type(["1", "x"]), DataType::Utf8);
    }

    #[test]
    fn empty_cells_do_not_vote() {
        assert_eq!(infer_column_type(["", "3", "  "]), DataType::Int64);
        assert_eq!(infer_column_type(["", ""]), DataType::Utf8);
        assert_eq!(infer_column_type(std::iter::empty::<&str>()), DataType::Utf8);
    }

    #[test]
    fn non_finite_words_stay_strings() {
        assert_eq!(infer_column_type(["inf", "NaN"]), DataType::Utf8);
    }

    #[test]
    fn parses_supported_timestamp_forms() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_timestamp("2024-01-05"), day.and_hms_opt(0, 0, 0));
        assert_eq!(
            parse_timestamp("2024-01-05 16:29:14"),
            day.and_hms_opt(16, 29, 14)
        );
        assert_eq!(
            parse_timestamp("2024-01-05T16:29:14.250"),
            day.and_hms_milli_opt(16, 29, 14, 250)
        );
        assert_eq!(
            parse_timestamp("2024-01-05T18:29:14+02:00"),
            day.and_hms_opt(16, 29, 14)
        );
        assert_eq!(parse_timestamp("05/01/2024"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }
}
