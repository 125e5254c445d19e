//! Transaction date reconciliation.
//!
//! A receipt date can come from the uploader or from the extraction service.
//! The uploader's value always wins when present, and a malformed uploader
//! value is an error rather than a reason to fall back to the extracted one.

use chrono::NaiveDate;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Wire format for transaction dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Where a candidate date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    UserSupplied,
    Extracted,
}

impl Display for DateSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DateSource::UserSupplied => write!(f, "user-supplied"),
            DateSource::Extracted => write!(f, "extracted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("{origin} date format invalid (YYYY-MM-DD): {value}")]
    InvalidDate { value: String, origin: DateSource },

    #[error("no valid date (neither user-supplied nor extracted)")]
    NoDateAvailable,
}

impl DateError {
    /// True when the uploader sent a malformed date.
    pub fn is_caller_input(&self) -> bool {
        matches!(
            self,
            DateError::InvalidDate {
                origin: DateSource::UserSupplied,
                ..
            }
        )
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Padding is mandatory, so `2023-1-5` is rejected even though chrono alone
/// would accept it. The accepted text always equals the date's `Display` form.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let digits_in_place = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_in_place {
        return None;
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Resolve the authoritative transaction date.
///
/// Empty strings mean "not provided". The first non-empty candidate in
/// priority order (user-supplied, then extracted) must be valid.
pub fn resolve_transaction_date(
    user_date: &str,
    extracted_date: &str,
) -> Result<NaiveDate, DateError> {
    let (value, origin) = if !user_date.is_empty() {
        (user_date, DateSource::UserSupplied)
    } else if !extracted_date.is_empty() {
        (extracted_date, DateSource::Extracted)
    } else {
        return Err(DateError::NoDateAvailable);
    };

    parse_iso_date(value).ok_or_else(|| DateError::InvalidDate {
        value: value.to_string(),
        origin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(value: &str, origin: DateSource) -> DateError {
        DateError::InvalidDate {
            value: value.to_string(),
            origin,
        }
    }

    #[test]
    fn test_resolve_transaction_date_table() {
        struct Case {
            name: &'static str,
            user: &'static str,
            extracted: &'static str,
            expected: Result<&'static str, DateError>,
        }

        let cases = vec![
            Case {
                name: "valid user date wins over valid extracted date",
                user: "2023-01-15",
                extracted: "2023-01-20",
                expected: Ok("2023-01-15"),
            },
            Case {
                name: "valid user date with empty extracted date",
                user: "2023-01-15",
                extracted: "",
                expected: Ok("2023-01-15"),
            },
            Case {
                name: "empty user date falls back to extracted date",
                user: "",
                extracted: "2023-02-10",
                expected: Ok("2023-02-10"),
            },
            Case {
                name: "invalid user date is rejected even with valid extracted date",
                user: "2023/01/15",
                extracted: "2023-01-20",
                expected: Err(invalid("2023/01/15", DateSource::UserSupplied)),
            },
            Case {
                name: "invalid extracted date without user date",
                user: "",
                extracted: "invalid-date",
                expected: Err(invalid("invalid-date", DateSource::Extracted)),
            },
            Case {
                name: "no date from either source",
                user: "",
                extracted: "",
                expected: Err(DateError::NoDateAvailable),
            },
        ];

        for case in cases {
            let result = resolve_transaction_date(case.user, case.extracted);
            let expected = case.expected.map(|d| d.to_string());
            assert_eq!(
                result.map(|d| d.to_string()),
                expected,
                "case: {}",
                case.name
            );
        }
    }

    #[test]
    fn test_valid_user_date_is_returned_unchanged_regardless_of_extracted() {
        let user_dates = ["2023-12-24", "2000-02-29", "1999-01-01"];
        let extracted = ["", "2023-12-25", "garbage", "2023/12/25"];

        for user in user_dates {
            for other in extracted {
                let resolved = resolve_transaction_date(user, other).unwrap();
                assert_eq!(resolved.to_string(), user, "extracted: {other:?}");
            }
        }
    }

    #[test]
    fn test_parse_iso_date_is_strict() {
        assert!(parse_iso_date("2023-01-05").is_some());
        assert!(parse_iso_date("2023-1-05").is_none());
        assert!(parse_iso_date("2023-01-5").is_none());
        assert!(parse_iso_date("2023-02-30").is_none());
        assert!(parse_iso_date("2023-13-01").is_none());
        assert!(parse_iso_date(" 2023-01-05").is_none());
        assert!(parse_iso_date("2023-01-05T00:00:00Z").is_none());
        assert!(parse_iso_date("+023-01-05").is_none());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let inputs = [("", "2023-02-10"), ("bad", ""), ("", ""), ("2023-03-01", "x")];
        for (user, extracted) in inputs {
            assert_eq!(
                resolve_transaction_date(user, extracted),
                resolve_transaction_date(user, extracted)
            );
        }
    }

    #[test]
    fn test_error_messages_name_value_and_source() {
        let err = resolve_transaction_date("2023/01/15", "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "user-supplied date format invalid (YYYY-MM-DD): 2023/01/15"
        );
        assert!(err.is_caller_input());

        let err = resolve_transaction_date("", "invalid-date").unwrap_err();
        assert_eq!(
            err.to_string(),
            "extracted date format invalid (YYYY-MM-DD): invalid-date"
        );
        assert!(!err.is_caller_input());
        assert!(!DateError::NoDateAvailable.is_caller_input());
    }
}
