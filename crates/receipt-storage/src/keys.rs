//! Shared key generation for storage backends.

use chrono::{DateTime, Utc};
use std::path::Path;
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 10;

/// Generate a storage key for an uploaded receipt image.
///
/// Produces `receipts/{YYYY}/{MM}/{uuid}{.ext}` for the month of `uploaded_at`.
pub fn generate_storage_key(filename: &str, uploaded_at: DateTime<Utc>) -> String {
    format!(
        "receipts/{}/{}{}",
        uploaded_at.format("%Y/%m"),
        Uuid::new_v4(),
        extension_suffix(filename)
    )
}

fn extension_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn key_is_partitioned_by_month_and_keeps_extension() {
        let key = generate_storage_key("r.JPG", at(2023, 3));
        assert!(key.starts_with("receipts/2023/03/"), "{key}");
        assert!(key.ends_with(".jpg"), "{key}");

        let id = key
            .trim_start_matches("receipts/2023/03/")
            .trim_end_matches(".jpg");
        assert!(Uuid::parse_str(id).is_ok(), "{key}");
    }

    #[test]
    fn key_drops_unusable_extensions() {
        assert!(!generate_storage_key("receipt", at(2024, 1)).contains('.'));
        assert!(!generate_storage_key("x.p/g", at(2024, 1)).ends_with(".p/g"));
        assert!(!generate_storage_key("x.averyveryverylongext", at(2024, 1)).contains('.'));
        assert!(!generate_storage_key("", at(2024, 1)).contains('.'));
    }

    #[test]
    fn keys_are_unique_and_safe() {
        let a = generate_storage_key("../../etc/passwd.png", at(2024, 12));
        let b = generate_storage_key("../../etc/passwd.png", at(2024, 12));
        assert_ne!(a, b);
        assert!(!a.contains(".."));
        assert!(!a.starts_with('/'));
        assert!(a.starts_with("receipts/2024/12/"));
    }
}
