//! Validation rules shared by the ingestion workflow and the HTTP layer.

pub mod date;

pub use date::{parse_iso_date, resolve_transaction_date, DateError, DateSource, DATE_FORMAT};
