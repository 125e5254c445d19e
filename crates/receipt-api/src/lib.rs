//! Receipt API Library
//!
//! HTTP handlers, error conversion and application setup for the receipt
//! ingestion service.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod utils;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
