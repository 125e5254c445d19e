//! Receipt Extraction Library
//!
//! Reads structured fields (date, store, items, total) off a receipt image.
//! The Gemini client is the production implementation; anything else that
//! implements [`ReceiptExtractor`] can stand in for it.

pub mod factory;
pub mod gemini;
pub mod media_type;
pub mod traits;

pub use factory::create_extractor;
pub use gemini::GeminiExtractor;
pub use media_type::detect_media_type;
pub use traits::{ExtractionError, ExtractionResult, ReceiptExtractor};
