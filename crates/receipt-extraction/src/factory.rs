use crate::{ExtractionResult, GeminiExtractor, ReceiptExtractor};
use receipt_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Create the receipt extractor from configuration
pub fn create_extractor(config: &Config) -> ExtractionResult<Arc<dyn ReceiptExtractor>> {
    let extractor = GeminiExtractor::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_api_base.clone(),
        Duration::from_secs(config.extraction_timeout_seconds),
    )?;

    tracing::info!(model = %config.gemini_model, "Gemini extractor initialized");

    Ok(Arc::new(extractor))
}
