//! Extraction client setup

use anyhow::{Context, Result};
use receipt_core::Config;
use receipt_extraction::{create_extractor, ReceiptExtractor};
use std::sync::Arc;

pub fn setup_extractor(config: &Config) -> Result<Arc<dyn ReceiptExtractor>> {
    create_extractor(config).context("Failed to initialize receipt extractor")
}
