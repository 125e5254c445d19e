use bytes::Bytes;
use std::fmt;

/// Everything the caller supplies for one receipt.
#[derive(Debug, Clone)]
pub struct CreateReceiptRequest {
    /// `YYYY-MM-DD`; empty or `None` means "use the date on the receipt"
    pub date: Option<String>,
    pub payer: String,
    pub payment_method: String,
    pub image: Bytes,
    /// Original filename, used only as an extension hint for the storage key
    pub filename: String,
    pub content_type: String,
}

/// Progress of one ingestion, in the order the steps run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionState {
    Start,
    ImageStored,
    FieldsExtracted,
    DateResolved,
    RecordBuilt,
    Persisted,
}

impl fmt::Display for IngestionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngestionState::Start => "start",
            IngestionState::ImageStored => "image_stored",
            IngestionState::FieldsExtracted => "fields_extracted",
            IngestionState::DateResolved => "date_resolved",
            IngestionState::RecordBuilt => "record_built",
            IngestionState::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// Step at which an ingestion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionStage {
    Upload,
    Extraction,
    DateResolution,
    Persistence,
}

impl fmt::Display for IngestionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngestionStage::Upload => "upload",
            IngestionStage::Extraction => "extraction",
            IngestionStage::DateResolution => "date_resolution",
            IngestionStage::Persistence => "persistence",
        };
        f.write_str(name)
    }
}
