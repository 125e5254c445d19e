/// Fields read off a receipt image by the extraction service.
///
/// Empty strings and a zero amount mean the field was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub date: String,
    pub store: String,
    pub items: String,
    pub total_amount: i64,
}
