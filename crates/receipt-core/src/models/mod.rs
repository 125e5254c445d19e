pub mod extraction;
pub mod receipt;

pub use extraction::ExtractedFields;
pub use receipt::{ListReceiptsQuery, NewReceipt, Receipt, ReceiptListResponse};
