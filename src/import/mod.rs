//! Import module for SpreadSaver
//!
//! Adapts purchase data from external JSON/CSV shapes into the fixed
//! [`PurchaseRecord`](crate::models::PurchaseRecord) the engine works on.

pub mod records;

pub use records::FieldMapping;
