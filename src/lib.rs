// Deen LAB - repair-shop record keeper over a CSV-backed record store

pub mod csv;
pub mod filter;
pub mod models;
pub mod server;
pub mod stats;
pub mod store;
pub mod views;

// Re-export main types for convenience
pub use models::{ClientType, Intake, Marque, RepairRecord};
pub use stats::FinancialSummary;
pub use store::{RecordStore, StoreError, DATA_FILE, EVIDENCE_DIR};
