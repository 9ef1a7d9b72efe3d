pub mod activity;
pub mod config;
pub mod enrichment;
pub mod models;
pub mod persistence;
pub mod scenarios;
pub mod store;
pub mod threads;

// Re-export commonly used types for convenience.
pub use config::AppConfig;
pub use models::{Comment, Complaint, ComplaintStatus, Role, User};
pub use store::{ComplaintStore, Outcome, StoreError, StoreResult};
