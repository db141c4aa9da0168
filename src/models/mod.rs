use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod product;
pub mod system_setting;

// Re-exports for convenience
pub use product::*;
pub use system_setting::*;

/// Persisted stock state of a tracked product. New products start out of
/// stock so the first successful in-stock probe produces an edge trigger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT")]
pub enum StockState {
    #[sqlx(rename = "in_stock")]
    InStock,
    #[sqlx(rename = "out_of_stock")]
    OutOfStock,
}

/// Result of a single availability probe. `Indeterminate` means the API
/// answered but the response shape was unrecognized; it is treated as
/// not-in-stock for state purposes but never triggers a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    Indeterminate,
}

impl StockState {
    /// State transition applied after a completed probe: only a definite
    /// in-stock answer counts as in stock.
    pub fn from_status(status: StockStatus) -> Self {
        match status {
            StockStatus::InStock => StockState::InStock,
            StockStatus::OutOfStock | StockStatus::Indeterminate => StockState::OutOfStock,
        }
    }
}

// Helper function to generate UUIDs in the format expected by the database
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
