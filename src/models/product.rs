use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{StockState, generate_id};
use crate::tcin::extract_tcin;
use crate::utils::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct TrackedProduct {
    pub id: String,
    /// Numeric catalog identifier extracted from the URL; immutable once set.
    pub tcin: String,
    pub url: String,
    pub name: String,

    // Probe state
    pub stock_state: StockState,
    pub last_checked_at: Option<DateTime<Utc>>,

    // Metadata
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrackedProduct {
    pub url: String,
    pub name: String,
}

impl TrackedProduct {
    /// Build a product from operator input. Fails with `InvalidTcin` when the
    /// URL carries no numeric identifier, so a bad product is never persisted.
    pub fn new(new_product: NewTrackedProduct) -> Result<Self> {
        let tcin = extract_tcin(&new_product.url)?;
        let now = Utc::now();
        Ok(Self {
            id: generate_id(),
            tcin,
            url: new_product.url,
            name: new_product.name,
            stock_state: StockState::OutOfStock,
            last_checked_at: None,
            created_at: now,
            updated_at: now,
        })
    }
}
