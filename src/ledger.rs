//! Persisted product ledger.
//!
//! Owns the SQLite store for tracked products and operator settings. All
//! writes go through the poll-loop orchestrator, so no locking is needed
//! beyond the connection pool.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::models::{NewTrackedProduct, StockState, SystemSetting, TrackedProduct};
use crate::utils::error::Result;

#[derive(Clone)]
pub struct Ledger {
    pool: SqlitePool,
}

impl Ledger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database named in the configuration and
    /// ensure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout))
            .connect_with(options)
            .await?;

        let ledger = Self::new(pool);
        ledger.init_schema().await?;
        Ok(ledger)
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tracked_products (
                id TEXT PRIMARY KEY,
                tcin TEXT NOT NULL,
                url TEXT NOT NULL,
                name TEXT NOT NULL,
                stock_state TEXT NOT NULL DEFAULT 'out_of_stock',
                last_checked_at TEXT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS system_settings (
                key TEXT PRIMARY KEY,
                value_json TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append a product to the ledger. TCIN extraction happens in the model
    /// constructor, so an invalid URL never reaches the database. Duplicate
    /// URLs are allowed on purpose (append-only add semantics).
    pub async fn add_product(&self, new_product: NewTrackedProduct) -> Result<TrackedProduct> {
        let product = TrackedProduct::new(new_product)?;

        sqlx::query(
            r#"
            INSERT INTO tracked_products
                (id, tcin, url, name, stock_state, last_checked_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.tcin)
        .bind(&product.url)
        .bind(&product.name)
        .bind(product.stock_state)
        .bind(product.last_checked_at)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(tcin = %product.tcin, name = %product.name, "Added product to ledger");
        Ok(product)
    }

    /// All tracked products in insertion order.
    pub async fn list_products(&self) -> Result<Vec<TrackedProduct>> {
        let products = sqlx::query_as::<_, TrackedProduct>(
            "SELECT * FROM tracked_products ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Record the outcome of a completed probe for one product.
    pub async fn record_probe(
        &self,
        product_id: &str,
        state: StockState,
        checked_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tracked_products
            SET stock_state = ?, last_checked_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(state)
        .bind(checked_at)
        .bind(checked_at)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<SystemSetting>> {
        let setting = sqlx::query_as::<_, SystemSetting>(
            "SELECT key, value_json FROM system_settings WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    pub async fn set_setting(&self, setting: &SystemSetting) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO system_settings (key, value_json) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json
            "#,
        )
        .bind(&setting.key)
        .bind(&setting.value_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
