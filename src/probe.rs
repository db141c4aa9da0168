//! Availability probing against Target's Redsky product-detail API.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::ProbeConfig;
use crate::models::StockStatus;
use crate::utils::error::{AppError, Result};

pub struct StockProbe {
    client: Client,
    config: ProbeConfig,
}

impl StockProbe {
    pub fn new(config: ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Issue one availability lookup for the given TCIN.
    ///
    /// A non-success HTTP status maps to `ProbeFailed` carrying the status
    /// code; network and decode failures map to their `AppError` variants.
    /// None of these mean "out of stock" — the caller must skip the state
    /// update for the cycle instead.
    pub async fn probe(&self, tcin: &str) -> Result<StockStatus> {
        let page = format!("/p/A-{}", tcin);
        let params = [
            ("key", self.config.api_key.as_str()),
            ("tcin", tcin),
            ("is_bot", "false"),
            ("store_id", self.config.store_id.as_str()),
            ("pricing_store_id", self.config.store_id.as_str()),
            ("has_pricing_store_id", "true"),
            ("has_financing_options", "true"),
            ("include_obsolete", "true"),
            ("visitor_id", self.config.visitor_id.as_str()),
            ("skip_personalized", "true"),
            ("skip_variation_hierarchy", "true"),
            ("channel", "WEB"),
            ("page", page.as_str()),
        ];

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(tcin, status = status.as_u16(), "Redsky request failed");
            return Err(AppError::ProbeFailed {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        Ok(interpret_response(&body))
    }
}

/// Interpret a Redsky product-detail response body.
///
/// In-stock is signaled by the presence of an `eligibility_rules` object
/// either directly under `product.item` or under `product.children.item`
/// (the child-SKU path used for variant products). This is a heuristic stock
/// proxy, not a guaranteed flag; it lives in this one function so a schema
/// change upstream touches nothing else.
pub fn interpret_response(body: &Value) -> StockStatus {
    let Some(product) = body.pointer("/data/product") else {
        return StockStatus::Indeterminate;
    };

    let eligible = product.pointer("/item/eligibility_rules").is_some()
        || product.pointer("/children/item/eligibility_rules").is_some();

    if eligible {
        StockStatus::InStock
    } else {
        StockStatus::OutOfStock
    }
}
