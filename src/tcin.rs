//! TCIN extraction from Target product page URLs.
//!
//! Product URLs carry the catalog identifier as the path segment after the
//! product slug, e.g.
//! `https://www.target.com/p/himalayan-salted-dark-chocolate-almonds/-/A-78099811`.

use crate::utils::error::{AppError, Result};

/// Extract the numeric TCIN from a product page URL.
///
/// Scans the path for the first segment starting with `A-`, strips any query
/// or fragment tail, and keeps only the decimal digits. Fails with
/// `InvalidTcin` when no such segment exists or no digits remain. Pure and
/// total: malformed input never panics.
pub fn extract_tcin(url: &str) -> Result<String> {
    for part in url.split('/') {
        if let Some(suffix) = part.strip_prefix("A-") {
            let suffix = suffix
                .split(['?', '#'])
                .next()
                .unwrap_or_default();
            let tcin: String = suffix.chars().filter(|c| c.is_ascii_digit()).collect();

            if tcin.is_empty() {
                break;
            }
            return Ok(tcin);
        }
    }

    Err(AppError::InvalidTcin {
        url: url.to_string(),
    })
}
