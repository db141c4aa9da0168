//! Notification cooldown policy.
//!
//! Two-tier decision: an out-of-stock to in-stock transition always fires
//! (edge trigger), while a product that stays in stock only fires again once
//! the cooldown window since the last send has elapsed. Anything other than a
//! definite in-stock probe suppresses, including indeterminate responses,
//! which must never produce a false "back in stock" alert.

use chrono::{DateTime, Duration, Utc};

use crate::models::{StockState, StockStatus};

/// Minimum gap between two repeat notifications for a still-in-stock product.
pub const DEFAULT_COOLDOWN_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fire,
    Suppress,
}

/// Decide whether a notification should be sent this cycle.
///
/// `prev` is the persisted state from the previous cycle, `current` the probe
/// result of this one, `last_sent` the in-memory timestamp of the most recent
/// notification for this product (None after a restart). The cooldown
/// comparison is strictly greater-than: a gap of exactly `cooldown` still
/// suppresses.
pub fn decide(
    prev: StockState,
    current: StockStatus,
    last_sent: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Decision {
    if current != StockStatus::InStock {
        return Decision::Suppress;
    }

    match prev {
        StockState::OutOfStock => Decision::Fire,
        StockState::InStock => match last_sent {
            None => Decision::Fire,
            Some(sent_at) if now - sent_at > cooldown => Decision::Fire,
            Some(_) => Decision::Suppress,
        },
    }
}
