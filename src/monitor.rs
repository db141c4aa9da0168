//! Poll loop orchestrator.
//!
//! Drives the probe → decide → dispatch → persist cycle for every ledger
//! entry, sequentially and in ledger order. Sequential probing bounds the
//! request rate against the upstream API and keeps ledger writes single-
//! writer. Cancellation is checked at every delay point, so an interrupt
//! never has to wait out a full cycle.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::ledger::Ledger;
use crate::models::{
    NewTrackedProduct, SETTING_DISCORD_WEBHOOK, StockState, StockStatus, SystemSetting,
    TrackedProduct,
};
use crate::plugins::notifiers::DiscordSink;
use crate::plugins::{NotificationDispatcher, StockAlert};
use crate::policy::{self, Decision};
use crate::probe::StockProbe;
use crate::utils::error::{AppError, Result};

/// Counters for one completed (or interrupted) poll cycle.
#[derive(Debug, Default, Clone)]
pub struct CycleSummary {
    pub products_checked: usize,
    pub probe_failures: usize,
    pub in_stock: usize,
    pub notifications_sent: usize,
    pub interrupted: bool,
}

pub struct StockMonitor {
    ledger: Ledger,
    probe: StockProbe,
    dispatcher: NotificationDispatcher,
    config: MonitorConfig,
    /// Last notification time per TCIN. Process-lifetime only: a restart
    /// resets cooldowns but not stock state.
    last_notified: HashMap<String, DateTime<Utc>>,
}

impl StockMonitor {
    pub fn new(
        ledger: Ledger,
        probe: StockProbe,
        dispatcher: NotificationDispatcher,
        config: MonitorConfig,
    ) -> Self {
        Self {
            ledger,
            probe,
            dispatcher,
            config,
            last_notified: HashMap::new(),
        }
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Start tracking a product. The URL must carry a numeric TCIN or the
    /// product is rejected before anything is persisted.
    pub async fn add_product(&self, url: &str, name: &str) -> Result<TrackedProduct> {
        self.ledger
            .add_product(NewTrackedProduct {
                url: url.to_string(),
                name: name.to_string(),
            })
            .await
    }

    pub async fn list_products(&self) -> Result<Vec<TrackedProduct>> {
        self.ledger.list_products().await
    }

    /// Persist the Discord webhook URL. The stored value survives restarts
    /// and takes precedence over the config file.
    pub async fn set_webhook(&self, webhook_url: &str) -> Result<()> {
        if !DiscordSink::is_valid_webhook_url(webhook_url) {
            return Err(AppError::Validation(
                "Discord webhook URLs must start with https://discord.com/api/webhooks/"
                    .to_string(),
            ));
        }

        let setting = SystemSetting::new(SETTING_DISCORD_WEBHOOK, json!(webhook_url))?;
        self.ledger.set_setting(&setting).await?;
        info!("Discord webhook URL saved");
        Ok(())
    }

    pub async fn webhook_url(&self) -> Result<Option<String>> {
        Ok(self
            .ledger
            .get_setting(SETTING_DISCORD_WEBHOOK)
            .await?
            .and_then(|s| s.as_string()))
    }

    /// Run the poll loop until the shutdown signal fires.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            interval_secs = self.config.cycle_interval_secs,
            cooldown_secs = self.config.cooldown_secs,
            "Starting stock monitor"
        );

        loop {
            let summary = self.run_cycle(Utc::now(), &mut shutdown).await?;
            info!(
                checked = summary.products_checked,
                in_stock = summary.in_stock,
                notifications = summary.notifications_sent,
                probe_failures = summary.probe_failures,
                "Cycle complete"
            );

            if summary.interrupted {
                break;
            }

            debug!(
                secs = self.config.cycle_interval_secs,
                "Waiting before next cycle"
            );
            if sleep_or_shutdown(
                Duration::from_secs(self.config.cycle_interval_secs),
                &mut shutdown,
            )
            .await
            {
                break;
            }
        }

        info!("Stock monitor stopped");
        Ok(())
    }

    /// Run one cycle over the current ledger. `now` is the timestamp used for
    /// every policy decision and ledger write in the cycle; taking it as a
    /// parameter keeps cooldown behavior deterministic under test.
    pub async fn run_cycle(
        &mut self,
        now: DateTime<Utc>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<CycleSummary> {
        let products = self.ledger.list_products().await?;
        let mut summary = CycleSummary::default();
        let product_delay = Duration::from_secs(self.config.product_delay_secs);

        for (index, product) in products.iter().enumerate() {
            if *shutdown.borrow() {
                summary.interrupted = true;
                return Ok(summary);
            }

            // Politeness delay between products within the same cycle
            if index > 0
                && !product_delay.is_zero()
                && sleep_or_shutdown(product_delay, shutdown).await
            {
                summary.interrupted = true;
                return Ok(summary);
            }

            self.check_product(product, now, &mut summary).await?;
        }

        Ok(summary)
    }

    async fn check_product(
        &mut self,
        product: &TrackedProduct,
        now: DateTime<Utc>,
        summary: &mut CycleSummary,
    ) -> Result<()> {
        debug!(name = %product.name, tcin = %product.tcin, "Checking product");

        let status = match self.probe.probe(&product.tcin).await {
            Ok(status) => status,
            Err(e) => {
                // A failed probe leaves the product unresolved for this cycle,
                // so the next successful probe cannot fake a restock edge.
                warn!(
                    name = %product.name,
                    tcin = %product.tcin,
                    error = %e,
                    "Probe failed, skipping product this cycle"
                );
                summary.probe_failures += 1;
                return Ok(());
            }
        };

        summary.products_checked += 1;
        if status == StockStatus::InStock {
            summary.in_stock += 1;
        }

        let cooldown = ChronoDuration::seconds(self.config.cooldown_secs as i64);
        let last_sent = self.last_notified.get(&product.tcin).copied();

        if policy::decide(product.stock_state, status, last_sent, now, cooldown) == Decision::Fire {
            info!(name = %product.name, tcin = %product.tcin, "In stock, dispatching notifications");

            let alert = StockAlert {
                product_name: product.name.clone(),
                url: product.url.clone(),
                tcin: product.tcin.clone(),
                triggered_at: now,
            };

            let outcomes = self.dispatcher.dispatch(&alert).await;
            for outcome in &outcomes {
                if outcome.success {
                    debug!(sink = %outcome.sink_type, "Notification delivered");
                }
            }

            self.last_notified.insert(product.tcin.clone(), now);
            summary.notifications_sent += 1;
        }

        self.ledger
            .record_probe(&product.id, StockState::from_status(status), now)
            .await?;

        Ok(())
    }
}

/// Sleep for `duration`, returning early with `true` when the shutdown
/// signal fires (or its sender is dropped).
async fn sleep_or_shutdown(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = shutdown.changed() => true,
    }
}
