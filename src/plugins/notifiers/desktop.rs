use async_trait::async_trait;
use notify_rust::{Notification, Timeout};

use crate::plugins::traits::{NotificationSink, SinkError, SinkReceipt, StockAlert};

/// Local desktop toast sink. Fire-and-forget: there is no return channel, so
/// a successful `show` is treated as delivered.
pub struct DesktopSink {
    timeout_secs: u32,
}

impl DesktopSink {
    pub fn new(timeout_secs: u32) -> Self {
        DesktopSink { timeout_secs }
    }

    fn message_body(alert: &StockAlert) -> String {
        format!("{} is now in stock!\n{}", alert.product_name, alert.url)
    }
}

impl Default for DesktopSink {
    fn default() -> Self {
        Self::new(10)
    }
}

#[async_trait]
impl NotificationSink for DesktopSink {
    fn name(&self) -> &str {
        "Desktop Alert"
    }

    fn sink_type(&self) -> &str {
        "desktop"
    }

    fn description(&self) -> &str {
        "Shows an in-stock toast notification on the local desktop"
    }

    async fn send(&self, alert: &StockAlert) -> Result<SinkReceipt, SinkError> {
        let body = Self::message_body(alert);
        let timeout_ms = self.timeout_secs.saturating_mul(1000);

        // notify-rust's show() blocks on the notification bus
        tokio::task::spawn_blocking(move || {
            Notification::new()
                .summary("Target Product In Stock!")
                .body(&body)
                .timeout(Timeout::Milliseconds(timeout_ms))
                .show()
                .map(|_| ())
        })
        .await??;

        Ok(SinkReceipt { message_id: None })
    }
}
