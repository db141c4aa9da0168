use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The alert handed to every configured sink when the cooldown policy fires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockAlert {
    pub product_name: String,
    pub url: String,
    pub tcin: String,
    pub triggered_at: DateTime<Utc>,
}

/// What a sink reports back on successful delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkReceipt {
    pub message_id: Option<String>,
}

pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Capability interface for notification delivery channels (desktop toast,
/// Discord webhook, ...). New channels implement this trait and register with
/// the dispatcher; the dispatcher itself never branches on channel type.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &str;
    fn sink_type(&self) -> &str;
    fn description(&self) -> &str;

    /// Deliver one alert. Best-effort: a failure here is logged by the
    /// dispatcher and never propagates to the poll loop.
    async fn send(&self, alert: &StockAlert) -> Result<SinkReceipt, SinkError>;
}
