use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{NotificationSink, StockAlert};

pub type SinkBox = Box<dyn NotificationSink>;

/// Outcome of one delivery attempt, reported per sink.
#[derive(Debug, Clone)]
pub struct SinkOutcome {
    pub sink_type: String,
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

/// Fans a fire decision out to every registered sink. Sinks are independent:
/// one failing delivery never prevents the others and never propagates to the
/// poll loop.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sinks: Arc<RwLock<HashMap<String, SinkBox>>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self {
            sinks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a sink under its sink_type, replacing any previous one.
    pub async fn register_sink(&self, sink: SinkBox) {
        let sink_type = sink.sink_type().to_string();
        tracing::debug!(sink_type = %sink_type, "Registered notification sink");

        let mut sinks = self.sinks.write().await;
        sinks.insert(sink_type, sink);
    }

    pub async fn has_sink(&self, sink_type: &str) -> bool {
        let sinks = self.sinks.read().await;
        sinks.contains_key(sink_type)
    }

    pub async fn list_sink_types(&self) -> Vec<String> {
        let sinks = self.sinks.read().await;
        sinks.keys().cloned().collect()
    }

    pub async fn sink_count(&self) -> usize {
        let sinks = self.sinks.read().await;
        sinks.len()
    }

    /// Deliver one alert through all sinks and collect per-sink outcomes.
    pub async fn dispatch(&self, alert: &StockAlert) -> Vec<SinkOutcome> {
        let sinks = self.sinks.read().await;

        let attempts = sinks.values().map(|sink| async move {
            let sink_type = sink.sink_type().to_string();
            match sink.send(alert).await {
                Ok(receipt) => SinkOutcome {
                    sink_type,
                    success: true,
                    message_id: receipt.message_id,
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(sink_type = %sink_type, error = %e, "Notification delivery failed");
                    SinkOutcome {
                        sink_type,
                        success: false,
                        message_id: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        });

        join_all(attempts).await
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
