use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::plugins::traits::{NotificationSink, SinkError, SinkReceipt, StockAlert};

const DISCORD_WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";
const EMBED_COLOR: u32 = 0x03b2f8;

/// Webhook sink posting a rich embed to a Discord channel.
pub struct DiscordSink {
    client: Client,
    webhook_url: String,
    username: Option<String>,
    avatar_url: Option<String>,
}

impl DiscordSink {
    /// The URL is taken as-is; operator-facing validation happens where the
    /// webhook is configured, so tests can point the sink at a local server.
    pub fn new(webhook_url: String, username: Option<String>, avatar_url: Option<String>) -> Self {
        DiscordSink {
            client: Client::new(),
            webhook_url,
            username,
            avatar_url,
        }
    }

    pub fn is_valid_webhook_url(url: &str) -> bool {
        url.starts_with(DISCORD_WEBHOOK_PREFIX)
    }

    fn create_embed(&self, alert: &StockAlert) -> serde_json::Value {
        json!({
            "title": "🎯 Target Product In Stock!",
            "description": format!("**{}** is now available!", alert.product_name),
            "color": EMBED_COLOR,
            "fields": [
                {
                    "name": "Product URL",
                    "value": alert.url,
                    "inline": false
                }
            ],
            "timestamp": alert.triggered_at.to_rfc3339(),
            "footer": {
                "text": "Restock Watcher"
            }
        })
    }

    fn create_webhook_payload(&self, alert: &StockAlert) -> serde_json::Value {
        let mut payload = json!({
            "embeds": [self.create_embed(alert)]
        });

        if let Some(username) = &self.username {
            payload["username"] = json!(username);
        }

        if let Some(avatar_url) = &self.avatar_url {
            payload["avatar_url"] = json!(avatar_url);
        }

        payload
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    fn name(&self) -> &str {
        "Discord Webhook"
    }

    fn sink_type(&self) -> &str {
        "discord"
    }

    fn description(&self) -> &str {
        "Posts in-stock alerts to a Discord channel via webhook embeds"
    }

    async fn send(&self, alert: &StockAlert) -> Result<SinkReceipt, SinkError> {
        let payload = self.create_webhook_payload(alert);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        response.error_for_status()?;

        Ok(SinkReceipt {
            message_id: Some(format!("discord-{}", alert.triggered_at.timestamp())),
        })
    }
}
