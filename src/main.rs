use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::info;

use restock_watcher::config::AppConfig;
use restock_watcher::ledger::Ledger;
use restock_watcher::monitor::StockMonitor;
use restock_watcher::plugins::NotificationDispatcher;
use restock_watcher::plugins::notifiers::{DesktopSink, DiscordSink};
use restock_watcher::probe::StockProbe;

#[derive(Parser)]
#[command(name = "restock-watcher", about = "Target restock monitor", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Track a new product
    Add {
        /// Target product page URL (https://www.target.com/p/<slug>/-/A-<tcin>)
        #[arg(long)]
        url: String,
        /// Display name for notifications
        #[arg(long)]
        name: String,
    },
    /// List tracked products
    List,
    /// Run the availability poll loop until interrupted
    Watch {
        /// Seconds between full cycles (overrides configuration)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Save the Discord webhook URL used for in-stock alerts
    SetWebhook { webhook_url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("restock_watcher=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    let ledger = Ledger::connect(&config.database).await?;

    match cli.command {
        Command::Add { url, name } => {
            let monitor = build_monitor(ledger, &config)?;
            let product = monitor.add_product(&url, &name).await?;
            println!("Added {} (TCIN {})", product.name, product.tcin);
        }
        Command::List => {
            let monitor = build_monitor(ledger, &config)?;
            let products = monitor.list_products().await?;
            if products.is_empty() {
                println!("No products tracked yet");
            }
            for product in products {
                println!(
                    "{} [{}] {:?} last checked: {}",
                    product.name,
                    product.tcin,
                    product.stock_state,
                    product
                        .last_checked_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "never".to_string()),
                );
            }
        }
        Command::SetWebhook { webhook_url } => {
            let monitor = build_monitor(ledger, &config)?;
            monitor.set_webhook(&webhook_url).await?;
            println!("Discord webhook URL saved");
        }
        Command::Watch { interval } => {
            if let Some(secs) = interval {
                config.monitor.cycle_interval_secs = secs;
            }

            let mut monitor = build_monitor(ledger, &config)?;
            register_sinks(&monitor, &config).await?;

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutdown signal received");
                    let _ = shutdown_tx.send(true);
                }
            });

            monitor.run(shutdown_rx).await?;
        }
    }

    Ok(())
}

fn build_monitor(ledger: Ledger, config: &AppConfig) -> Result<StockMonitor> {
    let probe = StockProbe::new(config.probe.clone())?;
    let dispatcher = NotificationDispatcher::new();
    Ok(StockMonitor::new(
        ledger,
        probe,
        dispatcher,
        config.monitor.clone(),
    ))
}

async fn register_sinks(monitor: &StockMonitor, config: &AppConfig) -> Result<()> {
    if config.notifications.desktop.enabled {
        monitor
            .dispatcher()
            .register_sink(Box::new(DesktopSink::new(
                config.notifications.desktop.timeout_secs,
            )))
            .await;
    }

    // The webhook stored in the ledger wins over the config file
    let webhook_url = match monitor.webhook_url().await? {
        Some(url) => Some(url),
        None => config.notifications.discord.webhook_url.clone(),
    };

    if let Some(url) = webhook_url {
        monitor
            .dispatcher()
            .register_sink(Box::new(DiscordSink::new(
                url,
                Some(config.notifications.discord.username.clone()),
                config.notifications.discord.avatar_url.clone(),
            )))
            .await;
        info!("Discord webhook sink enabled");
    }

    Ok(())
}
