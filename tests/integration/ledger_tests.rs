use chrono::Utc;
use serde_json::json;

use restock_watcher::config::DatabaseConfig;
use restock_watcher::ledger::Ledger;
use restock_watcher::models::{NewTrackedProduct, StockState, SystemSetting};

use super::test_ledger;

fn new_product(url: &str, name: &str) -> NewTrackedProduct {
    NewTrackedProduct {
        url: url.to_string(),
        name: name.to_string(),
    }
}

#[tokio::test]
async fn test_add_and_list_products() {
    let ledger = test_ledger().await;

    let product = ledger
        .add_product(new_product(
            "https://www.target.com/p/almonds/-/A-78099811",
            "Almonds",
        ))
        .await
        .unwrap();

    assert_eq!(product.tcin, "78099811");
    assert_eq!(product.stock_state, StockState::OutOfStock);

    let products = ledger.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0], product);
}

#[tokio::test]
async fn test_invalid_url_is_never_persisted() {
    let ledger = test_ledger().await;

    let result = ledger
        .add_product(new_product("https://www.target.com/c/grocery", "Not a PDP"))
        .await;
    assert!(result.is_err());

    assert!(ledger.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_preserves_insertion_order() {
    let ledger = test_ledger().await;

    for (i, name) in ["first", "second", "third"].iter().enumerate() {
        ledger
            .add_product(new_product(
                &format!("https://x/p/n/-/A-1000000{}", i),
                name,
            ))
            .await
            .unwrap();
    }

    let names: Vec<String> = ledger
        .list_products()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_duplicate_urls_are_allowed() {
    let ledger = test_ledger().await;
    let url = "https://www.target.com/p/almonds/-/A-78099811";

    ledger.add_product(new_product(url, "Almonds")).await.unwrap();
    ledger.add_product(new_product(url, "Almonds again")).await.unwrap();

    let products = ledger.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].tcin, products[1].tcin);
    assert_ne!(products[0].id, products[1].id);
}

#[tokio::test]
async fn test_record_probe_updates_state() {
    let ledger = test_ledger().await;
    let product = ledger
        .add_product(new_product(
            "https://www.target.com/p/almonds/-/A-78099811",
            "Almonds",
        ))
        .await
        .unwrap();

    let now = Utc::now();
    ledger
        .record_probe(&product.id, StockState::InStock, now)
        .await
        .unwrap();

    let stored = &ledger.list_products().await.unwrap()[0];
    assert_eq!(stored.stock_state, StockState::InStock);
    assert_eq!(stored.last_checked_at, Some(now));
    assert_eq!(stored.created_at, product.created_at);
}

#[tokio::test]
async fn test_settings_round_trip_and_overwrite() {
    let ledger = test_ledger().await;

    assert!(ledger.get_setting("discord_webhook_url").await.unwrap().is_none());

    let setting =
        SystemSetting::new("discord_webhook_url", json!("https://discord.com/api/webhooks/1/a"))
            .unwrap();
    ledger.set_setting(&setting).await.unwrap();

    let stored = ledger.get_setting("discord_webhook_url").await.unwrap().unwrap();
    assert_eq!(
        stored.as_string().unwrap(),
        "https://discord.com/api/webhooks/1/a"
    );

    let replacement =
        SystemSetting::new("discord_webhook_url", json!("https://discord.com/api/webhooks/2/b"))
            .unwrap();
    ledger.set_setting(&replacement).await.unwrap();

    let stored = ledger.get_setting("discord_webhook_url").await.unwrap().unwrap();
    assert_eq!(
        stored.as_string().unwrap(),
        "https://discord.com/api/webhooks/2/b"
    );
}

#[tokio::test]
async fn test_ledger_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("watcher.db");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", db_path.display()),
        max_connections: 2,
        acquire_timeout: 5,
    };

    {
        let ledger = Ledger::connect(&config).await.unwrap();
        ledger
            .add_product(new_product(
                "https://www.target.com/p/almonds/-/A-78099811",
                "Almonds",
            ))
            .await
            .unwrap();
    }

    // A fresh connection sees the persisted product
    let ledger = Ledger::connect(&config).await.unwrap();
    let products = ledger.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].tcin, "78099811");
}
