//! LinkService tests
//!
//! Tests for the link registry service layer against a SQLite store.

use std::sync::Arc;

use deeplinker::config::{AliasConfig, DatabaseConfig};
use deeplinker::errors::DeeplinkerError;
use deeplinker::services::{CreateLinkRequest, LinkService};
use deeplinker::storage::SeaOrmStorage;
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

async fn setup_storage(dir: &TempDir) -> Arc<SeaOrmStorage> {
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}/links.db?mode=rwc", dir.path().display()),
        ..Default::default()
    };
    Arc::new(
        SeaOrmStorage::new(&config)
            .await
            .expect("storage init failed"),
    )
}

fn link_service(storage: Arc<SeaOrmStorage>) -> LinkService {
    LinkService::new(storage, AliasConfig::default())
}

fn create_request(url: &str) -> CreateLinkRequest {
    CreateLinkRequest {
        original_url: url.to_string(),
        ..Default::default()
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_generates_six_char_alphanumeric_alias() {
    let dir = TempDir::new().unwrap();
    let service = link_service(setup_storage(&dir).await);

    let link = service
        .create(create_request("https://example.com/a"))
        .await
        .unwrap();

    assert_eq!(link.alias.len(), 6);
    assert!(link.alias.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(link.click_count, 0);
    assert!(link.is_active);

    let fetched = service.get(&link.alias).await.unwrap().unwrap();
    assert_eq!(fetched.click_count, 0);
    assert_eq!(fetched.original_url, "https://example.com/a");
}

#[tokio::test]
async fn test_create_with_custom_alias_round_trips_fields() {
    let dir = TempDir::new().unwrap();
    let service = link_service(setup_storage(&dir).await);

    let req = CreateLinkRequest {
        original_url: "https://example.com/product".to_string(),
        custom_alias: Some("promo1".to_string()),
        title: Some("Product".to_string()),
        description: Some("A product page".to_string()),
        image_url: Some("https://cdn.example.com/p.png".to_string()),
        ios_url: Some("https://apps.example.com/ios".to_string()),
        android_url: None,
        desktop_url: None,
    };
    let created = service.create(req).await.unwrap();
    assert_eq!(created.alias, "promo1");

    let fetched = service.get("promo1").await.unwrap().unwrap();
    assert_eq!(fetched.title, "Product");
    assert_eq!(fetched.description, "A product page");
    assert_eq!(fetched.image_url, "https://cdn.example.com/p.png");
    assert_eq!(fetched.ios_url, "https://apps.example.com/ios");
    // Omitted optional fields default to the empty string
    assert_eq!(fetched.android_url, "");
    assert_eq!(fetched.desktop_url, "");
}

#[tokio::test]
async fn test_create_requires_valid_url() {
    let dir = TempDir::new().unwrap();
    let service = link_service(setup_storage(&dir).await);

    let err = service.create(create_request("")).await.unwrap_err();
    assert!(matches!(err, DeeplinkerError::Validation(_)));

    let err = service
        .create(create_request("javascript:alert(1)"))
        .await
        .unwrap_err();
    assert!(matches!(err, DeeplinkerError::Validation(_)));
}

#[tokio::test]
async fn test_duplicate_custom_alias_conflicts_without_mutation() {
    let dir = TempDir::new().unwrap();
    let service = link_service(setup_storage(&dir).await);

    let mut req = create_request("https://example.com/first");
    req.custom_alias = Some("taken1".to_string());
    service.create(req).await.unwrap();

    let mut req = create_request("https://example.com/second");
    req.custom_alias = Some("taken1".to_string());
    let err = service.create(req).await.unwrap_err();
    assert!(matches!(err, DeeplinkerError::AliasConflict(_)));

    // The original link must be untouched
    let existing = service.get("taken1").await.unwrap().unwrap();
    assert_eq!(existing.original_url, "https://example.com/first");
}

#[tokio::test]
async fn test_invalid_custom_alias_rejected() {
    let dir = TempDir::new().unwrap();
    let service = link_service(setup_storage(&dir).await);

    let mut req = create_request("https://example.com");
    req.custom_alias = Some("bad alias!".to_string());
    let err = service.create(req).await.unwrap_err();
    assert!(matches!(err, DeeplinkerError::Validation(_)));
}

// =============================================================================
// List / delete
// =============================================================================

#[tokio::test]
async fn test_list_orders_by_created_at_descending() {
    let dir = TempDir::new().unwrap();
    let service = link_service(setup_storage(&dir).await);

    for i in 0..3 {
        let mut req = create_request(&format!("https://example.com/{}", i));
        req.custom_alias = Some(format!("list{}", i));
        service.create(req).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let links = service.list().await.unwrap();
    assert_eq!(links.len(), 3);
    assert!(
        links
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    );
    assert_eq!(links[0].alias, "list2");
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let service = link_service(setup_storage(&dir).await);

    let mut req = create_request("https://example.com");
    req.custom_alias = Some("gone42".to_string());
    service.create(req).await.unwrap();

    service.delete("gone42").await.unwrap();
    assert!(service.get("gone42").await.unwrap().is_none());

    // Deleting a missing alias is a successful no-op
    service.delete("gone42").await.unwrap();
    service.delete("neverexisted").await.unwrap();
}

#[tokio::test]
async fn test_generated_alias_fails_when_namespace_is_full() {
    let dir = TempDir::new().unwrap();
    let storage = setup_storage(&dir).await;
    let service = LinkService::new(
        storage,
        AliasConfig {
            length: 1,
            max_retries: 10,
        },
    );

    // Occupy every single-character alias so generation can only collide
    let alphabet: Vec<char> = ('A'..='Z').chain('a'..='z').chain('0'..='9').collect();
    for c in &alphabet {
        let mut req = create_request("https://example.com");
        req.custom_alias = Some(c.to_string());
        service.create(req).await.unwrap();
    }

    let err = service
        .create(create_request("https://example.com/late"))
        .await
        .unwrap_err();
    assert!(matches!(err, DeeplinkerError::AliasSpaceExhausted(_)));
    assert_eq!(err.code(), "E003");
}

#[tokio::test]
async fn test_increment_click_count() {
    let dir = TempDir::new().unwrap();
    let service = link_service(setup_storage(&dir).await);

    let mut req = create_request("https://example.com");
    req.custom_alias = Some("count1".to_string());
    service.create(req).await.unwrap();

    service.increment_click_count("count1").await.unwrap();
    service.increment_click_count("count1").await.unwrap();

    let link = service.get("count1").await.unwrap().unwrap();
    assert_eq!(link.click_count, 2);
}
