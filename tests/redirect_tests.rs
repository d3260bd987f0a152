//! RedirectService tests
//!
//! End-to-end resolution: lookup, click recording, device-aware target
//! selection, crawler preview rendering.

use std::sync::Arc;

use chrono::Utc;
use deeplinker::config::{AliasConfig, DatabaseConfig, RedirectConfig, ServerConfig};
use deeplinker::services::{CreateLinkRequest, LinkService, RedirectService, RequestContext, ResolveOutcome};
use deeplinker::storage::{Link, SeaOrmStorage};
use tempfile::TempDir;

const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";
const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/112.0.0.0 Mobile Safari/537.36";

// =============================================================================
// Test Setup
// =============================================================================

async fn setup_storage(dir: &TempDir) -> Arc<SeaOrmStorage> {
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}/redirect.db?mode=rwc", dir.path().display()),
        ..Default::default()
    };
    Arc::new(
        SeaOrmStorage::new(&config)
            .await
            .expect("storage init failed"),
    )
}

fn redirect_service(storage: Arc<SeaOrmStorage>) -> RedirectService {
    RedirectService::new(
        storage,
        RedirectConfig::default(),
        ServerConfig {
            public_base_url: "https://s.example.com".to_string(),
        },
    )
}

fn context(user_agent: &str) -> RequestContext {
    RequestContext {
        user_agent: user_agent.to_string(),
        ip: "203.0.113.10".to_string(),
        referer: String::new(),
        timestamp: None,
    }
}

async fn create_link(storage: &Arc<SeaOrmStorage>, alias: &str, url: &str) {
    let service = LinkService::new(storage.clone(), AliasConfig::default());
    let req = CreateLinkRequest {
        original_url: url.to_string(),
        custom_alias: Some(alias.to_string()),
        ..Default::default()
    };
    service.create(req).await.unwrap();
}

// =============================================================================
// Resolution outcomes
// =============================================================================

#[tokio::test]
async fn test_end_to_end_resolve_and_count() {
    let dir = TempDir::new().unwrap();
    let storage = setup_storage(&dir).await;
    let links = LinkService::new(storage.clone(), AliasConfig::default());
    let resolver = redirect_service(storage.clone());

    let created = links
        .create(CreateLinkRequest {
            original_url: "https://example.com/a".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.alias.len(), 6);

    let outcome = resolver
        .resolve(&created.alias, &context("curl/7.0"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ResolveOutcome::Redirect {
            target: "https://example.com/a".to_string(),
            status: 302,
        }
    );

    let link = links.get(&created.alias).await.unwrap().unwrap();
    assert_eq!(link.click_count, 1);

    let missing = resolver.resolve("zzzzzz", &context("curl/7.0")).await.unwrap();
    assert_eq!(missing, ResolveOutcome::NotFound);
}

#[tokio::test]
async fn test_unknown_alias_records_no_click() {
    let dir = TempDir::new().unwrap();
    let storage = setup_storage(&dir).await;
    let resolver = redirect_service(storage.clone());

    let outcome = resolver.resolve("nothere", &context("curl/7.0")).await.unwrap();
    assert_eq!(outcome, ResolveOutcome::NotFound);

    use deeplinker::storage::backend::ClickScope;
    let clicks = storage.count_clicks(ClickScope::default()).await.unwrap();
    assert_eq!(clicks, 0);
}

#[tokio::test]
async fn test_inactive_link_is_not_found() {
    let dir = TempDir::new().unwrap();
    let storage = setup_storage(&dir).await;
    let resolver = redirect_service(storage.clone());

    let now = Utc::now();
    let link = Link {
        id: 0,
        alias: "dormant".to_string(),
        original_url: "https://example.com".to_string(),
        title: String::new(),
        description: String::new(),
        image_url: String::new(),
        ios_url: String::new(),
        android_url: String::new(),
        desktop_url: String::new(),
        created_at: now,
        updated_at: now,
        click_count: 0,
        is_active: false,
        expires_at: None,
    };
    storage.insert_link(&link).await.unwrap();

    let outcome = resolver.resolve("dormant", &context("curl/7.0")).await.unwrap();
    assert_eq!(outcome, ResolveOutcome::NotFound);
}

#[tokio::test]
async fn test_expired_link_is_not_found() {
    let dir = TempDir::new().unwrap();
    let storage = setup_storage(&dir).await;
    let resolver = redirect_service(storage.clone());

    let now = Utc::now();
    let link = Link {
        id: 0,
        alias: "oldlink".to_string(),
        original_url: "https://example.com".to_string(),
        title: String::new(),
        description: String::new(),
        image_url: String::new(),
        ios_url: String::new(),
        android_url: String::new(),
        desktop_url: String::new(),
        created_at: now - chrono::Duration::days(30),
        updated_at: now - chrono::Duration::days(30),
        click_count: 0,
        is_active: true,
        expires_at: Some(now - chrono::Duration::days(1)),
    };
    storage.insert_link(&link).await.unwrap();

    let outcome = resolver.resolve("oldlink", &context("curl/7.0")).await.unwrap();
    assert_eq!(outcome, ResolveOutcome::NotFound);
}

// =============================================================================
// Platform-aware target selection
// =============================================================================

async fn create_link_with_overrides(storage: &Arc<SeaOrmStorage>, alias: &str) {
    let service = LinkService::new(storage.clone(), AliasConfig::default());
    let req = CreateLinkRequest {
        original_url: "https://example.com/original".to_string(),
        custom_alias: Some(alias.to_string()),
        ios_url: Some("https://example.com/ios".to_string()),
        android_url: Some("https://example.com/android".to_string()),
        desktop_url: Some("https://example.com/desktop".to_string()),
        ..Default::default()
    };
    service.create(req).await.unwrap();
}

#[tokio::test]
async fn test_platform_overrides_select_by_device() {
    let dir = TempDir::new().unwrap();
    let storage = setup_storage(&dir).await;
    let resolver = redirect_service(storage.clone());
    create_link_with_overrides(&storage, "multi1").await;

    let ios = resolver.resolve("multi1", &context(IPHONE_UA)).await.unwrap();
    assert_eq!(
        ios,
        ResolveOutcome::Redirect {
            target: "https://example.com/ios".to_string(),
            status: 302,
        }
    );

    let android = resolver.resolve("multi1", &context(ANDROID_UA)).await.unwrap();
    assert_eq!(
        android,
        ResolveOutcome::Redirect {
            target: "https://example.com/android".to_string(),
            status: 302,
        }
    );

    // Unrecognized UA classifies as desktop
    let desktop = resolver.resolve("multi1", &context("curl/7.0")).await.unwrap();
    assert_eq!(
        desktop,
        ResolveOutcome::Redirect {
            target: "https://example.com/desktop".to_string(),
            status: 302,
        }
    );
}

#[tokio::test]
async fn test_overrides_disabled_always_uses_original() {
    let dir = TempDir::new().unwrap();
    let storage = setup_storage(&dir).await;
    create_link_with_overrides(&storage, "multi2").await;

    let resolver = RedirectService::new(
        storage.clone(),
        RedirectConfig {
            platform_overrides_enabled: false,
            ..Default::default()
        },
        ServerConfig::default(),
    );

    let outcome = resolver.resolve("multi2", &context(IPHONE_UA)).await.unwrap();
    assert_eq!(
        outcome,
        ResolveOutcome::Redirect {
            target: "https://example.com/original".to_string(),
            status: 302,
        }
    );
}

// =============================================================================
// Crawler preview
// =============================================================================

#[tokio::test]
async fn test_crawler_gets_preview_page() {
    let dir = TempDir::new().unwrap();
    let storage = setup_storage(&dir).await;
    let links = LinkService::new(storage.clone(), AliasConfig::default());
    let resolver = redirect_service(storage.clone());

    links
        .create(CreateLinkRequest {
            original_url: "https://example.com/page".to_string(),
            custom_alias: Some("social".to_string()),
            title: Some("Shared Page".to_string()),
            description: Some("See this".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let outcome = resolver
        .resolve("social", &context("facebookexternalhit/1.1"))
        .await
        .unwrap();

    match outcome {
        ResolveOutcome::CrawlerPreview { html } => {
            assert!(html.contains("og:title"));
            assert!(html.contains("Shared Page"));
            assert!(html.contains("https://s.example.com/social"));
            assert!(html.contains("0;url=https://example.com/page"));
        }
        other => panic!("expected CrawlerPreview, got {:?}", other),
    }

    // The preview still counts as one click
    let link = links.get("social").await.unwrap().unwrap();
    assert_eq!(link.click_count, 1);
}

#[tokio::test]
async fn test_regular_browser_is_not_a_crawler() {
    let dir = TempDir::new().unwrap();
    let storage = setup_storage(&dir).await;
    let resolver = redirect_service(storage.clone());
    create_link(&storage, "plain1", "https://example.com/p").await;

    let outcome = resolver.resolve("plain1", &context(IPHONE_UA)).await.unwrap();
    assert!(matches!(outcome, ResolveOutcome::Redirect { .. }));
}
