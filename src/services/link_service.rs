//! Link management service
//!
//! Owns the link lifecycle: creation with alias assignment, lookup,
//! listing, and deletion. Alias uniqueness is enforced here, on top of
//! the generator, via a bounded generate-and-check loop.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::AliasConfig;
use crate::errors::{DeeplinkerError, Result};
use crate::storage::{Link, SeaOrmStorage};
use crate::utils::generate_alias;
use crate::utils::url_validator::validate_url;

/// Request to create a new link
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    /// Destination URL (required)
    pub original_url: String,
    /// Custom alias (optional, generated when absent)
    pub custom_alias: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub ios_url: Option<String>,
    pub android_url: Option<String>,
    pub desktop_url: Option<String>,
}

/// Service for link lifecycle operations
pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    alias_config: AliasConfig,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>, alias_config: AliasConfig) -> Self {
        Self {
            storage,
            alias_config,
        }
    }

    /// Create a new short link
    ///
    /// With a custom alias: fails with `AliasConflict` if the alias is
    /// already stored. Without one: generates aliases until a free one is
    /// found, capped at `alias_config.max_retries` attempts
    /// (`AliasSpaceExhausted` beyond that).
    pub async fn create(&self, req: CreateLinkRequest) -> Result<Link> {
        validate_url(&req.original_url)
            .map_err(|e| DeeplinkerError::validation(e.to_string()))?;

        let alias = match req.custom_alias.as_deref().filter(|a| !a.is_empty()) {
            Some(custom) => {
                if !is_valid_alias(custom) {
                    return Err(DeeplinkerError::validation(format!(
                        "Invalid alias '{}'. Only alphanumeric characters are allowed.",
                        custom
                    )));
                }
                if self.storage.alias_exists(custom).await? {
                    return Err(DeeplinkerError::alias_conflict(format!(
                        "Alias '{}' already exists",
                        custom
                    )));
                }
                custom.to_string()
            }
            None => self.generate_unique_alias().await?,
        };

        let now = Utc::now();
        let link = Link {
            id: 0, // assigned by the store
            alias,
            original_url: req.original_url,
            title: req.title.unwrap_or_default(),
            description: req.description.unwrap_or_default(),
            image_url: req.image_url.unwrap_or_default(),
            ios_url: req.ios_url.unwrap_or_default(),
            android_url: req.android_url.unwrap_or_default(),
            desktop_url: req.desktop_url.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            click_count: 0,
            is_active: true,
            expires_at: None,
        };

        let created = self.storage.insert_link(&link).await?;
        info!(
            "LinkService: created '{}' -> '{}'",
            created.alias, created.original_url
        );
        Ok(created)
    }

    /// Get a single link by alias
    pub async fn get(&self, alias: &str) -> Result<Option<Link>> {
        self.storage.get_link(alias).await
    }

    /// List all links, newest first
    pub async fn list(&self) -> Result<Vec<Link>> {
        self.storage.list_links().await
    }

    /// Delete a link and its click log
    ///
    /// Deleting an alias that does not exist is a successful no-op.
    pub async fn delete(&self, alias: &str) -> Result<()> {
        self.storage.remove_link(alias).await
    }

    /// Atomic counter increment; reserved for the click recorder
    pub async fn increment_click_count(&self, alias: &str) -> Result<()> {
        self.storage.increment_click_count(alias).await
    }

    async fn generate_unique_alias(&self) -> Result<String> {
        for attempt in 0..self.alias_config.max_retries {
            let candidate = generate_alias(self.alias_config.length);
            if !self.storage.alias_exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!(
                "Alias collision on attempt {}: '{}'",
                attempt + 1,
                candidate
            );
        }

        Err(DeeplinkerError::alias_space_exhausted(format!(
            "No free alias of length {} found after {} attempts",
            self.alias_config.length, self.alias_config.max_retries
        )))
    }
}

fn is_valid_alias(alias: &str) -> bool {
    !alias.is_empty() && alias.chars().all(|c| c.is_ascii_alphanumeric())
}
