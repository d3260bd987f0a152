//! Redirect resolution
//!
//! Per-request state machine: look the alias up, record the click,
//! classify the device, select the target, then decide between a plain
//! 302 redirect and a crawler preview page.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::{RedirectConfig, ServerConfig};
use crate::errors::Result;
use crate::services::click_recorder::{ClickRecorder, RequestContext};
use crate::services::device::{self, DeviceInfo};
use crate::services::preview::{PreviewPage, render_preview_page};
use crate::storage::{Link, SeaOrmStorage};

/// Terminal outcome of resolving one alias request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Alias absent, inactive, or expired
    NotFound,
    /// Social crawler: HTML document with preview meta tags
    CrawlerPreview { html: String },
    /// Temporary redirect to the selected target
    Redirect { target: String, status: u16 },
}

pub struct RedirectService {
    storage: Arc<SeaOrmStorage>,
    recorder: ClickRecorder,
    redirect_config: RedirectConfig,
    server_config: ServerConfig,
}

impl RedirectService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        redirect_config: RedirectConfig,
        server_config: ServerConfig,
    ) -> Self {
        let recorder = ClickRecorder::new(storage.clone());
        Self {
            storage,
            recorder,
            redirect_config,
            server_config,
        }
    }

    /// Resolve an alias request to its terminal outcome.
    ///
    /// The click is recorded before the response is decided, exactly once
    /// per successfully resolved alias. A recording failure is logged and
    /// never blocks the redirect: availability of the redirect outranks
    /// completeness of analytics.
    pub async fn resolve(&self, alias: &str, ctx: &RequestContext) -> Result<ResolveOutcome> {
        let link = match self.storage.get_link(alias).await? {
            Some(link) if link.is_active && !link.is_expired(Utc::now()) => link,
            Some(_) => {
                debug!("Alias '{}' is inactive or expired", alias);
                return Ok(ResolveOutcome::NotFound);
            }
            None => {
                debug!("Alias '{}' not found", alias);
                return Ok(ResolveOutcome::NotFound);
            }
        };

        if let Err(e) = self.recorder.record(alias, ctx).await {
            warn!("Click recording failed for '{}': {}", alias, e);
        }

        let info = device::classify(&ctx.user_agent);
        let target = self.select_target(&link, &info);

        if device::is_social_crawler(&ctx.user_agent) {
            let html = render_preview_page(&PreviewPage {
                title: non_empty_or(&link.title, &self.redirect_config.default_title),
                description: non_empty_or(
                    &link.description,
                    &self.redirect_config.default_description,
                ),
                image_url: link.image_url.clone(),
                canonical_url: format!(
                    "{}/{}",
                    self.server_config.public_base_url.trim_end_matches('/'),
                    link.alias
                ),
                site_name: self.redirect_config.site_name.clone(),
                redirect_url: target,
            });
            return Ok(ResolveOutcome::CrawlerPreview { html });
        }

        Ok(ResolveOutcome::Redirect {
            target,
            status: 302,
        })
    }

    /// Select the destination URL for a classified request.
    ///
    /// With platform overrides disabled, every request goes to the
    /// original URL so native universal-link interception can take over.
    fn select_target(&self, link: &Link, info: &DeviceInfo) -> String {
        if !self.redirect_config.platform_overrides_enabled {
            return link.original_url.clone();
        }

        if info.is_ios && !link.ios_url.is_empty() {
            link.ios_url.clone()
        } else if info.is_android && !link.android_url.is_empty() {
            link.android_url.clone()
        } else if info.is_desktop && !link.desktop_url.is_empty() {
            link.desktop_url.clone()
        } else {
            link.original_url.clone()
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
