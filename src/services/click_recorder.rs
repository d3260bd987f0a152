//! Click recording
//!
//! Appends one click row per resolved request and bumps the link's
//! counter. Both writes happen in a single storage transaction so a
//! concurrent reader never sees the row without its counter contribution.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::errors::Result;
use crate::services::device;
use crate::storage::{ClickEvent, SeaOrmStorage};

/// Request metadata captured for one click.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_agent: String,
    pub ip: String,
    /// May be empty; stored as "" rather than null
    pub referer: String,
    /// Supplied by the caller when replaying events; defaults to now
    pub timestamp: Option<DateTime<Utc>>,
}

pub struct ClickRecorder {
    storage: Arc<SeaOrmStorage>,
}

impl ClickRecorder {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Record one click for `alias`, returning the opaque click id.
    ///
    /// Device classification is always derived here from the raw
    /// user-agent; callers never pass pre-classified fields.
    pub async fn record(&self, alias: &str, ctx: &RequestContext) -> Result<String> {
        let info = device::classify(&ctx.user_agent);

        let event = ClickEvent {
            id: Uuid::new_v4().to_string(),
            alias: alias.to_string(),
            ip: ctx.ip.clone(),
            user_agent: ctx.user_agent.clone(),
            referer: ctx.referer.clone(),
            timestamp: ctx.timestamp.unwrap_or_else(Utc::now),
            browser: info.browser,
            os: info.os,
            device_type: info.device_type,
            is_mobile: info.is_mobile,
            // geo lookup is an external collaborator, left unset here
            country: None,
            city: None,
        };

        self.storage.record_click(&event).await?;

        debug!("Click recorded for '{}': {}", alias, event.id);
        Ok(event.id)
    }
}
