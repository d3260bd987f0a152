use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored short link.
///
/// Instances returned from the storage layer are snapshots; mutating one
/// never affects stored state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Opaque internal id, assigned by the store at creation
    pub id: i64,
    pub alias: String,
    pub original_url: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub ios_url: String,
    pub android_url: String,
    pub desktop_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub click_count: u64,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Link {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }
}

/// One recorded resolution event for an alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub id: String,
    pub alias: String,
    pub ip: String,
    pub user_agent: String,
    /// Empty string when the request carried no referer, never null
    pub referer: String,
    pub timestamp: DateTime<Utc>,
    pub browser: String,
    pub os: String,
    pub device_type: String,
    pub is_mobile: bool,
    /// Populated by an external geo collaborator, unset in this core
    pub country: Option<String>,
    pub city: Option<String>,
}
