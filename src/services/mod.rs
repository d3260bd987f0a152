pub mod analytics_service;
pub mod click_recorder;
pub mod device;
pub mod link_service;
pub mod preview;
pub mod redirect;

pub use analytics_service::{
    AnalyticsQuery, AnalyticsService, GlobalStats, LinkAnalytics, TopLinkEntry,
};
pub use click_recorder::{ClickRecorder, RequestContext};
pub use device::{DeviceInfo, classify, is_social_crawler};
pub use link_service::{CreateLinkRequest, LinkService};
pub use redirect::{RedirectService, ResolveOutcome};
