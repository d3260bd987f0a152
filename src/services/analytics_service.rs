//! Analytics service layer
//!
//! Aggregates the click log into per-link reports, top-link rankings and
//! store-wide stats. Groupings are computed by the store; the referrer
//! taxonomy is folded here in the service layer from the raw grouped
//! rows, which keeps the mapping testable without a database.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AnalyticsConfig;
use crate::errors::{DeeplinkerError, Result};
use crate::storage::SeaOrmStorage;
use crate::storage::backend::ClickScope;

/// At most this many distinct days appear in a date series.
const DATE_SERIES_LIMIT: u64 = 30;

// ============ Query / report types ============

/// Optional time window and row cap for a per-link report.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Cap on raw click rows returned; service default applies when unset
    pub limit: Option<u64>,
}

/// 按天点击数
#[derive(Debug, Clone, Serialize)]
pub struct DateCount {
    pub date: String,
    pub clicks: u64,
}

/// 单字段分组统计
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

/// 设备类型分组统计
#[derive(Debug, Clone, Serialize)]
pub struct DeviceCount {
    pub device_type: String,
    pub count: u64,
    pub mobile_count: u64,
}

/// 来源归类统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: u64,
}

/// 原始点击记录投影
#[derive(Debug, Clone, Serialize)]
pub struct RecentClick {
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub browser: String,
    pub os: String,
    pub referer: String,
}

/// 单链接分析报告
#[derive(Debug, Clone, Serialize)]
pub struct LinkAnalytics {
    pub alias: String,
    pub total_clicks: u64,
    /// Distinct-IP approximation, not a true visitor identity
    pub unique_visitors: u64,
    pub clicks_by_date: Vec<DateCount>,
    pub browser_stats: Vec<CategoryCount>,
    pub os_stats: Vec<CategoryCount>,
    pub device_stats: Vec<DeviceCount>,
    pub referrer_stats: Vec<SourceCount>,
    pub recent_clicks: Vec<RecentClick>,
    pub generated_at: DateTime<Utc>,
}

/// 热门链接条目
#[derive(Debug, Clone, Serialize)]
pub struct TopLinkEntry {
    pub alias: String,
    pub original_url: String,
    pub title: String,
    pub click_count: u64,
    pub created_at: DateTime<Utc>,
}

/// 全局统计报告
#[derive(Debug, Clone, Serialize)]
pub struct GlobalStats {
    pub total_links: u64,
    pub total_clicks: u64,
    pub unique_visitors: u64,
    pub clicks_by_date: Vec<DateCount>,
}

// ============ AnalyticsService ============

pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>, config: AnalyticsConfig) -> Self {
        Self { storage, config }
    }

    /// 解析日期，支持 RFC3339 和 YYYY-MM-DD 格式
    pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            })
            .ok_or_else(|| {
                DeeplinkerError::date_parse(format!(
                    "Invalid date format: '{}'. Supported formats: RFC3339 or YYYY-MM-DD",
                    s
                ))
            })
    }

    /// 单链接详细统计；别名不存在时返回 NotFound
    pub async fn get_link_analytics(
        &self,
        alias: &str,
        query: AnalyticsQuery,
    ) -> Result<LinkAnalytics> {
        info!(
            "Analytics: get_link_analytics for '{}' from {:?} to {:?}",
            alias, query.start_date, query.end_date
        );

        if !self.storage.alias_exists(alias).await? {
            return Err(DeeplinkerError::not_found(format!(
                "Link '{}' not found",
                alias
            )));
        }

        let scope = ClickScope {
            alias: Some(alias),
            start: query.start_date,
            end: query.end_date,
        };
        let limit = query.limit.unwrap_or(self.config.default_recent_limit);

        let (total_clicks, unique_visitors, date_rows, browser_rows, os_rows, device_rows) =
            tokio::try_join!(
                self.storage.count_clicks(scope),
                self.storage.count_distinct_ips(scope),
                self.storage.clicks_by_date(scope, DATE_SERIES_LIMIT),
                self.storage.browser_stats(scope),
                self.storage.os_stats(scope),
                self.storage.device_stats(scope),
            )
            .map_err(|e| DeeplinkerError::database_operation(e.to_string()))?;

        let (referer_rows, recent_rows) = tokio::try_join!(
            self.storage.referer_stats(scope),
            self.storage.recent_clicks(scope, limit),
        )
        .map_err(|e| DeeplinkerError::database_operation(e.to_string()))?;

        let referrer_stats = fold_referrer_sources(
            referer_rows
                .into_iter()
                .map(|r| (r.referer, r.count.max(0) as u64)),
        );

        let report = LinkAnalytics {
            alias: alias.to_string(),
            total_clicks,
            unique_visitors,
            clicks_by_date: date_rows
                .into_iter()
                .map(|r| DateCount {
                    date: r.date,
                    clicks: r.clicks.max(0) as u64,
                })
                .collect(),
            browser_stats: browser_rows
                .into_iter()
                .map(|r| CategoryCount {
                    name: r.name,
                    count: r.count.max(0) as u64,
                })
                .collect(),
            os_stats: os_rows
                .into_iter()
                .map(|r| CategoryCount {
                    name: r.name,
                    count: r.count.max(0) as u64,
                })
                .collect(),
            device_stats: device_rows
                .into_iter()
                .map(|r| DeviceCount {
                    device_type: r.device_type,
                    count: r.count.max(0) as u64,
                    mobile_count: r.mobile_count.max(0) as u64,
                })
                .collect(),
            referrer_stats,
            recent_clicks: recent_rows
                .into_iter()
                .map(|c| RecentClick {
                    timestamp: c.timestamp,
                    ip: c.ip,
                    browser: c.browser,
                    os: c.os,
                    referer: c.referer,
                })
                .collect(),
            generated_at: Utc::now(),
        };

        debug!(
            "Analytics: '{}' report with {} clicks, {} date buckets",
            alias,
            report.total_clicks,
            report.clicks_by_date.len()
        );
        Ok(report)
    }

    /// 热门链接，按点击计数倒序（平局时创建时间倒序）
    pub async fn get_top_links(&self, limit: u64) -> Result<Vec<TopLinkEntry>> {
        let links = self
            .storage
            .top_links(limit)
            .await
            .map_err(|e| DeeplinkerError::database_operation(e.to_string()))?;

        Ok(links
            .into_iter()
            .map(|link| TopLinkEntry {
                alias: link.alias,
                original_url: link.original_url,
                title: link.title,
                click_count: link.click_count,
                created_at: link.created_at,
            })
            .collect())
    }

    /// 全局统计：链接总数、点击总数、独立访客、最近 30 天按天点击
    pub async fn get_global_stats(&self) -> Result<GlobalStats> {
        let all = ClickScope::default();
        let last_30_days = ClickScope {
            alias: None,
            start: Some(Utc::now() - Duration::days(30)),
            end: None,
        };

        let (total_links, total_clicks, unique_visitors, date_rows) = tokio::try_join!(
            async {
                self.storage
                    .count_links()
                    .await
                    .map_err(|e| anyhow::anyhow!(e))
            },
            self.storage.count_clicks(all),
            self.storage.count_distinct_ips(all),
            self.storage.clicks_by_date(last_30_days, DATE_SERIES_LIMIT),
        )
        .map_err(|e| DeeplinkerError::database_operation(e.to_string()))?;

        Ok(GlobalStats {
            total_links,
            total_clicks,
            unique_visitors,
            clicks_by_date: date_rows
                .into_iter()
                .map(|r| DateCount {
                    date: r.date,
                    clicks: r.clicks.max(0) as u64,
                })
                .collect(),
        })
    }

    /// 保留窗口之外的点击记录清理，返回删除行数
    ///
    /// Link counters are not recomputed after pruning; they remain
    /// historically accurate totals and will diverge from the row count.
    pub async fn clean_old_data(&self, days_to_keep: Option<u64>) -> Result<u64> {
        let days = days_to_keep.unwrap_or(self.config.retention_days);
        let cutoff = Utc::now() - Duration::days(days as i64);

        let deleted = self.storage.delete_clicks_before(cutoff).await?;
        info!(
            "Analytics: pruned {} click rows older than {} days",
            deleted, days
        );
        Ok(deleted)
    }
}

// ============ Referrer taxonomy ============

/// Fixed referrer taxonomy, matched by substring against the raw referer.
pub fn classify_referrer(referer: &str) -> &'static str {
    if referer.is_empty() {
        return "Direct";
    }
    let lower = referer.to_lowercase();
    if lower.contains("facebook") {
        "Facebook"
    } else if lower.contains("twitter") || lower.contains("t.co") {
        "Twitter"
    } else if lower.contains("linkedin") {
        "LinkedIn"
    } else if lower.contains("whatsapp") {
        "WhatsApp"
    } else if lower.contains("telegram") {
        "Telegram"
    } else if lower.contains("google") {
        "Google"
    } else {
        "Other"
    }
}

/// Fold raw (referer, count) rows into taxonomy buckets,
/// ordered by count descending (source name ascending on ties).
fn fold_referrer_sources<I: IntoIterator<Item = (String, u64)>>(rows: I) -> Vec<SourceCount> {
    let mut buckets: HashMap<&'static str, u64> = HashMap::new();
    for (referer, count) in rows {
        *buckets.entry(classify_referrer(&referer)).or_insert(0) += count;
    }

    let mut sources: Vec<SourceCount> = buckets
        .into_iter()
        .map(|(source, count)| SourceCount {
            source: source.to_string(),
            count,
        })
        .collect();
    sources.sort_by(|a, b| b.count.cmp(&a.count).then(a.source.cmp(&b.source)));
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_referrer_taxonomy() {
        assert_eq!(classify_referrer(""), "Direct");
        assert_eq!(classify_referrer("https://m.facebook.com/x"), "Facebook");
        assert_eq!(classify_referrer("https://twitter.com/x"), "Twitter");
        assert_eq!(classify_referrer("https://t.co/abc"), "Twitter");
        assert_eq!(classify_referrer("https://www.linkedin.com/feed"), "LinkedIn");
        assert_eq!(classify_referrer("https://web.whatsapp.com/"), "WhatsApp");
        assert_eq!(classify_referrer("https://web.telegram.org/"), "Telegram");
        assert_eq!(classify_referrer("https://www.google.com/search"), "Google");
        assert_eq!(classify_referrer("https://news.ycombinator.com/"), "Other");
    }

    #[test]
    fn test_fold_referrer_sources_merges_and_orders() {
        let rows = vec![
            ("https://t.co/a".to_string(), 3),
            ("https://twitter.com/b".to_string(), 2),
            ("".to_string(), 4),
            ("https://example.org".to_string(), 1),
        ];
        let sources = fold_referrer_sources(rows);

        assert_eq!(
            sources[0],
            SourceCount {
                source: "Twitter".to_string(),
                count: 5
            }
        );
        assert_eq!(
            sources[1],
            SourceCount {
                source: "Direct".to_string(),
                count: 4
            }
        );
        assert_eq!(
            sources[2],
            SourceCount {
                source: "Other".to_string(),
                count: 1
            }
        );
    }

    #[test]
    fn test_source_count_json_shape() {
        let sources = fold_referrer_sources(vec![("https://t.co/a".to_string(), 2)]);
        let json = serde_json::to_value(&sources).unwrap();
        assert_eq!(json, serde_json::json!([{"source": "Twitter", "count": 2}]));
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(AnalyticsService::parse_date("2026-08-01").is_ok());
        assert!(AnalyticsService::parse_date("2026-08-01T12:30:00Z").is_ok());
        assert!(AnalyticsService::parse_date("August 1st").is_err());
    }
}
