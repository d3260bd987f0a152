//! Analytics 相关的数据库查询
//!
//! 提供点击日志的统计查询方法，供 AnalyticsService 调用。

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DbBackend, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, sea_query::Expr,
};

use super::SeaOrmStorage;
use super::converters::{model_to_click, model_to_link};
use crate::storage::models::{ClickEvent, Link};

use migration::entities::{click, link};

// ============ 查询结果类型 ============

/// 按天聚合结果行
#[derive(Debug, FromQueryResult)]
pub struct DateCountRow {
    pub date: String,
    pub clicks: i64,
}

/// 单字段分组统计结果行（浏览器 / 操作系统）
#[derive(Debug, FromQueryResult)]
pub struct CategoryRow {
    pub name: String,
    pub count: i64,
}

/// 设备类型分组结果行
#[derive(Debug, FromQueryResult)]
pub struct DeviceRow {
    pub device_type: String,
    pub count: i64,
    pub mobile_count: i64,
}

/// 原始 referer 分组结果行
#[derive(Debug, FromQueryResult)]
pub struct RefererRow {
    pub referer: String,
    pub count: i64,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

/// 点击日志过滤范围：可选别名 + 可选时间区间
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickScope<'a> {
    pub alias: Option<&'a str>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

fn scoped(scope: ClickScope<'_>) -> Select<click::Entity> {
    let mut query = click::Entity::find();
    if let Some(alias) = scope.alias {
        query = query.filter(click::Column::Alias.eq(alias));
    }
    if let Some(start) = scope.start {
        query = query.filter(click::Column::Timestamp.gte(start));
    }
    if let Some(end) = scope.end {
        query = query.filter(click::Column::Timestamp.lte(end));
    }
    query
}

// ============ SeaOrmStorage Analytics 方法 ============

impl SeaOrmStorage {
    fn db_backend(&self) -> DbBackend {
        match self.get_backend_name() {
            "sqlite" => DbBackend::Sqlite,
            "mysql" => DbBackend::MySql,
            _ => DbBackend::Postgres,
        }
    }

    /// 跨数据库的“按天”分桶表达式
    fn date_bucket_expr(&self) -> Expr {
        match self.db_backend() {
            DbBackend::Sqlite => Expr::cust("strftime('%Y-%m-%d', timestamp)"),
            DbBackend::MySql => Expr::cust("DATE_FORMAT(timestamp, '%Y-%m-%d')"),
            _ => Expr::cust("TO_CHAR(timestamp, 'YYYY-MM-DD')"),
        }
    }

    /// 统计范围内的点击数
    pub async fn count_clicks(&self, scope: ClickScope<'_>) -> anyhow::Result<u64> {
        scoped(scope).count(&self.db).await.map_err(Into::into)
    }

    /// 统计范围内的去重 IP 数（“独立访客”近似值）
    pub async fn count_distinct_ips(&self, scope: ClickScope<'_>) -> anyhow::Result<u64> {
        let row = scoped(scope)
            .select_only()
            .column_as(Expr::cust("COUNT(DISTINCT ip)"), "count")
            .into_model::<CountRow>()
            .one(&self.db)
            .await?;
        Ok(row.map(|r| r.count.max(0) as u64).unwrap_or(0))
    }

    /// 按天统计点击数，日期倒序，最多 `limit` 个不同日期
    pub async fn clicks_by_date(
        &self,
        scope: ClickScope<'_>,
        limit: u64,
    ) -> anyhow::Result<Vec<DateCountRow>> {
        let date_expr = self.date_bucket_expr();
        scoped(scope)
            .select_only()
            .column_as(date_expr.clone(), "date")
            .column_as(click::Column::Id.count(), "clicks")
            .group_by(date_expr)
            .order_by_desc(Expr::cust("date"))
            .limit(limit)
            .into_model::<DateCountRow>()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// 按浏览器分组统计
    pub async fn browser_stats(&self, scope: ClickScope<'_>) -> anyhow::Result<Vec<CategoryRow>> {
        scoped(scope)
            .select_only()
            .column_as(click::Column::Browser, "name")
            .column_as(click::Column::Id.count(), "count")
            .group_by(click::Column::Browser)
            .order_by_desc(Expr::cust("count"))
            .into_model::<CategoryRow>()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// 按操作系统分组统计
    pub async fn os_stats(&self, scope: ClickScope<'_>) -> anyhow::Result<Vec<CategoryRow>> {
        scoped(scope)
            .select_only()
            .column_as(click::Column::Os, "name")
            .column_as(click::Column::Id.count(), "count")
            .group_by(click::Column::Os)
            .order_by_desc(Expr::cust("count"))
            .into_model::<CategoryRow>()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// 按设备类型分组统计，同时给出每组中移动端数量
    pub async fn device_stats(&self, scope: ClickScope<'_>) -> anyhow::Result<Vec<DeviceRow>> {
        scoped(scope)
            .select_only()
            .column(click::Column::DeviceType)
            .column_as(click::Column::Id.count(), "count")
            .column_as(
                Expr::cust("SUM(CASE WHEN is_mobile THEN 1 ELSE 0 END)"),
                "mobile_count",
            )
            .group_by(click::Column::DeviceType)
            .order_by_desc(Expr::cust("count"))
            .into_model::<DeviceRow>()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// 按原始 referer 分组统计（来源归类在 service 层完成）
    pub async fn referer_stats(&self, scope: ClickScope<'_>) -> anyhow::Result<Vec<RefererRow>> {
        scoped(scope)
            .select_only()
            .column(click::Column::Referer)
            .column_as(click::Column::Id.count(), "count")
            .group_by(click::Column::Referer)
            .order_by_desc(Expr::cust("count"))
            .into_model::<RefererRow>()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// 最近的原始点击记录，时间倒序
    pub async fn recent_clicks(
        &self,
        scope: ClickScope<'_>,
        limit: u64,
    ) -> anyhow::Result<Vec<ClickEvent>> {
        let models = scoped(scope)
            .order_by_desc(click::Column::Timestamp)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_click).collect())
    }

    /// 按点击计数倒序取热门链接（平局时按创建时间倒序）
    pub async fn top_links(&self, limit: u64) -> anyhow::Result<Vec<Link>> {
        let models = link::Entity::find()
            .order_by_desc(link::Column::ClickCount)
            .order_by_desc(link::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_link).collect())
    }
}
