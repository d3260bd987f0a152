//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, ExprTrait, QueryFilter, TransactionTrait, sea_query::Expr,
};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{click_to_active_model, link_to_active_model, model_to_link};
use crate::errors::{DeeplinkerError, Result};
use crate::storage::models::{ClickEvent, Link};

use migration::entities::{click, link};

impl SeaOrmStorage {
    /// 插入新链接，返回带 store 分配 id 的快照
    pub async fn insert_link(&self, link_data: &Link) -> Result<Link> {
        let result = link::Entity::insert(link_to_active_model(link_data))
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("插入链接失败: {}", e)))?;

        info!("Link created: {} -> {}", result.alias, result.original_url);
        Ok(model_to_link(result))
    }

    /// 删除链接及其点击记录（级联，单事务）
    ///
    /// Deleting an alias that does not exist is a successful no-op.
    pub async fn remove_link(&self, alias: &str) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("开始事务失败: {}", e)))?;

        click::Entity::delete_many()
            .filter(click::Column::Alias.eq(alias))
            .exec(&txn)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("删除点击记录失败: {}", e)))?;

        let result = link::Entity::delete_many()
            .filter(link::Column::Alias.eq(alias))
            .exec(&txn)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("删除链接失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("提交事务失败: {}", e)))?;

        if result.rows_affected > 0 {
            info!("Link deleted: {}", alias);
        }
        Ok(())
    }

    /// 单语句原子自增点击计数
    pub async fn increment_click_count(&self, alias: &str) -> Result<()> {
        link::Entity::update_many()
            .col_expr(
                link::Column::ClickCount,
                Expr::col(link::Column::ClickCount).add(1),
            )
            .filter(link::Column::Alias.eq(alias))
            .exec(&self.db)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("更新点击计数失败: {}", e)))?;
        Ok(())
    }

    /// 记录一次点击：插入点击行 + 自增计数，同一事务内完成
    ///
    /// A recorded click row and its contribution to the counter are never
    /// observed inconsistently by a concurrent reader.
    pub async fn record_click(&self, event: &ClickEvent) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("开始事务失败: {}", e)))?;

        click::Entity::insert(click_to_active_model(event))
            .exec(&txn)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("插入点击记录失败: {}", e)))?;

        link::Entity::update_many()
            .col_expr(
                link::Column::ClickCount,
                Expr::col(link::Column::ClickCount).add(1),
            )
            .filter(link::Column::Alias.eq(&event.alias))
            .exec(&txn)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("更新点击计数失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("提交事务失败: {}", e)))?;

        Ok(())
    }

    /// 删除指定时间之前的点击记录，返回删除行数
    ///
    /// Link counters are intentionally left untouched; they remain
    /// historically accurate totals after pruning.
    pub async fn delete_clicks_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = click::Entity::delete_many()
            .filter(click::Column::Timestamp.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("清理点击记录失败: {}", e)))?;

        if result.rows_affected > 0 {
            info!("Pruned {} click rows older than {}", result.rows_affected, cutoff);
        }
        Ok(result.rows_affected)
    }
}
