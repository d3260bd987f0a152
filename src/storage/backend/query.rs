//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::model_to_link;
use crate::errors::{DeeplinkerError, Result};
use crate::storage::models::Link;

use migration::entities::link;

impl SeaOrmStorage {
    /// 按别名查询单个链接
    pub async fn get_link(&self, alias: &str) -> Result<Option<Link>> {
        link::Entity::find()
            .filter(link::Column::Alias.eq(alias))
            .one(&self.db)
            .await
            .map(|opt| opt.map(model_to_link))
            .map_err(|e| DeeplinkerError::database_operation(format!("查询链接失败: {}", e)))
    }

    /// 检查别名是否已被占用
    pub async fn alias_exists(&self, alias: &str) -> Result<bool> {
        let count = link::Entity::find()
            .filter(link::Column::Alias.eq(alias))
            .count(&self.db)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("查询别名失败: {}", e)))?;
        Ok(count > 0)
    }

    /// 加载所有链接，按创建时间倒序
    pub async fn list_links(&self) -> Result<Vec<Link>> {
        let models = link::Entity::find()
            .order_by_desc(link::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("加载链接列表失败: {}", e)))?;

        let count = models.len();
        info!("Loaded {} links", count);
        Ok(models.into_iter().map(model_to_link).collect())
    }

    pub async fn count_links(&self) -> Result<u64> {
        link::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DeeplinkerError::database_operation(format!("统计链接失败: {}", e)))
    }
}
