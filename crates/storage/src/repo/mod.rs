mod comments;
mod flags;
mod posts;
mod votes;

use crate::Db;
use domain::{AppError, Result, TargetType};
use uuid::Uuid;

impl Db {
    /// 帖子和评论都不可删除,存在性检查没有 TOCTOU 窗口
    pub(crate) async fn target_exists(&self, target: TargetType, id: Uuid) -> Result<bool> {
        let sql = match target {
            TargetType::Post => "SELECT 1 FROM posts WHERE id = ?",
            TargetType::Comment => "SELECT 1 FROM comments WHERE id = ?",
        };
        let row = sqlx::query(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::internal)?;
        Ok(row.is_some())
    }

    pub(crate) async fn ensure_target(&self, target: TargetType, id: Uuid) -> Result<()> {
        if self.target_exists(target, id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(target.as_str()))
        }
    }
}
