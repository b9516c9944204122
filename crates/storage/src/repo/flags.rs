use crate::Db;
use chrono::Utc;
use domain::{ActorId, AppError, FlagSubmission, Result, TargetType};
use uuid::Uuid;

fn flag_key(target: TargetType, target_id: Uuid, actor: &ActorId) -> String {
    format!("flag:{}:{}:{}", target.as_str(), target_id, actor.as_str())
}

impl Db {
    /// 首次提交生效;同键再次提交报冲突,不覆盖不更新
    pub async fn submit_flag(
        &self,
        target: TargetType,
        target_id: Uuid,
        actor: &ActorId,
        submission: FlagSubmission,
    ) -> Result<()> {
        self.ensure_target(target, target_id).await?;

        let _guard = self.locks.acquire(flag_key(target, target_id, actor)).await;

        let mut tx = self.pool.begin().await.map_err(AppError::internal)?;

        let existing = sqlx::query(
            r#"
            SELECT 1 FROM flags
            WHERE target_type = ? AND target_id = ? AND actor_id = ?
            "#,
        )
        .bind(target.as_str())
        .bind(target_id)
        .bind(actor.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::internal)?;

        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "{} already flagged by this user",
                target.as_str()
            )));
        }

        let insert = sqlx::query(
            r#"
            INSERT INTO flags (target_type, target_id, actor_id, reason, details, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(target.as_str())
        .bind(target_id)
        .bind(actor.as_str())
        .bind(submission.reason.as_str())
        .bind(&submission.details)
        .bind(Utc::now().naive_utc())
        .execute(&mut *tx)
        .await;

        // 主键兜底:存在性检查之外的并发插入同样判冲突
        if let Err(e) = insert {
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                return Err(AppError::Conflict(format!(
                    "{} already flagged by this user",
                    target.as_str()
                )));
            }
            return Err(AppError::internal(e));
        }

        tx.commit().await.map_err(AppError::internal)?;

        Ok(())
    }
}
