use crate::{models::SqlVoteCounts, Db};
use chrono::Utc;
use domain::{ActorId, AppError, Result, TargetType, VoteAggregate, VoteState};
use uuid::Uuid;

fn vote_key(target: TargetType, target_id: Uuid, actor: &ActorId) -> String {
    format!("vote:{}:{}:{}", target.as_str(), target_id, actor.as_str())
}

fn state_from_db(s: &str) -> VoteState {
    match s {
        "upvote" => VoteState::Upvote,
        "downvote" => VoteState::Downvote,
        _ => VoteState::None,
    }
}

impl Db {
    /// 状态机:同向重投 => 撤销;其余 => 一步切换到请求方向。
    /// 记录变更和聚合重算在同一事务里提交,读者看不到半程状态。
    pub async fn apply_vote(
        &self,
        target: TargetType,
        target_id: Uuid,
        actor: &ActorId,
        requested: VoteState,
    ) -> Result<VoteAggregate> {
        if requested == VoteState::None {
            return Err(AppError::validation(
                "vote_type must be 'upvote' or 'downvote'",
            ));
        }
        self.ensure_target(target, target_id).await?;

        let _guard = self.locks.acquire(vote_key(target, target_id, actor)).await;

        let mut tx = self.pool.begin().await.map_err(AppError::internal)?;

        let existing: Option<String> = sqlx::query_scalar(
            r#"
            SELECT vote_state FROM votes
            WHERE target_type = ? AND target_id = ? AND actor_id = ?
            "#,
        )
        .bind(target.as_str())
        .bind(target_id)
        .bind(actor.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::internal)?;

        let user_vote = match existing.as_deref() {
            Some(state) if state == requested.as_str() => {
                sqlx::query(
                    r#"
                    DELETE FROM votes
                    WHERE target_type = ? AND target_id = ? AND actor_id = ?
                    "#,
                )
                .bind(target.as_str())
                .bind(target_id)
                .bind(actor.as_str())
                .execute(&mut *tx)
                .await
                .map_err(AppError::internal)?;
                VoteState::None
            }
            _ => {
                sqlx::query(
                    r#"
                    INSERT INTO votes (target_type, target_id, actor_id, vote_state, created_at)
                    VALUES (?, ?, ?, ?, ?)
                    ON CONFLICT(target_type, target_id, actor_id)
                    DO UPDATE SET vote_state = excluded.vote_state,
                                  created_at = excluded.created_at
                    "#,
                )
                .bind(target.as_str())
                .bind(target_id)
                .bind(actor.as_str())
                .bind(requested.as_str())
                .bind(Utc::now().naive_utc())
                .execute(&mut *tx)
                .await
                .map_err(AppError::internal)?;
                requested
            }
        };

        let counts = count_votes(&mut tx, target, target_id).await?;

        tx.commit().await.map_err(AppError::internal)?;

        Ok(VoteAggregate::new(counts.upvotes, counts.downvotes, user_vote))
    }

    pub async fn vote_aggregate(
        &self,
        target: TargetType,
        target_id: Uuid,
        actor: &ActorId,
    ) -> Result<VoteAggregate> {
        self.ensure_target(target, target_id).await?;

        let counts: SqlVoteCounts = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE vote_state = 'upvote')   AS upvotes,
                   COUNT(*) FILTER (WHERE vote_state = 'downvote') AS downvotes
            FROM votes
            WHERE target_type = ? AND target_id = ?
            "#,
        )
        .bind(target.as_str())
        .bind(target_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::internal)?;

        let user: Option<String> = sqlx::query_scalar(
            r#"
            SELECT vote_state FROM votes
            WHERE target_type = ? AND target_id = ? AND actor_id = ?
            "#,
        )
        .bind(target.as_str())
        .bind(target_id)
        .bind(actor.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::internal)?;

        let user_vote = user.as_deref().map(state_from_db).unwrap_or(VoteState::None);

        Ok(VoteAggregate::new(counts.upvotes, counts.downvotes, user_vote))
    }
}

async fn count_votes(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    target: TargetType,
    target_id: Uuid,
) -> Result<SqlVoteCounts> {
    sqlx::query_as(
        r#"
        SELECT COUNT(*) FILTER (WHERE vote_state = 'upvote')   AS upvotes,
               COUNT(*) FILTER (WHERE vote_state = 'downvote') AS downvotes
        FROM votes
        WHERE target_type = ? AND target_id = ?
        "#,
    )
    .bind(target.as_str())
    .bind(target_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::internal)
}
