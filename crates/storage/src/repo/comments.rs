use crate::{models::SqlComment, Db};
use chrono::Utc;
use domain::{AppError, Comment, NewComment, Result, TargetType};
use uuid::Uuid;

impl Db {
    pub async fn create_comment(&self, post_id: Uuid, new: NewComment) -> Result<Comment> {
        self.ensure_target(TargetType::Post, post_id).await?;

        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            content: new.content,
            created_at: Utc::now().naive_utc(),
        };

        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, content, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::internal)?;

        Ok(comment)
    }

    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.ensure_target(TargetType::Post, post_id).await?;

        let rows: Vec<SqlComment> = sqlx::query_as(
            r#"
            SELECT id, post_id, content, created_at
            FROM comments
            WHERE post_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::internal)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
