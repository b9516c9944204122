use crate::{models::SqlPost, Db};
use chrono::Utc;
use domain::{AppError, NewPost, Post, Result};
use uuid::Uuid;

impl Db {
    pub async fn create_post(&self, new: NewPost) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            title: new.title,
            content: new.content,
            created_at: Utc::now().naive_utc(),
        };

        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::internal)?;

        Ok(post)
    }

    /// 按写入顺序返回;排序交给外部协作方
    pub async fn list_posts(&self, limit: i64) -> Result<Vec<Post>> {
        let rows: Vec<SqlPost> = sqlx::query_as(
            r#"
            SELECT id, title, content, created_at
            FROM posts
            ORDER BY created_at ASC, rowid ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::internal)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::Db;
    use domain::NewPost;

    #[tokio::test]
    async fn create_then_list_in_insertion_order() {
        let db = Db::new_in_memory().await.unwrap();

        let first = db
            .create_post(NewPost::new("first", "content long enough one").unwrap())
            .await
            .unwrap();
        let second = db
            .create_post(NewPost::new("second", "content long enough two").unwrap())
            .await
            .unwrap();

        let posts = db.list_posts(50).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, first.id);
        assert_eq!(posts[1].id, second.id);
        assert_eq!(posts[0].title, "first");
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let db = Db::new_in_memory().await.unwrap();
        for i in 0..5 {
            db.create_post(NewPost::new(format!("post {i}"), "content long enough").unwrap())
                .await
                .unwrap();
        }
        assert_eq!(db.list_posts(3).await.unwrap().len(), 3);
    }
}
