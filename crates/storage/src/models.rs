use chrono::NaiveDateTime;
use domain::{Comment, Post};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct SqlPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl From<SqlPost> for Post {
    fn from(sql: SqlPost) -> Self {
        Post {
            id: sql.id,
            title: sql.title,
            content: sql.content,
            created_at: sql.created_at,
        }
    }
}

#[derive(FromRow)]
pub struct SqlComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl From<SqlComment> for Comment {
    fn from(sql: SqlComment) -> Self {
        Comment {
            id: sql.id,
            post_id: sql.post_id,
            content: sql.content,
            created_at: sql.created_at,
        }
    }
}

/// 聚合查询行:两列 COUNT FILTER
#[derive(FromRow)]
pub struct SqlVoteCounts {
    pub upvotes: i64,
    pub downvotes: i64,
}
