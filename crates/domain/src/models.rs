use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::AppError;

pub const TITLE_MIN_CHARS: usize = 1;
pub const TITLE_MAX_CHARS: usize = 100;
pub const POST_CONTENT_MIN_CHARS: usize = 10;
pub const POST_CONTENT_MAX_CHARS: usize = 5000;
pub const COMMENT_MIN_CHARS: usize = 3;
pub const COMMENT_MAX_CHARS: usize = 1000;
pub const FLAG_DETAILS_MAX_CHARS: usize = 500;

/// 匿名 actor 指纹,由来源地址 + 服务端盐派生,不可逆
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// 校验过的建帖输入,trim 后检查长度边界
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Result<Self, AppError> {
        let title = title.into().trim().to_string();
        let content = content.into().trim().to_string();

        let title_len = title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
            return Err(AppError::validation(format!(
                "title must be {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} characters"
            )));
        }

        let content_len = content.chars().count();
        if !(POST_CONTENT_MIN_CHARS..=POST_CONTENT_MAX_CHARS).contains(&content_len) {
            return Err(AppError::validation(format!(
                "content must be {POST_CONTENT_MIN_CHARS}-{POST_CONTENT_MAX_CHARS} characters"
            )));
        }

        Ok(Self { title, content })
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
}

impl NewComment {
    pub fn new(content: impl Into<String>) -> Result<Self, AppError> {
        let content = content.into().trim().to_string();

        let len = content.chars().count();
        if !(COMMENT_MIN_CHARS..=COMMENT_MAX_CHARS).contains(&len) {
            return Err(AppError::validation(format!(
                "comment must be {COMMENT_MIN_CHARS}-{COMMENT_MAX_CHARS} characters"
            )));
        }

        Ok(Self { content })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Post,
    Comment,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    None,
    Upvote,
    Downvote,
}

impl VoteState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
        }
    }

    /// 请求里只接受明确的方向,none 只能通过同向重投产生
    pub fn parse_request(s: &str) -> Result<Self, AppError> {
        match s {
            "upvote" => Ok(Self::Upvote),
            "downvote" => Ok(Self::Downvote),
            _ => Err(AppError::validation(
                "vote_type must be 'upvote' or 'downvote'",
            )),
        }
    }
}

/// 聚合永远从当前投票记录统计得出,不单独维护计数器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteAggregate {
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
    pub user_vote: VoteState,
}

impl VoteAggregate {
    pub fn new(upvotes: i64, downvotes: i64, user_vote: VoteState) -> Self {
        Self {
            upvotes,
            downvotes,
            score: upvotes - downvotes,
            user_vote,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    Spam,
    Inappropriate,
    HateSpeech,
    Harassment,
    Violence,
    Other,
}

impl FlagReason {
    pub const ALL: [FlagReason; 6] = [
        Self::Spam,
        Self::Inappropriate,
        Self::HateSpeech,
        Self::Harassment,
        Self::Violence,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Inappropriate => "inappropriate",
            Self::HateSpeech => "hate_speech",
            Self::Harassment => "harassment",
            Self::Violence => "violence",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Spam => "Spam or unwanted content",
            Self::Inappropriate => "Inappropriate content",
            Self::HateSpeech => "Hate speech or discrimination",
            Self::Harassment => "Harassment or bullying",
            Self::Violence => "Violence or dangerous content",
            Self::Other => "Other (please specify)",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| AppError::validation("invalid flag reason"))
    }
}

/// 校验过的举报输入:reason=other 时 details 必填
#[derive(Debug, Clone)]
pub struct FlagSubmission {
    pub reason: FlagReason,
    pub details: Option<String>,
}

impl FlagSubmission {
    pub fn new(reason: &str, details: Option<String>) -> Result<Self, AppError> {
        let reason = FlagReason::parse(reason)?;

        let details = details
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if reason == FlagReason::Other && details.is_none() {
            return Err(AppError::validation(
                "details required when reason is 'other'",
            ));
        }

        if let Some(ref d) = details {
            if d.chars().count() > FLAG_DETAILS_MAX_CHARS {
                return Err(AppError::validation(format!(
                    "details must be at most {FLAG_DETAILS_MAX_CHARS} characters"
                )));
            }
        }

        Ok(Self { reason, details })
    }
}
