mod error;
mod models;

pub use error::{AppError, Result};
pub use models::{
    ActorId, Comment, FlagReason, FlagSubmission, NewComment, NewPost, Post, TargetType,
    VoteAggregate, VoteState,
};
