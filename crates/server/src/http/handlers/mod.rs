pub mod comments;
pub mod flags;
pub mod health;
pub mod posts;
pub mod votes;

use domain::AppError;
use uuid::Uuid;

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation(format!("invalid {what} id format")))
}
