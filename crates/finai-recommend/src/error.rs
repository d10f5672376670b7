use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Db(#[from] finai_db::DbError),
}
