use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Asset with id {0} was not found.")]
    NotFound(i64),

    #[error("Validation error: {0}")]
    Validation(#[from] core_types::CoreError),

    #[error("Calculation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
}
