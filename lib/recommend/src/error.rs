use shoprec_similarity::SchemaError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Construction-time failures of recommenders and the evaluator.
///
/// Query-time conditions such as unknown ids are outcomes, not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] shoprec_core::Error),

    #[error("Invalid factor schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
