use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown semantic type: {0}")]
    UnknownSemanticType(String),
    #[error("unknown reject reason: {0}")]
    UnknownRejectReason(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
