use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid numbering label '{0}'")]
    InvalidLabel(String),

    #[error("unknown chain type '{0}', expected H or L")]
    InvalidChainType(String),

    #[error("numbering tool failed")]
    Numberer(#[source] Box<dyn std::error::Error + Send + Sync>),
}
