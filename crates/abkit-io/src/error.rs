use abkit_core::CoreError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("table error: {0}")]
    Table(#[from] PolarsError),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("{format} line {line}: {message}")]
    Parse {
        format: &'static str,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl IoError {
    pub(crate) fn parse(format: &'static str, line: usize, message: impl Into<String>) -> Self {
        IoError::Parse {
            format,
            line,
            message: message.into(),
        }
    }
}
