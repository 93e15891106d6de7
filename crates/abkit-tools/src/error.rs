use abkit_io::IoError;
use abkit_structure::StructureError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Output(#[from] IoError),
}

#[derive(Debug, Error)]
pub enum PredictError {
    /// The predictor failed while folding; worth retrying without refinement.
    #[error("prediction failed: {0}")]
    Runtime(String),

    /// The predictor rejected the sequences. Stops the whole batch.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Records(#[from] IoError),

    #[error("could not check predicted model: {0}")]
    Model(#[from] StructureError),
}
