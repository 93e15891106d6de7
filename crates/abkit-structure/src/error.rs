use abkit_remote::LookupError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("could not read structure: {0}")]
    Parse(String),

    #[error("no chains found in the input file")]
    NoChains,

    #[error("chain {0} not found in input file")]
    MissingChain(String),

    #[error("invalid instance id '{0}', expected PDB.CHAIN")]
    InvalidInstanceId(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("table error: {0}")]
    Table(#[from] PolarsError),
}
