//! # abkit-tools
//!
//! Wrappers around the external programs of the antibody pipeline.
//!
//! * [`AnarciRunner`] numbers sequences with ANARCI and implements [`abkit_core::Numberer`]
//! * [`InterProScanConfig`] runs InterProScan; [`extract_vdomain_result`] picks V-domain hits
//! * [`igfold`] predicts Fv structures in batches through the bundled
//!   `scripts/igfold_predict.py`
//!
mod anarci;
mod error;
pub mod igfold;
mod interproscan;

pub use self::anarci::{read_numbered_output, AnarciRunner, ANARCI_EXECUTABLE, ANARCI_PATH_ENV};
pub use self::error::{PredictError, ToolError};
pub use self::igfold::{
    fold_with_fallback, install_predict_script, predict_structures, prepare_inputs, FoldInput,
    FoldOptions, FoldOutcome, IgFoldCommand, InputSelection, StructurePredictor,
    IGFOLD_PREDICT_SCRIPT,
};
pub use self::interproscan::{extract_vdomain_result, InterProScanConfig};
