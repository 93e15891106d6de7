//! Antibody structure prediction with IgFold.
//!
//! [`StructurePredictor`] is the seam to the folding program. [`IgFoldCommand`] runs
//! `scripts/igfold_predict.py` (embedded as [`IGFOLD_PREDICT_SCRIPT`]) in a Python
//! environment with IgFold installed; tests substitute their own predictor.
//!
//! The script reads a two-record FASTA (`H`, `L`), calls `IgFoldRunner.fold` without
//! renumbering and writes the model PDB. Python exceptions reach stderr unchanged: a
//! `ValueError` marks invalid input, anything else a runtime failure.
//!
//! A batch run loads a paired sequence table, selects rows with [`prepare_inputs`] and
//! folds each pair with [`predict_structures`], which writes `<output_dir>/<idx>.pdb`.
use super::error::PredictError;
use abkit_core::{standardize_seq, PairedSeqRecord};
use abkit_io::{load_seqtable, write_fasta, FastaEntry};
use abkit_structure::load_structure;
use bon::Builder;
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const DEFAULT_OUTPUT_DIR: &str = "./test_outputs";
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const IGFOLD_PREDICT_SCRIPT: &str = include_str!("../scripts/igfold_predict.py");
pub const IGFOLD_PREDICT_SCRIPT_NAME: &str = "igfold_predict.py";

/// Write the embedded prediction script into `dir` and return its path.
pub fn install_predict_script(dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(IGFOLD_PREDICT_SCRIPT_NAME);
    fs::write(&path, IGFOLD_PREDICT_SCRIPT)?;
    Ok(path)
}

/// A normalized heavy/light pair and its table index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldInput {
    pub idx: String,
    pub heavy: String,
    pub light: String,
}

impl FoldInput {
    /// Heavy then light, the residue order of the predicted model.
    pub fn sequence(&self) -> String {
        format!("{}{}", self.heavy, self.light)
    }

    pub fn request(&self, output_dir: &Path) -> FoldRequest {
        FoldRequest {
            idx: self.idx.clone(),
            heavy: self.heavy.clone(),
            light: self.light.clone(),
            output: output_dir.join(format!("{}.pdb", self.idx)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRequest {
    pub idx: String,
    pub heavy: String,
    pub light: String,
    /// PDB file the model is written to.
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, Builder)]
pub struct FoldOptions {
    #[builder(default = 4)]
    pub num_models: usize,
    #[builder(default)]
    pub refine: bool,
}

impl Default for FoldOptions {
    fn default() -> Self {
        FoldOptions::builder().build()
    }
}

pub trait StructurePredictor {
    /// Fold one pair and return the path of the written model.
    fn fold(&self, request: &FoldRequest, options: &FoldOptions) -> Result<PathBuf, PredictError>;
}

impl<T: StructurePredictor + ?Sized> StructurePredictor for &T {
    fn fold(&self, request: &FoldRequest, options: &FoldOptions) -> Result<PathBuf, PredictError> {
        (**self).fold(request, options)
    }
}

/// Runs `<python> <script> --fasta <pair.fasta> --output <model.pdb> --num-models <n> [--refine]`.
///
/// The pair is written next to the model as a two-record FASTA (`H`, `L`).
#[derive(Debug, Clone, Builder)]
pub struct IgFoldCommand {
    #[builder(into, default = PathBuf::from("python"))]
    python: PathBuf,
    #[builder(into)]
    script: PathBuf,
}

impl IgFoldCommand {
    pub fn command(&self, fasta: &Path, output: &Path, options: &FoldOptions) -> Command {
        let mut command = Command::new(&self.python);
        command
            .arg(&self.script)
            .arg("--fasta")
            .arg(fasta)
            .arg("--output")
            .arg(output)
            .arg("--num-models")
            .arg(options.num_models.to_string());
        if options.refine {
            command.arg("--refine");
        }
        command
    }
}

fn classify_failure(stderr: &str) -> PredictError {
    let message = stderr.trim().to_string();
    if message.contains("ValueError") {
        PredictError::InvalidInput(message)
    } else {
        PredictError::Runtime(message)
    }
}

impl StructurePredictor for IgFoldCommand {
    fn fold(&self, request: &FoldRequest, options: &FoldOptions) -> Result<PathBuf, PredictError> {
        let fasta = request.output.with_extension("fasta");
        write_fasta(
            &fasta,
            &[
                FastaEntry::new("H", request.heavy.as_str()),
                FastaEntry::new("L", request.light.as_str()),
            ],
        )?;
        let mut command = self.command(&fasta, &request.output, options);
        info!("running {command:?}");
        let result = command.output()?;
        if !result.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&result.stderr)));
        }
        Ok(request.output.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folded {
    pub path: PathBuf,
    /// Whether the model came out of a refined run.
    pub refined: bool,
}

/// Fold once; when a refined run fails at runtime, fold again without refinement.
pub fn fold_with_fallback<P: StructurePredictor + ?Sized>(
    predictor: &P,
    request: &FoldRequest,
    options: &FoldOptions,
) -> Result<Folded, PredictError> {
    match predictor.fold(request, options) {
        Ok(path) => Ok(Folded {
            path,
            refined: options.refine,
        }),
        Err(PredictError::Runtime(message)) if options.refine => {
            warn!(
                "{}: refinement failed ({message}), retrying without refinement",
                request.idx
            );
            let unrefined = FoldOptions {
                refine: false,
                ..*options
            };
            let path = predictor.fold(request, &unrefined)?;
            Ok(Folded {
                path,
                refined: false,
            })
        }
        Err(e) => Err(e),
    }
}

/// Row selection for a batch run.
#[derive(Debug, Clone, Builder)]
pub struct InputSelection {
    /// Index column; rows are numbered after deduplication when unset.
    #[builder(into)]
    index_col: Option<String>,
    #[builder(into, default = "Hseq".to_string())]
    heavy_col: String,
    #[builder(into, default = "Lseq".to_string())]
    light_col: String,
    /// Keep only the row with this index.
    #[builder(into)]
    idx: Option<String>,
    /// `(num_split, split_idx)`.
    split: Option<(usize, usize)>,
}

impl Default for InputSelection {
    fn default() -> Self {
        InputSelection::builder().build()
    }
}

/// Bounds of split `split_idx` out of `num_split`, both inclusive.
///
/// Split points are `floor(i * n / num_split)`, and neighbouring splits share their
/// boundary row.
fn split_bounds(n: usize, num_split: usize, split_idx: usize) -> (usize, usize) {
    (split_idx * n / num_split, (split_idx + 1) * n / num_split)
}

/// Apply `selection` to records already loaded from a sequence table.
pub fn select_inputs(
    records: Vec<PairedSeqRecord>,
    selection: &InputSelection,
) -> Result<Vec<FoldInput>, PredictError> {
    let mut seen = HashSet::new();
    let mut records: Vec<PairedSeqRecord> = records
        .into_iter()
        .filter(|r| seen.insert((r.hseq.clone(), r.lseq.clone())))
        .collect();
    info!("loaded {} sequences", records.len());
    if selection.index_col.is_none() {
        for (row, record) in records.iter_mut().enumerate() {
            record.ab_idx = row.to_string();
        }
    }
    if let Some(idx) = &selection.idx {
        records.retain(|r| &r.ab_idx == idx);
    }
    if let Some((num_split, split_idx)) = selection.split {
        if split_idx >= num_split {
            return Err(PredictError::InvalidInput(format!(
                "split index {split_idx} out of range for {num_split} splits"
            )));
        }
        let (start, stop) = split_bounds(records.len(), num_split, split_idx);
        info!("running on subset from {start} to {stop}");
        records = records
            .into_iter()
            .skip(start)
            .take(stop - start + 1)
            .collect();
    }
    Ok(records
        .into_iter()
        .map(|r| FoldInput {
            idx: r.ab_idx,
            heavy: standardize_seq(&r.hseq),
            light: standardize_seq(&r.lseq),
        })
        .collect())
}

/// Load a tab or comma separated sequence table and select the pairs to fold.
pub fn prepare_inputs(
    path: impl AsRef<Path>,
    selection: &InputSelection,
) -> Result<Vec<FoldInput>, PredictError> {
    let records = load_seqtable(
        path,
        selection.index_col.as_deref(),
        (&selection.heavy_col, &selection.light_col),
    )?;
    select_inputs(records, selection)
}

/// True when the model's Cα sequence equals `expected`.
pub fn check_model_seq(model: &Path, expected: &str) -> Result<bool, PredictError> {
    let atoms = load_structure::<&str>(model, None, false)?;
    Ok(atoms.sequence() == expected)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldOutcome {
    pub idx: String,
    pub path: PathBuf,
    pub refined: bool,
    pub attempts: usize,
    /// False when every attempt produced a model whose sequence differs from the input.
    pub sequence_matches: bool,
}

/// Fold every input into `<output_dir>/<idx>.pdb`.
///
/// A model whose sequence differs from its input is predicted again, up to
/// `max_attempts` times in total. Invalid input stops the batch.
pub fn predict_structures<P: StructurePredictor + ?Sized>(
    predictor: &P,
    inputs: &[FoldInput],
    output_dir: Option<&Path>,
    options: &FoldOptions,
    max_attempts: usize,
) -> Result<Vec<FoldOutcome>, PredictError> {
    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    fs::create_dir_all(&output_dir)?;

    let mut outcomes = Vec::with_capacity(inputs.len());
    for input in inputs {
        let request = input.request(&output_dir);
        let expected = input.sequence();
        let mut attempts = 0;
        let outcome = loop {
            attempts += 1;
            let folded = fold_with_fallback(predictor, &request, options)?;
            let sequence_matches = check_model_seq(&folded.path, &expected)?;
            if sequence_matches || attempts >= max_attempts.max(1) {
                if !sequence_matches {
                    warn!("{}: model sequence still differs after {attempts} attempts", input.idx);
                }
                break FoldOutcome {
                    idx: input.idx.clone(),
                    path: folded.path,
                    refined: folded.refined,
                    attempts,
                    sequence_matches,
                };
            }
            warn!("{}: model sequence differs from input, predicting again", input.idx);
        };
        info!("{} -> {}", outcome.idx, outcome.path.display());
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
