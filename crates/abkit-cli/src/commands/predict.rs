use abkit_tools::igfold::{DEFAULT_MAX_ATTEMPTS, DEFAULT_OUTPUT_DIR};
use abkit_tools::{
    install_predict_script, predict_structures, prepare_inputs, FoldOptions, IgFoldCommand,
    InputSelection,
};
use anyhow::{bail, Context};
use clap::Args;
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Paired sequence table
    #[arg(long)]
    input_seqtable_path: PathBuf,
    #[arg(long)]
    index_col: Option<String>,
    /// Heavy and light sequence columns
    #[arg(long, default_value = "Hseq,Lseq")]
    seq_cols: String,
    /// Fold only the row with this index
    #[arg(long)]
    idx: Option<String>,
    #[arg(long, requires = "split_idx")]
    num_split: Option<usize>,
    #[arg(long, requires = "num_split")]
    split_idx: Option<usize>,
    #[arg(long)]
    refine: bool,
    /// Defaults to ./test_outputs
    #[arg(long)]
    output_dir: Option<PathBuf>,
    #[arg(long, default_value_t = 4)]
    num_models: usize,
    /// Python interpreter of an environment with IgFold installed
    #[arg(long, default_value = "python")]
    python: PathBuf,
    /// Prediction script; the bundled igfold_predict.py is written to the output
    /// directory when omitted
    #[arg(long)]
    igfold_script: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,
}

pub fn execute(args: PredictArgs) -> anyhow::Result<()> {
    let Some((heavy_col, light_col)) = args.seq_cols.split_once(',') else {
        bail!("--seq-cols must name two columns, got '{}'", args.seq_cols);
    };
    let selection = InputSelection::builder()
        .maybe_index_col(args.index_col)
        .heavy_col(heavy_col)
        .light_col(light_col)
        .maybe_idx(args.idx)
        .maybe_split(args.num_split.zip(args.split_idx))
        .build();
    let inputs = prepare_inputs(&args.input_seqtable_path, &selection)
        .with_context(|| format!("reading {}", args.input_seqtable_path.display()))?;

    let script = match args.igfold_script {
        Some(script) => script,
        None => {
            let dir = args
                .output_dir
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_OUTPUT_DIR));
            install_predict_script(dir)
                .with_context(|| format!("installing the IgFold script in {}", dir.display()))?
        }
    };
    let predictor = IgFoldCommand::builder()
        .python(args.python)
        .script(script)
        .build();
    let options = FoldOptions::builder()
        .num_models(args.num_models)
        .refine(args.refine)
        .build();
    let outcomes = predict_structures(
        &predictor,
        &inputs,
        args.output_dir.as_deref(),
        &options,
        args.max_attempts,
    )?;

    let unrefined = outcomes.iter().filter(|o| args.refine && !o.refined).count();
    if unrefined > 0 {
        warn!("{unrefined} models were predicted without refinement");
    }
    let mismatched = outcomes.iter().filter(|o| !o.sequence_matches).count();
    if mismatched > 0 {
        warn!("{mismatched} models do not match their input sequence");
    }
    info!("predicted {} structures", outcomes.len());
    Ok(())
}
