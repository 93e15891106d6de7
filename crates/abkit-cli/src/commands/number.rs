use super::emit_table;
use abkit_core::{encode_regions, get_numbering, mark_region, Numbering, Scheme};
use abkit_io::load_seqtable;
use abkit_tools::{AnarciRunner, ANARCI_EXECUTABLE, ANARCI_PATH_ENV};
use anyhow::Context;
use clap::Args;
use itertools::Itertools;
use log::info;
use polars::prelude::*;
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct NumberArgs {
    /// Paired sequence table (TSV, or CSV by extension)
    #[arg(short, long)]
    input: PathBuf,
    /// Output table; TSV on stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long)]
    index_col: Option<String>,
    #[arg(long, default_value = "Hseq")]
    heavy_col: String,
    #[arg(long, default_value = "Lseq")]
    light_col: String,
    #[arg(long, default_value_t = Scheme::Imgt)]
    scheme: Scheme,
    #[arg(long, default_value = ANARCI_EXECUTABLE)]
    anarci: PathBuf,
    /// PATH used when running ANARCI
    #[arg(long, default_value = ANARCI_PATH_ENV)]
    anarci_path: String,
    /// Worker threads; all cores when omitted
    #[arg(long)]
    threads: Option<usize>,
}

struct NumberedChain {
    numbering: Option<String>,
    regions: Option<String>,
}

fn describe(numbering: Option<Numbering>, scheme: Scheme) -> NumberedChain {
    let regions = numbering
        .as_ref()
        .filter(|_| scheme == Scheme::Imgt)
        .map(|labels| encode_regions(&mark_region(labels)).iter().join(" "));
    NumberedChain {
        numbering: numbering.map(|labels| labels.iter().join(" ")),
        regions,
    }
}

pub fn execute(args: NumberArgs) -> anyhow::Result<()> {
    let records = load_seqtable(
        &args.input,
        args.index_col.as_deref(),
        (&args.heavy_col, &args.light_col),
    )
    .with_context(|| format!("reading {}", args.input.display()))?;
    info!("numbering {} antibodies with {}", records.len(), args.scheme);

    let runner = AnarciRunner::builder()
        .executable(args.anarci)
        .path_env(args.anarci_path)
        .build();
    let scheme = args.scheme;
    let number_all = || {
        records
            .par_iter()
            .map(|record| -> anyhow::Result<(NumberedChain, NumberedChain)> {
                let heavy = get_numbering(&runner, &record.hseq, scheme)?;
                let light = get_numbering(&runner, &record.lseq, scheme)?;
                Ok((describe(heavy, scheme), describe(light, scheme)))
            })
            .collect::<anyhow::Result<Vec<_>>>()
    };
    let numbered = match args.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(number_all)?,
        None => number_all()?,
    };

    let (heavy, light): (Vec<NumberedChain>, Vec<NumberedChain>) = numbered.into_iter().unzip();
    let mut df = df!(
        "ab_idx" => records.iter().map(|r| r.ab_idx.clone()).collect::<Vec<_>>(),
        "Hseq" => records.iter().map(|r| r.hseq.clone()).collect::<Vec<_>>(),
        "Lseq" => records.iter().map(|r| r.lseq.clone()).collect::<Vec<_>>(),
        "Hnumbering" => heavy.iter().map(|c| c.numbering.clone()).collect::<Vec<_>>(),
        "Lnumbering" => light.iter().map(|c| c.numbering.clone()).collect::<Vec<_>>(),
        "Hregion" => heavy.iter().map(|c| c.regions.clone()).collect::<Vec<_>>(),
        "Lregion" => light.iter().map(|c| c.regions.clone()).collect::<Vec<_>>()
    )?;
    emit_table(&mut df, args.output.as_deref())
}
