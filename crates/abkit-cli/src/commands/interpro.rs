use super::emit_table;
use abkit_core::ChainType;
use abkit_io::{load_result, InterProHit};
use abkit_tools::{extract_vdomain_result, InterProScanConfig};
use anyhow::{bail, Context};
use clap::Args;
use log::info;
use polars::prelude::*;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InterproArgs {
    /// Protein FASTA to scan
    #[arg(short, long)]
    query: Option<PathBuf>,
    /// InterProScan TSV result; read directly when --query is omitted
    #[arg(short, long)]
    result: PathBuf,
    #[arg(long, default_value = "interproscan.sh")]
    executable: PathBuf,
    #[arg(long, default_value_t = 20)]
    ncpu: usize,
    #[arg(long, default_value = "SUPERFAMILY,Gene3D,CDD,SMART,Pfam")]
    applications: String,
    #[arg(long)]
    quiet: bool,
    /// Report the V-domain hits of heavy (H) or light (L) chains
    #[arg(long)]
    chain: Option<ChainType>,
    /// Keep every V-domain hit instead of the best per sequence
    #[arg(long)]
    all_hits: bool,
    /// Where to write the selected hits; TSV on stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn hits_frame(hits: &[InterProHit]) -> PolarsResult<DataFrame> {
    df!(
        "acc" => hits.iter().map(|h| h.acc.clone()).collect::<Vec<_>>(),
        "analysis" => hits.iter().map(|h| h.analysis.clone()).collect::<Vec<_>>(),
        "sig_acc" => hits.iter().map(|h| h.sig_acc.clone()).collect::<Vec<_>>(),
        "sig_description" => hits.iter().map(|h| h.sig_description.clone()).collect::<Vec<_>>(),
        "start" => hits.iter().map(|h| h.start).collect::<Vec<_>>(),
        "stop" => hits.iter().map(|h| h.stop).collect::<Vec<_>>(),
        "score" => hits.iter().map(|h| h.score).collect::<Vec<_>>()
    )
}

pub fn execute(args: InterproArgs) -> anyhow::Result<()> {
    if let Some(query) = &args.query {
        let config = InterProScanConfig::builder()
            .executable(args.executable.clone())
            .ncpu(args.ncpu)
            .applications(args.applications.clone())
            .verbose(!args.quiet)
            .build();
        let output = config.run(query, &args.result)?.wait_with_output()?;
        if !output.status.success() {
            bail!(
                "InterProScan exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
    }
    let hits = load_result(&args.result)
        .with_context(|| format!("reading {}", args.result.display()))?;
    info!("{} InterProScan hits", hits.len());
    let Some(chain) = args.chain else {
        return Ok(());
    };
    let vdomains = extract_vdomain_result(&hits, chain, !args.all_hits);
    let mut df = hits_frame(&vdomains)?;
    emit_table(&mut df, args.output.as_deref())
}
