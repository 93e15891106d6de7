use abkit_core::{add_region_label, remove_duplicated_records, truncate_to_fv, DEFAULT_SOURCE_PRIORITY};
use abkit_io::{load_lookup_table, read_seqtable, write_seqtable};
use anyhow::Context;
use clap::Args;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SeqtableArgs {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short, long)]
    output: PathBuf,
    #[arg(long, default_value = "ab_idx")]
    index_col: String,
    #[arg(long, default_value = "Hseq")]
    heavy_col: String,
    #[arg(long, default_value = "Lseq")]
    light_col: String,
    /// Keep one record per antibody, preferring better sources
    #[arg(long)]
    dedup: bool,
    /// Source ranking used by --dedup
    #[arg(long, value_delimiter = ',')]
    priority: Vec<String>,
    /// Table with a `seq` column and a V-domain column used to truncate long chains
    #[arg(long)]
    fv_table: Option<PathBuf>,
    /// V-domain column of --fv-table
    #[arg(long, default_value = "seq_vdomain")]
    fv_col: String,
    /// Table with `seq` and `region` columns
    #[arg(long)]
    region_table: Option<PathBuf>,
}

pub fn execute(args: SeqtableArgs) -> anyhow::Result<()> {
    let (mut records, layout) = read_seqtable(
        &args.input,
        Some(args.index_col.as_str()),
        (&args.heavy_col, &args.light_col),
    )
    .with_context(|| format!("reading {}", args.input.display()))?;
    info!("{} records", records.len());

    if args.dedup {
        let priority: Vec<&str> = if args.priority.is_empty() {
            DEFAULT_SOURCE_PRIORITY.to_vec()
        } else {
            args.priority.iter().map(String::as_str).collect()
        };
        records = remove_duplicated_records(&records, &priority);
        info!("{} records after deduplication", records.len());
    }
    if let Some(path) = &args.fv_table {
        let fv_table = load_lookup_table(path, "seq", &args.fv_col)?;
        let (truncated, missing) = truncate_to_fv(&records, &fv_table);
        if !missing.is_empty() {
            warn!("{} long chains have no V-domain in {}", missing.len(), path.display());
        }
        records = truncated;
    }
    if let Some(path) = &args.region_table {
        let region_table = load_lookup_table(path, "seq", "region")?;
        let (labelled, missing) = add_region_label(&records, &region_table);
        if !missing.is_empty() {
            warn!("{} chains have no region label in {}", missing.len(), path.display());
        }
        records = labelled;
    }
    write_seqtable(&records, &layout, &args.output)?;
    Ok(())
}
