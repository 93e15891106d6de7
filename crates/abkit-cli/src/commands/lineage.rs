use abkit_io::{load_variant_table, read_fasta, FastaEntry};
use anyhow::{bail, Context};
use clap::Args;
use log::info;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct LineageArgs {
    /// Table with `lineage` and `rbd_seq` columns; WT is always included
    #[arg(long)]
    variants: PathBuf,
    /// RBD sequences (residues 319-541) read from a FASTA file
    #[arg(long)]
    fasta: Option<PathBuf>,
    /// RBD sequences given on the command line
    sequences: Vec<String>,
}

pub fn execute(args: LineageArgs) -> anyhow::Result<()> {
    let table = load_variant_table(&args.variants)
        .with_context(|| format!("reading {}", args.variants.display()))?;
    info!("{} reference lineages", table.len());

    let mut queries: Vec<FastaEntry> = args
        .sequences
        .iter()
        .enumerate()
        .map(|(i, seq)| FastaEntry::new(format!("seq{}", i + 1), seq.as_str()))
        .collect();
    if let Some(fasta) = &args.fasta {
        queries.extend(read_fasta(fasta)?);
    }
    if queries.is_empty() {
        bail!("no RBD sequences given");
    }

    for query in &queries {
        let lineage = table.identify_lineage(&query.seq).unwrap_or("-");
        println!("{}\t{}", query.id, lineage);
    }
    Ok(())
}
