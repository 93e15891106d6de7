use super::emit_table;
use abkit_io::{read_genbank, translate_mab, GenBankRecord};
use abkit_remote::{EntrezClient, EntrezConfig, HistoryEntry};
use anyhow::{bail, Context};
use clap::Args;
use log::{info, warn};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GenbankArgs {
    /// Antibody names searched as exact phrases in the nucleotide database
    #[arg(long)]
    query: Vec<String>,
    /// GenBank accessions to fetch
    #[arg(long, value_delimiter = ',')]
    ids: Vec<String>,
    /// Read records from a local GenBank file instead of NCBI
    #[arg(long, conflicts_with_all = ["query", "ids"])]
    records: Option<PathBuf>,
    #[arg(long, env = "NCBI_EMAIL", default_value = "")]
    email: String,
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,
    #[arg(long, default_value_t = 200)]
    batch_size: usize,
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn fetch(args: &GenbankArgs) -> anyhow::Result<(Vec<HistoryEntry>, Vec<GenBankRecord>)> {
    if args.email.is_empty() {
        warn!("no contact email given; set --email or NCBI_EMAIL");
    }
    let client = EntrezClient::new(EntrezConfig {
        email: args.email.clone(),
        api_key: args.api_key.clone(),
        ..Default::default()
    })?;
    let mut entries = vec![];
    for query in &args.query {
        match client.search(query)? {
            Some(found) => entries.extend(found),
            None => warn!("no nucleotide records for '{query}'"),
        }
    }
    if !args.ids.is_empty() {
        entries.extend(client.upload_ids(&args.ids, args.batch_size, "nucleotide")?);
    }
    let records = client.fetch_records(&entries, "nucleotide")?;
    Ok((entries, records))
}

pub fn execute(args: GenbankArgs) -> anyhow::Result<()> {
    let (entries, records) = match &args.records {
        Some(path) => {
            let records =
                read_genbank(path).with_context(|| format!("reading {}", path.display()))?;
            (vec![], records)
        }
        None if args.query.is_empty() && args.ids.is_empty() => {
            bail!("give --query, --ids or --records")
        }
        None => fetch(&args)?,
    };
    info!("{} GenBank records", records.len());

    let queries: HashMap<&str, &str> = entries
        .iter()
        .filter_map(|e| e.query.as_deref().map(|q| (e.genbank.as_str(), q)))
        .collect();
    let query_of = |record: &GenBankRecord| {
        queries
            .get(record.version.as_str())
            .or_else(|| queries.get(record.accession.as_str()))
            .map(|q| q.to_string())
    };
    let mut df = df!(
        "query" => records.iter().map(query_of).collect::<Vec<_>>(),
        "accession" => records.iter().map(|r| r.accession.clone()).collect::<Vec<_>>(),
        "version" => records.iter().map(|r| r.version.clone()).collect::<Vec<_>>(),
        "definition" => records.iter().map(|r| r.definition.clone()).collect::<Vec<_>>(),
        "translation" => records.iter().map(translate_mab).collect::<Vec<_>>()
    )?;
    emit_table(&mut df, args.output.as_deref())
}
