use super::emit_table;
use abkit_remote::{RcsbClient, RcsbConfig};
use clap::Args;
use log::info;
use polars::prelude::*;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct IdmapArgs {
    /// RCSB entry id, e.g. 7KMG
    pdb_id: String,
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn execute(args: IdmapArgs) -> anyhow::Result<()> {
    let client = RcsbClient::new(RcsbConfig::default())?;
    let title = client.entry_title(&args.pdb_id)?;
    info!("{}: {title}", args.pdb_id.to_uppercase());
    let mapping = client.build_idmapping(&args.pdb_id)?;
    let mut df = df!(
        "entity_id" => mapping.iter().map(|m| m.entity_id.clone()).collect::<Vec<_>>(),
        "instance_id" => mapping.iter().map(|m| m.instance_id.clone()).collect::<Vec<_>>(),
        "auth_instance_id" => mapping.iter().map(|m| m.auth_instance_id.clone()).collect::<Vec<_>>()
    )?;
    emit_table(&mut df, args.output.as_deref())
}
