use super::emit_table;
use abkit_remote::{RcsbClient, RcsbConfig};
use abkit_structure::{
    contact_matrix, detect_rbd_contacts, load_structure, ContactMatrix, DEFAULT_CONTACT_THRESHOLD,
};
use anyhow::{bail, Context};
use clap::Args;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ContactsArgs {
    /// Local PDB or mmCIF file, addressed by author chain ids
    #[arg(long, requires_all = ["ab_chains", "rbd_chain"], conflicts_with_all = ["ab_instances", "rbd_instance"])]
    structure: Option<PathBuf>,
    #[arg(long, value_delimiter = ',')]
    ab_chains: Vec<String>,
    #[arg(long)]
    rbd_chain: Option<String>,
    /// RCSB instance ids such as 7KMG.A,7KMG.B
    #[arg(long, value_delimiter = ',')]
    ab_instances: Vec<String>,
    /// RCSB instance id of the RBD, e.g. 7KMG.C
    #[arg(long)]
    rbd_instance: Option<String>,
    #[arg(long, default_value_t = DEFAULT_CONTACT_THRESHOLD)]
    threshold: f64,
    /// Directory for downloaded entries
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn local_contacts(args: &ContactsArgs, path: &Path) -> anyhow::Result<ContactMatrix> {
    let Some(rbd_chain) = &args.rbd_chain else {
        bail!("--rbd-chain is required with --structure");
    };
    let structure = load_structure::<&str>(path, None, false)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(contact_matrix(
        &structure,
        &args.ab_chains[..],
        rbd_chain,
        args.threshold,
    )?)
}

fn remote_contacts(args: &ContactsArgs) -> anyhow::Result<ContactMatrix> {
    let (Some(rbd_instance), false) = (&args.rbd_instance, args.ab_instances.is_empty()) else {
        bail!("give either --structure with chains or --ab-instances and --rbd-instance");
    };
    let mut config = RcsbConfig::default();
    if let Some(cache_dir) = &args.cache_dir {
        config.cache_dir = cache_dir.clone();
    }
    let client = RcsbClient::new(config)?;
    let ab_instances: Vec<&str> = args.ab_instances.iter().map(String::as_str).collect();
    Ok(detect_rbd_contacts(
        &client,
        &ab_instances,
        rbd_instance,
        args.threshold,
    )?)
}

pub fn execute(args: ContactsArgs) -> anyhow::Result<()> {
    let matrix = match &args.structure {
        Some(path) => local_contacts(&args, path)?,
        None => remote_contacts(&args)?,
    };
    info!(
        "{} contacts between {} antibody residues and the RBD",
        matrix.n_contacts(),
        matrix.labels().len()
    );
    let mut df = matrix.to_dataframe()?;
    emit_table(&mut df, args.output.as_deref())
}
