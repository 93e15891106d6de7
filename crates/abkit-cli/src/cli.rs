use super::commands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Number heavy and light chains of a sequence table with ANARCI
    Number(commands::number::NumberArgs),
    /// Assign SARS-CoV-2 lineages to RBD sequences
    Lineage(commands::lineage::LineageArgs),
    /// Antibody/RBD residue contacts of a structure
    Contacts(commands::contacts::ContactsArgs),
    /// Entity, instance and author chain ids of an RCSB entry
    Idmap(commands::idmap::IdmapArgs),
    /// Predict Fv structures with IgFold
    Predict(commands::predict::PredictArgs),
    /// Run InterProScan and select V-domain hits
    Interpro(commands::interpro::InterproArgs),
    /// Fetch or read GenBank records and translate antibody CDSs
    Genbank(commands::genbank::GenbankArgs),
    /// Deduplicate and annotate a paired sequence table
    Seqtable(commands::seqtable::SeqtableArgs),
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Number(args) => commands::number::execute(args),
            Commands::Lineage(args) => commands::lineage::execute(args),
            Commands::Contacts(args) => commands::contacts::execute(args),
            Commands::Idmap(args) => commands::idmap::execute(args),
            Commands::Predict(args) => commands::predict::execute(args),
            Commands::Interpro(args) => commands::interpro::execute(args),
            Commands::Genbank(args) => commands::genbank::execute(args),
            Commands::Seqtable(args) => commands::seqtable::execute(args),
        }
    }
}
