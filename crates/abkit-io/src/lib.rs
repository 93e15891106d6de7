//! # abkit-io
//!
//! Readers and writers for the files that flow through the antibody tools:
//! tab/comma separated tables, ANARCI CSV output, InterProScan TSV output,
//! AbRSA region reports, GenBank flat files and FASTA.
mod abrsa;
mod anarci;
mod error;
mod fasta;
mod genbank;
mod interpro;
mod tables;

pub use self::abrsa::{load_region_result, parse_region_result, RegionAnnotation};
pub use self::anarci::{load_numbered_residues, load_numbering, AnarciRow, ANARCI_META_COLUMNS};
pub use self::error::IoError;
pub use self::fasta::{read_fasta, write_fasta, FastaEntry};
pub use self::genbank::{parse_genbank, read_genbank, translate_mab, Feature, GenBankRecord};
pub use self::interpro::{load_result, InterProHit, INTERPRO_COLUMNS};
pub use self::tables::{
    load_lookup_table, load_seqtable, load_variant_table, read_seqtable, read_table,
    string_column, write_seqtable, write_table, SeqTableLayout, Separator, HREGION_COL,
    LREGION_COL, NOTAB_COL, SOURCE_COL,
};
