//! # abkit-core
//!
//! Sequence-level logic for antibody analysis.
//!
//! __abkit-core__ provides:
//! * Amino-acid sequence normalization and translation
//! * BLOSUM90 scoring and the pairwise alignments built on it
//! * IMGT numbering labels, realignment of numbering-tool output and region assignment
//! * RBD variant lineage identification
//! * Maintenance of paired heavy/light sequence tables
//!
//! Anything that shells out or touches the network lives in the sibling crates. The
//! numbering tool is reached through the [`Numberer`] trait so that this crate stays pure.
//!
mod align;
mod error;
mod lineage;
mod numbering;
mod region;
mod scoring;
mod seqtable;
mod sequence;

pub use self::align::{first_aligned_block, global_score, realign, AlignedBlock};
pub use self::error::CoreError;
pub use self::lineage::{
    alignment_score, identify_lineage, VariantRbd, VariantTable, RBD_END, RBD_LEN, RBD_START,
    RBD_WT_SEQ, WILD_TYPE_LINEAGE,
};
pub use self::numbering::{
    get_numbering, reindex_numbering, ImgtPosition, NumberedResidue, Numberer, Numbering,
    NumberingLabel, Scheme,
};
pub use self::region::{encode_regions, get_region, mark_region, Region};
pub use self::scoring::blosum90;
pub use self::seqtable::{
    add_region_label, distinct_chain_sequences, remove_duplicated_records, truncate_to_fv,
    ChainSeq, ChainType, PairedSeqRecord, DEFAULT_SOURCE_PRIORITY, FV_TRUNCATION_MIN_LEN,
};
pub use self::sequence::{
    aa3to1, is_standard, standardize_seq, translate, PLACEHOLDER_RESIDUE, STANDARD_AMINO_ACIDS,
};
