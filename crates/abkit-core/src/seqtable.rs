//! Paired heavy/light antibody sequence tables.
//!
//! Records are collected from several sources (GenBank, patents, PDB, ...). These helpers
//! deduplicate them and fill in derived columns from lookup tables keyed by sequence.
use super::error::CoreError;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Source ranking used when the same antibody was collected more than once.
pub const DEFAULT_SOURCE_PRIORITY: [&str; 9] = [
    "genbank",
    "patent",
    "INN",
    "sup.",
    "mutation",
    "split",
    "combination",
    "pdb",
    "CovAbDab",
];

/// Chains at least this long are assumed to carry constant domains.
pub const FV_TRUNCATION_MIN_LEN: usize = 151;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    Heavy,
    Light,
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainType::Heavy => write!(f, "H"),
            ChainType::Light => write!(f, "L"),
        }
    }
}

impl FromStr for ChainType {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" => Ok(ChainType::Heavy),
            "L" => Ok(ChainType::Light),
            other => Err(CoreError::InvalidChainType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PairedSeqRecord {
    pub ab_idx: String,
    pub source: String,
    /// Set when curation flagged the record as not antibody-like.
    pub notab_like: bool,
    pub hseq: String,
    pub lseq: String,
    pub hregion: Option<String>,
    pub lregion: Option<String>,
    /// Remaining table columns as `(name, value)`, carried through untouched.
    pub extra: Vec<(String, String)>,
}

/// A sequence together with the column it was first seen in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainSeq {
    pub seq: String,
    pub chain: ChainType,
}

/// Distinct sequences across the heavy then light columns.
///
/// A sequence present in both columns is reported once, as heavy.
pub fn distinct_chain_sequences(records: &[PairedSeqRecord]) -> Vec<ChainSeq> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| (&r.hseq, ChainType::Heavy))
        .chain(records.iter().map(|r| (&r.lseq, ChainType::Light)))
        .filter(|(seq, _)| seen.insert(seq.as_str()))
        .map(|(seq, chain)| ChainSeq {
            seq: seq.clone(),
            chain,
        })
        .collect()
}

/// Keep antibody-like records and one record per `ab_idx`, preferring sources listed
/// earlier in `priority`. Sources missing from `priority` rank last.
pub fn remove_duplicated_records(
    records: &[PairedSeqRecord],
    priority: &[&str],
) -> Vec<PairedSeqRecord> {
    let rank = |source: &str| {
        priority
            .iter()
            .position(|p| *p == source)
            .unwrap_or(priority.len())
    };
    let mut qualified: Vec<&PairedSeqRecord> = records.iter().filter(|r| !r.notab_like).collect();
    qualified.sort_by_key(|r| rank(&r.source));

    let mut seen = HashSet::new();
    qualified
        .into_iter()
        .filter(|r| seen.insert(r.ab_idx.as_str()))
        .cloned()
        .collect()
}

/// Replace long chains with their variable domain.
///
/// Returns the updated records and the long sequences that `fv_table`
/// (full sequence -> V-domain) does not know.
pub fn truncate_to_fv(
    records: &[PairedSeqRecord],
    fv_table: &HashMap<String, String>,
) -> (Vec<PairedSeqRecord>, Vec<ChainSeq>) {
    let long_seqs: Vec<ChainSeq> = distinct_chain_sequences(records)
        .into_iter()
        .filter(|cs| cs.seq.len() >= FV_TRUNCATION_MIN_LEN)
        .collect();
    let mut output = records.to_vec();
    let mut missing = vec![];
    for chain_seq in long_seqs {
        let Some(vdomain) = fv_table.get(&chain_seq.seq) else {
            missing.push(chain_seq);
            continue;
        };
        for record in output.iter_mut() {
            match chain_seq.chain {
                ChainType::Heavy if record.hseq == chain_seq.seq => record.hseq = vdomain.clone(),
                ChainType::Light if record.lseq == chain_seq.seq => record.lseq = vdomain.clone(),
                _ => {}
            }
        }
    }
    (output, missing)
}

/// Fill `hregion`/`lregion` from `region_table` (sequence -> encoded regions).
///
/// Returns the updated records and the sequences the table does not know.
pub fn add_region_label(
    records: &[PairedSeqRecord],
    region_table: &HashMap<String, String>,
) -> (Vec<PairedSeqRecord>, Vec<ChainSeq>) {
    let mut output = records.to_vec();
    let mut missing = vec![];
    for chain_seq in distinct_chain_sequences(records) {
        let Some(region) = region_table.get(&chain_seq.seq) else {
            missing.push(chain_seq);
            continue;
        };
        for record in output.iter_mut() {
            match chain_seq.chain {
                ChainType::Heavy if record.hseq == chain_seq.seq => {
                    record.hregion = Some(region.clone())
                }
                ChainType::Light if record.lseq == chain_seq.seq => {
                    record.lregion = Some(region.clone())
                }
                _ => {}
            }
        }
    }
    (output, missing)
}
