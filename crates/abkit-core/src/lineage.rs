//! SARS-CoV-2 receptor-binding domain lineage identification.
use super::align::global_score;

/// Wild-type RBD, spike residues 319-541.
pub const RBD_WT_SEQ: &str = "RVQPTESIVRFPNITNLCPFGEVFNATRFASVYAWNRKRISNCVADYSVLYNSASFSTFKCYGVSPTKLNDLCFTNVYADSFVIRGDEVRQIAPGQTGKIADYNYKLPDDFTGCVIAWNSNNLDSKVGGNYNYLYRLFRKSNLKPFERDISTEIYQAGSTPCNGVEGFNCYFPLQSYGFQPTNGVGYQPYRVVVLSFELLHAPATVCGPKKSTNLVKNKCVNF";
pub const RBD_START: i32 = 319;
pub const RBD_END: i32 = 541;
pub const RBD_LEN: usize = (RBD_END - RBD_START + 1) as usize;
pub const WILD_TYPE_LINEAGE: &str = "WT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRbd {
    pub lineage: String,
    pub rbd_seq: String,
}

impl VariantRbd {
    pub fn new(lineage: impl Into<String>, rbd_seq: impl Into<String>) -> Self {
        VariantRbd {
            lineage: lineage.into(),
            rbd_seq: rbd_seq.into(),
        }
    }
}

/// Ordered reference table of variant RBD sequences.
///
/// Order matters: when two references score the same the earlier one wins.
#[derive(Debug, Clone, Default)]
pub struct VariantTable {
    variants: Vec<VariantRbd>,
}

impl VariantTable {
    pub fn new(variants: Vec<VariantRbd>) -> Self {
        VariantTable { variants }
    }
    /// Append the wild-type reference as the last entry.
    pub fn with_wild_type(mut self) -> Self {
        self.variants
            .push(VariantRbd::new(WILD_TYPE_LINEAGE, RBD_WT_SEQ));
        self
    }
    pub fn variants(&self) -> &[VariantRbd] {
        &self.variants
    }
    pub fn len(&self) -> usize {
        self.variants.len()
    }
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
    pub fn identify_lineage(&self, query_rbd_seq: &str) -> Option<&str> {
        identify_lineage(&self.variants, query_rbd_seq)
    }
}

/// BLOSUM90 global alignment score of `query` against `target`, gaps free.
pub fn alignment_score(query: &str, target: &str) -> i32 {
    global_score(query.as_bytes(), target.as_bytes())
}

/// Lineage of the best scoring reference; the first one wins ties.
///
/// `None` only for an empty table.
pub fn identify_lineage<'a>(variants: &'a [VariantRbd], query_rbd_seq: &str) -> Option<&'a str> {
    let mut best: Option<(i32, &VariantRbd)> = None;
    for variant in variants {
        let score = alignment_score(query_rbd_seq, &variant.rbd_seq);
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, variant));
        }
    }
    best.map(|(_, variant)| variant.lineage.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mutate(seq: &str, mutations: &[(i32, char)]) -> String {
        let mut residues: Vec<char> = seq.chars().collect();
        for &(resid, aa) in mutations {
            residues[(resid - RBD_START) as usize] = aa;
        }
        residues.into_iter().collect()
    }

    fn table() -> VariantTable {
        VariantTable::new(vec![
            VariantRbd::new("B.1.1.7", mutate(RBD_WT_SEQ, &[(501, 'Y')])),
            VariantRbd::new("B.1.351", mutate(RBD_WT_SEQ, &[(417, 'N'), (484, 'K'), (501, 'Y')])),
            VariantRbd::new("B.1.617.2", mutate(RBD_WT_SEQ, &[(452, 'R'), (478, 'K')])),
        ])
        .with_wild_type()
    }

    #[test]
    fn test_rbd_window() {
        assert_eq!(RBD_LEN, 223);
        assert_eq!(RBD_WT_SEQ.len(), RBD_LEN);
    }

    #[test]
    fn test_wild_type_is_identified() {
        let table = table();
        assert_eq!(table.len(), 4);
        assert_eq!(table.identify_lineage(RBD_WT_SEQ), Some(WILD_TYPE_LINEAGE));
    }

    #[test]
    fn test_variant_is_identified() {
        let table = table();
        let query = mutate(RBD_WT_SEQ, &[(417, 'N'), (484, 'K'), (501, 'Y')]);
        assert_eq!(table.identify_lineage(&query), Some("B.1.351"));
        let query = mutate(RBD_WT_SEQ, &[(452, 'R'), (478, 'K')]);
        assert_eq!(table.identify_lineage(&query), Some("B.1.617.2"));
    }

    #[test]
    fn test_ties_go_to_first_entry() {
        let variants = vec![
            VariantRbd::new("first", "NITNLCPF"),
            VariantRbd::new("second", "NITNLCPF"),
        ];
        assert_eq!(identify_lineage(&variants, "NITNLCPF"), Some("first"));
        assert_eq!(identify_lineage(&[], "NITNLCPF"), None);
    }
}
