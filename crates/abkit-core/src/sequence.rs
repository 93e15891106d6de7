//! Amino-acid sequence helpers.

/// The 20 standard residues accepted by the numbering and folding tools.
pub const STANDARD_AMINO_ACIDS: &str = "ARNDCQEGHILKMFPSTWYV";

/// Symbol substituted for anything outside [`STANDARD_AMINO_ACIDS`].
pub const PLACEHOLDER_RESIDUE: char = 'A';

pub fn is_standard(aa: char) -> bool {
    STANDARD_AMINO_ACIDS.contains(aa)
}

/// Uppercase the sequence and replace every non-standard residue with
/// [`PLACEHOLDER_RESIDUE`].
///
/// The output has one symbol per input symbol, so positions are preserved.
/// Applying it twice gives the same result as applying it once.
pub fn standardize_seq(seq: &str) -> String {
    seq.chars()
        .map(|aa| aa.to_ascii_uppercase())
        .map(|aa| if is_standard(aa) { aa } else { PLACEHOLDER_RESIDUE })
        .collect()
}

#[rustfmt::skip]
pub fn aa3to1(aa: &str) -> char {
    match aa {
        "ALA" => 'A', "CYS" => 'C', "ASP" => 'D',
        "GLU" => 'E', "PHE" => 'F', "GLY" => 'G',
        "HIS" => 'H', "ILE" => 'I', "LYS" => 'K',
        "LEU" => 'L', "MET" => 'M', "ASN" => 'N',
        "PRO" => 'P', "GLN" => 'Q', "ARG" => 'R',
        "SER" => 'S', "THR" => 'T', "VAL" => 'V',
        "TRP" => 'W', "TYR" => 'Y', "MSE" => 'M',
        "SEC" => 'U', "PYL" => 'O', _     => 'X',
    }
}

// Standard genetic code, codons enumerated in TCAG order.
const CODON_TABLE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Translate a nucleotide sequence with the standard table.
///
/// A trailing partial codon is dropped and codons with ambiguous bases become `X`.
/// With `to_stop` translation ends before the first stop codon, otherwise stops are
/// written as `*`.
pub fn translate(nucleotides: &[u8], to_stop: bool) -> String {
    let mut protein = String::with_capacity(nucleotides.len() / 3);
    for codon in nucleotides.chunks_exact(3) {
        let aa = match (
            base_index(codon[0]),
            base_index(codon[1]),
            base_index(codon[2]),
        ) {
            (Some(a), Some(b), Some(c)) => CODON_TABLE[16 * a + 4 * b + c] as char,
            _ => 'X',
        };
        if to_stop && aa == '*' {
            break;
        }
        protein.push(aa);
    }
    protein
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize() {
        assert_eq!(standardize_seq("evqLVesG"), "EVQLVESG");
        assert_eq!(standardize_seq("QVXLBZ*J"), "QVALAAAA");
        assert_eq!(standardize_seq(""), "");
    }

    #[test]
    fn test_standardize_is_idempotent() {
        for seq in ["QVQLQESGPGLVKPSQTLSLTCTVS", "xxbz-*?qv", "ΩMKT", "ARNDCQEGHILKMFPSTWYV"] {
            let once = standardize_seq(seq);
            assert_eq!(standardize_seq(&once), once);
            assert_eq!(once.chars().count(), seq.chars().count());
            assert!(once.chars().all(is_standard));
        }
    }

    #[test]
    fn test_translate() {
        assert_eq!(translate(b"ATGGCCTAAGGG", false), "MA*G");
        assert_eq!(translate(b"ATGGCCTAAGGG", true), "MA");
        assert_eq!(translate(b"atgNNNtgg", true), "MXW");
        // partial codon is dropped
        assert_eq!(translate(b"ATGGC", true), "M");
    }

    #[test]
    fn test_aa3to1() {
        assert_eq!(aa3to1("TRP"), 'W');
        assert_eq!(aa3to1("HOH"), 'X');
    }
}
