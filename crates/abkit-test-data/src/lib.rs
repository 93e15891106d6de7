//! abkit-test-data
//!
//! Small fixture files embedded in the crate so tests of the other crates can write them
//! to a temporary location and operate on real paths.
//!
//! The fixtures are represented as `TestFile` objects which package the raw bytes and
//! create temporary files on demand.
use std::fs;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use abkit_test_data::TestFile;
/// let (pdb_file, _temp) = TestFile::complex_01().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// Toy antibody/RBD complex.
    ///
    /// Chains `H` (5 residues) and `L` (3 residues) and an RBD chain `E` with residues
    /// 318-320, 322, 323, 323A, 541 and 542. Residue 320 has two CA conformers.
    pub fn complex_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/complex.pdb"),
            suffix: "pdb",
        }
    }
    /// ANARCI `--csv` output for two heavy chains.
    pub fn anarci_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/anarci/numbered_H.csv"),
            suffix: "csv",
        }
    }
    /// InterProScan TSV for one heavy (`seqH`) and one light (`seqL`) chain.
    /// CDD rows carry only 11 columns.
    pub fn interpro_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/interpro/result.tsv"),
            suffix: "tsv",
        }
    }
    pub fn abrsa_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/abrsa/regions.txt"),
            suffix: "txt",
        }
    }
    /// Two GenBank records: one with a translated CDS, one bare nucleotide record.
    pub fn genbank_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/genbank/records.gb"),
            suffix: "gb",
        }
    }
    /// Variant RBD table with a single `B.1.1.7` entry.
    pub fn variants_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/tables/variants.tsv"),
            suffix: "tsv",
        }
    }
    /// Paired heavy/light sequence table, `ab1` and `ab3` share both chains.
    pub fn seqtable_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/tables/seqtable.tsv"),
            suffix: "tsv",
        }
    }

    /// Sequence table with a duplicated `ab1`, a `notab-like` record and a `name` column.
    pub fn seqtable_02() -> Self {
        Self {
            filebinary: include_bytes!("../data/tables/seqtable_dedup.tsv"),
            suffix: "tsv",
        }
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.filebinary
    }
}
