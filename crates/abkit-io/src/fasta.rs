use super::error::IoError;
use bio::io::fasta;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaEntry {
    pub id: String,
    pub seq: String,
}

impl FastaEntry {
    pub fn new(id: impl Into<String>, seq: impl Into<String>) -> Self {
        FastaEntry {
            id: id.into(),
            seq: seq.into(),
        }
    }
}

pub fn write_fasta(path: impl AsRef<Path>, entries: &[FastaEntry]) -> Result<(), IoError> {
    let mut writer = fasta::Writer::new(File::create(path)?);
    for entry in entries {
        writer.write(&entry.id, None, entry.seq.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_fasta(path: impl AsRef<Path>) -> Result<Vec<FastaEntry>, IoError> {
    let reader = fasta::Reader::new(File::open(path)?);
    reader
        .records()
        .map(|record| {
            let record = record?;
            Ok(FastaEntry::new(
                record.id(),
                String::from_utf8_lossy(record.seq()).into_owned(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fasta_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seqs.fasta");
        let entries = vec![
            FastaEntry::new("H", "EVQLVESGGGLVQPGG"),
            FastaEntry::new("L", "DIQMTQSPSSLSASV"),
        ];
        write_fasta(&path, &entries).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(">H\nEVQLVESGGGLVQPGG\n"));
        assert_eq!(read_fasta(&path).unwrap(), entries);
    }
}
