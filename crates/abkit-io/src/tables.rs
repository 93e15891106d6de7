//! Delimited tables.
//!
//! Every column is read as a string so sequence and identifier columns are never
//! reinterpreted as numbers.
use super::error::IoError;
use abkit_core::{PairedSeqRecord, VariantRbd, VariantTable};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Tab,
    Comma,
}

impl Separator {
    pub fn byte(self) -> u8 {
        match self {
            Separator::Tab => b'\t',
            Separator::Comma => b',',
        }
    }

    /// `.csv` files are comma separated, anything else is taken as TSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Separator::Comma,
            _ => Separator::Tab,
        }
    }
}

pub fn read_table(path: impl AsRef<Path>, separator: Separator) -> Result<DataFrame, IoError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_separator(separator.byte()))
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;
    Ok(df)
}

pub fn write_table(
    df: &mut DataFrame,
    path: impl AsRef<Path>,
    separator: Separator,
) -> Result<(), IoError> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(separator.byte())
        .finish(df)?;
    Ok(())
}

/// Values of a string column, nulls read as empty strings.
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>, IoError> {
    let column = df
        .column(name)
        .map_err(|_| IoError::MissingColumn(name.to_string()))?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect())
}

fn optional_column(df: &DataFrame, name: &str) -> Result<Option<Vec<String>>, IoError> {
    match df.column(name) {
        Ok(_) => string_column(df, name).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "1.0" | "true" | "True" | "TRUE")
}

pub const SOURCE_COL: &str = "source";
pub const NOTAB_COL: &str = "notab-like";
pub const HREGION_COL: &str = "Hregion";
pub const LREGION_COL: &str = "Lregion";

/// Column names of a paired sequence table, in file order.
///
/// Records only hold values; the layout remembers what the caller called the
/// index and sequence columns so a table can be written back the way it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqTableLayout {
    pub index_col: Option<String>,
    pub heavy_col: String,
    pub light_col: String,
    pub columns: Vec<String>,
}

impl Default for SeqTableLayout {
    fn default() -> Self {
        SeqTableLayout {
            index_col: Some("ab_idx".to_string()),
            heavy_col: "Hseq".to_string(),
            light_col: "Lseq".to_string(),
            columns: ["ab_idx", SOURCE_COL, NOTAB_COL, "Hseq", "Lseq"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl SeqTableLayout {
    fn is_typed(&self, name: &str) -> bool {
        self.index_col.as_deref() == Some(name)
            || name == self.heavy_col
            || name == self.light_col
            || [SOURCE_COL, NOTAB_COL, HREGION_COL, LREGION_COL].contains(&name)
    }

    fn value_of(&self, record: &PairedSeqRecord, name: &str) -> Option<String> {
        if self.index_col.as_deref() == Some(name) {
            return Some(record.ab_idx.clone());
        }
        if name == self.heavy_col {
            return Some(record.hseq.clone());
        }
        if name == self.light_col {
            return Some(record.lseq.clone());
        }
        match name {
            SOURCE_COL => Some(record.source.clone()),
            NOTAB_COL => Some(if record.notab_like { "1" } else { "0" }.to_string()),
            HREGION_COL => record.hregion.clone(),
            LREGION_COL => record.lregion.clone(),
            _ => record
                .extra
                .iter()
                .find(|(column, _)| column == name)
                .map(|(_, value)| value.clone()),
        }
    }
}

/// Load a paired heavy/light sequence table together with its column layout.
///
/// `seq_cols` names the heavy and light sequence columns. Records are keyed by
/// `index_col`, or by row number when it is `None`. The optional columns `source`,
/// `notab-like`, `Hregion` and `Lregion` are picked up when present. Every other
/// column lands in [`PairedSeqRecord::extra`].
pub fn read_seqtable(
    path: impl AsRef<Path>,
    index_col: Option<&str>,
    seq_cols: (&str, &str),
) -> Result<(Vec<PairedSeqRecord>, SeqTableLayout), IoError> {
    let path = path.as_ref();
    let df = read_table(path, Separator::from_path(path))?;
    let layout = SeqTableLayout {
        index_col: index_col.map(String::from),
        heavy_col: seq_cols.0.to_string(),
        light_col: seq_cols.1.to_string(),
        columns: df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect(),
    };
    let hseqs = string_column(&df, seq_cols.0)?;
    let lseqs = string_column(&df, seq_cols.1)?;
    let ab_idxs = match index_col {
        Some(name) => string_column(&df, name)?,
        None => (0..df.height()).map(|i| i.to_string()).collect(),
    };
    let sources = optional_column(&df, SOURCE_COL)?;
    let notab = optional_column(&df, NOTAB_COL)?;
    let hregions = optional_column(&df, HREGION_COL)?;
    let lregions = optional_column(&df, LREGION_COL)?;
    let extra_columns = layout
        .columns
        .iter()
        .filter(|name| !layout.is_typed(name))
        .map(|name| Ok((name.clone(), string_column(&df, name)?)))
        .collect::<Result<Vec<(String, Vec<String>)>, IoError>>()?;

    let non_empty = |col: &Option<Vec<String>>, i: usize| {
        col.as_ref()
            .map(|values| values[i].clone())
            .filter(|value| !value.is_empty())
    };
    let records = (0..df.height())
        .map(|i| PairedSeqRecord {
            ab_idx: ab_idxs[i].clone(),
            source: non_empty(&sources, i).unwrap_or_default(),
            notab_like: notab.as_ref().is_some_and(|values| parse_flag(&values[i])),
            hseq: hseqs[i].clone(),
            lseq: lseqs[i].clone(),
            hregion: non_empty(&hregions, i),
            lregion: non_empty(&lregions, i),
            extra: extra_columns
                .iter()
                .map(|(name, values)| (name.clone(), values[i].clone()))
                .collect(),
        })
        .collect();
    Ok((records, layout))
}

/// Load a paired heavy/light sequence table, see [`read_seqtable`].
pub fn load_seqtable(
    path: impl AsRef<Path>,
    index_col: Option<&str>,
    seq_cols: (&str, &str),
) -> Result<Vec<PairedSeqRecord>, IoError> {
    read_seqtable(path, index_col, seq_cols).map(|(records, _)| records)
}

/// Write records back in `layout` order under the layout's column names.
///
/// `Hregion`/`Lregion` are appended when the layout lacks them and some record
/// carries a region label.
pub fn write_seqtable(
    records: &[PairedSeqRecord],
    layout: &SeqTableLayout,
    path: impl AsRef<Path>,
) -> Result<(), IoError> {
    let path = path.as_ref();
    let mut names = layout.columns.clone();
    let labelled = [
        (HREGION_COL, records.iter().any(|r| r.hregion.is_some())),
        (LREGION_COL, records.iter().any(|r| r.lregion.is_some())),
    ];
    for (region_col, present) in labelled {
        if present && !names.iter().any(|name| name == region_col) {
            names.push(region_col.to_string());
        }
    }
    let columns: Vec<Column> = names
        .iter()
        .map(|name| {
            let values: Vec<Option<String>> = records
                .iter()
                .map(|record| layout.value_of(record, name).filter(|v| !v.is_empty()))
                .collect();
            Series::new(name.as_str().into(), values).into()
        })
        .collect();
    let mut df = DataFrame::new(columns)?;
    write_table(&mut df, path, Separator::from_path(path))
}

/// Load the variant RBD reference table (`lineage`, `rbd_seq`) and append the
/// wild-type entry.
pub fn load_variant_table(path: impl AsRef<Path>) -> Result<VariantTable, IoError> {
    let path = path.as_ref();
    let df = read_table(path, Separator::from_path(path))?;
    let lineages = string_column(&df, "lineage")?;
    let rbd_seqs = string_column(&df, "rbd_seq")?;
    let variants = lineages
        .into_iter()
        .zip(rbd_seqs)
        .map(|(lineage, rbd_seq)| VariantRbd::new(lineage, rbd_seq))
        .collect();
    Ok(VariantTable::new(variants).with_wild_type())
}

/// Two-column lookup such as sequence -> V-domain or sequence -> regions.
///
/// Rows with an empty value are skipped.
pub fn load_lookup_table(
    path: impl AsRef<Path>,
    key_col: &str,
    value_col: &str,
) -> Result<HashMap<String, String>, IoError> {
    let path = path.as_ref();
    let df = read_table(path, Separator::from_path(path))?;
    let keys = string_column(&df, key_col)?;
    let values = string_column(&df, value_col)?;
    Ok(keys
        .into_iter()
        .zip(values)
        .filter(|(_, value)| !value.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use abkit_core::{RBD_WT_SEQ, WILD_TYPE_LINEAGE};
    use abkit_test_data::TestFile;

    #[test]
    fn test_load_seqtable() {
        let (path, _tmp) = TestFile::seqtable_01().create_temp().unwrap();
        let records = load_seqtable(&path, Some("ab_idx"), ("Hseq", "Lseq")).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].ab_idx, "ab2");
        assert_eq!(records[1].source, "pdb");
        assert_eq!(records[0].hseq, "EVQLVESGGGLVQPGG");
        assert!(!records[0].notab_like);
        assert_eq!(records[0].hregion, None);

        let by_row = load_seqtable(&path, None, ("Hseq", "Lseq")).unwrap();
        assert_eq!(by_row[3].ab_idx, "3");
    }

    #[test]
    fn test_missing_column() {
        let (path, _tmp) = TestFile::seqtable_01().create_temp().unwrap();
        let err = load_seqtable(&path, None, ("heavy", "Lseq")).unwrap_err();
        assert!(matches!(err, IoError::MissingColumn(name) if name == "heavy"));
    }

    #[test]
    fn test_write_seqtable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let records = vec![PairedSeqRecord {
            ab_idx: "ab9".to_string(),
            source: "patent".to_string(),
            notab_like: true,
            hseq: "EVQ".to_string(),
            lseq: "DIQ".to_string(),
            hregion: Some("1 1 1".to_string()),
            lregion: None,
            extra: vec![],
        }];
        write_seqtable(&records, &SeqTableLayout::default(), &path).unwrap();
        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("ab_idx\tsource\tnotab-like\tHseq\tLseq\tHregion\n"));
        let loaded = load_seqtable(&path, Some("ab_idx"), ("Hseq", "Lseq")).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_seqtable_keeps_caller_columns() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "name,id,heavy,light,target\nmAb1,7,EVQ,DIQ,RBD\nmAb2,8,QVQ,EIV,\n")
            .unwrap();
        let (mut records, layout) = read_seqtable(&input, Some("id"), ("heavy", "light")).unwrap();
        assert_eq!(records[0].ab_idx, "7");
        assert_eq!(
            records[0].extra,
            vec![
                ("name".to_string(), "mAb1".to_string()),
                ("target".to_string(), "RBD".to_string())
            ]
        );
        records[1].hseq = "QVQL".to_string();

        let output = dir.path().join("out.csv");
        write_seqtable(&records, &layout, &output).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "name,id,heavy,light,target");
        assert_eq!(lines[1], "mAb1,7,EVQ,DIQ,RBD");
        assert_eq!(lines[2], "mAb2,8,QVQL,EIV,");
    }

    #[test]
    fn test_load_variant_table() {
        let (path, _tmp) = TestFile::variants_01().create_temp().unwrap();
        let table = load_variant_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.variants()[0].lineage, "B.1.1.7");
        assert_eq!(table.variants()[1].lineage, WILD_TYPE_LINEAGE);
        assert_eq!(table.identify_lineage(RBD_WT_SEQ), Some(WILD_TYPE_LINEAGE));
    }

    #[test]
    fn test_load_lookup_table() {
        let (path, _tmp) = TestFile::seqtable_01().create_temp().unwrap();
        let lookup = load_lookup_table(&path, "Hseq", "Lseq").unwrap();
        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup["QVQLQESGPGLVKPSE"], "EIVLTQSPGTLSLSP");
    }
}
