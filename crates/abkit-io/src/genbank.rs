//! GenBank flat files as returned by Entrez `efetch` (`rettype=gb`).
//!
//! Only what antibody translation needs is kept: identifiers, the definition line, the
//! feature table and the sequence.
use super::error::IoError;
use abkit_core::translate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const FEATURE_KEY_COL: usize = 5;
const QUALIFIER_COL: usize = 21;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub key: String,
    pub location: String,
    pub qualifiers: Vec<(String, String)>,
}

impl Feature {
    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenBankRecord {
    pub locus: String,
    pub accession: String,
    pub version: String,
    pub definition: String,
    pub features: Vec<Feature>,
    /// Lowercase nucleotides.
    pub sequence: String,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Header,
    Definition,
    Features,
    Origin,
}

fn push_qualifier_line(feature: &mut Feature, text: &str) {
    if let Some(qualifier) = text.strip_prefix('/') {
        let (key, value) = qualifier.split_once('=').unwrap_or((qualifier, ""));
        feature
            .qualifiers
            .push((key.to_string(), value.trim_matches('"').to_string()));
    } else if let Some((key, value)) = feature.qualifiers.last_mut() {
        // continuation of a wrapped value; translations are joined without spaces
        if key != "translation" {
            value.push(' ');
        }
        value.push_str(text.trim_end_matches('"'));
    }
}

pub fn parse_genbank<R: BufRead>(reader: R) -> Result<Vec<GenBankRecord>, IoError> {
    let mut records = vec![];
    let mut record = GenBankRecord::default();
    let mut section = Section::Header;
    let mut in_record = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("//") {
            if !in_record {
                return Err(IoError::parse("GenBank", idx + 1, "record terminator without LOCUS"));
            }
            if record.definition.ends_with('.') {
                record.definition.pop();
            }
            records.push(std::mem::take(&mut record));
            section = Section::Header;
            in_record = false;
            continue;
        }

        let is_keyword = !line.starts_with(' ');
        if is_keyword {
            let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim();
            section = match keyword {
                "LOCUS" => {
                    in_record = true;
                    record.locus = rest.split_whitespace().next().unwrap_or_default().to_string();
                    Section::Header
                }
                "DEFINITION" => {
                    record.definition = rest.to_string();
                    Section::Definition
                }
                "ACCESSION" => {
                    record.accession = rest.split_whitespace().next().unwrap_or_default().to_string();
                    Section::Header
                }
                "VERSION" => {
                    record.version = rest.split_whitespace().next().unwrap_or_default().to_string();
                    Section::Header
                }
                "FEATURES" => Section::Features,
                "ORIGIN" => Section::Origin,
                _ => Section::Header,
            };
            if !in_record {
                return Err(IoError::parse("GenBank", idx + 1, "content before LOCUS"));
            }
            continue;
        }

        match section {
            Section::Definition => {
                record.definition.push(' ');
                record.definition.push_str(line.trim());
            }
            Section::Features => {
                let indent = line.len() - line.trim_start().len();
                if indent < QUALIFIER_COL && indent >= FEATURE_KEY_COL {
                    let (key, location) = line
                        .trim()
                        .split_once(char::is_whitespace)
                        .unwrap_or((line.trim(), ""));
                    record.features.push(Feature {
                        key: key.to_string(),
                        location: location.trim().to_string(),
                        qualifiers: vec![],
                    });
                } else if let Some(feature) = record.features.last_mut() {
                    push_qualifier_line(feature, line.trim());
                }
            }
            Section::Origin => record
                .sequence
                .extend(line.chars().filter(char::is_ascii_alphabetic)),
            Section::Header => {}
        }
    }
    Ok(records)
}

pub fn read_genbank(path: impl AsRef<Path>) -> Result<Vec<GenBankRecord>, IoError> {
    parse_genbank(BufReader::new(File::open(path)?))
}

/// Protein sequence of an antibody record.
///
/// Uses the `translation` of the first CDS feature when there is one, otherwise
/// translates the whole nucleotide sequence up to the first stop codon.
pub fn translate_mab(record: &GenBankRecord) -> String {
    record
        .features
        .iter()
        .find(|feature| feature.key == "CDS")
        .and_then(|cds| cds.qualifier("translation"))
        .map(str::to_string)
        .unwrap_or_else(|| translate(record.sequence.as_bytes(), true))
}
