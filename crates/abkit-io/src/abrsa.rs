//! AbRSA region annotation reports.
//!
//! ```text
//! >name
//! #similarity 87.5
//! H_FR1:EVQLVESGGGLVQPGGSLRLSCAAS
//! H_CDR1:GFTFSSYA
//! ...
//! H_EXT:ASTKGP
//! ```
//!
//! `EXT` holds residues outside the variable domain. Trailing ones belong to FR4,
//! leading ones (seen before FR4) are kept in FR1.
use super::error::IoError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionAnnotation {
    pub name: String,
    /// Fraction in `0..=1`.
    pub similarity: Option<f64>,
    pub regions: BTreeMap<String, String>,
}

impl RegionAnnotation {
    fn new(name: &str) -> Self {
        RegionAnnotation {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn region(&self, name: &str) -> Option<&str> {
        self.regions.get(name).map(String::as_str)
    }

    fn add_segment(&mut self, region: &str, seq: &str) {
        match region {
            "EXT" => match self.regions.get_mut("FR4") {
                Some(fr4) => fr4.push_str(seq),
                None => {
                    self.regions.insert("FR1".to_string(), seq.to_string());
                }
            },
            "FR1" => self
                .regions
                .entry("FR1".to_string())
                .or_default()
                .push_str(seq),
            other => {
                self.regions.insert(other.to_string(), seq.to_string());
            }
        }
    }
}

pub fn parse_region_result<R: BufRead>(reader: R) -> Result<Vec<RegionAnnotation>, IoError> {
    let mut annotations: Vec<RegionAnnotation> = vec![];
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(name) = line.strip_prefix('>') {
            annotations.push(RegionAnnotation::new(name.trim()));
        } else if let Some(value) = line.strip_prefix("#similarity") {
            let current = annotations
                .last_mut()
                .ok_or_else(|| IoError::parse("AbRSA", idx + 1, "similarity before any record"))?;
            let similarity: f64 = value.trim().parse().map_err(|_| {
                IoError::parse("AbRSA", idx + 1, format!("bad similarity '{}'", value.trim()))
            })?;
            current.similarity = Some(similarity / 100.0);
        } else if line.starts_with(['H', 'L', '-']) {
            let Some((label, seq)) = line.split_once(':') else {
                continue;
            };
            let current = annotations
                .last_mut()
                .ok_or_else(|| IoError::parse("AbRSA", idx + 1, "segment before any record"))?;
            // `H_FR1` -> `FR1`
            let region = label.trim().get(2..).unwrap_or_default();
            current.add_segment(region, seq.trim());
        }
    }
    Ok(annotations)
}

pub fn load_region_result(path: impl AsRef<Path>) -> Result<Vec<RegionAnnotation>, IoError> {
    parse_region_result(BufReader::new(File::open(path)?))
}
