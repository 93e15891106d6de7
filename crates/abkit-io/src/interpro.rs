//! InterProScan TSV output.
//!
//! Rows without an InterPro match stop after the date column, so short rows are padded
//! with empty values instead of being rejected.
use super::error::IoError;
use chrono::NaiveDate;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const INTERPRO_COLUMNS: [&str; 13] = [
    "acc",
    "md5",
    "length",
    "analysis",
    "sig_acc",
    "sig_description",
    "start",
    "stop",
    "score",
    "status",
    "date",
    "interpro_acc",
    "interpro_description",
];

#[derive(Debug, Clone, PartialEq)]
pub struct InterProHit {
    pub acc: String,
    pub md5: String,
    pub length: u32,
    pub analysis: String,
    pub sig_acc: String,
    pub sig_description: String,
    pub start: u32,
    pub stop: u32,
    /// `None` for analyses that report `-`.
    pub score: Option<f64>,
    pub status: String,
    pub date: Option<NaiveDate>,
    pub interpro_acc: String,
    pub interpro_description: String,
}

fn parse_field<T: std::str::FromStr>(value: &str, name: &str, line: usize) -> Result<T, IoError> {
    value
        .trim()
        .parse()
        .map_err(|_| IoError::parse("InterProScan", line, format!("bad {name} '{value}'")))
}

fn parse_hit(line: &str, line_no: usize) -> Result<InterProHit, IoError> {
    let mut fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 8 {
        return Err(IoError::parse(
            "InterProScan",
            line_no,
            format!("expected at least 8 columns, found {}", fields.len()),
        ));
    }
    fields.resize(INTERPRO_COLUMNS.len(), "");

    let score = match fields[8].trim() {
        "" | "-" => None,
        value => Some(parse_field(value, "score", line_no)?),
    };
    let date = match fields[10].trim() {
        "" | "-" => None,
        value => NaiveDate::parse_from_str(value, "%d-%m-%Y")
            .inspect_err(|_| warn!("InterProScan line {line_no}: unreadable date '{value}'"))
            .ok(),
    };
    Ok(InterProHit {
        acc: fields[0].to_string(),
        md5: fields[1].to_string(),
        length: parse_field(fields[2], "length", line_no)?,
        analysis: fields[3].to_string(),
        sig_acc: fields[4].to_string(),
        sig_description: fields[5].to_string(),
        start: parse_field(fields[6], "start", line_no)?,
        stop: parse_field(fields[7], "stop", line_no)?,
        score,
        status: fields[9].to_string(),
        date,
        interpro_acc: fields[11].to_string(),
        interpro_description: fields[12].to_string(),
    })
}

/// Load an InterProScan TSV result (no header).
pub fn load_result(path: impl AsRef<Path>) -> Result<Vec<InterProHit>, IoError> {
    let reader = BufReader::new(File::open(path)?);
    let mut hits = vec![];
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        hits.push(parse_hit(line.trim_end_matches('\r'), idx + 1)?);
    }
    debug!("{} InterProScan hits", hits.len());
    Ok(hits)
}
