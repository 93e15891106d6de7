//! ANARCI `--csv` output.
//!
//! The first [`ANARCI_META_COLUMNS`] columns describe the hit (id, species, e-value, ...).
//! Every column after that is a numbering position and holds the residue placed there,
//! or `-` when the position is unoccupied.
use super::error::IoError;
use super::tables::{read_table, string_column, Separator};
use abkit_core::{ImgtPosition, NumberedResidue};
use polars::prelude::*;
use std::path::Path;

pub const ANARCI_META_COLUMNS: usize = 13;

/// One numbered domain.
#[derive(Debug, Clone, PartialEq)]
pub struct AnarciRow {
    pub id: String,
    pub residues: Vec<NumberedResidue>,
}

/// Position labels and per-row residue columns.
fn position_columns(df: &DataFrame) -> Result<(Vec<String>, Vec<Vec<String>>), IoError> {
    let labels: Vec<String> = df
        .get_columns()
        .iter()
        .skip(ANARCI_META_COLUMNS)
        .map(|column| column.name().to_string())
        .collect();
    let columns = labels
        .iter()
        .map(|label| string_column(df, label))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((labels, columns))
}

fn is_gap(residue: &str) -> bool {
    let residue = residue.trim();
    residue.is_empty() || residue == "-"
}

/// Per row, the position label of every occupied position and `-` elsewhere.
pub fn load_numbering(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>, IoError> {
    let df = read_table(path, Separator::Comma)?;
    let (labels, columns) = position_columns(&df)?;
    let numbering = (0..df.height())
        .map(|row| {
            labels
                .iter()
                .zip(&columns)
                .map(|(label, column)| {
                    if is_gap(&column[row]) {
                        "-".to_string()
                    } else {
                        label.clone()
                    }
                })
                .collect()
        })
        .collect();
    Ok(numbering)
}

/// Per row, the occupied positions with their residues.
pub fn load_numbered_residues(path: impl AsRef<Path>) -> Result<Vec<AnarciRow>, IoError> {
    let df = read_table(path, Separator::Comma)?;
    let ids = string_column(&df, "Id")?;
    let (labels, columns) = position_columns(&df)?;
    let positions = labels
        .iter()
        .map(|label| label.parse::<ImgtPosition>())
        .collect::<Result<Vec<_>, _>>()?;

    let rows = ids
        .into_iter()
        .enumerate()
        .map(|(row, id)| {
            let residues = positions
                .iter()
                .zip(&columns)
                .filter(|(_, column)| !is_gap(&column[row]))
                .filter_map(|(position, column)| {
                    column[row].trim().chars().next().map(|residue| NumberedResidue {
                        position: *position,
                        residue,
                    })
                })
                .collect();
            AnarciRow { id, residues }
        })
        .collect();
    Ok(rows)
}
