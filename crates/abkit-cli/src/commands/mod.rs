pub mod contacts;
pub mod genbank;
pub mod idmap;
pub mod interpro;
pub mod lineage;
pub mod number;
pub mod predict;
pub mod seqtable;

use abkit_io::{write_table, Separator};
use polars::prelude::*;
use std::io;
use std::path::Path;

/// Write `df` to `output`, or as TSV to stdout.
pub(crate) fn emit_table(df: &mut DataFrame, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            write_table(df, path, Separator::from_path(path))?;
            log::info!("wrote {} rows to {}", df.height(), path.display());
        }
        None => {
            CsvWriter::new(io::stdout().lock())
                .include_header(true)
                .with_separator(Separator::Tab.byte())
                .finish(df)?;
        }
    }
    Ok(())
}
