//! ANARCI command line runner.
//!
//! ANARCI writes one CSV per chain class next to the requested output prefix:
//! `<out>_H.csv` for heavy chains and `<out>_KL.csv` for kappa/lambda chains.
use super::error::ToolError;
use abkit_core::{CoreError, NumberedResidue, Numberer, Scheme};
use abkit_io::{load_numbered_residues, write_fasta, FastaEntry};
use bon::Builder;
use log::{debug, info};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const ANARCI_EXECUTABLE: &str = "ANARCI";
pub const ANARCI_PATH_ENV: &str = "/anaconda/envs/bindpredict/bin:/anaconda/condabin";

const OUTPUT_SUFFIXES: [&str; 2] = ["_H.csv", "_KL.csv"];

#[derive(Debug, Clone, Builder)]
pub struct AnarciRunner {
    #[builder(into, default = PathBuf::from(ANARCI_EXECUTABLE))]
    executable: PathBuf,
    /// `PATH` handed to the tool, which needs its conda environment.
    #[builder(into, default = ANARCI_PATH_ENV.to_string())]
    path_env: String,
}

impl Default for AnarciRunner {
    fn default() -> Self {
        AnarciRunner::builder().build()
    }
}

impl AnarciRunner {
    pub fn command(&self, input: &Path, output: &Path, scheme: Scheme) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("--csv")
            .arg("--scheme")
            .arg(scheme.to_string())
            .env("PATH", &self.path_env);
        command
    }

    pub fn run(&self, input: &Path, output: &Path, scheme: Scheme) -> Result<(), ToolError> {
        let mut command = self.command(input, output, scheme);
        info!("running {command:?}");
        let program = self.executable.display().to_string();
        let result = command.output().map_err(|source| ToolError::Spawn {
            program: program.clone(),
            source,
        })?;
        if !result.status.success() {
            return Err(ToolError::Failed {
                program,
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn number_sequence(
        &self,
        seq: &str,
        scheme: Scheme,
    ) -> Result<Option<Vec<NumberedResidue>>, ToolError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("query.fasta");
        write_fasta(&input, &[FastaEntry::new("query", seq)])?;
        let output = workdir.path().join("anarci");
        self.run(&input, &output, scheme)?;
        read_numbered_output(&output)
    }
}

impl Numberer for AnarciRunner {
    fn number(
        &self,
        seq: &str,
        scheme: Scheme,
    ) -> Result<Option<Vec<NumberedResidue>>, CoreError> {
        self.number_sequence(seq, scheme)
            .map_err(|e| CoreError::Numberer(Box::new(e)))
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Numbered residues of the first domain ANARCI wrote under `prefix`.
///
/// `None` when neither the heavy nor the light chain file exists or it has no rows.
pub fn read_numbered_output(prefix: &Path) -> Result<Option<Vec<NumberedResidue>>, ToolError> {
    let Some(path) = OUTPUT_SUFFIXES
        .iter()
        .map(|suffix| with_suffix(prefix, suffix))
        .find(|path| path.exists())
    else {
        debug!("no ANARCI output under {}", prefix.display());
        return Ok(None);
    };
    let rows = load_numbered_residues(&path)?;
    Ok(rows.into_iter().next().map(|row| row.residues))
}
