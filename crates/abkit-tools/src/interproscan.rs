//! InterProScan runner and V-domain selection.
use super::error::ToolError;
use abkit_core::ChainType;
use abkit_io::InterProHit;
use bon::Builder;
use log::info;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Immunoglobulin superfamily signature.
const SUPERFAMILY_IG: &str = "SSF48726";
/// Immunoglobulin V-set domain.
const PFAM_V_SET: &str = "PF07686";
const CDD_HEAVY_V: &[&str] = &["cd04981"];
const CDD_LIGHT_V: &[&str] = &["cd04980", "cd04984"];
/// Superfamily hits starting later than this belong to a constant domain.
const SUPERFAMILY_MAX_START: u32 = 50;

#[derive(Debug, Clone, Builder)]
pub struct InterProScanConfig {
    #[builder(into)]
    executable: PathBuf,
    #[builder(default = 20)]
    ncpu: usize,
    #[builder(into, default = "SUPERFAMILY,Gene3D,CDD,SMART,Pfam".to_string())]
    applications: String,
    #[builder(into, default = "TSV".to_string())]
    formats: String,
    #[builder(default = true)]
    verbose: bool,
}

impl InterProScanConfig {
    pub fn command(&self, query: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("-i")
            .arg(query)
            .arg("-o")
            .arg(output)
            .arg("-cpu")
            .arg(self.ncpu.to_string())
            .arg("-appl")
            .arg(&self.applications)
            .arg("-f")
            .arg(&self.formats);
        if self.verbose {
            command.arg("-verbose");
        }
        command
    }

    /// Start InterProScan and return the running process; its output is piped.
    pub fn run(&self, query: &Path, output: &Path) -> Result<Child, ToolError> {
        let mut command = self.command(query, output);
        info!("running {command:?}");
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: self.executable.display().to_string(),
                source,
            })
    }
}

fn analysis_rank(analysis: &str) -> u32 {
    match analysis {
        "CDD" => 1,
        "Pfam" => 2,
        "SUPERFAMILY" => 3,
        _ => 100,
    }
}

/// Hits that cover the variable domain of a `chain` sequence.
///
/// A signature filter only applies when its analysis ran. With `dedup` the best hit
/// per sequence is kept, preferring CDD over Pfam over SUPERFAMILY.
pub fn extract_vdomain_result(
    hits: &[InterProHit],
    chain: ChainType,
    dedup: bool,
) -> Vec<InterProHit> {
    let analyses: HashSet<&str> = hits.iter().map(|hit| hit.analysis.as_str()).collect();
    let cdd_accs = match chain {
        ChainType::Heavy => CDD_HEAVY_V,
        ChainType::Light => CDD_LIGHT_V,
    };
    let is_vdomain = |hit: &InterProHit| {
        (analyses.contains("SUPERFAMILY")
            && hit.sig_acc == SUPERFAMILY_IG
            && hit.start < SUPERFAMILY_MAX_START)
            || (analyses.contains("Pfam") && hit.sig_acc == PFAM_V_SET)
            || (analyses.contains("CDD") && cdd_accs.contains(&hit.sig_acc.as_str()))
    };
    let mut vdomains: Vec<InterProHit> = hits.iter().filter(|hit| is_vdomain(hit)).cloned().collect();
    if !dedup {
        return vdomains;
    }
    vdomains.sort_by_key(|hit| analysis_rank(&hit.analysis));
    let mut seen = HashSet::new();
    vdomains.retain(|hit| seen.insert(hit.acc.clone()));
    vdomains
}

#[cfg(test)]
mod tests {
    use super::*;
    use abkit_io::load_result;
    use abkit_test_data::TestFile;

    fn hits() -> Vec<InterProHit> {
        let (path, _tmp) = TestFile::interpro_01().create_temp().unwrap();
        load_result(&path).unwrap()
    }

    fn summary(hits: &[InterProHit]) -> Vec<(String, String)> {
        hits.iter()
            .map(|h| (h.acc.clone(), h.sig_acc.clone()))
            .collect()
    }

    #[test]
    fn test_command() {
        let config = InterProScanConfig::builder()
            .executable("/opt/interproscan/interproscan.sh")
            .ncpu(4)
            .build();
        let command = config.command(Path::new("q.fasta"), Path::new("o.tsv"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(
            args,
            [
                "-i",
                "q.fasta",
                "-o",
                "o.tsv",
                "-cpu",
                "4",
                "-appl",
                "SUPERFAMILY,Gene3D,CDD,SMART,Pfam",
                "-f",
                "TSV",
                "-verbose"
            ]
        );

        let quiet = InterProScanConfig::builder()
            .executable("interproscan.sh")
            .verbose(false)
            .build();
        let command = quiet.command(Path::new("q"), Path::new("o"));
        assert_eq!(command.get_args().nth(5).unwrap(), "20");
        assert_eq!(command.get_args().last().unwrap(), "TSV");
    }

    #[test]
    fn test_extract_heavy() {
        let hits = hits();
        let all = extract_vdomain_result(&hits, ChainType::Heavy, false);
        assert_eq!(
            summary(&all),
            [
                ("seqH".to_string(), "PF07686".to_string()),
                ("seqH".to_string(), "SSF48726".to_string()),
                ("seqH".to_string(), "cd04981".to_string()),
                ("seqL".to_string(), "PF07686".to_string()),
                ("seqL".to_string(), "cd04981".to_string()),
            ]
        );
        let best = extract_vdomain_result(&hits, ChainType::Heavy, true);
        assert_eq!(
            summary(&best),
            [
                ("seqH".to_string(), "cd04981".to_string()),
                ("seqL".to_string(), "cd04981".to_string()),
            ]
        );
    }

    #[test]
    fn test_extract_light() {
        let best = extract_vdomain_result(&hits(), ChainType::Light, true);
        assert_eq!(
            summary(&best),
            [
                ("seqL".to_string(), "cd04980".to_string()),
                ("seqH".to_string(), "PF07686".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_needs_analysis() {
        // SUPERFAMILY and Pfam did not run; their accessions reported by another
        // analysis do not count as V-domain hits
        let mut hits: Vec<InterProHit> = hits()
            .into_iter()
            .filter(|h| h.analysis != "SUPERFAMILY" && h.analysis != "Pfam")
            .collect();
        let gene3d = hits.iter().position(|h| h.analysis == "Gene3D").unwrap();
        hits[gene3d].sig_acc = SUPERFAMILY_IG.to_string();
        let mut relabelled = hits[gene3d].clone();
        relabelled.sig_acc = PFAM_V_SET.to_string();
        hits.push(relabelled);

        let heavy = extract_vdomain_result(&hits, ChainType::Heavy, false);
        assert_eq!(
            summary(&heavy),
            vec![
                ("seqH".to_string(), "cd04981".to_string()),
                ("seqL".to_string(), "cd04981".to_string())
            ]
        );

        // once Pfam ran, PF07686 counts whatever analysis reported it
        hits[gene3d].analysis = "Pfam".to_string();
        let heavy = extract_vdomain_result(&hits, ChainType::Heavy, false);
        assert_eq!(heavy.len(), 3);
        assert!(extract_vdomain_result(&[], ChainType::Light, true).is_empty());
    }
}
