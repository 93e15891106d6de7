use abkit_core::{RBD_START, RBD_WT_SEQ};
use abkit_test_data::TestFile;
use assert_cmd::Command;
use std::fs;

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("abkit").unwrap();
    let help = stdout_of(cmd.arg("--help"));
    for subcommand in ["number", "lineage", "contacts", "idmap", "predict", "interpro", "genbank", "seqtable"] {
        assert!(help.contains(subcommand), "missing {subcommand}");
    }
}

#[test]
fn test_cli_lineage() {
    let (variants, _tmp) = TestFile::variants_01().create_temp().unwrap();
    let n501 = (501 - RBD_START) as usize;
    let mut alpha = RBD_WT_SEQ.to_string();
    alpha.replace_range(n501..n501 + 1, "Y");

    let mut cmd = Command::cargo_bin("abkit").unwrap();
    cmd.arg("lineage")
        .arg("--variants")
        .arg(&variants)
        .arg(RBD_WT_SEQ)
        .arg(&alpha);
    assert_eq!(stdout_of(&mut cmd), "seq1\tWT\nseq2\tB.1.1.7\n");

    let mut empty = Command::cargo_bin("abkit").unwrap();
    empty.arg("lineage").arg("--variants").arg(&variants);
    empty.assert().failure();
}

#[test]
fn test_cli_contacts() {
    let (pdb_file, _tmp) = TestFile::complex_01().create_temp().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("contacts.tsv");

    let mut cmd = Command::cargo_bin("abkit").unwrap();
    cmd.arg("contacts")
        .arg("--structure")
        .arg(&pdb_file)
        .arg("--ab-chains")
        .arg("H,L")
        .arg("--rbd-chain")
        .arg("E")
        .arg("--output")
        .arg(&output);
    cmd.assert().success();

    let table = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 9);
    let header: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(header.len(), 4 + 223);
    assert_eq!(header[4], "319");
    assert!(lines[1].starts_with("H\t1\t"));
}

#[test]
fn test_cli_genbank_records() {
    let (records, _tmp) = TestFile::genbank_01().create_temp().unwrap();
    let mut cmd = Command::cargo_bin("abkit").unwrap();
    cmd.arg("genbank").arg("--records").arg(&records);
    let table = stdout_of(&mut cmd);
    assert_eq!(table.lines().count(), 3);
    assert!(table.contains("EVQLVESGGGLVQPGGSLRL"));
    assert!(table.contains("DIQMTQSP"));
}

#[test]
fn test_cli_interpro_result() {
    let (result, _tmp) = TestFile::interpro_01().create_temp().unwrap();
    let mut cmd = Command::cargo_bin("abkit").unwrap();
    cmd.arg("interpro")
        .arg("--result")
        .arg(&result)
        .arg("--chain")
        .arg("L");
    let table = stdout_of(&mut cmd);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("seqL\tCDD\tcd04980"));
    assert!(lines[2].starts_with("seqH\tPfam\tPF07686"));
}

#[test]
fn test_cli_seqtable_dedup() {
    let (input, _tmp) = TestFile::seqtable_02().create_temp().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dedup.tsv");

    let mut cmd = Command::cargo_bin("abkit").unwrap();
    cmd.arg("seqtable")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--dedup");
    cmd.assert().success();

    let table = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "ab_idx\tname\tsource\tnotab-like\tHseq\tLseq");
    // ab1 from genbank beats ab1 from pdb, ab3 is flagged notab-like
    assert_eq!(
        lines[1..],
        [
            "ab1\tmAb-1\tgenbank\t0\tEVQLVESGGGLVQPGA\tDIQMTQSPSSLSASV",
            "ab2\tmAb-2\tpatent\t0\tQVQLQESGPGLVKPSE\tEIVLTQSPGTLSLSP",
            "ab4\tmAb-4\tINN\t0\tQVQLVQSGAEVKKPGA\tDIVMTQSPDSLAVSL",
        ]
    );
}

#[test]
fn test_cli_seqtable_fv_table() {
    let dir = tempfile::tempdir().unwrap();
    let long_heavy = format!("QVQLVQ{}", "S".repeat(150));
    let input = dir.path().join("input.tsv");
    fs::write(&input, format!("id\theavy\tlight\nx1\t{long_heavy}\tDIQ\n")).unwrap();
    let fv_table = dir.path().join("fv.tsv");
    fs::write(&fv_table, format!("seq\tseq_vdomain\n{long_heavy}\tQVQLVQ\n")).unwrap();
    let output = dir.path().join("fv_out.tsv");

    let mut cmd = Command::cargo_bin("abkit").unwrap();
    cmd.arg("seqtable")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--index-col")
        .arg("id")
        .arg("--heavy-col")
        .arg("heavy")
        .arg("--light-col")
        .arg("light")
        .arg("--fv-table")
        .arg(&fv_table);
    cmd.assert().success();

    let table = fs::read_to_string(&output).unwrap();
    assert_eq!(table, "id\theavy\tlight\nx1\tQVQLVQ\tDIQ\n");
}
