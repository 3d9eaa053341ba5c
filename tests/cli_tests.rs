//! Command-line behavior of the `libtable` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn libtable() -> Command {
    Command::cargo_bin("libtable").expect("binary should be built")
}

fn write_table(dir: &TempDir, read1: &str) -> std::path::PathBuf {
    let path = dir.path().join("libraries.tsv");
    fs::write(
        &path,
        format!("library_id\tlibrary_type\tread1_files\tread2_files\nL1\tfr-firststrand\t{read1}\t\n"),
    )
    .unwrap();
    path
}

#[test]
fn test_chrom_default_direction() {
    libtable()
        .args(["chrom", "1", "X", "MT"])
        .assert()
        .success()
        .stdout("chr1\nchrX\nchrM\n");
}

#[test]
fn test_chrom_ucsc_to_ensembl_tsv() {
    libtable()
        .args(["chrom", "chr22", "--from", "ucsc", "--to", "ensembl", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ucsc\tensembl"))
        .stdout(predicate::str::contains("chr22\t22"));
}

#[test]
fn test_chrom_unknown_name_fails() {
    libtable()
        .args(["chrom", "chrUn_gl000220"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown ensembl chromosome name"));
}

#[test]
fn test_validate_valid_table() {
    let dir = TempDir::new().unwrap();
    let reads = dir.path().join("reads.fq");
    fs::write(&reads, b"").unwrap();
    let table = write_table(&dir, &reads.display().to_string());

    libtable()
        .arg("validate")
        .arg(&table)
        .assert()
        .success()
        .stdout(predicate::str::contains("L1 [OK]"))
        .stdout(predicate::str::contains("1 of 1 libraries valid"));
}

#[test]
fn test_validate_missing_read_file_fails() {
    let dir = TempDir::new().unwrap();
    let table = write_table(&dir, "/no/such/reads.fq");

    libtable()
        .arg("validate")
        .arg(&table)
        .assert()
        .failure()
        .stdout(predicate::str::contains("L1 [INVALID]"))
        .stderr(predicate::str::contains("1 of 1 libraries failed validation"));

    libtable()
        .args(["validate", "--allow-invalid", "--format", "json"])
        .arg(&table)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("read 1 file /no/such/reads.fq not found"));
}

#[test]
fn test_export_xml_to_file() {
    let dir = TempDir::new().unwrap();
    let table = write_table(&dir, "a.fq,b.fq");
    let output = dir.path().join("libraries.xml");

    libtable()
        .arg("export")
        .arg(&table)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains("<library_id>L1</library_id>"));
    assert!(xml.contains("<read1_files>a.fq,b.fq</read1_files>"));
    assert!(xml.contains("<fragment_layout>single</fragment_layout>"));
}

#[test]
fn test_export_input_format_override() {
    let dir = TempDir::new().unwrap();
    let table = write_table(&dir, "a.fq");
    let renamed = dir.path().join("libraries.dat");
    fs::rename(&table, &renamed).unwrap();

    libtable()
        .arg("export")
        .arg(&renamed)
        .args(["--input-format", "tsv", "--to", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"library_id\": \"L1\""))
        .stdout(predicate::str::contains("\"fragment_layout\": \"single\""));
}
