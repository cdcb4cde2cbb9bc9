use predicates::prelude::*;
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::path::Path;

fn wrapchain() -> Result<assert_cmd::Command, Box<dyn Error>> {
    Ok(assert_cmd::Command::cargo_bin("wrapchain")?)
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn writes_chain_and_reports_size() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let chain_path = dir.path().join("chain.txt");

    wrapchain()?
        .args([
            "/etc/passwd",
            "<root><test>",
            "</test></root>",
            "100",
            "-o",
            path_str(&chain_path),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dumping 102 bytes from /etc/passwd."))
        .stdout(predicate::str::contains("Wrote filter chain to"));

    let chain = fs::read_to_string(&chain_path)?;
    assert!(chain.starts_with("php://filter/convert.base64-encode|"));
    assert!(chain.ends_with("/resource=/etc/passwd"));
    Ok(())
}

#[test]
fn json_summary_parses() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let chain_path = dir.path().join("out.txt");

    let output = wrapchain()?
        .args([
            "/etc/hosts",
            "{\"a\":\"",
            "\"}",
            "18",
            "-o",
            path_str(&chain_path),
            "--format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["resource"], "/etc/hosts");
    assert_eq!(value["dumped_len"], 18);
    assert_eq!(value["verified"], true);
    let written = value["bytes_written"].as_u64().unwrap();
    assert_eq!(written, fs::metadata(&chain_path)?.len());
    Ok(())
}

#[test]
fn empty_prefix_and_suffix_write_trivial_chain() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let chain_path = dir.path().join("chain.txt");

    wrapchain()?
        .args(["/etc/passwd", "", "", "50", "-o", path_str(&chain_path)])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&chain_path)?,
        "php://filter/resource=/etc/passwd"
    );
    Ok(())
}

#[test]
fn fast_prefix_with_suffix_fails_without_output() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let chain_path = dir.path().join("chain.txt");

    wrapchain()?
        .args([
            "/etc/passwd",
            "<a>",
            "</a>",
            "9",
            "--fast-prefix",
            "-o",
            path_str(&chain_path),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: Invalid target: the prefix-only layout cannot add a suffix",
        ))
        .stderr(predicate::str::contains("InvalidTarget(").not());

    assert!(!chain_path.exists());
    Ok(())
}

#[test]
fn fast_prefix_alone_succeeds() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let chain_path = dir.path().join("chain.txt");

    wrapchain()?
        .args([
            "/etc/passwd",
            "<?php ?>",
            "",
            "0",
            "--fast-prefix",
            "-o",
            path_str(&chain_path),
        ])
        .assert()
        .success();

    let chain = fs::read_to_string(&chain_path)?;
    assert!(chain.starts_with("php://filter/convert.base64-encode|convert.iconv.855.UTF7|"));
    assert!(chain.contains("|convert.base64-decode/resource=/etc/passwd"));
    Ok(())
}

#[test]
fn from_file_reads_prefix_and_suffix() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let prefix_path = dir.path().join("prefix.bin");
    let suffix_path = dir.path().join("suffix.bin");
    let from_file = dir.path().join("from_file.txt");
    let inline = dir.path().join("inline.txt");
    fs::write(&prefix_path, "<x>")?;
    fs::write(&suffix_path, "</x>")?;

    wrapchain()?
        .args([
            "/etc/passwd",
            path_str(&prefix_path),
            path_str(&suffix_path),
            "9",
            "--from-file",
            "-o",
            path_str(&from_file),
        ])
        .assert()
        .success();
    wrapchain()?
        .args(["/etc/passwd", "<x>", "</x>", "9", "-o", path_str(&inline)])
        .assert()
        .success();

    assert_eq!(fs::read(&from_file)?, fs::read(&inline)?);
    Ok(())
}

#[test]
fn missing_prefix_file_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing.bin");

    wrapchain()?
        .args([
            "/etc/passwd",
            path_str(&missing),
            path_str(&missing),
            "9",
            "--from-file",
            "-o",
            path_str(&dir.path().join("chain.txt")),
        ])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn config_file_provides_defaults() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("wrapchain.toml");
    let configured = dir.path().join("configured.txt");
    let flagged = dir.path().join("flagged.txt");
    fs::write(
        &config_path,
        format!(
            "output = {:?}\npadding_character = \"_\"\n",
            path_str(&configured)
        ),
    )?;

    wrapchain()?
        .args([
            "/etc/passwd",
            "ab",
            "",
            "0",
            "--config",
            path_str(&config_path),
        ])
        .assert()
        .success();
    assert!(configured.exists());

    wrapchain()?
        .args([
            "/etc/passwd",
            "ab",
            "",
            "0",
            "--config",
            path_str(&config_path),
            "--padding-character",
            "M",
            "-o",
            path_str(&flagged),
        ])
        .assert()
        .success();

    assert_ne!(fs::read(&configured)?, fs::read(&flagged)?);
    Ok(())
}

#[test]
fn invalid_padding_character_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;

    wrapchain()?
        .args([
            "/etc/passwd",
            "ab",
            "",
            "0",
            "--padding-character",
            "MM",
            "-o",
            path_str(&dir.path().join("chain.txt")),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: "))
        .stderr(predicate::str::contains("padding character"));
    Ok(())
}

#[test]
fn strict_limits_reject_oversized_chain() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("tight.toml");
    let chain_path = dir.path().join("chain.txt");
    fs::write(&config_path, "[limits]\nmax_chain_len = 64\n")?;

    wrapchain()?
        .args([
            "/etc/passwd",
            "<a>",
            "</a>",
            "9",
            "--config",
            path_str(&config_path),
            "-o",
            path_str(&chain_path),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning:"));

    wrapchain()?
        .args([
            "/etc/passwd",
            "<a>",
            "</a>",
            "9",
            "--config",
            path_str(&config_path),
            "--strict-limits",
            "-o",
            path_str(&dir.path().join("strict.txt")),
        ])
        .assert()
        .failure();
    assert!(!dir.path().join("strict.txt").exists());
    Ok(())
}
