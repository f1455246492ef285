mod common;

use assert_cmd::Command;
use common::write_fixture_tree;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn cli_workflow() -> Result<(), Box<dyn std::error::Error>> {
    // Setup temporary config
    let dir = tempdir()?;
    let data_dir = dir.path().join("data");
    write_fixture_tree(&data_dir);
    let config_path = dir.path().join("jsonforms.toml");
    fs::write(
        &config_path,
        format!(
            "data_dir = '{}'\nstorage_path = '{}'\n",
            data_dir.display(),
            dir.path().join("db").display()
        ),
    )?;
    let cfg = config_path.to_str().unwrap();

    // 1. dry run writes nothing to the persistent store
    Command::cargo_bin("jsonforms_cli")?
        .args(["-c", cfg, "import", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found file: JsonSchema/person.json -> Page: JsonSchema:Person, Slot: main"))
        .stdout(predicate::str::contains("(JsonForms) 0 of 7 articles failed to import"));

    Command::cargo_bin("jsonforms_cli")?
        .args(["-c", cfg, "list-schemas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Person").not());

    // 2. real import
    Command::cargo_bin("jsonforms_cli")?
        .args(["-c", cfg, "import", "--delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("JsonForm:Contact (success, revision"));

    // 3. list-schemas, with and without a prefix
    Command::cargo_bin("jsonforms_cli")?
        .args(["-c", cfg, "list-schemas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  - Address"))
        .stdout(predicate::str::contains("  - Person"));

    Command::cargo_bin("jsonforms_cli")?
        .args(["-c", cfg, "list-schemas", "--prefix", "Pe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  - Person"))
        .stdout(predicate::str::contains("  - Address").not());

    // 4. get-schema shows rewritten references
    Command::cargo_bin("jsonforms_cli")?
        .args(["-c", cfg, "get-schema", "JsonSchema:Person"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "/index.php?title=JsonSchema:Address&action=raw",
        ));

    Command::cargo_bin("jsonforms_cli")?
        .args(["-c", cfg, "get-schema", "JsonSchema:Missing"])
        .assert()
        .failure();

    // 5. editor-config
    Command::cargo_bin("jsonforms_cli")?
        .args(["-c", cfg, "editor-config", "Contact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"schemaName\": \"Person\""))
        .stdout(predicate::str::contains("jsonforms-metaschema"));

    Ok(())
}

#[test]
fn import_reports_missing_data_dir() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("nowhere");

    Command::cargo_bin("jsonforms_cli")?
        .current_dir(dir.path())
        .args(["import", "--dry-run", "--data-dir", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("not found, using defaults"));

    Ok(())
}

#[test]
fn invalid_config_is_reported_on_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config_path = dir.path().join("jsonforms.toml");
    fs::write(&config_path, "query_limit = 0\n")?;

    Command::cargo_bin("jsonforms_cli")?
        .args(["-c", config_path.to_str().unwrap(), "list-schemas"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "ERROR - Configuration validation failed: query_limit must be greater than 0",
        ))
        .stdout(predicate::str::contains("Configuration validation failed").not());

    Ok(())
}
