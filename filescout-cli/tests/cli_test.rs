use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn create_test_files(root: &Path, files: &[&str]) -> Result<()> {
    for name in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "")?;
    }
    Ok(())
}

/// Runs the binary with `home` as its home, config root and working directory
/// so no user or project config file leaks into the test.
fn isolated_command(home: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("filescout")?;
    cmd.env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .current_dir(home)
        .arg("--home")
        .arg(home);
    Ok(cmd)
}

fn filescout(home: &Path) -> Result<Command> {
    let mut cmd = isolated_command(home)?;
    cmd.arg("--no-audit");
    Ok(cmd)
}

#[test]
fn test_scoped_search() -> Result<()> {
    let home = tempdir()?;
    let project = tempdir()?;
    create_test_files(project.path(), &["a.txt", "b/readme.md"])?;

    filescout(home.path())?
        .args(["read", "-d"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("readme.md"))
        .stdout(predicate::str::contains("a.txt").not())
        .stdout(predicate::str::contains("Found 1 file"));
    Ok(())
}

#[test]
fn test_fallback_output() -> Result<()> {
    let home = tempdir()?;
    let empty = tempdir()?;
    create_test_files(home.path(), &["docs/x.log"])?;

    filescout(home.path())?
        .args(["x", "-d"])
        .arg(empty.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("File not found in this directory"))
        .stdout(predicate::str::contains("Found elsewhere:"))
        .stdout(predicate::str::contains("x.log"));
    Ok(())
}

#[test]
fn test_not_found_everywhere() -> Result<()> {
    let home = tempdir()?;
    create_test_files(home.path(), &["a.txt"])?;

    filescout(home.path())?
        .args(["--everywhere", "missing"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("File not found"))
        .stdout(predicate::str::contains("in this directory").not());
    Ok(())
}

#[test]
fn test_relative_dir_resolves_under_home() -> Result<()> {
    let home = tempdir()?;
    create_test_files(home.path(), &["Projects/Notes.md", "Notes.md"])?;

    filescout(home.path())?
        .args(["notes", "-d", "Projects", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"completed_with_matches\""))
        .stdout(predicate::str::contains("Projects"));
    Ok(())
}

#[test]
fn test_zero_threads_rejected() -> Result<()> {
    let home = tempdir()?;

    filescout(home.path())?
        .args(["x", "-j", "0"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_audit_log_written() -> Result<()> {
    let home = tempdir()?;
    let project = tempdir()?;
    create_test_files(project.path(), &["report.pdf"])?;
    let log_path = home.path().join("audit.txt");

    isolated_command(home.path())?
        .arg("--audit-log")
        .arg(&log_path)
        .args(["report", "-d"])
        .arg(project.path())
        .assert()
        .success();

    let contents = fs::read_to_string(&log_path)?;
    assert!(contents.contains("=== Search: "));
    assert!(contents.contains("Query: report"));
    assert!(contents.contains("report.pdf"));
    assert!(contents.contains("=== End Search ==="));
    Ok(())
}

#[test]
fn test_local_config_is_applied() -> Result<()> {
    let home = tempdir()?;
    let project = tempdir()?;
    create_test_files(project.path(), &["report.pdf"])?;
    let log_path = home.path().join("from-config.txt");
    fs::write(
        home.path().join(".filescout.yaml"),
        format!("audit_log: \"{}\"\n", log_path.display()),
    )?;

    isolated_command(home.path())?
        .args(["report", "-d"])
        .arg(project.path())
        .assert()
        .success();

    assert!(fs::read_to_string(&log_path)?.contains("report.pdf"));
    Ok(())
}
