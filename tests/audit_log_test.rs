use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn kvault(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("kvault");
    cmd.current_dir(dir.path())
        .env("KVAULT_IDENTITY", dir.path().join("identity.txt"))
        .env("NO_COLOR", "1")
        .env_remove("KVAULT_DIR")
        .env_remove("KVAULT_PUBLIC_KEY")
        .env_remove("KVAULT_LOG");
    cmd
}

fn audit_log(dir: &assert_fs::TempDir) -> String {
    std::fs::read_to_string(dir.path().join(".kvault/audit.log")).unwrap()
}

#[test]
fn init_creates_audit_entry() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir).arg("init").assert().success();

    assert!(audit_log(&dir).contains("\"action\":\"init\""));
}

#[test]
fn audit_records_keys_but_never_values() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir)
        .args(["init", "--generate-key"])
        .assert()
        .success();
    kvault(&dir)
        .args(["add", "DB_PASSWORD", "hunter2"])
        .assert()
        .success();
    kvault(&dir).arg("submit").assert().success();

    let log = audit_log(&dir);
    assert!(log.contains("\"action\":\"edit\""));
    assert!(log.contains("\"action\":\"submit\""));
    assert!(log.contains("DB_PASSWORD"));
    assert!(log.contains("\"state_hash\":\""));
    assert!(!log.contains("hunter2"));
}

#[test]
fn log_shows_entries() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir).arg("init").assert().success();
    kvault(&dir).args(["add", "KEY", "v"]).assert().success();

    kvault(&dir)
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("kvault log (2 entries)"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("edit"));
}

#[test]
fn log_last_limits_output() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir).arg("init").assert().success();
    kvault(&dir).args(["add", "A", "1"]).assert().success();
    kvault(&dir).args(["add", "B", "2"]).assert().success();

    kvault(&dir)
        .args(["log", "--last", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 entries)"))
        .stdout(predicate::str::contains("B"));
}

#[test]
fn log_author_filter_without_match() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir).arg("init").assert().success();

    kvault(&dir)
        .args(["log", "--author", "nobody-matches-this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries found"));
}

#[test]
fn disabled_audit_writes_nothing() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir).arg("init").assert().success();

    let config_path = dir.path().join(".kvault/config.toml");
    let config = std::fs::read_to_string(&config_path).unwrap();
    std::fs::write(&config_path, config.replace("enabled = true", "enabled = false")).unwrap();
    let before = audit_log(&dir);

    kvault(&dir).args(["add", "KEY", "v"]).assert().success();

    assert_eq!(audit_log(&dir), before);
}

#[test]
fn log_filters_by_key_and_action() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir)
        .args(["init", "--generate-key"])
        .assert()
        .success();
    kvault(&dir).args(["add", "DB_URL", "pg"]).assert().success();
    kvault(&dir).args(["add", "API_KEY", "sk"]).assert().success();
    kvault(&dir).arg("submit").assert().success();

    kvault(&dir)
        .args(["log", "--key", "API_KEY"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 entries)"));

    kvault(&dir)
        .args(["log", "--key", "API_KEY", "--action", "submit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 entries)"))
        .stdout(predicate::str::contains("DB_URL, API_KEY"));
}

#[test]
fn log_rejects_unknown_action() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir).arg("init").assert().success();

    kvault(&dir)
        .args(["log", "--action", "rotate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown action 'rotate'"));
}

#[test]
fn verify_accepts_untouched_items() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir)
        .args(["init", "--generate-key"])
        .assert()
        .success();
    kvault(&dir).args(["add", "KEY", "v"]).assert().success();
    kvault(&dir).arg("submit").assert().success();

    kvault(&dir)
        .args(["log", "--verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("matches the last recorded state"));
}

#[test]
fn verify_detects_outside_edits() {
    let dir = assert_fs::TempDir::new().unwrap();
    kvault(&dir).arg("init").assert().success();
    std::fs::write(
        dir.path().join(".kvault/items.json"),
        r#"[{"id":"6f1c1f8e-2b0a-4c1e-9f5e-2d7c4b1a9e10","key":"INJECTED","value":"x"}]"#,
    )
    .unwrap();

    kvault(&dir)
        .args(["log", "--verify"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match the last recorded state"));
}
