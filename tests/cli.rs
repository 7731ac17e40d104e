//! End-to-end tests for the `ledger` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ledger(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ledger").unwrap();
    cmd.env("LEDGER_DATA_DIR", dir.path())
        .env("LEDGER_LOG", "off")
        .env_remove("LEDGER_USER")
        .env_remove("LEDGER_PASSWORD")
        .env_remove("LEDGER_NEW_PASSWORD");
    cmd
}

fn as_user(dir: &TempDir, user: &str, password: &str) -> Command {
    let mut cmd = ledger(dir);
    cmd.args(["--user", user, "--password", password]);
    cmd
}

fn as_admin(dir: &TempDir) -> Command {
    as_user(dir, "admin", "admin123")
}

/// Register and approve an account
fn approved_user(dir: &TempDir, user: &str, password: &str) {
    ledger(dir)
        .args(["register", user, "--password", password])
        .assert()
        .success();
    as_admin(dir).args(["admin", "approve", user]).assert().success();
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    ledger(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created tables"))
        .stdout(predicate::str::contains("admin123"));

    assert!(dir.path().join("data").join("users.csv").exists());
    assert!(dir.path().join("config.json").exists());

    ledger(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("All tables already exist."));
}

#[test]
fn test_config_lists_paths() {
    let dir = TempDir::new().unwrap();

    ledger(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("transactions.csv"))
        .stdout(predicate::str::contains("Rs."));
}

#[test]
fn test_registration_requires_approval() {
    let dir = TempDir::new().unwrap();

    ledger(&dir)
        .args(["register", "nimal", "--password", "pw1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("must approve"));

    as_user(&dir, "nimal", "pw1")
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("waiting for administrator approval"));

    as_admin(&dir)
        .args(["admin", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nimal"));

    as_admin(&dir)
        .args(["admin", "approve", "nimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Approved 'nimal'"));

    as_user(&dir, "nimal", "pw1")
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("nimal (User)"));
}

#[test]
fn test_login_failures_are_distinguished() {
    let dir = TempDir::new().unwrap();
    approved_user(&dir, "nimal", "pw1");

    as_user(&dir, "nimal", "wrong")
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect password"));

    as_user(&dir, "sunil", "pw1")
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No account named 'sunil'"));
}

#[test]
fn test_duplicate_registration() {
    let dir = TempDir::new().unwrap();

    ledger(&dir)
        .args(["register", "nimal", "--password", "pw1"])
        .assert()
        .success();
    ledger(&dir)
        .args(["register", "nimal", "--password", "pw2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_bootstrap_admin_is_protected() {
    let dir = TempDir::new().unwrap();

    as_admin(&dir)
        .args(["admin", "revoke", "admin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("protected"));
}

#[test]
fn test_transactions_and_totals() {
    let dir = TempDir::new().unwrap();
    approved_user(&dir, "kasun", "pw");

    as_user(&dir, "kasun", "pw")
        .args(["txn", "add", "1000", "--type", "income", "--category", "Salary", "--date", "2025-01-01"])
        .assert()
        .success();
    as_user(&dir, "kasun", "pw")
        .args(["txn", "add", "300", "--category", "Food", "--date", "2025-01-02"])
        .assert()
        .success();
    as_user(&dir, "kasun", "pw")
        .args(["txn", "quick", "bus 200", "--date", "2025-01-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transport"));

    as_user(&dir, "kasun", "pw")
        .args(["txn", "totals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rs. 500.00"));

    as_user(&dir, "kasun", "pw")
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-03"))
        .stdout(predicate::str::contains("bus 200"));

    as_user(&dir, "kasun", "pw")
        .args(["txn", "quick", "no numbers here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No amount found"));
}

#[test]
fn test_budget_alerts() {
    let dir = TempDir::new().unwrap();
    approved_user(&dir, "kasun", "pw");

    as_user(&dir, "kasun", "pw")
        .args(["budget", "set", "Food", "1000"])
        .assert()
        .success();
    as_user(&dir, "kasun", "pw")
        .args(["txn", "add", "850", "--category", "Food"])
        .assert()
        .success();

    as_user(&dir, "kasun", "pw")
        .args(["budget", "alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARN Food"))
        .stdout(predicate::str::contains("85%"));
}

#[test]
fn test_goal_overshoot_is_rejected() {
    let dir = TempDir::new().unwrap();
    approved_user(&dir, "kasun", "pw");

    as_user(&dir, "kasun", "pw")
        .args(["goal", "add", "Laptop", "1000"])
        .assert()
        .success();
    as_user(&dir, "kasun", "pw")
        .args(["goal", "deposit", "Laptop", "1200"])
        .assert()
        .failure();
    as_user(&dir, "kasun", "pw")
        .args(["goal", "deposit", "Laptop", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal reached!"));
}

#[test]
fn test_summary_and_tasks() {
    let dir = TempDir::new().unwrap();
    approved_user(&dir, "kasun", "pw");

    as_user(&dir, "kasun", "pw")
        .args(["task", "add", "Pay rent", "--priority", "high", "--date", "2025-03-01"])
        .assert()
        .success();
    as_user(&dir, "kasun", "pw")
        .args(["task", "add", "Call bank"])
        .assert()
        .success();
    as_user(&dir, "kasun", "pw")
        .args(["task", "done", "0"])
        .assert()
        .success();

    as_user(&dir, "kasun", "pw")
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Balance:"))
        .stdout(predicate::str::contains("Call bank"))
        .stdout(predicate::str::contains("Pay rent").not());
}

#[test]
fn test_audit_is_admin_only() {
    let dir = TempDir::new().unwrap();
    approved_user(&dir, "nimal", "pw1");

    as_user(&dir, "nimal", "pw1")
        .arg("audit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Forbidden"));

    as_admin(&dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATE User nimal by admin"));
}

#[test]
fn test_password_rotation() {
    let dir = TempDir::new().unwrap();

    as_admin(&dir)
        .args(["passwd", "--new-password", "rotated"])
        .assert()
        .success();

    as_admin(&dir).arg("whoami").assert().failure();
    as_user(&dir, "admin", "rotated")
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("admin (Admin)"));
}
