//! End-to-end tests of the `rubik` binary against the offline sample data

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use rubik::gateway::memory::{DEMO_EMAIL, DEMO_PASSWORD};

fn rubik(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rubik").unwrap();
    cmd.env("RUBIK_DATA_DIR", data_dir.path())
        .env_remove("RUBIK_API_URL")
        .env_remove("RUBIK_PASSWORD")
        .env_remove("RUST_LOG")
        .arg("--offline");
    cmd
}

fn logged_in() -> TempDir {
    let dir = TempDir::new().unwrap();
    rubik(&dir)
        .args(["login", "--email", DEMO_EMAIL, "--password", DEMO_PASSWORD])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Demo"));
    dir
}

#[test]
fn commands_require_login() {
    let dir = TempDir::new().unwrap();
    rubik(&dir)
        .args(["property", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));

    rubik(&dir)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn failed_login_stores_nothing() {
    let dir = TempDir::new().unwrap();
    rubik(&dir)
        .args(["login", "--email", DEMO_EMAIL, "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email or password"));

    assert!(!dir.path().join("data").join("session.json").exists());
}

#[test]
fn session_survives_between_runs() {
    let dir = logged_in();
    rubik(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains(DEMO_EMAIL));

    rubik(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    rubik(&dir).arg("whoami").assert().failure();
}

#[test]
fn property_list_and_filters() {
    let dir = logged_in();
    rubik(&dir)
        .args(["property", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("QRS 6, Bloco G, Casa 9"))
        .stdout(predicate::str::contains("SQWN 107"));

    rubik(&dir)
        .args(["property", "list", "--search", "asa sul"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SQWN 107"))
        .stdout(predicate::str::contains("QRS 6").not());

    rubik(&dir)
        .args(["property", "list", "--city", "Goiânia"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No properties found."));
}

#[test]
fn property_show_and_missing_property() {
    let dir = logged_in();
    rubik(&dir)
        .args(["property", "show", "70297-400"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Contrato de Compra e Venda.pdf"))
        .stdout(predicate::str::contains("IPTU 2024"));

    rubik(&dir)
        .args(["property", "show", "00000-000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Property not found: 00000-000"));
}

#[test]
fn expense_list_by_status_and_type() {
    let dir = logged_in();
    rubik(&dir)
        .args(["expense", "list", "--status", "paid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conta de luz - Fevereiro"))
        .stdout(predicate::str::contains("IPTU").not());

    rubik(&dir)
        .args(["expense", "list", "--type", "insurance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses found."));

    rubik(&dir)
        .args(["expense", "list", "--property", "71615-070"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4/10"))
        .stdout(predicate::str::contains("2 expense(s)"));

    rubik(&dir)
        .args(["expense", "list", "--property", "2", "--type", "water"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conta de água - Março"))
        .stdout(predicate::str::contains("IPTU").not())
        .stdout(predicate::str::contains("1 expense(s)"));
}

#[test]
fn logout_removes_stale_token() {
    let dir = TempDir::new().unwrap();
    let session_file = dir.path().join("data").join("session.json");
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        &session_file,
        r#"{"entries":{"auth_token":"tok","user_data":"{oops"}}"#,
    )
    .unwrap();

    rubik(&dir).args(["logout"]).assert().success();

    let session = std::fs::read_to_string(&session_file).unwrap();
    assert!(!session.contains("auth_token"));
}

#[test]
fn expense_add_validates_form() {
    let dir = logged_in();
    rubik(&dir)
        .args([
            "expense", "add", "--property", "71505-010", "--type", "water", "--value", "0,50",
            "--due", "someday",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid form"))
        .stderr(predicate::str::contains("due_date"))
        .stderr(predicate::str::contains("value"));

    rubik(&dir)
        .args([
            "expense", "add", "--property", "71505-010", "--type", "water", "--value", "150",
            "--due", "2030-06-22",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("R$ 150,00 due 22/06/2030 [Pending]"));
}

#[test]
fn expense_pay_with_confirmation_flag() {
    let dir = logged_in();
    rubik(&dir)
        .args(["expense", "pay", "2", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked as paid"));

    rubik(&dir)
        .args(["expense", "pay", "1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already paid"));

    rubik(&dir)
        .args(["expense", "pay", "missing", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expense not found"));
}

#[test]
fn dashboard_and_documents() {
    let dir = logged_in();
    rubik(&dir)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back, Demo!"))
        .stdout(predicate::str::contains("Properties:        3"))
        .stdout(predicate::str::contains("Pending expenses:  5"));

    rubik(&dir)
        .args(["document", "list", "71505-010"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Escritura.pdf"));
}

#[test]
fn config_shows_paths() {
    let dir = TempDir::new().unwrap();
    rubik(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("API URL:          http://localhost:8080"))
        .stdout(predicate::str::contains("offline sample data"));
}
