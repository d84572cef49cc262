use assert_cmd::Command;
use rusqlite::Connection;
use std::fs;

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let db_path = dir.join("cli.db");
    Connection::open(&db_path)
        .unwrap()
        .execute_batch(
            "
            CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
            INSERT INTO users (name) VALUES ('Ann'), ('Bob');
        ",
        )
        .unwrap();

    let config_path = dir.join("dbaccess.toml");
    fs::write(
        &config_path,
        format!(
            "[database]\ntype = \"sqlite\"\nname = {:?}\n",
            db_path.to_string_lossy()
        ),
    )
    .unwrap();
    config_path
}

#[test]
fn test_query_prints_json_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    Command::cargo_bin("dbaccess")
        .unwrap()
        .arg(&config)
        .arg("SELECT id, name FROM users WHERE id = :id")
        .arg("id=2")
        .assert()
        .success()
        .stdout("{\"id\":2,\"name\":\"Bob\"}\n");
}

#[test]
fn test_statement_prints_rows_affected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    Command::cargo_bin("dbaccess")
        .unwrap()
        .arg(&config)
        .arg("UPDATE users SET name = :name")
        .arg("name=Cy")
        .assert()
        .success()
        .stdout("2 rows affected\n");
}

#[test]
fn test_bad_sql_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let output = Command::cargo_bin("dbaccess")
        .unwrap()
        .arg(&config)
        .arg("SELECT * FROM nowhere")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no such table"));
}

#[test]
fn test_missing_sql_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let output = Command::cargo_bin("dbaccess")
        .unwrap()
        .arg(&config)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: dbaccess"));
}
