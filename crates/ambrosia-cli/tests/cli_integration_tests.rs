//! CLI integration tests
//!
//! Drive the `ambrosia` binary against a scratch database and check the JSON
//! it prints.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn pancakes_seed() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("ambrosia-store")
        .join("tests")
        .join("fixtures")
        .join("seed_pancakes.yaml")
}

fn run(temp_dir: &TempDir, db_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ambrosia"))
        .current_dir(temp_dir.path())
        .env_remove("AMBROSIA_POOL_SIZE")
        .env_remove("AMBROSIA_QUERY_TIMEOUT_MS")
        .env("AMBROSIA_LOG_FORMAT", "json")
        .arg("--db")
        .arg(db_path)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn seeded(temp_dir: &TempDir) -> PathBuf {
    let db_path = temp_dir.path().join("data").join("store.db");
    let seed = pancakes_seed();
    let output = run(
        temp_dir,
        &db_path,
        &["seed", "import", seed.to_str().unwrap()],
    );
    let summaries = stdout_json(&output);
    assert_eq!(summaries[0]["recipes"], 1);
    db_path
}

#[test]
fn test_cli_migrate_reports_applied_migrations() {
    // Given: An empty scratch directory
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("fresh.db");

    // When: `ambrosia migrate`
    let json = stdout_json(&run(&temp_dir, &db_path, &["migrate"]));

    // Then: Both migrations are reported
    assert_eq!(json["applied_migrations"][0], "001_initial_schema");
    assert_eq!(json["applied_migrations"][1], "002_seed_imports");
}

#[test]
fn test_cli_recipes_get_prints_graph() {
    // Given: A store seeded with Pancakes
    let temp_dir = TempDir::new().unwrap();
    let db_path = seeded(&temp_dir);

    // When: `ambrosia recipes get abc-123`
    let json = stdout_json(&run(&temp_dir, &db_path, &["recipes", "get", "abc-123"]));

    // Then: The contract shape is printed
    assert_eq!(json["name"], "Pancakes");
    assert_eq!(json["owner"]["id"], "u1");
    assert_eq!(json["ingredients"][0]["name"], "Flour");
    assert_eq!(json["ingredients"][1]["owner"]["name"], "Bob");
}

#[test]
fn test_cli_joined_listing_matches_default() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = seeded(&temp_dir);

    let default = stdout_json(&run(&temp_dir, &db_path, &["recipes", "list"]));
    let joined = stdout_json(&run(&temp_dir, &db_path, &["recipes", "list", "--joined"]));

    assert_eq!(default, joined);
}

#[test]
fn test_cli_ingredients_list_by_owner() {
    // Given: Three ingredients, two owned by u1
    let temp_dir = TempDir::new().unwrap();
    let db_path = seeded(&temp_dir);

    // When: `ambrosia ingredients list --owner u1`
    let json = stdout_json(&run(
        &temp_dir,
        &db_path,
        &["ingredients", "list", "--owner", "u1"],
    ));

    // Then: Only u1's ingredients are listed
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["i-flour", "i-sugar"]);
}

#[test]
fn test_cli_missing_user_exits_with_error() {
    // Given: A seeded store without user u404
    let temp_dir = TempDir::new().unwrap();
    let db_path = seeded(&temp_dir);

    // When: `ambrosia users get u404`
    let output = run(&temp_dir, &db_path, &["users", "get", "u404"]);

    // Then: Exit code 1 and a classified error on stderr
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: [ERR_NOT_FOUND]"), "stderr: {}", stderr);
}

#[test]
fn test_cli_rejects_unknown_log_format() {
    // Given: An unsupported log format
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("fresh.db");

    // When: Any command is run with it
    let output = Command::new(env!("CARGO_BIN_EXE_ambrosia"))
        .current_dir(temp_dir.path())
        .arg("--db")
        .arg(&db_path)
        .args(["--log-format", "xml", "migrate"])
        .output()
        .expect("Failed to execute CLI");

    // Then: Argument parsing fails and no database is created
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid value"));
    assert!(!db_path.exists());
}
