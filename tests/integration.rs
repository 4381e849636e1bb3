use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn dex_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("dex");
    path
}

fn setup_test_env(config_content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_path = config_dir.join("dex.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_dex(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = dex_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--progress")
        .arg("off")
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run dex binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_xp_prints_table() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, stderr, success) = run_dex(&config_path, &["xp"]);
    assert!(success, "xp failed: stdout={}, stderr={}", stdout, stderr);

    let table: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(table["medium-fast"]["100"], 1_000_000.0);
    assert_eq!(table["erratic"]["100"], 600_000.0);
    assert_eq!(table.as_object().unwrap().len(), 6);
}

#[test]
fn test_xp_writes_file() {
    let (tmp, config_path) = setup_test_env("");
    let out = tmp.path().join("out").join("xp_levels.json");

    let (stdout, stderr, success) =
        run_dex(&config_path, &["xp", "--output", out.to_str().unwrap()]);
    assert!(success, "xp failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.is_empty());

    let table: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(table["fast"]["50"], 100_000.0);
}

#[test]
fn test_config_prints_effective_values() {
    let (_tmp, config_path) = setup_test_env(
        r#"[items]
id_end = 40

[moves]
target_generations = ["generation-i"]
"#,
    );

    let (stdout, stderr, success) = run_dex(&config_path, &["config"]);
    assert!(success, "config failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("id_end = 40"));
    assert!(stdout.contains("base_url = \"https://pokeapi.co/api/v2\""));
    assert!(stdout.contains("held_version = \"ruby\""));
}

#[test]
fn test_missing_config_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("absent.toml");

    let (stdout, stderr, success) = run_dex(&config_path, &["config"]);
    assert!(success, "config failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("id_end = 569"));
    assert!(stdout.contains("id_end = 825"));
}

#[test]
fn test_invalid_config_fails() {
    let (_tmp, config_path) = setup_test_env(
        r#"[items]
id_start = 10
id_end = 2
"#,
    );

    let (_, stderr, success) = run_dex(&config_path, &["config"]);
    assert!(!success);
    assert!(stderr.contains("id_end"), "stderr={}", stderr);
}

#[test]
fn test_malformed_toml_fails() {
    let (_tmp, config_path) = setup_test_env("[items\nid_end = ");

    let (_, _, success) = run_dex(&config_path, &["config"]);
    assert!(!success);
}

#[test]
fn test_sync_rejects_inverted_range() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, stderr, success) =
        run_dex(&config_path, &["sync", "items", "--start", "5", "--end", "2"]);
    assert!(!success);
    assert!(stderr.contains("invalid id range"), "stderr={}", stderr);
    assert!(!stdout.contains("ok"));
}

#[test]
fn test_sync_all_rejects_single_output() {
    let (tmp, config_path) = setup_test_env("");
    let out = tmp.path().join("index.json");

    let (_, stderr, success) = run_dex(
        &config_path,
        &["sync", "all", "--output", out.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("--output"), "stderr={}", stderr);
    assert!(!out.exists());
}

#[test]
fn test_unknown_pipeline_rejected() {
    let (_tmp, config_path) = setup_test_env("");

    let (_, stderr, success) = run_dex(&config_path, &["sync", "pokemon"]);
    assert!(!success);
    assert!(stderr.contains("invalid value"));
}
