use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_seedfinder")
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("seedfinder-{name}-{stamp}.{extension}"))
}

fn write_catalog(name: &str) -> PathBuf {
    let path = unique_temp_path(name, "json");
    fs::write(
        &path,
        r#"[
            {"id":"b","name":"Beta","weight":2},
            {"id":"a","name":"Alpha","weight":3},
            {"id":"sentinel","name":"Ignore","weight":5}
        ]"#,
    )
    .expect("fixture should be written");
    path
}

fn seedfinder(args: &[&str]) -> std::process::Output {
    Command::new(bin())
        .args(args)
        .env_remove("SEEDFINDER_SEED")
        .env_remove("SEEDFINDER_WORKERS")
        .env("SEEDFINDER_LOG", "off")
        .output()
        .expect("seedfinder should run")
}

#[test]
fn unknown_command_prints_usage() {
    let output = seedfinder(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: seedfinder"));
}

#[test]
fn catalog_command_hides_sentinel_and_sorts() {
    let path = write_catalog("catalog");
    let output = seedfinder(&["catalog", path.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(rows, vec!["a\tAlpha", "b\tBeta"]);

    let _ = fs::remove_file(path);
}

#[test]
fn catalog_command_writes_csv() {
    let path = write_catalog("catalog-csv");
    let output = seedfinder(&["catalog", path.to_string_lossy().as_ref(), "--csv"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(rows, vec!["value,label", "a,Alpha", "b,Beta"]);

    let _ = fs::remove_file(path);
}

#[test]
fn search_command_emits_sorted_json_results() {
    let path = write_catalog("search");
    let output = seedfinder(&["search", path.to_string_lossy().as_ref(), "a", "b", "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("search should emit json");
    assert_eq!(payload["selected_count"], 2);
    let results = payload["results"].as_array().expect("results should be shown");
    assert!(!results.is_empty());

    let keys: Vec<(u64, u64, String)> = results
        .iter()
        .map(|r| {
            (
                r["power"].as_u64().unwrap_or_default(),
                r["cast"].as_u64().unwrap_or_default(),
                r["effect"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert!(keys.iter().all(|(_, _, effect)| effect != "Ignore"));

    let _ = fs::remove_file(path);
}

#[test]
fn search_without_selection_has_no_result_panel() {
    let path = write_catalog("empty-search");
    let output = seedfinder(&["search", path.to_string_lossy().as_ref(), "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("search should emit json");
    assert!(payload["results"].is_null());

    let _ = fs::remove_file(path);
}

#[test]
fn search_csv_has_header() {
    let path = write_catalog("csv");
    let output = seedfinder(&["search", path.to_string_lossy().as_ref(), "a", "--csv"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("power,cast,effect,times,weight,line"));
    assert!(stdout.lines().skip(1).all(|row| row.contains(",Alpha,")));

    let _ = fs::remove_file(path);
}

#[test]
fn index_command_summarizes_visible_effects() {
    let path = write_catalog("index");
    let output = seedfinder(&["index", path.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("index should emit json");
    assert_eq!(payload["effect_count"], 2);
    assert_eq!(payload["power_max"], 2199);
    assert_eq!(payload["effects"][0]["name"], "Alpha");

    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_returns_non_zero_on_invalid_data() {
    let path = unique_temp_path("invalid", "json");
    fs::write(&path, r#"[{"id":"","name":""},{"id":"x","name":"X"}]"#).expect("fixture should be written");

    let output = seedfinder(&["validate", path.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));

    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_accepts_yaml() {
    let path = unique_temp_path("valid", "yaml");
    fs::write(&path, "- id: a\n  name: Alpha\n- id: none\n  name: None\n").expect("fixture should be written");

    let output = seedfinder(&["validate", path.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("validation passed"));

    let _ = fs::remove_file(path);
}

#[test]
fn missing_catalog_fails() {
    let output = seedfinder(&["catalog", "definitely/not/here.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load catalog"));
}
