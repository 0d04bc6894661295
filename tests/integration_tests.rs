//! Integration tests for the bommerge CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get a bommerge command with no inherited config
fn bommerge(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bommerge").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".config"))
        .env_remove("BOMMERGE_CONFIG")
        .env_remove("BOMMERGE_FORMAT")
        .env_remove("BOMMERGE_MAX_DEPTH");
    cmd
}

const ROOT_SHEET: &str = "\
Сборочные единицы,,
Name,Qty,
Wheel,2,
Ghost,1,

,Стандартные изделия,
,Name,Qty
M6,Bolt,4
,Washer,8
";

const WHEEL_SHEET: &str = "\
Стандартные изделия,
Name,Qty
Bolt,3
Nut,\"2,5\"
,
Прочие изделия,
Name,Qty
Grease,0.1
";

fn write_sheet(tmp: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// A root assembly holding two wheels and a reference to a missing sheet
fn setup_cart() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_sheet(&tmp, "root.csv", ROOT_SHEET);
    write_sheet(&tmp, "wheel.csv", WHEEL_SHEET);
    tmp
}

fn sub_sheet(names: &[&str]) -> String {
    let mut sheet = String::from("Сборочные единицы,\nName,Qty\n");
    for name in names {
        sheet.push_str(&format!("{},1\n", name));
    }
    sheet
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    bommerge(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("sections"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    bommerge(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bommerge"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    bommerge(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bommerge"));
}

// ============================================================================
// Merge Tests
// ============================================================================

#[test]
fn test_merge_csv_output() {
    let tmp = setup_cart();
    let output = bommerge(&tmp)
        .args(["merge", "root.csv", "wheel.csv", "-f", "csv"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Item,Total,Wheel,root",
            "Bolt,6,6,",
            "Nut,5,5,",
            "Grease,0.2,0.2,",
            "Bolt_M6,4,,4",
            "Washer,8,,8",
        ]
    );
}

#[test]
fn test_merge_relations_table() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["merge", "root.csv", "wheel.csv", "-f", "csv", "--relations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parent,ParentQty,Child,ChildQty,Item,ItemQty"))
        .stdout(predicate::str::contains("root,1,Wheel,2,Bolt,6"))
        .stdout(predicate::str::contains(",,root,1,Bolt_M6,4"));
}

#[test]
fn test_merge_root_quantity_scales_everything() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["merge", "root.csv", "wheel.csv", "-f", "csv", "--qty", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bolt,18,18,"))
        .stdout(predicate::str::contains("Washer,24,,24"));
}

#[test]
fn test_merge_missing_subassembly_warns_and_continues() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["merge", "root.csv", "wheel.csv", "-f", "csv"])
        .assert()
        .success()
        .stderr(predicate::str::contains("'Ghost' listed in 'root'"));
}

#[test]
fn test_merge_quiet_suppresses_stderr() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["merge", "root.csv", "wheel.csv", "-f", "csv", "-q"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_merge_with_parent_assembly() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args([
            "merge",
            "root.csv",
            "wheel.csv",
            "-f",
            "csv",
            "--relations",
            "--parent",
            "Trailer=2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trailer,2,root,1,Bolt_M6,4"));
}

#[test]
fn test_merge_dir_scan() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["merge", "--dir", ".", "--root", "root", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bolt,6,6,"));
}

#[test]
fn test_merge_json_output() {
    let tmp = setup_cart();
    let output = bommerge(&tmp)
        .args(["merge", "root.csv", "wheel.csv", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["assemblies"][0], "Wheel");
    assert_eq!(report["items"][0]["name"], "Bolt");
    assert_eq!(report["items"][0]["total"], 6.0);
    assert_eq!(report["unresolved"][0]["name"], "Ghost");
}

#[test]
fn test_merge_output_dir_writes_files() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["merge", "root.csv", "wheel.csv", "-o", "out"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Report written to"));

    let items = fs::read_to_string(tmp.path().join("out/merged_items.csv")).unwrap();
    let relations = fs::read_to_string(tmp.path().join("out/relations.csv")).unwrap();
    assert!(items.starts_with("Item,Total,Wheel,root\n"));
    assert!(relations.contains("root,1,Wheel,2,Nut,5"));
}

#[test]
fn test_merge_format_from_local_config() {
    let tmp = setup_cart();
    write_sheet(&tmp, ".bommerge.yaml", "default_format: csv\n");
    bommerge(&tmp)
        .args(["merge", "root.csv", "wheel.csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Item,Total,Wheel,root"));
}

#[test]
fn test_merge_warns_about_unused_sheets() {
    let tmp = TempDir::new().unwrap();
    write_sheet(&tmp, "a.csv", "Стандартные изделия,\nName,Qty\nBolt,2\n");
    write_sheet(&tmp, "b.csv", "Стандартные изделия,\nName,Qty\nNut,5\n");

    bommerge(&tmp)
        .args(["merge", "a.csv", "b.csv", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nut").not())
        .stderr(predicate::str::contains("'b' is not used by 'a'"));
}

#[test]
fn test_merge_flat_takes_every_sheet() {
    let tmp = TempDir::new().unwrap();
    write_sheet(&tmp, "a.csv", "Стандартные изделия,\nName,Qty\nBolt,2\n");
    write_sheet(&tmp, "b.csv", "Стандартные изделия,\nName,Qty\nNut,5\nBolt,1\n");

    let output = bommerge(&tmp)
        .args(["merge", "a.csv", "b.csv", "-f", "csv", "--flat"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["Item,Total,a,b", "Bolt,3,2,1", "Nut,5,,5"]);
    assert!(!String::from_utf8_lossy(&output.stderr).contains("is not used"));
}

#[test]
fn test_merge_flat_conflicts_with_root() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["merge", "root.csv", "--flat", "--root", "root"])
        .assert()
        .failure();
}

#[test]
#[cfg(target_os = "linux")]
fn test_global_config_read_from_isolated_home() {
    let tmp = setup_cart();
    let global_dir = tmp.path().join(".config/bommerge");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(global_dir.join("config.yaml"), "max_depth: 1\n").unwrap();

    // The helper points HOME at the temp dir, so this file is the global layer
    bommerge(&tmp)
        .args(["merge", "root.csv", "wheel.csv", "-f", "csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deeper than 1"));
}

#[test]
fn test_merge_cycle_fails() {
    let tmp = TempDir::new().unwrap();
    write_sheet(&tmp, "a.csv", &sub_sheet(&["b"]));
    write_sheet(&tmp, "b.csv", &sub_sheet(&["a"]));

    bommerge(&tmp)
        .args(["merge", "a.csv", "b.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cyclic assembly reference"));
}

#[test]
fn test_merge_depth_limit_from_env() {
    let tmp = TempDir::new().unwrap();
    write_sheet(&tmp, "a.csv", &sub_sheet(&["b"]));
    write_sheet(&tmp, "b.csv", &sub_sheet(&["c"]));
    write_sheet(&tmp, "c.csv", "");

    bommerge(&tmp)
        .args(["merge", "a.csv", "b.csv", "c.csv"])
        .env("BOMMERGE_MAX_DEPTH", "2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deeper than 2"));
}

#[test]
fn test_merge_unknown_root_fails() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["merge", "root.csv", "--root", "Trailer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Trailer"));
}

#[test]
fn test_merge_without_inputs_fails() {
    let tmp = TempDir::new().unwrap();
    bommerge(&tmp)
        .arg("merge")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no assembly spreadsheets"));
}

// ============================================================================
// Tree Tests
// ============================================================================

#[test]
fn test_tree_shows_effective_quantities() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["tree", "root.csv", "wheel.csv", "--qty", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("root (qty: 2)"))
        .stdout(predicate::str::contains("├─ Wheel (qty: 4)"))
        .stdout(predicate::str::contains("└─ Ghost (qty: 2) [NOT FOUND]"));
}

#[test]
fn test_tree_json() {
    let tmp = setup_cart();
    let output = bommerge(&tmp)
        .args(["tree", "root.csv", "wheel.csv", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let visits: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(visits.as_array().map(Vec::len), Some(3));
    assert_eq!(visits[2]["resolved"], false);
}

// ============================================================================
// Sections Tests
// ============================================================================

#[test]
fn test_sections_lists_found_and_missing() {
    let tmp = setup_cart();
    bommerge(&tmp)
        .args(["sections", "root.csv", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("row 1, column 1"))
        .stdout(predicate::str::contains("Wheel,2"))
        .stdout(predicate::str::contains("Bolt_M6,4"))
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn test_sections_custom_label_from_config() {
    let tmp = TempDir::new().unwrap();
    write_sheet(&tmp, "parts.csv", "Hardware,\nName,Qty\nScrew,12\n");
    write_sheet(&tmp, "labels.yaml", "labels:\n  standard_items: hardware\n");

    bommerge(&tmp)
        .args(["sections", "parts.csv", "-f", "csv", "--config", "labels.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Screw,12"));
}

#[test]
fn test_sections_unsupported_file_fails() {
    let tmp = TempDir::new().unwrap();
    write_sheet(&tmp, "notes.txt", "hello");
    bommerge(&tmp)
        .args(["sections", "notes.txt"])
        .assert()
        .failure();
}
