use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "crosswater-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_crosswater-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("express"));
}

#[test]
fn cli_runs_express_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_crosswater-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "express,blunder",
            "--iterations",
            "1",
            "--seeds",
            "1",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Crosswater Automated Tester"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_path).expect("read report"))
            .expect("json report");
    assert_eq!(report["total"], 2);
    assert_eq!(report["passed"], 2);
}

#[test]
fn cli_records_best_time() {
    let exe = env!("CARGO_BIN_EXE_crosswater-tester");
    let records_path = temp_path("best.json");
    let output = Command::new(exe)
        .args([
            "--scenarios",
            "express",
            "--iterations",
            "1",
            "--records",
        ])
        .arg(&records_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("best time"));
    assert!(records_path.exists());
    std::fs::remove_file(records_path).ok();
}

#[test]
fn cli_rejects_unknown_report_format() {
    let exe = env!("CARGO_BIN_EXE_crosswater-tester");
    let output = Command::new(exe)
        .args(["--report", "yaml"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}
