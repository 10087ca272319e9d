//! End-to-end orchestrator tests over temporary stage directories and a
//! filesystem capture source.

use netverify_capture::{Device, FsCaptureSource, Inventory};
use netverify_core::errors::NvErrorKind;
use netverify_engine::{check_stage, execute, RunConfig};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

fn device(name: &str) -> Device {
    Device {
        name: name.into(),
        os: "iosxe".into(),
        connected: true,
    }
}

fn write_fixture(dir: &Path, device: &str, kind: &str, doc: &Value) {
    fs::write(
        dir.join(format!("{device}_{kind}.json")),
        serde_json::to_string_pretty(doc).unwrap(),
    )
    .unwrap();
}

/// Write a full fixture set for one device: interface record plus the
/// three config views.
fn write_device_fixtures(dir: &Path, device: &str, interface: &Value, running: &Value) {
    write_fixture(dir, device, "interface", interface);
    write_fixture(dir, device, "config_running", running);
    write_fixture(dir, device, "config_failed", &json!({}));
    write_fixture(dir, device, "config_failed_startup", &json!({}));
}

fn config(dir: &Path, baseline: Option<&Path>) -> RunConfig {
    RunConfig {
        report_dir: dir.to_path_buf(),
        baseline_dir: baseline.map(|p| p.to_path_buf()),
        max_concurrency: Some(2),
        offline: true,
    }
}

#[test]
fn test_pre_run_captures_without_evaluation() {
    let tmp = tempfile::tempdir().unwrap();
    let source_dir = tmp.path().join("source");
    let pre_dir = tmp.path().join("pre");
    fs::create_dir(&source_dir).unwrap();

    let iface = json!({"Gi0/0": {"counters": {"in_errors": 7}, "oper_status": "up", "enabled": true}});
    write_device_fixtures(&source_dir, "r1", &iface, &json!({"hostname r1": {}}));

    let inventory = Inventory::from_devices(vec![device("r1")]);
    let source = FsCaptureSource::new(&source_dir);
    let report = execute(&inventory, &source, &config(&pre_dir, None)).unwrap();

    // Capture only: no policy evaluation, even with a hot error counter.
    assert_eq!(report.stage, "pre");
    assert!(report.records.is_empty());
    assert!(pre_dir.join("r1_interface.json").is_file());
    assert!(pre_dir.join("r1_config_running.json").is_file());
}

#[test]
fn test_post_run_reports_exactly_one_counter_fail() {
    let tmp = tempfile::tempdir().unwrap();
    let pre_source = tmp.path().join("pre_source");
    let post_source = tmp.path().join("post_source");
    let pre_dir = tmp.path().join("pre");
    let post_dir = tmp.path().join("post");
    fs::create_dir(&pre_source).unwrap();
    fs::create_dir(&post_source).unwrap();

    let pre_iface =
        json!({"Gi0/0": {"counters": {"in_errors": 0}, "oper_status": "up", "enabled": true}});
    let post_iface =
        json!({"Gi0/0": {"counters": {"in_errors": 3}, "oper_status": "up", "enabled": true}});
    let running = json!({"hostname r1": {}});
    write_device_fixtures(&pre_source, "r1", &pre_iface, &running);
    write_device_fixtures(&post_source, "r1", &post_iface, &running);

    let inventory = Inventory::from_devices(vec![device("r1")]);
    execute(
        &inventory,
        &FsCaptureSource::new(&pre_source),
        &config(&pre_dir, None),
    )
    .unwrap();
    let report = execute(
        &inventory,
        &FsCaptureSource::new(&post_source),
        &config(&post_dir, Some(&pre_dir)),
    )
    .unwrap();

    let fails: Vec<_> = report
        .records
        .iter()
        .filter(|r| r.verdict.is_fail())
        .collect();
    assert_eq!(fails.len(), 1, "expected one fail, got: {:?}", fails);
    assert_eq!(fails[0].device, "r1");
    assert_eq!(fails[0].kind, "interface");
    assert_eq!(fails[0].member.as_deref(), Some("Gi0/0"));
    assert_eq!(fails[0].rule, "counter-nonzero");
    assert!(fails[0].verdict.reason().unwrap().contains('3'));

    let status = report
        .records
        .iter()
        .find(|r| r.rule == "status-not-down" && r.member.as_deref() == Some("Gi0/0"))
        .unwrap();
    assert!(status.verdict.is_pass());
    assert!(!report.succeeded());
}

#[test]
fn test_missing_baseline_is_isolated_per_device() {
    let tmp = tempfile::tempdir().unwrap();
    let pre_source = tmp.path().join("pre_source");
    let post_source = tmp.path().join("post_source");
    let pre_dir = tmp.path().join("pre");
    let post_dir = tmp.path().join("post");
    fs::create_dir(&pre_source).unwrap();
    fs::create_dir(&post_source).unwrap();

    let iface = json!({"Gi0/0": {"counters": {"in_errors": 0}, "oper_status": "up", "enabled": true}});
    let running = json!({"hostname x": {}});
    // r2 exists only at the post stage.
    write_device_fixtures(&pre_source, "r1", &iface, &running);
    write_device_fixtures(&post_source, "r1", &iface, &running);
    write_device_fixtures(&post_source, "r2", &iface, &running);

    let pre_inventory = Inventory::from_devices(vec![device("r1")]);
    execute(
        &pre_inventory,
        &FsCaptureSource::new(&pre_source),
        &config(&pre_dir, None),
    )
    .unwrap();

    let post_inventory = Inventory::from_devices(vec![device("r1"), device("r2")]);
    let report = execute(
        &post_inventory,
        &FsCaptureSource::new(&post_source),
        &config(&post_dir, Some(&pre_dir)),
    )
    .unwrap();

    // r2's units fail with a no-baseline reason...
    let r2_fails: Vec<_> = report
        .records
        .iter()
        .filter(|r| r.device == "r2" && r.verdict.is_fail())
        .collect();
    assert!(!r2_fails.is_empty());
    assert!(r2_fails
        .iter()
        .all(|r| r.verdict.reason().unwrap().contains("no baseline data")));

    // ...while r1 is still fully evaluated and healthy.
    let r1_records: Vec<_> = report.records.iter().filter(|r| r.device == "r1").collect();
    assert!(!r1_records.is_empty());
    assert!(r1_records.iter().all(|r| !r.verdict.is_fail()));
}

#[test]
fn test_config_drift_produces_diff_record() {
    let tmp = tempfile::tempdir().unwrap();
    let pre_source = tmp.path().join("pre_source");
    let post_source = tmp.path().join("post_source");
    let pre_dir = tmp.path().join("pre");
    let post_dir = tmp.path().join("post");
    fs::create_dir(&pre_source).unwrap();
    fs::create_dir(&post_source).unwrap();

    let iface = json!({"Gi0/0": {"oper_status": "up", "enabled": true}});
    write_device_fixtures(&pre_source, "r1", &iface, &json!({"hostname r1": {}, "mtu": 1500}));
    write_device_fixtures(&post_source, "r1", &iface, &json!({"hostname r1": {}, "mtu": 9000}));

    let inventory = Inventory::from_devices(vec![device("r1")]);
    execute(
        &inventory,
        &FsCaptureSource::new(&pre_source),
        &config(&pre_dir, None),
    )
    .unwrap();
    let report = execute(
        &inventory,
        &FsCaptureSource::new(&post_source),
        &config(&post_dir, Some(&pre_dir)),
    )
    .unwrap();

    let drift = report
        .records
        .iter()
        .find(|r| r.kind == "config_running" && r.rule == "config-match")
        .unwrap();
    assert!(drift.verdict.is_fail());
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(report.diffs[0].kind, "config_running");
    assert_eq!(report.diffs[0].diff.entries[0].path, "mtu");
}

#[test]
fn test_normalization_makes_clock_noise_invisible() {
    let tmp = tempfile::tempdir().unwrap();
    let pre_source = tmp.path().join("pre_source");
    let post_source = tmp.path().join("post_source");
    let pre_dir = tmp.path().join("pre");
    let post_dir = tmp.path().join("post");
    fs::create_dir(&pre_source).unwrap();
    fs::create_dir(&post_source).unwrap();

    let iface = json!({"Gi0/0": {"oper_status": "up", "enabled": true}});
    // Same semantic config, different capture-time clock keys.
    write_device_fixtures(
        &pre_source,
        "r1",
        &iface,
        &json!({"Mon Jan 10 08:00:00.000 UTC": {}, "hostname r1": {}}),
    );
    write_device_fixtures(
        &post_source,
        "r1",
        &iface,
        &json!({"Tue Jan 11 09:30:00.000 UTC": {}, "hostname r1": {}}),
    );

    let inventory = Inventory::from_devices(vec![device("r1")]);
    execute(
        &inventory,
        &FsCaptureSource::new(&pre_source),
        &config(&pre_dir, None),
    )
    .unwrap();
    let report = execute(
        &inventory,
        &FsCaptureSource::new(&post_source),
        &config(&post_dir, Some(&pre_dir)),
    )
    .unwrap();

    let drift = report
        .records
        .iter()
        .find(|r| r.kind == "config_running" && r.rule == "config-match")
        .unwrap();
    assert!(drift.verdict.is_pass(), "clock keys must normalize away");
}

#[test]
fn test_failed_config_content_fails_post_stage() {
    let tmp = tempfile::tempdir().unwrap();
    let pre_source = tmp.path().join("pre_source");
    let post_source = tmp.path().join("post_source");
    let pre_dir = tmp.path().join("pre");
    let post_dir = tmp.path().join("post");
    fs::create_dir(&pre_source).unwrap();
    fs::create_dir(&post_source).unwrap();

    let iface = json!({"Gi0/0": {"oper_status": "up", "enabled": true}});
    let running = json!({"hostname r1": {}});
    write_device_fixtures(&pre_source, "r1", &iface, &running);
    write_device_fixtures(&post_source, "r1", &iface, &running);
    // The post capture saw a rejected configuration line.
    write_fixture(
        &post_source,
        "r1",
        "config_failed",
        &json!({"router bgp 65000": "rejected"}),
    );

    let inventory = Inventory::from_devices(vec![device("r1")]);
    execute(
        &inventory,
        &FsCaptureSource::new(&pre_source),
        &config(&pre_dir, None),
    )
    .unwrap();
    let report = execute(
        &inventory,
        &FsCaptureSource::new(&post_source),
        &config(&post_dir, Some(&pre_dir)),
    )
    .unwrap();

    let failed = report
        .records
        .iter()
        .find(|r| r.kind == "config_failed" && r.rule == "config-empty")
        .unwrap();
    assert!(failed.verdict.is_fail());
}

#[test]
fn test_post_without_pre_directory_fails_fast() {
    let tmp = tempfile::tempdir().unwrap();
    let inventory = Inventory::from_devices(vec![device("r1")]);
    let source = FsCaptureSource::new(tmp.path());
    let err = execute(
        &inventory,
        &source,
        &config(&tmp.path().join("post"), Some(&tmp.path().join("absent"))),
    )
    .unwrap_err();
    assert_eq!(err.kind(), NvErrorKind::Precondition);
}

#[test]
fn test_rerun_tolerates_existing_snapshots() {
    let tmp = tempfile::tempdir().unwrap();
    let source_dir = tmp.path().join("source");
    let pre_dir = tmp.path().join("pre");
    fs::create_dir(&source_dir).unwrap();

    let iface = json!({"Gi0/0": {"oper_status": "up", "enabled": true}});
    write_device_fixtures(&source_dir, "r1", &iface, &json!({"hostname r1": {}}));

    let inventory = Inventory::from_devices(vec![device("r1")]);
    let source = FsCaptureSource::new(&source_dir);
    execute(&inventory, &source, &config(&pre_dir, None)).unwrap();
    let first = fs::read_to_string(pre_dir.join("r1_interface.json")).unwrap();

    // A rerun must skip pre-existing snapshots, not roll back or rewrite.
    let report = execute(&inventory, &source, &config(&pre_dir, None)).unwrap();
    assert!(report.succeeded());
    let second = fs::read_to_string(pre_dir.join("r1_interface.json")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_capture_failure_is_isolated_per_device() {
    let tmp = tempfile::tempdir().unwrap();
    let source_dir = tmp.path().join("source");
    let pre_dir = tmp.path().join("pre");
    fs::create_dir(&source_dir).unwrap();

    // Fixtures exist for r1 only; r2's captures all fail.
    let iface = json!({"Gi0/0": {"oper_status": "up", "enabled": true}});
    write_device_fixtures(&source_dir, "r1", &iface, &json!({"hostname r1": {}}));

    let inventory = Inventory::from_devices(vec![device("r1"), device("r2")]);
    let report = execute(
        &inventory,
        &FsCaptureSource::new(&source_dir),
        &config(&pre_dir, None),
    )
    .unwrap();

    let r2_fails = report
        .records
        .iter()
        .filter(|r| r.device == "r2" && r.rule == "capture" && r.verdict.is_fail())
        .count();
    assert_eq!(r2_fails, 4, "every r2 unit records its own capture fail");
    assert!(pre_dir.join("r1_interface.json").is_file());
}

#[test]
fn test_disconnected_device_fails_unless_offline() {
    let tmp = tempfile::tempdir().unwrap();
    let source_dir = tmp.path().join("source");
    fs::create_dir(&source_dir).unwrap();
    let iface = json!({"Gi0/0": {"oper_status": "up", "enabled": true}});
    write_device_fixtures(&source_dir, "r1", &iface, &json!({"hostname r1": {}}));

    let mut dev = device("r1");
    dev.connected = false;
    let inventory = Inventory::from_devices(vec![dev]);
    let source = FsCaptureSource::new(&source_dir);

    let mut online = config(&tmp.path().join("pre_a"), None);
    online.offline = false;
    let report = execute(&inventory, &source, &online).unwrap();
    assert!(report
        .records
        .iter()
        .all(|r| r.rule == "capture" && r.verdict.is_fail()));

    let offline = config(&tmp.path().join("pre_b"), None);
    let report = execute(&inventory, &source, &offline).unwrap();
    assert!(report.succeeded());
}

#[test]
fn test_unsupported_platform_is_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let source_dir = tmp.path().join("source");
    fs::create_dir(&source_dir).unwrap();

    let mut dev = device("fw1");
    dev.os = "asa".into();
    let inventory = Inventory::from_devices(vec![dev]);
    let report = execute(
        &inventory,
        &FsCaptureSource::new(&source_dir),
        &config(&tmp.path().join("pre"), None),
    )
    .unwrap();

    assert!(report.records.iter().all(|r| r.verdict.is_skip()));
    assert!(report.succeeded());
}

#[test]
fn test_check_stage_applies_pre_only_semantics() {
    let tmp = tempfile::tempdir().unwrap();
    let source_dir = tmp.path().join("source");
    let pre_dir = tmp.path().join("pre");
    fs::create_dir(&source_dir).unwrap();

    let iface = json!({
        "Gi0/0": {"counters": {"in_errors": 5}, "oper_status": "up", "enabled": true},
        "Gi0/1": {"oper_status": "down", "enabled": false}
    });
    write_device_fixtures(&source_dir, "r1", &iface, &json!({"hostname r1": {}}));

    let inventory = Inventory::from_devices(vec![device("r1")]);
    execute(
        &inventory,
        &FsCaptureSource::new(&source_dir),
        &config(&pre_dir, None),
    )
    .unwrap();

    let report = check_stage(&inventory, &pre_dir).unwrap();
    assert_eq!(report.stage, "check");

    let counter = report
        .records
        .iter()
        .find(|r| r.member.as_deref() == Some("Gi0/0") && r.rule == "counter-nonzero")
        .unwrap();
    assert!(counter.verdict.is_fail());
    assert!(counter.verdict.reason().unwrap().contains('5'));

    let admin_down = report
        .records
        .iter()
        .find(|r| r.member.as_deref() == Some("Gi0/1") && r.rule == "status-not-down")
        .unwrap();
    assert!(admin_down.verdict.is_skip());
    assert!(admin_down.verdict.reason().unwrap().contains("admin-down"));
}
