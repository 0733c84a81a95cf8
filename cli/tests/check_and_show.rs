use assert_cmd::Command;
use pulsec_core::builder::Builder;
use pulsec_core::ir::AnalogCircuit;
use pulsec_core::ir::register::AtomArrangement;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_circuit(dir: &Path, name: &str, circuit: &AnalogCircuit) -> PathBuf {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(circuit).expect("serialize circuit");
    std::fs::write(&path, text).expect("write circuit file");
    path
}

fn flat_circuit() -> AnalogCircuit {
    Builder::new(AtomArrangement::chain(4, 6.1))
        .rydberg()
        .detuning()
        .uniform()
        .constant(2, 4)
        .amplitude()
        .uniform()
        .linear(1, 1, 4)
        .parse_circuit()
        .expect("parse flat circuit")
}

fn ramp_circuit() -> AnalogCircuit {
    Builder::new(AtomArrangement::chain(4, 6.1))
        .rydberg()
        .detuning()
        .uniform()
        .linear(0, "delta", "t")
        .parse_circuit()
        .expect("parse ramp circuit")
}

fn run(args: &[&str]) -> (bool, String, String) {
    let output = Command::cargo_bin("pulsec")
        .expect("pulsec binary")
        .args(args)
        .output()
        .expect("failed to spawn pulsec");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn check_reports_a_constant_circuit() {
    let dir = TempDir::new().unwrap();
    let path = write_circuit(dir.path(), "flat.json", &flat_circuit());

    let (ok, stdout, _) = run(&["check", path.to_str().unwrap()]);
    assert!(ok);
    assert!(stdout.contains("detuning"), "missing drive row: {stdout}");
    assert!(stdout.contains("circuit is constant"), "{stdout}");
}

#[test]
fn check_uses_assignments_from_flags_and_file() {
    let dir = TempDir::new().unwrap();
    let path = write_circuit(dir.path(), "ramp.json", &ramp_circuit());
    let bindings = dir.path().join("bindings.json");
    std::fs::write(&bindings, r#"{"delta": 3, "t": 2}"#).unwrap();

    let (ok, stdout, _) = run(&[
        "check",
        path.to_str().unwrap(),
        "--assignments",
        bindings.to_str().unwrap(),
    ]);
    assert!(ok);
    assert!(stdout.contains("circuit is not constant"), "{stdout}");

    // a flag overrides the file and flattens the ramp
    let (ok, stdout, _) = run(&[
        "check",
        path.to_str().unwrap(),
        "--assignments",
        bindings.to_str().unwrap(),
        "--assign",
        "delta=0",
    ]);
    assert!(ok);
    assert!(stdout.contains("circuit is constant"), "{stdout}");
}

#[test]
fn check_fails_on_unbound_variable() {
    let dir = TempDir::new().unwrap();
    let path = write_circuit(dir.path(), "ramp.json", &ramp_circuit());

    let (ok, stdout, stderr) = run(&["check", path.to_str().unwrap(), "-a", "delta=1"]);
    assert!(!ok);
    assert!(stdout.is_empty());
    assert!(stderr.contains("PULSEC | ERROR"), "{stderr}");
    assert!(stderr.contains("no value assigned to variable `t`"), "{stderr}");
}

#[test]
fn check_json_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    let path = write_circuit(dir.path(), "flat.json", &flat_circuit());

    let (ok, stdout, _) = run(&["check", path.to_str().unwrap(), "--json"]);
    assert!(ok);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(report["is_constant"], serde_json::json!(true));
    assert_eq!(report["drives"].as_array().map(|d| d.len()), Some(2));

    let effective: AnalogCircuit =
        serde_json::from_value(report["effective_analog_circuit"].clone()).unwrap();
    assert_eq!(effective.register, flat_circuit().register);
}

#[test]
fn show_prints_and_normalizes_a_circuit() {
    let dir = TempDir::new().unwrap();
    let circuit = flat_circuit();
    let path = write_circuit(dir.path(), "flat.json", &circuit);

    let (ok, stdout, _) = run(&["show", path.to_str().unwrap()]);
    assert!(ok);
    assert!(stdout.contains(&circuit.to_string()), "{stdout}");

    let (ok, stdout, _) = run(&["show", path.to_str().unwrap(), "--json"]);
    assert!(ok);
    let back: AnalogCircuit = serde_json::from_str(&stdout).unwrap();
    assert_eq!(back, circuit);
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let (ok, _, stderr) = run(&["show", path.to_str().unwrap()]);
    assert!(!ok);
    assert!(stderr.contains("Failed to read"), "{stderr}");
}
