use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_intersection_sim"))
        .args(args)
        .env("RUST_LOG", "warn,intersection_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Pull the number after `label` out of the first log line containing it
fn logged_number(stderr: &str, label: &str) -> f64 {
    let line = stderr
        .lines()
        .find(|line| line.contains(label))
        .unwrap_or_else(|| panic!("Could not find '{}' line", label));
    let parts: Vec<&str> = line.split(label).collect();
    parts
        .get(1)
        .and_then(|s| s.trim().trim_end_matches('%').parse().ok())
        .unwrap_or_else(|| panic!("Could not parse number from line: {}", line))
}

/// Test that the demo scenario runs and every vehicle gets through
#[test]
fn test_demo_simulation_runs() {
    let output = run_cli(&[]);

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
    assert_eq!(logged_number(&stderr, "Total vehicles:"), 6.0);
    assert_eq!(logged_number(&stderr, "Completed vehicles:"), 6.0);
    assert_eq!(logged_number(&stderr, "Preemptions:"), 1.0);
    assert!(stderr.contains("Direction N turns green"));
}

/// Test that explicit vehicles replace the demo scenario
#[test]
fn test_explicit_vehicles() {
    let output = run_cli(&["--duration", "10", "--vehicle", "N:S:0", "--vehicle", "E:W:0:3"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(logged_number(&stderr, "Total vehicles:"), 2.0);
    assert_eq!(logged_number(&stderr, "Completion rate:"), 100.0);
}

/// Test that random arrivals and the drawing mode work together
#[test]
fn test_random_vehicles_with_drawing() {
    let output = run_cli(&["--duration", "40", "--random", "12", "--seed", "3", "--draw"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Intersection at t=40 ==="));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(logged_number(&stderr, "Total vehicles:"), 12.0);
}

/// Test that bad configuration fails before the simulation starts
#[test]
fn test_invalid_configuration_fails_fast() {
    let output = run_cli(&["--quantum", "0"]);
    assert!(!output.status.success());

    let output = run_cli(&["--vehicle", "N:N:0"]);
    assert!(!output.status.success());

    let output = run_cli(&["--vehicle", "Q:N:0"]);
    assert!(!output.status.success());
}
