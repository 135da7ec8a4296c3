//! End-to-end checks that drive the compiled binary.
//!
//! Exhaustion paths take minutes with the fixed retry budget and are covered
//! at the library layer instead.

use std::net::TcpListener;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_servicewait"))
}

#[test]
fn no_arguments_prints_usage_and_exits_nonzero() {
    let output = bin().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("servicewait"));
    assert!(stdout.contains("name:host[:port][:protocol][:endpoint]"));
}

#[test]
fn reachable_service_reports_ready_and_exits_zero() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let output = bin()
        .arg(format!("db:127.0.0.1:{}:tcp", port))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("Waiting for db (127.0.0.1:{})...", port)));
    assert!(stdout.contains("✓ db is ready"));
    assert!(stdout.contains("Summary: 1 services ready, 0 services unavailable"));
}

#[test]
fn two_reachable_services_are_checked_in_order() {
    let a = TcpListener::bind("127.0.0.1:0").unwrap();
    let b = TcpListener::bind("127.0.0.1:0").unwrap();
    let output = bin()
        .arg(format!("db:127.0.0.1:{}", a.local_addr().unwrap().port()))
        .arg(format!("cache:127.0.0.1:{}", b.local_addr().unwrap().port()))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let db = stdout.find("Waiting for db").unwrap();
    let cache = stdout.find("Waiting for cache").unwrap();
    assert!(db < cache);
    assert!(stdout.contains("Summary: 2 services ready, 0 services unavailable"));
}
