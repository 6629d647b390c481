//! End-to-end tests of the `strata` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MARKET: &str = r#"
[[units]]
[[units.curves]]
name = "USD_DISC"
roles = [
    { role = "discounting", currency = "USD" },
    { role = "overnight", index = { name = "USD_FEDFUND", currency = "USD" } },
]
quotes = [
    { type = "deposit", currency = "USD", end = 0.5, rate = 0.018 },
    { type = "deposit", currency = "USD", end = 1.0, rate = 0.019 },
    { type = "ois_swap", index = { name = "USD_FEDFUND", currency = "USD" }, tenor = 2.0, period = 1.0, rate = 0.021 },
    { type = "ois_swap", index = { name = "USD_FEDFUND", currency = "USD" }, tenor = 3.0, period = 1.0, rate = 0.022 },
]

[[units]]
[[units.curves]]
name = "USD_FWD3M"
roles = [{ role = "ibor", index = { name = "USD_LIBOR_3M", currency = "USD", tenor_months = 3 } }]
quotes = [
    { type = "fra", index = { name = "USD_LIBOR_3M", currency = "USD", tenor_months = 3 }, start = 0.25, rate = 0.023 },
    { type = "fra", index = { name = "USD_LIBOR_3M", currency = "USD", tenor_months = 3 }, start = 0.75, rate = 0.024 },
    { type = "ibor_swap", index = { name = "USD_LIBOR_3M", currency = "USD", tenor_months = 3 }, tenor = 2.0, fixed_period = 1.0, rate = 0.026 },
    { type = "ibor_swap", index = { name = "USD_LIBOR_3M", currency = "USD", tenor_months = 3 }, tenor = 3.0, fixed_period = 1.0, rate = 0.027 },
]
"#;

fn strata() -> Command {
    let mut cmd = Command::cargo_bin("strata").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("STRATA_CONFIG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_build_json_report() {
    let dir = TempDir::new().unwrap();
    let market = write(&dir, "usd.toml", MARKET);

    let output = strata()
        .args(["build", "--format", "json", "--market"])
        .arg(&market)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["nodes"].as_array().unwrap().len(), 8);
    assert_eq!(report["blocks"].as_array().unwrap().len(), 2);
    assert_eq!(report["blocks"][1]["curve"], "USD_FWD3M");
    assert_eq!(report["blocks"][1]["columns"], 8);
    for row in report["residuals"].as_array().unwrap() {
        assert!(row["residual"].as_f64().unwrap().abs() < 1e-8);
    }
}

#[test]
fn test_build_table_report() {
    let dir = TempDir::new().unwrap();
    let market = write(&dir, "usd.toml", MARKET);

    strata()
        .args(["build", "--market"])
        .arg(&market)
        .assert()
        .success()
        .stdout(predicate::str::contains("USD_FWD3M"))
        .stdout(predicate::str::contains("Building blocks"));
}

#[test]
fn test_build_with_config_file() {
    let dir = TempDir::new().unwrap();
    let market = write(&dir, "usd.toml", MARKET);
    let config = write(
        &dir,
        "strata.toml",
        "[root_finder]\nstrategy = \"broyden\"\ndecomposition = \"lu\"\n",
    );

    strata()
        .args(["build", "--format", "json", "--market"])
        .arg(&market)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();
}

#[test]
fn test_build_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let market = write(&dir, "usd.toml", MARKET);
    let config = write(&dir, "strata.toml", "[root_finder]\nmax_steps = 0\n");

    strata()
        .args(["build", "--market"])
        .arg(&market)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_steps"));
}

#[test]
fn test_build_missing_market_file() {
    strata()
        .args(["build", "--market", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read market file"));
}

#[test]
fn test_config_prints_defaults() {
    strata()
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[root_finder]"))
        .stdout(predicate::str::contains("strategy = \"newton\""));
}

#[test]
fn test_config_json() {
    let output = strata().args(["config", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["lmm_calibration"]["max_multiplier"], 10.0);
    assert_eq!(config["curve_building"]["target"], "par_spread_market_quote");
}
