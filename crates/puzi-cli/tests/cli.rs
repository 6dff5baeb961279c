//! End-to-end tests for the `puzi` binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn puzi(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("puzi").expect("binary");
    cmd.current_dir(dir)
        .env_remove("PUZI_CONFIG")
        .env_remove("PUZI_FORMAT")
        .env("PUZI_STATE", dir.join("ledger.json"));
    cmd
}

fn json(dir: &Path, args: &[&str]) -> Value {
    let output = puzi(dir)
        .arg("--format")
        .arg("json")
        .args(args)
        .output()
        .expect("run");
    assert!(
        output.status.success(),
        "puzi {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

fn text(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_else(|| unreachable!("missing {pointer} in {value}"))
        .to_string()
}

#[test]
fn listing_lifecycle() {
    let dir = TempDir::new().expect("temp dir");
    let d = dir.path();

    let alice = text(&json(d, &["keygen", "--out", "alice.json"]), "/address");
    let bob = text(&json(d, &["keygen", "--out", "bob.json"]), "/address");
    for who in [&alice, &bob] {
        json(d, &["airdrop", who.as_str(), "10000000000"]);
    }

    let sell = text(
        &json(d, &["mint", "create", "--payer", "alice.json", "--decimals", "9"]),
        "/mint",
    );
    let buy = text(
        &json(d, &["mint", "create", "--payer", "alice.json", "--decimals", "6"]),
        "/mint",
    );
    json(
        d,
        &["mint", "to", "--authority", "alice.json", "--mint", &sell, "--owner", &alice, "--amount", "10"],
    );
    json(
        d,
        &["mint", "to", "--authority", "alice.json", "--mint", &buy, "--owner", &bob, "--amount", "100"],
    );

    let created = json(
        d,
        &[
            "listing", "create", "--seller", "alice.json", "--sell-mint", &sell, "--buy-mint", &buy,
            "--amount", "5", "--price", "30", "--id", "1",
        ],
    );
    let listing = text(&created, "/listing");
    assert_eq!(text(&created, "/amount/ui"), "5");

    let quote = json(d, &["listing", "quote", &listing, "--amount", "2.5"]);
    assert_eq!(text(&quote, "/cost/ui"), "75");

    let bought = json(d, &["listing", "buy", "--buyer", "bob.json", &listing, "--amount", "2.5"]);
    assert_eq!(text(&bought, "/paid/ui"), "75");
    assert_eq!(text(&bought, "/remaining/ui"), "2.5");

    let balance = json(d, &["balance", &bob, "--mint", &sell]);
    assert_eq!(text(&balance, "/token/amount/ui"), "2.5");
    let proceeds = json(d, &["balance", &alice, "--mint", &buy]);
    assert_eq!(text(&proceeds, "/token/amount/ui"), "75");

    let active = json(d, &["listing", "list", "--active"]);
    assert_eq!(active["listings"].as_array().map(Vec::len), Some(1));
    let by_mint = json(d, &["listing", "list", "--mint", &buy]);
    assert_eq!(by_mint["listings"].as_array().map(Vec::len), Some(0));

    let cancelled = json(d, &["listing", "cancel", "--seller", "alice.json", &listing]);
    assert_eq!(text(&cancelled, "/returned/ui"), "2.5");

    let remaining = json(d, &["balance", &alice, "--mint", &sell]);
    assert_eq!(text(&remaining, "/token/amount/ui"), "7.5");

    puzi(d)
        .args(["listing", "show", listing.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("listing not found"));
}

#[test]
fn overselling_fails_with_nonzero_exit() {
    let dir = TempDir::new().expect("temp dir");
    let d = dir.path();

    let alice = text(&json(d, &["keygen", "--out", "alice.json"]), "/address");
    let bob = text(&json(d, &["keygen", "--out", "bob.json"]), "/address");
    for who in [&alice, &bob] {
        json(d, &["airdrop", who.as_str(), "10000000000"]);
    }
    let sell = text(&json(d, &["mint", "create", "--payer", "alice.json"]), "/mint");
    let buy = text(&json(d, &["mint", "create", "--payer", "alice.json"]), "/mint");
    json(
        d,
        &["mint", "to", "--authority", "alice.json", "--mint", &sell, "--owner", &alice, "--amount", "100"],
    );
    json(
        d,
        &["mint", "to", "--authority", "alice.json", "--mint", &buy, "--owner", &bob, "--amount", "1000"],
    );
    let listing = text(
        &json(
            d,
            &[
                "listing", "create", "--seller", "alice.json", "--sell-mint", &sell, "--buy-mint",
                &buy, "--amount", "10", "--price", "1",
            ],
        ),
        "/listing",
    );

    puzi(d)
        .args(["listing", "buy", "--buyer", "bob.json", listing.as_str(), "--amount", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient stock"));

    // Rejected before the buyer paid for a receiving account.
    let bob_balance = json(d, &["balance", &bob]);
    assert_eq!(bob_balance["lamports"].as_u64(), Some(10_000_000_000));

    let shown = json(d, &["listing", "show", &listing]);
    assert_eq!(text(&shown, "/remaining/ui"), "10");
}

#[test]
fn table_output_is_default() {
    let dir = TempDir::new().expect("temp dir");
    puzi(dir.path())
        .args(["listing", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No listings"));
}

#[test]
fn missing_keypair_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    puzi(dir.path())
        .args(["mint", "create", "--payer", "nobody.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load keypair"));
}

#[test]
fn well_known_mint_balance_shows_symbol() {
    let dir = TempDir::new().expect("temp dir");
    let d = dir.path();
    let alice = text(&json(d, &["keygen", "--out", "alice.json"]), "/address");
    let balance = json(
        d,
        &["balance", &alice, "--mint", "So11111111111111111111111111111111111111112"],
    );
    assert_eq!(text(&balance, "/token/symbol"), "SOL");
    assert_eq!(text(&balance, "/token/amount/ui"), "0");
}
