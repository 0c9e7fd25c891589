use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn billing_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("billing"))
}

/// Initialize a fresh config dir from the templates
fn init_config(temp_dir: &TempDir) -> PathBuf {
    let config_path = temp_dir.path().join("billing-config");
    billing_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();
    config_path
}

fn run_with(config_path: &PathBuf, args: &[&str]) -> assert_cmd::assert::Assert {
    billing_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(args)
        .assert()
}

#[test]
fn test_help() {
    billing_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Salon billing and GST tax invoices"));
}

#[test]
fn test_version() {
    billing_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("billing"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("billing-config");

    billing_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized billing config"));

    for file in [
        "config.toml",
        "customers.toml",
        "services.toml",
        "products.toml",
        "offers.toml",
    ] {
        assert!(config_path.join(file).exists(), "{file} missing");
    }
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(&config_path, &["init"])
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    run_with(&config_path, &["status"])
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(&config_path, &["status"])
        .success()
        .stdout(predicate::str::contains("Billing Status"))
        .stdout(predicate::str::contains("Services:         3"))
        .stdout(predicate::str::contains("Next invoice:"))
        .stdout(predicate::str::contains("INV-"));
}

#[test]
fn test_catalog_listings() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(&config_path, &["services"])
        .success()
        .stdout(predicate::str::contains("haircut"))
        .stdout(predicate::str::contains("Haircut & Styling"))
        .stdout(predicate::str::contains("₹500.00"))
        .stdout(predicate::str::contains("18% incl."));

    run_with(&config_path, &["products"])
        .success()
        .stdout(predicate::str::contains("Hair Serum 100ml"))
        .stdout(predicate::str::contains("12%"));

    run_with(&config_path, &["customers"])
        .success()
        .stdout(predicate::str::contains("asha"))
        .stdout(predicate::str::contains("Asha Menon"))
        .stdout(predicate::str::contains("GOLD"));

    run_with(&config_path, &["offers"])
        .success()
        .stdout(predicate::str::contains("WELCOME10"))
        .stdout(predicate::str::contains("membership"))
        .stdout(predicate::str::contains("not applied"));
}

#[test]
fn test_quote_exclusive_service_with_offer() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(
        &config_path,
        &["quote", "--service", "haircut:1", "--offer", "welcome10"],
    )
    .success()
    .stdout(predicate::str::contains("Discount (10%)"))
    .stdout(predicate::str::contains("₹50.00"))
    .stdout(predicate::str::contains("₹40.50"))
    .stdout(predicate::str::contains("Total:           ₹531.00"))
    .stdout(predicate::str::contains("Rupees Five Hundred Thirty One Only"));
}

#[test]
fn test_quote_inclusive_product_keeps_price() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(&config_path, &["quote", "--product", "shampoo:1"])
        .success()
        .stdout(predicate::str::contains("Taxable value:   ₹1,000.00"))
        .stdout(predicate::str::contains("GST in prices:   ₹180.00"))
        .stdout(predicate::str::contains("Total:           ₹1,180.00"))
        .stdout(predicate::str::contains(
            "Rupees One Thousand One Hundred Eighty Only",
        ));
}

#[test]
fn test_quote_mixed_cart_with_manual_discount() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(
        &config_path,
        &[
            "quote",
            "--service",
            "haircut:2",
            "--product",
            "shampoo:1",
            "--discount",
            "10",
        ],
    )
    .success()
    .stdout(predicate::str::contains("Subtotal:        ₹2,180.00"))
    .stdout(predicate::str::contains("₹218.00"))
    .stdout(predicate::str::contains("CGST:            ₹162.00"))
    .stdout(predicate::str::contains("Total:           ₹2,124.00"));
}

#[test]
fn test_quote_unknown_offer_bills_without_discount() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(
        &config_path,
        &["quote", "--service", "haircut:1", "--offer", "NOPE"],
    )
    .success()
    .stderr(predicate::str::contains("could not be applied"))
    .stdout(predicate::str::contains("Total:           ₹590.00"));
}

#[test]
fn test_quote_malformed_offers_file_bills_without_discount() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    fs::write(
        config_path.join("offers.toml"),
        "[GOLD]\nname = \"Gold\"\npercentage = \"fifteen\"\n",
    )
    .unwrap();

    run_with(
        &config_path,
        &["quote", "--service", "haircut:1", "--offer", "GOLD"],
    )
    .success()
    .stderr(predicate::str::contains("could not be applied"))
    .stdout(predicate::str::contains("Total:           ₹590.00"));
}

#[test]
fn test_quote_large_bill_uses_lakh_grouping() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(&config_path, &["quote", "--service", "haircut:300"])
        .success()
        .stdout(predicate::str::contains("Subtotal:        ₹1,50,000.00"))
        .stdout(predicate::str::contains("Total:           ₹1,77,000.00"))
        .stdout(predicate::str::contains("One Lakh Seventy Seven Thousand"));
}

#[test]
fn test_quote_fixed_amount_offer_is_not_applied() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(
        &config_path,
        &["quote", "--service", "haircut:1", "--offer", "FLAT200"],
    )
    .success()
    .stderr(predicate::str::contains("fixed-amount"))
    .stdout(predicate::str::contains("₹590.00"));
}

#[test]
fn test_quote_rejects_out_of_range_discount() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(
        &config_path,
        &["quote", "--service", "haircut:1", "--discount", "120"],
    )
    .failure()
    .stderr(predicate::str::contains("discount.percentage"));
}

#[test]
fn test_quote_offer_and_discount_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(
        &config_path,
        &[
            "quote",
            "--service",
            "haircut:1",
            "--offer",
            "GOLD",
            "--discount",
            "5",
        ],
    )
    .failure()
    .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_quote_input_errors() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(&config_path, &["quote"])
        .failure()
        .stderr(predicate::str::contains("No items specified"));

    run_with(&config_path, &["quote", "--service", "haircut:0"])
        .failure()
        .stderr(predicate::str::contains("Invalid quantity"));

    run_with(&config_path, &["quote", "--service", "haircut:abc"])
        .failure()
        .stderr(predicate::str::contains("Invalid quantity"));

    run_with(&config_path, &["quote", "--service", "haircut"])
        .failure()
        .stderr(predicate::str::contains("Invalid item format"));

    run_with(&config_path, &["quote", "--service", "balayage:1"])
        .failure()
        .stderr(predicate::str::contains("Service 'balayage' not found"));

    run_with(&config_path, &["quote", "--product", "haircut:1"])
        .failure()
        .stderr(predicate::str::contains("Product 'haircut' not found"));
}

#[test]
fn test_generate_missing_customer() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(
        &config_path,
        &["generate", "--customer", "nobody", "--service", "haircut:1"],
    )
    .failure()
    .stderr(predicate::str::contains("Customer 'nobody' not found"));
}

#[test]
fn test_generate_no_items() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(&config_path, &["generate", "--customer", "asha"])
        .failure()
        .stderr(predicate::str::contains("No items specified"));
}

#[test]
fn test_generate_rejects_unknown_payment_mode() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(
        &config_path,
        &[
            "generate",
            "--customer",
            "asha",
            "--service",
            "haircut:1",
            "--payment-mode",
            "cheque",
        ],
    )
    .failure()
    .stderr(predicate::str::contains("unknown payment mode"));
}

fn write_state(config_path: &std::path::Path, state: &str) {
    fs::write(config_path.join("state.toml"), state).unwrap();
}

const TWO_INVOICES: &str = r#"[counter]
last_number = 2
last_year = 2026

[[history]]
number = "INV-2026-0001"
customer = "asha"
date = "2026-01-10"
total = 531.0
file = "INV-2026-0001.pdf"
services = ["haircut:1"]
discount_percentage = 10.0
offer = "WELCOME10"
payment_mode = "upi"

[[history]]
number = "INV-2026-0002"
customer = "walk-in"
date = "2026-01-11"
total = 1180.0
file = "INV-2026-0002.pdf"
products = ["shampoo:1"]
"#;

#[test]
fn test_list_shows_history() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    write_state(&config_path, TWO_INVOICES);

    run_with(&config_path, &["list"])
        .success()
        .stdout(predicate::str::contains("INV-2026-0001"))
        .stdout(predicate::str::contains("INV-2026-0002"))
        .stdout(predicate::str::contains("UPI"))
        .stdout(predicate::str::contains("Cash"))
        .stdout(predicate::str::contains("₹1,711.00 billed"));

    run_with(&config_path, &["list", "--limit", "1"])
        .success()
        .stdout(predicate::str::contains("INV-2026-0002"))
        .stdout(predicate::str::contains("INV-2026-0001").not())
        .stdout(predicate::str::contains("₹1,180.00 billed"));
}

#[test]
fn test_list_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    run_with(&config_path, &["list"])
        .success()
        .stdout(predicate::str::contains("No invoices generated yet."));
}

#[test]
fn test_open_and_regenerate_bad_references() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    write_state(&config_path, TWO_INVOICES);

    run_with(&config_path, &["open", "5"])
        .failure()
        .stderr(predicate::str::contains("Invalid invoice index"));

    run_with(&config_path, &["open", "1"])
        .failure()
        .stderr(predicate::str::contains("Invoice file not found"));

    run_with(&config_path, &["regenerate", "INV-2099-0001"])
        .failure()
        .stderr(predicate::str::contains("not found in history"));
}

#[test]
fn test_status_shows_recent_invoices() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    write_state(&config_path, TWO_INVOICES);

    run_with(&config_path, &["status"])
        .success()
        .stdout(predicate::str::contains("Recent invoices:"))
        .stdout(predicate::str::contains("INV-2026-0001 - asha - ₹531.00"));
}

#[test]
fn test_words() {
    billing_cmd()
        .args(["words", "1234567.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Rupees Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven and Fifty Paise Only",
        ));

    billing_cmd()
        .args(["words", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rupees Zero Only"));

    billing_cmd()
        .args(["words", "1234567.25", "--currency", "USD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dollars One Million"))
        .stdout(predicate::str::contains("Twenty Five Cents Only"));

    billing_cmd()
        .args(["words", "1e17"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be written in words"));
}
