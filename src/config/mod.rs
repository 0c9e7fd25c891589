mod customer;
mod item;
mod offer;
mod seller;
pub mod state;

pub use customer::Customer;
pub use item::CatalogItem;
pub use offer::{Offer, OfferKind};
pub use seller::{Config, InvoiceSettings, OfferSettings, PdfSettings, Seller};
pub use state::{Counter, HistoryEntry, PaymentMode, State};

use crate::error::{BillingError, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir or ~/.billing/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "billing") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        BillingError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".billing"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the PDF output directory; relative paths live under the config dir
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

fn load_toml<T: DeserializeOwned>(config_dir: &Path, file: &str) -> Result<T> {
    let path = config_dir.join(file);
    if !path.exists() {
        return Err(BillingError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| BillingError::ConfigParse { path, source: e })
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    load_toml(config_dir, "config.toml")
}

pub fn load_customers(config_dir: &Path) -> Result<HashMap<String, Customer>> {
    load_toml(config_dir, "customers.toml")
}

pub fn load_services(config_dir: &Path) -> Result<HashMap<String, CatalogItem>> {
    load_toml(config_dir, "services.toml")
}

pub fn load_products(config_dir: &Path) -> Result<HashMap<String, CatalogItem>> {
    load_toml(config_dir, "products.toml")
}

/// Load offers.toml (empty if missing, since offers are optional)
pub fn load_offers(config_dir: &Path) -> Result<HashMap<String, Offer>> {
    if !config_dir.join("offers.toml").exists() {
        return Ok(HashMap::new());
    }
    load_toml(config_dir, "offers.toml")
}

/// Load state.toml (creates default if missing)
pub fn load_state(config_dir: &Path) -> Result<State> {
    if !config_dir.join("state.toml").exists() {
        return Ok(State::default());
    }
    load_toml(config_dir, "state.toml")
}

/// Save state.toml
pub fn save_state(config_dir: &Path, state: &State) -> Result<()> {
    let path = config_dir.join("state.toml");
    let content = toml::to_string_pretty(state).map_err(|e| {
        BillingError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[seller]
name = "Your Salon Name"
address = "12 MG Road"
city = "Bengaluru"
state = "Karnataka"
state_code = "29"
zip = "560001"
country = "India"
email = "billing@yoursalon.in"
# phone = "+91-80-1234-5678"     # optional
# gstin = "29ABCDE1234F1Z5"      # optional

[invoice]
number_format = "INV-{year}-{seq:04}"  # e.g., INV-2026-0001
currency = "INR"
currency_symbol = "₹"

[pdf]
output_dir = "output"   # relative paths are inside this config directory

# [offers]
# api_url = "https://api.example.com"   # look up offers remotely instead of offers.toml
"#;

/// Template content for customers.toml
pub const CUSTOMERS_TEMPLATE: &str = r#"# Define your customers here. The table name (e.g., [asha]) is used
# as the customer identifier in the generate command.
#
# Example:
#   billing generate --customer walk-in --service haircut:1

[walk-in]
name = "Walk-in Customer"
phone = "0000000000"

[asha]
name = "Asha Menon"
phone = "+91-98450-12345"
email = "asha@example.com"        # optional
city = "Bengaluru"                # optional
membership = "GOLD"               # optional, applied when no offer is given
"#;

/// Template content for services.toml
pub const SERVICES_TEMPLATE: &str = r#"# Services offered. The table name is the identifier used with --service.
# tax = "exclusive" adds GST on top of the price, "inclusive" means the
# price already contains GST.

[haircut]
name = "Haircut & Styling"
code = "SRV-001"
price = 500.00
gst_rate = 18.0
tax = "exclusive"

[facial]
name = "Classic Facial"
code = "SRV-002"
price = 1180.00
gst_rate = 18.0
tax = "inclusive"

[manicure]
name = "Manicure"
code = "SRV-003"
price = 350.00
gst_rate = 18.0
tax = "exclusive"
"#;

/// Template content for products.toml
pub const PRODUCTS_TEMPLATE: &str = r#"# Retail products. The table name is the identifier used with --product.

[shampoo]
name = "Herbal Shampoo 250ml"
code = "PRD-001"
price = 1180.00
gst_rate = 18.0
tax = "inclusive"

[serum]
name = "Hair Serum 100ml"
code = "PRD-002"
price = 750.00
gst_rate = 12.0
tax = "exclusive"
"#;

/// Template content for offers.toml
pub const OFFERS_TEMPLATE: &str = r#"# Promo codes and memberships. The table name is the code used with --offer.
# Only percentage discounts are applied to bills.

[WELCOME10]
name = "Welcome offer"
kind = "promo"
percentage = 10.0

[GOLD]
name = "Gold Membership"
kind = "membership"
percentage = 15.0

[FLAT200]
name = "Flat 200 off"
kind = "promo"
amount = 200.0
"#;
