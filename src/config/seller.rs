use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub seller: Seller,
    pub invoice: InvoiceSettings,
    pub pdf: PdfSettings,
    #[serde(default)]
    pub offers: OfferSettings,
}

/// The salon or franchise issuing the invoice
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Seller {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub state_code: Option<String>,
    pub zip: String,
    pub country: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct InvoiceSettings {
    pub number_format: String,
    pub currency: String,
    pub currency_symbol: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PdfSettings {
    pub output_dir: String,
}

/// Where promo codes and memberships are looked up
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct OfferSettings {
    /// Remote offers API; offers.toml is used when unset
    #[serde(default)]
    pub api_url: Option<String>,
}
