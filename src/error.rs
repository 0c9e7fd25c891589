use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Config directory not found at {0}. Run 'billing init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Customer '{0}' not found in customers.toml")]
    CustomerNotFound(String),

    #[error("Service '{0}' not found in services.toml")]
    ServiceNotFound(String),

    #[error("Product '{0}' not found in products.toml")]
    ProductNotFound(String),

    #[error("Offer '{0}' not found")]
    OfferNotFound(String),

    #[error("Offer lookup failed for '{code}': {reason}")]
    OfferLookup { code: String, reason: String },

    #[error("Invalid quantity '{qty}' for item '{item}': {reason}")]
    InvalidQuantity {
        item: String,
        qty: String,
        reason: String,
    },

    #[error("Invalid item format '{0}'. Expected 'item:quantity' (e.g., 'haircut:1')")]
    InvalidItemFormat(String),

    #[error("No items specified. Use --service or --product <name>:<quantity> to add line items.")]
    NoItems,

    #[error("Invalid {field} ({value}): {reason}")]
    InvalidField {
        field: String,
        value: f64,
        reason: &'static str,
    },

    #[error("Amount {0} cannot be written in words")]
    AmountOutOfRange(f64),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Invoice '{0}' not found in history")]
    InvoiceNotFound(String),

    #[error("Invalid invoice index '{0}'. Use 'billing list' to see available invoices.")]
    InvalidInvoiceIndex(String),

    #[error("Invoice file not found: {0}")]
    InvoiceFileNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, BillingError>;
