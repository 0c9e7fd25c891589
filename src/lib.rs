pub mod bill;
pub mod config;
pub mod error;
pub mod invoice;
pub mod offers;
pub mod pdf;

pub use bill::{compute_bill, BillBreakdown, DiscountSpec, LineItem, TaxTreatment};
pub use error::{BillingError, Result};
pub use invoice::{amount_in_words, format_invoice, InvoiceDocument};
