mod calculator;
mod discount;
mod snapshot;

pub use calculator::{
    compute_bill, item_tax, BillBreakdown, GstBucket, ItemKind, LineItem, LineTax, TaxTreatment,
};
pub use discount::{resolve_discount, DiscountResolution, DiscountSpec, ResolvedOffer};
pub use snapshot::{LatestBill, Revision};
