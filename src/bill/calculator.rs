use serde::{Deserialize, Serialize};

use super::discount::DiscountSpec;
use crate::error::{BillingError, Result};

/// Whether a unit price already contains GST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxTreatment {
    /// GST is inside the price and gets extracted
    Inclusive,
    /// GST is added on top of the price
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Service,
    Product,
}

/// A service or product in the cart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub code: String,
    pub kind: ItemKind,
    pub unit_price: f64,
    pub quantity: u32,
    pub gst_rate: f64,
    pub tax_treatment: TaxTreatment,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.quantity == 0 {
            return Err(BillingError::InvalidField {
                field: format!("{field}.quantity"),
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if !(self.unit_price.is_finite() && self.unit_price >= 0.0) {
            return Err(BillingError::InvalidField {
                field: format!("{field}.unit_price"),
                value: self.unit_price,
                reason: "must be a non-negative amount",
            });
        }
        if !self.line_total().is_finite() {
            return Err(BillingError::InvalidField {
                field: format!("{field}.unit_price"),
                value: self.unit_price,
                reason: "line total overflows",
            });
        }
        ensure_percent(&format!("{field}.gst_rate"), self.gst_rate)
    }
}

/// Reject anything outside 0..=100, NaN included
pub(crate) fn ensure_percent(field: &str, value: f64) -> Result<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(BillingError::InvalidField {
            field: field.to_string(),
            value,
            reason: "must be between 0 and 100",
        })
    }
}

/// Tax figures for one line after the discount is applied to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTax {
    pub line_total: f64,
    pub discount: f64,
    pub after_discount: f64,
    /// Value of the line excluding GST
    pub taxable_value: f64,
    pub gst: f64,
    /// What the customer pays for this line
    pub net_total: f64,
}

impl LineTax {
    pub fn cgst(&self) -> f64 {
        self.gst / 2.0
    }

    pub fn sgst(&self) -> f64 {
        self.gst / 2.0
    }
}

/// The one tax rule shared by the calculator and the invoice formatter.
///
/// The discount is taken off the line's own total before tax. Exclusive
/// lines get GST added on top, inclusive lines have it extracted from the
/// discounted price.
pub fn item_tax(item: &LineItem, percentage: f64) -> LineTax {
    let line_total = item.line_total();
    let (discount, after_discount) = if percentage == 0.0 {
        (0.0, line_total)
    } else {
        let discount = line_total * percentage / 100.0;
        (discount, line_total - discount)
    };

    match item.tax_treatment {
        TaxTreatment::Exclusive => {
            let gst = after_discount * item.gst_rate / 100.0;
            LineTax {
                line_total,
                discount,
                after_discount,
                taxable_value: after_discount,
                gst,
                net_total: after_discount + gst,
            }
        }
        TaxTreatment::Inclusive => {
            let base = after_discount * 100.0 / (100.0 + item.gst_rate);
            LineTax {
                line_total,
                discount,
                after_discount,
                taxable_value: base,
                gst: after_discount - base,
                net_total: after_discount,
            }
        }
    }
}

/// GST collected under one tax treatment, split 50/50 into CGST and SGST
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GstBucket {
    pub cgst: f64,
    pub sgst: f64,
    pub total: f64,
}

impl GstBucket {
    fn add(&mut self, gst: f64) {
        let half = gst / 2.0;
        self.cgst += half;
        self.sgst += half;
        self.total += gst;
    }
}

/// Computed bill for one cart and discount snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BillBreakdown {
    pub subtotal: f64,
    pub discount_percentage: f64,
    pub discount_amount: f64,
    pub amount_after_discount: f64,
    pub taxable_value: f64,
    pub exclusive: GstBucket,
    pub inclusive: GstBucket,
    pub total_gst: f64,
    pub final_amount: f64,
}

impl BillBreakdown {
    pub fn cgst(&self) -> f64 {
        self.exclusive.cgst + self.inclusive.cgst
    }

    pub fn sgst(&self) -> f64 {
        self.exclusive.sgst + self.inclusive.sgst
    }
}

/// Compute the bill for a cart of services and products.
///
/// Every input is validated first; nothing is clamped. Only exclusive GST
/// is added to the final amount since inclusive GST is already part of the
/// discounted prices.
pub fn compute_bill(
    services: &[LineItem],
    products: &[LineItem],
    discount: &DiscountSpec,
) -> Result<BillBreakdown> {
    discount.validate()?;
    for (group, items) in [("services", services), ("products", products)] {
        for (idx, item) in items.iter().enumerate() {
            item.validate(&format!("{group}[{idx}]"))?;
        }
    }

    let percentage = discount.percentage;
    let mut bill = BillBreakdown {
        discount_percentage: percentage,
        ..BillBreakdown::default()
    };

    for item in services.iter().chain(products) {
        let tax = item_tax(item, percentage);
        bill.subtotal += tax.line_total;
        bill.taxable_value += tax.taxable_value;
        match item.tax_treatment {
            TaxTreatment::Exclusive => bill.exclusive.add(tax.gst),
            TaxTreatment::Inclusive => bill.inclusive.add(tax.gst),
        }
    }

    if percentage == 0.0 {
        bill.amount_after_discount = bill.subtotal;
    } else {
        bill.discount_amount = bill.subtotal * percentage / 100.0;
        bill.amount_after_discount = bill.subtotal - bill.discount_amount;
    }

    bill.total_gst = bill.exclusive.total + bill.inclusive.total;
    bill.final_amount = bill.amount_after_discount + bill.exclusive.total;

    ensure_finite(&bill)?;
    Ok(bill)
}

/// Finite lines can still sum (or gross up) past f64::MAX
fn ensure_finite(bill: &BillBreakdown) -> Result<()> {
    let totals = [
        ("subtotal", bill.subtotal),
        ("taxable_value", bill.taxable_value),
        ("total_gst", bill.total_gst),
        ("final_amount", bill.final_amount),
    ];
    match totals.into_iter().find(|(_, value)| !value.is_finite()) {
        Some((field, value)) => Err(BillingError::InvalidField {
            field: field.to_string(),
            value,
            reason: "exceeds the largest representable amount",
        }),
        None => Ok(()),
    }
}
