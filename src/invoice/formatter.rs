use serde::Serialize;

use super::words::{amount_in_words, CurrencyWords};
use crate::bill::{item_tax, BillBreakdown, ItemKind, LineItem, TaxTreatment};
use crate::config::{Customer, Seller};
use crate::error::Result;

/// Name and address block printed on the invoice
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Party {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gstin: Option<String>,
}

impl From<&Seller> for Party {
    fn from(seller: &Seller) -> Self {
        let mut region = format!("{}, {} {}", seller.city, seller.state, seller.zip);
        if let Some(code) = &seller.state_code {
            region.push_str(&format!(" (State code {code})"));
        }
        Self {
            name: seller.name.clone(),
            address_lines: vec![seller.address.clone(), region, seller.country.clone()],
            phone: seller.phone.clone(),
            email: Some(seller.email.clone()),
            gstin: seller.gstin.clone(),
        }
    }
}

impl From<&Customer> for Party {
    fn from(customer: &Customer) -> Self {
        let region = match (&customer.city, &customer.state) {
            (Some(city), Some(state)) => Some(format!("{city}, {state}")),
            (Some(place), None) | (None, Some(place)) => Some(place.clone()),
            (None, None) => None,
        };
        Self {
            name: customer.name.clone(),
            address_lines: customer.address.iter().cloned().chain(region).collect(),
            phone: Some(customer.phone.clone()),
            email: customer.email.clone(),
            gstin: customer.gstin.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parties {
    pub buyer: Party,
    pub seller: Party,
}

/// Order details that pass straight through to the document
#[derive(Debug, Clone)]
pub struct OrderMeta {
    pub number: String,
    pub date: String,
    pub payment_mode: String,
    pub currency: String,
    pub currency_symbol: String,
    pub offer: Option<String>,
}

/// One printed line
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct InvoiceRow {
    pub index: usize,
    pub kind: ItemKind,
    pub code: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub gst_rate: f64,
    pub tax_treatment: TaxTreatment,
    pub line_total: f64,
    pub discount: f64,
    pub taxable_value: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub tax_amount: f64,
    pub net_total: f64,
}

/// Totals block, copied from the bill breakdown
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub discount_percentage: f64,
    pub discount: f64,
    pub amount_after_discount: f64,
    pub taxable_amount: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub exclusive_gst: f64,
    pub inclusive_gst: f64,
    pub total_gst: f64,
    pub final_amount: f64,
}

impl From<&BillBreakdown> for InvoiceTotals {
    fn from(bill: &BillBreakdown) -> Self {
        Self {
            subtotal: bill.subtotal,
            discount_percentage: bill.discount_percentage,
            discount: bill.discount_amount,
            amount_after_discount: bill.amount_after_discount,
            taxable_amount: bill.taxable_value,
            cgst: bill.cgst(),
            sgst: bill.sgst(),
            exclusive_gst: bill.exclusive.total,
            inclusive_gst: bill.inclusive.total,
            total_gst: bill.total_gst,
            final_amount: bill.final_amount,
        }
    }
}

/// Everything the PDF template needs
#[derive(Debug, Serialize, Clone)]
pub struct InvoiceDocument {
    pub number: String,
    pub date: String,
    pub seller: Party,
    pub buyer: Party,
    pub payment_mode: String,
    pub offer: Option<String>,
    pub currency_symbol: String,
    pub line_items: Vec<InvoiceRow>,
    pub totals: InvoiceTotals,
    pub amount_in_words: String,
}

/// Project a computed bill into invoice rows and totals.
///
/// Row tax goes through the same rule the calculator used, so inclusive
/// rows show extracted GST rather than GST added on top. `line_items` are
/// expected in the order they were billed (services, then products).
pub fn format_invoice(
    breakdown: &BillBreakdown,
    line_items: &[LineItem],
    parties: Parties,
    meta: OrderMeta,
) -> Result<InvoiceDocument> {
    let rows = line_items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let tax = item_tax(item, breakdown.discount_percentage);
            InvoiceRow {
                index: idx + 1,
                kind: item.kind,
                code: item.code.clone(),
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                gst_rate: item.gst_rate,
                tax_treatment: item.tax_treatment,
                line_total: tax.line_total,
                discount: tax.discount,
                taxable_value: tax.taxable_value,
                cgst: tax.cgst(),
                sgst: tax.sgst(),
                tax_amount: tax.gst,
                net_total: tax.net_total,
            }
        })
        .collect();

    let amount_in_words =
        amount_in_words(breakdown.final_amount, &CurrencyWords::for_code(&meta.currency))?;

    Ok(InvoiceDocument {
        number: meta.number,
        date: meta.date,
        seller: parties.seller,
        buyer: parties.buyer,
        payment_mode: meta.payment_mode,
        offer: meta.offer,
        currency_symbol: meta.currency_symbol,
        line_items: rows,
        totals: InvoiceTotals::from(breakdown),
        amount_in_words,
    })
}
