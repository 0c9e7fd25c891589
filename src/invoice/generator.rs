use chrono::{Datelike, Local, NaiveDate};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::formatter::{format_invoice, OrderMeta, Parties, Party};
use crate::bill::{
    compute_bill, resolve_discount, BillBreakdown, DiscountResolution, DiscountSpec, ItemKind,
    LineItem,
};
use crate::config::{
    load_config, load_customers, load_products, load_services, load_state, resolve_output_dir,
    save_state, CatalogItem, Config, Customer, HistoryEntry, PaymentMode, State,
};
use crate::error::{BillingError, Result};
use crate::offers::{lookup_discount, resolver_for};
use crate::pdf::generate_pdf;

/// How the discount for a bill is chosen
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountRequest {
    None,
    /// Entered by hand, validated strictly
    Percentage(f64),
    /// Promo code or membership, resolved and failing closed to 0%
    Offer(String),
}

/// A computed bill that has not been saved
#[derive(Debug)]
pub struct Quote {
    pub services: Vec<LineItem>,
    pub products: Vec<LineItem>,
    pub breakdown: BillBreakdown,
    pub discount: DiscountResolution,
}

impl Quote {
    /// Services then products, the order the bill was computed in
    pub fn line_items(&self) -> Vec<LineItem> {
        self.services
            .iter()
            .chain(&self.products)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub customer: String,
    pub services: Vec<String>,
    pub products: Vec<String>,
    pub discount: DiscountRequest,
    pub payment_mode: PaymentMode,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct GeneratedInvoice {
    pub number: String,
    pub customer_name: String,
    pub total: f64,
    pub pdf_path: PathBuf,
    pub discount: DiscountResolution,
}

/// Parse item input like "haircut:2" into (item_id, quantity)
fn parse_item_input(input: &str) -> Result<(&str, u32)> {
    let (item_id, qty_str) = input
        .split_once(':')
        .filter(|(id, qty)| !id.is_empty() && !qty.contains(':'))
        .ok_or_else(|| BillingError::InvalidItemFormat(input.to_string()))?;

    let quantity: u32 = qty_str.parse().map_err(|_| BillingError::InvalidQuantity {
        item: item_id.to_string(),
        qty: qty_str.to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if quantity == 0 {
        return Err(BillingError::InvalidQuantity {
            item: item_id.to_string(),
            qty: qty_str.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok((item_id, quantity))
}

fn build_lines(
    inputs: &[String],
    catalog: &HashMap<String, CatalogItem>,
    kind: ItemKind,
) -> Result<Vec<LineItem>> {
    inputs
        .iter()
        .map(|input| {
            let (item_id, quantity) = parse_item_input(input)?;
            let item = catalog.get(item_id).ok_or_else(|| match kind {
                ItemKind::Service => BillingError::ServiceNotFound(item_id.to_string()),
                ItemKind::Product => BillingError::ProductNotFound(item_id.to_string()),
            })?;
            Ok(item.to_line_item(item_id, kind, quantity))
        })
        .collect()
}

fn load_cart(
    cfg_dir: &Path,
    services_input: &[String],
    products_input: &[String],
) -> Result<(Vec<LineItem>, Vec<LineItem>)> {
    if services_input.is_empty() && products_input.is_empty() {
        return Err(BillingError::NoItems);
    }

    // Only read the catalogs that are actually used
    let services = if services_input.is_empty() {
        Vec::new()
    } else {
        build_lines(services_input, &load_services(cfg_dir)?, ItemKind::Service)?
    };
    let products = if products_input.is_empty() {
        Vec::new()
    } else {
        build_lines(products_input, &load_products(cfg_dir)?, ItemKind::Product)?
    };

    Ok((services, products))
}

fn resolve_request(
    config: &Config,
    cfg_dir: &Path,
    request: &DiscountRequest,
) -> Result<DiscountResolution> {
    match request {
        DiscountRequest::None => Ok(DiscountResolution::applied(DiscountSpec::none())),
        DiscountRequest::Percentage(p) => Ok(DiscountResolution::applied(
            DiscountSpec::percentage(*p)?,
        )),
        // Resolver setup failures (a broken offers.toml) also bill at 0%
        DiscountRequest::Offer(code) => Ok(match resolver_for(config, cfg_dir) {
            Ok(resolver) => lookup_discount(resolver.as_ref(), code),
            Err(e) => resolve_discount(code, Err(e)),
        }),
    }
}

/// Members get their membership offer unless a discount was given
pub fn discount_request_for(request: &DiscountRequest, customer: &Customer) -> DiscountRequest {
    match (request, &customer.membership) {
        (DiscountRequest::None, Some(membership)) => DiscountRequest::Offer(membership.clone()),
        (other, _) => other.clone(),
    }
}

/// Rebuild the discount an invoice was billed with from its history entry
fn stored_discount(entry: &HistoryEntry) -> Result<DiscountSpec> {
    Ok(DiscountSpec {
        promo_code: entry.offer.clone(),
        ..DiscountSpec::percentage(entry.discount_percentage)?
    })
}

/// Sequence number for the next invoice; the counter restarts each year
pub fn next_invoice_seq(state: &State, year: u32) -> u32 {
    if state.counter.last_year == year {
        state.counter.last_number + 1
    } else {
        1
    }
}

fn record_invoice(state: &mut State, year: u32, seq: u32, entry: HistoryEntry) {
    state.counter.last_number = seq;
    state.counter.last_year = year;
    state.history.push(entry);
}

/// What to store in history for a written PDF: the bare file name when it
/// sits in the output directory, the absolute path otherwise
fn history_file(pdf_path: &Path, output_dir: &Path) -> Result<String> {
    if pdf_path.parent() == Some(output_dir) {
        if let Some(name) = pdf_path.file_name() {
            return Ok(name.to_string_lossy().into_owned());
        }
    }
    let absolute = if pdf_path.is_absolute() {
        pdf_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(pdf_path)
    };
    Ok(absolute.to_string_lossy().into_owned())
}

/// Compute a bill from catalog inputs without saving anything
pub fn quote_bill(
    cfg_dir: &Path,
    services_input: &[String],
    products_input: &[String],
    request: &DiscountRequest,
) -> Result<Quote> {
    let config = load_config(cfg_dir)?;
    let (services, products) = load_cart(cfg_dir, services_input, products_input)?;
    let discount = resolve_request(&config, cfg_dir, request)?;
    let breakdown = compute_bill(&services, &products, &discount.spec)?;

    debug!(
        lines = services.len() + products.len(),
        subtotal = breakdown.subtotal,
        final_amount = breakdown.final_amount,
        "quoted bill"
    );

    Ok(Quote {
        services,
        products,
        breakdown,
        discount,
    })
}

/// Format invoice number from template
pub fn format_invoice_number(format: &str, year: u32, seq: u32) -> String {
    format
        .replace("{year}", &year.to_string())
        .replace("{seq:04}", &format!("{:04}", seq))
        .replace("{seq:05}", &format!("{:05}", seq))
        .replace("{seq:03}", &format!("{:03}", seq))
}

fn display_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// Generate a new invoice: bill, number, PDF and history entry
pub fn generate_invoice(cfg_dir: &Path, request: &GenerateRequest) -> Result<GeneratedInvoice> {
    let config = load_config(cfg_dir)?;
    let customers = load_customers(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;

    let customer = customers
        .get(&request.customer)
        .ok_or_else(|| BillingError::CustomerNotFound(request.customer.clone()))?;

    let (services, products) = load_cart(cfg_dir, &request.services, &request.products)?;

    let discount_request = discount_request_for(&request.discount, customer);
    let discount = resolve_request(&config, cfg_dir, &discount_request)?;
    let breakdown = compute_bill(&services, &products, &discount.spec)?;

    let today = Local::now().date_naive();
    let current_year = today.year() as u32;
    let seq = next_invoice_seq(&state, current_year);
    let number = format_invoice_number(&config.invoice.number_format, current_year, seq);

    let line_items: Vec<LineItem> = services.iter().chain(&products).cloned().collect();
    let document = format_invoice(
        &breakdown,
        &line_items,
        Parties {
            buyer: Party::from(customer),
            seller: Party::from(&config.seller),
        },
        OrderMeta {
            number: number.clone(),
            date: display_date(today),
            payment_mode: request.payment_mode.to_string(),
            currency: config.invoice.currency.clone(),
            currency_symbol: config.invoice.currency_symbol.clone(),
            offer: discount.spec.promo_code.clone(),
        },
    )?;

    let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
    std::fs::create_dir_all(&output_dir)?;

    let pdf_path = request
        .output
        .clone()
        .unwrap_or_else(|| output_dir.join(format!("{}.pdf", number)));

    generate_pdf(&document, &pdf_path)?;

    let file = history_file(&pdf_path, &output_dir)?;
    record_invoice(
        &mut state,
        current_year,
        seq,
        HistoryEntry {
            number: number.clone(),
            customer: request.customer.clone(),
            date: today,
            total: breakdown.final_amount,
            file,
            services: request.services.clone(),
            products: request.products.clone(),
            discount_percentage: discount.spec.percentage,
            offer: discount.spec.promo_code.clone(),
            payment_mode: request.payment_mode,
        },
    );
    save_state(cfg_dir, &state)?;

    info!(%number, total = breakdown.final_amount, "generated invoice");

    Ok(GeneratedInvoice {
        number,
        customer_name: customer.name.clone(),
        total: breakdown.final_amount,
        pdf_path,
        discount,
    })
}

/// Regenerate an existing invoice from its stored inputs.
///
/// The stored discount percentage is reused as-is; offers are not looked
/// up again.
pub fn regenerate_invoice(cfg_dir: &Path, invoice_number: &str) -> Result<PathBuf> {
    let config = load_config(cfg_dir)?;
    let customers = load_customers(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;

    let entry_idx = state
        .history
        .iter()
        .position(|e| e.number == invoice_number)
        .ok_or_else(|| BillingError::InvoiceNotFound(invoice_number.to_string()))?;
    let entry = state.history[entry_idx].clone();

    let customer = customers
        .get(&entry.customer)
        .ok_or_else(|| BillingError::CustomerNotFound(entry.customer.clone()))?;

    let (services, products) = load_cart(cfg_dir, &entry.services, &entry.products)?;
    let discount = stored_discount(&entry)?;
    let breakdown = compute_bill(&services, &products, &discount)?;

    let line_items: Vec<LineItem> = services.iter().chain(&products).cloned().collect();
    let document = format_invoice(
        &breakdown,
        &line_items,
        Parties {
            buyer: Party::from(customer),
            seller: Party::from(&config.seller),
        },
        OrderMeta {
            number: entry.number.clone(),
            date: display_date(entry.date),
            payment_mode: entry.payment_mode.to_string(),
            currency: config.invoice.currency.clone(),
            currency_symbol: config.invoice.currency_symbol.clone(),
            offer: entry.offer.clone(),
        },
    )?;

    let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
    std::fs::create_dir_all(&output_dir)?;
    let pdf_path = output_dir.join(&entry.file);

    generate_pdf(&document, &pdf_path)?;

    if entry.total != breakdown.final_amount {
        info!(
            number = %entry.number,
            old = entry.total,
            new = breakdown.final_amount,
            "catalog prices changed, updating stored total"
        );
        state.history[entry_idx].total = breakdown.final_amount;
        save_state(cfg_dir, &state)?;
    }

    Ok(pdf_path)
}

/// Get the PDF path for an invoice
pub fn get_invoice_path(cfg_dir: &Path, invoice_number: &str) -> Result<PathBuf> {
    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let entry = state
        .history
        .iter()
        .find(|e| e.number == invoice_number)
        .ok_or_else(|| BillingError::InvoiceNotFound(invoice_number.to_string()))?;

    // Files written with --output are stored as absolute paths and win the join
    let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
    let pdf_path = output_dir.join(&entry.file);

    if !pdf_path.exists() {
        return Err(BillingError::InvoiceFileNotFound(pdf_path));
    }

    Ok(pdf_path)
}
