use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use billing::bill::{LineItem, TaxTreatment};
use billing::config::{
    config_dir, load_config, load_customers, load_offers, load_products, load_services,
    load_state, CatalogItem, PaymentMode, CONFIG_TEMPLATE, CUSTOMERS_TEMPLATE, OFFERS_TEMPLATE,
    InvoiceSettings, PRODUCTS_TEMPLATE, SERVICES_TEMPLATE,
};
use billing::error::{BillingError, Result};
use billing::invoice::{
    amount_in_words, format_invoice_number, generate_invoice, get_invoice_path, next_invoice_seq,
    quote_bill, regenerate_invoice, CurrencyWords, DiscountRequest, GenerateRequest,
};

#[derive(Parser)]
#[command(name = "billing")]
#[command(version, about = "Salon billing and GST tax invoices", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.billing)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// List configured services
    Services,

    /// List configured products
    Products,

    /// List configured customers
    Customers,

    /// List promo codes and memberships
    Offers,

    /// Compute a bill without saving it
    Quote {
        /// Services in format "service:quantity" (can be repeated)
        #[arg(short, long, value_name = "SERVICE:QTY")]
        service: Vec<String>,

        /// Products in format "product:quantity" (can be repeated)
        #[arg(short, long, value_name = "PRODUCT:QTY")]
        product: Vec<String>,

        /// Promo code or membership to apply
        #[arg(long, conflicts_with = "discount")]
        offer: Option<String>,

        /// Discount percentage (0-100)
        #[arg(short, long)]
        discount: Option<f64>,
    },

    /// Generate a new tax invoice
    Generate {
        /// Customer identifier from customers.toml
        #[arg(short, long)]
        customer: String,

        /// Services in format "service:quantity" (can be repeated)
        #[arg(short, long, value_name = "SERVICE:QTY")]
        service: Vec<String>,

        /// Products in format "product:quantity" (can be repeated)
        #[arg(short, long, value_name = "PRODUCT:QTY")]
        product: Vec<String>,

        /// Promo code or membership to apply
        #[arg(long, conflicts_with = "discount")]
        offer: Option<String>,

        /// Discount percentage (0-100)
        #[arg(short, long)]
        discount: Option<f64>,

        /// Payment mode: cash, card, upi or wallet
        #[arg(short = 'm', long, default_value = "cash")]
        payment_mode: PaymentMode,

        /// Custom output file path (default: output_dir/INV-XXXX.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// List generated invoices
    List {
        /// Number of invoices to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Open an invoice PDF
    Open {
        /// Invoice number or index from 'list' (e.g., 1 or INV-2026-0001)
        invoice: String,
    },

    /// Regenerate an invoice PDF from stored data
    Regenerate {
        /// Invoice number or index from 'list' (e.g., 1 or INV-2026-0001)
        invoice: String,

        /// Open regenerated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Show configuration summary and next invoice number
    Status,

    /// Spell out an amount in words
    Words {
        amount: f64,

        /// Currency code (INR uses lakh/crore grouping)
        #[arg(long, default_value = "INR")]
        currency: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "billing=debug" } else { "error" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Services => cmd_catalog(&cfg_dir, "services"),
        Commands::Products => cmd_catalog(&cfg_dir, "products"),
        Commands::Customers => cmd_customers(&cfg_dir),
        Commands::Offers => cmd_offers(&cfg_dir),
        Commands::Quote {
            service,
            product,
            offer,
            discount,
        } => cmd_quote(&cfg_dir, &service, &product, discount_request(offer, discount)),
        Commands::Generate {
            customer,
            service,
            product,
            offer,
            discount,
            payment_mode,
            output,
            open,
        } => cmd_generate(
            &cfg_dir,
            GenerateRequest {
                customer,
                services: service,
                products: product,
                discount: discount_request(offer, discount),
                payment_mode,
                output,
            },
            open,
        ),
        Commands::List { limit } => cmd_invoices(&cfg_dir, limit),
        Commands::Open { invoice } => cmd_open(&cfg_dir, &invoice),
        Commands::Regenerate { invoice, open } => cmd_regenerate(&cfg_dir, &invoice, open),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Words { amount, currency } => cmd_words(amount, &currency),
    }
}

fn discount_request(offer: Option<String>, discount: Option<f64>) -> DiscountRequest {
    match (offer, discount) {
        (Some(code), _) => DiscountRequest::Offer(code),
        (None, Some(percentage)) => DiscountRequest::Percentage(percentage),
        (None, None) => DiscountRequest::None,
    }
}

fn ensure_initialized(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(BillingError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok(())
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(BillingError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("customers.toml"), CUSTOMERS_TEMPLATE)?;
    fs::write(cfg_dir.join("services.toml"), SERVICES_TEMPLATE)?;
    fs::write(cfg_dir.join("products.toml"), PRODUCTS_TEMPLATE)?;
    fs::write(cfg_dir.join("offers.toml"), OFFERS_TEMPLATE)?;

    println!("Initialized billing config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your salon details:    $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Add your customers:         $EDITOR {}/customers.toml",
        cfg_dir.display()
    );
    println!(
        "  3. Set up services & products: $EDITOR {}/services.toml {}/products.toml",
        cfg_dir.display(),
        cfg_dir.display()
    );
    println!();
    println!("Then bill your first customer:");
    println!("  billing generate --customer <customer-id> --service <service>:<quantity>");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "GST")]
    gst: String,
}

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "MEMBERSHIP")]
    membership: String,
}

#[derive(Tabled)]
struct OfferRow {
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "DISCOUNT")]
    discount: String,
}

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ITEM")]
    name: String,
    #[tabled(rename = "QTY")]
    quantity: u32,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "GST")]
    gst: String,
    #[tabled(rename = "TAX")]
    tax: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "PAYMENT")]
    payment: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

/// Group digits with commas: 1,234,567 or, for Indian currencies, 12,34,567
fn format_grouped_int(value: u64, indian: bool) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);

    for (i, ch) in digits.chars().rev().enumerate() {
        let boundary = if indian {
            i == 3 || (i > 3 && (i - 3) % 2 == 0)
        } else {
            i > 0 && i % 3 == 0
        };
        if boundary {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Money formatting for the configured currency
struct Money {
    symbol: String,
    indian: bool,
}

impl Money {
    fn new(settings: &InvoiceSettings) -> Self {
        Self {
            symbol: settings.currency_symbol.clone(),
            indian: CurrencyWords::for_code(&settings.currency).indian,
        }
    }

    /// Two decimal places with grouped whole part
    fn format(&self, value: f64) -> String {
        let rounded = format!("{:.2}", value.abs());
        let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
        let grouped = format_grouped_int(whole.parse::<u64>().unwrap_or(0), self.indian);
        let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
        format!("{sign}{}{grouped}.{frac}", self.symbol)
    }
}

fn gst_label(rate: f64, treatment: TaxTreatment) -> String {
    match treatment {
        TaxTreatment::Inclusive => format!("{rate}% incl."),
        TaxTreatment::Exclusive => format!("{rate}%"),
    }
}

fn catalog_rows(items: &HashMap<String, CatalogItem>, money: &Money) -> Vec<CatalogRow> {
    let mut sorted: Vec<_> = items.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    sorted
        .iter()
        .map(|(id, item)| CatalogRow {
            id: id.to_string(),
            name: item.name.clone(),
            code: item.code.clone(),
            price: money.format(item.price),
            gst: gst_label(item.gst_rate, item.tax),
        })
        .collect()
}

/// List services or products
fn cmd_catalog(cfg_dir: &Path, which: &str) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let items = if which == "services" {
        load_services(cfg_dir)?
    } else {
        load_products(cfg_dir)?
    };

    if items.is_empty() {
        println!("No {which} configured.");
        println!("Add {which} to: {}/{which}.toml", cfg_dir.display());
        return Ok(());
    }

    let rows = catalog_rows(&items, &Money::new(&config.invoice));
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// List configured customers
fn cmd_customers(cfg_dir: &Path) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let customers = load_customers(cfg_dir)?;

    if customers.is_empty() {
        println!("No customers configured.");
        println!("Add customers to: {}/customers.toml", cfg_dir.display());
        return Ok(());
    }

    let mut sorted: Vec<_> = customers.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let rows: Vec<CustomerRow> = sorted
        .iter()
        .map(|(id, customer)| CustomerRow {
            id: id.to_string(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            membership: customer.membership.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// List promo codes and memberships from offers.toml
fn cmd_offers(cfg_dir: &Path) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let offers = load_offers(cfg_dir)?;
    let money = Money::new(&config.invoice);

    if let Some(url) = &config.offers.api_url {
        println!("Offers are resolved remotely from: {url}");
    }

    if offers.is_empty() {
        println!("No offers configured.");
        return Ok(());
    }

    let mut sorted: Vec<_> = offers.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let rows: Vec<OfferRow> = sorted
        .iter()
        .map(|(code, offer)| OfferRow {
            code: code.to_string(),
            name: offer.name.clone(),
            kind: if offer.active {
                offer.kind.to_string()
            } else {
                format!("{} (inactive)", offer.kind)
            },
            discount: match (offer.percentage, offer.amount) {
                (Some(p), _) => format!("{p}%"),
                (None, Some(a)) => {
                    format!("{} (not applied)", money.format(a))
                }
                (None, None) => "-".to_string(),
            },
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

fn bill_rows(items: &[LineItem], percentage: f64, money: &Money) -> Vec<BillRow> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let tax = billing::bill::item_tax(item, percentage);
            BillRow {
                index: idx + 1,
                name: item.name.clone(),
                quantity: item.quantity,
                rate: money.format(item.unit_price),
                gst: gst_label(item.gst_rate, item.tax_treatment),
                tax: money.format(tax.gst),
                total: money.format(tax.net_total),
            }
        })
        .collect()
}

/// Compute and print a bill without saving it
fn cmd_quote(
    cfg_dir: &Path,
    services: &[String],
    products: &[String],
    request: DiscountRequest,
) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let quote = quote_bill(cfg_dir, services, products, &request)?;

    if let Some(failure) = &quote.discount.failure {
        eprintln!("Note: {failure}. Billing without discount.");
    }

    let money = Money::new(&config.invoice);
    let bill = &quote.breakdown;
    let rows = bill_rows(&quote.line_items(), bill.discount_percentage, &money);

    println!("Bill Summary");
    println!("{}", "-".repeat(50));
    println!("{}", Table::new(rows).with(Style::rounded()));
    println!("Subtotal:        {}", money.format(bill.subtotal));
    if bill.discount_percentage > 0.0 {
        let label = format!("Discount ({}%):", bill.discount_percentage);
        println!("{label:<17}-{}", money.format(bill.discount_amount));
    }
    println!("Taxable value:   {}", money.format(bill.taxable_value));
    println!("CGST:            {}", money.format(bill.cgst()));
    println!("SGST:            {}", money.format(bill.sgst()));
    if bill.inclusive.total > 0.0 {
        println!(
            "GST in prices:   {}",
            money.format(bill.inclusive.total)
        );
    }
    println!("Total:           {}", money.format(bill.final_amount));
    println!(
        "In words:        {}",
        amount_in_words(bill.final_amount, &CurrencyWords::for_code(&config.invoice.currency))?
    );

    Ok(())
}

/// Generate a new invoice
fn cmd_generate(cfg_dir: &Path, request: GenerateRequest, open: bool) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    if request.services.is_empty() && request.products.is_empty() {
        return Err(BillingError::NoItems);
    }

    let config = load_config(cfg_dir)?;
    let generated = generate_invoice(cfg_dir, &request)?;

    if let Some(failure) = &generated.discount.failure {
        eprintln!("Note: {failure}. Billed without discount.");
    }

    let money = Money::new(&config.invoice);
    println!("Generated {}", generated.number);
    println!("  Customer: {}", generated.customer_name);
    if let Some(code) = &generated.discount.spec.promo_code {
        println!(
            "  Offer:    {} ({}%)",
            code, generated.discount.spec.percentage
        );
    }
    println!("  Total:    {}", money.format(generated.total));
    println!("  Saved:    {}", generated.pdf_path.display());

    if open {
        open_path(&generated.pdf_path)?;
    }
    Ok(())
}

/// List generated invoices
fn cmd_invoices(cfg_dir: &Path, limit: Option<usize>) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    if state.history.is_empty() {
        println!("No invoices generated yet.");
        return Ok(());
    }

    let invoices: Vec<_> = state.history.iter().rev().enumerate().collect();
    let invoices = match limit {
        Some(n) => &invoices[..n.min(invoices.len())],
        None => &invoices[..],
    };

    let money = Money::new(&config.invoice);
    let rows: Vec<InvoiceRow> = invoices
        .iter()
        .map(|(idx, entry)| InvoiceRow {
            index: idx + 1,
            number: entry.number.clone(),
            date: entry.date.to_string(),
            customer: entry.customer.clone(),
            payment: entry.payment_mode.to_string(),
            total: money.format(entry.total),
        })
        .collect();

    let shown_total: f64 = invoices.iter().map(|(_, entry)| entry.total).sum();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    println!();
    println!(
        "Total: {} invoices, {} billed in shown rows",
        state.history.len(),
        money.format(shown_total)
    );
    println!("Use index number with open/regenerate (e.g., 'billing open 1')");

    Ok(())
}

/// Resolve an invoice reference to the actual invoice number.
/// Accepts either an index (1-based) from 'list' or the full invoice number.
fn resolve_invoice_number(cfg_dir: &Path, reference: &str) -> Result<String> {
    let state = load_state(cfg_dir)?;

    if let Ok(idx) = reference.parse::<usize>() {
        // Invoices are displayed newest first, 1-indexed
        let invoices: Vec<_> = state.history.iter().rev().collect();
        if idx == 0 || idx > invoices.len() {
            return Err(BillingError::InvalidInvoiceIndex(reference.to_string()));
        }
        return Ok(invoices[idx - 1].number.clone());
    }

    if state.history.iter().any(|e| e.number == reference) {
        Ok(reference.to_string())
    } else {
        Err(BillingError::InvoiceNotFound(reference.to_string()))
    }
}

/// Open an invoice PDF
fn cmd_open(cfg_dir: &Path, invoice_ref: &str) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let invoice_number = resolve_invoice_number(cfg_dir, invoice_ref)?;
    let pdf_path = get_invoice_path(cfg_dir, &invoice_number)?;

    open_path(&pdf_path)?;

    println!("Opened {}", pdf_path.display());
    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(pdf_path)
            .spawn()?;
    }
    Ok(())
}

/// Regenerate an invoice PDF
fn cmd_regenerate(cfg_dir: &Path, invoice_ref: &str, open: bool) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let invoice_number = resolve_invoice_number(cfg_dir, invoice_ref)?;
    let pdf_path = regenerate_invoice(cfg_dir, &invoice_number)?;
    if open {
        open_path(&pdf_path)?;
    }

    println!("Regenerated {}", invoice_number);
    println!("  Saved: {}", pdf_path.display());

    Ok(())
}

/// Show configuration summary
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let customers = load_customers(cfg_dir)?;
    let services = load_services(cfg_dir)?;
    let products = load_products(cfg_dir)?;
    let offers = load_offers(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let money = Money::new(&config.invoice);
    let current_year = chrono::Local::now().year() as u32;
    let next_seq = next_invoice_seq(&state, current_year);
    let next_number = format_invoice_number(&config.invoice.number_format, current_year, next_seq);

    println!("Billing Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Salon:            {}", config.seller.name);
    println!("Currency:         {}", config.invoice.currency);
    println!("Customers:        {}", customers.len());
    println!("Services:         {}", services.len());
    println!("Products:         {}", products.len());
    match &config.offers.api_url {
        Some(url) => println!("Offers:           remote ({url})"),
        None => println!("Offers:           {}", offers.len()),
    }
    println!("Next invoice:     {}", next_number);

    if !state.history.is_empty() {
        println!();
        println!("Recent invoices:");
        for entry in state.history.iter().rev().take(5) {
            println!(
                "  {} - {} - {}",
                entry.number,
                entry.customer,
                money.format(entry.total)
            );
        }
    }

    Ok(())
}

/// Print an amount in words
fn cmd_words(amount: f64, currency: &str) -> Result<()> {
    println!("{}", amount_in_words(amount, &CurrencyWords::for_code(currency))?);
    Ok(())
}
