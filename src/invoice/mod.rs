mod formatter;
mod generator;
mod words;

pub use formatter::{
    format_invoice, InvoiceDocument, InvoiceRow, InvoiceTotals, OrderMeta, Parties, Party,
};
pub use generator::{
    discount_request_for, format_invoice_number, generate_invoice, get_invoice_path,
    next_invoice_seq, quote_bill, regenerate_invoice, DiscountRequest, GenerateRequest, GeneratedInvoice, Quote,
};
pub use words::{amount_in_words, number_in_words, CurrencyWords, MAX_WORDS_AMOUNT};
