use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{BillingError, Result};
use crate::invoice::InvoiceDocument;

/// Embedded Typst template for the GST tax invoice.
/// DATA_JSON_PATH is replaced with the JSON file holding the document.
const INVOICE_TEMPLATE: &str = r##"// Tax Invoice Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 1.8cm, right: 1.8cm),
)

#set text(font: "Helvetica", size: 9pt)

#let fmt-int(digits) = {
  let len = digits.len()
  let out = ""
  for (i, digit) in digits.clusters().enumerate() {
    if i > 0 and calc.rem(len - i, 3) == 0 {
      out += ","
    }
    out += digit
  }
  out
}

#let fmt-money(amount) = {
  let parts = str(calc.round(amount, digits: 2)).split(".")
  let whole = fmt-int(parts.at(0))
  let frac = if parts.len() > 1 { parts.at(1) } else { "00" }
  let frac2 = if frac.len() == 1 { frac + "0" } else { frac }
  data.currency_symbol + whole + "." + frac2
}

#let party(p) = [
  #text(weight: "bold")[#p.name]
  #for line in p.address_lines [
    \ #line
  ]
  #if p.phone != none [
    \ Phone: #p.phone
  ]
  #if p.email != none [
    \ #p.email
  ]
  #if p.gstin != none [
    \ GSTIN: #p.gstin
  ]
]

// Header with seller info and invoice details
#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(size: 16pt, weight: "bold")[#data.seller.name]
    #v(0.3em)
    #for line in data.seller.address_lines [
      #line \
    ]
    #if data.seller.email != none [ #data.seller.email ]
    #if data.seller.phone != none [
      \ #data.seller.phone
    ]
    #if data.seller.gstin != none [
      \ *GSTIN:* #data.seller.gstin
    ]
  ],
  [
    #text(size: 20pt, weight: "bold")[TAX INVOICE]
    #v(0.5em)
    #table(
      columns: (auto, auto),
      stroke: none,
      align: (right, left),
      inset: 2pt,
      [*Invoice \#:*], [#data.number],
      [*Date:*], [#data.date],
      [*Payment:*], [#data.payment_mode],
      ..if data.offer != none { ([*Offer:*], [#data.offer]) } else { () },
    )
  ]
)

#v(1em)
#line(length: 100%, stroke: 0.5pt + gray)
#v(1em)

#text(weight: "bold", size: 10pt)[Bill To:]
#v(0.3em)
#party(data.buyer)

#v(1.5em)

// Line items table
#table(
  columns: (auto, 1fr, auto, auto, auto, auto, auto, auto, auto, auto),
  align: (center, left, right, right, right, right, right, right, right, right),
  stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else if y > 0 { (bottom: 0.5pt + gray) },
  inset: 5pt,
  fill: (x, y) => if y == 0 { luma(240) } else { none },

  [*\#*], [*Item*], [*Qty*], [*Rate*], [*Disc.*], [*Taxable*], [*GST*], [*CGST*], [*SGST*], [*Total*],

  ..data.line_items.map(row => (
    str(row.index),
    [#row.name #text(size: 7pt, fill: gray)[#row.code]],
    str(row.quantity),
    [#fmt-money(row.unit_price)],
    [#fmt-money(row.discount)],
    [#fmt-money(row.taxable_value)],
    [#str(row.gst_rate)% #if row.tax_treatment == "inclusive" [(incl.)]],
    [#fmt-money(row.cgst)],
    [#fmt-money(row.sgst)],
    [#fmt-money(row.net_total)],
  )).flatten()
)

#v(1em)

// Totals
#align(right)[
  #table(
    columns: (auto, auto),
    stroke: none,
    align: (right, right),
    inset: 5pt,

    [Subtotal:], [#fmt-money(data.totals.subtotal)],

    ..if data.totals.discount > 0 {
      ([Discount (#str(data.totals.discount_percentage)%):], [- #fmt-money(data.totals.discount)])
    } else {
      ()
    },

    [Taxable value:], [#fmt-money(data.totals.taxable_amount)],
    [CGST:], [#fmt-money(data.totals.cgst)],
    [SGST:], [#fmt-money(data.totals.sgst)],

    ..if data.totals.inclusive_gst > 0 {
      ([#text(size: 8pt, fill: gray)[GST included in prices:]], [#text(size: 8pt, fill: gray)[#fmt-money(data.totals.inclusive_gst)]])
    } else {
      ()
    },

    table.hline(stroke: 1pt),
    [*Total:*], [*#fmt-money(data.totals.final_amount)*],
  )
]

#v(1em)
#text(weight: "bold")[Amount in words:] #data.amount_in_words

#v(2em)
#align(center)[#text(size: 8pt, fill: gray)[This is a computer generated invoice.]]
"##;

/// Generate the invoice PDF using the Typst CLI
pub fn generate_pdf(document: &InvoiceDocument, output_path: &Path) -> Result<()> {
    if Command::new("typst").arg("--version").output().is_err() {
        return Err(BillingError::TypstNotFound);
    }

    let temp_dir = std::env::temp_dir().join("billing-cli");
    std::fs::create_dir_all(&temp_dir)?;

    let json_data = serde_json::to_string(document)
        .map_err(|e| BillingError::PdfGeneration(e.to_string()))?;

    let json_path = temp_dir.join("data.json");
    std::fs::write(&json_path, &json_data)?;

    // data.json sits next to the template, so a relative path works under --root
    let template_content = INVOICE_TEMPLATE.replace("DATA_JSON_PATH", "data.json");
    let template_path = temp_dir.join("invoice.typ");
    std::fs::write(&template_path, &template_content)?;

    debug!(number = %document.number, output = %output_path.display(), "compiling invoice");

    let output = Command::new("typst")
        .arg("compile")
        .arg("--root")
        .arg(&temp_dir)
        .arg(&template_path)
        .arg(output_path)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BillingError::PdfGeneration(stderr.to_string()));
    }

    let _ = std::fs::remove_file(&template_path);
    let _ = std::fs::remove_file(&json_path);

    Ok(())
}
