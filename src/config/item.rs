use serde::{Deserialize, Serialize};

use crate::bill::{ItemKind, LineItem, TaxTreatment};

/// A service or product as listed in services.toml / products.toml
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogItem {
    pub name: String,
    pub code: String,
    pub price: f64,
    #[serde(default)]
    pub gst_rate: f64,
    #[serde(default = "default_treatment")]
    pub tax: TaxTreatment,
}

fn default_treatment() -> TaxTreatment {
    TaxTreatment::Exclusive
}

impl CatalogItem {
    pub fn to_line_item(&self, id: &str, kind: ItemKind, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            name: self.name.clone(),
            code: self.code.clone(),
            kind,
            unit_price: self.price,
            quantity,
            gst_rate: self.gst_rate,
            tax_treatment: self.tax,
        }
    }
}
