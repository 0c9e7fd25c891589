use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    Promo,
    Membership,
}

impl std::fmt::Display for OfferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferKind::Promo => write!(f, "promo"),
            OfferKind::Membership => write!(f, "membership"),
        }
    }
}

/// An entry in offers.toml
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Offer {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: OfferKind,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_kind() -> OfferKind {
    OfferKind::Promo
}

fn default_active() -> bool {
    true
}
