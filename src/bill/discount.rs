use serde::{Deserialize, Serialize};
use tracing::warn;

use super::calculator::ensure_percent;
use crate::error::Result;

/// Percentage discount applied uniformly to every line
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscountSpec {
    pub percentage: f64,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub offer_id: Option<String>,
}

impl DiscountSpec {
    pub fn none() -> Self {
        Self::default()
    }

    /// A manually entered percentage; out of range is an error
    pub fn percentage(percentage: f64) -> Result<Self> {
        let spec = Self {
            percentage,
            ..Self::default()
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_percent("discount.percentage", self.percentage)
    }
}

/// What an offer lookup hands back (promo code, offer or membership)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOffer {
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub offer_id: Option<String>,
}

/// Discount to bill with, plus why the lookup fell back to 0% if it did
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountResolution {
    pub spec: DiscountSpec,
    pub failure: Option<String>,
}

impl DiscountResolution {
    pub fn applied(spec: DiscountSpec) -> Self {
        Self {
            spec,
            failure: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.failure.is_none()
    }

    fn fallback(code: &str, reason: String) -> Self {
        warn!(code, %reason, "offer not applied, billing without discount");
        Self {
            spec: DiscountSpec::none(),
            failure: Some(format!("Offer '{code}' could not be applied: {reason}")),
        }
    }
}

/// Turn an offer lookup outcome into a discount, failing closed to 0%.
///
/// The percentage is checked again here even though resolvers should only
/// return 0..=100. Fixed-amount offers are not spread across lines.
pub fn resolve_discount(code: &str, outcome: Result<ResolvedOffer>) -> DiscountResolution {
    let offer = match outcome {
        Ok(offer) => offer,
        Err(e) => return DiscountResolution::fallback(code, e.to_string()),
    };

    match offer.discount_percentage {
        Some(percentage) if ensure_percent("discountPercentage", percentage).is_ok() => {
            DiscountResolution::applied(DiscountSpec {
                percentage,
                promo_code: offer.promo_code.or_else(|| Some(code.to_string())),
                offer_id: offer.offer_id,
            })
        }
        Some(percentage) => DiscountResolution::fallback(
            code,
            format!("percentage {percentage} is outside 0-100"),
        ),
        None if offer.discount_amount.is_some() => DiscountResolution::fallback(
            code,
            "fixed-amount discounts are not supported".to_string(),
        ),
        None => DiscountResolution::fallback(code, "no discount percentage returned".to_string()),
    }
}
