use std::collections::HashMap;

use tracing::debug;

use super::OfferResolver;
use crate::bill::ResolvedOffer;
use crate::config::Offer;
use crate::error::{BillingError, Result};

/// Resolves offers from offers.toml
pub struct CatalogResolver {
    offers: HashMap<String, Offer>,
}

impl CatalogResolver {
    pub fn new(offers: HashMap<String, Offer>) -> Self {
        Self { offers }
    }

    fn find(&self, code: &str) -> Option<(&String, &Offer)> {
        self.offers
            .get_key_value(code)
            .or_else(|| {
                self.offers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(code))
            })
    }
}

impl OfferResolver for CatalogResolver {
    fn resolve(&self, code: &str) -> Result<ResolvedOffer> {
        let (key, offer) = self
            .find(code)
            .filter(|(_, offer)| offer.active)
            .ok_or_else(|| BillingError::OfferNotFound(code.to_string()))?;

        debug!(code = %key, kind = %offer.kind, "resolved offer from catalog");

        Ok(ResolvedOffer {
            discount_percentage: offer.percentage,
            discount_amount: offer.amount,
            promo_code: Some(key.clone()),
            offer_id: Some(offer.name.clone()),
        })
    }
}
