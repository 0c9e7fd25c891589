mod catalog;
mod http;

pub use catalog::CatalogResolver;
pub use http::HttpOfferResolver;

use std::path::Path;

use crate::bill::{resolve_discount, DiscountResolution, ResolvedOffer};
use crate::config::{load_offers, Config};
use crate::error::Result;

/// Turns a promo code or membership name into an offer
pub trait OfferResolver {
    fn resolve(&self, code: &str) -> Result<ResolvedOffer>;
}

/// Pick the remote resolver when an API is configured, offers.toml otherwise
pub fn resolver_for(config: &Config, cfg_dir: &Path) -> Result<Box<dyn OfferResolver>> {
    match &config.offers.api_url {
        Some(url) => Ok(Box::new(HttpOfferResolver::new(url))),
        None => Ok(Box::new(CatalogResolver::new(load_offers(cfg_dir)?))),
    }
}

/// Look up a code and fold the outcome into a discount (0% on any failure)
pub fn lookup_discount(resolver: &dyn OfferResolver, code: &str) -> DiscountResolution {
    resolve_discount(code, resolver.resolve(code))
}
