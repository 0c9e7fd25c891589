use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use super::OfferResolver;
use crate::bill::ResolvedOffer;
use crate::error::{BillingError, Result};

/// Resolves offers against `GET {api_url}/offers/{code}`
pub struct HttpOfferResolver {
    base_url: String,
    agent: Agent,
}

impl HttpOfferResolver {
    pub fn new(base_url: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(3)))
            .build()
            .into();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn offer_url(&self, code: &str) -> String {
        format!("{}/offers/{}", self.base_url, code.trim())
    }
}

impl OfferResolver for HttpOfferResolver {
    fn resolve(&self, code: &str) -> Result<ResolvedOffer> {
        let url = self.offer_url(code);
        debug!(%url, "looking up offer");

        let lookup_err = |reason: String| BillingError::OfferLookup {
            code: code.to_string(),
            reason,
        };

        let body: String = match self.agent.get(url.as_str()).call() {
            Ok(mut response) => response
                .body_mut()
                .read_to_string()
                .map_err(|e| lookup_err(e.to_string()))?,
            Err(ureq::Error::StatusCode(404)) => {
                return Err(BillingError::OfferNotFound(code.to_string()))
            }
            Err(e) => return Err(lookup_err(e.to_string())),
        };

        serde_json::from_str(&body).map_err(|e| lookup_err(format!("malformed response: {e}")))
    }
}
