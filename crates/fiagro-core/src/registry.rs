//! B3 fund registry client.
//!
//! The registry is the authoritative list of FIAGRO acronyms. Its payload is
//! passed through verbatim once it has been shape-checked, and is also
//! decoded into [`RegistryEntry`] values for catalogue building.

use crate::error::{FiagroError, Result};
use crate::http_client::{HttpClient, ACCEPT_JSON};
use crate::types::RegistryEntry;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// B3 listing of FIAGRO funds (first page, 120 per page, pt-BR).
pub const DEFAULT_REGISTRY_URL: &str = "https://sistemaswebb3-listados.b3.com.br/fundsListedProxy/Search/GetListFunds/eyJsYW5ndWFnZSI6InB0LWJyIiwidHlwZUZ1bmQiOiJGSUFHUk8iLCJwYWdlTnVtYmVyIjoxLCJwYWdlU2l6ZSI6MTIwLCJrZXl3b3JkIjoiIn0=";

pub const REGISTRY_TIMEOUT: Duration = Duration::from_secs(10);

/// A shape-checked registry payload.
#[derive(Debug, Clone)]
pub struct RegistryListing {
    /// The upstream JSON exactly as received.
    pub raw: Value,
    /// Decoded `results`, skipping items that are not objects.
    pub entries: Vec<RegistryEntry>,
}

impl RegistryListing {
    /// Validate a registry payload: it must be an object whose `results`
    /// field is an array.
    pub fn from_value(raw: Value) -> Result<Self> {
        let results = raw
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                FiagroError::UpstreamMalformed("registry payload has no `results` array".to_string())
            })?;

        let entries = results
            .iter()
            .filter_map(|item| match serde_json::from_value::<RegistryEntry>(item.clone()) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("skipping registry item: {e}");
                    None
                }
            })
            .collect();

        Ok(Self { raw, entries })
    }

    /// Non-empty, upper-cased acronyms in registry order.
    pub fn acronyms(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.acronym.trim().to_uppercase())
            .filter(|a| !a.is_empty())
            .collect()
    }
}

/// Fetches the registry listing.
#[derive(Clone)]
pub struct RegistryClient {
    http: HttpClient,
    url: String,
}

impl RegistryClient {
    pub fn new(http: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<RegistryListing> {
        info!("fetching fund registry");
        let resp = self.http.get_ok(&self.url, ACCEPT_JSON, REGISTRY_TIMEOUT).await?;

        let raw: Value = serde_json::from_str(&resp.body).map_err(|e| {
            FiagroError::UpstreamMalformed(format!("registry returned invalid JSON: {e}"))
        })?;

        let listing = RegistryListing::from_value(raw)?;
        info!("registry lists {} funds", listing.entries.len());
        Ok(listing)
    }
}
