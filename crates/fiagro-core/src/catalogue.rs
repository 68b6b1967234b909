//! Catalogue merge: registry identities joined with scraped market data.

use crate::error::{FiagroError, Result};
use crate::fetcher::ListFetcher;
use crate::registry::RegistryClient;
use crate::ticker::base_acronym;
use crate::types::{FundRecord, RegistryEntry};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// How many registry acronyms are sent to the list query.
pub const CATALOGUE_QUERY_LIMIT: usize = 25;

/// One record per distinct registry acronym, in registry order.
///
/// A scraped record matching the acronym (with or without the `11` suffix)
/// is used as-is; funds the site does not list get a placeholder record
/// named after the registry entry.
pub fn merge_catalogue(registry: &[RegistryEntry], records: &[FundRecord]) -> Vec<FundRecord> {
    let mut by_base: HashMap<&str, &FundRecord> = HashMap::new();
    for r in records {
        by_base.entry(base_acronym(&r.ticker)).or_insert(r);
    }

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(registry.len());
    for entry in registry {
        let acronym = entry.acronym.trim().to_uppercase();
        if acronym.is_empty() || !seen.insert(acronym.clone()) {
            continue;
        }
        let found = by_base.get(base_acronym(&acronym)).copied();
        match found {
            Some(record) => out.push(record.clone()),
            None => out.push(FundRecord::placeholder(acronym, entry.display_name())),
        }
    }
    out
}

/// Fetch the registry and the list, then merge them.
///
/// Registry failures are returned. An upstream failure on the list side
/// degrades to a catalogue of placeholder records.
pub async fn build_catalogue(registry: &RegistryClient, lists: &ListFetcher) -> Result<Vec<FundRecord>> {
    let listing = registry.fetch().await?;
    let acronyms: Vec<String> = listing
        .acronyms()
        .into_iter()
        .take(CATALOGUE_QUERY_LIMIT)
        .collect();

    let scraped = if acronyms.is_empty() {
        Vec::new()
    } else {
        match lists.fetch_by_tickers(&acronyms).await {
            Ok(records) => records,
            Err(err @ (FiagroError::UpstreamUnavailable { .. } | FiagroError::UpstreamMalformed(_))) => {
                warn!("fund list unavailable, serving registry placeholders: {err}");
                Vec::new()
            }
            Err(err) => return Err(err),
        }
    };

    let catalogue = merge_catalogue(&listing.entries, &scraped);
    debug!(
        "catalogue: {} funds, {} priced",
        catalogue.len(),
        catalogue.iter().filter(|r| r.has_price()).count()
    );
    Ok(catalogue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(acronym: &str, trading: &str) -> RegistryEntry {
        RegistryEntry {
            acronym: acronym.to_string(),
            fund_name: format!("{acronym} Fund"),
            trading_name: trading.to_string(),
        }
    }

    fn scraped(ticker: &str, price: &str) -> FundRecord {
        let mut r = FundRecord::placeholder(ticker, ticker);
        r.price = price.to_string();
        r
    }

    #[test]
    fn test_merge_prefers_scraped_record() {
        let registry = vec![entry("FGAA", "FIAGRO AGRO"), entry("SNAG", "SUNO AGRO")];
        let records = vec![scraped("SNAG11", "8.50"), scraped("FGAA11", "9.85")];
        let out = merge_catalogue(&registry, &records);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].ticker, "FGAA11");
        assert_eq!(out[0].price, "9.85");
        assert_eq!(out[1].ticker, "SNAG11");
    }

    #[test]
    fn test_merge_fills_missing_with_placeholder() {
        let registry = vec![entry("rzag", ""), entry("FGAA", "FIAGRO AGRO")];
        let out = merge_catalogue(&registry, &[]);
        assert_eq!(out[0].ticker, "RZAG");
        assert_eq!(out[0].name, "rzag Fund");
        assert!(!out[0].has_price());
        assert_eq!(out[1].name, "FIAGRO AGRO");
    }

    #[test]
    fn test_merge_skips_blank_and_duplicate_acronyms() {
        let registry = vec![entry("", "X"), entry("FGAA", "A"), entry("fgaa", "B")];
        let out = merge_catalogue(&registry, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "A");
    }

    #[test]
    fn test_merge_accepts_suffixed_registry_acronym() {
        let registry = vec![entry("FGAA11", "")];
        let out = merge_catalogue(&registry, &[scraped("FGAA11", "9.85")]);
        assert_eq!(out[0].price, "9.85");
    }
}
