//! Ticker normalization and reconciliation.
//!
//! The registry speaks in base acronyms (`FGAA`) while the marketing site
//! keys funds by full tickers (`FGAA11`). Everything here lets either form
//! find the same record.

use crate::types::FundRecord;
use std::collections::HashSet;

/// Numeric suffix carried by listed FIAGRO tickers.
pub const SUFFIX: &str = "11";

/// Path segment for a fund's detail page.
///
/// `"FGAA"` and `"FGAA11"` both become `"fgaa11"`. Inputs that are neither
/// suffixed nor a 4-letter acronym pass through lower-cased.
pub fn to_slug(ticker: &str) -> String {
    let t = ticker.trim().to_lowercase();
    if t.ends_with(SUFFIX) {
        return t;
    }
    if t.chars().count() == 4 && t.chars().all(|c| c.is_ascii_alphabetic()) {
        return format!("{t}{SUFFIX}");
    }
    t
}

/// The ticker with one trailing `11` removed.
pub fn base_acronym(ticker: &str) -> &str {
    ticker.strip_suffix(SUFFIX).unwrap_or(ticker)
}

/// The other form of `ticker`: suffix stripped if present, appended if not.
fn toggle_suffix(ticker: &str) -> String {
    match ticker.strip_suffix(SUFFIX) {
        Some(base) => base.to_string(),
        None => format!("{ticker}{SUFFIX}"),
    }
}

/// Upper-cased tickers plus their suffix-toggled counterparts.
pub fn expand_tickers<I, S>(tickers: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut expanded = HashSet::new();
    for raw in tickers {
        let t = raw.as_ref().trim().to_uppercase();
        if t.is_empty() {
            continue;
        }
        let other = toggle_suffix(&t);
        if !other.is_empty() {
            expanded.insert(other);
        }
        expanded.insert(t);
    }
    expanded
}

/// Records matching any requested ticker, suffixed or not, in list order.
///
/// An empty request returns nothing, so a missing query can never leak the
/// whole catalogue.
pub fn filter_by_tickers<S: AsRef<str>>(records: &[FundRecord], tickers: &[S]) -> Vec<FundRecord> {
    let expanded = expand_tickers(tickers);
    if expanded.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| expanded.contains(&r.ticker) || expanded.contains(base_acronym(&r.ticker)))
        .cloned()
        .collect()
}

/// Split a comma-separated query value into upper-cased tickers.
pub fn parse_ticker_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Whether `ticker` is safe to use as a detail-page path segment.
pub fn is_valid_ticker(ticker: &str) -> bool {
    let t = ticker.trim();
    !t.is_empty() && t.chars().all(|c| c.is_ascii_alphanumeric())
}
