//! Data model shared by the extraction engine, fetchers, and REST surface.

use serde::{Deserialize, Deserializer, Serialize};

/// Stands in for any field that could not be scraped.
///
/// A single em dash: never produced by a numeric capture, so it cannot be
/// mistaken for a value.
pub const PLACEHOLDER: &str = "\u{2014}";

/// Sector classification carried by every record.
pub const SECTOR: &str = "Fiagro";

/// One fund as scraped from the marketing site.
///
/// Numeric fields are kept as formatted strings with `.` as the decimal
/// separator, or [`PLACEHOLDER`] when the source did not expose them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRecord {
    /// Upper-case ticker, e.g. `FGAA11`.
    pub ticker: String,
    /// Trading name, at most [`FundRecord::MAX_NAME_CHARS`] characters.
    pub name: String,
    pub price: String,
    /// Percentage without the `%` sign.
    pub dividend_yield: String,
    /// Only populated by detail-page parsing.
    pub price_to_book_ratio: String,
    /// Only populated by detail-page parsing. Kept verbatim, thousand
    /// separators included.
    pub net_assets: String,
    /// Only populated by detail-page parsing.
    pub last_dividend: String,
    pub sector: String,
}

impl FundRecord {
    /// Upper bound on the scraped display name.
    pub const MAX_NAME_CHARS: usize = 100;

    /// A record with every data field set to the placeholder.
    pub fn placeholder(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            price: PLACEHOLDER.to_string(),
            dividend_yield: PLACEHOLDER.to_string(),
            price_to_book_ratio: PLACEHOLDER.to_string(),
            net_assets: PLACEHOLDER.to_string(),
            last_dividend: PLACEHOLDER.to_string(),
            sector: SECTOR.to_string(),
        }
    }

    /// Whether a scraped price is available.
    pub fn has_price(&self) -> bool {
        !is_placeholder(&self.price)
    }
}

/// True when `value` is the "not found" sentinel.
pub fn is_placeholder(value: &str) -> bool {
    value == PLACEHOLDER
}

/// Fund identity from the B3 registry. Carries no market data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryEntry {
    /// Base code without the `11` suffix, e.g. `FGAA`.
    #[serde(deserialize_with = "null_as_empty")]
    pub acronym: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub fund_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub trading_name: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

impl RegistryEntry {
    /// Preferred display name: trading name, then fund name, then acronym.
    pub fn display_name(&self) -> String {
        [&self.trading_name, &self.fund_name, &self.acronym]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}
