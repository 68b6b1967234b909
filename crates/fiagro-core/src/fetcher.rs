//! Network-facing fetchers for the marketing site.
//!
//! [`ListFetcher`] serves the homepage list through a [`ListCache`];
//! [`DetailFetcher`] fetches one fund page per call with no caching.

use crate::cache::{CacheEntry, ListCache};
use crate::error::{FiagroError, Result};
use crate::extract::{parse_detail_page, parse_list_from_homepage};
use crate::http_client::{HttpClient, ACCEPT_HTML};
use crate::ticker::{filter_by_tickers, is_valid_ticker, to_slug};
use crate::types::FundRecord;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Marketing site root.
pub const DEFAULT_SITE_URL: &str = "https://fiagro.com.br/";

pub const LIST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DETAIL_TIMEOUT: Duration = Duration::from_secs(15);

/// Homepage bodies shorter than this are error or interstitial pages.
pub const MIN_LIST_BODY_CHARS: usize = 1000;
/// Detail bodies shorter than this mean the fund page does not exist.
pub const MIN_DETAIL_BODY_CHARS: usize = 500;

/// Parse a site root, forcing a trailing slash so slugs join beneath it.
pub fn parse_site_url(raw: &str) -> Result<Url> {
    let mut s = raw.trim().to_string();
    if !s.ends_with('/') {
        s.push('/');
    }
    Url::parse(&s).map_err(|e| FiagroError::InvalidInput(format!("invalid site URL {raw:?}: {e}")))
}

/// Fetches and caches the full homepage list.
///
/// Concurrent callers that miss the cache at the same time each fetch the
/// homepage; the last writer's snapshot wins.
#[derive(Clone)]
pub struct ListFetcher {
    http: HttpClient,
    site_url: Url,
    cache: Arc<ListCache>,
}

impl ListFetcher {
    pub fn new(http: HttpClient, site_url: Url, cache: Arc<ListCache>) -> Self {
        Self {
            http,
            site_url,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<ListCache> {
        &self.cache
    }

    /// The full parsed list, from cache when fresh.
    pub async fn fetch_all(&self) -> Result<Arc<CacheEntry>> {
        if let Some(entry) = self.cache.get_fresh().await {
            debug!(
                "list cache hit ({} funds, captured {})",
                entry.records().len(),
                entry.captured_at()
            );
            return Ok(entry);
        }

        debug!("list cache miss");
        let records = self.fetch_uncached().await?;
        Ok(self.cache.replace(records).await)
    }

    /// Records matching `tickers`, in homepage order.
    pub async fn fetch_by_tickers<S: AsRef<str>>(&self, tickers: &[S]) -> Result<Vec<FundRecord>> {
        if tickers.iter().all(|t| t.as_ref().trim().is_empty()) {
            return Err(FiagroError::InvalidInput(
                "at least one ticker is required".to_string(),
            ));
        }
        let entry = self.fetch_all().await?;
        Ok(filter_by_tickers(entry.records(), tickers))
    }

    async fn fetch_uncached(&self) -> Result<Vec<FundRecord>> {
        info!("fetching fund list from {}", self.site_url);
        let resp = self
            .http
            .get_ok(self.site_url.as_str(), ACCEPT_HTML, LIST_TIMEOUT)
            .await?;

        let chars = resp.body.chars().count();
        if chars < MIN_LIST_BODY_CHARS {
            warn!("homepage body too short ({chars} chars), rejecting");
            return Err(FiagroError::UpstreamMalformed(format!(
                "homepage body has {chars} characters, expected at least {MIN_LIST_BODY_CHARS}"
            )));
        }

        let records = parse_list_from_homepage(&resp.body);
        info!("parsed {} funds from {}", records.len(), resp.final_url);
        Ok(records)
    }
}

/// Fetches a single fund's detail page on demand.
#[derive(Clone)]
pub struct DetailFetcher {
    http: HttpClient,
    site_url: Url,
}

impl DetailFetcher {
    pub fn new(http: HttpClient, site_url: Url) -> Self {
        Self { http, site_url }
    }

    /// Detail-page URL for `ticker`, e.g. `https://fiagro.com.br/fgaa11/`.
    pub fn detail_url(&self, ticker: &str) -> Result<Url> {
        if !is_valid_ticker(ticker) {
            return Err(FiagroError::InvalidInput(format!(
                "ticker must be a non-empty alphanumeric code, got {ticker:?}"
            )));
        }
        let slug = to_slug(ticker);
        self.site_url
            .join(&format!("{slug}/"))
            .map_err(|e| FiagroError::InvalidInput(format!("cannot build URL for {ticker:?}: {e}")))
    }

    pub async fn fetch(&self, ticker: &str) -> Result<FundRecord> {
        let url = self.detail_url(ticker)?;
        info!("fetching fund detail from {url}");

        let resp = self.http.get(url.as_str(), ACCEPT_HTML, DETAIL_TIMEOUT).await?;
        if resp.status == 404 {
            return Err(FiagroError::FundNotFound(ticker.trim().to_uppercase()));
        }
        if !resp.is_success() {
            return Err(FiagroError::unavailable(format!(
                "{url} returned status {}",
                resp.status
            )));
        }

        let chars = resp.body.chars().count();
        if chars < MIN_DETAIL_BODY_CHARS {
            warn!("detail body for {ticker} too short ({chars} chars)");
            return Err(FiagroError::FundNotFound(ticker.trim().to_uppercase()));
        }

        Ok(parse_detail_page(&resp.body, ticker))
    }
}
