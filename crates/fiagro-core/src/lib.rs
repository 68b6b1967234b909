//! Quero FIAGROs core library.
//!
//! Scrapes price and yield data for Brazilian agribusiness funds from a
//! marketing site, reconciles it with the B3 fund registry, and keeps the
//! scraped list in a short-lived in-memory cache.
//!
//! The extraction engine ([`extract`]) and ticker helpers ([`ticker`]) are
//! pure and network-free; everything that talks to an upstream lives in
//! [`http_client`], [`fetcher`], and [`registry`].

pub mod cache;
pub mod catalogue;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod http_client;
pub mod registry;
pub mod ticker;
pub mod types;

pub use cache::{CacheEntry, ListCache};
pub use catalogue::{build_catalogue, merge_catalogue};
pub use error::{FiagroError, Result};
pub use extract::{parse_detail_page, parse_list_from_homepage};
pub use fetcher::{DetailFetcher, ListFetcher};
pub use http_client::HttpClient;
pub use registry::{RegistryClient, RegistryListing};
pub use ticker::{filter_by_tickers, parse_ticker_list, to_slug};
pub use types::{FundRecord, RegistryEntry, PLACEHOLDER, SECTOR};
