//! HTML extraction engine.
//!
//! Turns raw marketing-site HTML into [`FundRecord`](crate::FundRecord)s
//! using the `scraper` crate for DOM traversal and `regex` against visible
//! text. Every entry point is pure and synchronous, and none of them can
//! fail: a field whose pattern is missing degrades to
//! [`PLACEHOLDER`](crate::PLACEHOLDER).
//!
//! `scraper::Html` is `!Send`, so documents are parsed and dropped inside
//! these functions and never held across an `.await`.

pub mod detail;
pub mod list;
mod text;

pub use detail::parse_detail_page;
pub use list::parse_list_from_homepage;
