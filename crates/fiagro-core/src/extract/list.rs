//! Homepage parsing: one [`FundRecord`] per fund card link.
//!
//! The homepage has no stable structured markup, so fund cards are found by
//! their links. Any `<a>` whose path is a bare ticker segment (`/fgaa11/`)
//! identifies a fund; its price and yield are read from the text of the
//! enclosing card, and its name from the link text itself.

use super::text::{capture_decimal, collapse_whitespace, truncate_chars};
use crate::types::{FundRecord, PLACEHOLDER, SECTOR};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Tags that may act as the visual card around a fund link.
const CARD_TAGS: &[&str] = &["div", "article", "li"];

struct ListPatterns {
    ticker_path: Regex,
    price: Regex,
    dividend_yield: Regex,
    name_yield_tail: Regex,
    name_price_tail: Regex,
}

fn patterns() -> &'static ListPatterns {
    static PATTERNS: OnceLock<ListPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ListPatterns {
        ticker_path: Regex::new(r"(?i)^/?([a-z0-9]+11)/?$").expect("ticker path regex is valid"),
        price: Regex::new(r"R\$\s*(\d[\d,]*)").expect("price regex is valid"),
        dividend_yield: Regex::new(r"DY\s*(\d[\d,]*)\s*%").expect("yield regex is valid"),
        name_yield_tail: Regex::new(r"(?i)DY\s*[\d,]+\s*%?.*").expect("yield tail regex is valid"),
        name_price_tail: Regex::new(r"(?i)R\$\s*[\d,]+.*").expect("price tail regex is valid"),
    })
}

/// Extract every fund listed on the marketing homepage.
///
/// Records come back in document order. A ticker linked more than once
/// (responsive layouts often render each card twice) keeps only its first
/// occurrence. HTML without fund links yields an empty list.
pub fn parse_list_from_homepage(html: &str) -> Vec<FundRecord> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse("a[href]").expect("link selector is valid");
    let p = patterns();

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for link in document.select(&link_sel) {
        let path = normalize_href(link.value().attr("href").unwrap_or(""));
        if path.is_empty() {
            continue;
        }
        let Some(caps) = p.ticker_path.captures(&path) else {
            continue;
        };
        let ticker = caps[1].to_ascii_uppercase();
        if !seen.insert(ticker.clone()) {
            continue;
        }

        let card_text: String = card_for(link).text().collect();
        let price = capture_decimal(&p.price, &card_text);
        let dividend_yield = capture_decimal(&p.dividend_yield, &card_text);

        let link_text: String = link.text().collect();
        let name = display_name(&link_text, &ticker);

        records.push(FundRecord {
            ticker,
            name,
            price,
            dividend_yield,
            price_to_book_ratio: PLACEHOLDER.to_string(),
            net_assets: PLACEHOLDER.to_string(),
            last_dividend: PLACEHOLDER.to_string(),
            sector: SECTOR.to_string(),
        });
    }

    tracing::debug!("parsed {} funds from homepage", records.len());
    records
}

/// Reduce an href to the path the ticker pattern is matched against.
///
/// Absolute URLs keep only their path; an absolute URL that fails to parse
/// yields an empty string so the link is skipped. Relative hrefs are matched
/// as written.
fn normalize_href(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http") {
        return Url::parse(raw)
            .map(|u| u.path().to_string())
            .unwrap_or_default();
    }
    raw.to_string()
}

/// The nearest classed block ancestor of `link`, else its parent.
fn card_for(link: ElementRef<'_>) -> ElementRef<'_> {
    link.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| {
            let v = el.value();
            CARD_TAGS.contains(&v.name()) && v.attr("class").is_some()
        })
        .or_else(|| link.parent().and_then(ElementRef::wrap))
        .unwrap_or(link)
}

/// Clean a link's text down to the fund's trading name.
fn display_name(link_text: &str, ticker: &str) -> String {
    let p = patterns();
    let text = collapse_whitespace(link_text);

    let ticker_re = Regex::new(&format!("(?i){}", regex::escape(ticker)))
        .expect("escaped ticker regex is valid");
    let text = ticker_re.replacen(&text, 1, "");
    let text = p.name_yield_tail.replacen(&text, 1, "");
    let text = p.name_price_tail.replacen(&text, 1, "");
    let text = collapse_whitespace(&text);

    if text.is_empty() {
        truncate_chars(ticker, FundRecord::MAX_NAME_CHARS)
    } else {
        truncate_chars(&text, FundRecord::MAX_NAME_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(ticker: &str, price: &str, dy: &str, name: &str) -> String {
        format!(
            r#"
            <div class="card-fundo">
              <a href="/{}/">
                {ticker} {name} R$ {price} DY {dy}%
              </a>
            </div>"#,
            ticker.to_lowercase()
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<!DOCTYPE html><html><body>{}</body></html>", cards.join("\n"))
    }

    #[test]
    fn test_single_card() {
        let html = page(&[card("FGAA11", "9,85", "14,20", "Fiagro Agro")]);
        let funds = parse_list_from_homepage(&html);
        assert_eq!(funds.len(), 1);
        let f = &funds[0];
        assert_eq!(f.ticker, "FGAA11");
        assert_eq!(f.price, "9.85");
        assert_eq!(f.dividend_yield, "14.20");
        assert_eq!(f.name, "Fiagro Agro");
        assert_eq!(f.sector, SECTOR);
        assert_eq!(f.price_to_book_ratio, PLACEHOLDER);
        assert_eq!(f.net_assets, PLACEHOLDER);
        assert_eq!(f.last_dividend, PLACEHOLDER);
    }

    #[test]
    fn test_inline_card_scenario() {
        let html = r#"<html><body><div class="card">
            <a href="/fgaa11/">FGAA11 Fiagro Agro R$ 9,85 DY 14,20%</a>
        </div></body></html>"#;
        let funds = parse_list_from_homepage(html);
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].ticker, "FGAA11");
        assert_eq!(funds[0].price, "9.85");
        assert_eq!(funds[0].dividend_yield, "14.20");
        assert_eq!(funds[0].name, "Fiagro Agro");
    }

    #[test]
    fn test_multiple_cards_keep_order() {
        let html = page(&[
            card("FGAA11", "9,85", "14,20", "Fiagro Agro"),
            card("SNAG11", "8,50", "12,30", "Suno Agro"),
        ]);
        let tickers: Vec<_> = parse_list_from_homepage(&html)
            .into_iter()
            .map(|f| f.ticker)
            .collect();
        assert_eq!(tickers, vec!["FGAA11", "SNAG11"]);
    }

    #[test]
    fn test_lowercase_ticker_is_uppercased() {
        let html = page(&[card("fgaa11", "9,85", "14,20", "Fiagro Agro")]);
        assert_eq!(parse_list_from_homepage(&html)[0].ticker, "FGAA11");
    }

    #[test]
    fn test_missing_price_uses_placeholder() {
        let html = r#"<html><body><div class="card">
            <a href="/fgaa11/">FGAA11 Fiagro Agro DY 14,20%</a>
        </div></body></html>"#;
        let funds = parse_list_from_homepage(html);
        assert_eq!(funds[0].price, PLACEHOLDER);
        assert_eq!(funds[0].dividend_yield, "14.20");
    }

    #[test]
    fn test_missing_yield_uses_placeholder() {
        let html = r#"<html><body><div class="card">
            <a href="/fgaa11/">FGAA11 Fiagro Agro R$ 9,85</a>
        </div></body></html>"#;
        let funds = parse_list_from_homepage(html);
        assert_eq!(funds[0].dividend_yield, PLACEHOLDER);
        assert_eq!(funds[0].price, "9.85");
        assert_eq!(funds[0].name, "Fiagro Agro");
    }

    #[test]
    fn test_price_outside_link_inside_card() {
        let html = r#"<html><body>
            <div class="fund-card">
              <a href="/snag11">SNAG11 Suno Agro</a>
              <span>R$ 10,02</span><span>DY 13,1%</span>
            </div>
        </body></html>"#;
        let funds = parse_list_from_homepage(html);
        assert_eq!(funds[0].ticker, "SNAG11");
        assert_eq!(funds[0].price, "10.02");
        assert_eq!(funds[0].dividend_yield, "13.1");
        assert_eq!(funds[0].name, "Suno Agro");
    }

    #[test]
    fn test_ignores_non_fund_links() {
        let html = r#"<html><body>
            <a href="/">Home</a>
            <a href="/sobre">Sobre</a>
            <a href="https://google.com">Google</a>
            <a href="">Empty</a>
            <div class="card"><a href="/fgaa11/">FGAA11 R$ 9,85 DY 14,20%</a></div>
        </body></html>"#;
        let funds = parse_list_from_homepage(html);
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].ticker, "FGAA11");
    }

    #[test]
    fn test_ignores_fund_sub_paths() {
        let html = r#"<html><body><div class="card">
            <a href="/fgaa11/relatorios">Relatórios</a>
            <a href="/fgaa11/">FGAA11 R$ 9,85 DY 14,20%</a>
            <a href="/fgaa11/documentos">Documentos</a>
        </div></body></html>"#;
        let funds = parse_list_from_homepage(html);
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].price, "9.85");
    }

    #[test]
    fn test_duplicate_cards_collapse() {
        let c = card("FGAA11", "9,85", "14,20", "Fiagro Agro");
        let html = page(&[c.clone(), c]);
        assert_eq!(parse_list_from_homepage(&html).len(), 1);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let html = page(&[
            card("FGAA11", "9,85", "14,20", "Fiagro Agro"),
            card("FGAA11", "1,00", "1,00", "Other"),
        ]);
        let funds = parse_list_from_homepage(&html);
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].price, "9.85");
        assert_eq!(funds[0].name, "Fiagro Agro");
    }

    #[test]
    fn test_absolute_urls_are_reduced_to_path() {
        let html = r#"<html><body>
            <div class="c"><a href="https://fiagro.com.br/rzag11/?ref=home">RZAG11 RBR Agro R$ 7,00</a></div>
            <div class="c"><a href="http://[bad">BAD11</a></div>
        </body></html>"#;
        let funds = parse_list_from_homepage(html);
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].ticker, "RZAG11");
        assert_eq!(funds[0].name, "RBR Agro");
    }

    #[test]
    fn test_no_class_falls_back_to_parent() {
        let html = r#"<html><body><section>
            <p><a href="/kncA11/">KNCA11 Kinea Agro</a> R$ 98,10 DY 12,00%</p>
        </section></body></html>"#;
        let funds = parse_list_from_homepage(html);
        assert_eq!(funds[0].ticker, "KNCA11");
        assert_eq!(funds[0].price, "98.10");
        assert_eq!(funds[0].name, "Kinea Agro");
    }

    #[test]
    fn test_name_falls_back_to_ticker() {
        let html = r#"<div class="c"><a href="/fgaa11/">fgaa11 R$ 9,85</a></div>"#;
        assert_eq!(parse_list_from_homepage(html)[0].name, "FGAA11");
    }

    #[test]
    fn test_name_is_truncated() {
        let long = "A".repeat(300);
        let html = format!(r#"<div class="c"><a href="/fgaa11/">FGAA11 {long}</a></div>"#);
        let funds = parse_list_from_homepage(&html);
        assert_eq!(funds[0].name.chars().count(), FundRecord::MAX_NAME_CHARS);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse_list_from_homepage("").is_empty());
        assert!(parse_list_from_homepage("<html><body><p>Sem fundos</p></body></html>").is_empty());
        assert!(parse_list_from_homepage("<<<a href=/x11 <div").len() <= 1);
    }

    #[test]
    fn test_relative_href_with_query_is_not_a_fund() {
        let html = r#"<div class="c"><a href="/fgaa11/?utm=x">FGAA11 R$ 9,85</a></div>
            <div class="c"><a href="/snag11/#cotacao">SNAG11 R$ 8,50</a></div>"#;
        assert!(parse_list_from_homepage(html).is_empty());
    }

    #[test]
    fn test_normalize_href() {
        assert_eq!(normalize_href("https://fiagro.com.br/fgaa11/"), "/fgaa11/");
        assert_eq!(normalize_href("/fgaa11/"), "/fgaa11/");
        assert_eq!(normalize_href("https://fiagro.com.br/fgaa11/?ref=home#top"), "/fgaa11/");
        assert_eq!(normalize_href("/fgaa11/#top"), "/fgaa11/#top");
        assert_eq!(normalize_href("http://[::1"), "");
    }
}
