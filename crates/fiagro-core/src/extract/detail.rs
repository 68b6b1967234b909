//! Detail-page parsing for a single fund.
//!
//! Runs five independent text searches over the page body. Accented letters
//! in the labels are matched with `.` so a page that renders `Cotação` with
//! mangled diacritics still parses.

use super::text::{capture_decimal, truncate_chars};
use crate::types::{FundRecord, SECTOR};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

struct DetailPatterns {
    price: Regex,
    dividend_yield: Regex,
    price_to_book: Regex,
    net_assets: Regex,
    last_dividend: Regex,
}

fn patterns() -> &'static DetailPatterns {
    static PATTERNS: OnceLock<DetailPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DetailPatterns {
        price: Regex::new(r"(?s)Cota..o atual.*?R\$\s*(\d[\d,]*)")
            .expect("current price regex is valid"),
        dividend_yield: Regex::new(r"Dividend Yield 12 Meses\s*(\d+[,.]?\d*)\s*%")
            .expect("dividend yield regex is valid"),
        price_to_book: Regex::new(r"Pre.o\s*/\s*Valor Patrimonial\s*\(P/VP\)\s*(\d+[,.]?\d*)")
            .expect("p/vp regex is valid"),
        net_assets: Regex::new(r"Patrim.nio L.quido\s*R\$\s*(\d[\d.,]*)")
            .expect("net assets regex is valid"),
        last_dividend: Regex::new(r".ltimo Rendimento\s*R\$\s*(\d[\d,]*)")
            .expect("last dividend regex is valid"),
    })
}

/// Parse a fund's detail page.
///
/// Never fails: any field whose label is absent becomes the placeholder.
/// The returned ticker is always the upper-cased `ticker` argument, and the
/// name is the first `<h1>` or, when that is empty, the ticker.
pub fn parse_detail_page(html: &str, ticker: &str) -> FundRecord {
    let document = Html::parse_document(html);
    let ticker = ticker.trim().to_uppercase();

    let body_sel = Selector::parse("body").expect("body selector is valid");
    let body_text: String = match document.select(&body_sel).next() {
        Some(body) => body.text().collect(),
        None => document.root_element().text().collect(),
    };

    let h1_sel = Selector::parse("h1").expect("h1 selector is valid");
    let heading = document
        .select(&h1_sel)
        .next()
        .map(|h| h.text().collect::<String>().trim().to_string())
        .unwrap_or_default();
    let name = if heading.is_empty() {
        ticker.clone()
    } else {
        truncate_chars(&heading, FundRecord::MAX_NAME_CHARS)
    };

    let p = patterns();
    FundRecord {
        price: capture_decimal(&p.price, &body_text),
        dividend_yield: capture_decimal(&p.dividend_yield, &body_text),
        price_to_book_ratio: capture_decimal(&p.price_to_book, &body_text),
        net_assets: capture_decimal(&p.net_assets, &body_text),
        last_dividend: capture_decimal(&p.last_dividend, &body_text),
        sector: SECTOR.to_string(),
        name,
        ticker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PLACEHOLDER;

    fn detail_html(name: &str, price: &str, dy: &str, pvp: &str, pl: &str, last: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
            <html><body>
              <h1>{name}</h1>
              <p>Cotação atual R$ {price}</p>
              <p>Dividend Yield 12 Meses {dy}%</p>
              <p>Preço / Valor Patrimonial (P/VP) {pvp}</p>
              <p>Patrimônio Líquido R$ {pl}</p>
              <p>Último Rendimento R$ {last}</p>
            </body></html>"#
        )
    }

    #[test]
    fn test_all_fields() {
        let html = detail_html("Fiagro Agro", "9,85", "14,20", "0,95", "250.000.000", "0,12");
        let r = parse_detail_page(&html, "fgaa");
        assert_eq!(r.ticker, "FGAA");
        assert_eq!(r.name, "Fiagro Agro");
        assert_eq!(r.price, "9.85");
        assert_eq!(r.dividend_yield, "14.20");
        assert_eq!(r.price_to_book_ratio, "0.95");
        assert_eq!(r.net_assets, "250.000.000");
        assert_eq!(r.last_dividend, "0.12");
        assert_eq!(r.sector, SECTOR);
    }

    #[test]
    fn test_net_assets_keeps_thousand_separators() {
        let html = detail_html("X", "1", "1", "1", "1.234.567,89", "1");
        let r = parse_detail_page(&html, "FGAA11");
        assert_eq!(r.net_assets, "1.234.567.89");
    }

    #[test]
    fn test_price_label_and_value_in_separate_nodes() {
        let html = r#"<html><body>
            <div><span>Cotação atual</span><div class="v"><small>em 18/10</small><strong>R$ 10,40</strong></div></div>
        </body></html>"#;
        assert_eq!(parse_detail_page(html, "SNAG11").price, "10.40");
    }

    #[test]
    fn test_mangled_diacritics_still_match() {
        let html = r#"<html><body>
            <p>Cota??o atual R$ 9,85</p>
            <p>Patrim?nio L?quido R$ 100</p>
            <p>?ltimo Rendimento R$ 0,10</p>
            <p>Pre?o / Valor Patrimonial (P/VP) 1,02</p>
        </body></html>"#;
        let r = parse_detail_page(html, "FGAA11");
        assert_eq!(r.price, "9.85");
        assert_eq!(r.net_assets, "100");
        assert_eq!(r.last_dividend, "0.10");
        assert_eq!(r.price_to_book_ratio, "1.02");
    }

    #[test]
    fn test_dot_decimal_yield() {
        let html = "<html><body><p>Dividend Yield 12 Meses 13.5 %</p></body></html>";
        assert_eq!(parse_detail_page(html, "FGAA11").dividend_yield, "13.5");
    }

    #[test]
    fn test_empty_h1_falls_back_to_ticker() {
        let r = parse_detail_page("<html><body><h1></h1></body></html>", "FGAA11");
        assert_eq!(r.name, "FGAA11");
        let r = parse_detail_page("<html><body><h1>   </h1></body></html>", "fgaa11");
        assert_eq!(r.name, "FGAA11");
    }

    #[test]
    fn test_missing_fields_are_placeholders() {
        let r = parse_detail_page("<html><body><h1>Fiagro Agro</h1></body></html>", "FGAA");
        assert_eq!(r.name, "Fiagro Agro");
        for field in [
            &r.price,
            &r.dividend_yield,
            &r.price_to_book_ratio,
            &r.net_assets,
            &r.last_dividend,
        ] {
            assert_eq!(field, PLACEHOLDER);
        }
    }

    #[test]
    fn test_garbage_input_never_panics() {
        let r = parse_detail_page("", "");
        assert_eq!(r.ticker, "");
        assert_eq!(r.price, PLACEHOLDER);
        let r = parse_detail_page("<h1>Cotação atual R$", "abc11");
        assert_eq!(r.name, "Cotação atual R$");
        assert_eq!(r.price, PLACEHOLDER);
    }
}
