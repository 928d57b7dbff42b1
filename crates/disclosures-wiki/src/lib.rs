#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/disclosures/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Wikipedia S&P 500 universe provider.
//!
//! This crate scrapes the constituent table of the "List of S&P 500
//! companies" page and implements the
//! [`UniverseProvider`] trait from `disclosures-core`.
//!
//! # Example
//!
//! ```no_run
//! use disclosures_core::UniverseProvider;
//! use disclosures_wiki::WikipediaProvider;
//!
//! # async fn example() -> disclosures_core::Result<()> {
//! let provider = WikipediaProvider::new();
//! let symbols = provider.universe("sp500").await?;
//! println!("Universe holds {} symbols", symbols.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use disclosures_core::{DisclosureError, DisclosureProvider, Result, Symbol, UniverseProvider};
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// Wikipedia page listing S&P 500 constituents.
const SP500_LIST_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// Timeout for page downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// One row of the constituent table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constituent {
    /// Ticker symbol, dots replaced with dashes.
    pub symbol: Symbol,
    /// Company name.
    pub name: String,
    /// Sector classification; `"Unknown"` when the row carries none.
    pub sector: String,
}

/// Wikipedia universe provider.
///
/// Implements [`UniverseProvider`] for the `"sp500"` universe.
#[derive(Debug)]
pub struct WikipediaProvider {
    client: reqwest::Client,
}

impl WikipediaProvider {
    /// Create a new Wikipedia provider with default settings.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Create a new Wikipedia provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the current S&P 500 constituent list.
    pub async fn sp500_constituents(&self) -> Result<Vec<Constituent>> {
        debug!("Fetching S&P 500 constituents from {}", SP500_LIST_URL);
        let response = self
            .client
            .get(SP500_LIST_URL)
            .send()
            .await
            .map_err(|e| DisclosureError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DisclosureError::Network(format!(
                "Failed to fetch constituent list: HTTP {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| DisclosureError::Network(e.to_string()))?;

        let constituents = parse_constituents(&html)?;
        debug!(constituents = constituents.len(), "constituent list fetched");
        Ok(constituents)
    }
}

impl Default for WikipediaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DisclosureProvider for WikipediaProvider {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    fn description(&self) -> &str {
        "Wikipedia S&P 500 constituent list for universe definitions"
    }
}

#[async_trait]
impl UniverseProvider for WikipediaProvider {
    async fn universe(&self, universe_id: &str) -> Result<Vec<Symbol>> {
        if universe_id != "sp500" {
            return Err(DisclosureError::NotSupported(format!(
                "Unknown universe: {}",
                universe_id
            )));
        }

        let constituents = self.sp500_constituents().await?;
        Ok(constituents.into_iter().map(|c| c.symbol).collect())
    }
}

/// Parses the constituent table out of the page HTML.
///
/// Rows need at least ticker, name, and one more cell; the sector sits in
/// the fourth cell when present. Header rows carry no `td` cells and are
/// skipped naturally.
fn parse_constituents(html: &str) -> Result<Vec<Constituent>> {
    let table_selector =
        Selector::parse("table#constituents").map_err(|e| DisclosureError::Parse(e.to_string()))?;
    let row_selector = Selector::parse("tr").map_err(|e| DisclosureError::Parse(e.to_string()))?;
    let cell_selector = Selector::parse("td").map_err(|e| DisclosureError::Parse(e.to_string()))?;

    let document = Html::parse_document(html);
    let table = document.select(&table_selector).next().ok_or_else(|| {
        DisclosureError::Parse("No constituents table found on page".to_string())
    })?;

    let mut constituents = Vec::new();
    for row in table.select(&row_selector) {
        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() < 3 {
            continue;
        }
        let ticker = cells[0].text().collect::<String>().trim().replace('.', "-");
        if ticker.is_empty() {
            continue;
        }
        let name = cells[1].text().collect::<String>().trim().to_string();
        let sector = cells.get(3).map_or_else(
            || "Unknown".to_string(),
            |cell| cell.text().collect::<String>().trim().to_string(),
        );

        constituents.push(Constituent {
            symbol: Symbol::new(ticker),
            name,
            sector,
        });
    }

    if constituents.is_empty() {
        return Err(DisclosureError::Parse(
            "Constituents table was empty".to_string(),
        ));
    }

    Ok(constituents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_HTML: &str = r#"<html><body>
        <table class="wikitable" id="constituents">
          <tbody>
            <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th><th>GICS Sub-Industry</th></tr>
            <tr><td>MMM</td><td>3M</td><td>Industrials</td><td>Industrial Conglomerates</td></tr>
            <tr><td>BRK.B</td><td>Berkshire Hathaway</td><td>Financials</td><td>Multi-Sector Holdings</td></tr>
            <tr><td>AOS</td><td>A. O. Smith</td><td>Industrials</td></tr>
          </tbody>
        </table>
        <table id="changes"><tr><td>unrelated</td></tr></table>
    </body></html>"#;

    #[test]
    fn test_parse_constituents() {
        let constituents = parse_constituents(PAGE_HTML).unwrap();
        assert_eq!(constituents.len(), 3);

        assert_eq!(constituents[0].symbol.as_str(), "MMM");
        assert_eq!(constituents[0].name, "3M");
        assert_eq!(constituents[0].sector, "Industrial Conglomerates");

        // Share class dots become dashes.
        assert_eq!(constituents[1].symbol.as_str(), "BRK-B");

        // Three-cell rows fall back to an unknown sector.
        assert_eq!(constituents[2].symbol.as_str(), "AOS");
        assert_eq!(constituents[2].sector, "Unknown");
    }

    #[test]
    fn test_parse_requires_the_constituents_table() {
        let err = parse_constituents("<html><body><table><tr><td>X</td></tr></table></body></html>");
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_unknown_universe_is_rejected() {
        let provider = WikipediaProvider::new();
        assert!(matches!(
            provider.universe("nasdaq100").await,
            Err(DisclosureError::NotSupported(_))
        ));
    }

    #[test]
    fn test_provider_traits() {
        let provider = WikipediaProvider::new();
        assert_eq!(provider.name(), "Wikipedia");
        assert!(!provider.description().is_empty());
    }
}
