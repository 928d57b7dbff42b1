#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/disclosures/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! House Clerk disclosure provider.
//!
//! This crate provides access to the House financial disclosure archive:
//!
//! - Annual filing index, published as a zip archive with one XML entry per filing
//! - Periodic transaction report documents with text extraction
//! - Asset type code table used as the ticker resolution fallback
//!
//! # Example
//!
//! ```no_run
//! use disclosures_core::{FilingProvider, FilingYear};
//! use disclosures_house::HouseProvider;
//!
//! # async fn example() -> disclosures_core::Result<()> {
//! let provider = HouseProvider::new();
//! let year = FilingYear::new(2024)?;
//!
//! let filings = provider.filings(year).await?;
//! for filing in filings.iter().filter(|f| f.is_ptr()) {
//!     println!("{} filed {}", filing.member_name(), filing.filing_date);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use disclosures_core::{
    AssetCodeLookup, DisclosureError, DisclosureProvider, DocId, Filing, FilingProvider,
    FilingYear, Result,
};
use scraper::{Html, Selector};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;
use zip::ZipArchive;

/// Base URL of the Clerk's public disclosure archive.
const DISCLOSURES_BASE_URL: &str = "https://disclosures-clerk.house.gov/public_disc";

/// Host name reported in rate limit errors.
const DISCLOSURES_HOST: &str = "disclosures-clerk.house.gov";

/// Asset type code reference page.
const ASSET_CODES_URL: &str = "https://fd.house.gov/reference/asset-type-codes.aspx";

/// Default rate limit: one request every two seconds.
const DEFAULT_RATE_LIMIT: Duration = Duration::from_secs(2);

/// Timeout for archive and document downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Suggested wait before retrying a throttled request.
const RETRY_AFTER: Duration = Duration::from_secs(5);

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Rate limiter to stay under the Clerk's request throttling.
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// House Clerk disclosure provider.
///
/// Provides the annual filing index and individual periodic transaction
/// reports. The Clerk's site throttles aggressive clients with HTTP 403, so
/// all requests go through a shared rate limiter.
#[derive(Debug)]
pub struct HouseProvider {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl HouseProvider {
    /// Create a new House provider with default settings.
    ///
    /// Uses built-in rate limiting of one request every two seconds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(DEFAULT_RATE_LIMIT)
    }

    /// Create a new House provider with custom rate limiting.
    #[must_use]
    pub fn with_rate_limit(rate_limit: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(rate_limit))),
        }
    }

    /// Create a new House provider with a custom HTTP client.
    ///
    /// Uses the provided client for all HTTP requests. Rate limiting is
    /// still applied.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
        }
    }

    /// Download the annual filing index archive.
    async fn fetch_index_archive(&self, year: FilingYear) -> Result<Vec<u8>> {
        self.rate_limiter.lock().await.wait().await;

        let url = index_url(year);
        debug!("Fetching filing index from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DisclosureError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            return Err(DisclosureError::RateLimited {
                host: DISCLOSURES_HOST.to_string(),
                retry_after: Some(RETRY_AFTER),
            });
        }
        if !status.is_success() {
            return Err(DisclosureError::Network(format!(
                "Failed to fetch filing index for {}: HTTP {}",
                year, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DisclosureError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    /// Download one report document.
    async fn fetch_report(&self, year: FilingYear, doc_id: &DocId) -> Result<Vec<u8>> {
        self.rate_limiter.lock().await.wait().await;

        let url = report_url(year, doc_id);
        debug!("Fetching report from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DisclosureError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            return Err(DisclosureError::RateLimited {
                host: DISCLOSURES_HOST.to_string(),
                retry_after: Some(RETRY_AFTER),
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DisclosureError::DocumentNotFound(doc_id.to_string()));
        }
        if !status.is_success() {
            return Err(DisclosureError::Network(format!(
                "Failed to fetch report {}: HTTP {}",
                doc_id, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DisclosureError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    /// Fetch the asset type code table from the reference page.
    ///
    /// The reference page is served rarely and throttled hard; prefer
    /// [`AssetTypeTable::builtin`] unless a fresh copy is required.
    pub async fn asset_type_table(&self) -> Result<AssetTypeTable> {
        self.rate_limiter.lock().await.wait().await;

        debug!("Fetching asset type codes from {}", ASSET_CODES_URL);
        let response = self
            .client
            .get(ASSET_CODES_URL)
            .send()
            .await
            .map_err(|e| DisclosureError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DisclosureError::Network(format!(
                "Failed to fetch asset type codes: HTTP {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| DisclosureError::Network(e.to_string()))?;

        AssetTypeTable::from_html(&html)
    }
}

impl Default for HouseProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DisclosureProvider for HouseProvider {
    fn name(&self) -> &str {
        "House Clerk"
    }

    fn description(&self) -> &str {
        "U.S. House of Representatives Clerk provider for financial disclosure \
         indexes and periodic transaction reports"
    }
}

#[async_trait]
impl FilingProvider for HouseProvider {
    async fn filings(&self, year: FilingYear) -> Result<Vec<Filing>> {
        let archive = self.fetch_index_archive(year).await?;
        let xml = index_xml_from_archive(&archive, year)?;
        let filings = parse_index(&xml)?;
        debug!(year = year.get(), filings = filings.len(), "filing index fetched");
        Ok(filings)
    }

    async fn report_text(&self, year: FilingYear, doc_id: &DocId) -> Result<String> {
        let bytes = self.fetch_report(year, doc_id).await?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            DisclosureError::Parse(format!(
                "Failed to extract text from report {}: {}",
                doc_id, e
            ))
        })
    }
}

/// URL of the filing index archive for a year.
fn index_url(year: FilingYear) -> String {
    format!("{}/financial-pdfs/{}FD.zip", DISCLOSURES_BASE_URL, year)
}

/// URL of one report document.
fn report_url(year: FilingYear, doc_id: &DocId) -> String {
    format!("{}/ptr-pdfs/{}/{}.pdf", DISCLOSURES_BASE_URL, year, doc_id)
}

/// Pulls the index XML out of the annual archive.
fn index_xml_from_archive(archive: &[u8], year: FilingYear) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(archive))
        .map_err(|e| DisclosureError::Parse(format!("Failed to open index archive: {}", e)))?;

    let name = format!("{}FD.xml", year);
    let mut entry = archive
        .by_name(&name)
        .map_err(|e| DisclosureError::Parse(format!("{} missing from index archive: {}", name, e)))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| DisclosureError::Parse(format!("Failed to read {}: {}", name, e)))?;

    Ok(xml)
}

/// Parses the index XML into filings.
fn parse_index(xml: &str) -> Result<Vec<Filing>> {
    let index: DisclosureIndex = quick_xml::de::from_str(xml)
        .map_err(|e| DisclosureError::Parse(format!("Failed to parse filing index: {}", e)))?;

    Ok(index
        .members
        .into_iter()
        .map(MemberFiling::into_filing)
        .collect())
}

// =============================================================================
// Asset type codes
// =============================================================================

/// Asset type codes as published on the Clerk's reference page.
const ASSET_TYPE_CODES: [(&str, &str); 46] = [
    ("4K", "401K and Other Non-Federal Retirement Accounts"),
    ("5C", "529 College Savings Plan"),
    ("5F", "529 Portfolio"),
    ("5P", "529 Prepaid Tuition Plan"),
    ("AB", "Asset-Backed Securities"),
    ("BA", "Bank Accounts, Money Market Accounts and CDs"),
    ("BK", "Brokerage Accounts"),
    ("CO", "Collectibles"),
    ("CS", "Corporate Securities (Bonds and Notes)"),
    ("CT", "Cryptocurrency"),
    ("DB", "Defined Benefit Pension"),
    ("DO", "Debts Owed to the Filer"),
    ("DS", "Delaware Statutory Trust"),
    ("EF", "Exchange Traded Funds (ETF)"),
    ("EQ", "Excepted/Qualified Blind Trust"),
    ("ET", "Exchange Traded Notes"),
    ("FA", "Farms"),
    ("FE", "Foreign Exchange Position (Currency)"),
    ("FN", "Fixed Annuity"),
    ("FU", "Futures"),
    ("GS", "Government Securities and Agency Debt"),
    ("HE", "Hedge Funds & Private Equity Funds (EIF)"),
    ("HN", "Hedge Funds & Private Equity Funds (non-EIF)"),
    ("IC", "Investment Club"),
    ("IH", "IRA (Held in Cash)"),
    ("IP", "Intellectual Property & Royalties"),
    ("IR", "IRA"),
    ("MA", "Managed Accounts (e.g., SMA and UMA)"),
    ("MF", "Mutual Funds"),
    ("MO", "Mineral/Oil/Solar Energy Rights"),
    ("OI", "Ownership Interest (Holding Investments)"),
    ("OL", "Ownership Interest (Engaged in a Trade or Business)"),
    ("OP", "Options"),
    ("OT", "Other"),
    ("PE", "Pensions"),
    ("PM", "Precious Metals"),
    ("PS", "Stock (Not Publicly Traded)"),
    ("RE", "Real Estate Invest. Trust (REIT)"),
    ("RP", "Real Property"),
    ("RS", "Restricted Stock Units (RSUs)"),
    ("SA", "Stock Appreciation Right"),
    ("ST", "Stocks (including ADRs)"),
    ("TR", "Trust"),
    ("VA", "Variable Annuity"),
    ("VI", "Variable Insurance"),
    ("WU", "Whole/Universal Insurance"),
];

/// Asset type code table.
///
/// Maps the two-character codes printed in disclosure documents to their
/// full asset type names. Serves as the [`AssetCodeLookup`] fallback during
/// ticker resolution.
#[derive(Debug, Clone)]
pub struct AssetTypeTable {
    codes: HashMap<String, String>,
}

impl AssetTypeTable {
    /// The table as published on the reference page, compiled in.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            codes: ASSET_TYPE_CODES
                .iter()
                .map(|(code, name)| ((*code).to_string(), (*name).to_string()))
                .collect(),
        }
    }

    /// Parses the table from the reference page HTML.
    ///
    /// Reads the first table on the page; the first cell of each row is the
    /// code, the second the name.
    pub fn from_html(html: &str) -> Result<Self> {
        let table_selector =
            Selector::parse("table").map_err(|e| DisclosureError::Parse(e.to_string()))?;
        let row_selector =
            Selector::parse("tr").map_err(|e| DisclosureError::Parse(e.to_string()))?;
        let cell_selector =
            Selector::parse("td").map_err(|e| DisclosureError::Parse(e.to_string()))?;

        let document = Html::parse_document(html);
        let table = document.select(&table_selector).next().ok_or_else(|| {
            DisclosureError::Parse("No table found on asset type codes page".to_string())
        })?;

        let mut codes = HashMap::new();
        for row in table.select(&row_selector) {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() < 2 {
                continue;
            }
            let code = cells[0].text().collect::<String>().trim().to_string();
            let name = cells[1].text().collect::<String>().trim().to_string();
            if code.is_empty() {
                continue;
            }
            codes.insert(code, name);
        }

        if codes.is_empty() {
            return Err(DisclosureError::Parse(
                "Asset type codes table was empty".to_string(),
            ));
        }

        Ok(Self { codes })
    }

    /// Looks up the name for a code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.codes.get(code).map(String::as_str)
    }

    /// Number of codes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true when the table holds no codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[async_trait]
impl AssetCodeLookup for AssetTypeTable {
    async fn asset_name(&self, code: &str) -> Result<String> {
        self.codes
            .get(code)
            .cloned()
            .ok_or_else(|| DisclosureError::AssetCodeNotFound(code.to_string()))
    }
}

// =============================================================================
// Index XML types
// =============================================================================

/// Annual filing index document.
#[derive(Debug, Deserialize)]
struct DisclosureIndex {
    /// One element per filing.
    #[serde(rename = "Member", default)]
    members: Vec<MemberFiling>,
}

/// One `Member` element of the filing index.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MemberFiling {
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    last: String,
    #[serde(default)]
    first: String,
    #[serde(default)]
    suffix: Option<String>,
    #[serde(default)]
    filing_type: String,
    #[serde(default)]
    state_dst: String,
    #[serde(default)]
    year: i32,
    #[serde(default)]
    filing_date: String,
    #[serde(rename = "DocID", default)]
    doc_id: Option<String>,
}

impl MemberFiling {
    fn into_filing(self) -> Filing {
        Filing {
            prefix: self.prefix.filter(|p| !p.trim().is_empty()),
            last: self.last,
            first: self.first,
            suffix: self.suffix.filter(|s| !s.trim().is_empty()),
            filing_type: self.filing_type,
            state_district: self.state_dst,
            year: self.year,
            filing_date: self.filing_date,
            doc_id: self.doc_id.filter(|d| !d.trim().is_empty()).map(DocId::new),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INDEX_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<FinancialDisclosure>
  <Member>
    <Prefix>Hon.</Prefix>
    <Last>Pelosi</Last>
    <First>Nancy</First>
    <Suffix/>
    <FilingType>P</FilingType>
    <StateDst>CA11</StateDst>
    <Year>2024</Year>
    <FilingDate>1/16/2024</FilingDate>
    <DocID>20022513</DocID>
  </Member>
  <Member>
    <Prefix>Hon.</Prefix>
    <Last>Banks</Last>
    <First>James</First>
    <Suffix/>
    <FilingType>O</FilingType>
    <StateDst>IN03</StateDst>
    <Year>2024</Year>
    <FilingDate>5/15/2024</FilingDate>
    <DocID>8220100</DocID>
  </Member>
  <Member>
    <Prefix/>
    <Last>Doe</Last>
    <First>Jane</First>
    <Suffix/>
    <FilingType>P</FilingType>
    <StateDst>TX07</StateDst>
    <Year>2024</Year>
    <FilingDate>3/02/2024</FilingDate>
    <DocID/>
  </Member>
</FinancialDisclosure>"#;

    fn year() -> FilingYear {
        FilingYear::new(2024).unwrap()
    }

    #[test]
    fn test_index_and_report_urls() {
        assert_eq!(
            index_url(year()),
            "https://disclosures-clerk.house.gov/public_disc/financial-pdfs/2024FD.zip"
        );
        assert_eq!(
            report_url(year(), &DocId::new("20026990")),
            "https://disclosures-clerk.house.gov/public_disc/ptr-pdfs/2024/20026990.pdf"
        );
    }

    #[test]
    fn test_parse_index() {
        let filings = parse_index(INDEX_XML).unwrap();
        assert_eq!(filings.len(), 3);

        let ptr = &filings[0];
        assert_eq!(ptr.prefix.as_deref(), Some("Hon."));
        assert_eq!(ptr.member_name(), "Pelosi");
        assert_eq!(ptr.state_district, "CA11");
        assert_eq!(ptr.year, 2024);
        assert!(ptr.is_ptr());
        let doc_id = ptr.doc_id.as_ref().unwrap();
        assert_eq!(doc_id.as_str(), "20022513");
        assert!(doc_id.is_electronic());

        // Annual report: not a PTR, paper-era doc id.
        assert!(!filings[1].is_ptr());
        assert!(!filings[1].doc_id.as_ref().unwrap().is_electronic());

        // Empty DocID element maps to no doc id.
        assert!(filings[2].is_ptr());
        assert!(filings[2].doc_id.is_none());
        assert!(filings[2].suffix.is_none());
    }

    #[test]
    fn test_parse_index_without_members() {
        let filings = parse_index("<FinancialDisclosure></FinancialDisclosure>").unwrap();
        assert!(filings.is_empty());
    }

    #[test]
    fn test_index_xml_from_archive() {
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            writer
                .start_file("2024FD.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(INDEX_XML.as_bytes()).unwrap();
            writer
                .start_file("2024FD.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"tab separated copy").unwrap();
            writer.finish().unwrap();
        }

        let xml = index_xml_from_archive(&buf, year()).unwrap();
        assert_eq!(xml, INDEX_XML);

        let missing = index_xml_from_archive(&buf, FilingYear::new(2023).unwrap());
        assert!(missing.is_err());
    }

    #[test]
    fn test_builtin_asset_table() {
        let table = AssetTypeTable::builtin();
        assert_eq!(table.len(), 47);
        assert_eq!(table.get("ST"), Some("Stocks (including ADRs)"));
        assert_eq!(table.get("EF"), Some("Exchange Traded Funds (ETF)"));
        assert_eq!(table.get("WU"), Some("Whole/Universal Insurance"));
        assert_eq!(table.get("ZZ"), None);
    }

    #[tokio::test]
    async fn test_asset_table_lookup() {
        let table = AssetTypeTable::builtin();
        assert_eq!(table.asset_name("4K").await.unwrap(), "401K and Other Non-Federal Retirement Accounts");
        assert!(matches!(
            table.asset_name("ZZ").await,
            Err(DisclosureError::AssetCodeNotFound(_))
        ));
    }

    #[test]
    fn test_asset_table_from_html() {
        let html = r#"<html><body>
            <table>
              <tr><th>Asset Code</th><th>Asset Name</th></tr>
              <tr><td>EF</td><td>Exchange Traded Funds (ETF)</td></tr>
              <tr><td>ST</td><td>Stocks (including ADRs)</td></tr>
            </table>
        </body></html>"#;
        let table = AssetTypeTable::from_html(html).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("EF"), Some("Exchange Traded Funds (ETF)"));
        assert!(!table.is_empty());

        assert!(AssetTypeTable::from_html("<html><body></body></html>").is_err());
    }

    #[test]
    fn test_provider_traits() {
        let provider = HouseProvider::new();
        assert_eq!(provider.name(), "House Clerk");
        assert!(!provider.description().is_empty());
    }
}
