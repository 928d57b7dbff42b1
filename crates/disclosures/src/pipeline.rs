//! Year-level extraction pipeline over a filing provider.

use disclosures_core::{
    DisclosureError, DocId, FilingProvider, FilingYear, Result, TRADE_COLUMNS, TickerResolver,
    TradeRecord, parse_report, trades_frame,
};
use futures::future::join_all;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

#[cfg(all(feature = "house", feature = "wiki"))]
use disclosures_core::{UniverseProvider, UniverseResolver};
#[cfg(all(feature = "house", feature = "wiki"))]
use disclosures_house::AssetTypeTable;
#[cfg(all(feature = "house", feature = "wiki"))]
use disclosures_wiki::WikipediaProvider;

/// Download behavior for a year extraction.
///
/// Individual report requests are paced by the provider; the policy governs
/// how many downloads run at once and how transient failures are retried.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Maximum number of report downloads in flight at once.
    pub max_concurrent: usize,
    /// Fetch attempts for a document before it is recorded as failed.
    pub max_retries: u32,
    /// Wait between retry attempts and between batches.
    pub retry_delay: Duration,
    /// Number of documents fetched per batch.
    pub batch_size: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_concurrent: 3,
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            batch_size: 10,
        }
    }
}

/// Outcome of extracting every electronically filed transaction report in
/// a year.
#[derive(Debug)]
pub struct YearTrades {
    /// One row per reconstructed trade, labeled with the filer and source
    /// document, sorted by member and then by transaction date descending.
    pub trades: DataFrame,
    /// Members whose transaction report was filed on paper or carries no
    /// document id. Nothing can be extracted for them.
    pub skipped_members: Vec<String>,
    /// Documents that could not be fetched or fully parsed. Records
    /// recovered before a parse failure are still present in the table.
    pub failed_documents: Vec<DocId>,
}

/// Fetches every periodic transaction report filed in a year and reduces
/// them to one trade table.
///
/// The pipeline walks the filing index, keeps electronically filed
/// transaction reports, downloads them in bounded batches, and parses each
/// into [`TradeRecord`]s. Per-document tables are labeled with the member
/// name and document id and concatenated into a single frame.
#[derive(Debug)]
pub struct TradePipeline {
    provider: Arc<dyn FilingProvider>,
    resolver: Arc<dyn TickerResolver>,
    policy: FetchPolicy,
}

impl TradePipeline {
    /// Creates a pipeline with the default fetch policy.
    pub fn new(provider: Arc<dyn FilingProvider>, resolver: Arc<dyn TickerResolver>) -> Self {
        Self {
            provider,
            resolver,
            policy: FetchPolicy::default(),
        }
    }

    /// Replaces the fetch policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extracts all trades reported for `year`.
    ///
    /// Filings that are not transaction reports are ignored. A document
    /// that keeps failing after retries lands in
    /// [`YearTrades::failed_documents`] without aborting the rest of the
    /// year.
    pub async fn year_trades(&self, year: FilingYear) -> Result<YearTrades> {
        let filings = self.provider.filings(year).await?;

        let mut skipped_members = Vec::new();
        let mut documents: Vec<(String, DocId)> = Vec::new();
        for filing in filings.iter().filter(|f| f.is_ptr()) {
            match &filing.doc_id {
                Some(doc_id) if doc_id.is_electronic() => {
                    documents.push((filing.member_name().to_string(), doc_id.clone()));
                }
                _ => {
                    debug!(
                        member = filing.member_name(),
                        "transaction report has no electronic document"
                    );
                    skipped_members.push(filing.member_name().to_string());
                }
            }
        }
        debug!(
            year = year.get(),
            documents = documents.len(),
            skipped = skipped_members.len(),
            "filing index reduced to electronic transaction reports"
        );

        let semaphore = Arc::new(Semaphore::new(self.policy.max_concurrent));
        let mut frames = Vec::new();
        let mut failed_documents = Vec::new();

        let batches: Vec<_> = documents.chunks(self.policy.batch_size).collect();
        let total = batches.len();
        for (index, batch) in batches.into_iter().enumerate() {
            let tasks = batch.iter().map(|(member, doc_id)| {
                let semaphore = Arc::clone(&semaphore);
                async move {
                    let outcome = match semaphore.acquire().await {
                        Ok(_permit) => self.extract_document(year, doc_id).await,
                        Err(_) => Err(DisclosureError::Other(
                            "Download semaphore closed".to_string(),
                        )),
                    };
                    (member, doc_id, outcome)
                }
            });

            for (member, doc_id, outcome) in join_all(tasks).await {
                match outcome {
                    Ok(records) => frames.push(labeled_frame(member, doc_id, &records)?),
                    Err(DisclosureError::MalformedRecordLine { records, line, .. }) => {
                        warn!(
                            document = %doc_id,
                            line = %line,
                            "malformed record line, keeping prior records"
                        );
                        frames.push(labeled_frame(member, doc_id, &records)?);
                        failed_documents.push(doc_id.clone());
                    }
                    Err(e) => {
                        warn!(document = %doc_id, error = %e, "report extraction failed");
                        failed_documents.push(doc_id.clone());
                    }
                }
            }

            if index + 1 < total {
                sleep(self.policy.retry_delay).await;
            }
        }

        let trades = combined_frame(frames)?;
        Ok(YearTrades {
            trades,
            skipped_members,
            failed_documents,
        })
    }

    /// Fetches one report and parses it, retrying transient failures.
    async fn extract_document(&self, year: FilingYear, doc_id: &DocId) -> Result<Vec<TradeRecord>> {
        let mut attempt = 0;
        let text = loop {
            match self.provider.report_text(year, doc_id).await {
                Ok(text) => break text,
                Err(e @ (DisclosureError::Network(_) | DisclosureError::RateLimited { .. })) => {
                    attempt += 1;
                    if attempt >= self.policy.max_retries {
                        return Err(e);
                    }
                    let wait = match &e {
                        DisclosureError::RateLimited {
                            retry_after: Some(after),
                            ..
                        } => *after,
                        _ => self.policy.retry_delay,
                    };
                    debug!(document = %doc_id, attempt, error = %e, "transient failure, retrying");
                    sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        };

        if text.trim().is_empty() {
            debug!(document = %doc_id, "report text is empty");
            return Ok(Vec::new());
        }
        parse_report(&text, doc_id, self.resolver.as_ref()).await
    }
}

/// Builds the standard ticker resolution chain.
///
/// Fetches the current S&P 500 constituents from Wikipedia for the
/// membership test, with the built-in House asset type code table as the
/// fallback for bracketed codes.
#[cfg(all(feature = "house", feature = "wiki"))]
pub async fn sp500_resolver() -> Result<UniverseResolver> {
    let symbols = WikipediaProvider::new().universe("sp500").await?;
    Ok(UniverseResolver::new(
        symbols.iter().map(|s| s.as_str().to_string()),
        Arc::new(AssetTypeTable::builtin()),
    ))
}

fn labeled_frame(member: &str, doc_id: &DocId, records: &[TradeRecord]) -> Result<DataFrame> {
    let mut df = trades_frame(records)?;
    let height = df.height();
    df.insert_column(0, Column::new("Member".into(), vec![member; height]))
        .map_err(|e| DisclosureError::Other(e.to_string()))?;
    df.insert_column(1, Column::new("DocID".into(), vec![doc_id.as_str(); height]))
        .map_err(|e| DisclosureError::Other(e.to_string()))?;
    Ok(df)
}

fn combined_frame(frames: Vec<DataFrame>) -> Result<DataFrame> {
    if frames.is_empty() {
        return empty_year_frame();
    }

    concat(
        frames
            .iter()
            .map(|df| df.clone().lazy())
            .collect::<Vec<_>>(),
        UnionArgs::default(),
    )
    .map_err(|e| DisclosureError::Other(e.to_string()))?
    .sort(
        ["Member", "Transaction Date"],
        SortMultipleOptions::default().with_order_descending_multi([false, true]),
    )
    .collect()
    .map_err(|e| DisclosureError::Other(e.to_string()))
}

fn empty_year_frame() -> Result<DataFrame> {
    let mut columns = vec![
        Column::new("Member".into(), Vec::<String>::new()),
        Column::new("DocID".into(), Vec::<String>::new()),
    ];
    columns.extend(
        TRADE_COLUMNS
            .iter()
            .map(|name| Column::new((*name).into(), Vec::<String>::new())),
    );
    DataFrame::new(columns).map_err(|e| DisclosureError::Other(e.to_string()))
}
