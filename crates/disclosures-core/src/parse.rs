//! Trade record reconstruction from extracted report text.
//!
//! Text extraction flattens the transaction table of a periodic
//! transaction report into plain lines. [`parse_report`] walks those lines
//! once: a primary line opens a draft record, a bounded lookahead folds
//! the continuation lines below it into the draft, and the draft commits
//! when the lookahead reaches the next primary line, the footnote marker,
//! or the end of the document. Committing maps the raw amount token onto
//! its canonical range and resolves the ticker candidate.

use tracing::debug;

use crate::amount::amount_range;
use crate::classify::{LineClass, classify};
use crate::error::{DisclosureError, Result};
use crate::resolve::TickerResolver;
use crate::types::{DocId, Owner, TradeRecord};

/// Minimum tokens on a primary line: the owner code plus the six reserved
/// trailing columns.
const MIN_RECORD_TOKENS: usize = 7;

/// A record under construction, before continuations are final.
#[derive(Debug)]
struct Draft {
    owner: Owner,
    asset: String,
    ticker: String,
    transaction_type: String,
    transaction_date: String,
    notification_date: String,
    amount: String,
    filing_status: String,
    description: String,
}

impl Draft {
    /// Tokenizes a primary line. The six rightmost tokens are reserved for
    /// ticker, type, the two dates, the amount, and a discarded trailing
    /// column; everything between the owner code and the reserved block is
    /// the asset text. Returns `None` when the line has too few tokens.
    fn from_primary(owner: Owner, line: &str) -> Option<Self> {
        let columns: Vec<&str> = line.split_whitespace().collect();
        let n = columns.len();
        if n < MIN_RECORD_TOKENS {
            return None;
        }

        let joined = columns[1..n - 6].join(" ");
        let head = joined.split_once('-').map_or(joined.as_str(), |(h, _)| h);
        let mut asset = head.trim().to_string();
        let mut ticker = columns[n - 6].trim_matches(['(', ')']).to_string();
        // A parenthetical inside the asset text wins over the positional
        // ticker token. The text before it keeps its trailing space.
        if let Some(open) = asset.rfind('(') {
            let tail = &asset[open + 1..];
            ticker = tail.split_once(')').map_or(tail, |(t, _)| t).to_string();
            asset.truncate(open);
        }

        let mut transaction_type = columns[n - 5].to_string();
        if transaction_type == "(partial)" {
            transaction_type = format!("{} {}", columns[n - 6], columns[n - 5]);
        }

        Some(Self {
            owner,
            asset,
            ticker,
            transaction_type,
            transaction_date: columns[n - 4].to_string(),
            notification_date: columns[n - 3].to_string(),
            amount: columns[n - 2].to_string(),
            filing_status: String::new(),
            description: String::new(),
        })
    }

    /// Folds one continuation line into the draft. Primary and footnote
    /// lines never reach here; unclassified lines are skipped.
    fn apply(&mut self, class: LineClass<'_>) {
        match class {
            LineClass::TickerContinuation(ticker) => {
                self.ticker = ticker.to_string();
            }
            LineClass::StockContinuation { asset, ticker } => {
                self.asset.push(' ');
                self.asset.push_str(asset);
                self.ticker = ticker.to_string();
            }
            LineClass::FilingStatus(value) => {
                self.filing_status = value.to_string();
            }
            LineClass::Description(value) => {
                self.description = value.to_string();
            }
            LineClass::RecordStart(_) | LineClass::FootnoteTerminator | LineClass::Other => {}
        }
    }

    /// Finalizes the draft: canonical amount range, resolved ticker.
    async fn commit(self, resolver: &dyn TickerResolver) -> TradeRecord {
        let ticker = resolver.resolve(&self.ticker).await;
        let amount = amount_range(&self.amount).to_string();
        TradeRecord {
            owner: self.owner,
            asset: self.asset,
            ticker,
            transaction_type: self.transaction_type,
            transaction_date: self.transaction_date,
            notification_date: self.notification_date,
            amount,
            filing_status: self.filing_status,
            description: self.description,
        }
    }
}

/// Reconstructs all trade records of one report document.
///
/// Lines that open no record are skipped; each line belongs to at most one
/// record. Text with no primary lines, including empty text, yields an
/// empty vector. A primary line with too few tokens aborts the document
/// with [`DisclosureError::MalformedRecordLine`], preserving the records
/// committed before it.
pub async fn parse_report(
    text: &str,
    doc_id: &DocId,
    resolver: &dyn TickerResolver,
) -> Result<Vec<TradeRecord>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut records = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let LineClass::RecordStart(owner) = classify(lines[i]) else {
            i += 1;
            continue;
        };
        let Some(mut draft) = Draft::from_primary(owner, lines[i]) else {
            return Err(DisclosureError::MalformedRecordLine {
                document: doc_id.to_string(),
                line: lines[i].trim().to_string(),
                records,
            });
        };

        // Lookahead: fold continuations until the next primary line, the
        // footnote marker, or the end of the document.
        let mut j = i + 1;
        while j < lines.len() {
            match classify(lines[j]) {
                LineClass::RecordStart(_) | LineClass::FootnoteTerminator => break,
                class => draft.apply(class),
            }
            j += 1;
        }

        records.push(draft.commit(resolver).await);
        i = j;
    }

    debug!(document = %doc_id, records = records.len(), "report parsed");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Resolver that returns every candidate unchanged, so assertions see
    /// exactly what the parser extracted.
    #[derive(Debug)]
    struct Identity;

    #[async_trait]
    impl TickerResolver for Identity {
        async fn resolve(&self, candidate: &str) -> String {
            candidate.to_string()
        }
    }

    async fn parse(text: &str) -> Vec<TradeRecord> {
        parse_report(text, &DocId::new("20000001"), &Identity)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_records_in_input_order() {
        let text = "\
SP Microsoft Corporation (MSFT) P 01/02/2024 01/03/2024 $15,001 $50,000
JT Apple Inc (AAPL) S 01/04/2024 01/05/2024 $1,001 $15,000
";
        let records = parse(text).await;
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].owner, Owner::Spouse);
        assert_eq!(records[0].asset, "Microsoft Corporation");
        assert_eq!(records[0].ticker, "MSFT");
        assert_eq!(records[0].transaction_type, "P");
        assert_eq!(records[0].transaction_date, "01/02/2024");
        assert_eq!(records[0].notification_date, "01/03/2024");
        assert_eq!(records[0].amount, "$15,001 - $50,000");

        assert_eq!(records[1].owner, Owner::JointlyHeld);
        assert_eq!(records[1].ticker, "AAPL");
    }

    #[tokio::test]
    async fn test_dash_truncates_asset() {
        let text = "SP Alphabet Inc (GOOGL) - Class A P 01/02/2024 01/03/2024 $1,001 X\n";
        let records = parse(text).await;
        assert_eq!(records.len(), 1);
        // Trailing space before the parenthetical survives on purpose.
        assert_eq!(records[0].asset, "Alphabet Inc ");
        assert_eq!(records[0].ticker, "GOOGL");
    }

    #[tokio::test]
    async fn test_ticker_and_filing_status_continuations() {
        let text = "\
SP Microsoft Corporation P 01/02/2024 01/03/2024 $1,001 X
(MSFT)
F S: New
";
        let records = parse(text).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ticker, "MSFT");
        assert_eq!(records[0].filing_status, "New");
        assert_eq!(records[0].description, "");
    }

    #[tokio::test]
    async fn test_stock_continuation() {
        let text = "\
JT Hewlett Packard Enterprise - Com S 01/02/2024 01/03/2024 $15,001 G
Stock (HPE)
D: Vested award
";
        let records = parse(text).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].asset, "Hewlett Packard Enterprise ");
        assert_eq!(records[0].ticker, "HPE");
        assert_eq!(records[0].description, "Vested award");
        assert_eq!(records[0].amount, "$15,001 - $50,000");
    }

    #[tokio::test]
    async fn test_partial_type_concatenation() {
        let text =
            "SP iShares Core Total (ITOT) [ST] S (partial) 12/01/2023 12/05/2023 $15,001 -\n";
        let records = parse(text).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transaction_type, "S (partial)");
        // The asset parenthetical still supplies the ticker.
        assert_eq!(records[0].ticker, "ITOT");
        assert_eq!(records[0].asset, "iShares Core Total ");
        assert_eq!(records[0].transaction_date, "12/01/2023");
    }

    #[tokio::test]
    async fn test_footnote_seals_record() {
        let text = "\
SP Microsoft Corporation (MSFT) P 01/02/2024 01/03/2024 $1,001 X
* For the complete list of asset type abbreviations, please visit the reference page.
F S: New
D: Should never attach
";
        let records = parse(text).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filing_status, "");
        assert_eq!(records[0].description, "");
    }

    #[tokio::test]
    async fn test_no_owner_code_opens_nothing() {
        let text = "\
Apple Inc (AAPL) P 01/02/2024 01/03/2024 $1,001 X
SPDR Portfolio S&P 500 ETF P 01/02/2024 01/03/2024 $1,001 X
";
        assert!(parse(text).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_document() {
        assert!(parse("").await.is_empty());
        assert!(parse("\n   \n\n").await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_line_keeps_prior_records() {
        let text = "\
SP Microsoft Corporation (MSFT) P 01/02/2024 01/03/2024 $1,001 X
SP Oops P 01/02/2024
";
        let err = parse_report(text, &DocId::new("20099999"), &Identity)
            .await
            .unwrap_err();
        match err {
            DisclosureError::MalformedRecordLine {
                document,
                line,
                records,
            } => {
                assert_eq!(document, "20099999");
                assert_eq!(line, "SP Oops P 01/02/2024");
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].ticker, "MSFT");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_idempotent() {
        let text = "\
SP Microsoft Corporation P 01/02/2024 01/03/2024 $50,001 X
(MSFT)
JT Tesla Inc (TSLA) S 01/04/2024 01/05/2024 $1,001 X
F S: Amended
";
        let first = parse(text).await;
        let second = parse(text).await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].amount, "$50,001 - $100,000");
        assert_eq!(first[1].filing_status, "Amended");
    }

    #[tokio::test]
    async fn test_unknown_amount_passthrough() {
        let text = "SP Vanguard Total Market (VTI) P 01/02/2024 01/03/2024 $3,500,000 X\n";
        let records = parse(text).await;
        assert_eq!(records[0].amount, "$3,500,000");
    }
}
