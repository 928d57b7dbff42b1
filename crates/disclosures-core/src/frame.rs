//! DataFrame assembly for reconstructed trade records.

use polars::prelude::*;

use crate::error::{DisclosureError, Result};
use crate::types::TradeRecord;

/// Column names of a trade frame, in output order.
pub const TRADE_COLUMNS: [&str; 9] = [
    "Owner",
    "Asset",
    "Ticker",
    "Transaction Type",
    "Transaction Date",
    "Notification Date",
    "Amount",
    "Filing Status",
    "Description",
];

/// Builds the trade table for a slice of records, one row per record in
/// input order. An empty slice yields an empty frame with the full schema.
pub fn trades_frame(records: &[TradeRecord]) -> Result<DataFrame> {
    let owners: Vec<&str> = records.iter().map(|r| r.owner.as_str()).collect();
    let assets: Vec<&str> = records.iter().map(|r| r.asset.as_str()).collect();
    let tickers: Vec<&str> = records.iter().map(|r| r.ticker.as_str()).collect();
    let types: Vec<&str> = records.iter().map(|r| r.transaction_type.as_str()).collect();
    let t_dates: Vec<&str> = records.iter().map(|r| r.transaction_date.as_str()).collect();
    let n_dates: Vec<&str> = records.iter().map(|r| r.notification_date.as_str()).collect();
    let amounts: Vec<&str> = records.iter().map(|r| r.amount.as_str()).collect();
    let statuses: Vec<&str> = records.iter().map(|r| r.filing_status.as_str()).collect();
    let descriptions: Vec<&str> = records.iter().map(|r| r.description.as_str()).collect();

    DataFrame::new(vec![
        Column::new("Owner".into(), owners),
        Column::new("Asset".into(), assets),
        Column::new("Ticker".into(), tickers),
        Column::new("Transaction Type".into(), types),
        Column::new("Transaction Date".into(), t_dates),
        Column::new("Notification Date".into(), n_dates),
        Column::new("Amount".into(), amounts),
        Column::new("Filing Status".into(), statuses),
        Column::new("Description".into(), descriptions),
    ])
    .map_err(|e| DisclosureError::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Owner;

    fn record() -> TradeRecord {
        TradeRecord {
            owner: Owner::Spouse,
            asset: "Microsoft Corporation".to_string(),
            ticker: "MSFT".to_string(),
            transaction_type: "P".to_string(),
            transaction_date: "01/02/2024".to_string(),
            notification_date: "01/03/2024".to_string(),
            amount: "$15,001 - $50,000".to_string(),
            filing_status: "New".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_frame_schema() {
        let df = trades_frame(&[record()]).unwrap();
        assert_eq!(df.shape(), (1, TRADE_COLUMNS.len()));
        let names: Vec<&str> = df.get_column_names_str();
        assert_eq!(names, TRADE_COLUMNS);
    }

    #[test]
    fn test_empty_frame_schema() {
        let df = trades_frame(&[]).unwrap();
        assert_eq!(df.shape(), (0, 9));
        assert_eq!(df.get_column_names_str(), TRADE_COLUMNS);
    }

    #[test]
    fn test_rows_follow_input_order() {
        let mut second = record();
        second.owner = Owner::JointlyHeld;
        second.ticker = "AAPL".to_string();
        let df = trades_frame(&[record(), second]).unwrap();
        let tickers = df.column("Ticker").unwrap().str().unwrap();
        assert_eq!(tickers.get(0), Some("MSFT"));
        assert_eq!(tickers.get(1), Some("AAPL"));
        let owners = df.column("Owner").unwrap().str().unwrap();
        assert_eq!(owners.get(1), Some("JT"));
    }
}
