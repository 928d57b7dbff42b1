#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/disclosures/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and the record parser for congressional disclosures.
//!
//! This crate provides the foundational pieces for reconstructing trades
//! from periodic transaction reports:
//!
//! - [`classify`](classify::classify) - Line classification for report text
//! - [`parse_report`](parse::parse_report) - Trade record reconstruction
//! - [`amount_range`](amount::amount_range) - Canonical amount ranges
//! - [`TickerResolver`](resolve::TickerResolver) - Ticker resolution
//! - [`FilingProvider`](provider::FilingProvider) - Filing index and documents
//! - [`trades_frame`](frame::trades_frame) - DataFrame assembly

/// Canonical transaction amount ranges.
pub mod amount;
/// Line classification for report text.
pub mod classify;
/// Error types for disclosure operations.
pub mod error;
/// DataFrame assembly for trade records.
pub mod frame;
/// Trade record reconstruction from report text.
pub mod parse;
/// Provider traits for disclosure sources.
pub mod provider;
/// Ticker resolution against a tracked universe.
pub mod resolve;
/// Core data types (Symbol, Owner, TradeRecord, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use amount::amount_range;
pub use classify::{LineClass, classify};
pub use error::{DisclosureError, Result};
pub use frame::{TRADE_COLUMNS, trades_frame};
pub use parse::parse_report;
pub use provider::{DisclosureProvider, FilingProvider, UniverseProvider};
pub use resolve::{AssetCodeLookup, NOT_IN_SP500, TickerResolver, UniverseResolver};
pub use types::{DocId, FIRST_DISCLOSURE_YEAR, Filing, FilingYear, Owner, Symbol, TradeRecord};
