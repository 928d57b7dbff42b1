#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/disclosures/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Unified interface for congressional financial disclosure data.
//!
//! This crate re-exports the core types and the reconstruction parser, the
//! provider implementations, and a [`TradePipeline`] that fetches every
//! periodic transaction report filed in a year and reduces them to one
//! trade table.
//!
//! # Features
//!
//! - `house` - House Clerk provider for filing indexes and reports
//! - `wiki` - Wikipedia S&P 500 universe provider
//! - `export-sqlite` - SQLite export of finished trade tables
//!
//! # Example
//!
//! ```rust,ignore
//! use disclosures::{FilingYear, HouseProvider, TradePipeline, sp500_resolver};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> disclosures::Result<()> {
//!     let resolver = Arc::new(sp500_resolver().await?);
//!     let pipeline = TradePipeline::new(Arc::new(HouseProvider::new()), resolver);
//!
//!     let year = pipeline.year_trades(FilingYear::new(2024)?).await?;
//!     println!("{}", year.trades.head(Some(10)));
//!
//!     Ok(())
//! }
//! ```

// Core types and the parser
pub use disclosures_core::*;

// Providers
#[cfg(feature = "house")]
pub use disclosures_house::{AssetTypeTable, HouseProvider};
#[cfg(feature = "wiki")]
pub use disclosures_wiki::{Constituent, WikipediaProvider};

mod export;
mod pipeline;

pub use export::write_csv;
#[cfg(feature = "export-sqlite")]
pub use export::write_sqlite;
#[cfg(all(feature = "house", feature = "wiki"))]
pub use pipeline::sp500_resolver;
pub use pipeline::{FetchPolicy, TradePipeline, YearTrades};
