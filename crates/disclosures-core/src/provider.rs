//! Provider traits for disclosure data sources.
//!
//! This module defines the core provider traits:
//!
//! - [`DisclosureProvider`] - Base trait for all providers
//! - [`FilingProvider`] - Annual filing index and report documents
//! - [`UniverseProvider`] - Symbol universes for ticker resolution

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{DocId, Filing, FilingYear, Symbol},
};

/// Base trait for all disclosure data providers.
///
/// All providers implement this trait to report basic metadata about the
/// source they wrap.
pub trait DisclosureProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "House Clerk").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for the filing index and report documents of a year.
#[async_trait]
pub trait FilingProvider: DisclosureProvider {
    /// Fetches the full filing index for a year, one entry per filing.
    async fn filings(&self, year: FilingYear) -> Result<Vec<Filing>>;

    /// Fetches one report document and extracts its text.
    ///
    /// The text is the input expected by
    /// [`parse_report`](crate::parse_report); callers decide what to do
    /// with documents whose extraction comes back empty.
    async fn report_text(&self, year: FilingYear, doc_id: &DocId) -> Result<String>;
}

/// Provider for symbol universes.
#[async_trait]
pub trait UniverseProvider: DisclosureProvider {
    /// Returns every symbol of the named universe (e.g., `"sp500"`).
    async fn universe(&self, universe_id: &str) -> Result<Vec<Symbol>>;
}
