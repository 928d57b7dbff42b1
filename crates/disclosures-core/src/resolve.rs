//! Ticker resolution against a tracked universe.
//!
//! Record commit hands the extracted ticker candidate to a
//! [`TickerResolver`]. The resolver either confirms the candidate against a
//! tracked universe, translates it through an asset code lookup, or falls
//! back to [`NOT_IN_SP500`]. Resolution never fails; a record always leaves
//! the parser with some ticker value.

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;

/// Sentinel ticker for candidates neither in the universe nor resolvable
/// through the asset code lookup.
pub const NOT_IN_SP500: &str = "Not in S&P 500";

/// Resolves extracted ticker candidates to their final table value.
///
/// Implementations must be infallible; unresolvable candidates map to a
/// sentinel rather than an error so one odd asset never loses a document.
#[async_trait]
pub trait TickerResolver: Send + Sync + fmt::Debug {
    /// Resolves one candidate. Returns the candidate itself, a substituted
    /// asset-type name, or a sentinel.
    async fn resolve(&self, candidate: &str) -> String;
}

/// Translates a two-character asset type code into its full name.
#[async_trait]
pub trait AssetCodeLookup: Send + Sync + fmt::Debug {
    /// Returns the asset type name for a code, or
    /// [`DisclosureError::AssetCodeNotFound`](crate::DisclosureError::AssetCodeNotFound)
    /// for unknown codes.
    async fn asset_name(&self, code: &str) -> Result<String>;
}

/// [`TickerResolver`] backed by a symbol universe with an asset code
/// fallback.
///
/// Candidates found in the universe pass through unchanged. Anything else
/// is stripped of surrounding brackets and tried as an asset type code;
/// when that also fails the candidate resolves to [`NOT_IN_SP500`].
#[derive(Debug)]
pub struct UniverseResolver {
    universe: HashSet<String>,
    fallback: Arc<dyn AssetCodeLookup>,
}

impl UniverseResolver {
    /// Creates a resolver from a symbol universe and a code fallback.
    #[must_use]
    pub fn new(
        universe: impl IntoIterator<Item = String>,
        fallback: Arc<dyn AssetCodeLookup>,
    ) -> Self {
        Self {
            universe: universe.into_iter().collect(),
            fallback,
        }
    }

    /// Number of symbols in the tracked universe.
    #[must_use]
    pub fn universe_size(&self) -> usize {
        self.universe.len()
    }
}

#[async_trait]
impl TickerResolver for UniverseResolver {
    async fn resolve(&self, candidate: &str) -> String {
        if self.universe.contains(candidate) {
            return candidate.to_string();
        }
        debug!(ticker = candidate, "ticker not in tracked universe");
        let code = candidate.trim_matches(['[', ']']);
        match self.fallback.asset_name(code).await {
            Ok(name) => name,
            Err(e) => {
                warn!(code = code, error = %e, "asset code lookup failed");
                NOT_IN_SP500.to_string()
            }
        }
    }
}
