//! Core data types for disclosure processing.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`Owner`] - Who holds the traded asset
//! - [`TradeRecord`] - One reconstructed transaction
//! - [`DocId`] - Disclosure document identifier
//! - [`FilingYear`] - Validated filing year
//! - [`Filing`] - One row of the annual disclosure index

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DisclosureError, Result};

/// First year covered by the electronic disclosure archive.
pub const FIRST_DISCLOSURE_YEAR: i32 = 2014;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Who holds the asset of a reconstructed transaction.
///
/// Primary record lines carry a two-letter code (`SP`, `DC`, `JT`); a line
/// with any other leading token does not open a record. The filer variant
/// exists for assets held directly, which the source layout leaves uncoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// The filing member themselves (no owner code on the line).
    Filer,
    /// Spouse of the filer (`SP`).
    Spouse,
    /// Dependent child of the filer (`DC`).
    DependentChild,
    /// Jointly held (`JT`).
    JointlyHeld,
}

impl Owner {
    /// Parses an owner code token. Returns `None` for anything outside the
    /// fixed code set.
    #[must_use]
    pub fn from_code(token: &str) -> Option<Self> {
        match token {
            "SP" => Some(Self::Spouse),
            "DC" => Some(Self::DependentChild),
            "JT" => Some(Self::JointlyHeld),
            _ => None,
        }
    }

    /// Returns the representation used in exported tables, matching the
    /// codes printed in the source documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Filer => "Self",
            Self::Spouse => "SP",
            Self::DependentChild => "DC",
            Self::JointlyHeld => "JT",
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reconstructed transaction from a periodic transaction report.
///
/// Date and amount fields keep the raw document tokens; the amount is one of
/// the nine canonical range labels (or the raw token when unrecognized) and
/// the ticker is a resolved symbol, a resolved asset-type name, or the
/// unresolved sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Who holds the asset.
    pub owner: Owner,
    /// Free-text asset description, ticker substring stripped.
    pub asset: String,
    /// Resolved ticker, asset-type name, or sentinel.
    pub ticker: String,
    /// Transaction type (e.g. "P", "S", "S (partial)").
    pub transaction_type: String,
    /// Transaction date exactly as printed.
    pub transaction_date: String,
    /// Notification date exactly as printed.
    pub notification_date: String,
    /// Canonical amount range label.
    pub amount: String,
    /// Filing status continuation value; may be empty.
    pub filing_status: String,
    /// Description continuation value; may be empty.
    pub description: String,
}

/// Identifier of one disclosure document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocId(String);

impl DocId {
    /// Creates a new document id.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the document was filed electronically and has a
    /// machine-readable transaction report. Paper filings (other leading
    /// digits) are scanned images with no extractable text.
    #[must_use]
    pub fn is_electronic(&self) -> bool {
        self.0.starts_with('2')
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A validated disclosure filing year.
///
/// The public archive starts in 2014 and years in the future have no index,
/// so construction rejects anything outside that window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilingYear(i32);

impl FilingYear {
    /// Creates a filing year, validating the supported range.
    pub fn new(year: i32) -> Result<Self> {
        if year < FIRST_DISCLOSURE_YEAR {
            return Err(DisclosureError::InvalidParameter(format!(
                "The year must be {} or later: {}",
                FIRST_DISCLOSURE_YEAR, year
            )));
        }
        let current = Utc::now().year();
        if year > current {
            return Err(DisclosureError::InvalidParameter(format!(
                "The year must be the current year or earlier: {}",
                year
            )));
        }
        Ok(Self(year))
    }

    /// Returns the current calendar year as a filing year.
    #[must_use]
    pub fn current() -> Self {
        Self(Utc::now().year())
    }

    /// Returns the year value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for FilingYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the annual disclosure index.
///
/// The index lists every filing for a year; only periodic transaction
/// reports with an electronic document id lead to parseable documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    /// Honorific prefix, when present.
    pub prefix: Option<String>,
    /// Member last name.
    pub last: String,
    /// Member first name.
    pub first: String,
    /// Name suffix, when present.
    pub suffix: Option<String>,
    /// Filing type code (`P` for periodic transaction reports).
    pub filing_type: String,
    /// State and district code (e.g. "CA11").
    pub state_district: String,
    /// Filing year.
    pub year: i32,
    /// Filing date exactly as listed.
    pub filing_date: String,
    /// Document id, when one exists.
    pub doc_id: Option<DocId>,
}

impl Filing {
    /// Returns true for periodic transaction reports.
    #[must_use]
    pub fn is_ptr(&self) -> bool {
        self.filing_type == "P"
    }

    /// Returns the member name used to label extracted records.
    #[must_use]
    pub fn member_name(&self) -> &str {
        self.last.trim()
    }
}
