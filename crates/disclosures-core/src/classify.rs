//! Line classification for periodic transaction report text.
//!
//! Extracted report text interleaves primary record lines with
//! continuation lines that refine the record above them. [`classify`]
//! assigns each line to exactly one [`LineClass`]; the match arms are
//! ordered, so a line that could satisfy several patterns takes the first.

use crate::types::Owner;

/// Classification of one line of report text.
///
/// Lifetimes borrow from the classified line; payloads are the already
/// extracted values so the accumulator never re-parses a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// A primary record line. Carries the decoded owner code.
    RecordStart(Owner),
    /// The footnote marker ending the transaction table of a page.
    FootnoteTerminator,
    /// A parenthesized ticker on its own line, e.g. `(MSFT)`.
    ///
    /// The payload is the text between the first `(` and the `)` after it;
    /// an unterminated parenthetical yields an empty payload.
    TickerContinuation(&'a str),
    /// A wrapped asset line beginning with `Stock`.
    StockContinuation {
        /// Text before the `Stock` keyword, trimmed.
        asset: &'a str,
        /// First parenthesized ticker on the line; empty when absent.
        ticker: &'a str,
    },
    /// A filing status line, e.g. `F S: New`. Carries the value after the
    /// first colon, trimmed.
    FilingStatus(&'a str),
    /// A description line, e.g. `D: Exercised 100 call options`. Carries
    /// the value after the first colon, trimmed.
    Description(&'a str),
    /// Any line the accumulator should skip.
    Other,
}

/// Text between the first `(` and the next `)` of a line, when both exist.
fn parenthetical(line: &str) -> Option<&str> {
    let start = line.find('(')?;
    let rest = &line[start + 1..];
    let end = rest.find(')')?;
    Some(&rest[..end])
}

/// Value after the first `:` of a line, trimmed, when a colon exists.
fn after_colon(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, value)| value.trim())
}

/// Classifies one line of extracted report text.
///
/// The line is trimmed before matching. Only a line whose first
/// whitespace-separated token is an owner code opens a record, so assets
/// whose names merely begin with a code (e.g. `SPDR S&P 500 ETF`) stay
/// continuation or ignored lines.
#[must_use]
pub fn classify(line: &str) -> LineClass<'_> {
    let line = line.trim();
    if let Some(owner) = line.split_whitespace().next().and_then(Owner::from_code) {
        return LineClass::RecordStart(owner);
    }
    if line.starts_with("* For the") {
        return LineClass::FootnoteTerminator;
    }
    if line.starts_with('(') {
        return LineClass::TickerContinuation(parenthetical(line).unwrap_or_default());
    }
    if line.starts_with("Stock") {
        let asset = line
            .split_once("Stock")
            .map(|(before, _)| before.trim())
            .unwrap_or_default();
        return LineClass::StockContinuation {
            asset,
            ticker: parenthetical(line).unwrap_or_default(),
        };
    }
    if line.starts_with('F') {
        if let Some(value) = after_colon(line) {
            return LineClass::FilingStatus(value);
        }
    }
    if line.starts_with('D') {
        if let Some(value) = after_colon(line) {
            return LineClass::Description(value);
        }
    }
    LineClass::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_codes_open_records() {
        assert_eq!(
            classify("SP Microsoft Corporation (MSFT) P 01/02/2024 01/03/2024 $1,001 ..."),
            LineClass::RecordStart(Owner::Spouse)
        );
        assert_eq!(
            classify("  JT Apple Inc S 01/02/2024 01/03/2024 $15,001 ..."),
            LineClass::RecordStart(Owner::JointlyHeld)
        );
        assert_eq!(
            classify("DC Tesla Inc P 01/02/2024 01/03/2024 $1,001 ..."),
            LineClass::RecordStart(Owner::DependentChild)
        );
    }

    #[test]
    fn test_code_prefix_alone_is_not_a_record() {
        assert_eq!(classify("SPDR S&P 500 ETF Trust"), LineClass::Other);
        assert_eq!(classify("JTB Holdings"), LineClass::Other);
    }

    #[test]
    fn test_footnote_marker() {
        assert_eq!(
            classify("* For the complete list of asset type abbreviations, please visit"),
            LineClass::FootnoteTerminator
        );
    }

    #[test]
    fn test_ticker_continuations() {
        assert_eq!(classify("(MSFT)"), LineClass::TickerContinuation("MSFT"));
        assert_eq!(classify("(BRK.B) [ST]"), LineClass::TickerContinuation("BRK.B"));
        // Unterminated parenthetical degrades to an empty payload.
        assert_eq!(classify("(MSFT"), LineClass::TickerContinuation(""));
    }

    #[test]
    fn test_stock_continuations() {
        assert_eq!(
            classify("Stock Appreciation Right (HPE)"),
            LineClass::StockContinuation { asset: "", ticker: "HPE" }
        );
        assert_eq!(
            classify("Stock"),
            LineClass::StockContinuation { asset: "", ticker: "" }
        );
    }

    #[test]
    fn test_status_and_description_need_a_colon() {
        assert_eq!(classify("F S: New"), LineClass::FilingStatus("New"));
        assert_eq!(
            classify("D: Exercised 100 call options."),
            LineClass::Description("Exercised 100 call options.")
        );
        assert_eq!(classify("Filed electronically"), LineClass::Other);
        assert_eq!(classify("District of Columbia"), LineClass::Other);
    }

    #[test]
    fn test_ordering_prefers_earlier_classes() {
        // Starts with '(' even though it also contains a colon.
        assert_eq!(
            classify("(GOOGL): Class A"),
            LineClass::TickerContinuation("GOOGL")
        );
        // 'D' line with a parenthetical is still a description.
        assert_eq!(
            classify("D: sold (partial) position"),
            LineClass::Description("sold (partial) position")
        );
    }

    #[test]
    fn test_blank_lines_ignored() {
        assert_eq!(classify(""), LineClass::Other);
        assert_eq!(classify("   "), LineClass::Other);
    }
}
