//! Canonical transaction amount ranges.
//!
//! Extracted report text keeps only the lower bound of the amount column.
//! [`amount_range`] maps each known lower bound back onto the full range
//! label used on the printed forms.

/// Maps a raw amount token onto its canonical range label.
///
/// Tokens outside the nine known lower bounds pass through unchanged, so a
/// document with an unexpected amount column still produces a record.
#[must_use]
pub fn amount_range(raw: &str) -> &str {
    match raw {
        "$0" => "None",
        "$1" => "$1 - $15,000",
        "$15,001" => "$15,001 - $50,000",
        "$50,001" => "$50,001 - $100,000",
        "$100,001" => "$100,001 - $250,000",
        "$250,001" => "$250,001 - $500,000",
        "$500,001" => "$500,001 - $1,000,000",
        "$1,000,001" => "$1,000,001 - $5,000,000",
        "$5,000,001" => "$5,000,001 - $25,000,000",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_lower_bounds() {
        let cases = [
            ("$0", "None"),
            ("$1", "$1 - $15,000"),
            ("$15,001", "$15,001 - $50,000"),
            ("$50,001", "$50,001 - $100,000"),
            ("$100,001", "$100,001 - $250,000"),
            ("$250,001", "$250,001 - $500,000"),
            ("$500,001", "$500,001 - $1,000,000"),
            ("$1,000,001", "$1,000,001 - $5,000,000"),
            ("$5,000,001", "$5,000,001 - $25,000,000"),
        ];
        for (raw, label) in cases {
            assert_eq!(amount_range(raw), label);
        }
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        assert_eq!(amount_range("$25,000,001"), "$25,000,001");
        assert_eq!(amount_range("Spread"), "Spread");
        assert_eq!(amount_range(""), "");
    }
}
