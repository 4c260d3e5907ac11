use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::borrow::Cow;

use crate::config::DEFAULT_SYMBOL;

/// `$` followed by digits, optionally followed by a dot and exactly two digits.
/// The amount itself is capture group 1.
pub const AMOUNT_PATTERN: &str = r"\$(\d+(?:\.\d{2})?)";

static AMOUNT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(AMOUNT_PATTERN).expect("amount pattern is a valid regex"));

/// One dollar amount and what it becomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmountConversion {
    /// Matched text, e.g. `$89.99`
    pub original: String,
    /// Replacement text, e.g. `₵89.99`
    pub converted: String,
}

/// Output of [`CurrencyConverter::convert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub text: String,
    /// Number of `$<amount>` matches rewritten by the first pass
    pub amounts: usize,
    /// Number of bare `$` rewritten by the second pass
    pub bare: usize,
}

impl Conversion {
    /// True when the input contained no `$` at all
    pub fn is_unchanged(&self) -> bool {
        self.amounts == 0 && self.bare == 0
    }
}

/// Replaces `$` with a currency symbol in two passes.
///
/// The first pass rewrites `$<digits>` and `$<digits>.<2 digits>` into
/// `<symbol><digits>`, scanning once left to right with non-overlapping
/// matches. The second pass turns every `$` that is still present into a bare
/// `<symbol>`. The passes stay separate because only the first one carries
/// the amount across.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    symbol: String,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL)
    }
}

impl CurrencyConverter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// First pass: numeric amounts. Returns the new text and the match count.
    pub fn convert_amounts<'a>(&self, text: &'a str) -> (Cow<'a, str>, usize) {
        let mut count = 0;
        let converted = AMOUNT_REGEX.replace_all(text, |caps: &Captures| {
            count += 1;
            format!("{}{}", self.symbol, &caps[1])
        });
        (converted, count)
    }

    /// Second pass: every remaining `$`. Returns the new text and the count.
    pub fn convert_bare<'a>(&self, text: &'a str) -> (Cow<'a, str>, usize) {
        let count = text.matches('$').count();
        if count == 0 {
            return (Cow::Borrowed(text), 0);
        }
        (Cow::Owned(text.replace('$', &self.symbol)), count)
    }

    /// Runs both passes over `text`
    pub fn convert(&self, text: &str) -> Conversion {
        let (after_amounts, amounts) = self.convert_amounts(text);
        let (after_bare, bare) = self.convert_bare(&after_amounts);
        Conversion {
            text: after_bare.into_owned(),
            amounts,
            bare,
        }
    }

    /// Lists what the first pass would rewrite plus the raw `$` count, without
    /// producing the converted text.
    pub fn preview(&self, text: &str) -> (Vec<AmountConversion>, usize) {
        let amounts = AMOUNT_REGEX
            .captures_iter(text)
            .map(|caps| AmountConversion {
                original: caps[0].to_string(),
                converted: format!("{}{}", self.symbol, &caps[1]),
            })
            .collect();
        (amounts, text.matches('$').count())
    }
}
