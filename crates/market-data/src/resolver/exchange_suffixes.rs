//! Indian exchange suffixes as used by Yahoo Finance symbols.
//!
//! Ledger users record bare tickers (`RELIANCE`) or BSE scrip codes
//! (`500325`). Yahoo needs the exchange suffix to find them.

use std::borrow::Cow;

/// National Stock Exchange of India
pub const NSE_SUFFIX: &str = ".NS";

/// Bombay Stock Exchange
pub const BSE_SUFFIX: &str = ".BO";

/// Qualify a stored ticker with its exchange suffix.
///
/// Symbols that already carry a suffix (contain `.`) are returned unchanged.
/// All-digit symbols are BSE scrip codes; anything else is treated as NSE.
pub fn qualify_symbol(symbol: &str) -> Cow<'_, str> {
    if symbol.contains('.') {
        return Cow::Borrowed(symbol);
    }
    if !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_digit()) {
        Cow::Owned(format!("{}{}", symbol, BSE_SUFFIX))
    } else {
        Cow::Owned(format!("{}{}", symbol, NSE_SUFFIX))
    }
}

/// Extract the bare ticker from a provider symbol.
///
/// Only the NSE and BSE suffixes are stripped, so share classes like `BRK.B`
/// stay intact.
pub fn strip_exchange_suffix(symbol: &str) -> &str {
    symbol
        .strip_suffix(NSE_SUFFIX)
        .or_else(|| symbol.strip_suffix(BSE_SUFFIX))
        .unwrap_or(symbol)
}
