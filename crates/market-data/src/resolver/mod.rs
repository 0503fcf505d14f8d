//! Symbol qualification for exchange-suffixed providers.

mod exchange_suffixes;

pub use exchange_suffixes::{qualify_symbol, strip_exchange_suffix, BSE_SUFFIX, NSE_SUFFIX};
