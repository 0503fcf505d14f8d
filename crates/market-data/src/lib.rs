//! PocketLedger Market Data Crate
//!
//! Fetches latest equity prices for the stock holdings kept in the ledger.
//!
//! # Overview
//!
//! - [`MarketDataProvider`] is the seam the core services depend on.
//! - [`RapidApiYahooProvider`] is the one concrete provider, backed by the
//!   Yahoo Finance quotes endpoint exposed through RapidAPI.
//! - [`qualify_symbol`] turns a bare Indian ticker into the exchange-qualified
//!   symbol the provider expects (`RELIANCE` -> `RELIANCE.NS`, `500325` -> `500325.BO`).
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |   stored symbol  | --> |  qualify_symbol  | --> |     Provider     |
//! +------------------+     +------------------+     +------------------+
//!                                                            |
//!                                                            v
//!                                                   +------------------+
//!                                                   |      Quote       |
//!                                                   +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;

pub use errors::MarketDataError;
pub use models::Quote;
pub use provider::rapidapi_yahoo::RapidApiYahooProvider;
pub use provider::MarketDataProvider;
pub use resolver::{qualify_symbol, strip_exchange_suffix, BSE_SUFFIX, NSE_SUFFIX};
