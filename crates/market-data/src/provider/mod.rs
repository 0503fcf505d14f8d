//! Market data provider abstractions and implementations.
//!
//! Providers receive exchange-qualified symbols. Qualification of stored
//! tickers happens in the resolver module, not in the providers themselves.

mod traits;

pub mod rapidapi_yahoo;

pub use traits::MarketDataProvider;
