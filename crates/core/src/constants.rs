/// Investment allocation label for the cost basis of open stock holdings
pub const EQUITY_STOCKS_LABEL: &str = "Equity Stocks";

/// Decimal precision for percentages (savings rate, growth, budget usage)
pub const PERCENT_DECIMAL_PRECISION: u32 = 2;

/// Largest amount, price or quantity a record may carry
pub const MAX_RECORD_VALUE: i64 = 1_000_000_000_000;

/// Finest precision accepted for amounts, prices and quantities
pub const MAX_DECIMAL_PLACES: u32 = 8;

/// Default page size for transaction listings
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a client may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default number of monthly buckets in dashboard series
pub const DEFAULT_MONTH_BUCKETS: u32 = 6;

/// Default number of daily buckets in dashboard series
pub const DEFAULT_DAY_BUCKETS: u32 = 30;

/// Monthly bucket requests above this are clamped to the user's history
pub const MONTH_BUCKETS_CLAMP_THRESHOLD: u32 = 12;

/// Longest explicit window that can be bucketed by day
pub const MAX_DAY_WINDOW: i64 = 366;
