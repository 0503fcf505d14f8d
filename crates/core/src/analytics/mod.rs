//! Analytics module - dashboard and investment aggregates.

mod aggregation;
mod analytics_model;
mod analytics_service;
mod analytics_traits;


#[cfg(test)]
mod analytics_service_tests;

pub use aggregation::{
    build_series, category_breakdown, growth_percent, plan_buckets, savings_rate,
    summarize_dashboard, summarize_investments, totals, Bucket, FlowTotals,
};
pub use analytics_model::{
    AnalyticsParams, AnalyticsQuery, CategoryAmount, CategoryTotal, DashboardMetrics,
    DashboardSummary, DateWindow, Granularity, InvestmentMonth, InvestmentQuery,
    InvestmentSummary, SeriesPoint,
};
pub use analytics_service::AnalyticsService;
pub use analytics_traits::AnalyticsServiceTrait;
