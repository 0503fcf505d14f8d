use chrono::NaiveDate;

use super::analytics_model::{AnalyticsQuery, DashboardSummary, InvestmentQuery, InvestmentSummary};
use crate::errors::Result;

/// Trait for analytics service operations. `today` anchors the trailing
/// buckets and the month-over-month comparisons.
pub trait AnalyticsServiceTrait: Send + Sync {
    fn dashboard(
        &self,
        user_id: &str,
        query: &AnalyticsQuery,
        today: NaiveDate,
    ) -> Result<DashboardSummary>;

    fn investments(
        &self,
        user_id: &str,
        query: &InvestmentQuery,
        today: NaiveDate,
    ) -> Result<InvestmentSummary>;
}
