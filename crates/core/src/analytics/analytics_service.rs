use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use super::aggregation::{summarize_dashboard, summarize_investments};
use super::analytics_model::{
    AnalyticsQuery, DashboardSummary, Granularity, InvestmentQuery, InvestmentSummary,
};
use super::analytics_traits::AnalyticsServiceTrait;
use crate::constants::MONTH_BUCKETS_CLAMP_THRESHOLD;
use crate::errors::Result;
use crate::stocks::StockRepositoryTrait;
use crate::transactions::TransactionRepositoryTrait;

/// Read-only aggregation over transactions and stock lots
pub struct AnalyticsService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    stock_repository: Arc<dyn StockRepositoryTrait>,
}

impl AnalyticsService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        stock_repository: Arc<dyn StockRepositoryTrait>,
    ) -> Self {
        Self {
            transaction_repository,
            stock_repository,
        }
    }

    /// The first-transaction date only matters for long trailing monthly series.
    fn needs_history(query: &AnalyticsQuery) -> bool {
        query.window.bounds().is_none()
            && query.granularity == Granularity::Month
            && query
                .buckets
                .is_some_and(|count| count > MONTH_BUCKETS_CLAMP_THRESHOLD)
    }
}

impl AnalyticsServiceTrait for AnalyticsService {
    fn dashboard(
        &self,
        user_id: &str,
        query: &AnalyticsQuery,
        today: NaiveDate,
    ) -> Result<DashboardSummary> {
        let transactions = self.transaction_repository.list_between(
            user_id,
            query.window.start,
            query.window.end,
        )?;
        // Holdings replay every lot; the window only bounds transactions
        let lots = self.stock_repository.list(user_id)?;
        let earliest = if Self::needs_history(query) {
            self.transaction_repository.earliest_date(user_id)?
        } else {
            None
        };
        debug!(
            "Dashboard for user {}: {} transactions, {} lots",
            user_id,
            transactions.len(),
            lots.len()
        );
        Ok(summarize_dashboard(
            &transactions,
            &lots,
            query,
            today,
            earliest,
        ))
    }

    fn investments(
        &self,
        user_id: &str,
        query: &InvestmentQuery,
        today: NaiveDate,
    ) -> Result<InvestmentSummary> {
        let transactions = self.transaction_repository.list_between(
            user_id,
            query.window.start,
            query.window.end,
        )?;
        let lots = self.stock_repository.list(user_id)?;
        Ok(summarize_investments(&transactions, &lots, query, today))
    }
}
