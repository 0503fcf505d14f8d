#[cfg(test)]
mod tests {
    use crate::analytics::{
        AnalyticsQuery, AnalyticsService, AnalyticsServiceTrait, DateWindow, InvestmentQuery,
    };
    use crate::stocks::TradeType;
    use crate::test_fixtures::{
        date, stock_lot, transaction, MockStockRepository, MockTransactionRepository,
    };
    use crate::transactions::TransactionType::{Expense, Income, Investment};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn service(
        transactions: MockTransactionRepository,
        stocks: MockStockRepository,
    ) -> AnalyticsService {
        AnalyticsService::new(Arc::new(transactions), Arc::new(stocks))
    }

    #[test]
    fn test_dashboard_is_scoped_to_user() {
        let mut foreign = transaction(Income, "Salary", dec!(9999), date(2024, 3, 1));
        foreign.user_id = "user-2".to_string();
        let transactions = MockTransactionRepository::with(vec![
            transaction(Income, "Salary", dec!(100), date(2024, 3, 1)),
            foreign,
        ]);

        let summary = service(transactions, MockStockRepository::default())
            .dashboard("user-1", &AnalyticsQuery::default(), date(2024, 3, 15))
            .unwrap();
        assert_eq!(summary.metrics.total_income, dec!(100));
    }

    #[test]
    fn test_window_filters_transactions_but_not_lots() {
        let transactions = MockTransactionRepository::with(vec![
            transaction(Expense, "Rent", dec!(500), date(2024, 1, 5)),
            transaction(Expense, "Rent", dec!(700), date(2024, 2, 5)),
        ]);
        let stocks = MockStockRepository::with(vec![
            stock_lot("INFY", TradeType::Buy, dec!(1), dec!(100), Some(date(2024, 1, 2))),
            stock_lot("TCS", TradeType::Buy, dec!(1), dec!(300), Some(date(2024, 2, 2))),
        ]);
        let query = AnalyticsQuery {
            window: DateWindow::new(Some(date(2024, 2, 1)), Some(date(2024, 2, 29))),
            ..Default::default()
        };

        let summary = service(transactions, stocks)
            .dashboard("user-1", &query, date(2024, 3, 15))
            .unwrap();
        assert_eq!(summary.metrics.total_expenses, dec!(700));
        assert_eq!(summary.metrics.total_investments, dec!(400));
        assert_eq!(summary.series.len(), 1);
    }

    #[test]
    fn test_sell_inside_window_keeps_buy_from_before_it() {
        let lots = || {
            MockStockRepository::with(vec![
                stock_lot("INFY", TradeType::Buy, dec!(10), dec!(100), Some(date(2024, 1, 10))),
                stock_lot("INFY", TradeType::Sell, dec!(4), dec!(100), Some(date(2024, 2, 10))),
            ])
        };
        let window = DateWindow::new(Some(date(2024, 2, 1)), Some(date(2024, 2, 29)));

        let dashboard = service(MockTransactionRepository::default(), lots())
            .dashboard(
                "user-1",
                &AnalyticsQuery {
                    window,
                    ..Default::default()
                },
                date(2024, 3, 15),
            )
            .unwrap();
        assert_eq!(dashboard.metrics.total_investments, dec!(600));
        assert_eq!(dashboard.investment_allocation[0].name, "Equity Stocks");
        assert_eq!(dashboard.investment_allocation[0].value, dec!(600));

        let investments = service(MockTransactionRepository::default(), lots())
            .investments(
                "user-1",
                &InvestmentQuery {
                    window,
                    history_months: 3,
                },
                date(2024, 3, 15),
            )
            .unwrap();
        assert_eq!(investments.total_invested, dec!(600));
    }

    #[test]
    fn test_history_is_only_loaded_for_long_monthly_series() {
        let transactions = MockTransactionRepository::with(vec![transaction(
            Income,
            "Salary",
            dec!(1),
            date(2023, 11, 1),
        )]);
        let calls = transactions.earliest_calls.clone();
        let service = service(transactions, MockStockRepository::default());

        service
            .dashboard("user-1", &AnalyticsQuery::default(), date(2024, 3, 15))
            .unwrap();
        assert_eq!(*calls.lock().unwrap(), 0);

        let long = AnalyticsQuery {
            buckets: Some(36),
            ..Default::default()
        };
        let summary = service.dashboard("user-1", &long, date(2024, 3, 15)).unwrap();
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(summary.series.len(), 5);
        assert_eq!(summary.series[0].label, "Nov 2023");
    }

    #[test]
    fn test_investments_include_stock_cost() {
        let transactions = MockTransactionRepository::with(vec![transaction(
            Investment,
            "Mutual Funds",
            dec!(250),
            date(2024, 3, 1),
        )]);
        let stocks = MockStockRepository::with(vec![stock_lot(
            "ITC",
            TradeType::Buy,
            dec!(5),
            dec!(400),
            Some(date(2024, 3, 2)),
        )]);
        let query = InvestmentQuery {
            window: DateWindow::default(),
            history_months: 6,
        };

        let summary = service(transactions, stocks)
            .investments("user-1", &query, date(2024, 3, 15))
            .unwrap();
        assert_eq!(summary.total_invested, dec!(2250));
        assert_eq!(summary.allocation[0].name, "Equity Stocks");
        assert_eq!(summary.monthly_data.len(), 6);
    }
}
