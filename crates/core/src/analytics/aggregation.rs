//! Pure aggregation over a user's transactions and stock lots.
//!
//! Nothing here touches storage; the service loads the rows and passes in
//! the reference date so results are reproducible.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use super::analytics_model::{
    AnalyticsQuery, CategoryAmount, CategoryTotal, DashboardMetrics, DashboardSummary,
    Granularity, InvestmentMonth, InvestmentQuery, InvestmentSummary, SeriesPoint,
};
use crate::constants::{
    DEFAULT_DAY_BUCKETS, DEFAULT_MONTH_BUCKETS, EQUITY_STOCKS_LABEL,
    MONTH_BUCKETS_CLAMP_THRESHOLD, PERCENT_DECIMAL_PRECISION,
};
use crate::stocks::{total_open_invested, StockLot, TradeType};
use crate::transactions::{Transaction, TransactionType};
use crate::utils::time_utils::{
    get_days_between, month_end, month_start, months_between, shift_month,
};

/// Income, expense and active investment sums of a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
}

impl FlowTotals {
    pub fn add(&mut self, transaction: &Transaction) {
        match transaction.transaction_type {
            TransactionType::Income => self.income += transaction.amount,
            TransactionType::Expense => self.expense += transaction.amount,
            TransactionType::Investment if transaction.is_active() => {
                self.investment += transaction.amount
            }
            TransactionType::Investment => {}
        }
    }

    pub fn savings(&self) -> Decimal {
        self.income - self.expense
    }
}

pub fn totals<'a, I>(transactions: I) -> FlowTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = FlowTotals::default();
    for transaction in transactions {
        totals.add(transaction);
    }
    totals
}

fn totals_between(transactions: &[Transaction], start: NaiveDate, end: NaiveDate) -> FlowTotals {
    totals(
        transactions
            .iter()
            .filter(|t| t.date >= start && t.date <= end),
    )
}

/// Percentage change; 0 when there is no positive base to compare against.
pub fn growth_percent(current: Decimal, previous: Decimal) -> Decimal {
    if previous > Decimal::ZERO {
        (current - previous) / previous * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Net savings as a percentage of income, rounded to 2 places.
pub fn savings_rate(net_savings: Decimal, income: Decimal) -> Decimal {
    if income > Decimal::ZERO {
        (net_savings / income * Decimal::ONE_HUNDRED).round_dp_with_strategy(
            PERCENT_DECIMAL_PRECISION,
            RoundingStrategy::MidpointAwayFromZero,
        )
    } else {
        Decimal::ZERO
    }
}

/// A chart time slice with inclusive bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

fn day_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

fn day_bucket(day: NaiveDate) -> Bucket {
    Bucket {
        label: day_label(day),
        start: day,
        end: day,
    }
}

/// Lays out the series buckets, oldest first.
///
/// A closed window is tiled exactly: every day (or the part of every month)
/// inside it belongs to one bucket. Otherwise the last N buckets up to
/// `today` are used; long monthly requests are clamped to the user's history
/// starting at `earliest`.
pub fn plan_buckets(
    query: &AnalyticsQuery,
    today: NaiveDate,
    earliest: Option<NaiveDate>,
) -> Vec<Bucket> {
    if let Some((start, end)) = query.window.bounds() {
        if start > end {
            return Vec::new();
        }
        return match query.granularity {
            Granularity::Day => get_days_between(start, end)
                .into_iter()
                .map(day_bucket)
                .collect(),
            Granularity::Month => {
                let mut buckets = Vec::new();
                let mut month = month_start(start);
                while month <= end {
                    buckets.push(Bucket {
                        label: month_label(month),
                        start: month.max(start),
                        end: month_end(month).min(end),
                    });
                    month = shift_month(month, 1);
                }
                buckets
            }
        };
    }

    match query.granularity {
        Granularity::Day => {
            let count = query.buckets.unwrap_or(DEFAULT_DAY_BUCKETS);
            (0..count)
                .rev()
                .filter_map(|back| today.checked_sub_days(Days::new(back as u64)))
                .map(day_bucket)
                .collect()
        }
        Granularity::Month => {
            let mut count = query.buckets.unwrap_or(DEFAULT_MONTH_BUCKETS);
            if count > MONTH_BUCKETS_CLAMP_THRESHOLD {
                let history = earliest
                    .map(|first| (months_between(first, today) + 1).max(1) as u32)
                    .unwrap_or(1);
                count = count.min(history);
            }
            (0..count as i32)
                .rev()
                .map(|back| {
                    let month = shift_month(today, -back);
                    Bucket {
                        label: month_label(month),
                        start: month,
                        end: month_end(month),
                    }
                })
                .collect()
        }
    }
}

pub fn build_series(buckets: &[Bucket], transactions: &[Transaction]) -> Vec<SeriesPoint> {
    buckets
        .iter()
        .map(|bucket| {
            let sums = totals_between(transactions, bucket.start, bucket.end);
            SeriesPoint {
                label: bucket.label.clone(),
                start: bucket.start,
                end: bucket.end,
                income: sums.income,
                expense: sums.expense,
                investment: sums.investment,
                savings: sums.savings(),
            }
        })
        .collect()
}

fn sorted_amounts(by_name: HashMap<String, Decimal>) -> Vec<CategoryAmount> {
    let mut amounts: Vec<CategoryAmount> = by_name
        .into_iter()
        .map(|(name, value)| CategoryAmount { name, value })
        .collect();
    amounts.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    amounts
}

fn sum_by_category<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
) -> HashMap<String, Decimal> {
    let mut by_category: HashMap<String, Decimal> = HashMap::new();
    for transaction in transactions {
        *by_category
            .entry(transaction.category.clone())
            .or_insert(Decimal::ZERO) += transaction.amount;
    }
    by_category
}

/// Per-category sums of one transaction type, largest first.
/// Terminated investments are left out.
pub fn category_breakdown(
    transactions: &[Transaction],
    transaction_type: TransactionType,
) -> Vec<CategoryAmount> {
    sorted_amounts(sum_by_category(transactions.iter().filter(|t| {
        t.transaction_type == transaction_type && t.is_active()
    })))
}

/// Dashboard metrics, series and breakdowns.
///
/// `transactions` are the rows inside the requested window; `earliest` is the
/// date of the user's first transaction overall.
pub fn summarize_dashboard(
    transactions: &[Transaction],
    lots: &[StockLot],
    query: &AnalyticsQuery,
    today: NaiveDate,
    earliest: Option<NaiveDate>,
) -> DashboardSummary {
    let overall = totals(transactions);
    let stock_invested = total_open_invested(lots);
    let net_savings = overall.savings();

    let this_month = totals_between(transactions, month_start(today), month_end(today));
    let previous = shift_month(today, -1);
    let last_month = totals_between(transactions, previous, month_end(previous));

    let metrics = DashboardMetrics {
        total_income: overall.income,
        total_expenses: overall.expense,
        net_savings,
        total_investments: overall.investment + stock_invested,
        this_month_income: this_month.income,
        this_month_expenses: this_month.expense,
        this_month_investments: this_month.investment,
        last_month_income: last_month.income,
        last_month_expenses: last_month.expense,
        last_month_investments: last_month.investment,
        income_growth: growth_percent(this_month.income, last_month.income),
        expense_growth: growth_percent(this_month.expense, last_month.expense),
        investment_growth: growth_percent(this_month.investment, last_month.investment),
        savings_rate: savings_rate(net_savings, overall.income),
    };

    let buckets = plan_buckets(query, today, earliest);

    let mut investments = sum_by_category(
        transactions
            .iter()
            .filter(|t| t.is_active_investment()),
    );
    if stock_invested > Decimal::ZERO {
        *investments
            .entry(EQUITY_STOCKS_LABEL.to_string())
            .or_insert(Decimal::ZERO) += stock_invested;
    }

    DashboardSummary {
        metrics,
        series: build_series(&buckets, transactions),
        income_breakdown: category_breakdown(transactions, TransactionType::Income),
        expense_breakdown: category_breakdown(transactions, TransactionType::Expense),
        investment_allocation: sorted_amounts(investments),
    }
}

/// Investment analytics over active investment transactions and stock lots.
pub fn summarize_investments(
    transactions: &[Transaction],
    lots: &[StockLot],
    query: &InvestmentQuery,
    today: NaiveDate,
) -> InvestmentSummary {
    let investments: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.is_active_investment() && query.window.contains(t.date))
        .collect();

    let mut by_category = sum_by_category(investments.iter().copied());
    let stock_invested = total_open_invested(lots);
    if stock_invested > Decimal::ZERO {
        *by_category
            .entry(EQUITY_STOCKS_LABEL.to_string())
            .or_insert(Decimal::ZERO) += stock_invested;
    }
    let allocation = sorted_amounts(by_category);
    let total_invested: Decimal = allocation.iter().map(|a| a.value).sum();

    // Investment amounts plus signed stock trade values
    let flows: Vec<(NaiveDate, Decimal)> = investments
        .iter()
        .map(|t| (t.date, t.amount))
        .chain(lots.iter().map(|lot| (lot.effective_date(), lot.signed_flow())))
        .collect();
    let this_month_start = month_start(today);
    let previous = shift_month(today, -1);
    let this_month_total: Decimal = flows
        .iter()
        .filter(|(date, _)| *date >= this_month_start)
        .map(|(_, amount)| *amount)
        .sum();
    let last_month_total: Decimal = flows
        .iter()
        .filter(|(date, _)| *date >= previous && *date <= month_end(previous))
        .map(|(_, amount)| *amount)
        .sum();

    let monthly_data = (0..query.history_months as i32)
        .rev()
        .map(|back| {
            let start = shift_month(today, -back);
            let end = month_end(start);
            let in_month = |date: NaiveDate| date >= start && date <= end;

            let month_investments: Vec<&Transaction> = investments
                .iter()
                .copied()
                .filter(|t| in_month(t.date))
                .collect();
            let month_buys: Vec<&StockLot> = lots
                .iter()
                .filter(|lot| lot.trade_type == TradeType::Buy)
                .filter(|lot| lot.trade_date.is_some_and(in_month))
                .collect();

            let mut month_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
            for transaction in &month_investments {
                *month_by_category
                    .entry(transaction.category.clone())
                    .or_insert(Decimal::ZERO) += transaction.amount;
            }
            let stocks_amount: Decimal = month_buys
                .iter()
                .map(|lot| lot.quantity * lot.buy_price)
                .sum();
            if stocks_amount > Decimal::ZERO {
                *month_by_category
                    .entry(EQUITY_STOCKS_LABEL.to_string())
                    .or_insert(Decimal::ZERO) += stocks_amount;
            }

            let amount: Decimal = month_by_category.values().copied().sum();
            InvestmentMonth {
                month: month_label(start),
                amount: amount.max(Decimal::ZERO),
                count: month_investments.len() + month_buys.len(),
                by_category: month_by_category,
            }
        })
        .collect();

    InvestmentSummary {
        total_invested,
        category_count: allocation.len(),
        monthly_growth: growth_percent(this_month_total, last_month_total),
        category_breakdown: allocation
            .iter()
            .map(|a| CategoryTotal {
                category: a.name.clone(),
                amount: a.value,
            })
            .collect(),
        categories: allocation.iter().map(|a| a.name.clone()).collect(),
        allocation,
        monthly_data,
    }
}
