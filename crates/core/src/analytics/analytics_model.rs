//! Analytics request and response models.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MONTH_BUCKETS, MAX_DAY_WINDOW};
use crate::errors::{Error, FieldErrors, Result, ValidationError};
use crate::utils::time_utils::parse_date;

const MAX_MONTH_BUCKETS: u32 = 240;
const MAX_DAY_BUCKETS: u32 = MAX_DAY_WINDOW as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    #[default]
    Month,
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown granularity '{}'",
                other
            )))),
        }
    }
}

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| start <= date) && self.end.map_or(true, |end| date <= end)
    }

    /// Both bounds, when the window is closed.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsQuery {
    pub window: DateWindow,
    pub granularity: Granularity,
    /// Number of trailing buckets when the window is not closed
    pub buckets: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentQuery {
    pub window: DateWindow,
    pub history_months: u32,
}

/// Raw query-string parameters shared by the analytics endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub granularity: Option<String>,
    pub history_months: Option<String>,
    pub days: Option<String>,
}

fn parse_count(
    raw: Option<&str>,
    field: &str,
    max: u32,
    errors: &mut FieldErrors,
) -> Option<u32> {
    let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
    match raw.parse::<u32>() {
        Ok(n) if (1..=max).contains(&n) => Some(n),
        _ => {
            errors.add(field, format!("Must be an integer between 1 and {}", max));
            None
        }
    }
}

impl AnalyticsParams {
    fn window(&self, errors: &mut FieldErrors) -> DateWindow {
        let mut window = DateWindow::default();
        for (field, raw, slot) in [
            ("startDate", &self.start_date, &mut window.start),
            ("endDate", &self.end_date, &mut window.end),
        ] {
            if let Some(raw) = raw.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
                match parse_date(raw) {
                    Some(date) => *slot = Some(date),
                    None => errors.add(field, "Date must be formatted as YYYY-MM-DD"),
                }
            }
        }
        if let Some((start, end)) = window.bounds() {
            if start > end {
                errors.add("endDate", "End date must not be before start date");
            }
        }
        window
    }

    pub fn into_query(self) -> Result<AnalyticsQuery> {
        let mut errors = FieldErrors::new();
        let window = self.window(&mut errors);

        let granularity = match self.granularity.as_deref().map(str::trim) {
            None | Some("") => Granularity::Month,
            Some(raw) => raw.parse::<Granularity>().unwrap_or_else(|_| {
                errors.add("granularity", "Granularity must be day or month");
                Granularity::Month
            }),
        };

        let buckets = match granularity {
            Granularity::Month => parse_count(
                self.history_months.as_deref(),
                "historyMonths",
                MAX_MONTH_BUCKETS,
                &mut errors,
            ),
            Granularity::Day => {
                if let Some((start, end)) = window.bounds() {
                    if (end - start).num_days() >= MAX_DAY_WINDOW {
                        errors.add(
                            "endDate",
                            format!("Daily series cover at most {} days", MAX_DAY_WINDOW),
                        );
                    }
                }
                parse_count(self.days.as_deref(), "days", MAX_DAY_BUCKETS, &mut errors)
            }
        };

        errors.into_result()?;
        Ok(AnalyticsQuery {
            window,
            granularity,
            buckets,
        })
    }

    pub fn into_investment_query(self) -> Result<InvestmentQuery> {
        let mut errors = FieldErrors::new();
        let window = self.window(&mut errors);
        let history_months = parse_count(
            self.history_months.as_deref(),
            "historyMonths",
            MAX_MONTH_BUCKETS,
            &mut errors,
        )
        .unwrap_or(DEFAULT_MONTH_BUCKETS);

        errors.into_result()?;
        Ok(InvestmentQuery {
            window,
            history_months,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_savings: Decimal,
    pub total_investments: Decimal,
    pub this_month_income: Decimal,
    pub this_month_expenses: Decimal,
    pub this_month_investments: Decimal,
    pub last_month_income: Decimal,
    pub last_month_expenses: Decimal,
    pub last_month_investments: Decimal,
    pub income_growth: Decimal,
    pub expense_growth: Decimal,
    pub investment_growth: Decimal,
    pub savings_rate: Decimal,
}

/// One chart bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
    pub savings: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmount {
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub metrics: DashboardMetrics,
    pub series: Vec<SeriesPoint>,
    pub income_breakdown: Vec<CategoryAmount>,
    pub expense_breakdown: Vec<CategoryAmount>,
    pub investment_allocation: Vec<CategoryAmount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Monthly investment flow with per-category amounts flattened in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentMonth {
    pub month: String,
    pub amount: Decimal,
    pub count: usize,
    #[serde(flatten)]
    pub by_category: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    pub total_invested: Decimal,
    pub category_count: usize,
    pub monthly_growth: Decimal,
    pub category_breakdown: Vec<CategoryTotal>,
    pub allocation: Vec<CategoryAmount>,
    pub monthly_data: Vec<InvestmentMonth>,
    pub categories: Vec<String>,
}
