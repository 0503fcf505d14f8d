//! Transaction domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::CategoryGroup;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{Error, FieldErrors, Result, ValidationError};
use crate::utils::time_utils::parse_date;

const MAX_NOTES_LENGTH: usize = 500;
const MAX_LABEL_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Investment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Investment => "investment",
        }
    }

    /// Category group a transaction of this type is normally filed under.
    pub fn category_group(&self) -> CategoryGroup {
        match self {
            TransactionType::Income => CategoryGroup::Income,
            TransactionType::Expense => CategoryGroup::Expense,
            TransactionType::Investment => CategoryGroup::Investment,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "investment" => Ok(TransactionType::Investment),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown transaction type '{}'",
                other
            )))),
        }
    }
}

/// Lifecycle of an investment entry. Terminated investments are kept for
/// history but left out of active totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Active,
    Terminated,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Active => "active",
            TransactionStatus::Terminated => "terminated",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(TransactionStatus::Active),
            "terminated" => Ok(TransactionStatus::Terminated),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown transaction status '{}'",
                other
            )))),
        }
    }
}

/// Domain model representing a ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub category: String,
    pub sub_category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub status: Option<TransactionStatus>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// False only for explicitly terminated entries.
    pub fn is_active(&self) -> bool {
        self.status != Some(TransactionStatus::Terminated)
    }

    /// Investment entry that still counts towards invested totals.
    pub fn is_active_investment(&self) -> bool {
        self.transaction_type == TransactionType::Investment && self.is_active()
    }
}

/// Validated transaction ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: String,
    pub category_id: Option<String>,
    pub category: String,
    pub sub_category: Option<String>,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub status: Option<TransactionStatus>,
}

/// Request payload for creating or replacing a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub sub_category: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl TransactionInput {
    /// Checks every field and reports all violations at once.
    ///
    /// The category label may be left empty when a `categoryId` is given;
    /// the service fills it from the referenced category.
    pub fn validate(&self, user_id: &str) -> Result<NewTransaction> {
        let mut errors = FieldErrors::new();

        let transaction_type = match self.transaction_type.as_deref() {
            None => {
                errors.add("type", "Type is required");
                None
            }
            Some(raw) => match raw.parse::<TransactionType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.add("type", "Type must be one of income, expense, investment");
                    None
                }
            },
        };

        let category_id = non_blank(self.category_id.as_deref());
        let category = non_blank(self.category.as_deref()).unwrap_or_default();
        if category.is_empty() && category_id.is_none() {
            errors.add("category", "Category is required");
        } else if category.chars().count() > MAX_LABEL_LENGTH {
            errors.add(
                "category",
                format!("Category must be at most {} characters", MAX_LABEL_LENGTH),
            );
        }

        let sub_category = non_blank(self.sub_category.as_deref());
        if sub_category
            .as_ref()
            .is_some_and(|s| s.chars().count() > MAX_LABEL_LENGTH)
        {
            errors.add(
                "subCategory",
                format!("Sub-category must be at most {} characters", MAX_LABEL_LENGTH),
            );
        }

        match self.amount {
            None => errors.add("amount", "Amount is required"),
            Some(amount) if amount <= Decimal::ZERO => {
                errors.add("amount", "Amount must be positive")
            }
            Some(amount) => errors.check_magnitude("amount", amount),
        }

        let date = match self.date.as_deref() {
            None => {
                errors.add("date", "Date is required");
                None
            }
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.add("date", "Date must be formatted as YYYY-MM-DD");
                }
                parsed
            }
        };

        let notes = non_blank(self.notes.as_deref());
        if notes
            .as_ref()
            .is_some_and(|n| n.chars().count() > MAX_NOTES_LENGTH)
        {
            errors.add(
                "notes",
                format!("Notes must be at most {} characters", MAX_NOTES_LENGTH),
            );
        }

        let status = match non_blank(self.status.as_deref()) {
            None => None,
            Some(raw) => match raw.parse::<TransactionStatus>() {
                Ok(s) => Some(s),
                Err(_) => {
                    errors.add("status", "Status must be one of active, terminated");
                    None
                }
            },
        };

        errors.into_result()?;

        match (transaction_type, self.amount, date) {
            (Some(transaction_type), Some(amount), Some(date)) => Ok(NewTransaction {
                user_id: user_id.to_string(),
                category_id,
                category,
                sub_category,
                transaction_type,
                amount,
                date,
                notes,
                status,
            }),
            _ => Err(Error::Unexpected(
                "transaction validation passed with missing fields".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionSortField {
    #[default]
    Date,
    Amount,
    Category,
    Type,
}

impl FromStr for TransactionSortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            "type" => Ok(Self::Type),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown sort field '{}'",
                other
            )))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Row filters for transaction listings. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    /// Case-insensitive substring of the notes
    pub notes_contains: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub filter: TransactionFilter,
    pub sort_by: TransactionSortField,
    pub order: SortOrder,
    /// 1-based
    pub page: i64,
    pub limit: i64,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            filter: TransactionFilter::default(),
            sort_by: TransactionSortField::default(),
            order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TransactionQuery {
    /// Rows skipped before this page. Saturates instead of overflowing.
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.limit)
    }
}

/// Raw query-string parameters of the listing endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListParams {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    /// Searches the notes
    pub description: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl TransactionListParams {
    pub fn into_query(self) -> Result<TransactionQuery> {
        let mut errors = FieldErrors::new();
        let mut query = TransactionQuery::default();

        if let Some(raw) = non_blank(self.transaction_type.as_deref()) {
            match raw.parse::<TransactionType>() {
                Ok(t) => query.filter.transaction_type = Some(t),
                Err(_) => errors.add("type", "Type must be one of income, expense, investment"),
            }
        }
        query.filter.category = non_blank(self.category.as_deref());
        query.filter.notes_contains = non_blank(self.description.as_deref());

        for (field, raw, slot) in [
            ("startDate", &self.start_date, &mut query.filter.start_date),
            ("endDate", &self.end_date, &mut query.filter.end_date),
        ] {
            if let Some(raw) = non_blank(raw.as_deref()) {
                match parse_date(&raw) {
                    Some(date) => *slot = Some(date),
                    None => errors.add(field, "Date must be formatted as YYYY-MM-DD"),
                }
            }
        }

        for (field, raw, slot) in [
            ("minAmount", &self.min_amount, &mut query.filter.min_amount),
            ("maxAmount", &self.max_amount, &mut query.filter.max_amount),
        ] {
            if let Some(raw) = non_blank(raw.as_deref()) {
                match raw.parse::<Decimal>() {
                    Ok(amount) => *slot = Some(amount),
                    Err(_) => errors.add(field, "Amount must be a number"),
                }
            }
        }

        if let Some(raw) = non_blank(self.sort_by.as_deref()) {
            match raw.parse::<TransactionSortField>() {
                Ok(field) => query.sort_by = field,
                Err(_) => errors.add("sortBy", "Sort must be one of date, amount, category, type"),
            }
        }
        // Anything but "asc" sorts descending
        if self.order.as_deref() == Some("asc") {
            query.order = SortOrder::Asc;
        }

        if let Some(raw) = non_blank(self.page.as_deref()) {
            match raw.parse::<i64>() {
                Ok(page) if page >= 1 => query.page = page,
                _ => errors.add("page", "Page must be a positive integer"),
            }
        }
        if let Some(raw) = non_blank(self.limit.as_deref()) {
            match raw.parse::<i64>() {
                Ok(limit) if (1..=MAX_PAGE_SIZE).contains(&limit) => query.limit = limit,
                _ => errors.add(
                    "limit",
                    format!("Limit must be between 1 and {}", MAX_PAGE_SIZE),
                ),
            }
        }
        if (query.page - 1).checked_mul(query.limit).is_none() {
            errors.add("page", "Page is out of range");
        }

        errors.into_result()?;
        Ok(query)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub pages: i64,
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            total,
            pages,
            page,
            limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
}
