//! Category domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::categories_constants::{DEFAULT_CATEGORIES, MAX_CATEGORY_NAME_LENGTH};
use crate::errors::{Error, FieldErrors, Result, ValidationError};

/// Top-level grouping of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryGroup {
    Income,
    Expense,
    Investment,
}

impl CategoryGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryGroup::Income => "Income",
            CategoryGroup::Expense => "Expense",
            CategoryGroup::Investment => "Investment",
        }
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryGroup {
    type Err = Error;

    /// Case-insensitive: `income`, `INCOME` and `Income` are the same group.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(CategoryGroup::Income),
            "expense" => Ok(CategoryGroup::Expense),
            "investment" => Ok(CategoryGroup::Investment),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown category group '{}'",
                other
            )))),
        }
    }
}

/// Domain model representing a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category_group: CategoryGroup,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated category ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub user_id: String,
    pub name: String,
    pub category_group: CategoryGroup,
    pub is_default: bool,
}

impl NewCategory {
    /// The seed set inserted for a freshly registered user.
    pub fn defaults_for(user_id: &str) -> Vec<NewCategory> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|(group, name)| NewCategory {
                user_id: user_id.to_string(),
                name: (*name).to_string(),
                category_group: *group,
                is_default: true,
            })
            .collect()
    }
}

/// Request payload for creating or renaming a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub category_group: Option<String>,
    pub name: Option<String>,
}

pub(crate) fn validate_category_name(name: Option<&str>, errors: &mut FieldErrors) -> String {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.add("name", "Name is required");
    } else if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        errors.add(
            "name",
            format!("Name must be at most {} characters", MAX_CATEGORY_NAME_LENGTH),
        );
    }
    name.to_string()
}

impl CategoryInput {
    pub fn validate(&self, user_id: &str) -> Result<NewCategory> {
        let mut errors = FieldErrors::new();

        let group = match self.category_group.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("categoryGroup", "Category group is required");
                None
            }
            Some(raw) => match raw.parse::<CategoryGroup>() {
                Ok(group) => Some(group),
                Err(_) => {
                    errors.add(
                        "categoryGroup",
                        "Category group must be one of Income, Expense, Investment",
                    );
                    None
                }
            },
        };
        let name = validate_category_name(self.name.as_deref(), &mut errors);

        errors.into_result()?;
        let category_group = group.ok_or_else(|| {
            Error::Validation(ValidationError::MissingField("categoryGroup".to_string()))
        })?;

        Ok(NewCategory {
            user_id: user_id.to_string(),
            name,
            category_group,
            is_default: false,
        })
    }
}
