use super::categories_model::CategoryGroup;

/// Categories seeded for every new account, in display order.
pub const DEFAULT_CATEGORIES: &[(CategoryGroup, &str)] = &[
    (CategoryGroup::Income, "Salary"),
    (CategoryGroup::Income, "Freelancing"),
    (CategoryGroup::Income, "Investment Returns"),
    (CategoryGroup::Expense, "Rent"),
    (CategoryGroup::Expense, "Groceries"),
    (CategoryGroup::Expense, "Utilities"),
    (CategoryGroup::Expense, "Entertainment"),
    (CategoryGroup::Expense, "Transportation"),
    (CategoryGroup::Expense, "Healthcare"),
    (CategoryGroup::Expense, "Insurance"),
    (CategoryGroup::Expense, "Investment Out"),
    (CategoryGroup::Investment, "Stocks"),
    (CategoryGroup::Investment, "Mutual Funds"),
    (CategoryGroup::Investment, "Real Estate"),
    (CategoryGroup::Investment, "Crypto"),
    (CategoryGroup::Investment, "Gold"),
    (CategoryGroup::Investment, "Bonds"),
    (CategoryGroup::Investment, "Fixed Deposits"),
];

/// Longest accepted category name
pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;
