//! Categories module - domain models, services, and traits.

mod categories_constants;
mod categories_model;
mod categories_service;
mod categories_traits;

#[cfg(test)]
mod categories_service_tests;

pub use categories_constants::*;
pub use categories_model::{Category, CategoryGroup, CategoryInput, NewCategory};
pub use categories_service::CategoryService;
pub use categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
