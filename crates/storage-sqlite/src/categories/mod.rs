mod model;
mod repository;

pub use model::CategoryDB;
pub use repository::{insert_categories, CategoryRepository};
