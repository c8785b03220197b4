pub mod records;
pub mod schema;
