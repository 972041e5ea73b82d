pub mod manager;
pub mod models;
pub mod schema;
pub mod service;

pub use manager::{DatabaseError, DatabaseManager};
