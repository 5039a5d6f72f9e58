//! REST service for a product catalog backed by SQLite.

pub mod catalog;
pub mod db;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod schema;
