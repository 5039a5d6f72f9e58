#![allow(dead_code)]

use diesel::r2d2::ConnectionManager;
use diesel::SqliteConnection;
use tempfile::TempDir;

use catalog_service::db::{init_schema, DbPool};
use catalog_service::models::ProductInput;

/// A pooled SQLite database living in a temporary directory. The directory
/// is removed when the fixture is dropped.
pub struct TestDb {
    pub pool: DbPool,
    _dir: TempDir,
}

pub fn test_db() -> TestDb {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("catalog-test.db");
    let manager = ConnectionManager::<SqliteConnection>::new(path.to_string_lossy());
    let pool = DbPool::builder()
        .build(manager)
        .expect("build test connection pool");

    let mut conn = pool.get().expect("get connection from test pool");
    init_schema(&mut conn).expect("initialize test schema");

    TestDb { pool, _dir: dir }
}

pub fn product_input(name: &str, price: &str) -> ProductInput {
    ProductInput {
        name: Some(String::from(name)),
        description: Some(format!("Description of {name}")),
        price: Some(String::from(price)),
        image_url: Some(format!("https://example.com/images/{}.jpg", name.to_lowercase())),
        category: Some(String::from("General")),
        availability: Some(true),
        favorited: Some(false),
        discontinued: Some(false),
    }
}

pub fn minimal_input(name: &str, price: &str) -> ProductInput {
    ProductInput {
        name: Some(String::from(name)),
        price: Some(String::from(price)),
        ..Default::default()
    }
}
