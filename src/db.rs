use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::SqliteConnection;
use std::env;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub fn establish_connection() -> DbPool {
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "catalog.db".to_string());
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder().build(manager).expect("Failed to create pool.")
}

/// Creates the products table if it does not exist yet. Safe to run on every
/// startup; the seed binary and the tests use it as well.
pub fn init_schema(conn: &mut SqliteConnection) -> QueryResult<()> {
    diesel::sql_query(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(63) NOT NULL,
            description VARCHAR(1023),
            price TEXT NOT NULL,
            image_url VARCHAR(1023),
            category VARCHAR(63),
            availability BOOLEAN NOT NULL DEFAULT 1,
            favorited BOOLEAN NOT NULL DEFAULT 0,
            discontinued BOOLEAN NOT NULL DEFAULT 0,
            created_date TIMESTAMP NOT NULL,
            updated_date TIMESTAMP NOT NULL
        )",
    )
    .execute(conn)?;
    Ok(())
}
