//! The catalog service: list/filter/pagination rules and the product
//! mutations, speaking diesel against an injected connection pool.

use chrono::Utc;
use diesel::define_sql_function;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use log::{info, warn};
use thiserror::Error;

use crate::db::DbPool;
use crate::models::{Product, ProductInput, ValidationError};
use crate::schema::products;

define_sql_function! { fn lower(x: Text) -> Text; }
define_sql_function! { #[sql_name = "lower"] fn lower_nullable(x: Nullable<Text>) -> Nullable<Text>; }

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("product with id '{0}' was not found")]
    NotFound(i32),
    #[error("discontinuing requires confirmation; pass confirm=true to proceed")]
    Unconfirmed,
    #[error("database error")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error")]
    Pool(#[from] r2d2::Error),
}

/// Optional list predicates; supplying several narrows the result to records
/// matching all of them. Name and category match case-insensitive substrings,
/// availability matches exactly.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub availability: Option<bool>,
}

#[derive(Clone)]
pub struct CatalogService {
    pool: DbPool,
}

impl CatalogService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Returns the filtered catalog in insertion order (ascending id).
    /// Discontinued records never show up here. Pagination only kicks in when
    /// both `page` and `limit` are supplied; a page past the end is an empty
    /// result, not an error.
    pub fn list(
        &self,
        filter: &ProductFilter,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Product>, CatalogError> {
        let mut conn = self.pool.get()?;

        let mut query = products::table
            .filter(products::discontinued.eq(false))
            .order(products::id.asc())
            .select(Product::as_select())
            .into_boxed();

        if let Some(term) = &filter.name {
            query = query.filter(lower(products::name).like(substring_pattern(term)).escape('\\'));
        }
        if let Some(term) = &filter.category {
            query = query.filter(
                lower_nullable(products::category)
                    .like(substring_pattern(term))
                    .escape('\\'),
            );
        }
        if let Some(available) = filter.availability {
            query = query.filter(products::availability.eq(available));
        }
        if let Some((offset, limit)) = page_bounds(page, limit) {
            query = query.offset(offset).limit(limit);
        }

        let found = query.load::<Product>(&mut conn)?;
        info!("List query returned {} products", found.len());
        Ok(found)
    }

    /// Looks a product up by id. Direct lookup deliberately bypasses the
    /// discontinued filter, so discontinued records are still retrievable.
    pub fn get(&self, id: i32) -> Result<Product, CatalogError> {
        let mut conn = self.pool.get()?;
        info!("Processing lookup for id {id}");
        find_product(&mut conn, id)?.ok_or(CatalogError::NotFound(id))
    }

    /// Validates the payload, persists a new record and returns it with its
    /// store-assigned id and timestamps.
    pub fn create(&self, input: &ProductInput) -> Result<Product, CatalogError> {
        let record = input.validate()?;
        let mut conn = self.pool.get()?;
        let product = diesel::insert_into(products::table)
            .values(&record)
            .returning(Product::as_select())
            .get_result(&mut conn)?;
        info!("Created product '{}' with id {}", product.name, product.id);
        Ok(product)
    }

    /// Full replacement of a product's content fields. The id is immutable,
    /// the favorited/discontinued flags belong to their dedicated operations
    /// and are preserved as-is, and `updated_date` is refreshed.
    pub fn update(&self, id: i32, input: &ProductInput) -> Result<Product, CatalogError> {
        let mut conn = self.pool.get()?;
        let mut product = find_active(&mut conn, id)?;
        let fields = input.validate()?;

        product.name = fields.name;
        product.description = fields.description;
        product.price = fields.price;
        product.image_url = fields.image_url;
        product.category = fields.category;
        product.availability = fields.availability;
        product.updated_date = fields.updated_date;

        let updated = diesel::update(products::table.find(id))
            .set(&product)
            .returning(Product::as_select())
            .get_result(&mut conn)?;
        info!("Updated product with id {}", updated.id);
        Ok(updated)
    }

    /// Removes a product if it exists. Deleting an unknown id is a no-op, not
    /// an error; the operation is idempotent.
    pub fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            warn!("Product with id {id} not found. Nothing to delete.");
        } else {
            info!("Deleted product with id {id}");
        }
        Ok(())
    }

    /// Sets the favorited flag to the given value and refreshes
    /// `updated_date`.
    pub fn set_favorited(&self, id: i32, value: bool) -> Result<Product, CatalogError> {
        let mut conn = self.pool.get()?;
        let product = find_active(&mut conn, id)?;
        let updated = diesel::update(products::table.find(product.id))
            .set((
                products::favorited.eq(value),
                products::updated_date.eq(Utc::now().naive_utc()),
            ))
            .returning(Product::as_select())
            .get_result(&mut conn)?;
        info!("Set favorited={value} on product with id {id}");
        Ok(updated)
    }

    /// Marks a product as discontinued, hiding it from list results while
    /// keeping it retrievable by id. Requires an explicit confirmation and
    /// cannot be reversed through this service.
    pub fn discontinue(&self, id: i32, confirmed: bool) -> Result<Product, CatalogError> {
        if !confirmed {
            warn!("Refusing to discontinue product {id} without confirmation");
            return Err(CatalogError::Unconfirmed);
        }
        let mut conn = self.pool.get()?;
        let product = find_active(&mut conn, id)?;
        let updated = diesel::update(products::table.find(product.id))
            .set((
                products::discontinued.eq(true),
                products::updated_date.eq(Utc::now().naive_utc()),
            ))
            .returning(Product::as_select())
            .get_result(&mut conn)?;
        info!("Discontinued product with id {id}");
        Ok(updated)
    }
}

fn find_product(conn: &mut SqliteConnection, id: i32) -> Result<Option<Product>, CatalogError> {
    let product = products::table
        .find(id)
        .select(Product::as_select())
        .first::<Product>(conn)
        .optional()?;
    Ok(product)
}

/// Mutations treat discontinued records the same as missing ones; only direct
/// lookup and delete accept them.
fn find_active(conn: &mut SqliteConnection, id: i32) -> Result<Product, CatalogError> {
    match find_product(conn, id)? {
        Some(product) if !product.discontinued => Ok(product),
        _ => Err(CatalogError::NotFound(id)),
    }
}

/// Search terms match literally; LIKE metacharacters in the term are escaped
/// (the queries pass `ESCAPE '\'`).
fn substring_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Resolves the requested page into an SQL offset/limit pair. Pagination is
/// only in effect when both values are present; the limit is clamped into
/// [1, MAX_PAGE_SIZE] and the page to a minimum of 1.
fn page_bounds(page: Option<i64>, limit: Option<i64>) -> Option<(i64, i64)> {
    let (page, limit) = (page?, limit?);
    let page = page.max(1);
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    Some((page.saturating_sub(1).saturating_mul(limit), limit))
}
