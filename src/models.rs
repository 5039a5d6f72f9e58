//! Product records: the persisted model, the request payload shape and the
//! validation rules that turn one into the other.

use chrono::{NaiveDateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable, Selectable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::products;

pub const NAME_MAX_CHARS: usize = 63;
pub const DESCRIPTION_MAX_CHARS: usize = 1023;
pub const IMAGE_URL_MAX_CHARS: usize = 1023;
pub const CATEGORY_MAX_CHARS: usize = 63;
pub const PRICE_MAX_INTEGER_DIGITS: u32 = 12;

/// Raised when a request payload cannot be turned into a valid product.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct ValidationError(pub String);

#[derive(Debug, Clone, Queryable, Selectable, AsChangeset, Serialize)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    // Normalized decimal string with two fractional digits; never a float.
    pub price: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub availability: bool,
    pub favorited: bool,
    pub discontinued: bool,
    pub created_date: NaiveDateTime,
    pub updated_date: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub availability: bool,
    pub favorited: bool,
    pub discontinued: bool,
    pub created_date: NaiveDateTime,
    pub updated_date: NaiveDateTime,
}

/// Loosely typed create/update payload. Every field is optional so that
/// validation can report what is missing; unknown fields (including `id`,
/// which is never client-assigned) are ignored by serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub availability: Option<bool>,
    pub favorited: Option<bool>,
    pub discontinued: Option<bool>,
}

impl ProductInput {
    /// Checks every field constraint and produces an insertable record with
    /// freshly assigned timestamps. Booleans fall back to their defaults
    /// (available, not favorited, not discontinued) when absent.
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        let name = match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            Some(_) => return Err(ValidationError("name must not be empty".to_string())),
            None => return Err(ValidationError("missing name".to_string())),
        };
        check_length("name", &name, NAME_MAX_CHARS)?;

        let price = match &self.price {
            Some(raw) => normalize_price(raw)?,
            None => return Err(ValidationError("missing price".to_string())),
        };

        if let Some(description) = &self.description {
            check_length("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        if let Some(image_url) = &self.image_url {
            check_length("image_url", image_url, IMAGE_URL_MAX_CHARS)?;
        }
        if let Some(category) = &self.category {
            check_length("category", category, CATEGORY_MAX_CHARS)?;
        }

        let now = Utc::now().naive_utc();
        Ok(NewProduct {
            name,
            description: self.description.clone(),
            price,
            image_url: self.image_url.clone(),
            category: self.category.clone(),
            availability: self.availability.unwrap_or(true),
            favorited: self.favorited.unwrap_or(false),
            discontinued: self.discontinued.unwrap_or(false),
            created_date: now,
            updated_date: now,
        })
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Parses a price string into a non-negative decimal with at most two
/// fractional digits and at most twelve integer digits, then rescales it to
/// exactly two, so "12.9" is stored and served as "12.90". The magnitude
/// bound keeps the rescale exact (`Decimal` cannot represent huge values at
/// scale 2). Prices only ever exist as decimal strings; going through a
/// float would lose the exact representation.
fn normalize_price(raw: &str) -> Result<String, ValidationError> {
    let parsed: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError(format!("price '{raw}' is not a valid decimal")))?;
    if parsed < Decimal::ZERO {
        return Err(ValidationError("price must not be negative".to_string()));
    }
    if parsed.scale() > 2 {
        return Err(ValidationError(
            "price must have at most 2 decimal places".to_string(),
        ));
    }
    if parsed >= Decimal::from(10_i64.pow(PRICE_MAX_INTEGER_DIGITS)) {
        return Err(ValidationError(format!(
            "price must have at most {PRICE_MAX_INTEGER_DIGITS} digits before the decimal point"
        )));
    }
    let mut price = parsed;
    price.rescale(2);
    Ok(price.to_string())
}
