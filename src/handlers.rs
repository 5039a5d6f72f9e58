use actix_web::error::{BlockingError, InternalError, JsonPayloadError};
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::catalog::{CatalogError, CatalogService, ProductFilter};
use crate::models::{ProductInput, ValidationError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("blocking operation canceled")]
    Canceled(#[from] BlockingError),
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Catalog(CatalogError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Catalog(CatalogError::Unconfirmed) => StatusCode::BAD_REQUEST,
            ApiError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Catalog(CatalogError::Database(_))
            | ApiError::Catalog(CatalogError::Pool(_))
            | ApiError::Canceled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Catalog(CatalogError::Database(err)) => {
                error!("Database error: {err}");
                HttpResponse::InternalServerError().json(json!({"error": "database error"}))
            }
            ApiError::Catalog(CatalogError::Pool(err)) => {
                error!("Connection pool error: {err}");
                HttpResponse::InternalServerError().json(json!({"error": "connection pool error"}))
            }
            ApiError::Canceled(err) => {
                error!("Blocking operation error: {err}");
                HttpResponse::InternalServerError().json(json!({"error": "internal error"}))
            }
            other => HttpResponse::build(self.status_code()).json(json!({"error": other.to_string()})),
        }
    }
}

/// Turns a raw query-string value into a typed boolean before any business
/// logic sees it. Accepts the usual spellings; anything else is a client
/// error rather than a silent false.
fn parse_bool_param(name: &str, value: Option<&str>) -> Result<Option<bool>, CatalogError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(Some(true)),
            "false" | "no" | "n" | "0" => Ok(Some(false)),
            _ => Err(ValidationError(format!("{name} must be a boolean, got '{raw}'")).into()),
        },
    }
}

/// Rewrites body deserialization failures into the service's JSON error
/// shape; a wrong content type keeps its own status.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let status = match &err {
            JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        let body = HttpResponse::build(status).json(json!({"error": err.to_string()}));
        InternalError::from_response(err, body).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let body = HttpResponse::BadRequest().json(json!({"error": err.to_string()}));
        InternalError::from_response(err, body).into()
    })
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "name": "Products REST API Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Provides a RESTful API for managing the product catalog",
        "endpoints": {
            "list_products": "/products",
            "create_product": "/products (POST)",
            "get_product": "/products/{id}",
            "update_product": "/products/{id} (PUT)",
            "delete_product": "/products/{id} (DELETE)",
            "favorite_product": "/products/{id}/favorite (PUT)",
            "unfavorite_product": "/products/{id}/unfavorite (PUT)",
            "discontinue_product": "/products/{id}/discontinue (POST)",
        },
        "status": "healthy",
    }))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "OK"}))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub availability: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_products(
    catalog: web::Data<CatalogService>,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, ApiError> {
    let params = params.into_inner();
    info!("Request for product list: {params:?}");

    let availability = parse_bool_param("availability", params.availability.as_deref())?;
    let filter = ProductFilter {
        name: params.name,
        category: params.category,
        availability,
    };
    let (page, limit) = (params.page, params.limit);

    let svc = catalog.get_ref().clone();
    let found = web::block(move || svc.list(&filter, page, limit)).await??;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn get_product(
    catalog: web::Data<CatalogService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!("Request to retrieve product with id {id}");

    let svc = catalog.get_ref().clone();
    let product = web::block(move || svc.get(id)).await??;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn create_product(
    catalog: web::Data<CatalogService>,
    input: web::Json<ProductInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    info!("Request to create a product");

    let svc = catalog.get_ref().clone();
    let product = web::block(move || svc.create(&input)).await??;
    let location = format!("/products/{}", product.id);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(product))
}

pub async fn update_product(
    catalog: web::Data<CatalogService>,
    path: web::Path<i32>,
    input: web::Json<ProductInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = input.into_inner();
    info!("Request to update product with id {id}");

    let svc = catalog.get_ref().clone();
    let product = web::block(move || svc.update(id, &input)).await??;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn delete_product(
    catalog: web::Data<CatalogService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!("Request to delete product with id {id}");

    let svc = catalog.get_ref().clone();
    web::block(move || svc.delete(id)).await??;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn favorite_product(
    catalog: web::Data<CatalogService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!("Request to favorite product with id {id}");

    let svc = catalog.get_ref().clone();
    let product = web::block(move || svc.set_favorited(id, true)).await??;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn unfavorite_product(
    catalog: web::Data<CatalogService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!("Request to unfavorite product with id {id}");

    let svc = catalog.get_ref().clone();
    let product = web::block(move || svc.set_favorited(id, false)).await??;
    Ok(HttpResponse::Ok().json(product))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    pub confirm: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmBody {
    pub confirm: Option<bool>,
}

pub async fn discontinue_product(
    catalog: web::Data<CatalogService>,
    path: web::Path<i32>,
    params: web::Query<ConfirmParams>,
    body: Option<web::Json<ConfirmBody>>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!("Request to discontinue product with id {id}");

    // The query parameter wins over the body when both carry a flag.
    let from_query = parse_bool_param("confirm", params.confirm.as_deref())?;
    let from_body = body.and_then(|body| body.confirm);
    let confirmed = from_query.or(from_body).unwrap_or(false);

    let svc = catalog.get_ref().clone();
    let product = web::block(move || svc.discontinue(id, confirmed)).await??;
    Ok(HttpResponse::Ok().json(product))
}

#[cfg(test)]
mod tests {
    use super::parse_bool_param;
    use crate::catalog::CatalogError;

    #[test]
    fn accepted_boolean_spellings_parse() {
        for raw in ["true", "TRUE", "Yes", "y", "1"] {
            assert_eq!(parse_bool_param("confirm", Some(raw)).unwrap(), Some(true));
        }
        for raw in ["false", "FALSE", "No", "n", "0"] {
            assert_eq!(parse_bool_param("confirm", Some(raw)).unwrap(), Some(false));
        }
    }

    #[test]
    fn absent_value_parses_to_none() {
        assert_eq!(parse_bool_param("confirm", None).unwrap(), None);
    }

    #[test]
    fn garbled_value_is_a_validation_error() {
        let err = parse_bool_param("availability", Some("banana")).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(err.to_string().contains("availability must be a boolean"));
    }
}
