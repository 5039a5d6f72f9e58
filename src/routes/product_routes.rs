use actix_web::web;

use crate::handlers;

pub fn product_routes() -> impl FnOnce(&mut web::ServiceConfig) {
    move |config| {
        config
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .route("/", web::get().to(handlers::index))
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/products")
                    .route("", web::post().to(handlers::create_product))
                    .route("", web::get().to(handlers::list_products))
                    .route("/{id}", web::get().to(handlers::get_product))
                    .route("/{id}", web::put().to(handlers::update_product))
                    .route("/{id}", web::delete().to(handlers::delete_product))
                    .route("/{id}/favorite", web::put().to(handlers::favorite_product))
                    .route("/{id}/unfavorite", web::put().to(handlers::unfavorite_product))
                    .route("/{id}/discontinue", web::post().to(handlers::discontinue_product)),
            );
    }
}
