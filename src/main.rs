use actix_web::{middleware, web, App, HttpServer};
use catalog_service::catalog::CatalogService;
use catalog_service::db::{establish_connection, init_schema};
use catalog_service::routes::product_routes::product_routes;
use dotenvy::dotenv;
use env_logger::Target;
use log::info;

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    env_logger::Builder::new()
        .target(Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let pool = establish_connection();
    {
        let mut conn = pool.get().expect("Failed to get a connection from the pool");
        init_schema(&mut conn).expect("Failed to initialize the database schema");
    }

    let catalog = CatalogService::new(pool);

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| String::from("0.0.0.0:8080"));
    info!("Starting catalog service on {bind_address}...");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(catalog.clone()))
            .wrap(middleware::Logger::default())
            .configure(product_routes())
    })
    .bind(bind_address)?
    .run()
    .await
}
