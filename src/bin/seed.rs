use diesel::prelude::*;
use dotenvy::dotenv;
use std::env;

use catalog_service::db::init_schema;
use catalog_service::models::{NewProduct, ProductInput};
use catalog_service::schema::products;

fn sample_products() -> Vec<NewProduct> {
    let samples = vec![
        ProductInput {
            name: Some(String::from("Hat")),
            description: Some(String::from("A red fedora")),
            price: Some(String::from("59.95")),
            image_url: Some(String::from("https://example.com/images/hat.jpg")),
            category: Some(String::from("Apparel")),
            availability: Some(true),
            ..Default::default()
        },
        ProductInput {
            name: Some(String::from("Keyboard")),
            description: Some(String::from("A low-profile mechanical keyboard")),
            price: Some(String::from("129.00")),
            image_url: Some(String::from("https://example.com/images/keyboard.jpg")),
            category: Some(String::from("Electronics")),
            availability: Some(true),
            ..Default::default()
        },
        ProductInput {
            name: Some(String::from("Desk Lamp")),
            description: Some(String::from("An adjustable LED desk lamp")),
            price: Some(String::from("34.50")),
            image_url: None,
            category: Some(String::from("Furniture")),
            availability: Some(false),
            ..Default::default()
        },
        ProductInput {
            name: Some(String::from("Mug")),
            description: Some(String::from("A ceramic mug, holds 350ml")),
            price: Some(String::from("9.90")),
            image_url: Some(String::from("https://example.com/images/mug.jpg")),
            category: Some(String::from("Kitchen")),
            availability: Some(true),
            ..Default::default()
        },
    ];

    samples
        .into_iter()
        .map(|input| input.validate().expect("sample product is valid"))
        .collect()
}

fn main() {
    dotenv().ok();
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| String::from("catalog.db"));
    let mut conn = SqliteConnection::establish(&database_url)
        .expect("Failed to connect to the database");

    init_schema(&mut conn).expect("Failed to initialize the database schema");

    diesel::insert_into(products::table)
        .values(&sample_products())
        .execute(&mut conn)
        .expect("Failed to seed products");

    println!("Database seeded successfully.")
}
