//! # Seed Data Generator
//!
//! Stocks a development database with categories and products.
//!
//! ## Usage
//! ```bash
//! # Insert the full menu (default)
//! cargo run -p storefront-db --bin seed
//!
//! # Only the first 10 products, 50 units each
//! cargo run -p storefront-db --bin seed -- --count 10 --stock 50
//!
//! # Specify database path
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db
//! ```
//!
//! Prices are in minor units. Seeding is skipped when the catalog is not
//! empty.

use anyhow::{bail, Context};
use std::env;
use std::collections::HashMap;
use storefront_core::validation::{validate_new_category, validate_new_product};
use storefront_core::{Money, NewCategory, NewProduct};
use storefront_db::{Database, DbConfig};

/// Categories used for development data: (name, description).
const CATEGORIES: &[(&str, &str)] = &[
    ("Minuman", "Kopi, teh, dan minuman dingin"),
    ("Makanan", "Hidangan utama"),
    ("Camilan", "Gorengan dan kudapan manis"),
];

/// Menu used for development data: (name, price in minor units, category).
const MENU: &[(&str, i64, &str)] = &[
    ("Kopi Susu", 1800, "Minuman"),
    ("Kopi Hitam", 1200, "Minuman"),
    ("Es Teh Manis", 500, "Minuman"),
    ("Es Jeruk", 700, "Minuman"),
    ("Teh Botol", 600, "Minuman"),
    ("Air Mineral", 400, "Minuman"),
    ("Nasi Goreng", 2500, "Makanan"),
    ("Mie Goreng", 2200, "Makanan"),
    ("Nasi Uduk", 1500, "Makanan"),
    ("Ayam Geprek", 2300, "Makanan"),
    ("Sate Ayam", 2800, "Makanan"),
    ("Bakso", 2000, "Makanan"),
    ("Soto Ayam", 2100, "Makanan"),
    ("Gado-Gado", 1900, "Makanan"),
    ("Roti Bakar", 1400, "Camilan"),
    ("Pisang Goreng", 1000, "Camilan"),
    ("Martabak Manis", 3500, "Camilan"),
    ("Kerupuk", 300, "Camilan"),
    ("Tempe Mendoan", 800, "Camilan"),
    ("Es Campur", 1600, "Minuman"),
];

const DEFAULT_STOCK: i64 = 100;
const DEFAULT_DB_PATH: &str = "./storefront.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = MENU.len();
    let mut stock: i64 = DEFAULT_STOCK;
    let mut db_path = String::from(DEFAULT_DB_PATH);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                let value = args.get(i + 1).context("--count needs a value")?;
                count = value.parse().context("--count must be a number")?;
                i += 1;
            }
            "--stock" | "-s" => {
                let value = args.get(i + 1).context("--stock needs a value")?;
                stock = value.parse().context("--stock must be a number")?;
                i += 1;
            }
            "--db" | "-d" => {
                db_path = args.get(i + 1).context("--db needs a value")?.clone();
                i += 1;
            }
            "--help" | "-h" => {
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to insert (default: {})", MENU.len());
                println!("  -s, --stock <N>    Units on hand per product (default: {})", DEFAULT_STOCK);
                println!("  -d, --db <PATH>    Database file path (default: {})", DEFAULT_DB_PATH);
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    println!("Storefront Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count.min(MENU.len()));
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut category_ids = HashMap::new();
    for (name, description) in CATEGORIES {
        let category = NewCategory {
            name: name.to_string(),
            description: Some(description.to_string()),
        };
        validate_new_category(&category).with_context(|| format!("invalid category {name}"))?;

        let created = db
            .categories()
            .insert(&category)
            .await
            .with_context(|| format!("inserting category {name}"))?;
        println!("  category #{:<3} {}", created.id, created.name);
        category_ids.insert(*name, created.id);
    }
    println!();

    let mut inserted = 0;
    for (name, price_cents, category) in MENU.iter().take(count) {
        let product = NewProduct {
            name: name.to_string(),
            price: Money::from_cents(*price_cents),
            stock,
            category_id: category_ids.get(category).copied(),
        };
        validate_new_product(&product).with_context(|| format!("invalid product {name}"))?;

        let created = db
            .products()
            .insert(&product)
            .await
            .with_context(|| format!("inserting {name}"))?;
        println!("  #{:<3} {:<16} {:>8}  stock {}", created.id, created.name, created.price.to_string(), created.stock);
        inserted += 1;
    }

    println!();
    println!("✓ Inserted {} categories and {} products", category_ids.len(), inserted);

    db.close().await;
    Ok(())
}
