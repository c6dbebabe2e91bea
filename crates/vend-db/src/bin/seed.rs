//! # Seed Data Generator
//!
//! Populates the database with a couple of accounts and products for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p vend-db --bin seed
//!
//! # Specify database path
//! cargo run -p vend-db --bin seed -- --db ./data/vend.db
//! ```
//!
//! ## Generated Data
//! - One seller account per vendor name below, credential "dev-credential"
//! - One buyer account ("buyer1") with an empty deposit
//! - A small catalog of classic vending-machine products, costs all
//!   multiples of five

use std::env;

use vend_core::Role;
use vend_db::{Database, DbConfig};

/// (product_name, cost, stock) per vendor
const CATALOG: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "drinks_inc",
        &[
            ("soda", 25, 10),
            ("water", 15, 24),
            ("iced_tea", 30, 8),
            ("energy_drink", 50, 6),
        ],
    ),
    (
        "snack_corner",
        &[
            ("chips", 20, 12),
            ("chocolate_bar", 35, 9),
            ("gum", 5, 40),
            ("cookies", 45, 5),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./vend_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Vend Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./vend_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Vend Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.accounts().get_by_username("buyer1").await?.is_some() {
        println!("⚠ Database already seeded.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    db.accounts()
        .create("buyer1", Role::Buyer, "dev-credential")
        .await?;
    println!("✓ Created buyer account: buyer1");

    let mut product_count = 0;
    for (vendor, products) in CATALOG {
        let seller = db
            .accounts()
            .create(vendor, Role::Seller, "dev-credential")
            .await?;

        for (name, cost, stock) in *products {
            db.products().insert(name, *cost, *stock, &seller.id).await?;
            product_count += 1;
        }

        println!(
            "✓ Created seller {} with {} products",
            vendor,
            products.len()
        );
    }

    println!();
    println!("Done: {} products seeded.", product_count);

    Ok(())
}
