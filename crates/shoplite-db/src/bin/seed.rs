//! # Seed Data Generator
//!
//! Populates the database with the starter fixture and/or synthetic
//! customers for development.
//!
//! ## Usage
//! ```bash
//! # Load the deterministic fixture (15 products, 4 customers, 3 orders)
//! cargo run -p shoplite-db --bin seed -- --fixture
//!
//! # Add 50 synthetic customers with completed orders
//! cargo run -p shoplite-db --bin seed -- --random 50
//!
//! # Both, into a specific database
//! cargo run -p shoplite-db --bin seed -- --fixture --random 50 --db ./data/shoplite.db
//! ```
//!
//! The synthetic customers need products to buy, so `--random` on an empty
//! database is refused unless `--fixture` is also given.

use std::env;

use chrono::Local;
use shoplite_db::{fixtures, Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut load_fixture = false;
    let mut random_count: usize = 0;
    let mut db_path = env::var("SHOPLITE_DB").unwrap_or_else(|_| "./shoplite.db".to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--fixture" | "-f" => load_fixture = true,
            "--random" | "-r" => {
                if i + 1 < args.len() {
                    random_count = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shoplite Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -f, --fixture      Load the deterministic starter fixture");
                println!("  -r, --random <N>   Generate N synthetic customers with orders");
                println!("  -d, --db <PATH>    Database file path (default: ./shoplite.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    if !load_fixture && random_count == 0 {
        eprintln!("Nothing to do: pass --fixture and/or --random <N> (see --help)");
        return Ok(());
    }

    println!("Shoplite Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;
    println!("✓ Connected to database");

    if load_fixture {
        let existing = db.customers().count().await?;
        if existing > 0 {
            println!("⚠ Database already has {existing} customers");
            println!("  Skipping fixture to avoid duplicates.");
            println!("  Run init_db to start over.");
        } else {
            fixtures::seed_fixture(&db).await?;
            println!("✓ Fixture loaded: 15 products, 4 customers, 3 orders");
        }
    }

    if random_count > 0 {
        if db.products().count().await? == 0 {
            eprintln!("✗ No products to order from; run with --fixture first");
            db.close().await;
            return Ok(());
        }

        let start = std::time::Instant::now();
        let generated = fixtures::seed_random(&db, random_count, Local::now().date_naive()).await?;
        println!(
            "✓ Generated {} customers with orders in {:?}",
            generated,
            start.elapsed()
        );
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
