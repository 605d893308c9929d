//! # Schema Initializer
//!
//! Drops and recreates the whole Shoplite schema.
//!
//! ## Usage
//! ```bash
//! # Rebuild the default database
//! cargo run -p shoplite-db --bin init_db
//!
//! # Specify database path
//! cargo run -p shoplite-db --bin init_db -- --db ./data/shoplite.db
//! ```
//!
//! The database path can also come from the SHOPLITE_DB environment
//! variable (a `.env` file is honored); `--db` wins when both are set.

use std::env;

use shoplite_db::{schema, Database, DbConfig};

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

    let mut db_path = env::var("SHOPLITE_DB").unwrap_or_else(|_| "./shoplite.db".to_string());

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
                println!("Shoplite Schema Initializer");
                println!();
                println!("Usage: init_db [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./shoplite.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Shoplite Schema Initializer");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    // Rebuild does its own drop pass, so skip schema creation on connect.
    let config = DbConfig::new(&db_path).create_schema(false);
    let db = Database::new(config).await?;
    println!("✓ Connected to database");

    let failures = schema::rebuild(db.pool()).await;
    if failures > 0 {
        println!("⚠ {failures} schema statements failed (see log)");
    } else {
        println!("✓ Schema rebuilt");
    }

    db.close().await;
    Ok(())
}
