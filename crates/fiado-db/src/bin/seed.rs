//! # Seed Data Writer
//!
//! Writes the starting catalog and customer list into a database file,
//! replacing whatever documents were there.
//!
//! ## Usage
//! ```bash
//! # Default path ./fiado_dev.db
//! cargo run -p fiado-db --bin seed
//!
//! # Specify database path
//! cargo run -p fiado-db --bin seed -- --db ./data/fiado.db
//! ```

use chrono::Utc;
use std::env;

use fiado_core::{ledger, seed, ShopData};
use fiado_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./fiado_dev.db");

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
                println!("Fiado POS Seed Data Writer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./fiado_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Fiado POS Seed Data Writer");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.documents().list().await?;
    if !existing.is_empty() {
        println!("⚠ Replacing {} stored document(s)", existing.len());
    }

    let shop = ShopData::new(seed::products_at(Utc::now()), seed::customers());
    db.shop().save(&shop).await?;

    println!();
    println!("✓ {} products", shop.products.len());
    println!(
        "✓ {} customers, {} receivable",
        shop.customers.len(),
        ledger::total_receivable(&shop.customers)?
    );
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
