//! # Seed Data Generator
//!
//! Populates the database with demo inventory for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 items (default)
//! cargo run -p warehub-db --bin seed
//!
//! # Custom amount and database
//! cargo run -p warehub-db --bin seed -- --count 1000 --db ./data/warehub.db
//! ```
//!
//! Every item gets a generated SKU (`WHW-00001`, ...). Every third item
//! also carries a vendor EAN-13 style barcode text, so both lookup paths
//! can be tried with a scanner.

use std::env;
use warehub_core::sku::next_sku;
use warehub_core::{NewInventoryItem, DEFAULT_SKU_PREFIX};
use warehub_db::{Database, DbConfig};

/// Product families for realistic warehouse data
const FAMILIES: &[(&str, &[&str])] = &[
    (
        "Packaging",
        &[
            "Stretch Film",
            "Packing Tape",
            "Bubble Wrap",
            "Corrugated Box S",
            "Corrugated Box M",
            "Corrugated Box L",
            "Void Fill Paper",
            "Pallet Strap",
        ],
    ),
    (
        "Safety",
        &[
            "Hi-Vis Vest",
            "Safety Gloves",
            "Hard Hat",
            "Ear Plugs",
            "Safety Glasses",
            "Steel Toe Caps",
        ],
    ),
    (
        "Hardware",
        &[
            "Hex Bolt M8",
            "Hex Nut M8",
            "Washer M8",
            "Cable Ties",
            "Shelf Bracket",
            "Bin Label Holder",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = "./warehub_dev.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
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
                println!("Warehub Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./warehub_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Warehub Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.inventory().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut last_sku: Option<String> = None;
    let mut generated = 0;

    for seed in 0..count {
        let sku = next_sku(DEFAULT_SKU_PREFIX, last_sku.as_deref())?;
        let item = generate_item(&sku, seed);

        match db.inventory().insert(&item).await {
            Ok(_) => generated += 1,
            Err(e) => eprintln!("Failed to insert {}: {}", sku, e),
        }

        last_sku = Some(sku);
    }

    println!();
    println!("✓ Generated {} items in {:?}", generated, start.elapsed());

    let sample = format!("{}-00001", DEFAULT_SKU_PREFIX);
    let found = db.inventory().find_by_identifier(&sample).await?;
    println!("  Lookup '{}': {} match(es)", sample, found.len());

    Ok(())
}

/// Generates a single item with deterministic pseudo-random data.
fn generate_item(sku: &str, seed: usize) -> NewInventoryItem {
    let (family, names) = FAMILIES[seed % FAMILIES.len()];
    let name = names[(seed / FAMILIES.len()) % names.len()];
    let batch = seed / (FAMILIES.len() * names.len());

    // EAN-13 shaped, checksum not computed
    let barcode_text = (seed % 3 == 0).then(|| format!("590{:010}", seed));

    NewInventoryItem {
        sku: sku.to_string(),
        barcode_text,
        name: format!("{} {} (batch {})", family, name, batch + 1),
        quantity: ((seed * 37) % 250) as u32,
    }
}
