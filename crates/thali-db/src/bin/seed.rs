//! # Seed Data Generator
//!
//! Loads a sample menu for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p thali-db --bin seed
//!
//! # Specify database path
//! cargo run -p thali-db --bin seed -- --db ./data/thali.db
//! ```
//!
//! The menu spans a handful of categories with a mix of discounts, GST rates
//! and delivery charges, so every pricing path shows up in the storefront.

use std::env;
use std::str::FromStr;

use thali_core::{FoodItem, Money, Percentage};
use thali_db::{generate_food_id, Database, DbConfig};

/// (category, name, description, price, discount %, gst %, delivery)
type MenuEntry = (&'static str, &'static str, &'static str, &'static str, &'static str, i64, i64);

const MENU: &[MenuEntry] = &[
    ("Starters", "Paneer Tikka", "Char-grilled cottage cheese with peppers", "200", "10", 5, 40),
    ("Starters", "Hara Bhara Kabab", "Spinach and pea patties", "160", "0", 5, 40),
    ("Starters", "Chicken 65", "Spicy deep-fried chicken, curry leaves", "240", "15", 5, 40),
    ("South Indian", "Masala Dosa", "Crisp crepe, spiced potato filling", "120", "0", 5, 25),
    ("South Indian", "Idli Sambar", "Steamed rice cakes, lentil stew", "80", "0", 5, 25),
    ("South Indian", "Medu Vada", "Lentil fritters with coconut chutney", "90", "5", 5, 25),
    ("Biryani", "Veg Biryani", "Basmati, vegetables, saffron", "250", "20", 12, 30),
    ("Biryani", "Hyderabadi Chicken Biryani", "Dum-cooked with whole spices", "320", "10", 12, 30),
    ("Biryani", "Mutton Biryani", "Slow-cooked mutton, fried onions", "380", "0", 12, 30),
    ("Curries", "Paneer Butter Masala", "Tomato, butter and cream gravy", "260", "0", 5, 40),
    ("Curries", "Dal Makhani", "Black lentils simmered overnight", "199.50", "12.5", 5, 40),
    ("Breads", "Butter Naan", "Tandoor-baked, brushed with butter", "45", "0", 5, 20),
    ("Breads", "Garlic Naan", "Topped with garlic and coriander", "55", "0", 5, 20),
    ("Desserts", "Gulab Jamun", "Two pieces in rose syrup", "70", "0", 18, 20),
    ("Desserts", "Rasmalai", "Cottage cheese dumplings in saffron milk", "90", "10", 18, 20),
    ("Beverages", "Sweet Lassi", "Churned yogurt drink", "80", "0", 12, 15),
    ("Beverages", "Masala Chai", "Spiced milk tea", "40", "0", 5, 15),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./thali_dev.db");

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
                println!("Thali Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./thali_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Thali Storefront Seed Data Generator");
    println!("=======================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.foods().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} foods", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut inserted = 0;
    for entry in MENU {
        let food = menu_item(entry)?;
        if let Err(e) = db.foods().insert(&food).await {
            eprintln!("Failed to insert {}: {}", food.name, e);
            continue;
        }
        inserted += 1;
    }

    println!("✓ Inserted {} foods", inserted);

    let categories = db.foods().categories().await?;
    println!("  Categories: {}", categories.join(", "));

    let hits = db.foods().search("paneer").await?;
    println!("  Search 'paneer': {} results", hits.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn menu_item(
    &(category, name, description, price, discount, gst, delivery): &MenuEntry,
) -> Result<FoodItem, Box<dyn std::error::Error>> {
    Ok(FoodItem {
        id: generate_food_id(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        image_url: None,
        base_price: Money::from_str(price)?,
        discount_percent: Percentage::from_str(discount)?,
        gst_percent: Percentage::from_whole(gst),
        delivery_charge: Money::from_rupees(delivery),
        is_available: true,
    })
}
