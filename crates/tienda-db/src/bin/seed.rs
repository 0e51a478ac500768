//! # Seed Data Generator
//!
//! Populates the database with the sample clothing catalog for development.
//!
//! ## Usage
//! ```bash
//! # Database from TIENDA_DATABASE_PATH (default ./tienda.db)
//! cargo run -p tienda-db --bin seed
//!
//! # Specify database path
//! cargo run -p tienda-db --bin seed -- --db ./data/tienda.db
//! ```
//!
//! ## Generated Data
//! - Sizes: XS..XXL, UNICA and the numeric sizes 36..44
//! - Products: shirts, jeans and dresses
//! - Variants: opened at zero stock, then filled by one ENTRADA recorded
//!   through the ledger, followed by one sample VENTA
//!
//! Going through the ledger means the seeded stock has a history, the same
//! as stock received in the shop.

use std::env;

use tienda_core::{Actor, EntryLine, Money, Role, SaleLine};
use tienda_db::{Database, StockConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// (name, display name, sort order)
const SIZES: &[(&str, &str, i64)] = &[
    ("XS", "Extra Small", 1),
    ("S", "Small", 2),
    ("M", "Mediano", 3),
    ("L", "Large", 4),
    ("XL", "Extra Large", 5),
    ("XXL", "Double XL", 6),
    ("UNICA", "Talla Única", 0),
    ("36", "Talla 36", 7),
    ("38", "Talla 38", 8),
    ("40", "Talla 40", 9),
    ("42", "Talla 42", 10),
    ("44", "Talla 44", 11),
];

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    base_price_cents: i64,
    /// (size, color, opening stock, price override in cents)
    variants: &'static [(&'static str, &'static str, i64, Option<i64>)],
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Camisa Casual Clásica",
        description: "Camisa de algodón 100% perfecta para el día a día",
        category: "Camisas",
        base_price_cents: 4500,
        variants: &[
            ("M", "Blanco", 10, None),
            ("M", "Azul", 8, None),
            ("L", "Blanco", 12, None),
            ("L", "Negro", 5, None),
            ("XL", "Azul", 7, None),
        ],
    },
    SeedProduct {
        name: "Pantalón Jean Slim Fit",
        description: "Pantalón jean de corte moderno y cómodo",
        category: "Pantalones",
        base_price_cents: 6500,
        variants: &[
            ("40", "Azul Oscuro", 15, None),
            ("42", "Azul Oscuro", 12, None),
            ("40", "Negro", 10, None),
        ],
    },
    SeedProduct {
        name: "Vestido Elegante",
        description: "Vestido para ocasiones especiales",
        category: "Vestidos",
        base_price_cents: 12000,
        variants: &[("M", "Rojo", 5, Some(13000)), ("L", "Negro", 6, None)],
    },
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut config = StockConfig::load()?;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tienda Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $TIENDA_DATABASE_PATH or ./tienda.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tienda Seed Data Generator");
    println!("=============================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let catalog = db.catalog();
    if !catalog.list_sizes().await?.is_empty() {
        println!("⚠ Database already has a catalog");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (name, display_name, sort_order) in SIZES {
        catalog.create_size(name, display_name, *sort_order).await?;
    }
    println!("✓ {} sizes created", SIZES.len());

    let mut opening = Vec::new();
    let mut first_variants = Vec::new();
    for product in PRODUCTS {
        let created = catalog
            .create_product(
                product.name,
                Some(product.description),
                Some(product.category),
                Money::from_cents(product.base_price_cents),
            )
            .await?;

        for (index, (size_name, color, stock, price_override)) in product.variants.iter().enumerate() {
            let size = catalog
                .get_size_by_name(size_name)
                .await?
                .ok_or_else(|| format!("size {size_name} missing after seeding sizes"))?;

            let variant = db
                .variants()
                .create(&created.id, &size.id, color, 0, price_override.map(Money::from_cents))
                .await?;

            if index == 0 {
                first_variants.push((variant.id.clone(), created.base_price()));
            }
            opening.push(EntryLine::new(variant.id, *stock, None));
        }
    }
    println!("✓ {} products, {} variants created", PRODUCTS.len(), opening.len());

    let admin = Actor::new(uuid::Uuid::new_v4().to_string(), "Administrador", Role::Admin);
    let vendedora = Actor::new(uuid::Uuid::new_v4().to_string(), "María Vendedora", Role::Vendedora);

    let entry = db
        .ledger()
        .create_entry(&admin, &opening, Some("Inventario inicial"))
        .await?;
    println!("✓ Opening entry {} ({} lines)", entry.id, entry.items.len());

    let sale_lines: Vec<SaleLine> = first_variants
        .into_iter()
        .map(|(variant_id, price)| SaleLine::new(variant_id, 1, price))
        .collect();
    let sale = db.ledger().create_sale(&vendedora, &sale_lines, None).await?;
    println!("✓ Sample sale {} total {}", sale.id, sale.total());

    let low = db.stock().with_low_stock_threshold(config.low_stock_threshold).low_stock(None).await?;
    info!(count = low.len(), threshold = config.low_stock_threshold, "Low stock after seed");

    println!();
    println!("{}", serde_json::to_string_pretty(&sale)?);
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
