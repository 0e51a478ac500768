//! Shared fixtures for the ledger integration tests.

#![allow(dead_code)]

use tienda_core::{Actor, Money, Role, Variant};
use tienda_db::{Database, DbConfig};

pub struct Shop {
    pub db: Database,
    pub product_id: String,
    pub size_id: String,
    pub admin: Actor,
    pub vendedora: Actor,
}

impl Shop {
    /// Fresh in-memory database with one product and one size.
    pub async fn open() -> Shop {
        Self::with_config(DbConfig::in_memory()).await
    }

    pub async fn with_config(config: DbConfig) -> Shop {
        let db = Database::new(config).await.unwrap();
        let size = db.catalog().create_size("M", "Mediano", 3).await.unwrap();
        let product = db
            .catalog()
            .create_product(
                "Camisa Casual Clásica",
                Some("Camisa de algodón"),
                Some("Camisas"),
                Money::from_cents(4500),
            )
            .await
            .unwrap();

        Shop {
            db,
            product_id: product.id,
            size_id: size.id,
            admin: Actor::new("u-admin", "Administrador", Role::Admin),
            vendedora: Actor::new("u-vendedora", "María Vendedora", Role::Vendedora),
        }
    }

    /// Adds a variant of the shop's product with `stock` units.
    pub async fn variant(&self, color: &str, stock: i64) -> Variant {
        self.db
            .variants()
            .create(&self.product_id, &self.size_id, color, stock, None)
            .await
            .unwrap()
    }

    pub async fn stock_of(&self, variant_id: &str) -> i64 {
        self.db.stock().stock_level(variant_id).await.unwrap().stock
    }

    pub async fn transaction_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(self.db.pool())
            .await
            .unwrap()
    }

    pub async fn item_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transaction_items")
            .fetch_one(self.db.pool())
            .await
            .unwrap()
    }
}

pub fn price(cents: i64) -> Money {
    Money::from_cents(cents)
}
