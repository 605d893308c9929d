//! # Product Repository
//!
//! Catalog operations: listings, kind-specific specs and offers.
//!
//! ## Effective Price
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Pricing Works                                    │
//! │                                                                         │
//! │  products.price_cents          ← the list price                        │
//! │  product_offers.offer_price_cents  ← optional discounted price         │
//! │                                                                         │
//! │  effective price = COALESCE(offer, list)                               │
//! │                                                                         │
//! │  The effective price is what shopping freezes into a basket line;      │
//! │  past sales keep whatever price they were sold at.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Kind-specific attributes live in satellite tables (laptops, computers,
//! printers) keyed by product id; [`ProductSpecs`] is the union of the
//! three shapes.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shoplite_core::{Product, ProductKind, ProductSpecs};

/// A catalog row with its optional offer, as shown while shopping.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ProductListing {
    pub id: String,
    pub name: String,
    pub kind: ProductKind,
    pub price_cents: i64,
    pub quantity_on_hand: i64,
    pub description: String,
    pub offer_price_cents: Option<i64>,
}

impl ProductListing {
    /// The price a sale would freeze right now.
    #[inline]
    pub fn effective_price_cents(&self) -> i64 {
        self.offer_price_cents.unwrap_or(self.price_cents)
    }

    /// Whether an offer undercuts the list price.
    #[inline]
    pub fn on_offer(&self) -> bool {
        self.offer_price_cents.is_some()
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let catalog = repo.list().await?;
/// let specs = repo.specs("P001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

const LISTING_SELECT: &str = r#"
    SELECT p.id, p.name, p.kind, p.price_cents, p.quantity_on_hand,
           p.description, o.offer_price_cents
    FROM products p
    LEFT JOIN product_offers o ON o.product_id = p.id
"#;

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the whole catalog with offers, ordered by product id.
    pub async fn list(&self) -> DbResult<Vec<ProductListing>> {
        let sql = format!("{LISTING_SELECT} ORDER BY p.id");
        let listings = sqlx::query_as::<_, ProductListing>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = listings.len(), "Listed catalog");
        Ok(listings)
    }

    /// Lists the catalog filtered to one product kind.
    pub async fn list_by_kind(&self, kind: ProductKind) -> DbResult<Vec<ProductListing>> {
        let sql = format!("{LISTING_SELECT} WHERE p.kind = ?1 ORDER BY p.id");
        let listings = sqlx::query_as::<_, ProductListing>(&sql)
            .bind(kind)
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }

    /// Gets a bare product row by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, kind, price_cents, quantity_on_hand, description
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product with its offer, by id.
    pub async fn get_listing(&self, id: &str) -> DbResult<Option<ProductListing>> {
        let sql = format!("{LISTING_SELECT} WHERE p.id = ?1");
        let listing = sqlx::query_as::<_, ProductListing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    /// Reads a product's kind-specific attributes from its satellite table.
    ///
    /// ## Returns
    /// * `Ok(Some(specs))` - product and its satellite row found
    /// * `Ok(None)` - product unknown, or satellite row missing
    pub async fn specs(&self, id: &str) -> DbResult<Option<ProductSpecs>> {
        let Some(product) = self.get(id).await? else {
            return Ok(None);
        };

        let specs = match product.kind {
            ProductKind::Laptops => {
                sqlx::query_as::<_, (String, f64)>(
                    "SELECT body_type, weight_kg FROM laptops WHERE product_id = ?1",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(|(body_type, weight_kg)| ProductSpecs::Laptop { body_type, weight_kg })
            }
            ProductKind::Computers => {
                sqlx::query_as::<_, (String,)>(
                    "SELECT cpu FROM computers WHERE product_id = ?1",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(|(cpu,)| ProductSpecs::Computer { cpu })
            }
            ProductKind::Printers => {
                sqlx::query_as::<_, (String, String)>(
                    "SELECT printer_type, resolution FROM printers WHERE product_id = ?1",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(|(printer_type, resolution)| ProductSpecs::Printer {
                    printer_type,
                    resolution,
                })
            }
        };

        Ok(specs)
    }

    /// Inserts a product together with its satellite row.
    ///
    /// The specs variant must match the product's kind tag; a mismatch
    /// would strand the satellite row in the wrong table.
    pub async fn insert(&self, product: &Product, specs: &ProductSpecs) -> DbResult<()> {
        let matches = matches!(
            (product.kind, specs),
            (ProductKind::Laptops, ProductSpecs::Laptop { .. })
                | (ProductKind::Computers, ProductSpecs::Computer { .. })
                | (ProductKind::Printers, ProductSpecs::Printer { .. })
        );
        if !matches {
            return Err(DbError::Internal(format!(
                "specs variant does not match kind '{}' for product {}",
                product.kind, product.id
            )));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, kind, price_cents, quantity_on_hand, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.kind)
        .bind(product.price_cents)
        .bind(product.quantity_on_hand)
        .bind(&product.description)
        .execute(&mut *tx)
        .await?;

        match specs {
            ProductSpecs::Laptop { body_type, weight_kg } => {
                sqlx::query(
                    "INSERT INTO laptops (product_id, body_type, weight_kg) VALUES (?1, ?2, ?3)",
                )
                .bind(&product.id)
                .bind(body_type)
                .bind(weight_kg)
                .execute(&mut *tx)
                .await?;
            }
            ProductSpecs::Computer { cpu } => {
                sqlx::query("INSERT INTO computers (product_id, cpu) VALUES (?1, ?2)")
                    .bind(&product.id)
                    .bind(cpu)
                    .execute(&mut *tx)
                    .await?;
            }
            ProductSpecs::Printer { printer_type, resolution } => {
                sqlx::query(
                    "INSERT INTO printers (product_id, printer_type, resolution) VALUES (?1, ?2, ?3)",
                )
                .bind(&product.id)
                .bind(printer_type)
                .bind(resolution)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Sets (or replaces) the offer price for a product.
    pub async fn set_offer(&self, product_id: &str, offer_price_cents: i64) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO product_offers (product_id, offer_price_cents)
            VALUES (?1, ?2)
            ON CONFLICT(product_id) DO UPDATE SET offer_price_cents = excluded.offer_price_cents
            "#,
        )
        .bind(product_id)
        .bind(offer_price_cents)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts cataloged products.
    pub async fn count(&self) -> DbResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn laptop(id: &str, name: &str, price_cents: i64) -> (Product, ProductSpecs) {
        (
            Product {
                id: id.to_string(),
                name: name.to_string(),
                kind: ProductKind::Laptops,
                price_cents,
                quantity_on_hand: 10,
                description: "A laptop".to_string(),
            },
            ProductSpecs::Laptop {
                body_type: "Ultrabook".to_string(),
                weight_kg: 1.3,
            },
        )
    }

    #[tokio::test]
    async fn test_insert_and_read_specs() {
        let db = test_db().await;
        let repo = db.products();

        let (product, specs) = laptop("P001", "AeroBook 13", 99999);
        repo.insert(&product, &specs).await.unwrap();

        let read = repo.specs("P001").await.unwrap().unwrap();
        assert_eq!(read, specs);
    }

    #[tokio::test]
    async fn test_specs_variant_must_match_kind() {
        let db = test_db().await;
        let repo = db.products();

        let (product, _) = laptop("P001", "AeroBook 13", 99999);
        let wrong = ProductSpecs::Computer {
            cpu: "R5-7600".to_string(),
        };

        let err = repo.insert(&product, &wrong).await.unwrap_err();
        assert!(matches!(err, DbError::Internal(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_offer_overrides_list_price() {
        let db = test_db().await;
        let repo = db.products();

        let (product, specs) = laptop("P001", "AeroBook 13", 99999);
        repo.insert(&product, &specs).await.unwrap();

        let listing = repo.get_listing("P001").await.unwrap().unwrap();
        assert!(!listing.on_offer());
        assert_eq!(listing.effective_price_cents(), 99999);

        repo.set_offer("P001", 89999).await.unwrap();
        let listing = repo.get_listing("P001").await.unwrap().unwrap();
        assert!(listing.on_offer());
        assert_eq!(listing.effective_price_cents(), 89999);

        // Replacing the offer keeps one row per product.
        repo.set_offer("P001", 79999).await.unwrap();
        let listing = repo.get_listing("P001").await.unwrap().unwrap();
        assert_eq!(listing.effective_price_cents(), 79999);
    }

    #[tokio::test]
    async fn test_list_by_kind_filters() {
        let db = test_db().await;
        let repo = db.products();

        let (l, ls) = laptop("P001", "AeroBook 13", 99999);
        repo.insert(&l, &ls).await.unwrap();
        repo.insert(
            &Product {
                id: "P002".to_string(),
                name: "InkJet Max".to_string(),
                kind: ProductKind::Printers,
                price_cents: 12999,
                quantity_on_hand: 4,
                description: "A printer".to_string(),
            },
            &ProductSpecs::Printer {
                printer_type: "InkJet".to_string(),
                resolution: "1200dpi".to_string(),
            },
        )
        .await
        .unwrap();

        let laptops = repo.list_by_kind(ProductKind::Laptops).await.unwrap();
        assert_eq!(laptops.len(), 1);
        assert_eq!(laptops[0].id, "P001");

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "P001"); // ordered by id
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        let repo = db.products();

        let (a, sa) = laptop("P001", "AeroBook 13", 99999);
        let (b, sb) = laptop("P002", "AeroBook 13", 89999);
        repo.insert(&a, &sa).await.unwrap();
        let err = repo.insert(&b, &sb).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
