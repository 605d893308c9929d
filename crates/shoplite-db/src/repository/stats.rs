//! # Statistics Repository
//!
//! Reporting queries over past sales.
//!
//! ## The Six Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. card_totals          total charged per card, all time              │
//! │  2. top_spenders         ten biggest-spending customers, all time      │
//! │  3. best_sellers         units sold per product, in a date range       │
//! │  4. widest_reach         distinct buyers per product, in a range       │
//! │  5. card_max_baskets     largest single basket per card, in a range    │
//! │  6. avg_price_by_kind    average sold price per product kind, range    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All amounts are integer cents summed in SQL; only the per-kind average
//! comes back as a float. Ranges are inclusive on both ends (SQL BETWEEN
//! over ISO dates).

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbResult;
use shoplite_core::ProductKind;

/// Total charged against one card.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CardTotal {
    pub card_number: String,
    pub total_cents: i64,
}

/// One of the top-spending customers.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopSpender {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub total_cents: i64,
}

/// Units sold for one product inside a date range.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductUnits {
    pub product_id: String,
    pub name: String,
    pub units_sold: i64,
}

/// Distinct buyers for one product inside a date range.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductReach {
    pub product_id: String,
    pub name: String,
    pub buyer_count: i64,
}

/// The largest single basket charged to one card inside a date range.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CardMaxBasket {
    pub card_number: String,
    pub max_basket_cents: i64,
}

/// Average sold price for one product kind inside a date range.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct KindAvgPrice {
    pub kind: ProductKind,
    pub avg_price_cents: f64,
}

/// Repository for the reporting queries.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    /// Creates a new StatsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Total amount charged per card, across all transactions, biggest first.
    pub async fn card_totals(&self) -> DbResult<Vec<CardTotal>> {
        let rows = sqlx::query_as::<_, CardTotal>(
            r#"
            SELECT t.card_number,
                   SUM(bi.quantity * bi.price_sold_cents) AS total_cents
            FROM transactions t
            JOIN basket_items bi ON bi.basket_id = t.basket_id
            GROUP BY t.card_number
            ORDER BY total_cents DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// The ten customers who have spent the most, across all time.
    ///
    /// Strictly descending by total; fewer than ten rows when fewer
    /// customers have ever bought anything.
    pub async fn top_spenders(&self) -> DbResult<Vec<TopSpender>> {
        let rows = sqlx::query_as::<_, TopSpender>(
            r#"
            SELECT c.id AS customer_id, c.first_name, c.last_name,
                   SUM(bi.quantity * bi.price_sold_cents) AS total_cents
            FROM transactions t
            JOIN customers c ON c.id = t.customer_id
            JOIN basket_items bi ON bi.basket_id = t.basket_id
            GROUP BY c.id, c.first_name, c.last_name
            ORDER BY total_cents DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Units sold per product between two dates (inclusive), most first.
    pub async fn best_sellers(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<ProductUnits>> {
        let rows = sqlx::query_as::<_, ProductUnits>(
            r#"
            SELECT p.id AS product_id, p.name,
                   SUM(bi.quantity) AS units_sold
            FROM transactions t
            JOIN basket_items bi ON bi.basket_id = t.basket_id
            JOIN products p ON p.id = bi.product_id
            WHERE t.tx_date BETWEEN ?1 AND ?2
            GROUP BY p.id, p.name
            ORDER BY units_sold DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Distinct buyers per product between two dates, widest reach first.
    pub async fn widest_reach(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<ProductReach>> {
        let rows = sqlx::query_as::<_, ProductReach>(
            r#"
            SELECT p.id AS product_id, p.name,
                   COUNT(DISTINCT t.customer_id) AS buyer_count
            FROM transactions t
            JOIN basket_items bi ON bi.basket_id = t.basket_id
            JOIN products p ON p.id = bi.product_id
            WHERE t.tx_date BETWEEN ?1 AND ?2
            GROUP BY p.id, p.name
            ORDER BY buyer_count DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// The largest single basket total charged per card between two dates.
    ///
    /// Computed from a per-basket subtotal subquery, then MAX over each
    /// card's baskets.
    pub async fn card_max_baskets(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<CardMaxBasket>> {
        let rows = sqlx::query_as::<_, CardMaxBasket>(
            r#"
            SELECT card_number, MAX(basket_cents) AS max_basket_cents
            FROM (
                SELECT t.card_number, t.basket_id,
                       SUM(bi.quantity * bi.price_sold_cents) AS basket_cents
                FROM transactions t
                JOIN basket_items bi ON bi.basket_id = t.basket_id
                WHERE t.tx_date BETWEEN ?1 AND ?2
                GROUP BY t.card_number, t.basket_id
            )
            GROUP BY card_number
            ORDER BY max_basket_cents DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Average price items actually sold at, per product kind, in a range.
    ///
    /// Averages the frozen line prices, so offers and jittered fixture
    /// prices pull the average away from list price.
    pub async fn avg_price_by_kind(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<KindAvgPrice>> {
        let rows = sqlx::query_as::<_, KindAvgPrice>(
            r#"
            SELECT p.kind, AVG(bi.price_sold_cents) AS avg_price_cents
            FROM transactions t
            JOIN basket_items bi ON bi.basket_id = t.basket_id
            JOIN products p ON p.id = bi.product_id
            WHERE t.tx_date BETWEEN ?1 AND ?2
            GROUP BY p.kind
            ORDER BY p.kind
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::order::OrderLine;
    use shoplite_core::{
        NewCustomer, Product, ProductSpecs, ShippingAddress, Tier, DEFAULT_CARD_NUMBER,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn register(db: &Database, n: u32) -> String {
        db.customers()
            .register(NewCustomer {
                first_name: format!("User{n}"),
                last_name: "Test".to_string(),
                email: format!("u{n}@x.com"),
                address: "1 Way".to_string(),
                phone: format!("55500000{n:02}"),
                tier: Tier::Bronze,
                credit_line_cents: None,
            })
            .await
            .unwrap()
            .id
    }

    /// Two customers, two products, three orders on known dates.
    ///
    /// ```text
    /// order A: C001, 2026-08-01, 2 × P001 @ $100  ($200)
    /// order B: C001, 2026-08-10, 1 × P002 @ $50   ($50)
    /// order C: C002, 2026-08-10, 1 × P001 @ $100  ($100)
    /// ```
    async fn stats_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let c1 = register(&db, 1).await;
        let c2 = register(&db, 2).await;
        db.accounts().ensure_default_card().await.unwrap();

        for cid in [&c1, &c2] {
            db.accounts()
                .add_address(&ShippingAddress {
                    customer_id: cid.clone(),
                    nickname: "Home".to_string(),
                    recipient: "R".to_string(),
                    street_number: "1".to_string(),
                    street: "Way".to_string(),
                    city: "Town".to_string(),
                    state: "MA".to_string(),
                    country: "USA".to_string(),
                    zip: "02139".to_string(),
                })
                .await
                .unwrap();
        }

        let products = db.products();
        products
            .insert(
                &Product {
                    id: "P001".to_string(),
                    name: "AeroBook 13".to_string(),
                    kind: ProductKind::Laptops,
                    price_cents: 10000,
                    quantity_on_hand: 50,
                    description: String::new(),
                },
                &ProductSpecs::Laptop {
                    body_type: "Ultrabook".to_string(),
                    weight_kg: 1.3,
                },
            )
            .await
            .unwrap();
        products
            .insert(
                &Product {
                    id: "P002".to_string(),
                    name: "InkJet Max".to_string(),
                    kind: ProductKind::Printers,
                    price_cents: 5000,
                    quantity_on_hand: 50,
                    description: String::new(),
                },
                &ProductSpecs::Printer {
                    printer_type: "InkJet".to_string(),
                    resolution: "1200dpi".to_string(),
                },
            )
            .await
            .unwrap();

        let orders = db.orders();
        let line = |pid: &str, qty: i64, price: i64| OrderLine {
            product_id: pid.to_string(),
            quantity: qty,
            price_cents: price,
        };
        orders
            .place(&c1, "Home", DEFAULT_CARD_NUMBER, &[line("P001", 2, 10000)], date(2026, 8, 1))
            .await
            .unwrap();
        orders
            .place(&c1, "Home", DEFAULT_CARD_NUMBER, &[line("P002", 1, 5000)], date(2026, 8, 10))
            .await
            .unwrap();
        orders
            .place(&c2, "Home", DEFAULT_CARD_NUMBER, &[line("P001", 1, 10000)], date(2026, 8, 10))
            .await
            .unwrap();

        db
    }

    #[tokio::test]
    async fn test_card_totals() {
        let db = stats_db().await;
        let totals = db.stats().card_totals().await.unwrap();

        // Everything went on the default card.
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].card_number, DEFAULT_CARD_NUMBER);
        assert_eq!(totals[0].total_cents, 35000);
    }

    #[tokio::test]
    async fn test_top_spenders_sorted_and_capped() {
        let db = stats_db().await;
        let spenders = db.stats().top_spenders().await.unwrap();

        assert!(spenders.len() <= 10);
        assert_eq!(spenders.len(), 2);
        assert_eq!(spenders[0].customer_id, "C001"); // $250
        assert_eq!(spenders[0].total_cents, 25000);
        assert_eq!(spenders[1].customer_id, "C002"); // $100
        assert!(spenders[0].total_cents >= spenders[1].total_cents);
    }

    #[tokio::test]
    async fn test_best_sellers_respects_range() {
        let db = stats_db().await;
        let stats = db.stats();

        // Whole month: P001 sold 3 units, P002 sold 1.
        let all = stats
            .best_sellers(date(2026, 8, 1), date(2026, 8, 31))
            .await
            .unwrap();
        assert_eq!(all[0].product_id, "P001");
        assert_eq!(all[0].units_sold, 3);
        assert_eq!(all[1].units_sold, 1);

        // Range excluding the Aug 1 order: P001 drops to 1 unit.
        let late = stats
            .best_sellers(date(2026, 8, 2), date(2026, 8, 31))
            .await
            .unwrap();
        let p001 = late.iter().find(|r| r.product_id == "P001").unwrap();
        assert_eq!(p001.units_sold, 1);
    }

    #[tokio::test]
    async fn test_widest_reach_counts_distinct_buyers() {
        let db = stats_db().await;

        let reach = db
            .stats()
            .widest_reach(date(2026, 8, 1), date(2026, 8, 31))
            .await
            .unwrap();

        // P001 bought by both customers, P002 by one.
        assert_eq!(reach[0].product_id, "P001");
        assert_eq!(reach[0].buyer_count, 2);
        assert_eq!(reach[1].buyer_count, 1);
    }

    #[tokio::test]
    async fn test_card_max_baskets_takes_largest_single_basket() {
        let db = stats_db().await;

        let maxes = db
            .stats()
            .card_max_baskets(date(2026, 8, 1), date(2026, 8, 31))
            .await
            .unwrap();

        // Largest basket on the default card was the $200 one, not the sum.
        assert_eq!(maxes.len(), 1);
        assert_eq!(maxes[0].max_basket_cents, 20000);
    }

    #[tokio::test]
    async fn test_avg_price_by_kind() {
        let db = stats_db().await;

        let avgs = db
            .stats()
            .avg_price_by_kind(date(2026, 8, 1), date(2026, 8, 31))
            .await
            .unwrap();

        let laptops = avgs.iter().find(|r| r.kind == ProductKind::Laptops).unwrap();
        let printers = avgs.iter().find(|r| r.kind == ProductKind::Printers).unwrap();
        // Two laptop lines both at $100; one printer line at $50.
        assert!((laptops.avg_price_cents - 10000.0).abs() < f64::EPSILON);
        assert!((printers.avg_price_cents - 5000.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_empty_range_yields_no_rows() {
        let db = stats_db().await;

        let none = db
            .stats()
            .best_sellers(date(2025, 1, 1), date(2025, 12, 31))
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
