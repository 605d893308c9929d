//! # Order Repository
//!
//! Checkout and order history.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      How Checkout Works                                 │
//! │                                                                         │
//! │  frozen lines (product, qty, price captured at add time)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    INSERT baskets        (fresh random 7-char id)                       │
//! │    INSERT basket_items   (one row per line, price_sold frozen)          │
//! │    INSERT transactions   (status 'Pending', today's date)               │
//! │    for each line:                                                       │
//! │      UPDATE products SET quantity_on_hand = quantity_on_hand - qty      │
//! │      WHERE id = ? AND quantity_on_hand >= qty                           │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The guarded UPDATE never drives stock negative. If stock fell below   │
//! │  the requested quantity between add and checkout, the decrement is a   │
//! │  silent no-op and the order still completes (oversell is absorbed by   │
//! │  fulfilment, not the database).                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use shoplite_core::ids::{BASKET_ID_CHARSET, BASKET_ID_LEN};
use shoplite_core::{Basket, BasketItem, CoreError, StoreTransaction, TxStatus};

/// One line of an order at checkout time.
///
/// `price_cents` is the price frozen when the line was added to the
/// pending basket, not the current catalog price.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
    pub price_cents: i64,
}

/// What the customer gets back from a successful checkout.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReceipt {
    pub transaction_id: i64,
    pub basket_id: String,
    pub total_cents: i64,
    pub tx_date: NaiveDate,
    pub status: TxStatus,
}

/// One row of a customer's order history.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub transaction_id: i64,
    pub basket_id: String,
    pub tx_date: NaiveDate,
    pub status: TxStatus,
    pub item_count: i64,
    pub total_cents: i64,
}

/// One product line of a customer's order history, as shown while shopping.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderHistoryLine {
    pub transaction_id: i64,
    pub tx_date: NaiveDate,
    pub status: TxStatus,
    pub product_name: String,
    pub quantity: i64,
    pub price_sold_cents: i64,
}

/// One purchased line across any of a customer's baskets (full view).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PurchaseLine {
    pub basket_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price_sold_cents: i64,
}

/// Repository for checkout and order lookups.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order: basket, line items, transaction and stock
    /// decrements, all in one database transaction.
    ///
    /// ## Arguments
    /// * `customer_id` - the buyer
    /// * `address_nickname` - which of the buyer's addresses to ship to
    /// * `card_number` - a stored card number (or the shared default card)
    /// * `lines` - frozen basket lines; must be non-empty
    /// * `tx_date` - order date, passed in for testability
    ///
    /// ## Errors
    /// * `Domain(EmptyBasket)` - no lines
    /// * `ForeignKeyViolation` - unknown address nickname or card number
    pub async fn place(
        &self,
        customer_id: &str,
        address_nickname: &str,
        card_number: &str,
        lines: &[OrderLine],
        tx_date: NaiveDate,
    ) -> DbResult<OrderReceipt> {
        if lines.is_empty() {
            return Err(CoreError::EmptyBasket.into());
        }

        // A fresh random basket id can collide with an existing one;
        // retry with a new code instead of failing the order.
        let mut last_err = None;
        for _ in 0..5 {
            let basket_id = new_basket_id();
            match self
                .try_place(customer_id, address_nickname, card_number, lines, tx_date, &basket_id)
                .await
            {
                Err(DbError::UniqueViolation { field, .. }) if field.contains("baskets.id") => {
                    warn!(basket_id = %basket_id, "Basket id collision, retrying");
                    last_err = Some(DbError::UniqueViolation {
                        field,
                        value: basket_id,
                    });
                }
                other => return other,
            }
        }

        Err(last_err.unwrap_or_else(|| {
            DbError::TransactionFailed("basket id allocation exhausted retries".to_string())
        }))
    }

    async fn try_place(
        &self,
        customer_id: &str,
        address_nickname: &str,
        card_number: &str,
        lines: &[OrderLine],
        tx_date: NaiveDate,
        basket_id: &str,
    ) -> DbResult<OrderReceipt> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO baskets (id, customer_id) VALUES (?1, ?2)")
            .bind(basket_id)
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        let mut total_cents = 0;
        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO basket_items (basket_id, product_id, quantity, price_sold_cents)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(basket_id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.price_cents)
            .execute(&mut *tx)
            .await?;

            total_cents += line.quantity * line.price_cents;
        }

        let result = sqlx::query(
            r#"
            INSERT INTO transactions
                (basket_id, customer_id, address_nickname, tx_date, card_number, status)
            VALUES (?1, ?2, ?3, ?4, ?5, 'Pending')
            "#,
        )
        .bind(basket_id)
        .bind(customer_id)
        .bind(address_nickname)
        .bind(tx_date)
        .bind(card_number)
        .execute(&mut *tx)
        .await?;
        let transaction_id = result.last_insert_rowid();

        // Guarded decrement: no-op when remaining stock is short.
        for line in lines {
            let updated = sqlx::query(
                r#"
                UPDATE products
                SET quantity_on_hand = quantity_on_hand - ?1
                WHERE id = ?2 AND quantity_on_hand >= ?1
                "#,
            )
            .bind(line.quantity)
            .bind(&line.product_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                warn!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    "Stock short at checkout, decrement skipped"
                );
            }
        }

        tx.commit().await?;

        info!(
            transaction_id,
            basket_id = %basket_id,
            customer_id = %customer_id,
            total_cents,
            "Order placed"
        );

        Ok(OrderReceipt {
            transaction_id,
            basket_id: basket_id.to_string(),
            total_cents,
            tx_date,
            status: TxStatus::Pending,
        })
    }

    /// Gets a transaction by id.
    pub async fn get(&self, transaction_id: i64) -> DbResult<Option<StoreTransaction>> {
        let txn = sqlx::query_as::<_, StoreTransaction>(
            r#"
            SELECT id, basket_id, customer_id, address_nickname, tx_date,
                   card_number, status
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(txn)
    }

    /// Lists the line items of one basket.
    pub async fn items(&self, basket_id: &str) -> DbResult<Vec<BasketItem>> {
        let items = sqlx::query_as::<_, BasketItem>(
            r#"
            SELECT basket_id, product_id, quantity, price_sold_cents
            FROM basket_items
            WHERE basket_id = ?1
            ORDER BY product_id
            "#,
        )
        .bind(basket_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// A customer's order history expanded to product lines, newest first.
    pub async fn history_lines(&self, customer_id: &str) -> DbResult<Vec<OrderHistoryLine>> {
        let lines = sqlx::query_as::<_, OrderHistoryLine>(
            r#"
            SELECT t.id AS transaction_id, t.tx_date, t.status,
                   p.name AS product_name, bi.quantity, bi.price_sold_cents
            FROM transactions t
            JOIN basket_items bi ON bi.basket_id = t.basket_id
            JOIN products p ON p.id = bi.product_id
            WHERE t.customer_id = ?1
            ORDER BY t.tx_date DESC, t.id DESC, p.name
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists a customer's baskets.
    pub async fn baskets_for(&self, customer_id: &str) -> DbResult<Vec<Basket>> {
        let baskets = sqlx::query_as::<_, Basket>(
            "SELECT id, customer_id FROM baskets WHERE customer_id = ?1 ORDER BY id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(baskets)
    }

    /// Lists a customer's transactions, newest first.
    pub async fn transactions_for(&self, customer_id: &str) -> DbResult<Vec<StoreTransaction>> {
        let txns = sqlx::query_as::<_, StoreTransaction>(
            r#"
            SELECT id, basket_id, customer_id, address_nickname, tx_date,
                   card_number, status
            FROM transactions
            WHERE customer_id = ?1
            ORDER BY tx_date DESC, id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(txns)
    }

    /// Every purchased line across all of a customer's baskets.
    pub async fn purchases_for(&self, customer_id: &str) -> DbResult<Vec<PurchaseLine>> {
        let lines = sqlx::query_as::<_, PurchaseLine>(
            r#"
            SELECT bi.basket_id, p.name AS product_name, bi.quantity, bi.price_sold_cents
            FROM basket_items bi
            JOIN products p ON p.id = bi.product_id
            JOIN baskets b ON b.id = bi.basket_id
            WHERE b.customer_id = ?1
            ORDER BY bi.basket_id, p.name
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// A customer's order history, newest first, with per-order totals.
    pub async fn history(&self, customer_id: &str) -> DbResult<Vec<OrderSummary>> {
        let rows = sqlx::query_as::<
            _,
            (i64, String, NaiveDate, TxStatus, i64, i64),
        >(
            r#"
            SELECT t.id, t.basket_id, t.tx_date, t.status,
                   COUNT(bi.product_id), SUM(bi.quantity * bi.price_sold_cents)
            FROM transactions t
            JOIN basket_items bi ON bi.basket_id = t.basket_id
            WHERE t.customer_id = ?1
            GROUP BY t.id, t.basket_id, t.tx_date, t.status
            ORDER BY t.tx_date DESC, t.id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(transaction_id, basket_id, tx_date, status, item_count, total_cents)| {
                    OrderSummary {
                        transaction_id,
                        basket_id,
                        tx_date,
                        status,
                        item_count,
                        total_cents,
                    }
                },
            )
            .collect())
    }
}

/// Generates a random basket id code.
pub(crate) fn new_basket_id() -> String {
    let mut rng = rand::rng();
    (0..BASKET_ID_LEN)
        .map(|_| {
            let idx = rng.random_range(0..BASKET_ID_CHARSET.len());
            BASKET_ID_CHARSET[idx] as char
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shoplite_core::ids::is_valid_basket_id;
    use shoplite_core::{NewCustomer, Product, ProductKind, ProductSpecs, Tier};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
    }

    /// Database with one customer ("Home" address + default card) and one
    /// product: P999 "Widget", $10.00, 5 on hand.
    async fn checkout_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let customer = db
            .customers()
            .register(NewCustomer {
                first_name: "Alice".to_string(),
                last_name: "Wong".to_string(),
                email: "a@x.com".to_string(),
                address: "12 Hill Rd".to_string(),
                phone: "5550000001".to_string(),
                tier: Tier::Bronze,
                credit_line_cents: None,
            })
            .await
            .unwrap();

        db.accounts().ensure_default_card().await.unwrap();
        db.accounts()
            .add_address(&shoplite_core::ShippingAddress {
                customer_id: customer.id.clone(),
                nickname: "Home".to_string(),
                recipient: "Alice Wong".to_string(),
                street_number: "12".to_string(),
                street: "Hill Rd".to_string(),
                city: "Cambridge".to_string(),
                state: "MA".to_string(),
                country: "USA".to_string(),
                zip: "02139".to_string(),
            })
            .await
            .unwrap();

        db.products()
            .insert(
                &Product {
                    id: "P999".to_string(),
                    name: "Widget".to_string(),
                    kind: ProductKind::Printers,
                    price_cents: 1000,
                    quantity_on_hand: 5,
                    description: "Test widget".to_string(),
                },
                &ProductSpecs::Printer {
                    printer_type: "Laser".to_string(),
                    resolution: "600dpi".to_string(),
                },
            )
            .await
            .unwrap();

        (db, customer.id)
    }

    fn widget_line(quantity: i64, price_cents: i64) -> OrderLine {
        OrderLine {
            product_id: "P999".to_string(),
            quantity,
            price_cents,
        }
    }

    #[tokio::test]
    async fn test_place_order_decrements_stock_exactly() {
        let (db, cid) = checkout_db().await;

        // 2 units at a frozen price of $9.50.
        let receipt = db
            .orders()
            .place(
                &cid,
                "Home",
                shoplite_core::DEFAULT_CARD_NUMBER,
                &[widget_line(2, 950)],
                today(),
            )
            .await
            .unwrap();

        assert!(is_valid_basket_id(&receipt.basket_id));
        assert_eq!(receipt.total_cents, 1900);
        assert_eq!(receipt.status, TxStatus::Pending);

        // 5 - 2 = 3 left.
        let product = db.products().get("P999").await.unwrap().unwrap();
        assert_eq!(product.quantity_on_hand, 3);

        // Line item kept the frozen price, not the catalog price.
        let items = db.orders().items(&receipt.basket_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price_sold_cents, 950);
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_short_stock_decrement_is_silent_noop() {
        let (db, cid) = checkout_db().await;

        // Ask for more than the 5 on hand: the order completes, the
        // decrement is skipped, stock stays at 5.
        let receipt = db
            .orders()
            .place(
                &cid,
                "Home",
                shoplite_core::DEFAULT_CARD_NUMBER,
                &[widget_line(6, 1000)],
                today(),
            )
            .await
            .unwrap();

        assert_eq!(receipt.total_cents, 6000);
        let product = db.products().get("P999").await.unwrap().unwrap();
        assert_eq!(product.quantity_on_hand, 5);
    }

    #[tokio::test]
    async fn test_empty_basket_rejected() {
        let (db, cid) = checkout_db().await;

        let err = db
            .orders()
            .place(&cid, "Home", shoplite_core::DEFAULT_CARD_NUMBER, &[], today())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::EmptyBasket)));
    }

    #[tokio::test]
    async fn test_unknown_address_rolls_back_everything() {
        let (db, cid) = checkout_db().await;

        let err = db
            .orders()
            .place(
                &cid,
                "Cabin", // never added
                shoplite_core::DEFAULT_CARD_NUMBER,
                &[widget_line(1, 1000)],
                today(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // No basket survived and stock is untouched.
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM baskets")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 0);
        let product = db.products().get("P999").await.unwrap().unwrap();
        assert_eq!(product.quantity_on_hand, 5);
    }

    #[tokio::test]
    async fn test_history_orders_newest_first() {
        let (db, cid) = checkout_db().await;
        let orders = db.orders();
        let card = shoplite_core::DEFAULT_CARD_NUMBER;

        let early = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        orders
            .place(&cid, "Home", card, &[widget_line(1, 1000)], early)
            .await
            .unwrap();
        orders
            .place(&cid, "Home", card, &[widget_line(2, 950)], today())
            .await
            .unwrap();

        let history = orders.history(&cid).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].tx_date, today());
        assert_eq!(history[0].total_cents, 1900);
        assert_eq!(history[1].tx_date, early);
        assert_eq!(history[1].total_cents, 1000);
    }

    #[test]
    fn test_new_basket_id_shape() {
        for _ in 0..50 {
            assert!(is_valid_basket_id(&new_basket_id()));
        }
    }
}
