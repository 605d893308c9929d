//! # Schema Management
//!
//! Named DDL statements and the create/drop/rebuild operations over them.
//!
//! ## Table Dependency Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Schema Layout                                   │
//! │                                                                         │
//! │  customers ──┬── credit_lines        (1:1, non-bronze only)            │
//! │              ├── credit_cards        (N:1, NULL owner = default card)  │
//! │              ├── shipping_addresses  (PK: customer_id + nickname)      │
//! │              └── baskets ── basket_items ── products ─┬─ laptops       │
//! │                     │                          │      ├─ computers     │
//! │                     │                          │      └─ printers      │
//! │                     │                          └── product_offers      │
//! │                     └── transactions (basket, card, address)           │
//! │                                                                         │
//! │  All child tables cascade on parent delete.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! `create_all` and `drop_all` execute every statement even when earlier
//! ones fail: each failure is logged with the object name and counted, and
//! the pass continues. The caller gets the failure count back. Rebuilding a
//! database that is missing half its tables therefore still creates the
//! other half.

use sqlx::SqlitePool;
use tracing::{error, info};

/// Named DDL statements in dependency order.
///
/// Parents precede children so a single forward pass can create everything
/// with foreign keys enabled. `drop_all` walks this list in reverse.
pub const SCHEMA_OBJECTS: &[(&str, &str)] = &[
    (
        "customers",
        r#"
        CREATE TABLE customers (
            id          TEXT PRIMARY KEY,
            first_name  TEXT NOT NULL,
            last_name   TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            address     TEXT NOT NULL,
            phone       TEXT NOT NULL UNIQUE,
            tier        TEXT NOT NULL
        )
        "#,
    ),
    (
        "credit_lines",
        r#"
        CREATE TABLE credit_lines (
            customer_id TEXT PRIMARY KEY
                        REFERENCES customers(id) ON DELETE CASCADE,
            limit_cents INTEGER NOT NULL
        )
        "#,
    ),
    (
        "credit_cards",
        r#"
        CREATE TABLE credit_cards (
            number          TEXT PRIMARY KEY,
            security_code   TEXT NOT NULL,
            owner_name      TEXT NOT NULL,
            network         TEXT NOT NULL,
            billing_address TEXT NOT NULL,
            expires_on      TEXT NOT NULL,
            customer_id     TEXT REFERENCES customers(id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "shipping_addresses",
        r#"
        CREATE TABLE shipping_addresses (
            customer_id   TEXT NOT NULL
                          REFERENCES customers(id) ON DELETE CASCADE,
            nickname      TEXT NOT NULL,
            recipient     TEXT NOT NULL,
            street_number TEXT NOT NULL,
            street        TEXT NOT NULL,
            city          TEXT NOT NULL,
            state         TEXT NOT NULL,
            country       TEXT NOT NULL,
            zip           TEXT NOT NULL,
            PRIMARY KEY (customer_id, nickname)
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE products (
            id               TEXT PRIMARY KEY,
            name             TEXT NOT NULL UNIQUE,
            kind             TEXT NOT NULL,
            price_cents      INTEGER NOT NULL,
            quantity_on_hand INTEGER NOT NULL DEFAULT 0,
            description      TEXT NOT NULL DEFAULT ''
        )
        "#,
    ),
    (
        "laptops",
        r#"
        CREATE TABLE laptops (
            product_id TEXT PRIMARY KEY
                       REFERENCES products(id) ON DELETE CASCADE,
            body_type  TEXT NOT NULL,
            weight_kg  REAL NOT NULL
        )
        "#,
    ),
    (
        "computers",
        r#"
        CREATE TABLE computers (
            product_id TEXT PRIMARY KEY
                       REFERENCES products(id) ON DELETE CASCADE,
            cpu        TEXT NOT NULL
        )
        "#,
    ),
    (
        "printers",
        r#"
        CREATE TABLE printers (
            product_id   TEXT PRIMARY KEY
                         REFERENCES products(id) ON DELETE CASCADE,
            printer_type TEXT NOT NULL,
            resolution   TEXT NOT NULL
        )
        "#,
    ),
    (
        "product_offers",
        r#"
        CREATE TABLE product_offers (
            product_id        TEXT PRIMARY KEY
                              REFERENCES products(id) ON DELETE CASCADE,
            offer_price_cents INTEGER NOT NULL
        )
        "#,
    ),
    (
        "baskets",
        r#"
        CREATE TABLE baskets (
            id          TEXT PRIMARY KEY,
            customer_id TEXT NOT NULL
                        REFERENCES customers(id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "basket_items",
        r#"
        CREATE TABLE basket_items (
            basket_id        TEXT NOT NULL
                             REFERENCES baskets(id) ON DELETE CASCADE,
            product_id       TEXT NOT NULL
                             REFERENCES products(id) ON DELETE CASCADE,
            quantity         INTEGER NOT NULL,
            price_sold_cents INTEGER NOT NULL,
            PRIMARY KEY (basket_id, product_id)
        )
        "#,
    ),
    (
        "transactions",
        r#"
        CREATE TABLE transactions (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            basket_id        TEXT NOT NULL UNIQUE
                             REFERENCES baskets(id) ON DELETE CASCADE,
            customer_id      TEXT NOT NULL,
            address_nickname TEXT NOT NULL,
            tx_date          TEXT NOT NULL,
            card_number      TEXT NOT NULL
                             REFERENCES credit_cards(number) ON DELETE CASCADE,
            status           TEXT NOT NULL DEFAULT 'Pending',
            FOREIGN KEY (customer_id, address_nickname)
                REFERENCES shipping_addresses(customer_id, nickname)
                ON DELETE CASCADE
        )
        "#,
    ),
    (
        "idx_transactions_date",
        "CREATE INDEX idx_transactions_date ON transactions(tx_date)",
    ),
    (
        "idx_basket_items_product",
        "CREATE INDEX idx_basket_items_product ON basket_items(product_id)",
    ),
];

/// Creates every schema object in dependency order.
///
/// ## Returns
/// The number of statements that failed. Failures are logged per object
/// and do not stop the pass; an already-existing table counts as a failure
/// here, which is why [`rebuild`] drops first.
pub async fn create_all(pool: &SqlitePool) -> usize {
    let mut failures = 0;

    for (name, ddl) in SCHEMA_OBJECTS {
        match sqlx::query(ddl).execute(pool).await {
            Ok(_) => info!(object = name, "Created schema object"),
            Err(e) => {
                error!(object = name, error = %e, "Failed to create schema object");
                failures += 1;
            }
        }
    }

    failures
}

/// Drops every schema object in reverse dependency order.
///
/// Missing objects are logged and skipped, so this is safe on a partial
/// or empty database.
pub async fn drop_all(pool: &SqlitePool) -> usize {
    let mut failures = 0;

    for (name, ddl) in SCHEMA_OBJECTS.iter().rev() {
        let stmt = if ddl.trim_start().starts_with("CREATE INDEX") {
            format!("DROP INDEX {name}")
        } else {
            format!("DROP TABLE {name}")
        };

        match sqlx::query(&stmt).execute(pool).await {
            Ok(_) => info!(object = name, "Dropped schema object"),
            Err(e) => {
                error!(object = name, error = %e, "Failed to drop schema object");
                failures += 1;
            }
        }
    }

    failures
}

/// Drops and recreates the whole schema, returning create-pass failures.
///
/// The drop pass is best-effort (its failures are logged, not returned):
/// rebuilding an empty database is expected to "fail" every drop.
pub async fn rebuild(pool: &SqlitePool) -> usize {
    drop_all(pool).await;
    create_all(pool).await
}

// =============================================================================
// Unit Tests
// =============================================================================
