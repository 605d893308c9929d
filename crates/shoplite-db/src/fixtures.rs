//! # Fixtures
//!
//! Two ways to populate a fresh database:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Seed Data                                       │
//! │                                                                         │
//! │  seed_fixture                                                           │
//! │    The hand-written starter set: 15 products (5 per kind), four        │
//! │    customers spanning all four tiers, their cards/addresses, three     │
//! │    historical orders and three promotional offers. Deterministic.      │
//! │                                                                         │
//! │  seed_random(n)                                                         │
//! │    n synthetic customers starting at C006, each with an address, a     │
//! │    card (bronze reuses the shared default card), and one completed     │
//! │    order of 1-3 random products at a price jittered ±10% off list.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fixture rows are historical data and go in with plain INSERTs, not
//! through the validating repositories: some of them predate today's
//! rules (an out-of-band credit line, cards that have since expired).

use chrono::{Days, NaiveDate};
use rand::Rng;
use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::order::new_basket_id;
use shoplite_core::Tier;

// =============================================================================
// Deterministic Fixture
// =============================================================================

/// (id, name, kind, price cents, stock, description)
const PRODUCTS: &[(&str, &str, &str, i64, i64, &str)] = &[
    ("P001", "Laptop A", "laptops", 99999, 20, "14\" 8GB RAM, 256GB SSD"),
    ("P002", "Laptop B", "laptops", 129999, 15, "15.6\" 16GB RAM, RTX GPU"),
    ("P003", "Laptop C", "laptops", 109999, 10, "13.3\" 16GB RAM, 512GB SSD"),
    ("P004", "Laptop D", "laptops", 89999, 18, "2-in-1 Touchscreen, 8GB RAM"),
    ("P005", "Laptop E", "laptops", 59999, 25, "15.6\" 4GB RAM, 128GB SSD"),
    ("P006", "Printer X", "printers", 14999, 15, "Color Inkjet Printer with WiFi"),
    ("P007", "Printer Y", "printers", 19999, 8, "Laser B/W, High-Speed"),
    ("P008", "Printer Z", "printers", 24999, 12, "All-in-One: Print, Scan, Fax"),
    ("P009", "Printer Eco", "printers", 29999, 6, "EcoTank Refillable System"),
    ("P010", "Printer Photo", "printers", 17999, 10, "High-res Color Photo Printer"),
    ("P011", "Desktop A", "computers", 74999, 14, "8GB RAM, 256GB SSD"),
    ("P012", "Desktop B", "computers", 84999, 12, "16GB RAM, SSD"),
    ("P013", "Desktop C", "computers", 139999, 8, "RTX 3060, Gaming"),
    ("P014", "Desktop D", "computers", 69999, 20, "Mini PC, 8GB RAM, 512GB SSD"),
    ("P015", "Desktop E", "computers", 99999, 10, "All-in-One 21\", 8GB RAM"),
];

const LAPTOPS: &[(&str, &str, f64)] = &[
    ("P001", "Ultrabook", 1.20),
    ("P002", "Gaming", 2.50),
    ("P003", "Business", 1.30),
    ("P004", "Convertible", 1.40),
    ("P005", "Budget", 2.00),
];

const COMPUTERS: &[(&str, &str)] = &[
    ("P011", "Intel i5"),
    ("P012", "Intel i5"),
    ("P013", "Intel i7"),
    ("P014", "AMD Ryzen 5"),
    ("P015", "Intel i5"),
];

const PRINTERS: &[(&str, &str, &str)] = &[
    ("P006", "Inkjet", "1200x1200"),
    ("P007", "Laser", "2400x600"),
    ("P008", "All-in-One", "1200x1200"),
    ("P009", "EcoTank", "4800x1200"),
    ("P010", "Photo", "5760x1440"),
];

/// (id, first, last, email, address, phone, tier)
const CUSTOMERS: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    ("C001", "Alice", "Wong", "alice@example.com", "123 Maple St", "1234567890", "gold"),
    ("C002", "Bob", "Smith", "bob@example.com", "456 Oak Ave", "2345678901", "silver"),
    ("C003", "Charlie", "Johnson", "charlie@example.com", "789 Pine Rd", "3456789012", "platinum"),
    ("C004", "Dana", "Lee", "dana@example.com", "135 Birch Ln", "4567890123", "bronze"),
];

/// Historical credit lines. C003's sits outside today's platinum band;
/// it predates the band rule and is kept as-is.
const CREDIT_LINES: &[(&str, i64)] = &[("C001", 69000), ("C002", 61000), ("C003", 73000)];

/// (number, sec, owner, network, billing, expires, owner customer)
const CARDS: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    ("4111111111111111", "123", "Alice Wong", "Visa", "123 Maple St", "2026-05-01", "C001"),
    ("5500000000000004", "456", "Bob Smith", "MasterCard", "456 Oak Ave", "2027-08-15", "C002"),
    ("340000000000009", "789", "Charlie Johnson", "Amex", "789 Pine Rd", "2025-12-01", "C003"),
];

/// (customer, nickname, recipient, number, street, city, state, country, zip)
const ADDRESSES: &[(&str, &str, &str, &str, &str, &str, &str, &str, &str)] = &[
    ("C001", "Home", "Alice Wong", "123", "Maple St", "Springfield", "VA", "USA", "22150"),
    ("C002", "Office", "Bob Smith", "456", "Oak Ave", "Arlington", "VA", "USA", "22203"),
    ("C003", "Main", "Charlie Johnson", "789", "Pine Rd", "Fairfax", "VA", "USA", "22030"),
];

const BASKETS: &[(&str, &str)] = &[("B1001", "C001"), ("B1002", "C002"), ("B1003", "C003")];

/// (basket, customer, nickname, date, card, status)
const TRANSACTIONS: &[(&str, &str, &str, &str, &str, &str)] = &[
    ("B1001", "C001", "Home", "2025-05-01", "4111111111111111", "Completed"),
    ("B1002", "C002", "Office", "2025-05-02", "5500000000000004", "Pending"),
    ("B1003", "C003", "Main", "2025-05-03", "340000000000009", "Completed"),
];

/// (basket, product, quantity, price sold cents)
const LINE_ITEMS: &[(&str, &str, i64, i64)] = &[
    ("B1001", "P001", 1, 99999),
    ("B1001", "P006", 1, 14999),
    ("B1002", "P002", 1, 129999),
    ("B1003", "P013", 1, 139999),
];

const OFFERS: &[(&str, i64)] = &[("P001", 89999), ("P006", 12999), ("P013", 124999)];

/// Loads the deterministic starter data set into an empty schema.
pub async fn seed_fixture(db: &Database) -> DbResult<()> {
    let pool = db.pool();

    for (id, name, kind, price, qty, desc) in PRODUCTS {
        sqlx::query(
            "INSERT INTO products (id, name, kind, price_cents, quantity_on_hand, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(id)
        .bind(name)
        .bind(kind)
        .bind(price)
        .bind(qty)
        .bind(desc)
        .execute(pool)
        .await?;
    }
    for (id, body_type, weight) in LAPTOPS {
        sqlx::query("INSERT INTO laptops (product_id, body_type, weight_kg) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(body_type)
            .bind(weight)
            .execute(pool)
            .await?;
    }
    for (id, cpu) in COMPUTERS {
        sqlx::query("INSERT INTO computers (product_id, cpu) VALUES (?1, ?2)")
            .bind(id)
            .bind(cpu)
            .execute(pool)
            .await?;
    }
    for (id, printer_type, resolution) in PRINTERS {
        sqlx::query(
            "INSERT INTO printers (product_id, printer_type, resolution) VALUES (?1, ?2, ?3)",
        )
        .bind(id)
        .bind(printer_type)
        .bind(resolution)
        .execute(pool)
        .await?;
    }

    for (id, first, last, email, address, phone, tier) in CUSTOMERS {
        sqlx::query(
            "INSERT INTO customers (id, first_name, last_name, email, address, phone, tier)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(id)
        .bind(first)
        .bind(last)
        .bind(email)
        .bind(address)
        .bind(phone)
        .bind(tier)
        .execute(pool)
        .await?;
    }
    for (customer_id, limit_cents) in CREDIT_LINES {
        sqlx::query("INSERT INTO credit_lines (customer_id, limit_cents) VALUES (?1, ?2)")
            .bind(customer_id)
            .bind(limit_cents)
            .execute(pool)
            .await?;
    }
    for (number, sec, owner, network, billing, expires, customer_id) in CARDS {
        sqlx::query(
            "INSERT INTO credit_cards
                 (number, security_code, owner_name, network, billing_address,
                  expires_on, customer_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(number)
        .bind(sec)
        .bind(owner)
        .bind(network)
        .bind(billing)
        .bind(expires)
        .bind(customer_id)
        .execute(pool)
        .await?;
    }
    for (cid, nick, recipient, num, street, city, state, country, zip) in ADDRESSES {
        sqlx::query(
            "INSERT INTO shipping_addresses
                 (customer_id, nickname, recipient, street_number, street,
                  city, state, country, zip)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(cid)
        .bind(nick)
        .bind(recipient)
        .bind(num)
        .bind(street)
        .bind(city)
        .bind(state)
        .bind(country)
        .bind(zip)
        .execute(pool)
        .await?;
    }

    for (basket_id, customer_id) in BASKETS {
        sqlx::query("INSERT INTO baskets (id, customer_id) VALUES (?1, ?2)")
            .bind(basket_id)
            .bind(customer_id)
            .execute(pool)
            .await?;
    }
    for (basket, customer, nick, tx_date, card, status) in TRANSACTIONS {
        sqlx::query(
            "INSERT INTO transactions
                 (basket_id, customer_id, address_nickname, tx_date, card_number, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(basket)
        .bind(customer)
        .bind(nick)
        .bind(tx_date)
        .bind(card)
        .bind(status)
        .execute(pool)
        .await?;
    }
    for (basket, product, qty, price) in LINE_ITEMS {
        sqlx::query(
            "INSERT INTO basket_items (basket_id, product_id, quantity, price_sold_cents)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(basket)
        .bind(product)
        .bind(qty)
        .bind(price)
        .execute(pool)
        .await?;
    }
    for (product_id, offer_cents) in OFFERS {
        sqlx::query("INSERT INTO product_offers (product_id, offer_price_cents) VALUES (?1, ?2)")
            .bind(product_id)
            .bind(offer_cents)
            .execute(pool)
            .await?;
    }

    info!(
        products = PRODUCTS.len(),
        customers = CUSTOMERS.len(),
        orders = TRANSACTIONS.len(),
        "Loaded deterministic fixture"
    );
    Ok(())
}

// =============================================================================
// Randomized Fixture
// =============================================================================

const FIRST_NAMES: &[&str] = &[
    "Evan", "Farah", "Grace", "Hiro", "Ines", "Jonas", "Kira", "Liam", "Mona", "Nadia", "Oscar",
    "Priya", "Quinn", "Rosa", "Sam", "Tara", "Umar", "Vera", "Wes", "Yara",
];

const LAST_NAMES: &[&str] = &[
    "Adams", "Baker", "Chen", "Diaz", "Evans", "Fischer", "Garcia", "Hassan", "Ito", "Jensen",
    "Khan", "Lopez", "Meyer", "Novak", "Okafor", "Park", "Quist", "Rossi", "Silva", "Tan",
];

const STREETS: &[&str] = &[
    "Maple St", "Oak Ave", "Pine Rd", "Birch Ln", "Cedar Ct", "Elm Dr", "Walnut Way",
    "Chestnut Blvd", "Willow Pl", "Aspen Ter",
];

const CITIES: &[(&str, &str)] = &[
    ("Springfield", "VA"),
    ("Arlington", "VA"),
    ("Fairfax", "VA"),
    ("Richmond", "VA"),
    ("Norfolk", "VA"),
    ("Bethesda", "MD"),
    ("Rockville", "MD"),
    ("Annapolis", "MD"),
];

const NETWORKS: &[&str] = &["Visa", "MasterCard", "Amex"];

/// Tier draw weighted bronze 1 : silver 2 : gold 3 : platinum 2.
fn random_tier<R: Rng>(rng: &mut R) -> Tier {
    match rng.random_range(0..8) {
        0 => Tier::Bronze,
        1..=2 => Tier::Silver,
        3..=5 => Tier::Gold,
        _ => Tier::Platinum,
    }
}

fn random_card_number<R: Rng>(rng: &mut R) -> String {
    let len = rng.random_range(13..=16);
    (0..len).map(|_| char::from(b'0' + rng.random_range(0..10u8))).collect()
}

/// Generates `count` synthetic customers with one completed order each.
///
/// ## What Each Customer Gets
/// - a sequential id starting at the fixed offset C006 (after the
///   deterministic fixture's ids)
/// - a tier drawn 1:2:3:2 and, for non-bronze, a credit line inside the
///   tier's band plus their own card; bronze reuses the shared default card
/// - one "Home" shipping address
/// - one basket of 1-3 random catalog products, quantity 1-2, price
///   jittered ±10% off the list price
/// - a `Completed` transaction dated within the 60 days before `today`
///
/// Stock is deliberately not decremented: these are back-dated orders,
/// not live checkouts.
pub async fn seed_random(db: &Database, count: usize, today: NaiveDate) -> DbResult<usize> {
    let pool = db.pool();

    db.accounts().ensure_default_card().await?;

    let mut generated = 0;
    for i in 6..(count + 6) {
        // Non-crypto rng is fine for fixture data; re-created per iteration
        // so no !Send guard is held across awaits.
        let (customer_id, first, last, email, phone, tier, street_number, street, city, state, zip) = {
            let mut rng = rand::rng();
            let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
            let (city, state) = CITIES[rng.random_range(0..CITIES.len())];
            (
                shoplite_core::ids::format_customer_id(i as u64),
                first,
                last,
                format!("{}.{}{}@example.net", first.to_lowercase(), last.to_lowercase(), i),
                format!("555{i:07}"),
                random_tier(&mut rng),
                rng.random_range(1..999).to_string(),
                STREETS[rng.random_range(0..STREETS.len())],
                city,
                state,
                format!("{:05}", rng.random_range(10000..99999)),
            )
        };
        let address = format!("{street_number} {street}, {city}, {state}");

        sqlx::query(
            "INSERT INTO customers (id, first_name, last_name, email, address, phone, tier)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&customer_id)
        .bind(first)
        .bind(last)
        .bind(&email)
        .bind(&address)
        .bind(&phone)
        .bind(tier)
        .execute(pool)
        .await?;

        if let Some((min, max)) = tier.credit_band() {
            let limit_cents = {
                let mut rng = rand::rng();
                rng.random_range(min..=max)
            };
            sqlx::query("INSERT INTO credit_lines (customer_id, limit_cents) VALUES (?1, ?2)")
                .bind(&customer_id)
                .bind(limit_cents)
                .execute(pool)
                .await?;
        }

        // Non-bronze customers carry their own card; bronze pays with the
        // shared default card.
        let card_number = if tier == Tier::Bronze {
            shoplite_core::DEFAULT_CARD_NUMBER.to_string()
        } else {
            let (number, sec, network, expires) = {
                let mut rng = rand::rng();
                (
                    random_card_number(&mut rng),
                    format!("{}", rng.random_range(100..=999)),
                    NETWORKS[rng.random_range(0..NETWORKS.len())],
                    today
                        .checked_add_days(Days::new(rng.random_range(365..=1095)))
                        .unwrap_or(today),
                )
            };
            sqlx::query(
                "INSERT INTO credit_cards
                     (number, security_code, owner_name, network, billing_address,
                      expires_on, customer_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(&number)
            .bind(&sec)
            .bind(format!("{first} {last}"))
            .bind(network)
            .bind(&address)
            .bind(expires)
            .bind(&customer_id)
            .execute(pool)
            .await?;
            number
        };

        sqlx::query(
            "INSERT INTO shipping_addresses
                 (customer_id, nickname, recipient, street_number, street,
                  city, state, country, zip)
             VALUES (?1, 'Home', ?2, ?3, ?4, ?5, ?6, 'USA', ?7)",
        )
        .bind(&customer_id)
        .bind(format!("{first} {last}"))
        .bind(&street_number)
        .bind(street)
        .bind(city)
        .bind(state)
        .bind(&zip)
        .execute(pool)
        .await?;

        let basket_id = new_basket_id();
        sqlx::query("INSERT INTO baskets (id, customer_id) VALUES (?1, ?2)")
            .bind(&basket_id)
            .bind(&customer_id)
            .execute(pool)
            .await?;

        let picks = {
            let mut rng = rand::rng();
            rng.random_range(1..=3)
        };
        let products: Vec<(String, i64)> =
            sqlx::query_as("SELECT id, price_cents FROM products ORDER BY RANDOM() LIMIT ?1")
                .bind(picks as i64)
                .fetch_all(pool)
                .await?;

        for (product_id, price_cents) in &products {
            let (quantity, price_sold) = {
                let mut rng = rand::rng();
                let jitter = rng.random_range(-10..=10);
                (
                    rng.random_range(1..=2i64),
                    shoplite_core::Money::from_cents(*price_cents)
                        .with_percent_delta(jitter)
                        .cents(),
                )
            };
            sqlx::query(
                "INSERT INTO basket_items (basket_id, product_id, quantity, price_sold_cents)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&basket_id)
            .bind(product_id)
            .bind(quantity)
            .bind(price_sold)
            .execute(pool)
            .await?;
        }

        let tx_date = {
            let mut rng = rand::rng();
            today
                .checked_sub_days(Days::new(rng.random_range(0..=60)))
                .unwrap_or(today)
        };
        sqlx::query(
            "INSERT INTO transactions
                 (basket_id, customer_id, address_nickname, tx_date, card_number, status)
             VALUES (?1, ?2, 'Home', ?3, ?4, 'Completed')",
        )
        .bind(&basket_id)
        .bind(&customer_id)
        .bind(tx_date)
        .bind(&card_number)
        .execute(pool)
        .await?;

        generated += 1;
    }

    info!(generated, "Generated randomized customers");
    Ok(generated)
}

// =============================================================================
// Unit Tests
// =============================================================================
