//! # Customer Repository
//!
//! Registration, login lookup and the composed customer profile view.
//!
//! ## Registration Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      How Registration Works                             │
//! │                                                                         │
//! │  NewCustomer input                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_new_customer  ← format + tier/credit-band checks              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    SELECT max id  ──► "C005"                                            │
//! │    next id        ──► "C006"                                            │
//! │    INSERT customers                                                     │
//! │    INSERT credit_lines     (non-bronze only)                            │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Duplicate email/phone surfaces as a UNIQUE violation from the          │
//! │  insert; nothing is committed in that case.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two registrations racing can compute the same successor id; the loser
//! fails on the primary key. Accepted limitation of MAX+1 allocation.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use shoplite_core::ids::next_customer_id;
use shoplite_core::validation::validate_new_customer;
use shoplite_core::{CreditCard, CreditLine, Customer, NewCustomer, ShippingAddress};

/// Everything on file for one customer, composed from four tables.
///
/// This is the "full account view" shown in account-management mode.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfile {
    pub customer: Customer,
    pub credit_line: Option<CreditLine>,
    pub cards: Vec<CreditCard>,
    pub addresses: Vec<ShippingAddress>,
}

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CustomerRepository::new(pool);
///
/// let customer = repo.register(input).await?;
/// let profile = repo.profile(&customer.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a new customer and returns the stored row.
    ///
    /// ## How It Works
    /// 1. Validates every field (nothing is written on failure)
    /// 2. Allocates the next sequential id inside the transaction
    /// 3. Inserts the customer, plus a credit line for non-bronze tiers
    ///
    /// ## Errors
    /// * `Domain` - validation failure (bad email, credit line outside band, ...)
    /// * `UniqueViolation` - email or phone already registered
    pub async fn register(&self, input: NewCustomer) -> DbResult<Customer> {
        validate_new_customer(&input).map_err(shoplite_core::CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        // Numerically largest existing id; padded ids sort correctly
        // under (length, lexicographic).
        let current_max: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM customers ORDER BY length(id) DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let id = next_customer_id(current_max.as_ref().map(|(id,)| id.as_str()))?;

        sqlx::query(
            r#"
            INSERT INTO customers (id, first_name, last_name, email, address, phone, tier)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(input.tier)
        .execute(&mut *tx)
        .await?;

        if let Some(limit_cents) = input.credit_line_cents {
            sqlx::query("INSERT INTO credit_lines (customer_id, limit_cents) VALUES (?1, ?2)")
                .bind(&id)
                .bind(limit_cents)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(customer_id = %id, tier = %input.tier, "Registered customer");

        Ok(Customer {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            address: input.address,
            phone: input.phone,
            tier: input.tier,
        })
    }

    /// The id the next registration would receive.
    ///
    /// Advisory only: a registration that lands in between gets this id
    /// and the preview goes stale.
    pub async fn peek_next_id(&self) -> DbResult<String> {
        let current_max: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM customers ORDER BY length(id) DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(next_customer_id(
            current_max.as_ref().map(|(id,)| id.as_str()),
        )?)
    }

    /// Gets a customer by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - No such id
    pub async fn get(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, first_name, last_name, email, address, phone, tier
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Looks a customer up for login, failing loudly on an unknown id.
    pub async fn login(&self, id: &str) -> DbResult<Customer> {
        debug!(customer_id = %id, "Login lookup");
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Gets a customer's credit line, if any (bronze has none).
    pub async fn credit_line(&self, customer_id: &str) -> DbResult<Option<CreditLine>> {
        let line = sqlx::query_as::<_, CreditLine>(
            "SELECT customer_id, limit_cents FROM credit_lines WHERE customer_id = ?1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(line)
    }

    /// Composes the full account view for one customer.
    ///
    /// ## What It Joins
    /// - the customer row
    /// - the credit line (absent for bronze)
    /// - every stored card the customer owns (the shared default card,
    ///   which has no owner, is never listed here)
    /// - every shipping address, ordered by nickname
    pub async fn profile(&self, customer_id: &str) -> DbResult<CustomerProfile> {
        let customer = self
            .get(customer_id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", customer_id))?;

        let credit_line = self.credit_line(customer_id).await?;

        let cards = sqlx::query_as::<_, CreditCard>(
            r#"
            SELECT number, security_code, owner_name, network, billing_address,
                   expires_on, customer_id
            FROM credit_cards
            WHERE customer_id = ?1
            ORDER BY number
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let addresses = sqlx::query_as::<_, ShippingAddress>(
            r#"
            SELECT customer_id, nickname, recipient, street_number, street,
                   city, state, country, zip
            FROM shipping_addresses
            WHERE customer_id = ?1
            ORDER BY nickname
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CustomerProfile {
            customer,
            credit_line,
            cards,
            addresses,
        })
    }

    /// Counts registered customers.
    pub async fn count(&self) -> DbResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
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
    use shoplite_core::Tier;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn registration(email: &str, phone: &str, tier: Tier, credit: Option<i64>) -> NewCustomer {
        NewCustomer {
            first_name: "Alice".to_string(),
            last_name: "Wong".to_string(),
            email: email.to_string(),
            address: "12 Hill Rd".to_string(),
            phone: phone.to_string(),
            tier,
            credit_line_cents: credit,
        }
    }

    #[tokio::test]
    async fn test_register_allocates_sequential_ids() {
        let db = test_db().await;
        let repo = db.customers();

        let first = repo
            .register(registration("a@x.com", "5550000001", Tier::Bronze, None))
            .await
            .unwrap();
        let second = repo
            .register(registration("b@x.com", "5550000002", Tier::Bronze, None))
            .await
            .unwrap();

        assert_eq!(first.id, "C001");
        assert_eq!(second.id, "C002");
    }

    #[tokio::test]
    async fn test_register_writes_credit_line_for_gold() {
        let db = test_db().await;
        let repo = db.customers();

        let customer = repo
            .register(registration("g@x.com", "5550000003", Tier::Gold, Some(70000)))
            .await
            .unwrap();

        let line = repo.credit_line(&customer.id).await.unwrap().unwrap();
        assert_eq!(line.limit_cents, 70000);
    }

    #[tokio::test]
    async fn test_register_bronze_has_no_credit_line() {
        let db = test_db().await;
        let repo = db.customers();

        let customer = repo
            .register(registration("z@x.com", "5550000004", Tier::Bronze, None))
            .await
            .unwrap();

        assert!(repo.credit_line(&customer.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_credit_line_outside_band() {
        let db = test_db().await;
        let repo = db.customers();

        let err = repo
            .register(registration("s@x.com", "5550000005", Tier::Silver, Some(59999)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));

        // Validation failed before any write.
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_and_phone() {
        let db = test_db().await;
        let repo = db.customers();

        repo.register(registration("dup@x.com", "5550000006", Tier::Bronze, None))
            .await
            .unwrap();

        // Same email, different phone.
        let err = repo
            .register(registration("dup@x.com", "5550000007", Tier::Bronze, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Same phone, different email.
        let err = repo
            .register(registration("other@x.com", "5550000006", Tier::Bronze, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_peek_next_id_tracks_registrations() {
        let db = test_db().await;
        let repo = db.customers();

        assert_eq!(repo.peek_next_id().await.unwrap(), "C001");
        repo.register(registration("a@x.com", "5550000001", Tier::Bronze, None))
            .await
            .unwrap();
        assert_eq!(repo.peek_next_id().await.unwrap(), "C002");
    }

    #[tokio::test]
    async fn test_login_unknown_id() {
        let db = test_db().await;
        let err = db.customers().login("C999").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_profile_composes_all_sections() {
        let db = test_db().await;
        let repo = db.customers();

        let customer = repo
            .register(registration("p@x.com", "5550000008", Tier::Platinum, Some(78000)))
            .await
            .unwrap();

        let profile = repo.profile(&customer.id).await.unwrap();
        assert_eq!(profile.customer.id, customer.id);
        assert_eq!(profile.credit_line.unwrap().limit_cents, 78000);
        assert!(profile.cards.is_empty());
        assert!(profile.addresses.is_empty());
    }
}
