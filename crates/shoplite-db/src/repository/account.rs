//! # Account Repository
//!
//! Cards and shipping addresses attached to a customer account.
//!
//! ## Ownership Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cards and Addresses                                │
//! │                                                                         │
//! │  credit_cards                                                           │
//! │    PK: number (globally unique; one card, one owner)                   │
//! │    customer_id NULL ──► the shared default card used when a            │
//! │                         checkout has no stored card                    │
//! │                                                                         │
//! │  shipping_addresses                                                     │
//! │    PK: (customer_id, nickname)                                          │
//! │    "Home" is unique per customer, but every customer can have          │
//! │    their own "Home"                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use shoplite_core::validation::{validate_new_address, validate_new_card};
use shoplite_core::{CreditCard, ShippingAddress, DEFAULT_CARD_NUMBER};

/// Repository for account maintenance operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    // =========================================================================
    // Cards
    // =========================================================================

    /// Adds a credit card to a customer's account.
    ///
    /// ## Errors
    /// * `Domain` - malformed number/code, or expiry not in the future
    /// * `UniqueViolation` - card number already stored (any owner)
    /// * `ForeignKeyViolation` - unknown customer id
    ///
    /// `today` is passed in so the expiry rule stays testable.
    pub async fn add_card(&self, card: &CreditCard, today: NaiveDate) -> DbResult<()> {
        validate_new_card(
            &card.number,
            &card.security_code,
            &card.owner_name,
            &card.network,
            &card.billing_address,
            card.expires_on,
            today,
        )
        .map_err(shoplite_core::CoreError::from)?;

        sqlx::query(
            r#"
            INSERT INTO credit_cards
                (number, security_code, owner_name, network, billing_address,
                 expires_on, customer_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&card.number)
        .bind(&card.security_code)
        .bind(&card.owner_name)
        .bind(&card.network)
        .bind(&card.billing_address)
        .bind(card.expires_on)
        .bind(&card.customer_id)
        .execute(&self.pool)
        .await?;

        info!(
            customer_id = ?card.customer_id,
            network = %card.network,
            "Stored credit card"
        );
        Ok(())
    }

    /// Lists the cards a customer owns (never the shared default card).
    pub async fn list_cards(&self, customer_id: &str) -> DbResult<Vec<CreditCard>> {
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

        Ok(cards)
    }

    /// Gets a stored card by number.
    pub async fn get_card(&self, number: &str) -> DbResult<Option<CreditCard>> {
        let card = sqlx::query_as::<_, CreditCard>(
            r#"
            SELECT number, security_code, owner_name, network, billing_address,
                   expires_on, customer_id
            FROM credit_cards
            WHERE number = ?1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Inserts the shared default card if it is not already present.
    ///
    /// Checkout references a card by number; customers with no stored card
    /// pay against this ownerless row. Idempotent.
    pub async fn ensure_default_card(&self) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO credit_cards
                (number, security_code, owner_name, network, billing_address,
                 expires_on, customer_id)
            VALUES (?1, '123', 'Default Card', 'Visa', 'N/A', ?2, NULL)
            "#,
        )
        .bind(DEFAULT_CARD_NUMBER)
        .bind(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap_or_default())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Shipping Addresses
    // =========================================================================

    /// Adds a shipping address under a per-customer nickname.
    ///
    /// ## Errors
    /// * `Domain` - missing field or malformed zip
    /// * `UniqueViolation` - this customer already uses the nickname
    /// * `ForeignKeyViolation` - unknown customer id
    pub async fn add_address(&self, address: &ShippingAddress) -> DbResult<()> {
        validate_new_address(
            &address.nickname,
            &address.recipient,
            &address.street_number,
            &address.street,
            &address.city,
            &address.state,
            &address.country,
            &address.zip,
        )
        .map_err(shoplite_core::CoreError::from)?;

        sqlx::query(
            r#"
            INSERT INTO shipping_addresses
                (customer_id, nickname, recipient, street_number, street,
                 city, state, country, zip)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&address.customer_id)
        .bind(&address.nickname)
        .bind(&address.recipient)
        .bind(&address.street_number)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.country)
        .bind(&address.zip)
        .execute(&self.pool)
        .await?;

        info!(
            customer_id = %address.customer_id,
            nickname = %address.nickname,
            "Stored shipping address"
        );
        Ok(())
    }

    /// Lists a customer's shipping addresses, ordered by nickname.
    pub async fn list_addresses(&self, customer_id: &str) -> DbResult<Vec<ShippingAddress>> {
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

        Ok(addresses)
    }

    /// Gets one shipping address by (customer, nickname).
    pub async fn get_address(
        &self,
        customer_id: &str,
        nickname: &str,
    ) -> DbResult<Option<ShippingAddress>> {
        let address = sqlx::query_as::<_, ShippingAddress>(
            r#"
            SELECT customer_id, nickname, recipient, street_number, street,
                   city, state, country, zip
            FROM shipping_addresses
            WHERE customer_id = ?1 AND nickname = ?2
            "#,
        )
        .bind(customer_id)
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shoplite_core::{NewCustomer, Tier};

    async fn db_with_customer(id_email: &str, phone: &str) -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db
            .customers()
            .register(NewCustomer {
                first_name: "Alice".to_string(),
                last_name: "Wong".to_string(),
                email: id_email.to_string(),
                address: "12 Hill Rd".to_string(),
                phone: phone.to_string(),
                tier: Tier::Bronze,
                credit_line_cents: None,
            })
            .await
            .unwrap();
        (db, customer.id)
    }

    fn card(number: &str, owner: &str, customer_id: Option<&str>) -> CreditCard {
        CreditCard {
            number: number.to_string(),
            security_code: "123".to_string(),
            owner_name: owner.to_string(),
            network: "Visa".to_string(),
            billing_address: "12 Hill Rd".to_string(),
            expires_on: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            customer_id: customer_id.map(str::to_string),
        }
    }

    fn address(customer_id: &str, nickname: &str) -> ShippingAddress {
        ShippingAddress {
            customer_id: customer_id.to_string(),
            nickname: nickname.to_string(),
            recipient: "Alice Wong".to_string(),
            street_number: "12".to_string(),
            street: "Hill Rd".to_string(),
            city: "Cambridge".to_string(),
            state: "MA".to_string(),
            country: "USA".to_string(),
            zip: "02139".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
    }

    #[tokio::test]
    async fn test_add_and_list_cards() {
        let (db, cid) = db_with_customer("a@x.com", "5550000001").await;
        let repo = db.accounts();

        repo.add_card(&card("4111111111111234", "Alice Wong", Some(&cid)), today())
            .await
            .unwrap();

        let cards = repo.list_cards(&cid).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].number, "4111111111111234");
    }

    #[tokio::test]
    async fn test_duplicate_card_number_rejected() {
        let (db, cid) = db_with_customer("a@x.com", "5550000001").await;
        let repo = db.accounts();

        repo.add_card(&card("4111111111111234", "Alice Wong", Some(&cid)), today())
            .await
            .unwrap();
        let err = repo
            .add_card(&card("4111111111111234", "Alice Wong", Some(&cid)), today())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_expired_card_rejected() {
        let (db, cid) = db_with_customer("a@x.com", "5550000001").await;

        let mut expired = card("4111111111111234", "Alice Wong", Some(&cid));
        expired.expires_on = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(); // == today

        let err = db.accounts().add_card(&expired, today()).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));
    }

    #[tokio::test]
    async fn test_default_card_is_idempotent_and_unowned() {
        let (db, cid) = db_with_customer("a@x.com", "5550000001").await;
        let repo = db.accounts();

        repo.ensure_default_card().await.unwrap();
        repo.ensure_default_card().await.unwrap(); // no error second time

        let default = repo.get_card(DEFAULT_CARD_NUMBER).await.unwrap().unwrap();
        assert!(default.customer_id.is_none());

        // Never listed under any customer.
        assert!(repo.list_cards(&cid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nickname_unique_per_customer_only() {
        let (db, first) = db_with_customer("a@x.com", "5550000001").await;
        let second = db
            .customers()
            .register(NewCustomer {
                first_name: "Bob".to_string(),
                last_name: "Li".to_string(),
                email: "b@x.com".to_string(),
                address: "9 Elm St".to_string(),
                phone: "5550000002".to_string(),
                tier: Tier::Bronze,
                credit_line_cents: None,
            })
            .await
            .unwrap();
        let repo = db.accounts();

        repo.add_address(&address(&first, "Home")).await.unwrap();

        // Same nickname for the same customer fails.
        let err = repo.add_address(&address(&first, "Home")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Same nickname for a different customer is fine.
        repo.add_address(&address(&second.id, "Home")).await.unwrap();
        assert_eq!(repo.list_addresses(&second.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_zip_rejected_before_write() {
        let (db, cid) = db_with_customer("a@x.com", "5550000001").await;
        let repo = db.accounts();

        let mut bad = address(&cid, "Home");
        bad.zip = "2139".to_string();

        let err = repo.add_address(&bad).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));
        assert!(repo.list_addresses(&cid).await.unwrap().is_empty());
    }
}
