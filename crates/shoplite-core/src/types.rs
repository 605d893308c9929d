//! # Domain Types
//!
//! Core domain types used throughout Shoplite.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │     Product     │   │ StoreTransaction│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id ("C006")    │   │  id ("P001")    │   │  id (auto int)  │       │
//! │  │  email, phone   │   │  kind (tagged)  │   │  basket_id      │       │
//! │  │  tier           │   │  price_cents    │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Tier       │   │   ProductKind   │   │    TxStatus     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Bronze         │   │  Laptops        │   │  Pending        │       │
//! │  │  Silver         │   │  Printers       │   │  Completed      │       │
//! │  │  Gold           │   │  Computers      │   └─────────────────┘       │
//! │  │  Platinum       │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Type-Per-Table Polymorphism
//! The catalog stores satellite attribute tables per product kind (laptops,
//! computers, printers). In Rust that pattern collapses into the
//! [`ProductSpecs`] tagged union: the kind column selects the variant, the
//! satellite columns become the variant's payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

// =============================================================================
// Tier
// =============================================================================

/// Customer classification gating credit-line eligibility.
///
/// Tier is immutable once chosen; there is no upgrade/downgrade path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    /// All tiers, in ascending order.
    pub const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum];

    /// Whether this tier carries a credit-line row.
    ///
    /// Bronze customers never get one; everyone above does.
    #[inline]
    pub const fn requires_credit_line(&self) -> bool {
        !matches!(self, Tier::Bronze)
    }

    /// The inclusive credit-line band for this tier, in cents.
    ///
    /// ## Bands
    /// ```text
    /// silver    $600.00 – $679.99
    /// gold      $680.00 – $749.99
    /// platinum  $750.00 – $800.00
    /// ```
    ///
    /// These bands are enforced at entry time only, not as a database
    /// constraint (seeding writes historical rows that predate the rule).
    pub const fn credit_band(&self) -> Option<(i64, i64)> {
        match self {
            Tier::Bronze => None,
            Tier::Silver => Some((60000, 67999)),
            Tier::Gold => Some((68000, 74999)),
            Tier::Platinum => Some((75000, 80000)),
        }
    }

    /// Lowercase tag stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bronze" => Ok(Tier::Bronze),
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            "platinum" => Ok(Tier::Platinum),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

// =============================================================================
// Product Kind
// =============================================================================

/// Type tag selecting a product's satellite attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Laptops,
    Printers,
    Computers,
}

impl ProductKind {
    /// All kinds, in catalog display order.
    pub const ALL: [ProductKind; 3] =
        [ProductKind::Laptops, ProductKind::Printers, ProductKind::Computers];

    /// Lowercase tag stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Laptops => "laptops",
            ProductKind::Printers => "printers",
            ProductKind::Computers => "computers",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "laptops" => Ok(ProductKind::Laptops),
            "printers" => Ok(ProductKind::Printers),
            "computers" => Ok(ProductKind::Computers),
            other => Err(format!("unknown product kind: {other}")),
        }
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

/// The status tag on a transaction.
///
/// Checkout writes `Pending`; the randomized fixture writes `Completed`.
/// Stored verbatim ("Pending"/"Completed") to match the historical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum TxStatus {
    Pending,
    Completed,
}

impl Default for TxStatus {
    fn default() -> Self {
        TxStatus::Pending
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Pending => f.write_str("Pending"),
            TxStatus::Completed => f.write_str("Completed"),
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Sequential business id ("C" + zero-padded number).
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Unique across customers.
    pub email: String,
    pub address: String,
    /// Unique across customers; ten digits.
    pub phone: String,
    pub tier: Tier,
}

impl Customer {
    /// Display name shown after login ("Alice Wong").
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration input, before an id has been allocated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub tier: Tier,
    /// Credit line in cents; required for tiers above bronze, forbidden for bronze.
    pub credit_line_cents: Option<i64>,
}

/// A customer's credit line (1:1, non-bronze tiers only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CreditLine {
    pub customer_id: String,
    pub limit_cents: i64,
}

impl CreditLine {
    /// Returns the limit as Money.
    #[inline]
    pub fn limit(&self) -> Money {
        Money::from_cents(self.limit_cents)
    }
}

// =============================================================================
// Credit Card
// =============================================================================

/// A stored credit card.
///
/// A card with `customer_id: None` is the shared default/placeholder card
/// used for bronze-tier checkouts that have no stored card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CreditCard {
    /// 13-19 digit card number; primary key.
    pub number: String,
    /// 3-4 digit security code.
    pub security_code: String,
    pub owner_name: String,
    /// Network name ("Visa", "MasterCard", ...). Free-form on purpose.
    pub network: String,
    pub billing_address: String,
    pub expires_on: NaiveDate,
    /// Owning customer, or None for the shared default card.
    pub customer_id: Option<String>,
}

// =============================================================================
// Shipping Address
// =============================================================================

/// A shipping address, keyed by (customer, nickname).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShippingAddress {
    pub customer_id: String,
    /// Unique per customer ("Home", "Office", ...).
    pub nickname: String,
    pub recipient: String,
    pub street_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    /// Five digits.
    pub zip: String,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    /// Unique display name.
    pub name: String,
    /// Selects the satellite attribute table.
    pub kind: ProductKind,
    /// Current catalog price in cents.
    pub price_cents: i64,
    /// On-hand stock. Only ever decremented, and never below zero.
    pub quantity_on_hand: i64,
    pub description: String,
}

impl Product {
    /// Returns the catalog price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether current stock covers a requested quantity.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.quantity_on_hand >= quantity
    }
}

/// Kind-specific product attributes: the satellite tables as a tagged union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProductSpecs {
    /// From the laptops table.
    Laptop { body_type: String, weight_kg: f64 },
    /// From the computers table.
    Computer { cpu: String },
    /// From the printers table.
    Printer { printer_type: String, resolution: String },
}

// =============================================================================
// Basket & Line Items
// =============================================================================

/// A basket grouping line items under one identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Basket {
    /// Random 7-character alphanumeric code.
    pub id: String,
    pub customer_id: String,
}

/// A (basket, product) line item.
///
/// `price_sold_cents` is captured at sale time and stays fixed even if the
/// catalog price changes later (snapshot pattern).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BasketItem {
    pub basket_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub price_sold_cents: i64,
}

impl BasketItem {
    /// Line total (quantity × price actually charged).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.quantity * self.price_sold_cents
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A checkout record tying a basket to payment and shipping choices.
///
/// One basket yields at most one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StoreTransaction {
    /// Auto-incrementing storage id.
    pub id: i64,
    pub basket_id: String,
    pub customer_id: String,
    /// Which of the customer's shipping addresses to deliver to.
    pub address_nickname: String,
    pub tx_date: NaiveDate,
    pub card_number: String,
    pub status: TxStatus,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_credit_bands() {
        assert_eq!(Tier::Bronze.credit_band(), None);
        assert_eq!(Tier::Silver.credit_band(), Some((60000, 67999)));
        assert_eq!(Tier::Gold.credit_band(), Some((68000, 74999)));
        assert_eq!(Tier::Platinum.credit_band(), Some((75000, 80000)));
    }

    #[test]
    fn test_tier_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
        assert!("diamond".parse::<Tier>().is_err());
    }

    #[test]
    fn test_product_kind_round_trip() {
        for kind in ProductKind::ALL {
            assert_eq!(kind.as_str().parse::<ProductKind>().unwrap(), kind);
        }
        assert!("toasters".parse::<ProductKind>().is_err());
    }

    #[test]
    fn test_tx_status_default_is_pending() {
        assert_eq!(TxStatus::default(), TxStatus::Pending);
        assert_eq!(TxStatus::Pending.to_string(), "Pending");
        assert_eq!(TxStatus::Completed.to_string(), "Completed");
    }

    #[test]
    fn test_product_can_fulfill() {
        let product = Product {
            id: "P999".to_string(),
            name: "Widget".to_string(),
            kind: ProductKind::Printers,
            price_cents: 1000,
            quantity_on_hand: 5,
            description: String::new(),
        };

        assert!(product.can_fulfill(5));
        assert!(product.can_fulfill(1));
        assert!(!product.can_fulfill(6));
    }

    #[test]
    fn test_line_total() {
        let item = BasketItem {
            basket_id: "X7K2Q9A".to_string(),
            product_id: "P999".to_string(),
            quantity: 2,
            price_sold_cents: 950,
        };
        assert_eq!(item.line_total_cents(), 1900);
    }
}
