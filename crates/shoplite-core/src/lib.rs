//! # shoplite-core: Pure Business Logic for Shoplite
//!
//! This crate is the **heart** of Shoplite. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shoplite Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shoplite-session (commands)                    │   │
//! │  │   register, login, add card/address, shop, checkout, reports   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shoplite-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │    ids    │  │ validation│  │   │
//! │  │   │  Customer │  │   Money   │  │ Customer  │  │   rules   │  │   │
//! │  │   │  Product  │  │  (cents)  │  │ id alloc  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  shoplite-db (Database Layer)                   │   │
//! │  │            SQLite schema, repositories, fixtures                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Basket, Transaction, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ids`] - Customer/basket identifier formats and allocation
//! - [`error`] - Domain error types
//! - [`validation`] - Registration and account input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ids;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use shoplite_core::Money` instead of
// `use shoplite_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Card number of the shared default/placeholder card.
///
/// ## Why a constant?
/// Transactions require a non-null card reference, but bronze-tier customers
/// carry no stored card. Checkouts and the randomized fixture fall back to
/// this single shared row (customer reference NULL) instead.
pub const DEFAULT_CARD_NUMBER: &str = "4111111111111111";

/// Maximum line items allowed in a single pending basket.
///
/// ## Business Reason
/// Prevents runaway baskets and ensures reasonable order sizes.
pub const MAX_BASKET_ITEMS: usize = 100;

/// Maximum quantity of a single product in a basket line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
