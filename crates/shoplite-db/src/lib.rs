//! # shoplite-db: Database Layer for Shoplite
//!
//! This crate provides database access for the Shoplite storefront.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Shoplite Data Flow                                │
//! │                                                                         │
//! │  Session command (checkout, register, reports)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    shoplite-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │ customer.rs   │    │  (schema.rs) │  │   │
//! │  │   │               │    │ account.rs    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ product.rs    │    │ 12 tables,   │  │   │
//! │  │   │ Connection    │    │ order.rs      │    │ dependency   │  │   │
//! │  │   │ Management    │    │ stats.rs      │    │ ordered      │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                      ./shoplite.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`schema`] - Named DDL statements and create/drop/rebuild
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (customer, account, ...)
//! - [`fixtures`] - Deterministic fixture + randomized order generator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shoplite_db::{Database, DbConfig};
//!
//! // Create database with default config (creates the schema)
//! let config = DbConfig::new("./shoplite.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let catalog = db.products().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixtures;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::AccountRepository;
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::stats::StatsRepository;
