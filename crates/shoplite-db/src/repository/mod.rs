//! # Repository Layer
//!
//! Repository implementations for database operations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Pattern                                  │
//! │                                                                         │
//! │  Session Command                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.customers() ──► CustomerRepository ──► SQL                         │
//! │  db.accounts()  ──► AccountRepository  ──► SQL                         │
//! │  db.products()  ──► ProductRepository  ──► SQL                         │
//! │  db.orders()    ──► OrderRepository    ──► SQL                         │
//! │  db.stats()     ──► StatsRepository    ──► SQL                         │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place per entity                             │
//! │  • Commands never touch the pool directly                              │
//! │  • Repositories validate input before writing                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod account;
pub mod customer;
pub mod order;
pub mod product;
pub mod stats;
