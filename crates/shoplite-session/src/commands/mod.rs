//! # Session Commands
//!
//! Async command functions, one module per mode. Every command takes the
//! shared [`Database`](shoplite_db::Database) handle and, where the mode is
//! stateful, the [`SessionState`](crate::state::SessionState); every command
//! returns `Result<_, ApiError>` so failures serialize uniformly.
//!
//! ## Command Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register   preview_customer_id, register_customer                      │
//! │  account    manage_login, manage_logout, add_credit_card,               │
//! │             add_shipping_address, account_profile                       │
//! │  shop       shop_login, shop_logout, browse_products, add_to_basket,    │
//! │             view_basket, remove_from_basket, place_order, order_history │
//! │  stats      the six reporting queries                                   │
//! │  view       full_customer_view                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod account;
pub mod register;
pub mod shop;
pub mod stats;
pub mod view;

pub use account::{add_credit_card, add_shipping_address, account_profile, manage_login, manage_logout};
pub use register::{preview_customer_id, register_customer};
pub use shop::{
    add_to_basket, browse_products, order_history, place_order, remove_from_basket, shop_login,
    shop_logout, view_basket, CatalogEntry,
};
pub use stats::{
    avg_price_by_kind, best_sellers, card_max_baskets, card_totals, top_spenders, widest_reach,
};
pub use view::{full_customer_view, FullCustomerView};
