//! # shoplite-session: Interactive Session Layer for Shoplite
//!
//! Session state and command functions for the storefront's five modes.
//!
//! ## The Five Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Modes                                    │
//! │                                                                         │
//! │  Register       no login; previews the next customer id and            │
//! │                 registers a new account                                 │
//! │                                                                         │
//! │  ManageAccount  own login; add credit cards and shipping addresses     │
//! │                                                                         │
//! │  Shopping       own login (independent of ManageAccount); browse the   │
//! │                 catalog, build an in-memory basket of frozen prices,   │
//! │                 check out, review order history                        │
//! │                                                                         │
//! │  Statistics     no login; the six reporting queries                    │
//! │                                                                         │
//! │  FullView       no login; everything on file for any customer id       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Where State Lives
//! The pending basket exists only in [`state::SessionState`] until checkout;
//! nothing touches the database before the order is placed. The two logins
//! are deliberately independent: logging out of shopping (which clears the
//! basket) does not end an account-management session.
//!
//! ## Modules
//! - [`state`] - Session struct, per-mode logins, pending basket
//! - [`commands`] - Async command functions, one module per mode
//! - [`error`] - The serializable ApiError every command returns

pub mod commands;
pub mod error;
pub mod state;

pub use error::{ApiError, ErrorCode};
pub use state::{Mode, PendingBasket, PendingLine, Session, SessionState};
