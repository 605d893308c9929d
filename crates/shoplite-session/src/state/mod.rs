//! # Session State
//!
//! In-memory state for one interactive session: the per-mode logins and
//! the pending basket.

pub mod session;

pub use session::{Login, Mode, PendingBasket, PendingLine, Session, SessionState};
