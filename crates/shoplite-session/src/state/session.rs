//! # Session State
//!
//! The in-memory state of one interactive session.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple commands may access/modify the session
//! 2. Only one command should modify it at a time
//! 3. Commands can run concurrently
//!
//! ## State Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session State                                    │
//! │                                                                         │
//! │  manage_login: Option<Login>    ← ManageAccount mode's login           │
//! │  shop_login:   Option<Login>    ← Shopping mode's login                │
//! │  basket:       PendingBasket    ← lines with frozen prices             │
//! │                                                                         │
//! │  The two logins are independent: a customer can be logged into         │
//! │  shopping while someone else manages their account in the other        │
//! │  mode. Shopping logout clears the basket; manage logout does not.      │
//! │                                                                         │
//! │  The basket never touches the database. Checkout turns it into         │
//! │  baskets / basket_items / transactions rows in one go.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use shoplite_core::{CoreError, CoreResult, MAX_BASKET_ITEMS};
use shoplite_core::validation::validate_quantity;

// =============================================================================
// Modes
// =============================================================================

/// The five modes of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Register a new customer (no login).
    Register,
    /// Add cards and addresses to one's own account (own login).
    ManageAccount,
    /// Browse, build a basket, check out (own login, independent).
    Shopping,
    /// The six reporting queries (no login).
    Statistics,
    /// Everything on file for any customer id (no login).
    FullView,
}

impl Mode {
    /// All modes, in menu order.
    pub const ALL: [Mode; 5] = [
        Mode::Register,
        Mode::ManageAccount,
        Mode::Shopping,
        Mode::Statistics,
        Mode::FullView,
    ];

    /// Human-readable mode name.
    pub const fn label(&self) -> &'static str {
        match self {
            Mode::Register => "Register Customer",
            Mode::ManageAccount => "Login and Manage Account",
            Mode::Shopping => "Online Shopping",
            Mode::Statistics => "Sale Statistics",
            Mode::FullView => "Full Customer View",
        }
    }

    /// Whether entering this mode requires logging in first.
    pub const fn requires_login(&self) -> bool {
        matches!(self, Mode::ManageAccount | Mode::Shopping)
    }
}

// =============================================================================
// Login
// =============================================================================

/// A logged-in customer, as remembered by the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Login {
    pub customer_id: String,
    /// "Alice Wong", shown in the welcome banner.
    pub display_name: String,
}

// =============================================================================
// Pending Basket
// =============================================================================

/// A line in the pending basket.
///
/// ## Price Freezing
/// `unit_price_cents` is the effective price (offer or list) at the moment
/// the line was added. Catalog changes after that do not move it; checkout
/// writes exactly this price into `basket_items.price_sold_cents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingLine {
    pub product_id: String,
    /// Product name at time of adding (frozen, for display)
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl PendingLine {
    /// Line total (frozen unit price × quantity).
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// The in-memory basket built while shopping.
///
/// ## Invariants
/// - Lines are unique by `product_id` (re-adding a product merges quantity)
/// - Quantity per line stays within 1..=MAX_LINE_QUANTITY
/// - At most MAX_BASKET_ITEMS lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingBasket {
    pub lines: Vec<PendingLine>,
}

impl PendingBasket {
    /// Creates an empty basket.
    pub fn new() -> Self {
        PendingBasket { lines: Vec::new() }
    }

    /// Adds a line, merging with an existing line for the same product.
    ///
    /// The merged line keeps the price of the *first* add; the original
    /// frozen price wins.
    pub fn add_line(
        &mut self,
        product_id: &str,
        name: &str,
        quantity: i64,
        unit_price_cents: i64,
    ) -> CoreResult<()> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            let merged = line.quantity + quantity;
            validate_quantity(merged)?;
            line.quantity = merged;
            return Ok(());
        }

        validate_quantity(quantity)?;
        if self.lines.len() >= MAX_BASKET_ITEMS {
            return Err(CoreError::BasketTooLarge {
                max: MAX_BASKET_ITEMS,
            });
        }

        self.lines.push(PendingLine {
            product_id: product_id.to_string(),
            name: name.to_string(),
            quantity,
            unit_price_cents,
        });
        Ok(())
    }

    /// Removes the line for one product. Returns whether anything was removed.
    pub fn remove_line(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() < before
    }

    /// Empties the basket.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Basket total over the frozen prices.
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(PendingLine::line_total_cents).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

// =============================================================================
// Session
// =============================================================================

/// One interactive session: two independent logins plus the basket.
#[derive(Debug, Clone, Default)]
pub struct Session {
    manage_login: Option<Login>,
    shop_login: Option<Login>,
    basket: PendingBasket,
}

impl Session {
    /// Creates a fresh session with no logins and an empty basket.
    pub fn new() -> Self {
        Session::default()
    }

    /// The ManageAccount login, if any.
    pub fn manage_login(&self) -> Option<&Login> {
        self.manage_login.as_ref()
    }

    /// The Shopping login, if any.
    pub fn shop_login(&self) -> Option<&Login> {
        self.shop_login.as_ref()
    }

    /// Logs a customer into account management.
    pub fn manage_login_as(&mut self, login: Login) {
        self.manage_login = Some(login);
    }

    /// Ends the account-management login. The shopping session survives.
    pub fn manage_logout(&mut self) {
        self.manage_login = None;
    }

    /// Logs a customer into shopping. Any previous customer's basket is
    /// discarded.
    pub fn shop_login_as(&mut self, login: Login) {
        match &self.shop_login {
            Some(previous) if previous.customer_id == login.customer_id => {}
            _ => self.basket.clear(),
        }
        self.shop_login = Some(login);
    }

    /// Ends the shopping login and clears the basket.
    pub fn shop_logout(&mut self) {
        self.shop_login = None;
        self.basket.clear();
    }

    /// The pending basket.
    pub fn basket(&self) -> &PendingBasket {
        &self.basket
    }

    /// Mutable access to the pending basket.
    pub fn basket_mut(&mut self) -> &mut PendingBasket {
        &mut self.basket
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// Thread-safe shared handle to a [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Creates a state handle around a fresh session.
    pub fn new() -> Self {
        SessionState::default()
    }

    /// Runs a closure with read access to the session.
    ///
    /// The lock is held only for the closure; a poisoned lock (a panic
    /// while held) falls back to the poisoned value, which is still
    /// structurally valid.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    /// Runs a closure with exclusive mutable access to the session.
    pub fn with_session_mut<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn login(id: &str) -> Login {
        Login {
            customer_id: id.to_string(),
            display_name: format!("Customer {id}"),
        }
    }

    #[test]
    fn test_mode_login_requirements() {
        assert!(!Mode::Register.requires_login());
        assert!(Mode::ManageAccount.requires_login());
        assert!(Mode::Shopping.requires_login());
        assert!(!Mode::Statistics.requires_login());
        assert!(!Mode::FullView.requires_login());
    }

    #[test]
    fn test_logins_are_independent() {
        let mut session = Session::new();
        session.manage_login_as(login("C001"));
        session.shop_login_as(login("C002"));

        session.shop_logout();
        assert!(session.shop_login().is_none());
        // Account-management login survives a shopping logout.
        assert_eq!(session.manage_login().unwrap().customer_id, "C001");

        session.manage_logout();
        assert!(session.manage_login().is_none());
    }

    #[test]
    fn test_basket_merges_same_product() {
        let mut basket = PendingBasket::new();
        basket.add_line("P001", "Laptop A", 1, 99999).unwrap();
        basket.add_line("P001", "Laptop A", 2, 89999).unwrap();

        assert_eq!(basket.len(), 1);
        assert_eq!(basket.lines[0].quantity, 3);
        // First add's frozen price wins.
        assert_eq!(basket.lines[0].unit_price_cents, 99999);
        assert_eq!(basket.total_cents(), 3 * 99999);
    }

    #[test]
    fn test_basket_quantity_limits() {
        let mut basket = PendingBasket::new();
        assert!(basket.add_line("P001", "Laptop A", 0, 100).is_err());
        assert!(basket.add_line("P001", "Laptop A", 1000, 100).is_err());

        basket.add_line("P001", "Laptop A", 999, 100).unwrap();
        // Merging past the cap fails and leaves the line untouched.
        assert!(basket.add_line("P001", "Laptop A", 1, 100).is_err());
        assert_eq!(basket.lines[0].quantity, 999);
    }

    #[test]
    fn test_basket_line_cap() {
        let mut basket = PendingBasket::new();
        for i in 0..MAX_BASKET_ITEMS {
            basket.add_line(&format!("P{i:03}"), "X", 1, 100).unwrap();
        }
        assert!(matches!(
            basket.add_line("OVER", "X", 1, 100),
            Err(CoreError::BasketTooLarge { .. })
        ));
    }

    #[test]
    fn test_shop_logout_clears_basket() {
        let mut session = Session::new();
        session.shop_login_as(login("C001"));
        session.basket_mut().add_line("P001", "Laptop A", 1, 99999).unwrap();

        session.shop_logout();
        assert!(session.basket().is_empty());
    }

    #[test]
    fn test_switching_shopper_discards_basket() {
        let mut session = Session::new();
        session.shop_login_as(login("C001"));
        session.basket_mut().add_line("P001", "Laptop A", 1, 99999).unwrap();

        // Same customer logging in again keeps the basket.
        session.shop_login_as(login("C001"));
        assert_eq!(session.basket().len(), 1);

        // A different customer does not inherit it.
        session.shop_login_as(login("C002"));
        assert!(session.basket().is_empty());
    }

    #[test]
    fn test_remove_line() {
        let mut basket = PendingBasket::new();
        basket.add_line("P001", "Laptop A", 1, 99999).unwrap();

        assert!(basket.remove_line("P001"));
        assert!(!basket.remove_line("P001")); // already gone
        assert!(basket.is_empty());
    }
}
