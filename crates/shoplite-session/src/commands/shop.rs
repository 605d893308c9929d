//! Shopping mode: browse, build the in-memory basket, check out.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  shop_login ──► browse_products ──► add_to_basket (price frozen)        │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                  view_basket / remove_from_basket                       │
//! │                                          │                              │
//! │                                          ▼                              │
//! │  place_order: frozen lines ──► OrderRepository::place (one db tx)       │
//! │               basket cleared only on success                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Local;
use serde::Serialize;
use shoplite_core::{Customer, ProductKind, ProductSpecs};
use shoplite_db::repository::order::{OrderHistoryLine, OrderLine, OrderReceipt};
use shoplite_db::repository::product::ProductListing;
use shoplite_db::Database;
use tracing::info;

use crate::error::{ApiError, ErrorCode};
use crate::state::{Login, Mode, PendingBasket, SessionState};

/// A catalog listing joined with its kind-specific attributes.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub listing: ProductListing,
    pub specs: Option<ProductSpecs>,
}

fn require_shop_login(state: &SessionState) -> Result<Login, ApiError> {
    state
        .with_session(|s| s.shop_login().cloned())
        .ok_or_else(|| ApiError::not_logged_in(Mode::Shopping.label()))
}

/// Logs a customer into shopping.
///
/// A different customer logging in discards the previous basket.
pub async fn shop_login(
    state: &SessionState,
    db: &Database,
    customer_id: &str,
) -> Result<Customer, ApiError> {
    let customer = db.customers().login(customer_id).await?;

    state.with_session_mut(|s| {
        s.shop_login_as(Login {
            customer_id: customer.id.clone(),
            display_name: format!("{} {}", customer.first_name, customer.last_name),
        })
    });

    info!(customer_id = %customer.id, "Shopping login");
    Ok(customer)
}

/// Ends the shopping login and discards the basket.
pub fn shop_logout(state: &SessionState) {
    state.with_session_mut(|s| s.shop_logout());
}

/// The catalog with offers and kind-specific specs, optionally filtered
/// to one kind. No login needed to browse.
pub async fn browse_products(
    db: &Database,
    kind: Option<ProductKind>,
) -> Result<Vec<CatalogEntry>, ApiError> {
    let listings = match kind {
        Some(kind) => db.products().list_by_kind(kind).await?,
        None => db.products().list().await?,
    };

    let mut entries = Vec::with_capacity(listings.len());
    for listing in listings {
        let specs = db.products().specs(&listing.id).await?;
        entries.push(CatalogEntry { listing, specs });
    }

    Ok(entries)
}

/// Adds a product to the basket, freezing today's effective price.
///
/// The stock check covers what is already pending: a second add of the
/// same product must fit on hand together with the first.
///
/// ## Errors
/// * `NOT_LOGGED_IN` - no shopping login
/// * `NOT_FOUND` - unknown product id
/// * `INSUFFICIENT_STOCK` - pending quantity would exceed stock on hand
pub async fn add_to_basket(
    state: &SessionState,
    db: &Database,
    product_id: &str,
    quantity: i64,
) -> Result<PendingBasket, ApiError> {
    require_shop_login(state)?;

    let listing = db
        .products()
        .get_listing(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    let pending: i64 = state.with_session(|s| {
        s.basket()
            .lines
            .iter()
            .filter(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .sum()
    });
    if pending + quantity > listing.quantity_on_hand {
        return Err(ApiError::new(
            ErrorCode::InsufficientStock,
            format!(
                "Only {} of '{}' on hand ({} already in basket)",
                listing.quantity_on_hand, listing.name, pending
            ),
        ));
    }

    let price = listing.effective_price_cents();
    state.with_session_mut(|s| {
        s.basket_mut()
            .add_line(&listing.id, &listing.name, quantity, price)
            .map_err(ApiError::from)?;
        Ok(s.basket().clone())
    })
}

/// The current basket.
pub fn view_basket(state: &SessionState) -> PendingBasket {
    state.with_session(|s| s.basket().clone())
}

/// Removes one product's line from the basket.
pub fn remove_from_basket(state: &SessionState, product_id: &str) -> PendingBasket {
    state.with_session_mut(|s| {
        s.basket_mut().remove_line(product_id);
        s.basket().clone()
    })
}

/// Checks the basket out against a shipping address and card.
///
/// One database transaction covers the basket, its lines, the pending
/// transaction row and the stock decrements. The in-memory basket is
/// cleared only after the database commit.
pub async fn place_order(
    state: &SessionState,
    db: &Database,
    address_nickname: &str,
    card_number: &str,
) -> Result<OrderReceipt, ApiError> {
    let login = require_shop_login(state)?;

    let lines: Vec<OrderLine> = state.with_session(|s| {
        s.basket()
            .lines
            .iter()
            .map(|l| OrderLine {
                product_id: l.product_id.clone(),
                quantity: l.quantity,
                price_cents: l.unit_price_cents,
            })
            .collect()
    });

    let today = Local::now().date_naive();
    let receipt = db
        .orders()
        .place(&login.customer_id, address_nickname, card_number, &lines, today)
        .await?;

    state.with_session_mut(|s| s.basket_mut().clear());

    info!(
        customer_id = %login.customer_id,
        basket_id = %receipt.basket_id,
        total_cents = receipt.total_cents,
        "Checkout complete"
    );
    Ok(receipt)
}

/// The logged-in customer's order history, one row per product line,
/// newest order first.
pub async fn order_history(
    state: &SessionState,
    db: &Database,
) -> Result<Vec<OrderHistoryLine>, ApiError> {
    let login = require_shop_login(state)?;
    Ok(db.orders().history_lines(&login.customer_id).await?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shoplite_core::{
        NewCustomer, Product, ProductKind, ProductSpecs, ShippingAddress, Tier,
        DEFAULT_CARD_NUMBER,
    };
    use shoplite_db::DbConfig;

    /// One customer with a "Home" address, the default card, and two
    /// products: P001 laptop $999.99 (x10, on offer at $899.99) and
    /// P002 printer $149.99 (x2).
    async fn shop_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let customer = db
            .customers()
            .register(NewCustomer {
                first_name: "Alice".to_string(),
                last_name: "Wong".to_string(),
                email: "a@x.com".to_string(),
                address: "12 Hill Rd".to_string(),
                phone: "5550000001".to_string(),
                tier: Tier::Bronze,
                credit_line_cents: None,
            })
            .await
            .unwrap();

        db.accounts().ensure_default_card().await.unwrap();
        db.accounts()
            .add_address(&ShippingAddress {
                customer_id: customer.id.clone(),
                nickname: "Home".to_string(),
                recipient: "Alice Wong".to_string(),
                street_number: "12".to_string(),
                street: "Hill Rd".to_string(),
                city: "Cambridge".to_string(),
                state: "MA".to_string(),
                country: "USA".to_string(),
                zip: "02139".to_string(),
            })
            .await
            .unwrap();

        db.products()
            .insert(
                &Product {
                    id: "P001".to_string(),
                    name: "Laptop A".to_string(),
                    kind: ProductKind::Laptops,
                    price_cents: 99999,
                    quantity_on_hand: 10,
                    description: "Thin and light".to_string(),
                },
                &ProductSpecs::Laptop {
                    body_type: "Ultrabook".to_string(),
                    weight_kg: 1.2,
                },
            )
            .await
            .unwrap();
        db.products().set_offer("P001", 89999).await.unwrap();

        db.products()
            .insert(
                &Product {
                    id: "P002".to_string(),
                    name: "Printer B".to_string(),
                    kind: ProductKind::Printers,
                    price_cents: 14999,
                    quantity_on_hand: 2,
                    description: "Laser printer".to_string(),
                },
                &ProductSpecs::Printer {
                    printer_type: "Laser".to_string(),
                    resolution: "600dpi".to_string(),
                },
            )
            .await
            .unwrap();

        (db, customer.id)
    }

    #[tokio::test]
    async fn test_browse_joins_specs_and_offers() {
        let (db, _) = shop_db().await;

        let catalog = browse_products(&db, None).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog[0].listing.on_offer());
        assert!(matches!(
            catalog[0].specs,
            Some(ProductSpecs::Laptop { .. })
        ));

        let printers = browse_products(&db, Some(ProductKind::Printers)).await.unwrap();
        assert_eq!(printers.len(), 1);
        assert_eq!(printers[0].listing.id, "P002");
    }

    #[tokio::test]
    async fn test_add_requires_login() {
        let (db, _) = shop_db().await;
        let state = SessionState::new();

        let err = add_to_basket(&state, &db, "P001", 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_add_freezes_offer_price() {
        let (db, cid) = shop_db().await;
        let state = SessionState::new();
        shop_login(&state, &db, &cid).await.unwrap();

        let basket = add_to_basket(&state, &db, "P001", 2).await.unwrap();
        assert_eq!(basket.lines[0].unit_price_cents, 89999);

        // Withdrawing the offer afterwards does not move the frozen line.
        db.products().set_offer("P001", 99999).await.unwrap();
        assert_eq!(view_basket(&state).lines[0].unit_price_cents, 89999);
    }

    #[tokio::test]
    async fn test_stock_check_counts_pending_quantity() {
        let (db, cid) = shop_db().await;
        let state = SessionState::new();
        shop_login(&state, &db, &cid).await.unwrap();

        // 2 on hand: 1 + 1 fits, the third does not.
        add_to_basket(&state, &db, "P002", 1).await.unwrap();
        add_to_basket(&state, &db, "P002", 1).await.unwrap();
        let err = add_to_basket(&state, &db, "P002", 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let (db, cid) = shop_db().await;
        let state = SessionState::new();
        shop_login(&state, &db, &cid).await.unwrap();

        let err = add_to_basket(&state, &db, "P404", 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_checkout_clears_basket_and_decrements_stock() {
        let (db, cid) = shop_db().await;
        let state = SessionState::new();
        shop_login(&state, &db, &cid).await.unwrap();

        add_to_basket(&state, &db, "P001", 2).await.unwrap();
        add_to_basket(&state, &db, "P002", 1).await.unwrap();

        let receipt = place_order(&state, &db, "Home", DEFAULT_CARD_NUMBER)
            .await
            .unwrap();
        assert_eq!(receipt.total_cents, 2 * 89999 + 14999);
        assert!(view_basket(&state).is_empty());

        let laptop = db.products().get("P001").await.unwrap().unwrap();
        assert_eq!(laptop.quantity_on_hand, 8);
    }

    #[tokio::test]
    async fn test_checkout_empty_basket_fails() {
        let (db, cid) = shop_db().await;
        let state = SessionState::new();
        shop_login(&state, &db, &cid).await.unwrap();

        let err = place_order(&state, &db, "Home", DEFAULT_CARD_NUMBER)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BasketError);
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_basket() {
        let (db, cid) = shop_db().await;
        let state = SessionState::new();
        shop_login(&state, &db, &cid).await.unwrap();
        add_to_basket(&state, &db, "P001", 1).await.unwrap();

        // Unknown address: the database rolls back, the basket survives.
        let err = place_order(&state, &db, "Cabin", DEFAULT_CARD_NUMBER)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(view_basket(&state).len(), 1);
    }

    #[tokio::test]
    async fn test_order_history_lists_product_lines() {
        let (db, cid) = shop_db().await;
        let state = SessionState::new();
        shop_login(&state, &db, &cid).await.unwrap();

        add_to_basket(&state, &db, "P001", 1).await.unwrap();
        add_to_basket(&state, &db, "P002", 2).await.unwrap();
        place_order(&state, &db, "Home", DEFAULT_CARD_NUMBER)
            .await
            .unwrap();

        let history = order_history(&state, &db).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().any(|l| l.product_name == "Laptop A"));
        assert!(history
            .iter()
            .any(|l| l.product_name == "Printer B" && l.quantity == 2));
    }

    #[tokio::test]
    async fn test_remove_from_basket() {
        let (db, cid) = shop_db().await;
        let state = SessionState::new();
        shop_login(&state, &db, &cid).await.unwrap();

        add_to_basket(&state, &db, "P001", 1).await.unwrap();
        let basket = remove_from_basket(&state, "P001");
        assert!(basket.is_empty());
    }
}
