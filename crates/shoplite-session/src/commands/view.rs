//! FullView mode: everything on file for any customer id. No login;
//! this is the back-office lookup, not a customer-facing page.

use serde::Serialize;
use shoplite_core::{Basket, StoreTransaction};
use shoplite_db::repository::customer::CustomerProfile;
use shoplite_db::repository::order::PurchaseLine;
use shoplite_db::Database;

use crate::error::ApiError;

/// Everything the store knows about one customer.
#[derive(Debug, Clone, Serialize)]
pub struct FullCustomerView {
    /// Customer row, credit line, cards, addresses.
    pub profile: CustomerProfile,
    pub baskets: Vec<Basket>,
    pub transactions: Vec<StoreTransaction>,
    /// Every purchased product line, grouped by basket.
    pub purchases: Vec<PurchaseLine>,
}

/// Composes the full view for one customer id.
///
/// ## Errors
/// * `NOT_FOUND` - unknown customer id
pub async fn full_customer_view(
    db: &Database,
    customer_id: &str,
) -> Result<FullCustomerView, ApiError> {
    let profile = db.customers().profile(customer_id).await?;
    let baskets = db.orders().baskets_for(customer_id).await?;
    let transactions = db.orders().transactions_for(customer_id).await?;
    let purchases = db.orders().purchases_for(customer_id).await?;

    Ok(FullCustomerView {
        profile,
        baskets,
        transactions,
        purchases,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use shoplite_db::fixtures::seed_fixture;
    use shoplite_db::DbConfig;

    #[tokio::test]
    async fn test_full_view_composes_fixture_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_fixture(&db).await.unwrap();

        // C001 in the fixture: gold, one card, one address, one basket.
        let view = full_customer_view(&db, "C001").await.unwrap();
        assert_eq!(view.profile.customer.id, "C001");
        assert!(view.profile.credit_line.is_some());
        assert_eq!(view.profile.cards.len(), 1);
        assert_eq!(view.profile.addresses.len(), 1);
        assert_eq!(view.baskets.len(), 1);
        assert_eq!(view.transactions.len(), 1);
        // B1001 holds two product lines.
        assert_eq!(view.purchases.len(), 2);
    }

    #[tokio::test]
    async fn test_full_view_unknown_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = full_customer_view(&db, "C999").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
