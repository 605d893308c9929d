//! ManageAccount mode: own login, then cards and shipping addresses.

use chrono::Local;
use shoplite_core::{CreditCard, ShippingAddress};
use shoplite_db::repository::customer::CustomerProfile;
use shoplite_db::Database;
use tracing::info;

use crate::error::ApiError;
use crate::state::{Login, Mode, SessionState};

fn require_manage_login(state: &SessionState) -> Result<Login, ApiError> {
    state
        .with_session(|s| s.manage_login().cloned())
        .ok_or_else(|| ApiError::not_logged_in(Mode::ManageAccount.label()))
}

/// Logs a customer into account management and returns their profile.
///
/// Independent of any shopping login in the same session.
pub async fn manage_login(
    state: &SessionState,
    db: &Database,
    customer_id: &str,
) -> Result<CustomerProfile, ApiError> {
    let customer = db.customers().login(customer_id).await?;
    let profile = db.customers().profile(&customer.id).await?;

    state.with_session_mut(|s| {
        s.manage_login_as(Login {
            customer_id: customer.id.clone(),
            display_name: format!("{} {}", customer.first_name, customer.last_name),
        })
    });

    info!(customer_id = %customer.id, "Account management login");
    Ok(profile)
}

/// Ends the account-management login. The shopping session is untouched.
pub fn manage_logout(state: &SessionState) {
    state.with_session_mut(|s| s.manage_logout());
}

/// The logged-in customer's full profile (cards, addresses, credit line).
pub async fn account_profile(
    state: &SessionState,
    db: &Database,
) -> Result<CustomerProfile, ApiError> {
    let login = require_manage_login(state)?;
    Ok(db.customers().profile(&login.customer_id).await?)
}

/// Stores a credit card under the logged-in customer.
///
/// Whatever `customer_id` the card carries is replaced with the login's;
/// a customer can only file cards on their own account.
pub async fn add_credit_card(
    state: &SessionState,
    db: &Database,
    mut card: CreditCard,
) -> Result<(), ApiError> {
    let login = require_manage_login(state)?;
    card.customer_id = Some(login.customer_id);

    let today = Local::now().date_naive();
    db.accounts().add_card(&card, today).await?;
    Ok(())
}

/// Stores a shipping address under the logged-in customer.
pub async fn add_shipping_address(
    state: &SessionState,
    db: &Database,
    mut address: ShippingAddress,
) -> Result<(), ApiError> {
    let login = require_manage_login(state)?;
    address.customer_id = login.customer_id;

    db.accounts().add_address(&address).await?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
