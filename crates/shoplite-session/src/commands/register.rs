//! Register mode: no login, previews the next customer id and creates
//! the account.

use shoplite_core::{Customer, NewCustomer};
use shoplite_db::Database;
use tracing::info;

use crate::error::ApiError;

/// The id the next registration will be assigned, shown on the form.
///
/// Advisory: a concurrent registration can claim it first.
pub async fn preview_customer_id(db: &Database) -> Result<String, ApiError> {
    Ok(db.customers().peek_next_id().await?)
}

/// Registers a new customer.
///
/// ## Returns
/// The stored customer row, including the freshly allocated id.
///
/// ## Errors
/// * `VALIDATION_ERROR` - malformed field, or credit line outside the
///   tier's band (and duplicated email or phone)
pub async fn register_customer(db: &Database, input: NewCustomer) -> Result<Customer, ApiError> {
    let customer = db.customers().register(input).await?;
    info!(customer_id = %customer.id, "Registration complete");
    Ok(customer)
}

// =============================================================================
// Unit Tests
// =============================================================================
