//! # Input Validation
//!
//! Validation rules for registration and account maintenance input.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Validation Pipeline                               │
//! │                                                                         │
//! │  user input ──► validate_* (this module) ──► repository write          │
//! │                      │                                                  │
//! │                      └── ValidationError (nothing was written)         │
//! │                                                                         │
//! │  Rules (checked in order, first failure wins):                         │
//! │    email      non-empty local @ non-empty domain containing a dot      │
//! │    phone      exactly 10 ASCII digits                                  │
//! │    card       13-19 ASCII digits                                       │
//! │    sec code   3-4 ASCII digits                                         │
//! │    zip        exactly 5 ASCII digits                                   │
//! │    expiry     strictly after today                                     │
//! │    credit     inside the tier band, or absent for bronze               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Uniqueness (email, phone, card number, address nickname) is a storage
//! concern and is enforced by the repositories, not here.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{NewCustomer, Tier};

/// Result alias local to validation.
pub type ValidationResult = Result<(), ValidationError>;

// =============================================================================
// Field Primitives
// =============================================================================

/// Checks that a required text field is non-empty after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Checks that a value is entirely ASCII digits with a length in `min..=max`.
fn validate_digits(field: &str, value: &str, min: usize, max: usize) -> ValidationResult {
    if value.len() < min || value.len() > max || !value.bytes().all(|b| b.is_ascii_digit()) {
        let reason = if min == max {
            format!("must be exactly {min} digits")
        } else {
            format!("must be {min}-{max} digits")
        };
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason,
        });
    }
    Ok(())
}

// =============================================================================
// Domain Rules
// =============================================================================

/// Validates an email address.
///
/// ## Rule
/// One `@`, non-empty on both sides, and the domain part contains a dot.
/// Deliberately loose; this is a format sanity check, not RFC 5322.
///
/// ## Example
/// ```rust
/// use shoplite_core::validation::validate_email;
///
/// assert!(validate_email("alice@example.com").is_ok());
/// assert!(validate_email("no-at-sign").is_err());
/// assert!(validate_email("alice@nodot").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult {
    validate_required("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "expected name@domain.tld".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    // The dot must split the domain into non-empty halves.
    match domain.split_once('.') {
        Some((head, tail)) if !head.is_empty() && !tail.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a phone number: exactly 10 digits, no punctuation.
pub fn validate_phone(phone: &str) -> ValidationResult {
    validate_required("phone", phone)?;
    validate_digits("phone", phone, 10, 10)
}

/// Validates a credit card number: 13-19 digits (covers all major networks).
pub fn validate_card_number(number: &str) -> ValidationResult {
    validate_required("card number", number)?;
    validate_digits("card number", number, 13, 19)
}

/// Validates a card security code: 3-4 digits.
pub fn validate_security_code(code: &str) -> ValidationResult {
    validate_required("security code", code)?;
    validate_digits("security code", code, 3, 4)
}

/// Validates a zip code: exactly 5 digits.
pub fn validate_zip(zip: &str) -> ValidationResult {
    validate_required("zip", zip)?;
    validate_digits("zip", zip, 5, 5)
}

/// Validates a card expiry date against a reference date.
///
/// ## Rule
/// Strictly in the future. A card expiring today is rejected.
///
/// `today` is a parameter so the rule stays pure and testable.
pub fn validate_expiry(expires_on: NaiveDate, today: NaiveDate) -> ValidationResult {
    if expires_on <= today {
        return Err(ValidationError::NotInFuture {
            field: "expiry date".to_string(),
        });
    }
    Ok(())
}

/// Validates a credit line against the tier's band.
///
/// ## Rules
/// - Bronze: a credit line is **not allowed** (bronze carries none).
/// - Silver/gold/platinum: a credit line is **required** and must fall
///   inside the tier's inclusive band (see [`Tier::credit_band`]).
///
/// ## Example
/// ```rust
/// use shoplite_core::types::Tier;
/// use shoplite_core::validation::validate_credit_line;
///
/// assert!(validate_credit_line(Tier::Silver, Some(60000)).is_ok());
/// assert!(validate_credit_line(Tier::Silver, Some(59999)).is_err());
/// assert!(validate_credit_line(Tier::Bronze, None).is_ok());
/// assert!(validate_credit_line(Tier::Bronze, Some(60000)).is_err());
/// ```
pub fn validate_credit_line(tier: Tier, credit_line_cents: Option<i64>) -> ValidationResult {
    match (tier.credit_band(), credit_line_cents) {
        (None, None) => Ok(()),
        (None, Some(_)) => Err(ValidationError::NotAllowed {
            field: "credit line".to_string(),
            reason: "bronze tier carries no credit line".to_string(),
        }),
        (Some(_), None) => Err(ValidationError::Required {
            field: "credit line".to_string(),
        }),
        (Some((min, max)), Some(cents)) => {
            if cents < min || cents > max {
                Err(ValidationError::OutOfRange {
                    field: "credit line".to_string(),
                    min,
                    max,
                })
            } else {
                Ok(())
            }
        }
    }
}

/// Validates a basket line quantity: positive and at most [`crate::MAX_LINE_QUANTITY`].
pub fn validate_quantity(quantity: i64) -> ValidationResult {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if quantity > crate::MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: crate::MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Composite Checks
// =============================================================================

/// Validates a full registration payload.
///
/// Checks fields in declaration order and returns the first failure, so the
/// caller can surface one actionable message at a time.
pub fn validate_new_customer(input: &NewCustomer) -> ValidationResult {
    validate_required("first name", &input.first_name)?;
    validate_required("last name", &input.last_name)?;
    validate_email(&input.email)?;
    validate_required("address", &input.address)?;
    validate_phone(&input.phone)?;
    validate_credit_line(input.tier, input.credit_line_cents)?;
    Ok(())
}

/// Validates the fields of a card being added to an account.
pub fn validate_new_card(
    number: &str,
    security_code: &str,
    owner_name: &str,
    network: &str,
    billing_address: &str,
    expires_on: NaiveDate,
    today: NaiveDate,
) -> ValidationResult {
    validate_card_number(number)?;
    validate_security_code(security_code)?;
    validate_required("owner name", owner_name)?;
    validate_required("network", network)?;
    validate_required("billing address", billing_address)?;
    validate_expiry(expires_on, today)?;
    Ok(())
}

/// Validates the fields of a shipping address being added to an account.
pub fn validate_new_address(
    nickname: &str,
    recipient: &str,
    street_number: &str,
    street: &str,
    city: &str,
    state: &str,
    country: &str,
    zip: &str,
) -> ValidationResult {
    validate_required("nickname", nickname)?;
    validate_required("recipient", recipient)?;
    validate_required("street number", street_number)?;
    validate_required("street", street)?;
    validate_required("city", city)?;
    validate_required("state", state)?;
    validate_required("country", country)?;
    validate_zip(zip)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
