//! # Identifier Formats
//!
//! Formatting, parsing, and allocation for the business identifiers used
//! throughout Shoplite.
//!
//! ## Identifier Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer  C001, C002, ... C999, C1000   "C" + zero-padded sequence    │
//! │  Product   P001, P002, ...               assigned by catalog/seeding   │
//! │  Basket    X7K2Q9A                       random 7-char alphanumeric    │
//! │  Txn       1, 2, 3, ...                  database AUTOINCREMENT        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Allocation Caveat
//! `next_customer_id` computes MAX + 1 from the ids the caller read from
//! storage. Two concurrent registrations can therefore compute the same
//! successor; the primary key makes the loser fail at insert time rather
//! than corrupt data. This mirrors the original design and is an accepted
//! limitation, not an invariant.

use crate::error::{CoreError, CoreResult};

/// Prefix on every customer id.
pub const CUSTOMER_ID_PREFIX: char = 'C';

/// Minimum digit width of the numeric part ("C001", not "C1").
pub const CUSTOMER_ID_PAD: usize = 3;

/// Length of a basket id code.
pub const BASKET_ID_LEN: usize = 7;

/// Alphabet basket id codes are drawn from (uppercase + digits).
pub const BASKET_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// =============================================================================
// Customer Ids
// =============================================================================

/// Formats a customer sequence number as an id.
///
/// ## Example
/// ```rust
/// use shoplite_core::ids::format_customer_id;
///
/// assert_eq!(format_customer_id(6), "C006");
/// assert_eq!(format_customer_id(1234), "C1234"); // pad is a minimum, not a cap
/// ```
pub fn format_customer_id(seq: u64) -> String {
    format!("{}{:0pad$}", CUSTOMER_ID_PREFIX, seq, pad = CUSTOMER_ID_PAD)
}

/// Parses the numeric part out of a customer id.
///
/// Returns `None` for anything that is not `C` followed by digits.
pub fn parse_customer_id(id: &str) -> Option<u64> {
    let digits = id.strip_prefix(CUSTOMER_ID_PREFIX)?;
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Computes the next customer id from the current maximum.
///
/// ## Contract
/// The caller supplies the id that sorts highest by (length, lexicographic),
/// which is the numerically largest one, or `None` for an empty table.
///
/// ## Example
/// ```rust
/// use shoplite_core::ids::next_customer_id;
///
/// assert_eq!(next_customer_id(Some("C005")).unwrap(), "C006");
/// assert_eq!(next_customer_id(None).unwrap(), "C001");
/// ```
pub fn next_customer_id(current_max: Option<&str>) -> CoreResult<String> {
    let next = match current_max {
        Some(id) => parse_customer_id(id)
            .ok_or_else(|| CoreError::MalformedCustomerId(id.to_string()))?
            + 1,
        None => 1,
    };
    Ok(format_customer_id(next))
}

// =============================================================================
// Basket Ids
// =============================================================================

/// Checks that a basket id has the expected shape.
///
/// Used when accepting externally supplied basket codes (fixtures, tests).
pub fn is_valid_basket_id(id: &str) -> bool {
    id.len() == BASKET_ID_LEN && id.bytes().all(|b| BASKET_ID_CHARSET.contains(&b))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_customer_id() {
        assert_eq!(format_customer_id(1), "C001");
        assert_eq!(format_customer_id(42), "C042");
        assert_eq!(format_customer_id(999), "C999");
        assert_eq!(format_customer_id(1000), "C1000");
    }

    #[test]
    fn test_parse_customer_id() {
        assert_eq!(parse_customer_id("C001"), Some(1));
        assert_eq!(parse_customer_id("C1000"), Some(1000));
        assert_eq!(parse_customer_id("X001"), None);
        assert_eq!(parse_customer_id("C"), None);
        assert_eq!(parse_customer_id("Cabc"), None);
    }

    #[test]
    fn test_next_customer_id_is_monotonic() {
        // Given existing ids {C001..C005}, the max is C005 and the
        // next generated id must be exactly C006.
        assert_eq!(next_customer_id(Some("C005")).unwrap(), "C006");
    }

    #[test]
    fn test_next_customer_id_empty_table() {
        assert_eq!(next_customer_id(None).unwrap(), "C001");
    }

    #[test]
    fn test_next_customer_id_crosses_padding() {
        assert_eq!(next_customer_id(Some("C999")).unwrap(), "C1000");
        assert_eq!(next_customer_id(Some("C1000")).unwrap(), "C1001");
    }

    #[test]
    fn test_next_customer_id_rejects_garbage() {
        assert!(next_customer_id(Some("BOGUS")).is_err());
    }

    #[test]
    fn test_basket_id_shape() {
        assert!(is_valid_basket_id("X7K2Q9A"));
        assert!(is_valid_basket_id("B1001AA"));
        assert!(!is_valid_basket_id("short"));
        assert!(!is_valid_basket_id("toolong88"));
        assert!(!is_valid_basket_id("x7k2q9a")); // lowercase not in charset
    }
}
