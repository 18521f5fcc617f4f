//! # Order Numbering
//!
//! Human-facing order numbers: `ORD-YYYYMMDD-NNNNNN`.
//!
//! The numeric suffix comes from a monotonic sequence owned by the database
//! (one row, incremented inside the order-creation transaction), so two
//! orders can never share a number. The date part is informational only.

use chrono::{DateTime, Utc};

use crate::ORDER_NUMBER_PREFIX;

/// Formats an order number from the creation time and a sequence value.
///
/// The sequence is zero-padded to six digits and widens past 999999
/// rather than wrapping.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use storefront_core::numbering::format_order_number;
///
/// let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
/// assert_eq!(format_order_number(at, 42), "ORD-20261019-000042");
/// ```
pub fn format_order_number(created_at: DateTime<Utc>, sequence: i64) -> String {
    format!(
        "{}-{}-{:06}",
        ORDER_NUMBER_PREFIX,
        created_at.format("%Y%m%d"),
        sequence
    )
}
