//! Human-readable order numbers.

use core::fmt;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// An order number such as `SDK-20250101-12000001`.
///
/// The layout is the store-local creation date, a dash, the store-local
/// time of day to the second, and a two-digit random suffix. Uniqueness is
/// not guaranteed by construction; the `orders.order_number` unique
/// constraint is the only backstop.
///
/// ## Examples
///
/// ```
/// use sentra_core::OrderNumber;
///
/// assert!(OrderNumber::looks_like("sdk-20250101-12000001"));
/// assert!(!OrderNumber::looks_like("081234567890"));
/// assert_eq!(OrderNumber::normalize_query(" sdk-1 "), "SDK-1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub const PREFIX: &'static str = "SDK-";

    /// Build an order number from the creation instant and a random suffix.
    ///
    /// Only the last two decimal digits of `suffix` are used.
    #[must_use]
    pub fn generate<Tz>(now: &DateTime<Tz>, suffix: u32) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(format!(
            "{}{}{:02}",
            Self::PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            suffix % 100
        ))
    }

    /// Whether a free-text lookup query should be treated as an order number.
    ///
    /// This is a case-insensitive prefix check only.
    #[must_use]
    pub fn looks_like(query: &str) -> bool {
        query
            .get(..Self::PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(Self::PREFIX))
    }

    /// Canonical form used for exact lookups.
    #[must_use]
    pub fn normalize_query(query: &str) -> String {
        query.trim().to_uppercase()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<OrderNumber> for String {
    fn from(value: OrderNumber) -> Self {
        value.0
    }
}
