//! Invoice entity and money representation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::{CustomerId, InvoiceId, UserId};

/// A monetary amount held in minor units (cents).
///
/// Amounts never pass through floating point. `parse_major_units` converts
/// decimal user input with integer arithmetic only, so "19.99" is exactly
/// 1999 cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountCents(i64);

impl AmountCents {
    /// Wrap a raw cent count.
    pub fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// The raw cent count.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Parse a decimal string of major units ("19.99", "5") into cents.
    ///
    /// Accepts an optional leading minus, up to 13 integer digits, and up to
    /// two fractional digits. Returns `None` for anything else, including a
    /// third fractional digit, which would otherwise demand rounding.
    pub fn parse_major_units(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (negative, rest) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (int_part, frac_part) = match rest.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (rest, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if int_part.len() > 13 || frac_part.len() > 2 {
            return None;
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }
        let whole: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().ok()?
        };
        let frac: i64 = match frac_part.len() {
            0 => 0,
            1 => frac_part.parse::<i64>().ok()? * 10,
            _ => frac_part.parse().ok()?,
        };
        let cents = whole.checked_mul(100)?.checked_add(frac)?;
        Some(Self(if negative { -cents } else { cents }))
    }
}

impl fmt::Display for AmountCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Lifecycle state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Awaiting payment.
    Pending,
    /// Settled.
    Paid,
}

impl InvoiceStatus {
    /// Parse the exact wire tokens `pending` and `paid`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    /// The wire token for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invoice record, owned by a user and referencing one of their customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Stable invoice identifier.
    pub id: InvoiceId,
    /// The user that exclusively controls this record.
    pub owner_id: UserId,
    /// The billed customer; always owned by the same user.
    pub customer_id: CustomerId,
    /// Amount in cents.
    pub amount: AmountCents,
    /// Lifecycle state.
    pub status: InvoiceStatus,
    /// Creation date, assigned server-side.
    pub date: NaiveDate,
}
