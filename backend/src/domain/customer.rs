//! Customer entity.

use serde::{Deserialize, Serialize};

use super::id::{CustomerId, UserId};
use super::user::EmailAddress;

/// A customer record owned by exactly one user.
///
/// Every read, update, and delete must filter by `owner_id`; no caller may
/// observe or mutate a customer owned by another user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Stable customer identifier.
    pub id: CustomerId,
    /// The user that exclusively controls this record.
    pub owner_id: UserId,
    /// Customer display name.
    pub name: String,
    /// Customer contact address.
    pub email: EmailAddress,
    /// Optional avatar URL.
    pub image_url: Option<String>,
}
