//! Customer mutation and read service.
//!
//! Mirrors the invoice pipeline: validate, scope-check, write, invalidate,
//! redirect. Deletes are owner-scoped like every other mutation.

use std::sync::Arc;

use tracing::warn;

use super::customer::Customer;
use super::error::Error;
use super::forms::{CustomerForm, FormRejection, RedirectTo};
use super::id::{CustomerId, UserId};
use super::ports::{CustomerPatch, CustomerRepository, ListingCache};

/// Listing path invalidated after every customer mutation.
pub const CUSTOMERS_PATH: &str = "/dashboard/customers";

const MSG_MISSING_CREATE: &str = "Missing Fields. Failed to Create Customer.";
const MSG_MISSING_UPDATE: &str = "Missing Fields. Failed to Update Customer.";
const MSG_DB_CREATE: &str = "Database Error: Failed to Create Customer.";
const MSG_DB_UPDATE: &str = "Database Error: Failed to Update Customer.";
const MSG_NOT_FOUND: &str = "Could not find customer to update.";
const MSG_NO_ROWS: &str = "Failed to update customer. No rows affected.";

/// Owner-scoped customer operations.
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    cache: Arc<dyn ListingCache>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerRepository>, cache: Arc<dyn ListingCache>) -> Self {
        Self { customers, cache }
    }

    /// Create a customer for `owner` from raw form fields.
    pub async fn create(
        &self,
        owner: &UserId,
        form: &CustomerForm,
    ) -> Result<RedirectTo, FormRejection> {
        let validated = form
            .validate()
            .map_err(|errors| FormRejection::fields(errors, MSG_MISSING_CREATE))?;

        let customer = Customer {
            id: CustomerId::random(),
            owner_id: owner.clone(),
            name: validated.name,
            email: validated.email,
            image_url: validated.image_url,
        };
        if let Err(error) = self.customers.insert(&customer).await {
            warn!(%error, "customer insert failed");
            return Err(FormRejection::message_only(MSG_DB_CREATE));
        }

        self.cache.invalidate(CUSTOMERS_PATH);
        Ok(RedirectTo::new(CUSTOMERS_PATH))
    }

    /// Update an owner-scoped customer from raw form fields.
    pub async fn update(
        &self,
        owner: &UserId,
        id: &CustomerId,
        form: &CustomerForm,
    ) -> Result<RedirectTo, FormRejection> {
        let validated = form
            .validate()
            .map_err(|errors| FormRejection::fields(errors, MSG_MISSING_UPDATE))?;

        match self.customers.find_scoped(owner, id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(FormRejection::message_only(MSG_NOT_FOUND)),
            Err(error) => {
                warn!(%error, "customer lookup failed");
                return Err(FormRejection::message_only(MSG_DB_UPDATE));
            }
        }

        let patch = CustomerPatch {
            name: validated.name,
            email: validated.email,
            image_url: validated.image_url,
        };
        match self.customers.update_scoped(owner, id, &patch).await {
            Ok(0) => return Err(FormRejection::message_only(MSG_NO_ROWS)),
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "customer update failed");
                return Err(FormRejection::message_only(MSG_DB_UPDATE));
            }
        }

        self.cache.invalidate("/dashboard");
        self.cache.invalidate(CUSTOMERS_PATH);
        self.cache.invalidate(&format!("{CUSTOMERS_PATH}/{id}"));
        self.cache.invalidate(&format!("{CUSTOMERS_PATH}/{id}/edit"));
        Ok(RedirectTo::new(CUSTOMERS_PATH))
    }

    /// Delete an owner-scoped customer. Deleting a missing or foreign id is
    /// a no-op success.
    pub async fn delete(&self, owner: &UserId, id: &CustomerId) -> Result<(), Error> {
        self.customers
            .delete_scoped(owner, id)
            .await
            .map_err(|error| {
                warn!(%error, "customer delete failed");
                Error::internal("Failed to delete customer.")
            })?;
        self.cache.invalidate(CUSTOMERS_PATH);
        Ok(())
    }

    /// All customers owned by `owner`, ordered by name.
    pub async fn list(&self, owner: &UserId) -> Result<Vec<Customer>, Error> {
        Ok(self.customers.list_for_owner(owner).await?)
    }

    /// One owner-scoped customer, for the edit form.
    pub async fn edit_data(&self, owner: &UserId, id: &CustomerId) -> Result<Customer, Error> {
        self.customers
            .find_scoped(owner, id)
            .await?
            .ok_or_else(|| Error::not_found(MSG_NOT_FOUND))
    }
}
