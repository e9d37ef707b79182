//! Invoice mutation and read service.
//!
//! Every operation runs on behalf of an authenticated owner. The mutation
//! pipeline is validate, scope-check, write, invalidate, redirect; any
//! validation or scoping failure short-circuits before the write.

use std::sync::Arc;

use chrono::Utc;
use futures_util::try_join;
use tracing::warn;

use super::customer::Customer;
use super::error::Error;
use super::forms::{FormRejection, InvoiceForm, RedirectTo};
use super::id::{CustomerId, InvoiceId, UserId};
use super::invoice::Invoice;
use super::ports::{CustomerRepository, InvoicePatch, InvoiceRepository, ListingCache};

/// Listing path invalidated after every invoice mutation.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

const MSG_MISSING_CREATE: &str = "Missing Fields. Failed to Create Invoice.";
const MSG_MISSING_UPDATE: &str = "Missing Fields. Failed to Update Invoice.";
const MSG_DB_CREATE: &str = "Database Error: Failed to Create Invoice.";
const MSG_DB_UPDATE: &str = "Database Error: Failed to Update Invoice.";
const MSG_NOT_FOUND: &str = "Invoice not found or access denied.";
const MSG_NO_ROWS: &str = "Failed to update invoice. No rows affected.";
const MSG_SELECT_CUSTOMER: &str = "Please select a customer.";

/// Data needed to render the invoice edit form.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EditInvoiceData {
    /// The invoice being edited.
    pub invoice: Invoice,
    /// The owner's customers, for the selector.
    pub customers: Vec<Customer>,
}

/// Owner-scoped invoice operations.
pub struct InvoiceService {
    invoices: Arc<dyn InvoiceRepository>,
    customers: Arc<dyn CustomerRepository>,
    cache: Arc<dyn ListingCache>,
}

impl InvoiceService {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        customers: Arc<dyn CustomerRepository>,
        cache: Arc<dyn ListingCache>,
    ) -> Self {
        Self {
            invoices,
            customers,
            cache,
        }
    }

    /// Verify the referenced customer belongs to `owner`. A foreign or
    /// unknown customer id is reported as a field error on the selector,
    /// indistinguishable from an id that never existed.
    async fn check_customer_ownership(
        &self,
        owner: &UserId,
        customer_id: &CustomerId,
    ) -> Result<(), FormRejection> {
        match self.customers.find_scoped(owner, customer_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(FormRejection::field_error(
                "customerId",
                MSG_SELECT_CUSTOMER,
            )),
            Err(error) => {
                warn!(%error, "customer ownership check failed");
                Err(FormRejection::message_only(MSG_DB_CREATE))
            }
        }
    }

    /// Create an invoice for `owner` from raw form fields.
    pub async fn create(
        &self,
        owner: &UserId,
        form: &InvoiceForm,
    ) -> Result<RedirectTo, FormRejection> {
        let validated = form
            .validate()
            .map_err(|errors| FormRejection::fields(errors, MSG_MISSING_CREATE))?;
        self.check_customer_ownership(owner, &validated.customer_id)
            .await?;

        let invoice = Invoice {
            id: InvoiceId::random(),
            owner_id: owner.clone(),
            customer_id: validated.customer_id,
            amount: validated.amount,
            status: validated.status,
            date: Utc::now().date_naive(),
        };
        if let Err(error) = self.invoices.insert(&invoice).await {
            warn!(%error, "invoice insert failed");
            return Err(FormRejection::message_only(MSG_DB_CREATE));
        }

        self.cache.invalidate(INVOICES_PATH);
        Ok(RedirectTo::new(INVOICES_PATH))
    }

    /// Update an owner-scoped invoice from raw form fields.
    pub async fn update(
        &self,
        owner: &UserId,
        id: &InvoiceId,
        form: &InvoiceForm,
    ) -> Result<RedirectTo, FormRejection> {
        let validated = form
            .validate()
            .map_err(|errors| FormRejection::fields(errors, MSG_MISSING_UPDATE))?;
        self.check_customer_ownership(owner, &validated.customer_id)
            .await?;

        match self.invoices.exists_scoped(owner, id).await {
            Ok(true) => {}
            Ok(false) => return Err(FormRejection::message_only(MSG_NOT_FOUND)),
            Err(error) => {
                warn!(%error, "invoice existence check failed");
                return Err(FormRejection::message_only(MSG_DB_UPDATE));
            }
        }

        let patch = InvoicePatch {
            customer_id: validated.customer_id,
            amount: validated.amount,
            status: validated.status,
        };
        match self.invoices.update_scoped(owner, id, &patch).await {
            Ok(0) => return Err(FormRejection::message_only(MSG_NO_ROWS)),
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "invoice update failed");
                return Err(FormRejection::message_only(MSG_DB_UPDATE));
            }
        }

        self.cache.invalidate("/dashboard");
        self.cache.invalidate(INVOICES_PATH);
        self.cache.invalidate(&format!("{INVOICES_PATH}/{id}"));
        self.cache.invalidate(&format!("{INVOICES_PATH}/{id}/edit"));
        Ok(RedirectTo::new(INVOICES_PATH))
    }

    /// Delete an owner-scoped invoice. Deleting a missing or foreign id is a
    /// no-op success.
    pub async fn delete(&self, owner: &UserId, id: &InvoiceId) -> Result<(), Error> {
        self.invoices
            .delete_scoped(owner, id)
            .await
            .map_err(|error| {
                warn!(%error, "invoice delete failed");
                Error::internal("Failed to delete invoice.")
            })?;
        self.cache.invalidate(INVOICES_PATH);
        Ok(())
    }

    /// All invoices owned by `owner`, newest first.
    pub async fn list(&self, owner: &UserId) -> Result<Vec<Invoice>, Error> {
        Ok(self.invoices.list_for_owner(owner).await?)
    }

    /// The invoice plus the owner's customer roster, fetched concurrently
    /// for the edit form.
    pub async fn edit_data(
        &self,
        owner: &UserId,
        id: &InvoiceId,
    ) -> Result<EditInvoiceData, Error> {
        let (invoice, customers) = try_join!(
            self.invoices.find_scoped(owner, id),
            self.customers.list_for_owner(owner),
        )?;
        let invoice = invoice.ok_or_else(|| Error::not_found(MSG_NOT_FOUND))?;
        Ok(EditInvoiceData { invoice, customers })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::PersistenceError;
    use crate::domain::user::EmailAddress;

    #[derive(Default)]
    struct StubState {
        invoices: Vec<Invoice>,
        customers: Vec<Customer>,
        fail: Option<StubFailure>,
        invalidated: Vec<String>,
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum StubFailure {
        Insert,
        Update,
        // The row passes the existence check but is gone by the write.
        UpdateVanished,
        Delete,
        Lookup,
    }

    #[derive(Default)]
    struct StubStore {
        state: Mutex<StubState>,
    }

    impl StubStore {
        fn lock(&self) -> std::sync::MutexGuard<'_, StubState> {
            self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[async_trait]
    impl InvoiceRepository for StubStore {
        async fn insert(&self, invoice: &Invoice) -> Result<(), PersistenceError> {
            let mut state = self.lock();
            if state.fail == Some(StubFailure::Insert) {
                return Err(PersistenceError::query("insert refused"));
            }
            state.invoices.push(invoice.clone());
            Ok(())
        }

        async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Invoice>, PersistenceError> {
            let state = self.lock();
            if state.fail == Some(StubFailure::Lookup) {
                return Err(PersistenceError::connection("lookup refused"));
            }
            Ok(state
                .invoices
                .iter()
                .filter(|invoice| &invoice.owner_id == owner)
                .cloned()
                .collect())
        }

        async fn find_scoped(
            &self,
            owner: &UserId,
            id: &InvoiceId,
        ) -> Result<Option<Invoice>, PersistenceError> {
            let state = self.lock();
            if state.fail == Some(StubFailure::Lookup) {
                return Err(PersistenceError::connection("lookup refused"));
            }
            Ok(state
                .invoices
                .iter()
                .find(|invoice| &invoice.owner_id == owner && &invoice.id == id)
                .cloned())
        }

        async fn exists_scoped(
            &self,
            owner: &UserId,
            id: &InvoiceId,
        ) -> Result<bool, PersistenceError> {
            InvoiceRepository::find_scoped(self, owner, id)
                .await
                .map(|found| found.is_some())
        }

        async fn update_scoped(
            &self,
            owner: &UserId,
            id: &InvoiceId,
            patch: &InvoicePatch,
        ) -> Result<u64, PersistenceError> {
            let mut state = self.lock();
            if state.fail == Some(StubFailure::Update) {
                return Err(PersistenceError::query("update refused"));
            }
            if state.fail == Some(StubFailure::UpdateVanished) {
                return Ok(0);
            }
            let Some(invoice) = state
                .invoices
                .iter_mut()
                .find(|invoice| &invoice.owner_id == owner && &invoice.id == id)
            else {
                return Ok(0);
            };
            invoice.customer_id = patch.customer_id.clone();
            invoice.amount = patch.amount;
            invoice.status = patch.status;
            Ok(1)
        }

        async fn delete_scoped(
            &self,
            owner: &UserId,
            id: &InvoiceId,
        ) -> Result<u64, PersistenceError> {
            let mut state = self.lock();
            if state.fail == Some(StubFailure::Delete) {
                return Err(PersistenceError::query("delete refused"));
            }
            let before = state.invoices.len();
            state
                .invoices
                .retain(|invoice| !(&invoice.owner_id == owner && &invoice.id == id));
            Ok((before - state.invoices.len()) as u64)
        }
    }

    #[async_trait]
    impl CustomerRepository for StubStore {
        async fn insert(&self, customer: &Customer) -> Result<(), PersistenceError> {
            self.lock().customers.push(customer.clone());
            Ok(())
        }

        async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Customer>, PersistenceError> {
            Ok(self
                .lock()
                .customers
                .iter()
                .filter(|customer| &customer.owner_id == owner)
                .cloned()
                .collect())
        }

        async fn find_scoped(
            &self,
            owner: &UserId,
            id: &CustomerId,
        ) -> Result<Option<Customer>, PersistenceError> {
            Ok(self
                .lock()
                .customers
                .iter()
                .find(|customer| &customer.owner_id == owner && &customer.id == id)
                .cloned())
        }

        async fn update_scoped(
            &self,
            _owner: &UserId,
            _id: &CustomerId,
            _patch: &crate::domain::ports::CustomerPatch,
        ) -> Result<u64, PersistenceError> {
            Ok(0)
        }

        async fn delete_scoped(
            &self,
            _owner: &UserId,
            _id: &CustomerId,
        ) -> Result<u64, PersistenceError> {
            Ok(0)
        }
    }

    impl ListingCache for StubStore {
        fn invalidate(&self, path: &str) {
            self.lock().invalidated.push(path.to_owned());
        }
    }

    fn owner() -> UserId {
        UserId::new("u1").expect("valid id")
    }

    fn customer(id: &str, owner: &UserId) -> Customer {
        Customer {
            id: CustomerId::new(id).expect("valid id"),
            owner_id: owner.clone(),
            name: "Ada".into(),
            email: EmailAddress::parse("ada@example.com").expect("valid address"),
            image_url: None,
        }
    }

    fn invoice(id: &str, owner: &UserId, customer: &str) -> Invoice {
        Invoice {
            id: InvoiceId::new(id).expect("valid id"),
            owner_id: owner.clone(),
            customer_id: CustomerId::new(customer).expect("valid id"),
            amount: crate::domain::invoice::AmountCents::new(500),
            status: crate::domain::invoice::InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        }
    }

    fn service_with(state: StubState) -> (Arc<StubStore>, InvoiceService) {
        let store = Arc::new(StubStore {
            state: Mutex::new(state),
        });
        let service = InvoiceService::new(store.clone(), store.clone(), store.clone());
        (store, service)
    }

    fn valid_form(customer: &str) -> InvoiceForm {
        InvoiceForm {
            customer_id: Some(customer.to_owned()),
            amount: Some("19.99".into()),
            status: Some("pending".into()),
        }
    }

    #[tokio::test]
    async fn create_persists_and_invalidates_listing() {
        let owner = owner();
        let (store, service) = service_with(StubState {
            customers: vec![customer("c1", &owner)],
            ..StubState::default()
        });

        let redirect = service
            .create(&owner, &valid_form("c1"))
            .await
            .expect("creates");
        assert_eq!(redirect.path(), "/dashboard/invoices");

        let state = store.lock();
        assert_eq!(state.invoices.len(), 1);
        assert_eq!(state.invoices[0].amount.get(), 1999);
        assert_eq!(state.invoices[0].owner_id, owner);
        assert_eq!(state.invalidated, vec!["/dashboard/invoices"]);
    }

    #[tokio::test]
    async fn create_rejects_invalid_form_without_touching_storage() {
        let owner = owner();
        let (store, service) = service_with(StubState::default());

        let rejection = service
            .create(&owner, &InvoiceForm::default())
            .await
            .expect_err("rejects");
        assert_eq!(
            rejection.message.as_deref(),
            Some("Missing Fields. Failed to Create Invoice.")
        );
        assert!(rejection.errors.messages("customerId").is_some());
        assert!(store.lock().invoices.is_empty());
        assert!(store.lock().invalidated.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_foreign_customer_reference() {
        let owner = owner();
        let intruder = UserId::new("u2").expect("valid id");
        let (store, service) = service_with(StubState {
            customers: vec![customer("c1", &owner)],
            ..StubState::default()
        });

        let rejection = service
            .create(&intruder, &valid_form("c1"))
            .await
            .expect_err("rejects");
        assert_eq!(
            rejection.errors.messages("customerId"),
            Some(&["Please select a customer.".to_owned()][..])
        );
        assert!(store.lock().invoices.is_empty());
    }

    #[tokio::test]
    async fn create_maps_storage_failure_to_database_message() {
        let owner = owner();
        let (store, service) = service_with(StubState {
            customers: vec![customer("c1", &owner)],
            fail: Some(StubFailure::Insert),
            ..StubState::default()
        });

        let rejection = service
            .create(&owner, &valid_form("c1"))
            .await
            .expect_err("rejects");
        assert_eq!(
            rejection.message.as_deref(),
            Some("Database Error: Failed to Create Invoice.")
        );
        assert!(store.lock().invalidated.is_empty());
    }

    #[tokio::test]
    async fn update_rewrites_fields_and_invalidates_every_affected_path() {
        let owner = owner();
        let (store, service) = service_with(StubState {
            customers: vec![customer("c1", &owner), customer("c2", &owner)],
            invoices: vec![invoice("i1", &owner, "c1")],
            ..StubState::default()
        });

        let form = InvoiceForm {
            customer_id: Some("c2".into()),
            amount: Some("25.50".into()),
            status: Some("paid".into()),
        };
        let id = InvoiceId::new("i1").expect("valid id");
        let redirect = service.update(&owner, &id, &form).await.expect("updates");
        assert_eq!(redirect.path(), "/dashboard/invoices");

        let state = store.lock();
        assert_eq!(state.invoices[0].customer_id.as_str(), "c2");
        assert_eq!(state.invoices[0].amount.get(), 2550);
        assert_eq!(
            state.invalidated,
            vec![
                "/dashboard",
                "/dashboard/invoices",
                "/dashboard/invoices/i1",
                "/dashboard/invoices/i1/edit",
            ]
        );
    }

    #[rstest]
    #[case("i9", "Invoice not found or access denied.")]
    #[tokio::test]
    async fn update_rejects_missing_invoice(#[case] id: &str, #[case] message: &str) {
        let owner = owner();
        let (_store, service) = service_with(StubState {
            customers: vec![customer("c1", &owner)],
            ..StubState::default()
        });

        let id = InvoiceId::new(id).expect("valid id");
        let rejection = service
            .update(&owner, &id, &valid_form("c1"))
            .await
            .expect_err("rejects");
        assert_eq!(rejection.message.as_deref(), Some(message));
    }

    #[tokio::test]
    async fn update_rejects_foreign_invoice_like_a_missing_one() {
        let owner = owner();
        let intruder = UserId::new("u2").expect("valid id");
        let (store, service) = service_with(StubState {
            customers: vec![customer("c1", &owner), customer("c1", &intruder)],
            invoices: vec![invoice("i1", &owner, "c1")],
            ..StubState::default()
        });

        let id = InvoiceId::new("i1").expect("valid id");
        let rejection = service
            .update(&intruder, &id, &valid_form("c1"))
            .await
            .expect_err("rejects");
        assert_eq!(
            rejection.message.as_deref(),
            Some("Invoice not found or access denied.")
        );
        // The victim's row is untouched.
        assert_eq!(store.lock().invoices[0].amount.get(), 500);
    }

    #[tokio::test]
    async fn update_losing_the_row_race_reports_no_rows_affected() {
        let owner = owner();
        let (store, service) = service_with(StubState {
            customers: vec![customer("c1", &owner)],
            invoices: vec![invoice("i1", &owner, "c1")],
            fail: Some(StubFailure::UpdateVanished),
            ..StubState::default()
        });

        let id = InvoiceId::new("i1").expect("valid id");
        let rejection = service
            .update(&owner, &id, &valid_form("c1"))
            .await
            .expect_err("rejects");
        assert_eq!(
            rejection.message.as_deref(),
            Some("Failed to update invoice. No rows affected.")
        );
        // No cache path is invalidated for a write that did not land.
        assert!(store.lock().invalidated.is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent_for_missing_rows() {
        let owner = owner();
        let (store, service) = service_with(StubState::default());

        let id = InvoiceId::new("i9").expect("valid id");
        service.delete(&owner, &id).await.expect("no-op success");
        assert_eq!(store.lock().invalidated, vec!["/dashboard/invoices"]);
    }

    #[tokio::test]
    async fn delete_surfaces_storage_failure_as_fatal() {
        let owner = owner();
        let (_store, service) = service_with(StubState {
            fail: Some(StubFailure::Delete),
            ..StubState::default()
        });

        let id = InvoiceId::new("i1").expect("valid id");
        let error = service.delete(&owner, &id).await.expect_err("fails");
        assert_eq!(error.code, ErrorCode::InternalError);
        assert_eq!(error.message, "Failed to delete invoice.");
    }

    #[tokio::test]
    async fn edit_data_joins_invoice_and_customer_roster() {
        let owner = owner();
        let (_store, service) = service_with(StubState {
            customers: vec![customer("c1", &owner), customer("c2", &owner)],
            invoices: vec![invoice("i1", &owner, "c1")],
            ..StubState::default()
        });

        let id = InvoiceId::new("i1").expect("valid id");
        let data = service.edit_data(&owner, &id).await.expect("loads");
        assert_eq!(data.invoice.id.as_str(), "i1");
        assert_eq!(data.customers.len(), 2);
    }

    #[tokio::test]
    async fn edit_data_hides_foreign_invoices() {
        let owner = owner();
        let intruder = UserId::new("u2").expect("valid id");
        let (_store, service) = service_with(StubState {
            invoices: vec![invoice("i1", &owner, "c1")],
            ..StubState::default()
        });

        let id = InvoiceId::new("i1").expect("valid id");
        let error = service.edit_data(&intruder, &id).await.expect_err("hidden");
        assert_eq!(error.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_is_owner_scoped() {
        let owner = owner();
        let other = UserId::new("u2").expect("valid id");
        let (_store, service) = service_with(StubState {
            invoices: vec![invoice("i1", &owner, "c1"), invoice("i2", &other, "c9")],
            ..StubState::default()
        });

        let listing = service.list(&owner).await.expect("lists");
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].id.as_str(), "i1");
    }
}
