//! Schema validation for submitted mutation forms.
//!
//! Raw form fields arrive as optional strings; validation collects every
//! field failure in one pass and yields either a fully typed record or a
//! [`FieldErrors`] map keyed by the wire field name.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::id::CustomerId;
use super::invoice::{AmountCents, InvoiceStatus};
use super::user::EmailAddress;

/// Field-level validation messages keyed by the wire field name.
///
/// A `BTreeMap` keeps rendering order stable for clients and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    /// Record a message against a field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Whether no field has any message.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field, if any.
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// Outcome of a rejected mutation: field errors plus an overall message.
///
/// Rendered by the HTTP layer as a 422 response body. The caller's form
/// state is preserved client-side, so the payload carries only what changed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormRejection {
    /// Per-field validation messages.
    pub errors: FieldErrors,
    /// Overall failure message, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormRejection {
    /// A rejection carrying field errors and an overall message.
    pub fn fields(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors,
            message: Some(message.into()),
        }
    }

    /// A rejection with only an overall message.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors::default(),
            message: Some(message.into()),
        }
    }

    /// A rejection with a single field message and no overall message.
    pub fn field_error(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.push(field, message);
        Self {
            errors,
            message: None,
        }
    }
}

/// Destination of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTo(String);

impl RedirectTo {
    /// Wrap an application-relative path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The application-relative path to navigate to.
    pub fn path(&self) -> &str {
        &self.0
    }
}

const MSG_SELECT_CUSTOMER: &str = "Please select a customer.";
const MSG_AMOUNT: &str = "Please enter an amount greater than $0.";
const MSG_SELECT_STATUS: &str = "Please select an invoice status.";
const MSG_NAME: &str = "Please enter a name.";
const MSG_EMAIL: &str = "Please enter a valid email address.";

/// Raw invoice form fields, before validation.
#[derive(Debug, Clone, Default)]
pub struct InvoiceForm {
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// A fully validated invoice submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvoice {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

impl InvoiceForm {
    /// Validate every field, collecting all failures rather than stopping at
    /// the first.
    pub fn validate(&self) -> Result<ValidatedInvoice, FieldErrors> {
        let mut errors = FieldErrors::default();

        let customer_id = self
            .customer_id
            .as_deref()
            .and_then(|raw| CustomerId::new(raw).ok());
        if customer_id.is_none() {
            errors.push("customerId", MSG_SELECT_CUSTOMER);
        }

        let amount = self
            .amount
            .as_deref()
            .and_then(AmountCents::parse_major_units)
            .filter(|amount| amount.is_positive());
        if amount.is_none() {
            errors.push("amount", MSG_AMOUNT);
        }

        let status = self.status.as_deref().and_then(InvoiceStatus::parse);
        if status.is_none() {
            errors.push("status", MSG_SELECT_STATUS);
        }

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) => Ok(ValidatedInvoice {
                customer_id,
                amount,
                status,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw customer form fields, before validation.
#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

/// A fully validated customer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCustomer {
    pub name: String,
    pub email: EmailAddress,
    pub image_url: Option<String>,
}

impl CustomerForm {
    /// Validate every field, collecting all failures rather than stopping at
    /// the first.
    pub fn validate(&self) -> Result<ValidatedCustomer, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);
        if name.is_none() {
            errors.push("name", MSG_NAME);
        }

        let email = self
            .email
            .as_deref()
            .and_then(|raw| EmailAddress::parse(raw).ok());
        if email.is_none() {
            errors.push("email", MSG_EMAIL);
        }

        // Optional field: an empty string means "no image".
        let image_url = self
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_owned);

        match (name, email) {
            (Some(name), Some(email)) => Ok(ValidatedCustomer {
                name,
                email,
                image_url,
            }),
            _ => Err(errors),
        }
    }
}
