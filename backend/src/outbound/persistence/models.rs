//! Row structs and changesets bridging Diesel and the domain entities.
//!
//! Row-to-domain conversion re-validates what the database cannot express
//! (email grammar, status vocabulary); a malformed row is a query error, not
//! a silently coerced value.

use diesel::prelude::*;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    AmountCents, Customer, CustomerId, EmailAddress, Invoice, InvoiceId, InvoiceStatus, User,
    UserId,
};

use super::schema::{customers, invoices, users};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub image: Option<String>,
}

impl UserRow {
    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.to_string(),
            password: user.password_hash.clone(),
            image: user.image.clone(),
        }
    }

    pub fn into_domain(self) -> Result<User, PersistenceError> {
        let id = UserId::new(self.id)
            .map_err(|error| PersistenceError::query(format!("malformed user id: {error}")))?;
        let email = EmailAddress::parse(self.email)
            .map_err(|error| PersistenceError::query(format!("malformed user email: {error}")))?;
        Ok(User {
            id,
            name: self.name,
            email,
            password_hash: self.password,
            image: self.image,
        })
    }
}

/// Profile fields refreshed on provider sign-in.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserProfileChangeset<'a> {
    pub name: &'a str,
    pub image: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}

impl CustomerRow {
    pub fn from_domain(customer: &Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            owner_id: customer.owner_id.to_string(),
            name: customer.name.clone(),
            email: customer.email.to_string(),
            image_url: customer.image_url.clone(),
        }
    }

    pub fn into_domain(self) -> Result<Customer, PersistenceError> {
        let id = CustomerId::new(self.id)
            .map_err(|error| PersistenceError::query(format!("malformed customer id: {error}")))?;
        let owner_id = UserId::new(self.owner_id)
            .map_err(|error| PersistenceError::query(format!("malformed owner id: {error}")))?;
        let email = EmailAddress::parse(self.email).map_err(|error| {
            PersistenceError::query(format!("malformed customer email: {error}"))
        })?;
        Ok(Customer {
            id,
            owner_id,
            name: self.name,
            email,
            image_url: self.image_url,
        })
    }
}

/// Updatable customer columns. `image_url` is always written so a cleared
/// avatar becomes NULL rather than sticking.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = customers)]
#[diesel(treat_none_as_null = true)]
pub struct CustomerChangeset<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub image_url: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvoiceRow {
    pub id: String,
    pub owner_id: String,
    pub customer_id: String,
    pub amount: i64,
    pub status: String,
    pub date: chrono::NaiveDate,
}

impl InvoiceRow {
    pub fn from_domain(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id.to_string(),
            owner_id: invoice.owner_id.to_string(),
            customer_id: invoice.customer_id.to_string(),
            amount: invoice.amount.get(),
            status: invoice.status.as_str().to_owned(),
            date: invoice.date,
        }
    }

    pub fn into_domain(self) -> Result<Invoice, PersistenceError> {
        let id = InvoiceId::new(self.id)
            .map_err(|error| PersistenceError::query(format!("malformed invoice id: {error}")))?;
        let owner_id = UserId::new(self.owner_id)
            .map_err(|error| PersistenceError::query(format!("malformed owner id: {error}")))?;
        let customer_id = CustomerId::new(self.customer_id)
            .map_err(|error| PersistenceError::query(format!("malformed customer id: {error}")))?;
        let status = InvoiceStatus::parse(&self.status).ok_or_else(|| {
            PersistenceError::query(format!("unrecognised invoice status: {}", self.status))
        })?;
        Ok(Invoice {
            id,
            owner_id,
            customer_id,
            amount: AmountCents::new(self.amount),
            status,
            date: self.date,
        })
    }
}

/// Updatable invoice columns. Owner, id, and date are immutable.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = invoices)]
pub struct InvoiceChangeset<'a> {
    pub customer_id: &'a str,
    pub amount: i64,
    pub status: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_row_round_trips() {
        let invoice = Invoice {
            id: InvoiceId::new("i1").expect("valid id"),
            owner_id: UserId::new("u1").expect("valid id"),
            customer_id: CustomerId::new("c1").expect("valid id"),
            amount: AmountCents::new(1999),
            status: InvoiceStatus::Paid,
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        };
        let row = InvoiceRow::from_domain(&invoice);
        assert_eq!(row.status, "paid");
        assert_eq!(row.amount, 1999);
        let back = row.into_domain().expect("valid row");
        assert_eq!(back, invoice);
    }

    #[test]
    fn malformed_status_is_a_query_error() {
        let row = InvoiceRow {
            id: "i1".into(),
            owner_id: "u1".into(),
            customer_id: "c1".into(),
            amount: 100,
            status: "overdue".into(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        };
        let error = row.into_domain().expect_err("rejects");
        assert!(matches!(error, PersistenceError::Query { .. }));
    }

    #[test]
    fn malformed_email_is_a_query_error() {
        let row = UserRow {
            id: "u1".into(),
            name: "Ada".into(),
            email: "not-an-email".into(),
            password: None,
            image: None,
        };
        let error = row.into_domain().expect_err("rejects");
        assert!(matches!(error, PersistenceError::Query { .. }));
    }
}
