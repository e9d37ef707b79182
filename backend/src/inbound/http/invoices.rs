//! Invoice handlers.
//!
//! ```text
//! GET  /dashboard/invoices
//! POST /dashboard/invoices               customerId=...&amount=...&status=...
//! GET  /dashboard/invoices/{id}/edit
//! POST /dashboard/invoices/{id}
//! POST /dashboard/invoices/{id}/delete
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::{EditInvoiceData, Error, Invoice, InvoiceForm, InvoiceId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{rejection_response, see_other, ApiResult};

/// Invoice form body. Fields arrive untrusted; the domain validator decides
/// what they mean.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct InvoiceFormData {
    #[serde(default, rename = "customerId")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<InvoiceFormData> for InvoiceForm {
    fn from(value: InvoiceFormData) -> Self {
        Self {
            customer_id: value.customer_id,
            amount: value.amount,
            status: value.status,
        }
    }
}

fn parse_invoice_id(raw: &str) -> Result<InvoiceId, Error> {
    InvoiceId::new(raw).map_err(|error| Error::invalid_request(format!("invalid invoice id: {error}")))
}

/// List the caller's invoices.
#[utoipa::path(
    get,
    path = "/dashboard/invoices",
    responses(
        (status = 200, description = "The caller's invoices"),
        (status = 401, description = "No session", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "listInvoices"
)]
#[get("/dashboard/invoices")]
pub async fn list_invoices(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Invoice>>> {
    let owner = session.require_user_id()?;
    Ok(web::Json(state.invoices.list(&owner).await?))
}

/// Create an invoice from a submitted form.
#[utoipa::path(
    post,
    path = "/dashboard/invoices",
    request_body(content = InvoiceFormData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirect to the listing", headers(("Location" = String))),
        (status = 401, description = "No session", body = Error),
        (status = 422, description = "Validation or storage rejection")
    ),
    tags = ["invoices"],
    operation_id = "createInvoice"
)]
#[post("/dashboard/invoices")]
pub async fn create_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Form<InvoiceFormData>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let form = InvoiceForm::from(payload.into_inner());
    match state.invoices.create(&owner, &form).await {
        Ok(redirect) => Ok(see_other(redirect.path())),
        Err(rejection) => Ok(rejection_response(&rejection)),
    }
}

/// Load the invoice and customer roster backing the edit form.
#[utoipa::path(
    get,
    path = "/dashboard/invoices/{id}/edit",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice and customer roster"),
        (status = 401, description = "No session", body = Error),
        (status = 404, description = "Not owned by the caller", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "editInvoiceData"
)]
#[get("/dashboard/invoices/{id}/edit")]
pub async fn edit_invoice_data(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<EditInvoiceData>> {
    let owner = session.require_user_id()?;
    let id = parse_invoice_id(&path)?;
    Ok(web::Json(state.invoices.edit_data(&owner, &id).await?))
}

/// Update an invoice from a submitted form.
#[utoipa::path(
    post,
    path = "/dashboard/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    request_body(content = InvoiceFormData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirect to the listing", headers(("Location" = String))),
        (status = 401, description = "No session", body = Error),
        (status = 422, description = "Validation, ownership, or storage rejection")
    ),
    tags = ["invoices"],
    operation_id = "updateInvoice"
)]
#[post("/dashboard/invoices/{id}")]
pub async fn update_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Form<InvoiceFormData>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = parse_invoice_id(&path)?;
    let form = InvoiceForm::from(payload.into_inner());
    match state.invoices.update(&owner, &id, &form).await {
        Ok(redirect) => Ok(see_other(redirect.path())),
        Err(rejection) => Ok(rejection_response(&rejection)),
    }
}

/// Delete an invoice. Missing or foreign ids succeed silently.
#[utoipa::path(
    post,
    path = "/dashboard/invoices/{id}/delete",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 303, description = "Deleted; redirect to the listing", headers(("Location" = String))),
        (status = 401, description = "No session", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "deleteInvoice"
)]
#[post("/dashboard/invoices/{id}/delete")]
pub async fn delete_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = parse_invoice_id(&path)?;
    state.invoices.delete(&owner, &id).await?;
    Ok(see_other(crate::domain::INVOICES_PATH))
}
