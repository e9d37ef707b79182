//! Customer handlers.
//!
//! ```text
//! GET  /dashboard/customers
//! POST /dashboard/customers              name=...&email=...&image_url=...
//! GET  /dashboard/customers/{id}/edit
//! POST /dashboard/customers/{id}
//! POST /dashboard/customers/{id}/delete
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::{Customer, CustomerForm, CustomerId, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{rejection_response, see_other, ApiResult};

/// Customer form body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CustomerFormData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<CustomerFormData> for CustomerForm {
    fn from(value: CustomerFormData) -> Self {
        Self {
            name: value.name,
            email: value.email,
            image_url: value.image_url,
        }
    }
}

fn parse_customer_id(raw: &str) -> Result<CustomerId, Error> {
    CustomerId::new(raw)
        .map_err(|error| Error::invalid_request(format!("invalid customer id: {error}")))
}

/// List the caller's customers.
#[utoipa::path(
    get,
    path = "/dashboard/customers",
    responses(
        (status = 200, description = "The caller's customers"),
        (status = 401, description = "No session", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["customers"],
    operation_id = "listCustomers"
)]
#[get("/dashboard/customers")]
pub async fn list_customers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Customer>>> {
    let owner = session.require_user_id()?;
    Ok(web::Json(state.customers.list(&owner).await?))
}

/// Create a customer from a submitted form.
#[utoipa::path(
    post,
    path = "/dashboard/customers",
    request_body(content = CustomerFormData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirect to the listing", headers(("Location" = String))),
        (status = 401, description = "No session", body = Error),
        (status = 422, description = "Validation or storage rejection")
    ),
    tags = ["customers"],
    operation_id = "createCustomer"
)]
#[post("/dashboard/customers")]
pub async fn create_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Form<CustomerFormData>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let form = CustomerForm::from(payload.into_inner());
    match state.customers.create(&owner, &form).await {
        Ok(redirect) => Ok(see_other(redirect.path())),
        Err(rejection) => Ok(rejection_response(&rejection)),
    }
}

/// Load the customer backing the edit form.
#[utoipa::path(
    get,
    path = "/dashboard/customers/{id}/edit",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "The customer"),
        (status = 401, description = "No session", body = Error),
        (status = 404, description = "Not owned by the caller", body = Error)
    ),
    tags = ["customers"],
    operation_id = "editCustomerData"
)]
#[get("/dashboard/customers/{id}/edit")]
pub async fn edit_customer_data(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Customer>> {
    let owner = session.require_user_id()?;
    let id = parse_customer_id(&path)?;
    Ok(web::Json(state.customers.edit_data(&owner, &id).await?))
}

/// Update a customer from a submitted form.
#[utoipa::path(
    post,
    path = "/dashboard/customers/{id}",
    params(("id" = String, Path, description = "Customer id")),
    request_body(content = CustomerFormData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirect to the listing", headers(("Location" = String))),
        (status = 401, description = "No session", body = Error),
        (status = 422, description = "Validation, ownership, or storage rejection")
    ),
    tags = ["customers"],
    operation_id = "updateCustomer"
)]
#[post("/dashboard/customers/{id}")]
pub async fn update_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Form<CustomerFormData>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = parse_customer_id(&path)?;
    let form = CustomerForm::from(payload.into_inner());
    match state.customers.update(&owner, &id, &form).await {
        Ok(redirect) => Ok(see_other(redirect.path())),
        Err(rejection) => Ok(rejection_response(&rejection)),
    }
}

/// Delete a customer. Missing or foreign ids succeed silently.
#[utoipa::path(
    post,
    path = "/dashboard/customers/{id}/delete",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 303, description = "Deleted; redirect to the listing", headers(("Location" = String))),
        (status = 401, description = "No session", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["customers"],
    operation_id = "deleteCustomer"
)]
#[post("/dashboard/customers/{id}/delete")]
pub async fn delete_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = parse_customer_id(&path)?;
    state.customers.delete(&owner, &id).await?;
    Ok(see_other(crate::domain::CUSTOMERS_PATH))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::http::{header, StatusCode};
    use actix_web::{test, web, App};
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::invoices::tests::{customer, http_state, StubBackend, StubState};
    use crate::inbound::http::session::USER_ID_KEY;
    use crate::inbound::http::test_utils::test_session_middleware;

    macro_rules! customer_app {
        ($backend:expr) => {
            test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .app_data(web::Data::new(http_state($backend)))
                    .route(
                        "/test/login/{id}",
                        web::post().to(
                            |session: actix_session::Session, path: web::Path<String>| async move {
                                session
                                    .insert(USER_ID_KEY, path.into_inner())
                                    .expect("seed session");
                                actix_web::HttpResponse::Ok().finish()
                            },
                        ),
                    )
                    .service(list_customers)
                    .service(create_customer)
                    .service(edit_customer_data)
                    .service(update_customer)
                    .service(delete_customer),
            )
            .await
        };
    }

    macro_rules! login_as {
        ($app:expr, $user:expr) => {{
            let req = test::TestRequest::post()
                .uri(concat!("/test/login/", $user))
                .to_request();
            let res = test::call_service(&$app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            res.response()
                .cookies()
                .find(|cookie| cookie.name() == "session")
                .expect("session cookie")
                .into_owned()
        }};
    }

    #[actix_web::test]
    async fn create_customer_round_trip() {
        let backend = Arc::new(StubBackend::default());
        let app = customer_app!(backend.clone());
        let cookie = login_as!(app, "u1");

        let req = test::TestRequest::post()
            .uri("/dashboard/customers")
            .cookie(cookie)
            .set_form(CustomerFormData {
                name: Some("Grace Hopper".into()),
                email: Some("grace@example.com".into()),
                image_url: Some("".into()),
            })
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).expect("location"),
            "/dashboard/customers"
        );
        let state = backend.lock();
        assert_eq!(state.customers.len(), 1);
        assert_eq!(state.customers[0].owner_id.as_str(), "u1");
        assert_eq!(state.customers[0].image_url, None);
    }

    #[actix_web::test]
    async fn create_customer_validation_failure_is_422_with_field_errors() {
        let backend = Arc::new(StubBackend::default());
        let app = customer_app!(backend);
        let cookie = login_as!(app, "u1");

        let req = test::TestRequest::post()
            .uri("/dashboard/customers")
            .cookie(cookie)
            .set_form(CustomerFormData {
                name: Some("".into()),
                email: Some("not-an-email".into()),
                image_url: None,
            })
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Missing Fields. Failed to Create Customer.");
        assert_eq!(body["errors"]["name"][0], "Please enter a name.");
        assert_eq!(
            body["errors"]["email"][0],
            "Please enter a valid email address."
        );
    }

    #[actix_web::test]
    async fn update_foreign_customer_is_rejected() {
        let backend = Arc::new(StubBackend {
            state: Mutex::new(StubState {
                customers: vec![customer("c1", "u1")],
                ..StubState::default()
            }),
        });
        let app = customer_app!(backend.clone());
        let cookie = login_as!(app, "u2");

        let req = test::TestRequest::post()
            .uri("/dashboard/customers/c1")
            .cookie(cookie)
            .set_form(CustomerFormData {
                name: Some("Mallory".into()),
                email: Some("mallory@example.com".into()),
                image_url: None,
            })
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Could not find customer to update.");
        assert_eq!(backend.lock().customers[0].name, "Ada");
    }

    #[actix_web::test]
    async fn listing_is_owner_scoped() {
        let backend = Arc::new(StubBackend {
            state: Mutex::new(StubState {
                customers: vec![customer("c1", "u1"), customer("c2", "u2")],
                ..StubState::default()
            }),
        });
        let app = customer_app!(backend);
        let cookie = login_as!(app, "u1");

        let req = test::TestRequest::get()
            .uri("/dashboard/customers")
            .cookie(cookie)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let rows = body.as_array().expect("array");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "c1");
    }

    #[actix_web::test]
    async fn edit_data_hides_foreign_customers() {
        let backend = Arc::new(StubBackend {
            state: Mutex::new(StubState {
                customers: vec![customer("c1", "u1")],
                ..StubState::default()
            }),
        });
        let app = customer_app!(backend);
        let cookie = login_as!(app, "u2");

        let req = test::TestRequest::get()
            .uri("/dashboard/customers/c1/edit")
            .cookie(cookie)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_is_owner_scoped_and_idempotent() {
        let backend = Arc::new(StubBackend {
            state: Mutex::new(StubState {
                customers: vec![customer("c1", "u1")],
                ..StubState::default()
            }),
        });
        let app = customer_app!(backend.clone());

        let intruder_cookie = login_as!(app, "u2");
        let req = test::TestRequest::post()
            .uri("/dashboard/customers/c1/delete")
            .cookie(intruder_cookie)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(backend.lock().customers.len(), 1);

        let owner_cookie = login_as!(app, "u1");
        let req = test::TestRequest::post()
            .uri("/dashboard/customers/c1/delete")
            .cookie(owner_cookie)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(backend.lock().customers.is_empty());
    }
}
