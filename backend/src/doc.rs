//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the HTTP surface: the credential and provider sign-in endpoints, the
//! owner-scoped customer and invoice operations, and the health probe. The
//! generated document is served at `/api/openapi.json` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, FieldErrors, FormRejection};
use crate::inbound::http::auth::{AuthErrorView, LoginFormData, SessionUser, SessionView};
use crate::inbound::http::customers::CustomerFormData;
use crate::inbound::http::invoices::InvoiceFormData;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the dashboard API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Dashboard backend API",
        description = "Session-authenticated customer and invoice management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::provider_callback,
        crate::inbound::http::auth::auth_error,
        crate::inbound::http::auth::session_view,
        crate::inbound::http::invoices::list_invoices,
        crate::inbound::http::invoices::create_invoice,
        crate::inbound::http::invoices::edit_invoice_data,
        crate::inbound::http::invoices::update_invoice,
        crate::inbound::http::invoices::delete_invoice,
        crate::inbound::http::customers::list_customers,
        crate::inbound::http::customers::create_customer,
        crate::inbound::http::customers::edit_customer_data,
        crate::inbound::http::customers::update_customer,
        crate::inbound::http::customers::delete_customer,
        crate::inbound::http::health::healthz,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginFormData,
        AuthErrorView,
        SessionUser,
        SessionView,
        InvoiceFormData,
        CustomerFormData,
        FieldErrors,
        FormRejection,
    )),
    tags(
        (name = "auth", description = "Sign-in, sign-out, and session introspection"),
        (name = "invoices", description = "Owner-scoped invoice management"),
        (name = "customers", description = "Owner-scoped customer management"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;
