//! HTTP adapter: handlers, session plumbing, and error mapping.

use actix_web::http::header;
use actix_web::HttpResponse;

use crate::domain::FormRejection;

pub mod auth;
pub mod customers;
pub mod error;
pub mod health;
pub mod invoices;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use crate::domain::ApiResult;

/// `303 See Other` pointing at an application path; the standard success
/// response for form mutations.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// `422 Unprocessable Entity` carrying the rejection payload so the client
/// can re-render the form without losing its state.
pub(crate) fn rejection_response(rejection: &FormRejection) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(rejection)
}
