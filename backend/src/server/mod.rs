//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};

#[cfg(debug_assertions)]
use utoipa::OpenApi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::auth::{auth_error, login, logout, provider_callback, session_view};
use crate::inbound::http::customers::{
    create_customer, delete_customer, edit_customer_data, list_customers, update_customer,
};
use crate::inbound::http::health::healthz;
use crate::inbound::http::invoices::{
    create_invoice, delete_invoice, edit_invoice_data, list_invoices, update_invoice,
};
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;
use crate::middleware::{AccessGate, Trace};

/// Build the session middleware from validated settings.
fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(settings.same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(settings.ttl))
        .build()
}

/// Construct an HTTP server ready to be awaited.
///
/// Middleware runs outermost-first: `Trace`, then the session layer, then
/// the access gate, so the gate always sees a resolved session.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(state: HttpState, config: ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::new(state);
    let ServerConfig { session, bind_addr } = config;

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .wrap(AccessGate)
            .wrap(session_middleware(&session))
            .wrap(Trace)
            .service(healthz)
            .service(login)
            .service(logout)
            .service(provider_callback)
            .service(auth_error)
            .service(session_view)
            .service(list_invoices)
            .service(create_invoice)
            .service(edit_invoice_data)
            .service(update_invoice)
            .service(delete_invoice)
            .service(list_customers)
            .service(create_customer)
            .service(edit_customer_data)
            .service(update_customer)
            .service(delete_customer);

        #[cfg(debug_assertions)]
        let app = app.route(
            "/api/openapi.json",
            web::get().to(|| async { web::Json(ApiDoc::openapi()) }),
        );

        app
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
