//! Access gate middleware enforcing the session boundary.
//!
//! Runs after the session middleware on every request and applies a fixed
//! path policy: API, health, and provider-callback endpoints pass through
//! untouched, the public pages bounce authenticated visitors to the
//! dashboard, and everything else redirects anonymous visitors to the login
//! page with the original path preserved in a `from` query parameter.

use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::inbound::http::session::USER_ID_KEY;

const LOGIN_PATH: &str = "/login";
const DASHBOARD_PATH: &str = "/dashboard";

/// Routes the gate never redirects: API endpoints carry their own 401
/// semantics, and the provider callback must complete even when the caller
/// already holds a session, or re-authentication silently no-ops.
fn is_exempt(path: &str) -> bool {
    path == "/healthz"
        || path == "/api"
        || path.starts_with("/api/")
        || path.starts_with("/auth/callback/")
}

/// Pages reachable without a session.
fn is_public(path: &str) -> bool {
    path == LOGIN_PATH || path == "/auth" || path.starts_with("/auth/")
}

fn login_redirect_target(path: &str) -> String {
    let from: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{LOGIN_PATH}?from={from}")
}

/// Session-based access gate.
///
/// Must be wrapped inside the session middleware so the cookie has already
/// been decoded when the gate inspects it.
#[derive(Clone)]
pub struct AccessGate;

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateMiddleware { service }))
    }
}

/// Service wrapper produced by [`AccessGate`].
pub struct AccessGateMiddleware<S> {
    service: S,
}

impl<S, B> AccessGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    fn redirect(
        req: ServiceRequest,
        location: String,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let (request, _payload) = req.into_parts();
        let response = HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish()
            .map_into_right_body();
        Box::pin(ready(Ok(ServiceResponse::new(request, response))))
    }

    fn forward(
        &self,
        req: ServiceRequest,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_owned();
        if is_exempt(&path) {
            return self.forward(req);
        }

        // A cookie that cannot be decoded counts as no session.
        let authenticated = req
            .get_session()
            .get::<String>(USER_ID_KEY)
            .ok()
            .flatten()
            .is_some();

        if is_public(&path) {
            if authenticated {
                return Self::redirect(req, DASHBOARD_PATH.to_owned());
            }
            return self.forward(req);
        }
        if !authenticated {
            return Self::redirect(req, login_redirect_target(&path));
        }
        self.forward(req)
    }
}
