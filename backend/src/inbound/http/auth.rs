//! Authentication handlers.
//!
//! ```text
//! POST /login            email=...&password=...
//! POST /logout
//! GET  /auth/callback/{provider}?code=...
//! GET  /auth/error?error=Code
//! GET  /api/session
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{AuthErrorCode, Error, LoginCredentials, Provider, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{see_other, ApiResult};

const DASHBOARD_PATH: &str = "/dashboard";
const AUTH_ERROR_PATH: &str = "/auth/error";

/// Login form body for `POST /login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginFormData {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Authenticate with credentials and establish a session.
///
/// Every failure mode answers the same 401 so responses cannot be used to
/// probe which addresses have accounts.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginFormData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Login success", headers(("Location" = String), ("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Form<LoginFormData>,
) -> ApiResult<HttpResponse> {
    let Some(credentials) = LoginCredentials::parse(&payload.email, &payload.password) else {
        return Err(Error::unauthorized("invalid credentials"));
    };
    let Some(user) = state.login.authenticate(&credentials).await else {
        return Err(Error::unauthorized("invalid credentials"));
    };
    session.persist_user(&user)?;
    info!(user_id = %user.id, "credential sign-in");
    Ok(see_other(DASHBOARD_PATH))
}

/// Drop the session and bounce back to the login page.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 303, description = "Session cleared", headers(("Location" = String)))),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    see_other("/login")
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn auth_error_redirect(code: AuthErrorCode) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((
            actix_web::http::header::LOCATION,
            format!("{AUTH_ERROR_PATH}?error={code}"),
        ))
        .finish()
}

/// Complete an external-provider sign-in.
///
/// Failures never surface as raw errors: each maps to a fixed code on the
/// error page so the provider round-trip always lands somewhere navigable.
#[utoipa::path(
    get,
    path = "/auth/callback/{provider}",
    params(
        ("provider" = String, Path, description = "Provider token, `github` or `facebook`"),
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("error" = Option<String>, Query, description = "Provider-reported denial")
    ),
    responses(
        (status = 303, description = "Sign-in complete", headers(("Location" = String), ("Set-Cookie" = String))),
        (status = 302, description = "Sign-in failed; redirect to the error page")
    ),
    tags = ["auth"],
    operation_id = "providerCallback",
    security([])
)]
#[get("/auth/callback/{provider}")]
pub async fn provider_callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let Some(provider) = Provider::parse(&path) else {
        return Ok(auth_error_redirect(AuthErrorCode::Configuration));
    };
    if query.error.is_some() {
        return Ok(auth_error_redirect(AuthErrorCode::AccessDenied));
    }
    let Some(code) = query.code.as_deref() else {
        return Ok(auth_error_redirect(AuthErrorCode::OAuthCallback));
    };

    let profile = match state.oauth.exchange_code(provider, code).await {
        Ok(profile) => profile,
        Err(error) => {
            tracing::warn!(%error, %provider, "provider exchange failed");
            return Ok(auth_error_redirect(AuthErrorCode::OAuthCallback));
        }
    };

    let user = match state.provider_signin.sign_in(&profile).await {
        Ok(user) => user,
        Err(rejection) => return Ok(auth_error_redirect(rejection.0)),
    };
    session.persist_user(&user)?;
    info!(user_id = %user.id, %provider, "provider sign-in");
    Ok(see_other(DASHBOARD_PATH))
}

#[derive(Deserialize)]
pub struct AuthErrorQuery {
    #[serde(default)]
    error: Option<String>,
}

/// Error-page payload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthErrorView {
    /// The code as received, or `unknown`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// Describe a sign-in failure code.
#[utoipa::path(
    get,
    path = "/auth/error",
    params(("error" = Option<String>, Query, description = "Sign-in failure code")),
    responses((status = 200, description = "Failure description", body = AuthErrorView)),
    tags = ["auth"],
    operation_id = "authError",
    security([])
)]
#[get("/auth/error")]
pub async fn auth_error(query: web::Query<AuthErrorQuery>) -> web::Json<AuthErrorView> {
    let raw = query.error.as_deref().unwrap_or("unknown");
    let message = AuthErrorCode::parse(raw)
        .map(AuthErrorCode::description)
        .unwrap_or_else(AuthErrorCode::unknown_description);
    web::Json(AuthErrorView {
        error: raw.to_owned(),
        message: message.to_owned(),
    })
}

/// Authenticated-user view returned by `GET /api/session`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionView {
    pub user: SessionUser,
}

impl From<User> for SessionView {
    fn from(user: User) -> Self {
        Self {
            user: SessionUser {
                id: user.id.to_string(),
                name: user.name,
                email: user.email.to_string(),
                image: user.image,
            },
        }
    }
}

/// Describe the signed-in user.
///
/// Profile fields come from storage on every call; the cookie only anchors
/// the id, so a profile refresh shows up without re-login.
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Session owner", body = SessionView),
        (status = 401, description = "No session", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "sessionView"
)]
#[get("/api/session")]
pub async fn session_view(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionView>> {
    let user_id = session.require_user_id()?;
    let user = state
        .users
        .find_by_id(&user_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::unauthorized("login required"))?;
    Ok(web::Json(user.into()))
}
