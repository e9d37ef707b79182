//! Backend entry-point: wires persistence, OAuth, and the HTTP server.

use std::sync::Arc;

use mockable::{DefaultEnv, Env};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use dashboard_backend::domain::{CustomerService, InvoiceService, ProviderSignIn};
use dashboard_backend::inbound::http::session_config::{
    session_settings_from_env, BuildMode,
};
use dashboard_backend::inbound::http::state::HttpState;
use dashboard_backend::outbound::cache::InMemoryListingCache;
use dashboard_backend::outbound::oauth::{HttpProviderExchange, ProviderCredentials};
use dashboard_backend::outbound::persistence::{
    prepare_schema, seed_demo_user, DbPool, DieselCustomerRepository, DieselInvoiceRepository,
    DieselLoginService, DieselUserRepository, PoolConfig,
};
use dashboard_backend::server::{create_server, ServerConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Read one provider's registration from the environment.
///
/// A missing id or secret is tolerated so the server can run with a subset
/// of providers configured; exchanges against an unconfigured provider fail
/// at the token endpoint and surface as a sign-in error redirect.
fn provider_credentials(env: &impl Env, id_var: &str, secret_var: &str, redirect_uri: String) -> ProviderCredentials {
    let client_id = env.string(id_var).unwrap_or_else(|| {
        warn!(var = id_var, "provider client id not configured");
        String::new()
    });
    let client_secret = env.string(secret_var).unwrap_or_else(|| {
        warn!(var = secret_var, "provider client secret not configured");
        String::new()
    });
    ProviderCredentials {
        client_id,
        client_secret,
        redirect_uri,
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let bind_addr = env
        .string("BIND_ADDR")
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
        .parse()
        .map_err(std::io::Error::other)?;

    let database_url = env
        .string("DATABASE_URL")
        .ok_or_else(|| std::io::Error::other("DATABASE_URL is required"))?;
    let mut pool_config = PoolConfig::new(database_url);
    if let Some(raw) = env.string("DB_POOL_MAX_CONNECTIONS") {
        let max = raw
            .parse::<u32>()
            .ok()
            .filter(|&max| max > 0)
            .ok_or_else(|| {
                std::io::Error::other("DB_POOL_MAX_CONNECTIONS must be a positive integer")
            })?;
        pool_config = pool_config.with_max_connections(max);
    }
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;
    prepare_schema(&pool).await.map_err(std::io::Error::other)?;
    if env.string("SEED_DEMO_DATA").as_deref() == Some("1") {
        seed_demo_user(&pool).await.map_err(std::io::Error::other)?;
    }

    let base_url = env
        .string("PUBLIC_BASE_URL")
        .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_owned());
    let github = provider_credentials(
        &env,
        "GITHUB_ID",
        "GITHUB_SECRET",
        format!("{base_url}/auth/callback/github"),
    );
    let facebook = provider_credentials(
        &env,
        "FACEBOOK_ID",
        "FACEBOOK_SECRET",
        format!("{base_url}/auth/callback/facebook"),
    );
    let oauth = HttpProviderExchange::new(github, facebook).map_err(std::io::Error::other)?;

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let customers = Arc::new(DieselCustomerRepository::new(pool.clone()));
    let invoices = Arc::new(DieselInvoiceRepository::new(pool.clone()));
    let cache = Arc::new(InMemoryListingCache::default());

    let state = HttpState {
        login: Arc::new(DieselLoginService::new(users.clone())),
        users: users.clone(),
        oauth: Arc::new(oauth),
        provider_signin: Arc::new(ProviderSignIn::new(users)),
        customers: Arc::new(CustomerService::new(customers.clone(), cache.clone())),
        invoices: Arc::new(InvoiceService::new(invoices, customers, cache)),
    };

    create_server(state, ServerConfig::new(session, bind_addr))?.await
}
