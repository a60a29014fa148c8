use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use atelier::config::{self, CONFIG};
use atelier::db::GalleryStore;
use atelier::router::ResetSettings;
use atelier::{AtelierError, AtelierState, atelier_router, password};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    if cfg.secret_key.is_empty() {
        return Err("SECRET_KEY must not be empty".into());
    }
    if cfg.secret_key == config::DEFAULT_SECRET_KEY {
        warn!("SECRET_KEY is the built-in default; admin sessions are forgeable");
    }

    let database_url = cfg
        .database_url
        .as_deref()
        .ok_or(AtelierError::MissingDatabaseUrl)?;

    info!(
        database_url = %database_url,
        port = cfg.port,
        loglevel = %cfg.loglevel
    );

    let store = GalleryStore::connect(database_url).await?;
    store.init_schema().await?;

    if store.count_admins().await? == 0 {
        let hash = password::hash_password(&cfg.default_admin_pw)?;
        store.seed_admin(&cfg.default_admin_user, &hash).await?;
        info!(
            username = %cfg.default_admin_user,
            "default admin created; change the password after first login"
        );
    }

    if cfg.reset_admin_token.is_none() {
        info!("/reset_admin is disabled (RESET_ADMIN_TOKEN not set)");
    }

    let reset = ResetSettings {
        username: cfg.reset_admin_user.clone(),
        password: cfg.reset_admin_pw.clone(),
        token: cfg.reset_admin_token.clone(),
    };
    let state = AtelierState::new(store, &cfg.secret_key, reset);
    let app = atelier_router(state);

    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
