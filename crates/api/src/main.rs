use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use westeros_api::auth::users::UserDirectory;
use westeros_api::config::ServerConfig;
use westeros_api::router::build_app_router;
use westeros_api::state::AppState;
use westeros_core::loader::load_seeds;
use westeros_core::memory::MemoryStore;
use westeros_core::store::CharacterStore;
use westeros_db::PgCharacterStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Character store ---
    let store = build_store(&config).await?;
    tracing::info!(backend = store.backend(), "Character store ready");

    // --- Accounts ---
    let users = UserDirectory::load(&config.users_file).await?;
    if users.is_empty() {
        tracing::warn!("No user accounts configured, write endpoints are unreachable");
    }

    // --- App state ---
    let state = AppState {
        store,
        users: Arc::new(users),
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse::<IpAddr>()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "westeros_api=debug,westeros_core=debug,westeros_db=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Pick the store backing: PostgreSQL when `DATABASE_URL` is set, otherwise
/// an in-memory store seeded from the dataset file.
async fn build_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn CharacterStore>> {
    if let Some(database_url) = &config.database_url {
        let pool = westeros_db::create_pool(database_url)
            .await
            .context("Failed to connect to database")?;
        tracing::info!("Database connection pool created");

        westeros_db::health_check(&pool)
            .await
            .context("Database health check failed")?;
        tracing::info!("Database health check passed");

        westeros_db::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");

        return Ok(Arc::new(PgCharacterStore::new(pool)));
    }

    let seeds = match load_seeds(&config.characters_file).await {
        Ok(seeds) => seeds,
        Err(e) if e.is_missing_file() => {
            tracing::warn!(
                path = %config.characters_file.display(),
                "Dataset file not found, starting with an empty store",
            );
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };
    let store = MemoryStore::from_seeds(seeds);
    Ok(Arc::new(store))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
