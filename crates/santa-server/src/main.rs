use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use santa_api::auth::{AppState, AppStateInner};
use santa_core::config::DEFAULT_ADMIN_PASSPHRASE;
use santa_core::{AdminAuth, AppConfig, Generator, Notifier};
use santa_db::Database;
use santa_mail::SmtpNotifier;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "santa=debug,santa_api=debug,santa_core=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let config = AppConfig::from_env()?;
    let jwt_secret = std::env::var("SANTA_JWT_SECRET").unwrap_or_default();
    if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
        eprintln!("FATAL: SANTA_JWT_SECRET is unset or still a placeholder.");
        eprintln!("       Set it in your .env file and restart.");
        std::process::exit(1);
    }
    if config.admin_passphrase == DEFAULT_ADMIN_PASSPHRASE {
        warn!("SANTA_ADMIN_PASSPHRASE is the built-in default; change it before sharing the URL");
    }

    let db_path: PathBuf = std::env::var("SANTA_DB_PATH")
        .unwrap_or_else(|_| "santa.db".into())
        .into();
    let host = std::env::var("SANTA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("SANTA_PORT")
        .unwrap_or_else(|_| "5000".into())
        .parse()?;

    // Init database
    let db = Arc::new(Database::open(&db_path)?);

    let notifier: Option<Arc<dyn Notifier>> = match SmtpNotifier::new(&config.mail) {
        Ok(n) => Some(Arc::new(n)),
        Err(e) => {
            warn!("Email notifications disabled: {}", e);
            None
        }
    };

    let state: AppState = Arc::new(AppStateInner {
        participants: db.clone(),
        assignments: db,
        notifier,
        auth: AdminAuth::new(config.admin_passphrase.clone(), jwt_secret),
        generator: Generator::new(config.max_draw_attempts),
    });

    let app = santa_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Secret Santa server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
