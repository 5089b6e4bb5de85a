// Main entry point for the verify server

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use telegram::{TelegramOptions, TelegramService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verify_core::kernel::{start_scheduler, BotRunner, ServerDeps, Sha256CodeHasher, TelegramAdapter};
use verify_core::{server::build_app, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,verify_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Telegram verify server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Telegram client, shared by the messenger and the update poller
    let telegram = Arc::new(TelegramService::new(TelegramOptions::new(
        config.bot_token.clone(),
    )));
    let adapter = Arc::new(TelegramAdapter::new(telegram));

    let code_hasher = match &config.code_hash_pepper {
        Some(pepper) => Sha256CodeHasher::with_pepper(pepper.clone()),
        None => Sha256CodeHasher::new(),
    };

    let deps = Arc::new(ServerDeps::new(
        pool.clone(),
        adapter.clone(),
        Arc::new(code_hasher),
        config.policy(),
        config.admin_telegram_id,
    ));

    if deps.admin_telegram_id.is_none() {
        tracing::warn!("ADMIN_TELEGRAM_ID not set; /add_project is disabled");
    }
    if config.admin_api_key.is_none() {
        tracing::warn!("ADMIN_API_KEY not set; /projects answers 503");
    }

    // Expiry sweeper
    let _scheduler = start_scheduler(pool.clone())
        .await
        .context("Failed to start scheduler")?;

    // Bot long polling
    let bot_shutdown = if config.bot_polling_enabled {
        let runner = BotRunner::new(adapter, deps.clone());
        let shutdown = runner.shutdown_handle();
        tokio::spawn(async move {
            if let Err(e) = runner.run().await {
                tracing::error!(error = %e, "Bot runner exited with error");
            }
        });
        Some(shutdown)
    } else {
        tracing::info!("Bot polling disabled");
        None
    };

    // Build application
    let app = build_app(deps, config.admin_api_key.clone())?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received shutdown signal");
    })
    .await
    .context("Server error")?;

    if let Some(shutdown) = bot_shutdown {
        shutdown.store(true, Ordering::SeqCst);
    }

    Ok(())
}
