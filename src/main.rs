use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use std::sync::Arc;

use dayflow::config::Config;
use dayflow::db::init_db;
use dayflow::docs::ApiDoc;
use dayflow::mail::init_log_mailer;
use dayflow::routes::RateLimits;
use dayflow::state::Services;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const REGISTRY_WARMUP_BATCH: usize = 250;

#[get("/")]
async fn index() -> impl Responder {
    "Dayflow HRMS"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let limits = Arc::new(RateLimits::from_config(&config)?);
    let server_addr = config.server_addr.clone();
    let services = Services::new(pool, config);

    let mailer = services.mailer.clone();
    let mail_from = services.config.mail_from.clone();
    actix_web::rt::spawn(async move {
        init_log_mailer(&mailer, mail_from).await;
    });

    let registry = services.registry.clone();
    let pool_for_warmup = services.pool.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = registry.warmup(&pool_for_warmup, REGISTRY_WARMUP_BATCH).await {
            error!(error = ?e, "Failed to warm up email registry");
        }
    });

    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        let services = services.clone();
        let limits = limits.clone();

        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .service(index)
            .configure(move |cfg| dayflow::configure_app(cfg, &services, &limits))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
