use actix_web::{web, App, HttpServer};
use anyhow::Context;
use db_pool::create_pool;
use fcm_shared::{FCMClient, ServiceAccountKey};
use marketplace_service::{
    handlers, metrics, services::FcmPushProvider, services::PushProvider, AppState, Config,
    PostgresRepository, Repositories, MIGRATOR,
};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log_format: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,actix_web=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_push_provider(config: &Config) -> anyhow::Result<Option<Arc<dyn PushProvider>>> {
    let Some((project_id, path)) = config.push.fcm_credentials() else {
        return Ok(None);
    };

    let credentials = ServiceAccountKey::from_file(path)
        .with_context(|| format!("loading FCM service account from {}", path.display()))?;
    let client = FCMClient::new(project_id.to_string(), credentials);
    tracing::info!(project_id, "FCM push enabled");

    Ok(Some(Arc::new(FcmPushProvider::new(client))))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.app.log_format);

    tracing::info!(env = %config.app.env, "Starting marketplace service");

    config.database.log_config();
    let pool = create_pool(config.database.clone())
        .await
        .context("connecting to database")?;

    if config.app.run_migrations {
        MIGRATOR.run(&pool).await.context("running migrations")?;
        tracing::info!("Database migrations applied");
    }

    let push = build_push_provider(&config)?;
    let repos = Repositories::from_store(Arc::new(PostgresRepository::new(pool.clone())));
    let state = AppState::new(repos, push, config.push.timeout);

    let addr = config.bind_addr();
    tracing::info!("Starting HTTP server on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(pool.clone()))
            .wrap(metrics::MetricsMiddleware)
            .wrap(TracingLogger::default())
            .route("/health/ready", web::get().to(handlers::health::readiness))
            .configure(handlers::configure)
    })
    .bind(&addr)
    .with_context(|| format!("binding {addr}"))?
    .run()
    .await?;

    Ok(())
}
