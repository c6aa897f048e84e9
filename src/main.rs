use std::sync::Arc;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clubdesk::{
    api,
    config::Settings,
    email::{CertificateMailer, SmtpMailer},
    generation::{GenAiClient, ImageGenerator, TextGenerator},
    service::ServiceContext,
    storage::{LocalObjectStorage, ObjectStorage},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubdesk=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting Clubdesk server on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // Object storage for generated certificates
    let storage: Arc<dyn ObjectStorage> = Arc::new(LocalObjectStorage::new(
        settings.storage.uploads_dir.clone(),
        settings.storage.public_base_url.clone(),
    ));

    // Generation client is shared by the image and text helpers; both are
    // simply disabled when no API key is configured.
    let genai = GenAiClient::new(settings.genai.clone()).map(Arc::new);
    let image_generator: Option<Arc<dyn ImageGenerator>> =
        genai.clone().map(|c| c as Arc<dyn ImageGenerator>);
    let text_generator: Option<Arc<dyn TextGenerator>> =
        genai.map(|c| c as Arc<dyn TextGenerator>);

    match &image_generator {
        Some(_) => tracing::info!("AI content generation enabled"),
        None => tracing::info!("AI content generation disabled"),
    }

    // Mailer validates its credentials per send, not here.
    let mailer: Arc<dyn CertificateMailer> = Arc::new(SmtpMailer::new(settings.email.clone()));

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        db_pool,
        storage,
        image_generator,
        text_generator,
        mailer,
    ));

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app).await?;

    Ok(())
}
