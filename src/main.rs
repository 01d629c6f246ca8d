use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use carousel_studio::app::{build_router, AppState};
use carousel_studio::conversion::generator::{OpenAiCompatibleGenerator, TextGenerator};
use carousel_studio::db::category_repository::{CategoryRepository, MongoCategoryRepository};
use carousel_studio::db::content_repository::{ContentRepository, MongoContentRepository};
use carousel_studio::rendering::renderer::SlideRenderer;
use carousel_studio::seeder::seed_category_profiles;
use carousel_studio::settings::Settings;
use carousel_studio::storage::client::{S3StorageClient, StorageClient};

#[derive(Debug, Parser)]
#[command(name = "carousel-studio", version, about = "Carousel and video slide studio server")]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carousel_studio=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    tracing::info!("Starting Carousel Studio server...");

    // Connect to MongoDB
    let mongo_client = mongodb::Client::with_uri_str(&settings.mongodb.uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let mongo_db = mongo_client.database(&settings.mongodb.database);
    let content_repo: Arc<dyn ContentRepository> =
        Arc::new(MongoContentRepository::new(&mongo_db));
    let category_repo: Arc<dyn CategoryRepository> =
        Arc::new(MongoCategoryRepository::new(&mongo_db));

    tracing::info!("Connected to MongoDB at {}", settings.mongodb.uri);

    // Render storage is optional
    let storage_client: Option<Arc<dyn StorageClient>> = match &settings.storage {
        Some(storage) => {
            tracing::info!("S3 render storage enabled (bucket '{}')", storage.bucket);
            Some(Arc::new(S3StorageClient::from_settings(storage).await))
        }
        None => {
            tracing::warn!("No [storage] section configured, render uploads are disabled");
            None
        }
    };

    let generator: Arc<dyn TextGenerator> = Arc::new(
        OpenAiCompatibleGenerator::new(&settings.ai).context("Failed to build AI client")?,
    );
    tracing::info!(
        "AI generation via {} (model {})",
        settings.ai.base_url,
        settings.ai.model
    );

    let renderer = Arc::new(SlideRenderer::new().context("Failed to load slide templates")?);

    if settings.server.seed_categories {
        seed_category_profiles(category_repo.as_ref()).await;
    }

    let app_state = AppState {
        content_repo,
        category_repo,
        storage_client,
        generator,
        renderer,
        public_base_url: settings
            .storage
            .as_ref()
            .and_then(|s| s.public_base_url.clone()),
    };

    let app = build_router(app_state, settings.server.static_dir.as_deref());

    // Start the server
    tracing::info!("Listening on http://{}", settings.server.bind);
    let listener = tokio::net::TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.bind))?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
