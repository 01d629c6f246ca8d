#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::minio::MinIO;
use testcontainers_modules::mongo::Mongo;

use carousel_studio::app::{build_router, AppState};
use carousel_studio::conversion::generator::TextGenerator;
use carousel_studio::db::category_repository::{CategoryRepository, MongoCategoryRepository};
use carousel_studio::db::content_repository::{ContentRepository, MongoContentRepository};
use carousel_studio::error::AppError;
use carousel_studio::models::content::ContentKind;
use carousel_studio::models::slides::{VideoSlide, VideoSlideType};
use carousel_studio::rendering::renderer::SlideRenderer;
use carousel_studio::storage::client::{S3StorageClient, StorageClient};

pub const RIDDLE_ANSWER: &str = r#"```json
[
  {"tipe_slide": "VIDEO_COVER", "title": "Teka-teki Jam"},
  {"tipe_slide": "VIDEO_QUESTION", "title": "Apa yang punya tangan tapi tidak bisa bertepuk?"},
  {"tipe_slide": "VIDEO_TRANSITION", "title": "Pikirkan dulu..."},
  {"tipe_slide": "VIDEO_ANSWER", "title": "Jam", "body": "Jarum jam disebut tangan"},
  {"tipe_slide": "VIDEO_CLOSING", "title": "Follow untuk teka-teki berikutnya!"}
]
```"#;

/// Text generator answering with a fixed text and counting its calls.
pub struct ScriptedGenerator {
    answer: Mutex<Result<String, String>>,
    calls: AtomicUsize,
    competing_write: Mutex<Option<CompetingWrite>>,
}

/// Video slides another writer stores while a generation is in flight.
struct CompetingWrite {
    repo: Arc<dyn ContentRepository>,
    kind: ContentKind,
    id: String,
}

impl ScriptedGenerator {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: Mutex::new(Ok(answer.to_string())),
            calls: AtomicUsize::new(0),
            competing_write: Mutex::new(None),
        }
    }

    pub fn answer_with(&self, answer: &str) {
        *self.answer.lock().unwrap() = Ok(answer.to_string());
    }

    /// Make every following call fail like an unreachable AI service.
    pub fn fail_with(&self, message: &str) {
        *self.answer.lock().unwrap() = Err(message.to_string());
    }

    /// During the next call, store a one-slide deck on the item as if a
    /// second generation finished first.
    pub fn store_slides_during_next_call(
        &self,
        repo: Arc<dyn ContentRepository>,
        kind: ContentKind,
        id: &str,
    ) {
        *self.competing_write.lock().unwrap() = Some(CompetingWrite {
            repo,
            kind,
            id: id.to_string(),
        });
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let competing = self.competing_write.lock().unwrap().take();
        if let Some(write) = competing {
            let current = write
                .repo
                .find_by_id(write.kind, &write.id)
                .await?
                .expect("Item should exist");
            write
                .repo
                .set_video_slides(
                    write.kind,
                    &write.id,
                    vec![VideoSlide::new(VideoSlideType::VideoCover, "first")],
                    current.video_slides_revision,
                    chrono::Utc::now(),
                )
                .await?;
        }

        self.answer
            .lock()
            .unwrap()
            .clone()
            .map_err(AppError::Upstream)
    }
}

/// Holds running containers and provides the Axum router for integration tests.
///
/// Containers are kept alive for as long as this struct lives. When dropped,
/// containers are stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    _minio: ContainerAsync<MinIO>,
    pub router: Router,
    pub content_repo: Arc<dyn ContentRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub storage: Arc<dyn StorageClient>,
    pub generator: Arc<ScriptedGenerator>,
}

impl TestEnv {
    /// Spin up all containers and build an Axum router wired to real services.
    pub async fn start() -> Self {
        // Start containers concurrently
        let (mongo_container, minio_container) =
            tokio::join!(Mongo::default().start(), MinIO::default().start());
        let mongo_container = mongo_container.expect("Failed to start MongoDB container");
        let minio_container = minio_container.expect("Failed to start MinIO container");

        // --- MongoDB ---
        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("carousel_studio_test");
        let content_repo: Arc<dyn ContentRepository> =
            Arc::new(MongoContentRepository::new(&mongo_db));
        let category_repo: Arc<dyn CategoryRepository> =
            Arc::new(MongoCategoryRepository::new(&mongo_db));

        // --- MinIO (S3) ---
        let minio_port = minio_container
            .get_host_port_ipv4(9000)
            .await
            .expect("Failed to get MinIO port");
        let minio_endpoint = format!("http://127.0.0.1:{}", minio_port);

        // Set env vars for AWS SDK to pick up MinIO credentials
        unsafe {
            std::env::set_var("AWS_ACCESS_KEY_ID", "minioadmin");
            std::env::set_var("AWS_SECRET_ACCESS_KEY", "minioadmin");
            std::env::set_var("AWS_REGION", "us-east-1");
        }

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .endpoint_url(&minio_endpoint)
            .region(aws_config::Region::new("us-east-1"))
            .load()
            .await;

        let s3_client = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::config::Builder::from(&s3_config)
                .force_path_style(true)
                .build(),
        );

        // Create test bucket
        let bucket_name = "carousel-renders-test";
        let _ = s3_client.create_bucket().bucket(bucket_name).send().await;

        let storage: Arc<dyn StorageClient> =
            Arc::new(S3StorageClient::new(s3_client, bucket_name.to_string()));

        let generator = Arc::new(ScriptedGenerator::new(RIDDLE_ANSWER));

        // --- Build AppState ---
        let app_state = AppState {
            content_repo: content_repo.clone(),
            category_repo: category_repo.clone(),
            storage_client: Some(storage.clone()),
            generator: generator.clone(),
            renderer: Arc::new(SlideRenderer::new().expect("Failed to load templates")),
            public_base_url: None,
        };

        let router = build_router(app_state, None);

        Self {
            _mongo: mongo_container,
            _minio: minio_container,
            router,
            content_repo,
            category_repo,
            storage,
            generator,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Helper: create a riddle through the form endpoint and return its id.
    pub async fn create_riddle(&self, server: &axum_test::TestServer, title: &str) -> String {
        let response = server
            .post("/api/generate-riddle")
            .json(&serde_json::json!({
                "title": title,
                "description": "Riddle tentang waktu",
                "riddle": "Apa yang punya tangan tapi tidak bisa bertepuk?",
                "solution": "Jam",
                "hint": "Ada di dinding",
                "hashtags": "#jam #waktu"
            }))
            .await;
        let body: serde_json::Value = response.json();
        body["data"]["_id"]
            .as_str()
            .expect("Response should contain the new id")
            .to_string()
    }

    /// Helper: create a topic through the form endpoint and return its id.
    pub async fn create_topic(&self, server: &axum_test::TestServer, title: &str) -> String {
        let response = server
            .post("/api/generate-topic")
            .json(&serde_json::json!({
                "title": title,
                "description": format!("Fakta tentang {title}"),
                "points": ["satu", "dua"]
            }))
            .await;
        let body: serde_json::Value = response.json();
        body["data"]["_id"]
            .as_str()
            .expect("Response should contain the new id")
            .to_string()
    }
}
