use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::api::content::resource_kind;
use crate::api::response::ApiResponse;
use crate::conversion::service::process_update_saved_urls;
use crate::db::content_repository::ContentRepository;
use crate::error::AppError;
use crate::models::content::ContentKind;
use crate::models::slides::{SavedUrls, VideoSlide};
use crate::storage::client::StorageClient;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";
const HASH_PREFIX_LEN: usize = 12;

/// Which saved URL of the slide the upload fills in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTarget {
    /// Screenshot of the video slide page.
    #[default]
    Image,
    /// Screenshot used as the slide background.
    Slide,
}

impl RenderTarget {
    fn as_str(&self) -> &'static str {
        match self {
            RenderTarget::Image => "image",
            RenderTarget::Slide => "slide",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderUpload {
    /// `data:image/png;base64,...`
    pub data_url: String,
    #[serde(default)]
    pub target: RenderTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderUploadResponse {
    pub key: String,
    pub url: String,
    pub slide: VideoSlide,
}

/// Decode a base64 PNG data URL.
pub fn decode_png_data_url(data_url: &str) -> Result<Vec<u8>, AppError> {
    let encoded = data_url
        .trim()
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| AppError::BadRequest("Expected a data:image/png;base64 URL".into()))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 image: {e}")))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("Image is empty".into()));
    }
    Ok(bytes)
}

/// `renders/{resource}/{id}/{index}-{target}-{hash}.png`
pub fn render_key(
    kind: ContentKind,
    id: &str,
    index: usize,
    target: RenderTarget,
    content: &[u8],
) -> String {
    let digest = Sha256::digest(content);
    let hash: String = digest
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(HASH_PREFIX_LEN)
        .collect();
    format!(
        "renders/{}/{}/{}-{}-{}.png",
        kind.resource(),
        id,
        index,
        target.as_str(),
        hash
    )
}

/// Public URL of a stored render: under the bucket's public base URL when
/// configured, proxied through this server otherwise.
pub fn render_url(public_base_url: Option<&str>, key: &str) -> Result<String, AppError> {
    match public_base_url {
        Some(base) => {
            let base = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{base}/")
            };
            let url = url::Url::parse(&base)
                .and_then(|base| base.join(key))
                .map_err(|e| AppError::Internal(format!("Invalid public_base_url: {e}")))?;
            Ok(url.to_string())
        }
        None => Ok(format!("/api/{key}")),
    }
}

/// Store a screenshot of a video slide and record its URL on the slide.
pub async fn process_upload_render(
    repo: &dyn ContentRepository,
    storage: Option<&dyn StorageClient>,
    public_base_url: Option<&str>,
    kind: ContentKind,
    id: &str,
    index: usize,
    upload: RenderUpload,
) -> Result<RenderUploadResponse, AppError> {
    let storage = storage
        .ok_or_else(|| AppError::Internal("Render storage is not configured".into()))?;

    let bytes = decode_png_data_url(&upload.data_url)?;

    let item = repo
        .find_by_id(kind, id)
        .await?
        .ok_or_else(|| AppError::content_not_found(kind, id))?;
    let count = item.video_slides.as_ref().map_or(0, Vec::len);
    if index >= count {
        return Err(AppError::NotFound(format!(
            "Video slide {} of {} '{}' not found ({} slides)",
            index, kind, id, count
        )));
    }

    let key = render_key(kind, id, index, upload.target, &bytes);
    let size = bytes.len();
    storage.put_object(&key, bytes, "image/png").await?;
    tracing::info!(%kind, id, index, key = %key, size, "Stored slide render");

    let url = render_url(public_base_url, &key)?;
    let urls = match upload.target {
        RenderTarget::Image => SavedUrls {
            saved_image_url: Some(url.clone()),
            saved_slide_url: None,
        },
        RenderTarget::Slide => SavedUrls {
            saved_image_url: None,
            saved_slide_url: Some(url.clone()),
        },
    };
    let slide = process_update_saved_urls(repo, kind, id, index, urls).await?;

    Ok(RenderUploadResponse { key, url, slide })
}

/// Axum handler for `POST /api/{resource}/{id}/video-slides/{index}/render`.
pub async fn upload_render_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path((resource, id, index)): axum::extract::Path<(String, String, usize)>,
    axum::Json(upload): axum::Json<RenderUpload>,
) -> Result<axum::Json<ApiResponse<RenderUploadResponse>>, AppError> {
    let kind = resource_kind(&resource)?;
    let response = process_upload_render(
        state.content_repo.as_ref(),
        state.storage_client.as_deref(),
        state.public_base_url.as_deref(),
        kind,
        &id,
        index,
        upload,
    )
    .await?;
    Ok(axum::Json(ApiResponse::ok(response)))
}

/// Axum handler for `GET /api/renders/{*key}`.
///
/// Serves a stored render from S3 storage.
pub async fn serve_render_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(key): axum::extract::Path<String>,
) -> Result<axum::response::Response, AppError> {
    use axum::response::IntoResponse;

    let storage = state
        .storage_client
        .as_deref()
        .ok_or_else(|| AppError::NotFound("Render storage is not configured".into()))?;

    if key.split('/').any(|segment| segment == "..") {
        return Err(AppError::BadRequest("Invalid render key".into()));
    }
    let s3_key = format!("renders/{}", key);

    let data = storage
        .get_object(&s3_key)
        .await?
        .ok_or_else(|| AppError::NotFound("Render not found".into()))?;

    // Infer content type from extension
    let content_type = if key.ends_with(".png") {
        "image/png"
    } else if key.ends_with(".jpg") || key.ends_with(".jpeg") {
        "image/jpeg"
    } else if key.ends_with(".webp") {
        "image/webp"
    } else {
        "application/octet-stream"
    };

    Ok(([(axum::http::header::CONTENT_TYPE, content_type)], data).into_response())
}
