use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use std::path::PathBuf;
use std::sync::Arc;

use folio_core::{
    AuthProvider, CategoryFilter, ContentItem, ContentPatch, ContentStore, ContentType,
    MediaStore, NewContent, categories,
};
use folio_engine::ContentLibrary;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{self, require_admin};
use crate::media;
use crate::protocol::{AdminListQuery, ApiError, ProjectsQuery, VisibilityRequest};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared handler state. Libraries are owned here and handed to handlers by `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Visible items only, backs the public page
    pub public: Arc<ContentLibrary>,
    /// Every item, backs the admin dashboard
    pub admin: Arc<ContentLibrary>,
    pub auth: Arc<dyn AuthProvider>,
    pub media: Arc<dyn MediaStore>,
    pub read_only: bool,
}

pub struct FolioServer {
    pub state: AppState,
    pub media_root: PathBuf,
    pub max_upload_bytes: usize,
}

impl FolioServer {
    pub fn new(
        content: Arc<dyn ContentStore>,
        auth: Arc<dyn AuthProvider>,
        media: Arc<dyn MediaStore>,
        media_root: PathBuf,
    ) -> Self {
        let state = AppState {
            public: Arc::new(ContentLibrary::new(content.clone(), false)),
            admin: Arc::new(ContentLibrary::new(content, true)),
            auth,
            media,
            read_only: false,
        };

        Self {
            state,
            media_root,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.state.read_only = read_only;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Load both listings once so the public page has something to serve
    pub async fn warm(&self) {
        if let Err(e) = self.state.public.list(false).await {
            tracing::warn!("Initial public listing failed: {}", e);
        }
        if let Err(e) = self.state.admin.list(true).await {
            tracing::warn!("Initial admin listing failed: {}", e);
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(handle_info))
            // Public site
            .route("/api/content", get(api_public_content))
            .route("/api/projects", get(api_projects))
            .route("/api/categories", get(api_categories))
            // Auth
            .route("/api/auth/sign-up", post(auth::api_sign_up))
            .route("/api/auth/sign-in", post(auth::api_sign_in))
            .route("/api/auth/sign-out", post(auth::api_sign_out))
            .route("/api/auth/me", get(auth::api_me))
            // Admin
            .route(
                "/api/admin/content",
                get(api_admin_list).post(api_admin_create),
            )
            .route(
                "/api/admin/content/:id",
                patch(api_admin_update).delete(api_admin_delete),
            )
            .route("/api/admin/content/:id/visibility", put(api_admin_visibility))
            .route(
                "/api/admin/media",
                post(media::api_upload).layer(DefaultBodyLimit::max(self.max_upload_bytes)),
            )
            .nest_service("/media", ServeDir::new(&self.media_root))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    pub async fn serve(self, host: &str, port: u16) -> anyhow::Result<()> {
        self.warm().await;
        let app = self.router();

        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        info!("folio server listening on {}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// GET handler for server info/health check
async fn handle_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "folio",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// Public site
// ============================================================================

/// GET /api/content - Visible items, newest first, read fresh from the store
async fn api_public_content(State(state): State<AppState>) -> Result<Response, ApiError> {
    let items = state.public.list(false).await?;
    Ok(Json(items).into_response())
}

/// GET /api/projects?category= - Project cards for the selected tab
async fn api_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectsQuery>,
) -> Result<Response, ApiError> {
    let filter = match query.category.as_deref() {
        Some(category) => category.parse::<CategoryFilter>()?,
        None => CategoryFilter::All,
    };
    state.public.list(false).await?;
    Ok(Json(state.public.projects(filter).await).into_response())
}

/// GET /api/categories - Filter tabs
async fn api_categories() -> Response {
    Json(categories()).into_response()
}

// ============================================================================
// Admin content management
// ============================================================================

fn ensure_writable(state: &AppState) -> Result<(), ApiError> {
    if state.read_only {
        return Err(ApiError::read_only());
    }
    Ok(())
}

/// Keep the public listing in step with admin writes. Failures are logged by the library.
async fn sync_public(state: &AppState) {
    let _ = state.public.refresh().await;
}

/// GET /api/admin/content?type= - All items including hidden ones
async fn api_admin_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AdminListQuery>,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers).await?;

    let items = state.admin.list(true).await?;
    let items: Vec<ContentItem> = match query.content_type.as_deref() {
        Some(raw) => {
            let content_type: ContentType = raw.parse()?;
            items
                .into_iter()
                .filter(|item| item.content_type == content_type)
                .collect()
        }
        None => items,
    };
    Ok(Json(items).into_response())
}

/// POST /api/admin/content - Create an item
async fn api_admin_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewContent>, JsonRejection>,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers).await?;
    ensure_writable(&state)?;
    let Json(req) = payload?;

    let item = state.admin.create(req).await?;
    sync_public(&state).await;

    Ok((StatusCode::CREATED, Json(item)).into_response())
}

/// PATCH /api/admin/content/:id - Partial update
async fn api_admin_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<ContentPatch>, JsonRejection>,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers).await?;
    ensure_writable(&state)?;
    let Json(req) = payload?;

    let item = state.admin.update(&id, req).await?;
    sync_public(&state).await;

    Ok(Json(item).into_response())
}

/// PUT /api/admin/content/:id/visibility - Show or hide an item
async fn api_admin_visibility(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<VisibilityRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers).await?;
    ensure_writable(&state)?;
    let Json(req) = payload?;

    let item = state.admin.toggle_visibility(&id, req.is_visible).await?;
    sync_public(&state).await;

    Ok(Json(item).into_response())
}

/// DELETE /api/admin/content/:id - Permanent removal
async fn api_admin_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers).await?;
    ensure_writable(&state)?;

    state.admin.delete(&id).await?;
    sync_public(&state).await;

    Ok(Json(serde_json::json!({
        "message": format!("Content '{}' deleted", id)
    }))
    .into_response())
}
