use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use figment::providers::Format;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use phonebook_core::{
    Contact, ContactDraft, Directory, DirectoryConfig, DirectoryError, StorageConfig,
};

mod request_log;

// === Response Types ===

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Central response-mapping stage: every handler funnels its
/// `DirectoryError` through here.
struct ApiError(DirectoryError);

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            // Absent records answer with an empty body
            DirectoryError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            DirectoryError::NameMissing
            | DirectoryError::NumberMissing
            | DirectoryError::NameTaken
            | DirectoryError::MalformattedId => StatusCode::BAD_REQUEST,
            DirectoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// === App State ===

struct AppState {
    directory: Directory,
}

// === Handlers ===

async fn info_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let info = state.directory.info().await?;
    Ok(Html(format!(
        "<p>Phonebook has info for {} people</p><p>{}</p>",
        info.count,
        info.timestamp.to_rfc2822()
    )))
}

async fn list_persons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    Ok(Json(state.directory.list().await?))
}

async fn get_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(state.directory.get(&id).await?))
}

async fn create_person(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ContactDraft>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(state.directory.create(draft).await?))
}

async fn update_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<ContactDraft>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(state.directory.update(&id, draft).await?))
}

async fn delete_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.directory.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unknown_endpoint() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "unknown endpoint".to_string(),
        }),
    )
}

// === Router ===

fn app(state: Arc<AppState>, static_dir: &FsPath) -> Router {
    // Unmatched paths try the static build first, then report the endpoint
    // as unknown
    let static_files =
        ServeDir::new(static_dir).not_found_service(unknown_endpoint.into_service());

    Router::new()
        .route("/info", get(info_page))
        .route("/api/persons", get(list_persons).post(create_person))
        .route(
            "/api/persons/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(request_log::log_requests))
        .with_state(state)
}

// === Server Config ===

#[derive(Deserialize)]
struct ServerConfig {
    host: String,
    port: u16,
    static_dir: PathBuf,
    #[serde(flatten)]
    directory: DirectoryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            static_dir: PathBuf::from("build"),
            directory: DirectoryConfig::default(),
        }
    }
}

// === Main ===

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load config from environment and file
    let config: ServerConfig = figment::Figment::new()
        .merge(figment::providers::Env::prefixed("PHONEBOOK_").split("_"))
        .merge(figment::providers::Toml::file("phonebook.toml"))
        .extract()
        .unwrap_or_else(|e| {
            eprintln!("Config error: {}", e);
            eprintln!("Using defaults with environment variables");

            // Build config from individual env vars
            let storage = if let Ok(path) = std::env::var("PHONEBOOK_DATA_PATH") {
                StorageConfig::Document {
                    data_path: PathBuf::from(path),
                }
            } else {
                StorageConfig::default()
            };

            ServerConfig {
                host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3001),
                directory: DirectoryConfig { storage },
                ..Default::default()
            }
        });

    info!(
        "Starting phonebook server on {}:{}",
        config.host, config.port
    );

    // Initialize the directory
    let directory = Directory::new(&config.directory)?;
    let state = Arc::new(AppState { directory });

    let router = app(state, &config.static_dir);

    // Run server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Phonebook server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
