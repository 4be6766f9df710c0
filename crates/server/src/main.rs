//! # sheetviz-server
//!
//! HTTP front end: upload a spreadsheet, list and download its charts, and
//! follow new charts as server-sent events.

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sheetviz_viz::{
    safe_upload_name, BroadcastObserver, DirectoryWatcher, Pipeline, PipelineConfig, VizError,
    VizResult,
};
use std::convert::Infallible;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

const EVENT_CAPACITY: usize = 64;
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// sheetviz-server - spreadsheet upload and chart service
#[derive(Parser)]
#[command(name = "sheetviz-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:5000")]
    bind: String,

    /// YAML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for uploaded spreadsheets
    #[arg(long = "uploads", value_name = "DIR")]
    uploads: Option<PathBuf>,

    /// Directory for chart images
    #[arg(short = 'r', long = "results", value_name = "DIR")]
    results: Option<PathBuf>,

    /// Detect new charts by polling the result directory
    #[arg(short, long)]
    watch: bool,
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    events: BroadcastObserver,
}

impl AppState {
    /// With `watch` set, charts are announced by [`AppState::start_watcher`]
    /// instead of by the pipeline itself.
    pub fn new(config: PipelineConfig, watch: bool) -> VizResult<Self> {
        let events = BroadcastObserver::new(EVENT_CAPACITY);
        let mut pipeline = Pipeline::new(config)?;
        if !watch {
            pipeline = pipeline.with_observer(Arc::new(events.clone()));
        }
        Ok(Self {
            pipeline: Arc::new(pipeline),
            events,
        })
    }

    /// Poll the result directory and forward new charts to event subscribers.
    pub fn start_watcher(&self) -> VizResult<JoinHandle<()>> {
        let config = self.pipeline.config();
        let mut watcher = DirectoryWatcher::new(&config.result_dir, config.watch_interval());
        watcher.prime()?;
        Ok(watcher.spawn(Arc::new(self.events.clone())))
    }
}

/// JSON error body with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<VizError> for ApiError {
    fn from(err: VizError) -> Self {
        let status = match err {
            VizError::InvalidName(_) | VizError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Save the `file` field and run the pipeline on it.
///
/// The run happens on a blocking thread under the configured deadline. A run
/// that misses the deadline is not cancelled: the request fails with 500 but
/// the thread finishes in the background and its charts are still written
/// and announced.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ApiError::bad_request("Tên file không hợp lệ"));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        upload = Some((file_name, bytes));
        break;
    }
    let Some((file_name, bytes)) = upload else {
        return Err(ApiError::bad_request("Không có file được tải lên"));
    };

    let stored_name = safe_upload_name(&file_name);
    let pipeline = Arc::clone(&state.pipeline);
    let task = tokio::task::spawn_blocking(move || {
        let upload_dir = &pipeline.config().upload_dir;
        let path = save_upload(upload_dir, &stored_name, &bytes)
            .map_err(|e| format!("{}: {e}", upload_dir.join(&stored_name).display()))?;
        tracing::info!(file = %path.display(), bytes = bytes.len(), "upload saved");
        pipeline.run(&path).map_err(|e| e.to_string())
    });
    match tokio::time::timeout(state.pipeline.config().request_timeout(), task).await {
        Ok(Ok(Ok(report))) => Ok(Json(json!({
            "message": "Xử lý file thành công",
            "charts": report.chart_count(),
        }))),
        Ok(Ok(Err(e))) => {
            tracing::warn!(file = %file_name, error = %e, "processing failed");
            Err(ApiError::internal(e))
        }
        Ok(Err(e)) => Err(ApiError::internal(e.to_string())),
        Err(_) => {
            tracing::warn!(file = %file_name, "processing timed out");
            Err(ApiError::internal("processing timed out"))
        }
    }
}

/// Write an upload under `dir` through a temporary file, so concurrent
/// uploads with the same name replace each other whole.
fn save_upload(dir: &std::path::Path, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".upload")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(&path).map_err(|e| e.error)?;
    Ok(path)
}

/// Names of all charts in the result directory.
pub async fn list_charts(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let charts = state.pipeline.store().list()?;
    Ok(Json(json!({ "charts": charts })))
}

/// One chart image.
pub async fn chart(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.pipeline.store().fetch(&filename)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

fn update_event() -> Event {
    Event::default()
        .event("update")
        .data(json!({ "status": "new_data" }).to_string())
}

/// Stream one `update` event per new chart.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.events.subscribe();
    let stream = stream::unfold(receiver, |mut receiver| async move {
        match receiver.recv().await {
            Ok(_) => Some((Ok(update_event()), receiver)),
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "event subscriber lagged");
                Some((Ok(update_event()), receiver))
            }
            Err(RecvError::Closed) => None,
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/list_charts", get(list_charts))
        .route("/chart/:filename", get(chart))
        .route("/events", get(events))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

fn load_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(uploads) = &args.uploads {
        config.upload_dir.clone_from(uploads);
    }
    if let Some(results) = &args.results {
        config.result_dir.clone_from(results);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let state = AppState::new(config, args.watch).context("Failed to initialise pipeline")?;
    if args.watch {
        state
            .start_watcher()
            .context("Failed to watch result directory")?;
    }
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    tracing::info!(addr = %args.bind, watch = args.watch, "sheetviz-server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
