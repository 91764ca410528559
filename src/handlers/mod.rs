/// HTTP request handlers
use crate::domain::{ApodPayload, Health, MediaRecord};
use crate::errors::{ApiError, ApiResult};
use crate::relay::{Relay, ViewerChannel};
use crate::services::ApodService;
use crate::utils::selector_from_query;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub apod_service: Arc<ApodService>,
    pub relay: Arc<Relay>,
    pub public_dir: Arc<PathBuf>,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

#[derive(Serialize)]
pub struct DataBody<T: Serialize> {
    pub data: T,
}

#[derive(Serialize)]
pub struct FactBody {
    pub fact: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApodQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Today's record, a given `date`, or a `start_date`..`end_date` range
pub async fn get_apod(
    State(state): State<AppState>,
    Query(query): Query<ApodQuery>,
) -> Result<Json<SuccessResponse<DataBody<ApodPayload>>>, ApiError> {
    let selector = selector_from_query(
        query.date.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
    )?;

    let service = state.apod_service.clone();
    let data = detached(async move { service.fetch_apod(selector).await })
        .await
        .inspect_err(|e| error!("Error fetching APOD: {}", e))?;

    Ok(Json(SuccessResponse::new(DataBody { data })))
}

/// Trailing seven days, newest first
pub async fn get_recent(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<DataBody<Vec<MediaRecord>>>>, ApiError> {
    let today = Utc::now().date_naive();
    let service = state.apod_service.clone();
    let data = detached(async move { service.fetch_recent(today).await })
        .await
        .inspect_err(|e| error!("Error fetching recent photos: {}", e))?;

    Ok(Json(SuccessResponse::new(DataBody { data })))
}

pub async fn get_fact(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<FactBody>>, ApiError> {
    let service = state.apod_service.clone();
    let fact = detached(async move { service.random_fact().await }).await?;
    Ok(Json(SuccessResponse::new(FactBody { fact })))
}

/// Run fetch-and-broadcast on its own task, so a viewer that hangs up
/// mid-request does not cancel the upstream call or the push.
async fn detached<T, F>(work: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| ApiError::Internal(format!("request task failed: {e}")))?
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "healthy",
        timestamp: Utc::now(),
        connected_clients: state.relay.connected_count().await,
    })
}

/// The page connects to its own origin, so `/` is both the page and the socket
pub async fn index_or_upgrade(
    ws: Option<WebSocketUpgrade>,
    State(state): State<AppState>,
) -> Response {
    match ws {
        Some(ws) => upgrade(ws, state.relay),
        None => index(&state.public_dir).await,
    }
}

pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    upgrade(ws, state.relay)
}

fn upgrade(ws: WebSocketUpgrade, relay: Arc<Relay>) -> Response {
    ws.on_upgrade(move |socket| viewer_session(socket, relay))
}

async fn index(public_dir: &Path) -> Response {
    match tokio::fs::read_to_string(public_dir.join("index.html")).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!("index.html unavailable in {}: {}", public_dir.display(), e);
            (StatusCode::NOT_FOUND, "index.html not found").into_response()
        }
    }
}

/// Lifecycle of one viewer connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Open,
    Closed,
}

/// Serve one viewer: forward relay events out, watch for the peer going away.
/// Inbound data frames are ignored.
async fn viewer_session(mut socket: WebSocket, relay: Arc<Relay>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = relay.register(ViewerChannel::new(tx)).await;

    let mut state = ChannelState::Open;
    while state == ChannelState::Open {
        state = tokio::select! {
            outbound = rx.recv() => match outbound {
                Some(text) => after_send(socket.send(Message::Text(text)).await),
                None => ChannelState::Closed,
            },
            inbound = socket.recv() => after_receive(inbound),
        };
    }

    relay.unregister(id).await;
}

fn after_send(result: Result<(), axum::Error>) -> ChannelState {
    match result {
        Ok(()) => ChannelState::Open,
        Err(e) => {
            warn!("WebSocket send failed: {}", e);
            ChannelState::Closed
        }
    }
}

fn after_receive(frame: Option<Result<Message, axum::Error>>) -> ChannelState {
    match frame {
        None | Some(Ok(Message::Close(_))) => ChannelState::Closed,
        Some(Err(e)) => {
            warn!("WebSocket error: {}", e);
            ChannelState::Closed
        }
        Some(Ok(_)) => ChannelState::Open,
    }
}
