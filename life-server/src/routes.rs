//! HTTP route handlers for the board API.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use life::board::LifeError;
use life::core::types::{BoardId, BoardState, Grid};

use crate::state::AppState;
use crate::view::render_board;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/board", post(create_board))
        .route("/board/{id}", get(get_board))
        .route("/board/{id}/final", get(get_final_board))
}

/// JSON error body: `{"error": "<message>"}`.
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

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "not found".to_string(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<LifeError> for ApiError {
    fn from(err: LifeError) -> Self {
        match err {
            LifeError::NotFound(_) => Self::not_found(),
            err @ LifeError::Persistence { .. } => {
                warn!(error = %err, "board persistence failed");
                Self::internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Deserialize)]
struct CreateBoardRequest {
    cells: Option<Grid>,
}

#[derive(Serialize)]
struct CreateBoardResponse {
    id: BoardId,
}

/// POST /board - store a new board at generation 0.
async fn create_board(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateBoardResponse>), ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("missing body"));
    }
    // A `null` document carries no cells, same as `{}`.
    let request: Option<CreateBoardRequest> =
        serde_json::from_slice(&body).map_err(|err| ApiError::bad_request(err.to_string()))?;

    let cells = match request.and_then(|request| request.cells) {
        None => return Err(ApiError::bad_request("missing cells")),
        Some(cells) if cells.is_empty() => return Err(ApiError::bad_request("empty cells")),
        Some(cells) => cells,
    };

    let boards = state.boards.clone();
    let id = run_blocking(move || boards.create(cells)).await?;
    Ok((StatusCode::CREATED, Json(CreateBoardResponse { id })))
}

#[derive(Deserialize)]
struct BoardQuery {
    state: Option<String>,
}

/// GET /board/{id}?state=K - advance up to K steps and return the board.
async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    show_board(state, &id, query, &headers, false).await
}

/// GET /board/{id}/final?state=K - like `get_board`, but the board must be
/// final after advancing.
async fn get_final_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    show_board(state, &id, query, &headers, true).await
}

async fn show_board(
    state: AppState,
    raw_id: &str,
    query: BoardQuery,
    headers: &HeaderMap,
    require_final: bool,
) -> Result<Response, ApiError> {
    let id = parse_board_id(raw_id)?;
    let steps = requested_steps(query.state.as_deref(), state.max_steps)?;

    if require_final && steps < 1 {
        return Err(ApiError::bad_request("state must be greater than 0"));
    }

    let boards = state.boards.clone();
    let board = run_blocking(move || boards.advance(id, steps)).await?;

    if require_final && !board.is_final {
        return Err(ApiError::bad_request("final state not reached"));
    }

    if wants_html(headers) {
        let page = render_board(&board).map_err(|err| ApiError::internal(format!("{err:#}")))?;
        return Ok(Html(page).into_response());
    }
    Ok(Json::<BoardState>(board).into_response())
}

/// Parse a path id. Negative integers are well-formed but can never name a
/// board, so they resolve to not found without a store lookup.
fn parse_board_id(raw: &str) -> Result<BoardId, ApiError> {
    let requested = raw
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request("invalid id"))?;
    u64::try_from(requested)
        .map(BoardId)
        .map_err(|_| ApiError::not_found())
}

/// Parse the `state` query value into a step count in `[0, max_steps]`.
///
/// Absent means 0. Negative values clamp to 0.
fn requested_steps(raw: Option<&str>, max_steps: u64) -> Result<u64, ApiError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    let requested = raw
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request("invalid state"))?;
    Ok(u64::try_from(requested).unwrap_or(0).min(max_steps))
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Run a store-backed board operation off the async executor.
async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, LifeError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|err| ApiError::internal(err.to_string()))?
        .map_err(ApiError::from)
}
