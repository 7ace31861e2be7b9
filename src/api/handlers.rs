use axum::{Json, body::Bytes, extract::State};
use serde::{Serialize, de::DeserializeOwned};

use std::sync::Arc;

use crate::{
    api::{ApiError, AppState},
    gamedb::{DBResult, GameDb},
    models::{self, LeaderboardEntry, LoadRequest, PlayerRecord, RawUserId, SaveRequest},
};

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub success: bool,
    pub state: Option<PlayerRecord>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// `POST /api/load`: returns the player's saved state, or `null` if they have
/// never saved.
pub async fn load(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoadResponse>, ApiError> {
    let request: LoadRequest = parse_body(&body)?;
    let user_id = require_user_id(request.user_id)?;

    let player = with_db(&state.db, "load", move |db| db.query_player(user_id)).await?;
    log::trace!("[load] Player {user_id} {}", if player.is_some() { "found" } else { "not found" });

    Ok(Json(LoadResponse { success: true, state: player }))
}

/// `POST /api/save`: replaces the player's row with the supplied state.
pub async fn save(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SaveResponse>, ApiError> {
    let request: SaveRequest = parse_body(&body)?;
    let user_id = require_user_id(request.user_id)?;
    let player_state = request.state.ok_or(ApiError::MissingField("state"))?;

    let player = PlayerRecord::from_state(user_id, request.username.unwrap_or_default(), player_state);
    with_db(&state.db, "save", move |db| db.replace_player(&player)).await?;
    log::trace!("[save] Saved player {user_id}");

    Ok(Json(SaveResponse { success: true }))
}

/// `GET /api/leaderboard`: the top players by lifetime clicks.
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let leaderboard = with_db(&state.db, "leaderboard", |db| {
        db.query_top_by_total_clicks(models::LEADERBOARD_SIZE)
    })
    .await?;

    Ok(Json(LeaderboardResponse { success: true, leaderboard }))
}

/// Decodes a JSON body. An empty body reads as `{}`, so it is reported as a
/// missing field rather than a syntax error.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) { b"{}".as_slice() } else { body };
    Ok(serde_json::from_slice(body)?)
}

/// Absent, `null`, `0` and `""` all count as no id at all.
fn require_user_id(raw: Option<RawUserId>) -> Result<i64, ApiError> {
    let missing = ApiError::MissingField("user_id");

    match raw {
        None | Some(RawUserId::Number(0)) => Err(missing),
        Some(RawUserId::Number(id)) => Ok(id),
        Some(RawUserId::Text(text)) => match text.trim() {
            "" => Err(missing),
            trimmed => match trimmed.parse::<i64>() {
                Ok(0) => Err(missing),
                Ok(id) => Ok(id),
                Err(_) => Err(ApiError::InvalidUserId(text)),
            },
        },
    }
}

/// Runs one blocking database call off the async workers.
async fn with_db<T, F>(db: &Arc<GameDb>, operation: &'static str, query: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&GameDb) -> DBResult<T> + Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || query(&db))
        .await?
        .map_err(|source| ApiError::Store { operation, source })
}
