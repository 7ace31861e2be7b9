use serde::{Deserialize, Serialize};

/// Number of rows the leaderboard returns.
pub const LEADERBOARD_SIZE: usize = 10;

/// A player's persisted progress. One row of the `players` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub user_id: i64,
    pub username: String,

    pub clicks: i64,
    #[serde(rename = "totalClicks")]
    pub total_clicks: i64,
    pub level: i64,
    #[serde(rename = "clickPower")]
    pub click_power: i64,
    #[serde(rename = "autoClickers")]
    pub auto_clickers: i64,
    pub coins: i64,
}

impl PlayerRecord {
    pub fn from_state(user_id: i64, username: String, state: PlayerState) -> Self {
        Self {
            user_id,
            username,
            clicks: state.clicks,
            total_clicks: state.total_clicks,
            level: state.level,
            click_power: state.click_power,
            auto_clickers: state.auto_clickers,
            coins: state.coins,
        }
    }
}

impl std::fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Player {} ({:?}): clicks={} total={} level={} power={} auto={} coins={}",
            self.user_id, self.username, self.clicks, self.total_clicks,
            self.level, self.click_power, self.auto_clickers, self.coins
        )
    }
}

/// The mutable part of a player's progress, as sent by the client on save.
///
/// Sub-fields the client leaves out take the column defaults of the
/// `players` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub clicks: i64,
    #[serde(rename = "totalClicks")]
    pub total_clicks: i64,
    pub level: i64,
    #[serde(rename = "clickPower")]
    pub click_power: i64,
    #[serde(rename = "autoClickers")]
    pub auto_clickers: i64,
    pub coins: i64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            clicks: 0,
            total_clicks: 0,
            level: 1,
            click_power: 1,
            auto_clickers: 0,
            coins: 0,
        }
    }
}

/// A ranked row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub username: String,
    #[serde(rename = "totalClicks")]
    pub total_clicks: i64,
}

/// A user id as it arrives over the wire. Clients send either a number or a
/// string of digits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawUserId {
    Number(i64),
    Text(String),
}

/// Body of `POST /api/load`.
#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    #[serde(default)]
    pub user_id: Option<RawUserId>,
}

/// Body of `POST /api/save`.
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub user_id: Option<RawUserId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub state: Option<PlayerState>,
}
