pub const PLAYERS_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS players (
        user_id        INTEGER     PRIMARY KEY,
        username       TEXT,

        clicks         INTEGER     DEFAULT 0,
        totalClicks    INTEGER     DEFAULT 0,
        level          INTEGER     DEFAULT 1,
        clickPower     INTEGER     DEFAULT 1,
        autoClickers   INTEGER     DEFAULT 0,
        coins          INTEGER     DEFAULT 0
    )";

pub const PLAYERS_LEADERBOARD_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS players_total_clicks
        ON players (totalClicks DESC, user_id ASC)";
