use crate::{gamedb::{DBResult, GameDb}, models};

/////*============== PLAYER QUERIES ==============*/
impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::PlayerRecord {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        // Older rows may hold NULL where a client left a field out.
        let defaults = models::PlayerState::default();
        let column = |name: &str, default: i64| -> rusqlite::Result<i64> {
            Ok(row.get::<_, Option<i64>>(name)?.unwrap_or(default))
        };

        Ok(Self {
            user_id: row.get("user_id")?,
            username: row.get::<_, Option<String>>("username")?.unwrap_or_default(),

            clicks: column("clicks", defaults.clicks)?,
            total_clicks: column("totalClicks", defaults.total_clicks)?,
            level: column("level", defaults.level)?,
            click_power: column("clickPower", defaults.click_power)?,
            auto_clickers: column("autoClickers", defaults.auto_clickers)?,
            coins: column("coins", defaults.coins)?,
        })
    }
}

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::LeaderboardEntry {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            user_id: row.get("user_id")?,
            username: row.get::<_, Option<String>>("username")?.unwrap_or_default(),
            total_clicks: row.get::<_, Option<i64>>("totalClicks")?
                .unwrap_or(models::PlayerState::default().total_clicks),
        })
    }
}

impl GameDb {
    /// Returns the player with id `user_id`, if they have ever saved.
    pub fn query_player(&self, user_id: i64) -> DBResult<Option<models::PlayerRecord>> {
        log::trace!("[query_player] Querying player {user_id}...");
        let connection = self.connect();

        connection
            .prepare("SELECT * FROM players WHERE user_id = :user_id")?
            .query(rusqlite::named_params! { ":user_id": user_id })?
            .next()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Writes `player` as the whole of that user's row.
    ///
    /// Inserts the row if the user is new; otherwise every non-key column is
    /// overwritten with the supplied value. Nothing from the old row survives.
    pub fn replace_player(&self, player: &models::PlayerRecord) -> DBResult<()> {
        log::trace!("[replace_player] Saving player {}...", player.user_id);
        let connection = self.connect();

        let query_params = rusqlite::named_params! {
                ":user_id":       player.user_id,
                ":username":      player.username,
                ":clicks":        player.clicks,
                ":total_clicks":  player.total_clicks,
                ":level":         player.level,
                ":click_power":   player.click_power,
                ":auto_clickers": player.auto_clickers,
                ":coins":         player.coins,
        };

        connection
            .prepare(
                "INSERT INTO players ( user_id,  username,  clicks,  totalClicks,
                                       level,  clickPower,  autoClickers,  coins)
                 VALUES              (:user_id, :username, :clicks, :total_clicks,
                                      :level, :click_power, :auto_clickers, :coins)
                 ON CONFLICT(user_id) DO UPDATE SET
                    username     = excluded.username,
                    clicks       = excluded.clicks,
                    totalClicks  = excluded.totalClicks,
                    level        = excluded.level,
                    clickPower   = excluded.clickPower,
                    autoClickers = excluded.autoClickers,
                    coins        = excluded.coins",
            )?
            .execute(query_params)?;

        Ok(())
    }

    /// Gathers up to `limit` players, highest `totalClicks` first.
    /// Ties are ordered by ascending user id.
    pub fn query_top_by_total_clicks(&self, limit: usize) -> DBResult<Vec<models::LeaderboardEntry>> {
        log::trace!("[query_top_by_total_clicks] Querying top {limit} players.");
        let connection = self.connect();

        let mut stmt = connection.prepare(
            "SELECT user_id, username, totalClicks
             FROM players
             ORDER BY totalClicks DESC, user_id ASC
             LIMIT :limit",
        )?;

        let entries = stmt
            .query_map(rusqlite::named_params! { ":limit": limit as i64 },
                       |row| models::LeaderboardEntry::try_from(row))?
            .collect::<DBResult<Vec<models::LeaderboardEntry>>>()?;

        Ok(entries)
    }

    /// Number of players with a saved row.
    pub fn count_players(&self) -> DBResult<usize> {
        let connection = self.connect();
        connection
            .prepare("SELECT COUNT(*) FROM players")?
            .query_row([], |row| row.get::<_, i64>(0))
            .map(|count| count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerRecord, PlayerState};

    fn player(user_id: i64, username: &str, total_clicks: i64) -> PlayerRecord {
        PlayerRecord::from_state(
            user_id,
            username.to_string(),
            PlayerState { total_clicks, ..PlayerState::default() },
        )
    }

    #[test]
    fn unknown_player_is_absent() {
        let db = GameDb::open_in_memory().unwrap();
        assert_eq!(db.query_player(7).unwrap(), None);
    }

    #[test]
    fn replace_then_query_returns_same_record() {
        let db = GameDb::open_in_memory().unwrap();
        let alice = PlayerRecord {
            user_id: 1,
            username: "alice".to_string(),
            clicks: 5,
            total_clicks: 100,
            level: 2,
            click_power: 3,
            auto_clickers: 1,
            coins: 50,
        };

        db.replace_player(&alice).unwrap();

        assert_eq!(db.query_player(1).unwrap(), Some(alice));
    }

    #[test]
    fn replace_overwrites_every_field() {
        let db = GameDb::open_in_memory().unwrap();
        let first = PlayerRecord {
            user_id: 1,
            username: "alice".to_string(),
            clicks: 5,
            total_clicks: 100,
            level: 2,
            click_power: 3,
            auto_clickers: 1,
            coins: 50,
        };
        let second = PlayerRecord {
            user_id: 1,
            username: "".to_string(),
            clicks: 0,
            total_clicks: 50,
            level: 1,
            click_power: 1,
            auto_clickers: 0,
            coins: 7,
        };

        db.replace_player(&first).unwrap();
        db.replace_player(&second).unwrap();

        assert_eq!(db.query_player(1).unwrap(), Some(second));
        assert_eq!(db.count_players().unwrap(), 1);
    }

    #[test]
    fn leaderboard_is_sorted_descending() {
        let db = GameDb::open_in_memory().unwrap();
        db.replace_player(&player(1, "a", 300)).unwrap();
        db.replace_player(&player(2, "b", 100)).unwrap();
        db.replace_player(&player(3, "c", 500)).unwrap();

        let totals = db.query_top_by_total_clicks(10).unwrap()
            .into_iter()
            .map(|entry| entry.total_clicks)
            .collect::<Vec<_>>();

        assert_eq!(totals, vec![500, 300, 100]);
    }

    #[test]
    fn leaderboard_ties_are_broken_by_user_id() {
        let db = GameDb::open_in_memory().unwrap();
        db.replace_player(&player(9, "late", 40)).unwrap();
        db.replace_player(&player(4, "early", 40)).unwrap();

        let ids = db.query_top_by_total_clicks(10).unwrap()
            .into_iter()
            .map(|entry| entry.user_id)
            .collect::<Vec<_>>();

        assert_eq!(ids, vec![4, 9]);
    }

    #[test]
    fn leaderboard_respects_limit() {
        let db = GameDb::open_in_memory().unwrap();
        for id in 1..=15 {
            db.replace_player(&player(id, &format!("p{id}"), id * 10)).unwrap();
        }

        let top = db.query_top_by_total_clicks(models::LEADERBOARD_SIZE).unwrap();

        assert_eq!(top.len(), 10);
        assert_eq!(top[0].user_id, 15);
        assert_eq!(top[9].user_id, 6);
    }

    #[test]
    fn initialize_is_idempotent() {
        let db = GameDb::open_in_memory().unwrap();
        db.replace_player(&player(1, "a", 1)).unwrap();

        db.initialize().unwrap();

        assert_eq!(db.count_players().unwrap(), 1);
    }

    #[test]
    fn null_columns_read_as_defaults() {
        let db = GameDb::open_in_memory().unwrap();
        db.connect()
            .execute(
                "INSERT INTO players (user_id, username, clicks, totalClicks, level,
                                      clickPower, autoClickers, coins)
                 VALUES (2, NULL, NULL, NULL, NULL, NULL, NULL, 5)",
                [],
            )
            .unwrap();

        let expected = PlayerRecord {
            user_id: 2,
            username: "".to_string(),
            clicks: 0,
            total_clicks: 0,
            level: 1,
            click_power: 1,
            auto_clickers: 0,
            coins: 5,
        };
        assert_eq!(db.query_player(2).unwrap(), Some(expected));

        let top = db.query_top_by_total_clicks(10).unwrap();
        assert_eq!(top, vec![models::LeaderboardEntry {
            user_id: 2,
            username: "".to_string(),
            total_clicks: 0,
        }]);
    }

    #[test]
    fn close_releases_the_connection() {
        let db = GameDb::open_in_memory().unwrap();
        db.close().unwrap();
    }
}
