//! OAuth credential storage (single-row profile).

use chrono::Utc;
use rusqlite::Connection;
use tc_core::{Error, Result};

use crate::models::TokenSet;

const COLS: &str = "access_token, refresh_token, expiry, token_type, scope, updated_at";

/// Read the stored token set, if any.
pub fn get_tokens(conn: &Connection) -> Result<Option<TokenSet>> {
    let q = format!("SELECT {COLS} FROM profiles WHERE id = 1");
    let result = conn.query_row(&q, [], TokenSet::from_row);
    match result {
        Ok(tokens) => Ok(Some(tokens)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Store a token set, replacing any existing one.
///
/// Providers do not always return a refresh token on renewal; a `None`
/// refresh token keeps the previously stored one so the profile never loses
/// its ability to refresh.
pub fn upsert_tokens(
    conn: &Connection,
    access_token: &str,
    refresh_token: Option<&str>,
    expiry: Option<i64>,
    token_type: Option<&str>,
    scope: Option<&str>,
) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO profiles (id, access_token, refresh_token, expiry, token_type, scope, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            access_token = excluded.access_token,
            refresh_token = COALESCE(excluded.refresh_token, profiles.refresh_token),
            expiry = excluded.expiry,
            token_type = COALESCE(excluded.token_type, profiles.token_type),
            scope = COALESCE(excluded.scope, profiles.scope),
            updated_at = excluded.updated_at",
        rusqlite::params![access_token, refresh_token, expiry, token_type, scope, &now],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};

    #[test]
    fn no_tokens_initially() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        assert!(get_tokens(&conn).unwrap().is_none());
    }

    #[test]
    fn store_and_read_back() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        upsert_tokens(
            &conn,
            "access-1",
            Some("refresh-1"),
            Some(1_800_000_000),
            Some("Bearer"),
            Some("youtube.readonly"),
        )
        .unwrap();

        let tokens = get_tokens(&conn).unwrap().unwrap();
        assert_eq!(tokens.access_token, "access-1");
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(tokens.expiry, Some(1_800_000_000));
    }

    #[test]
    fn renewal_without_refresh_token_keeps_the_old_one() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        upsert_tokens(&conn, "access-1", Some("refresh-1"), Some(100), None, None).unwrap();
        upsert_tokens(&conn, "access-2", None, Some(200), None, None).unwrap();

        let tokens = get_tokens(&conn).unwrap().unwrap();
        assert_eq!(tokens.access_token, "access-2");
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(tokens.expiry, Some(200));
    }

    #[test]
    fn only_one_profile_row_exists() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        upsert_tokens(&conn, "a", None, None, None, None).unwrap();
        upsert_tokens(&conn, "b", None, None, None, None).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
