use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{decode_uuid_list, encode_uuid_list};

/// Which branch a favourite toggle took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "telegramId")]
    pub telegram_id: i64,
    #[serde(default)]
    pub films: Vec<String>,
}

#[derive(Debug, FromRow)]
struct UserRow {
    telegram_id: i64,
    films: String,
}

impl TryFrom<UserRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            telegram_id: row.telegram_id,
            films: decode_uuid_list(&row.films)?,
        })
    }
}

impl User {
    /// First-time record created by a favourite toggle.
    pub fn with_favourite(telegram_id: i64, film_uuid: &str) -> Self {
        Self {
            telegram_id,
            films: vec![film_uuid.to_string()],
        }
    }

    pub fn is_favourite(&self, film_uuid: &str) -> bool {
        self.films.iter().any(|f| f == film_uuid)
    }

    /// Applies a toggle using the state claimed by the caller.
    ///
    /// A claimed favourite drops every occurrence of the film; otherwise the
    /// film is appended once and never duplicated.
    pub fn toggle_favourite(&mut self, film_uuid: &str, claimed_favourite: bool) -> ToggleOutcome {
        if claimed_favourite {
            self.films.retain(|f| f != film_uuid);
            ToggleOutcome::Removed
        } else {
            if !self.is_favourite(film_uuid) {
                self.films.push(film_uuid.to_string());
            }
            ToggleOutcome::Added
        }
    }

    pub async fn find_by_telegram_id(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>("SELECT telegram_id, films FROM users WHERE telegram_id = ?")
            .bind(telegram_id)
            .fetch_optional(pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn upsert(pool: &sqlx::SqlitePool, user: &User) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (telegram_id, films)
            VALUES (?, ?)
            ON CONFLICT(telegram_id) DO UPDATE SET films = excluded.films
            "#,
        )
        .bind(user.telegram_id)
        .bind(encode_uuid_list(&user.films)?)
        .execute(pool)
        .await?;

        Self::find_by_telegram_id(pool, user.telegram_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(films: &[&str]) -> User {
        User {
            telegram_id: 42,
            films: films.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_remove_drops_every_occurrence() {
        let mut u = user(&["a", "b", "a", "c", "a"]);
        let original_len = u.films.len();

        assert_eq!(u.toggle_favourite("a", true), ToggleOutcome::Removed);
        assert_eq!(u.films.len(), original_len - 3);
        assert_eq!(u.films, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_add_appends_missing_film() {
        let mut u = user(&["a"]);
        assert_eq!(u.toggle_favourite("b", false), ToggleOutcome::Added);
        assert_eq!(u.films, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_add_does_not_duplicate() {
        let mut u = user(&["a"]);
        assert_eq!(u.toggle_favourite("a", false), ToggleOutcome::Added);
        assert_eq!(u.films, vec!["a".to_string()]);
    }

    #[test]
    fn test_remove_of_absent_film_is_noop() {
        let mut u = user(&["a"]);
        assert_eq!(u.toggle_favourite("z", true), ToggleOutcome::Removed);
        assert_eq!(u.films, vec!["a".to_string()]);
    }

    #[test]
    fn test_with_favourite() {
        let u = User::with_favourite(7, "f1");
        assert_eq!(u.telegram_id, 7);
        assert_eq!(u.films, vec!["f1".to_string()]);
        assert!(u.is_favourite("f1"));
    }
}
