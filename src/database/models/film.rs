use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{decode_uuid_list, encode_uuid_list};

/// Genres the films menu can filter on directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Genre {
    Action,
    Comedy,
}

impl Genre {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "action",
            Genre::Comedy => "comedy",
        }
    }
}

/// Film selection used by list queries.
#[derive(Debug, Clone, PartialEq)]
pub enum FilmFilter {
    /// Empty filter, every film in store order.
    All,
    ByType(String),
    ByUuids(Vec<String>),
}

impl FilmFilter {
    pub fn by_genre(genre: Genre) -> Self {
        FilmFilter::ByType(genre.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub cinemas: Vec<String>,
}

#[derive(Debug, FromRow)]
struct FilmRow {
    uuid: String,
    name: String,
    #[sqlx(rename = "type")]
    kind: String,
    year: Option<i64>,
    rate: Option<f64>,
    length: Option<String>,
    country: Option<String>,
    link: Option<String>,
    picture: Option<String>,
    cinemas: String,
}

impl TryFrom<FilmRow> for Film {
    type Error = sqlx::Error;

    fn try_from(row: FilmRow) -> Result<Self, Self::Error> {
        Ok(Film {
            cinemas: decode_uuid_list(&row.cinemas)?,
            uuid: row.uuid,
            name: row.name,
            kind: row.kind,
            year: row.year,
            rate: row.rate,
            length: row.length,
            country: row.country,
            link: row.link,
            picture: row.picture,
        })
    }
}

const FILM_COLUMNS: &str =
    "uuid, name, type, year, rate, length, country, link, picture, cinemas";

impl Film {
    /// Creates a film with only the required attributes set.
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Result<Self> {
        let film = Film {
            uuid: uuid.into(),
            name: name.into(),
            kind: kind.into(),
            year: None,
            rate: None,
            length: None,
            country: None,
            link: None,
            picture: None,
            cinemas: Vec::new(),
        };
        film.validate()?;
        Ok(film)
    }

    /// Checks the attributes the store requires.
    pub fn validate(&self) -> Result<()> {
        if self.uuid.trim().is_empty() {
            return Err(anyhow!("Film uuid is required"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("Film name is required (uuid {})", self.uuid));
        }
        if self.kind.trim().is_empty() {
            return Err(anyhow!("Film type is required (uuid {})", self.uuid));
        }
        Ok(())
    }

    pub async fn find(
        pool: &sqlx::SqlitePool,
        filter: &FilmFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = match filter {
            FilmFilter::All => {
                sqlx::query_as::<_, FilmRow>(&format!(
                    "SELECT {FILM_COLUMNS} FROM films ORDER BY id"
                ))
                .fetch_all(pool)
                .await?
            }
            FilmFilter::ByType(kind) => {
                sqlx::query_as::<_, FilmRow>(&format!(
                    "SELECT {FILM_COLUMNS} FROM films WHERE type = ? ORDER BY id"
                ))
                .bind(kind)
                .fetch_all(pool)
                .await?
            }
            FilmFilter::ByUuids(uuids) => {
                if uuids.is_empty() {
                    return Ok(Vec::new());
                }

                let placeholders = uuids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
                let query = format!(
                    "SELECT {FILM_COLUMNS} FROM films WHERE uuid IN ({placeholders}) ORDER BY id"
                );

                let mut query_builder = sqlx::query_as::<_, FilmRow>(&query);
                for uuid in uuids {
                    query_builder = query_builder.bind(uuid);
                }
                query_builder.fetch_all(pool).await?
            }
        };

        rows.into_iter().map(Film::try_from).collect()
    }

    pub async fn find_by_uuid(
        pool: &sqlx::SqlitePool,
        uuid: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, FilmRow>(&format!(
            "SELECT {FILM_COLUMNS} FROM films WHERE uuid = ?"
        ))
        .bind(uuid)
        .fetch_optional(pool)
        .await?
        .map(Film::try_from)
        .transpose()
    }

    /// Inserts the film or replaces the attributes of the film with the same uuid.
    pub async fn upsert(pool: &sqlx::SqlitePool, film: &Film) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO films (uuid, name, type, year, rate, length, country, link, picture, cinemas)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(uuid) DO UPDATE SET
                name = excluded.name,
                type = excluded.type,
                year = excluded.year,
                rate = excluded.rate,
                length = excluded.length,
                country = excluded.country,
                link = excluded.link,
                picture = excluded.picture,
                cinemas = excluded.cinemas
            "#,
        )
        .bind(&film.uuid)
        .bind(&film.name)
        .bind(&film.kind)
        .bind(film.year)
        .bind(film.rate)
        .bind(&film.length)
        .bind(&film.country)
        .bind(&film.link)
        .bind(&film.picture)
        .bind(encode_uuid_list(&film.cinemas)?)
        .execute(pool)
        .await?;

        Self::find_by_uuid(pool, &film.uuid)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM films")
            .fetch_one(pool)
            .await
    }
}
