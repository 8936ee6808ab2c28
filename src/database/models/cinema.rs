use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{decode_uuid_list, encode_uuid_list};
use crate::utils::validation::validate_coordinates;

/// Cinema selection used by list queries.
#[derive(Debug, Clone, PartialEq)]
pub enum CinemaFilter {
    All,
    ByUuids(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cinema {
    pub uuid: String,
    pub name: String,
    pub url: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub films: Vec<String>,
}

#[derive(Debug, FromRow)]
struct CinemaRow {
    uuid: String,
    name: String,
    url: String,
    latitude: f64,
    longitude: f64,
    films: String,
}

impl TryFrom<CinemaRow> for Cinema {
    type Error = sqlx::Error;

    fn try_from(row: CinemaRow) -> Result<Self, Self::Error> {
        Ok(Cinema {
            films: decode_uuid_list(&row.films)?,
            uuid: row.uuid,
            name: row.name,
            url: row.url,
            location: GeoPoint {
                latitude: row.latitude,
                longitude: row.longitude,
            },
        })
    }
}

const CINEMA_COLUMNS: &str = "uuid, name, url, latitude, longitude, films";

impl Cinema {
    pub fn new(
        uuid: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        location: GeoPoint,
    ) -> Result<Self> {
        let cinema = Cinema {
            uuid: uuid.into(),
            name: name.into(),
            url: url.into(),
            location,
            films: Vec::new(),
        };
        cinema.validate()?;
        Ok(cinema)
    }

    pub fn validate(&self) -> Result<()> {
        if self.uuid.trim().is_empty() {
            return Err(anyhow!("Cinema uuid is required"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("Cinema name is required (uuid {})", self.uuid));
        }
        if self.url.trim().is_empty() {
            return Err(anyhow!("Cinema url is required (uuid {})", self.uuid));
        }
        validate_coordinates(self.location.latitude, self.location.longitude)
    }

    pub async fn find(
        pool: &sqlx::SqlitePool,
        filter: &CinemaFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = match filter {
            CinemaFilter::All => {
                sqlx::query_as::<_, CinemaRow>(&format!(
                    "SELECT {CINEMA_COLUMNS} FROM cinemas ORDER BY id"
                ))
                .fetch_all(pool)
                .await?
            }
            CinemaFilter::ByUuids(uuids) => {
                if uuids.is_empty() {
                    return Ok(Vec::new());
                }

                let placeholders = uuids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
                let query = format!(
                    "SELECT {CINEMA_COLUMNS} FROM cinemas WHERE uuid IN ({placeholders}) ORDER BY id"
                );

                let mut query_builder = sqlx::query_as::<_, CinemaRow>(&query);
                for uuid in uuids {
                    query_builder = query_builder.bind(uuid);
                }
                query_builder.fetch_all(pool).await?
            }
        };

        rows.into_iter().map(Cinema::try_from).collect()
    }

    pub async fn find_by_uuid(
        pool: &sqlx::SqlitePool,
        uuid: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CinemaRow>(&format!(
            "SELECT {CINEMA_COLUMNS} FROM cinemas WHERE uuid = ?"
        ))
        .bind(uuid)
        .fetch_optional(pool)
        .await?
        .map(Cinema::try_from)
        .transpose()
    }

    pub async fn upsert(pool: &sqlx::SqlitePool, cinema: &Cinema) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO cinemas (uuid, name, url, latitude, longitude, films)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(uuid) DO UPDATE SET
                name = excluded.name,
                url = excluded.url,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                films = excluded.films
            "#,
        )
        .bind(&cinema.uuid)
        .bind(&cinema.name)
        .bind(&cinema.url)
        .bind(cinema.location.latitude)
        .bind(cinema.location.longitude)
        .bind(encode_uuid_list(&cinema.films)?)
        .execute(pool)
        .await?;

        Self::find_by_uuid(pool, &cinema.uuid)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cinemas")
            .fetch_one(pool)
            .await
    }
}
