//! Catalog store seam.
//!
//! The router only talks to [`CatalogStore`]; [`DatabaseManager`] provides the
//! SQLite implementation used by the bot and the catalog tool.

use anyhow::Result;
use async_trait::async_trait;

use crate::database::connection::DatabaseManager;
use crate::database::models::*;
use crate::utils::logging::{log_database_error, log_database_operation};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Films matching the filter, in store order.
    async fn find_films(&self, filter: &FilmFilter) -> Result<Vec<Film>>;

    async fn find_film(&self, uuid: &str) -> Result<Option<Film>>;

    /// Cinemas matching the filter, in store order.
    async fn find_cinemas(&self, filter: &CinemaFilter) -> Result<Vec<Cinema>>;

    async fn find_cinema(&self, uuid: &str) -> Result<Option<Cinema>>;

    async fn find_user(&self, telegram_id: i64) -> Result<Option<User>>;

    /// Upserts by telegram id and returns the stored record.
    async fn save_user(&self, user: &User) -> Result<User>;

    /// Upserts by uuid; fails when a required attribute is missing.
    async fn save_film(&self, film: &Film) -> Result<Film>;

    /// Upserts by uuid; fails when a required attribute is missing.
    async fn save_cinema(&self, cinema: &Cinema) -> Result<Cinema>;
}

#[async_trait]
impl CatalogStore for DatabaseManager {
    async fn find_films(&self, filter: &FilmFilter) -> Result<Vec<Film>> {
        log_database_operation("SELECT", "films", Some(&format!("{filter:?}")));
        Film::find(&self.pool, filter).await.map_err(|e| {
            log_database_error("SELECT", "films", &e.to_string(), None);
            e.into()
        })
    }

    async fn find_film(&self, uuid: &str) -> Result<Option<Film>> {
        log_database_operation("SELECT", "films", Some(uuid));
        Ok(Film::find_by_uuid(&self.pool, uuid).await?)
    }

    async fn find_cinemas(&self, filter: &CinemaFilter) -> Result<Vec<Cinema>> {
        log_database_operation("SELECT", "cinemas", Some(&format!("{filter:?}")));
        Cinema::find(&self.pool, filter).await.map_err(|e| {
            log_database_error("SELECT", "cinemas", &e.to_string(), None);
            e.into()
        })
    }

    async fn find_cinema(&self, uuid: &str) -> Result<Option<Cinema>> {
        log_database_operation("SELECT", "cinemas", Some(uuid));
        Ok(Cinema::find_by_uuid(&self.pool, uuid).await?)
    }

    async fn find_user(&self, telegram_id: i64) -> Result<Option<User>> {
        log_database_operation("SELECT", "users", Some(&telegram_id.to_string()));
        Ok(User::find_by_telegram_id(&self.pool, telegram_id).await?)
    }

    async fn save_user(&self, user: &User) -> Result<User> {
        log_database_operation("UPSERT", "users", Some(&user.telegram_id.to_string()));
        Ok(User::upsert(&self.pool, user).await?)
    }

    async fn save_film(&self, film: &Film) -> Result<Film> {
        film.validate()?;
        log_database_operation("UPSERT", "films", Some(&film.uuid));
        Ok(Film::upsert(&self.pool, film).await?)
    }

    async fn save_cinema(&self, cinema: &Cinema) -> Result<Cinema> {
        cinema.validate()?;
        log_database_operation("UPSERT", "cinemas", Some(&cinema.uuid));
        Ok(Cinema::upsert(&self.pool, cinema).await?)
    }
}
