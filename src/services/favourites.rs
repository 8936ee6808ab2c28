//! Favourite film toggling.
//!
//! The favourite state comes from the callback payload the user pressed, not
//! from storage, so a stale button still decides between add and remove. The
//! read-modify-write of one user's record runs under a per-user lock.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use crate::database::models::{ToggleOutcome, User};
use crate::database::store::CatalogStore;

#[derive(Clone, Default)]
pub struct FavouriteService {
    locks: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl FavouriteService {
    pub fn new() -> Self {
        Self::default()
    }

    fn user_lock(&self, telegram_id: i64) -> Arc<AsyncMutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Drop locks nobody is holding or waiting on.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(telegram_id).or_default().clone()
    }

    /// Flips `film_uuid` in the user's favourites and persists the record.
    ///
    /// A user without a record gets one holding just `film_uuid`, whatever
    /// `claimed_favourite` says.
    pub async fn toggle<S: CatalogStore + ?Sized>(
        &self,
        store: &S,
        telegram_id: i64,
        film_uuid: &str,
        claimed_favourite: bool,
    ) -> Result<(User, ToggleOutcome)> {
        let lock = self.user_lock(telegram_id);
        let _guard = lock.lock().await;

        let (user, outcome) = match store.find_user(telegram_id).await? {
            Some(mut user) => {
                let outcome = user.toggle_favourite(film_uuid, claimed_favourite);
                (user, outcome)
            }
            None => (User::with_favourite(telegram_id, film_uuid), ToggleOutcome::Added),
        };

        let saved = store.save_user(&user).await?;
        Ok((saved, outcome))
    }
}
