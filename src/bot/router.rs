//! Event routing.
//!
//! [`EventRouter`] owns the injected store and transport. Each inbound event
//! is one unit of work: classify it, query the store, compose the reply with
//! [`formatter`], send it. Nothing is reported back to the user on failure;
//! store errors, missing records and malformed payloads are logged and the
//! event is dropped.

use anyhow::Result;
use std::sync::Arc;
use url::Url;

use crate::bot::actions::Action;
use crate::bot::commands::{classify_text, MenuCommand, TextIntent};
use crate::bot::events::{CallbackEvent, InboundEvent, InlineSearchEvent, TextEvent};
use crate::bot::formatter;
use crate::bot::keyboard::Menu;
use crate::bot::texts;
use crate::bot::transport::{Markup, Transport};
use crate::database::models::{CinemaFilter, FilmFilter, GeoPoint};
use crate::database::store::CatalogStore;
use crate::services::favourites::FavouriteService;
use crate::utils::html::escape_html;
use crate::utils::logging::{
    log_database_error, log_event_dropped, log_event_start, log_event_success,
};

#[derive(Clone)]
pub struct EventRouter {
    store: Arc<dyn CatalogStore>,
    transport: Arc<dyn Transport>,
    favourites: FavouriteService,
    bot_username: String,
}

impl EventRouter {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        transport: Arc<dyn Transport>,
        bot_username: impl Into<String>,
    ) -> Self {
        Self {
            store,
            transport,
            favourites: FavouriteService::new(),
            bot_username: bot_username.into(),
        }
    }

    /// Handles one event; only transport failures are returned.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<()> {
        match event {
            InboundEvent::Message(e) => self.handle_message(e).await,
            InboundEvent::Callback(e) => self.handle_callback(e).await,
            InboundEvent::InlineSearch(e) => self.handle_inline_search(e).await,
        }
    }

    async fn handle_message(&self, event: TextEvent) -> Result<()> {
        log_event_start(
            "message",
            &event.sender_name,
            event.sender_id,
            event.chat_id,
            event.text.as_deref(),
        );

        let intent = event
            .text
            .as_deref()
            .and_then(|text| classify_text(text, &self.bot_username));

        if let Some(intent) = intent {
            self.handle_text_intent(&event, intent).await?;
        }

        // A location is answered even when the text matched something too.
        if let Some(location) = event.location {
            self.send_nearby_cinemas(event.chat_id, location).await?;
        }

        Ok(())
    }

    async fn handle_text_intent(&self, event: &TextEvent, intent: TextIntent) -> Result<()> {
        let chat_id = event.chat_id;
        match intent {
            TextIntent::Start => {
                let text = texts::greeting(&escape_html(&event.sender_name));
                self.send_menu(chat_id, &text, Menu::Home).await
            }
            TextIntent::Menu(MenuCommand::Back) => {
                self.send_menu(chat_id, texts::WHAT_TO_WATCH, Menu::Home).await
            }
            TextIntent::Menu(MenuCommand::Films) => {
                self.send_menu(chat_id, texts::CHOOSE_GENRE, Menu::Films).await
            }
            TextIntent::Menu(MenuCommand::Cinemas) => {
                self.send_menu(chat_id, texts::SEND_LOCATION_PROMPT, Menu::Cinemas).await
            }
            TextIntent::Menu(MenuCommand::Favourites) => {
                self.send_favourites(chat_id, event.sender_id).await
            }
            TextIntent::Menu(MenuCommand::FilmList(filter)) => {
                self.send_films(chat_id, &filter).await
            }
            TextIntent::ShowFilm(uuid) => self.send_film_card(chat_id, event.sender_id, &uuid).await,
            TextIntent::ShowCinema(uuid) => self.send_cinema_card(chat_id, &uuid).await,
        }
    }

    async fn handle_callback(&self, event: CallbackEvent) -> Result<()> {
        let Some(payload) = event.payload.as_deref() else {
            log_event_dropped("callback", event.sender_id, "no payload");
            return Ok(());
        };

        let action = match Action::decode(payload) {
            Ok(action) => action,
            Err(e) => {
                log_event_dropped(
                    "callback",
                    event.sender_id,
                    &format!("malformed payload {payload:?}: {e}"),
                );
                return Ok(());
            }
        };

        log_event_start(
            "callback",
            "",
            event.sender_id,
            event.reply_chat(),
            Some(action.code()),
        );

        match action {
            Action::CinemaLocation { lat, lon } => {
                self.transport
                    .send_location(event.reply_chat(), lat, lon)
                    .await
            }
            Action::FilmToggleFavourite { film_uuid, is_fav } => {
                self.toggle_favourite(&event, &film_uuid, is_fav).await
            }
            Action::CinemaFilms { film_uuids } => {
                self.send_films(event.reply_chat(), &FilmFilter::ByUuids(film_uuids))
                    .await
            }
            Action::FilmCinemas { cinema_uuids } => {
                self.send_cinemas(event.reply_chat(), &CinemaFilter::ByUuids(cinema_uuids))
                    .await
            }
        }
    }

    async fn handle_inline_search(&self, event: InlineSearchEvent) -> Result<()> {
        log_event_start("inline_query", "", event.sender_id, 0, Some(&event.query));

        let films = match self.store.find_films(&FilmFilter::All).await {
            Ok(films) => films,
            Err(e) => {
                log_database_error("SELECT", "films", &e.to_string(), Some("inline query"));
                return Ok(());
            }
        };

        let results = formatter::inline_results(&films);
        let count = results.len();
        self.transport
            .answer_inline_query(&event.query_id, results)
            .await?;

        log_event_success(
            "inline_query",
            event.sender_id,
            0,
            Some(&format!("{count} results")),
        );
        Ok(())
    }

    async fn send_menu(&self, chat_id: i64, text: &str, menu: Menu) -> Result<()> {
        self.transport
            .send_text(chat_id, text, Some(Markup::Keyboard(menu)))
            .await
    }

    async fn send_films(&self, chat_id: i64, filter: &FilmFilter) -> Result<()> {
        let films = match self.store.find_films(filter).await {
            Ok(films) => films,
            Err(e) => {
                log_database_error("SELECT", "films", &e.to_string(), None);
                return Ok(());
            }
        };

        let html = formatter::film_list(&films);
        self.send_menu(chat_id, &html, Menu::Films).await
    }

    async fn send_cinemas(&self, chat_id: i64, filter: &CinemaFilter) -> Result<()> {
        let cinemas = match self.store.find_cinemas(filter).await {
            Ok(cinemas) => cinemas,
            Err(e) => {
                log_database_error("SELECT", "cinemas", &e.to_string(), None);
                return Ok(());
            }
        };

        let html = formatter::cinema_list(&cinemas);
        self.send_menu(chat_id, &html, Menu::Home).await
    }

    async fn send_nearby_cinemas(&self, chat_id: i64, location: GeoPoint) -> Result<()> {
        let cinemas = match self.store.find_cinemas(&CinemaFilter::All).await {
            Ok(cinemas) => cinemas,
            Err(e) => {
                log_database_error("SELECT", "cinemas", &e.to_string(), Some("nearby"));
                return Ok(());
            }
        };

        let html = formatter::nearby_cinema_list(location, cinemas);
        self.send_menu(chat_id, &html, Menu::Home).await
    }

    async fn send_favourites(&self, chat_id: i64, telegram_id: i64) -> Result<()> {
        let user = match self.store.find_user(telegram_id).await {
            Ok(user) => user,
            Err(e) => {
                log_database_error("SELECT", "users", &e.to_string(), None);
                return Ok(());
            }
        };

        let films = match user {
            Some(user) => match self.store.find_films(&FilmFilter::ByUuids(user.films)).await {
                Ok(films) => films,
                Err(e) => {
                    log_database_error("SELECT", "films", &e.to_string(), Some("favourites"));
                    return Ok(());
                }
            },
            None => Vec::new(),
        };

        let html = formatter::favourite_list(&films);
        self.send_menu(chat_id, &html, Menu::Home).await
    }

    async fn send_film_card(&self, chat_id: i64, telegram_id: i64, uuid: &str) -> Result<()> {
        let lookup = tokio::try_join!(
            self.store.find_film(uuid),
            self.store.find_user(telegram_id)
        );

        let (film, user) = match lookup {
            Ok((Some(film), user)) => (film, user),
            Ok((None, _)) => {
                log_event_dropped("film_card", telegram_id, &format!("no film with uuid {uuid}"));
                return Ok(());
            }
            Err(e) => {
                log_database_error("SELECT", "films", &e.to_string(), Some(uuid));
                return Ok(());
            }
        };

        let is_favourite = user.map(|u| u.is_favourite(&film.uuid)).unwrap_or(false);
        let caption = formatter::film_caption(&film);
        let buttons = formatter::film_card_buttons(&film, is_favourite)?;

        match film.picture.as_deref().filter(|p| is_photo_url(&film.uuid, p)) {
            Some(picture) => {
                self.transport
                    .send_photo(chat_id, picture, &caption, buttons)
                    .await?
            }
            None => {
                self.transport
                    .send_text(chat_id, &caption, Some(Markup::Inline(buttons)))
                    .await?
            }
        }

        log_event_success("film_card", telegram_id, chat_id, Some(uuid));
        Ok(())
    }

    async fn send_cinema_card(&self, chat_id: i64, uuid: &str) -> Result<()> {
        let cinema = match self.store.find_cinema(uuid).await {
            Ok(Some(cinema)) => cinema,
            Ok(None) => {
                log_event_dropped("cinema_card", chat_id, &format!("no cinema with uuid {uuid}"));
                return Ok(());
            }
            Err(e) => {
                log_database_error("SELECT", "cinemas", &e.to_string(), Some(uuid));
                return Ok(());
            }
        };

        let (text, buttons) = formatter::cinema_card(&cinema)?;
        self.transport
            .send_text(chat_id, &text, Some(Markup::Inline(buttons)))
            .await
    }

    async fn toggle_favourite(&self, event: &CallbackEvent, film_uuid: &str, is_fav: bool) -> Result<()> {
        let outcome = self
            .favourites
            .toggle(self.store.as_ref(), event.sender_id, film_uuid, is_fav)
            .await;

        match outcome {
            Ok((user, outcome)) => {
                self.transport
                    .answer_callback(&event.callback_id, formatter::toggle_acknowledgement(outcome))
                    .await?;
                log_event_success(
                    "toggle_favourite",
                    event.sender_id,
                    event.reply_chat(),
                    Some(&format!("{outcome:?} {film_uuid}, {} favourites", user.films.len())),
                );
            }
            Err(e) => {
                // No acknowledgement: the user gets no feedback on a failed save.
                log_database_error("UPSERT", "users", &e.to_string(), Some(film_uuid));
            }
        }
        Ok(())
    }
}

/// Telegram fetches card photos by absolute URL; anything else gets a text card.
fn is_photo_url(film_uuid: &str, picture: &str) -> bool {
    match Url::parse(picture) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Film {} picture {:?} is not a URL ({}), sending text card", film_uuid, picture, e);
            false
        }
    }
}
