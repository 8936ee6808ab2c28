use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

use cinema_catalog_bot::bot::actions::Action;
use cinema_catalog_bot::bot::events::{CallbackEvent, InboundEvent, InlineSearchEvent, TextEvent};
use cinema_catalog_bot::bot::keyboard::Menu;
use cinema_catalog_bot::bot::router::EventRouter;
use cinema_catalog_bot::bot::texts;
use cinema_catalog_bot::bot::transport::{InlineButton, InlineGrid, Markup, PhotoResult, Transport};
use cinema_catalog_bot::database::connection::DatabaseManager;
use cinema_catalog_bot::database::models::{Cinema, CinemaFilter, Film, FilmFilter, GeoPoint, User};
use cinema_catalog_bot::database::store::CatalogStore;

const CHAT_ID: i64 = 555;
const USER_ID: i64 = 42;

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Text {
        chat_id: i64,
        text: String,
        markup: Option<Markup>,
    },
    Photo {
        chat_id: i64,
        photo_url: String,
        caption: String,
        buttons: InlineGrid,
    },
    Location {
        chat_id: i64,
        latitude: f64,
        longitude: f64,
    },
    CallbackAnswer {
        callback_id: String,
        text: String,
    },
    InlineAnswer {
        query_id: String,
        results: Vec<PhotoResult>,
    },
}

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    fn record(&self, item: Sent) {
        self.sent.lock().unwrap().push(item);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, chat_id: i64, text: &str, markup: Option<Markup>) -> Result<()> {
        self.record(Sent::Text {
            chat_id,
            text: text.to_string(),
            markup,
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_url: &str,
        caption: &str,
        buttons: InlineGrid,
    ) -> Result<()> {
        self.record(Sent::Photo {
            chat_id,
            photo_url: photo_url.to_string(),
            caption: caption.to_string(),
            buttons,
        });
        Ok(())
    }

    async fn send_location(&self, chat_id: i64, latitude: f64, longitude: f64) -> Result<()> {
        self.record(Sent::Location {
            chat_id,
            latitude,
            longitude,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()> {
        self.record(Sent::CallbackAnswer {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn answer_inline_query(&self, query_id: &str, results: Vec<PhotoResult>) -> Result<()> {
        self.record(Sent::InlineAnswer {
            query_id: query_id.to_string(),
            results,
        });
        Ok(())
    }
}

struct Harness {
    router: EventRouter,
    store: Arc<DatabaseManager>,
    transport: Arc<RecordingTransport>,
    _temp_dir: TempDir,
}

async fn setup() -> Result<Harness> {
    let temp_dir = tempdir()?;
    let database_url = format!("sqlite:{}", temp_dir.path().join("router.db").display());
    let db = DatabaseManager::new(&database_url).await?;
    db.run_migrations().await?;

    let store = Arc::new(db);
    let transport = Arc::new(RecordingTransport::default());
    let router = EventRouter::new(store.clone(), transport.clone(), "catalog_bot");

    Ok(Harness {
        router,
        store,
        transport,
        _temp_dir: temp_dir,
    })
}

fn text(text: &str) -> InboundEvent {
    InboundEvent::Message(TextEvent {
        chat_id: CHAT_ID,
        sender_id: USER_ID,
        sender_name: "Anna".to_string(),
        text: Some(text.to_string()),
        location: None,
    })
}

fn location(latitude: f64, longitude: f64) -> InboundEvent {
    InboundEvent::Message(TextEvent {
        chat_id: CHAT_ID,
        sender_id: USER_ID,
        sender_name: "Anna".to_string(),
        text: None,
        location: Some(GeoPoint {
            latitude,
            longitude,
        }),
    })
}

fn callback(payload: &str) -> InboundEvent {
    InboundEvent::Callback(CallbackEvent {
        chat_id: Some(CHAT_ID),
        sender_id: USER_ID,
        callback_id: "cb-1".to_string(),
        payload: Some(payload.to_string()),
    })
}

fn film(uuid: &str, name: &str, kind: &str) -> Film {
    Film::new(uuid, name, kind).unwrap()
}

fn cinema(uuid: &str, name: &str, latitude: f64, longitude: f64) -> Cinema {
    Cinema::new(
        uuid,
        name,
        format!("https://{uuid}.example.com"),
        GeoPoint {
            latitude,
            longitude,
        },
    )
    .unwrap()
}

fn single_text(sent: Vec<Sent>) -> (i64, String, Option<Markup>) {
    assert_eq!(sent.len(), 1, "expected one reply, got {sent:?}");
    match sent.into_iter().next().unwrap() {
        Sent::Text {
            chat_id,
            text,
            markup,
        } => (chat_id, text, markup),
        other => panic!("expected a text reply, got {other:?}"),
    }
}

fn callback_data(button: &InlineButton) -> &str {
    match button {
        InlineButton::Callback { data, .. } => data,
        other => panic!("expected a callback button, got {other:?}"),
    }
}

#[tokio::test]
async fn test_start_greets_with_home_menu() -> Result<()> {
    let h = setup().await?;

    h.router.dispatch(text("/start")).await?;

    let (chat_id, reply, markup) = single_text(h.transport.take());
    assert_eq!(chat_id, CHAT_ID);
    assert_eq!(reply, texts::greeting("Anna"));
    assert_eq!(markup, Some(Markup::Keyboard(Menu::Home)));

    Ok(())
}

#[tokio::test]
async fn test_menu_navigation() -> Result<()> {
    let h = setup().await?;

    h.router.dispatch(text(texts::HOME_FILMS)).await?;
    let (_, reply, markup) = single_text(h.transport.take());
    assert_eq!(reply, texts::CHOOSE_GENRE);
    assert_eq!(markup, Some(Markup::Keyboard(Menu::Films)));

    h.router.dispatch(text(texts::HOME_CINEMAS)).await?;
    let (_, reply, markup) = single_text(h.transport.take());
    assert_eq!(reply, texts::SEND_LOCATION_PROMPT);
    assert_eq!(markup, Some(Markup::Keyboard(Menu::Cinemas)));

    h.router.dispatch(text(texts::BACK)).await?;
    let (_, reply, markup) = single_text(h.transport.take());
    assert_eq!(reply, texts::WHAT_TO_WATCH);
    assert_eq!(markup, Some(Markup::Keyboard(Menu::Home)));

    Ok(())
}

#[tokio::test]
async fn test_unrecognised_text_is_ignored() -> Result<()> {
    let h = setup().await?;

    h.router.dispatch(text("hello there")).await?;
    h.router.dispatch(text("/f")).await?;
    assert!(h.transport.take().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_comedy_list_in_store_order() -> Result<()> {
    let h = setup().await?;
    for (uuid, kind) in [
        ("c1", "comedy"),
        ("a1", "action"),
        ("c2", "comedy"),
        ("a2", "action"),
        ("c3", "comedy"),
    ] {
        h.store.save_film(&film(uuid, &format!("Film {uuid}"), kind)).await?;
    }

    h.router.dispatch(text(texts::FILM_COMEDY)).await?;

    let (chat_id, reply, markup) = single_text(h.transport.take());
    assert_eq!(chat_id, CHAT_ID);
    assert_eq!(markup, Some(Markup::Keyboard(Menu::Films)));
    assert_eq!(
        reply,
        "<b>1</b> Film c1 - /fc1\n<b>2</b> Film c2 - /fc2\n<b>3</b> Film c3 - /fc3"
    );

    Ok(())
}

#[tokio::test]
async fn test_empty_genre_says_nothing_found() -> Result<()> {
    let h = setup().await?;

    h.router.dispatch(text(texts::FILM_ACTION)).await?;

    let (_, reply, _) = single_text(h.transport.take());
    assert_eq!(reply, texts::NOTHING_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_location_lists_nearest_cinemas_first() -> Result<()> {
    let h = setup().await?;
    h.store.save_cinema(&cinema("far", "Far", 0.0, 3.0)).await?;
    h.store.save_cinema(&cinema("near", "Near", 0.0, 1.0)).await?;
    h.store.save_cinema(&cinema("mid", "Mid", 0.0, 2.0)).await?;

    h.router.dispatch(location(0.0, 0.0)).await?;

    let (chat_id, reply, markup) = single_text(h.transport.take());
    assert_eq!(chat_id, CHAT_ID);
    assert_eq!(markup, Some(Markup::Keyboard(Menu::Home)));
    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "<b>1</b> Near. <em>Расстояние</em> - <strong>111.319</strong> км. /cnear"
    );
    assert!(lines[1].ends_with("/cmid"));
    assert!(lines[2].ends_with("/cfar"));

    Ok(())
}

#[tokio::test]
async fn test_film_card_sent_as_photo() -> Result<()> {
    let h = setup().await?;
    let mut heat = film("heat", "Heat", "action");
    heat.year = Some(1995);
    heat.picture = Some("https://example.com/heat.jpg".to_string());
    heat.cinemas = vec!["c1".to_string()];
    h.store.save_film(&heat).await?;

    h.router.dispatch(text("/fheat")).await?;

    let sent = h.transport.take();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Photo {
            chat_id,
            photo_url,
            caption,
            buttons,
        } => {
            assert_eq!(*chat_id, CHAT_ID);
            assert_eq!(photo_url, "https://example.com/heat.jpg");
            assert!(caption.starts_with("Название: Heat\nГод: 1995"));
            match &buttons[0][0] {
                InlineButton::Callback { text, data } => {
                    assert_eq!(text, texts::ADD_TO_FAVOURITES);
                    assert_eq!(
                        Action::decode(data)?,
                        Action::FilmToggleFavourite {
                            film_uuid: "heat".to_string(),
                            is_fav: false
                        }
                    );
                }
                other => panic!("unexpected button {other:?}"),
            }
        }
        other => panic!("expected a photo, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_film_card_reflects_favourite_state() -> Result<()> {
    let h = setup().await?;
    h.store.save_film(&film("heat", "Heat", "action")).await?;
    h.store.save_user(&User::with_favourite(USER_ID, "heat")).await?;

    h.router.dispatch(text("/fheat")).await?;

    // No picture: the card falls back to a text message.
    let (_, caption, markup) = single_text(h.transport.take());
    assert!(caption.starts_with("Название: Heat"));
    match markup {
        Some(Markup::Inline(grid)) => match &grid[0][0] {
            InlineButton::Callback { text, .. } => {
                assert_eq!(text, texts::REMOVE_FROM_FAVOURITES)
            }
            other => panic!("unexpected button {other:?}"),
        },
        other => panic!("expected inline buttons, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_unknown_film_or_cinema_sends_nothing() -> Result<()> {
    let h = setup().await?;

    h.router.dispatch(text("/fmissing")).await?;
    h.router.dispatch(text("/cmissing")).await?;
    assert!(h.transport.take().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_cinema_card_and_its_buttons() -> Result<()> {
    let h = setup().await?;
    let mut oktyabr = cinema("okt", "Октябрь", 55.75, 37.59);
    oktyabr.films = vec!["f1".to_string(), "f2".to_string()];
    h.store.save_cinema(&oktyabr).await?;
    h.store.save_film(&film("f1", "Heat", "action")).await?;
    h.store.save_film(&film("f2", "Ronin", "action")).await?;
    h.store.save_film(&film("f3", "Other", "comedy")).await?;

    h.router.dispatch(text("/cokt")).await?;
    let (_, reply, markup) = single_text(h.transport.take());
    assert_eq!(reply, texts::GO_TO_CINEMA_SITE);
    let grid = match markup {
        Some(Markup::Inline(grid)) => grid,
        other => panic!("expected inline buttons, got {other:?}"),
    };

    // "Show on map"
    h.router.dispatch(callback(callback_data(&grid[0][1]))).await?;
    assert_eq!(
        h.transport.take(),
        vec![Sent::Location {
            chat_id: CHAT_ID,
            latitude: 55.75,
            longitude: 37.59
        }]
    );

    // "Show films"
    h.router.dispatch(callback(callback_data(&grid[1][0]))).await?;
    let (chat_id, reply, markup) = single_text(h.transport.take());
    assert_eq!(chat_id, CHAT_ID);
    assert_eq!(reply, "<b>1</b> Heat - /ff1\n<b>2</b> Ronin - /ff2");
    assert_eq!(markup, Some(Markup::Keyboard(Menu::Films)));

    Ok(())
}

#[tokio::test]
async fn test_film_cinemas_callback_lists_cinemas() -> Result<()> {
    let h = setup().await?;
    h.store.save_cinema(&cinema("c1", "Октябрь", 55.75, 37.59)).await?;
    h.store.save_cinema(&cinema("c2", "Пионер", 55.74, 37.55)).await?;

    let payload = Action::FilmCinemas {
        cinema_uuids: vec!["c2".to_string()],
    }
    .encode()?;
    h.router.dispatch(callback(&payload)).await?;

    let (_, reply, markup) = single_text(h.transport.take());
    assert_eq!(reply, "<b>1</b> Пионер - /cc2");
    assert_eq!(markup, Some(Markup::Keyboard(Menu::Home)));

    Ok(())
}

#[tokio::test]
async fn test_toggle_adds_then_removes_favourite() -> Result<()> {
    let h = setup().await?;
    h.store.save_film(&film("heat", "Heat", "action")).await?;

    let add = Action::FilmToggleFavourite {
        film_uuid: "heat".to_string(),
        is_fav: false,
    }
    .encode()?;
    h.router.dispatch(callback(&add)).await?;
    assert_eq!(
        h.transport.take(),
        vec![Sent::CallbackAnswer {
            callback_id: "cb-1".to_string(),
            text: texts::FAVOURITE_ADDED.to_string()
        }]
    );
    assert_eq!(
        h.store.find_user(USER_ID).await?.unwrap().films,
        vec!["heat".to_string()]
    );

    let remove = Action::FilmToggleFavourite {
        film_uuid: "heat".to_string(),
        is_fav: true,
    }
    .encode()?;
    h.router.dispatch(callback(&remove)).await?;
    assert_eq!(
        h.transport.take(),
        vec![Sent::CallbackAnswer {
            callback_id: "cb-1".to_string(),
            text: texts::FAVOURITE_REMOVED.to_string()
        }]
    );
    assert!(h.store.find_user(USER_ID).await?.unwrap().films.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_favourites_menu_lists_saved_films() -> Result<()> {
    let h = setup().await?;

    h.router.dispatch(text(texts::HOME_FAVOURITE)).await?;
    let (_, reply, _) = single_text(h.transport.take());
    assert_eq!(reply, texts::NO_FAVOURITES);

    let mut heat = film("heat", "Heat", "action");
    heat.rate = Some(8.3);
    h.store.save_film(&heat).await?;
    h.store.save_user(&User::with_favourite(USER_ID, "heat")).await?;

    h.router.dispatch(text(texts::HOME_FAVOURITE)).await?;
    let (_, reply, markup) = single_text(h.transport.take());
    assert_eq!(reply, "<b>Ваши фильмы:</b>\nHeat - <b>8.3</b> (/fheat)");
    assert_eq!(markup, Some(Markup::Keyboard(Menu::Home)));

    Ok(())
}

#[tokio::test]
async fn test_malformed_callback_sends_nothing() -> Result<()> {
    let h = setup().await?;

    h.router.dispatch(callback("not json")).await?;
    h.router.dispatch(callback(r#"{"type":"zzz"}"#)).await?;
    h.router
        .dispatch(InboundEvent::Callback(CallbackEvent {
            chat_id: None,
            sender_id: USER_ID,
            callback_id: "cb-2".to_string(),
            payload: None,
        }))
        .await?;

    assert!(h.transport.take().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_callback_without_message_replies_to_sender() -> Result<()> {
    let h = setup().await?;

    let payload = Action::CinemaLocation { lat: 1.0, lon: 2.0 }.encode()?;
    h.router
        .dispatch(InboundEvent::Callback(CallbackEvent {
            chat_id: None,
            sender_id: USER_ID,
            callback_id: "cb-3".to_string(),
            payload: Some(payload),
        }))
        .await?;

    assert_eq!(
        h.transport.take(),
        vec![Sent::Location {
            chat_id: USER_ID,
            latitude: 1.0,
            longitude: 2.0
        }]
    );

    Ok(())
}

#[tokio::test]
async fn test_inline_search_returns_films_with_pictures() -> Result<()> {
    let h = setup().await?;
    let mut heat = film("heat", "Heat", "action");
    heat.picture = Some("https://example.com/heat.jpg".to_string());
    heat.link = Some("https://www.kinopoisk.ru/film/409/".to_string());
    h.store.save_film(&heat).await?;
    h.store.save_film(&film("ronin", "Ronin", "action")).await?;

    h.router
        .dispatch(InboundEvent::InlineSearch(InlineSearchEvent {
            query_id: "iq-1".to_string(),
            sender_id: USER_ID,
            query: "anything".to_string(),
        }))
        .await?;

    let sent = h.transport.take();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::InlineAnswer { query_id, results } => {
            assert_eq!(query_id, "iq-1");
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].id, "heat");
            assert_eq!(
                results[0].buttons,
                vec![vec![InlineButton::Url {
                    text: "Кинопоиск: Heat".to_string(),
                    url: "https://www.kinopoisk.ru/film/409/".to_string(),
                }]]
            );
        }
        other => panic!("expected an inline answer, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_film_card_with_non_url_picture_falls_back_to_text() -> Result<()> {
    let h = setup().await?;
    let mut heat = film("heat", "Heat", "action");
    heat.picture = Some("posters/heat.jpg".to_string());
    h.store.save_film(&heat).await?;

    h.router.dispatch(text("/fheat")).await?;

    let (chat_id, caption, markup) = single_text(h.transport.take());
    assert_eq!(chat_id, CHAT_ID);
    assert!(caption.starts_with("Название: Heat"));
    match markup {
        Some(Markup::Inline(grid)) => match &grid[0][0] {
            InlineButton::Callback { text, .. } => assert_eq!(text, texts::ADD_TO_FAVOURITES),
            other => panic!("unexpected button {other:?}"),
        },
        other => panic!("expected inline buttons, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_menu_label_with_location_triggers_both_replies() -> Result<()> {
    let h = setup().await?;
    h.store.save_cinema(&cinema("near", "Near", 0.0, 1.0)).await?;

    h.router
        .dispatch(InboundEvent::Message(TextEvent {
            chat_id: CHAT_ID,
            sender_id: USER_ID,
            sender_name: "Anna".to_string(),
            text: Some(texts::HOME_FILMS.to_string()),
            location: Some(GeoPoint {
                latitude: 0.0,
                longitude: 0.0,
            }),
        }))
        .await?;

    let sent = h.transport.take();
    assert_eq!(sent.len(), 2, "expected two replies, got {sent:?}");
    assert_eq!(
        sent[0],
        Sent::Text {
            chat_id: CHAT_ID,
            text: texts::CHOOSE_GENRE.to_string(),
            markup: Some(Markup::Keyboard(Menu::Films)),
        }
    );
    match &sent[1] {
        Sent::Text { text, markup, .. } => {
            assert!(text.ends_with("/cnear"), "{text}");
            assert_eq!(*markup, Some(Markup::Keyboard(Menu::Home)));
        }
        other => panic!("expected the nearby list, got {other:?}"),
    }

    Ok(())
}

/// Reads from SQLite but refuses to persist users.
struct ReadOnlyUsersStore {
    inner: Arc<DatabaseManager>,
}

#[async_trait]
impl CatalogStore for ReadOnlyUsersStore {
    async fn find_films(&self, filter: &FilmFilter) -> Result<Vec<Film>> {
        self.inner.find_films(filter).await
    }

    async fn find_film(&self, uuid: &str) -> Result<Option<Film>> {
        self.inner.find_film(uuid).await
    }

    async fn find_cinemas(&self, filter: &CinemaFilter) -> Result<Vec<Cinema>> {
        self.inner.find_cinemas(filter).await
    }

    async fn find_cinema(&self, uuid: &str) -> Result<Option<Cinema>> {
        self.inner.find_cinema(uuid).await
    }

    async fn find_user(&self, telegram_id: i64) -> Result<Option<User>> {
        self.inner.find_user(telegram_id).await
    }

    async fn save_user(&self, _user: &User) -> Result<User> {
        Err(anyhow!("database is locked"))
    }

    async fn save_film(&self, film: &Film) -> Result<Film> {
        self.inner.save_film(film).await
    }

    async fn save_cinema(&self, cinema: &Cinema) -> Result<Cinema> {
        self.inner.save_cinema(cinema).await
    }
}

#[tokio::test]
async fn test_failed_toggle_save_is_not_acknowledged() -> Result<()> {
    let h = setup().await?;
    h.store.save_film(&film("heat", "Heat", "action")).await?;

    let store = Arc::new(ReadOnlyUsersStore {
        inner: h.store.clone(),
    });
    let router = EventRouter::new(store, h.transport.clone(), "catalog_bot");

    let add = Action::FilmToggleFavourite {
        film_uuid: "heat".to_string(),
        is_fav: false,
    }
    .encode()?;
    router.dispatch(callback(&add)).await?;

    assert!(h.transport.take().is_empty());
    assert!(h.store.find_user(USER_ID).await?.is_none());

    Ok(())
}
