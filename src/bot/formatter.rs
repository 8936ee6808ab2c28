//! Reply composition: ranked lists, detail cards and inline search results.
//!
//! Everything here is pure. Catalog text is HTML-escaped because replies are
//! sent in HTML parse mode.

use crate::bot::actions::Action;
use crate::bot::commands::{CINEMA_MARKER, FILM_MARKER};
use crate::bot::texts;
use crate::bot::transport::{InlineButton, InlineGrid, PhotoResult};
use crate::database::models::{Cinema, Film, GeoPoint, ToggleOutcome};
use crate::services::geo::distance_km;
use crate::utils::html::escape_html;

/// Joins ranked lines, or the "nothing here" text for an empty list.
fn ranked_lines<T>(items: &[T], line: impl Fn(usize, &T) -> String) -> String {
    if items.is_empty() {
        return texts::NOTHING_FOUND.to_string();
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| line(i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `<b>1</b> Name - /f<uuid>` per film, in the given order.
pub fn film_list(films: &[Film]) -> String {
    ranked_lines(films, |rank, f| {
        format!("<b>{rank}</b> {} - {FILM_MARKER}{}", escape_html(&f.name), f.uuid)
    })
}

/// `<b>1</b> Name - /c<uuid>` per cinema, in the given order.
pub fn cinema_list(cinemas: &[Cinema]) -> String {
    ranked_lines(cinemas, |rank, c| {
        format!("<b>{rank}</b> {} - {CINEMA_MARKER}{}", escape_html(&c.name), c.uuid)
    })
}

/// Pairs every cinema with its distance in km from `origin`, nearest first.
/// Equal distances keep their store order.
pub fn rank_by_distance(origin: GeoPoint, cinemas: Vec<Cinema>) -> Vec<(Cinema, f64)> {
    let mut ranked: Vec<(Cinema, f64)> = cinemas
        .into_iter()
        .map(|c| {
            let km = distance_km(origin, c.location);
            (c, km)
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}

pub fn nearby_cinema_list(origin: GeoPoint, cinemas: Vec<Cinema>) -> String {
    let ranked = rank_by_distance(origin, cinemas);
    ranked_lines(&ranked, |rank, (c, km)| {
        format!(
            "<b>{rank}</b> {}. <em>{}</em> - <strong>{km}</strong> {} {CINEMA_MARKER}{}",
            escape_html(&c.name),
            texts::DISTANCE,
            texts::KM,
            c.uuid
        )
    })
}

pub fn favourite_list(films: &[Film]) -> String {
    if films.is_empty() {
        return texts::NO_FAVOURITES.to_string();
    }

    let lines = films
        .iter()
        .map(|f| {
            format!(
                "{} - <b>{}</b> ({FILM_MARKER}{})",
                escape_html(&f.name),
                display_or_missing(f.rate),
                f.uuid
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{lines}", texts::FAVOURITES_HEADER)
}

fn display_or_missing<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| texts::MISSING_VALUE.to_string())
}

pub fn film_caption(film: &Film) -> String {
    format!(
        "{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}",
        texts::CAPTION_NAME,
        escape_html(&film.name),
        texts::CAPTION_YEAR,
        display_or_missing(film.year),
        texts::CAPTION_RATE,
        display_or_missing(film.rate),
        texts::CAPTION_LENGTH,
        escape_html(&display_or_missing(film.length.as_deref())),
        texts::CAPTION_COUNTRY,
        escape_html(&display_or_missing(film.country.as_deref())),
    )
}

fn external_link_row(film: &Film) -> Option<Vec<InlineButton>> {
    film.link.as_ref().map(|url| {
        vec![InlineButton::Url {
            text: format!("{}: {}", texts::EXTERNAL_LINK_PREFIX, film.name),
            url: url.clone(),
        }]
    })
}

/// Buttons under a film card: favourite toggle and cinemas, then the external link.
pub fn film_card_buttons(film: &Film, is_favourite: bool) -> serde_json::Result<InlineGrid> {
    let favourite_text = if is_favourite {
        texts::REMOVE_FROM_FAVOURITES
    } else {
        texts::ADD_TO_FAVOURITES
    };

    let toggle = Action::FilmToggleFavourite {
        film_uuid: film.uuid.clone(),
        is_fav: is_favourite,
    };
    let cinemas = Action::FilmCinemas {
        cinema_uuids: film.cinemas.clone(),
    };

    let mut grid = vec![vec![
        InlineButton::Callback {
            text: favourite_text.to_string(),
            data: toggle.encode()?,
        },
        InlineButton::Callback {
            text: texts::SHOW_CINEMAS.to_string(),
            data: cinemas.encode()?,
        },
    ]];
    grid.extend(external_link_row(film));

    Ok(grid)
}

/// Text and buttons of a cinema card.
pub fn cinema_card(cinema: &Cinema) -> serde_json::Result<(String, InlineGrid)> {
    let location = Action::CinemaLocation {
        lat: cinema.location.latitude,
        lon: cinema.location.longitude,
    };
    let films = Action::CinemaFilms {
        film_uuids: cinema.films.clone(),
    };

    let grid = vec![
        vec![
            InlineButton::Url {
                text: cinema.name.clone(),
                url: cinema.url.clone(),
            },
            InlineButton::Callback {
                text: texts::SHOW_ON_MAP.to_string(),
                data: location.encode()?,
            },
        ],
        vec![InlineButton::Callback {
            text: texts::SHOW_FILMS.to_string(),
            data: films.encode()?,
        }],
    ];

    Ok((texts::GO_TO_CINEMA_SITE.to_string(), grid))
}

/// One photo card per film that has a picture.
pub fn inline_results(films: &[Film]) -> Vec<PhotoResult> {
    films
        .iter()
        .filter_map(|film| {
            let picture = film.picture.as_ref()?;
            Some(PhotoResult {
                id: film.uuid.clone(),
                photo_url: picture.clone(),
                caption: film_caption(film),
                buttons: external_link_row(film).into_iter().collect(),
            })
        })
        .collect()
}

pub fn toggle_acknowledgement(outcome: ToggleOutcome) -> &'static str {
    match outcome {
        ToggleOutcome::Added => texts::FAVOURITE_ADDED,
        ToggleOutcome::Removed => texts::FAVOURITE_REMOVED,
    }
}
