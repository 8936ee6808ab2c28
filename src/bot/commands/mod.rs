use teloxide::utils::command::BotCommands;

use crate::bot::texts;
use crate::database::models::{FilmFilter, Genre};
use crate::utils::validation::validate_item_uuid;

/// Slash commands registered with Telegram.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Cinema catalog commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,
}

/// Buttons of the reply keyboards, matched on their exact label.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuCommand {
    Back,
    Films,
    Cinemas,
    Favourites,
    /// A film list for the given filter.
    FilmList(FilmFilter),
}

impl MenuCommand {
    pub fn from_label(text: &str) -> Option<Self> {
        match text {
            texts::BACK => Some(MenuCommand::Back),
            texts::HOME_FILMS => Some(MenuCommand::Films),
            texts::HOME_CINEMAS => Some(MenuCommand::Cinemas),
            texts::HOME_FAVOURITE => Some(MenuCommand::Favourites),
            texts::FILM_RANDOM => Some(MenuCommand::FilmList(FilmFilter::All)),
            texts::FILM_ACTION => Some(MenuCommand::FilmList(FilmFilter::by_genre(Genre::Action))),
            texts::FILM_COMEDY => Some(MenuCommand::FilmList(FilmFilter::by_genre(Genre::Comedy))),
            _ => None,
        }
    }
}

/// What a text message asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum TextIntent {
    Menu(MenuCommand),
    Start,
    ShowFilm(String),
    ShowCinema(String),
}

pub const FILM_MARKER: &str = "/f";
pub const CINEMA_MARKER: &str = "/c";

/// Strips the two-character command marker, `/fABC123` -> `ABC123`.
pub fn extract_item_uuid(source: &str) -> &str {
    match source.char_indices().nth(2) {
        Some((idx, _)) => &source[idx..],
        None => "",
    }
}

pub fn classify_text(text: &str, bot_username: &str) -> Option<TextIntent> {
    if let Some(menu) = MenuCommand::from_label(text) {
        return Some(TextIntent::Menu(menu));
    }

    if let Ok(Command::Start) = Command::parse(text, bot_username) {
        return Some(TextIntent::Start);
    }

    let item = if text.starts_with(FILM_MARKER) {
        TextIntent::ShowFilm
    } else if text.starts_with(CINEMA_MARKER) {
        TextIntent::ShowCinema
    } else {
        return None;
    };

    let uuid = extract_item_uuid(text);
    validate_item_uuid(uuid).ok()?;
    Some(item(uuid.to_string()))
}
