//! Reply keyboard layouts.

use crate::bot::texts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Home,
    Films,
    /// Location request shown before the nearby cinemas list.
    Cinemas,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: &'static str,
    pub request_location: bool,
}

impl MenuButton {
    const fn text(label: &'static str) -> Self {
        Self {
            label,
            request_location: false,
        }
    }

    const fn location(label: &'static str) -> Self {
        Self {
            label,
            request_location: true,
        }
    }
}

impl Menu {
    pub fn layout(self) -> Vec<Vec<MenuButton>> {
        match self {
            Menu::Home => vec![
                vec![
                    MenuButton::text(texts::HOME_FILMS),
                    MenuButton::text(texts::HOME_CINEMAS),
                ],
                vec![MenuButton::text(texts::HOME_FAVOURITE)],
            ],
            Menu::Films => vec![
                vec![MenuButton::text(texts::FILM_RANDOM)],
                vec![
                    MenuButton::text(texts::FILM_ACTION),
                    MenuButton::text(texts::FILM_COMEDY),
                ],
                vec![MenuButton::text(texts::BACK)],
            ],
            Menu::Cinemas => vec![
                vec![MenuButton::location(texts::SEND_LOCATION)],
                vec![MenuButton::text(texts::BACK)],
            ],
        }
    }
}
