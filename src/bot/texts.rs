//! User-facing strings. The bot speaks Russian; menu labels double as the
//! text commands the router matches on.

pub const BACK: &str = "Назад";
pub const HOME_FILMS: &str = "Фильмы";
pub const HOME_CINEMAS: &str = "Кинотеатры";
pub const HOME_FAVOURITE: &str = "Избранное";
pub const FILM_RANDOM: &str = "Случайный жанр";
pub const FILM_ACTION: &str = "Боевики";
pub const FILM_COMEDY: &str = "Комедии";
pub const SEND_LOCATION: &str = "Отправить местоположение";

pub const WHAT_TO_WATCH: &str = "Что хотите посмотреть?";
pub const CHOOSE_GENRE: &str = "Выберите жанр";
pub const SEND_LOCATION_PROMPT: &str = "Отправьте свое местоположение:";
pub const NOTHING_FOUND: &str = "Здесь ничего нет";
pub const NO_FAVOURITES: &str = "Вы пока ничего не добавили";
pub const FAVOURITES_HEADER: &str = "<b>Ваши фильмы:</b>";
pub const DISTANCE: &str = "Расстояние";
pub const KM: &str = "км.";

pub const ADD_TO_FAVOURITES: &str = "Добавить в избранное";
pub const REMOVE_FROM_FAVOURITES: &str = "Удалить из избранного";
pub const SHOW_CINEMAS: &str = "Показать кинотеатры";
pub const SHOW_ON_MAP: &str = "Показать на карте";
pub const SHOW_FILMS: &str = "Показать фильмы";
pub const GO_TO_CINEMA_SITE: &str = "Перейти на сайт кинотеатра:";
pub const EXTERNAL_LINK_PREFIX: &str = "Кинопоиск";

pub const FAVOURITE_ADDED: &str = "Фильм добавлен в избранное";
pub const FAVOURITE_REMOVED: &str = "Удалено из избранного";

pub const CAPTION_NAME: &str = "Название";
pub const CAPTION_YEAR: &str = "Год";
pub const CAPTION_RATE: &str = "Рейтинг";
pub const CAPTION_LENGTH: &str = "Длина";
pub const CAPTION_COUNTRY: &str = "Страна";
pub const MISSING_VALUE: &str = "—";

pub fn greeting(first_name: &str) -> String {
    format!("Здравствуйте, {first_name}!\n{WHAT_TO_WATCH}")
}
