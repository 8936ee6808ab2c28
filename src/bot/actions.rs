//! Inline button payloads.
//!
//! Buttons carry a JSON object whose `type` field selects the action:
//! `{"type":"cl","lat":..,"lon":..}`, `{"type":"ftf","filmUuid":..,"isFav":..}`,
//! `{"type":"cfs","filmUuids":[..]}` and `{"type":"fcs","cinemaUuids":[..]}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Show a cinema on the map.
    #[serde(rename = "cl")]
    CinemaLocation { lat: f64, lon: f64 },
    #[serde(rename = "ftf", rename_all = "camelCase")]
    FilmToggleFavourite { film_uuid: String, is_fav: bool },
    /// List the films a cinema shows.
    #[serde(rename = "cfs", rename_all = "camelCase")]
    CinemaFilms { film_uuids: Vec<String> },
    /// List the cinemas showing a film.
    #[serde(rename = "fcs", rename_all = "camelCase")]
    FilmCinemas { cinema_uuids: Vec<String> },
}

impl Action {
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }

    /// Short name used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Action::CinemaLocation { .. } => "cl",
            Action::FilmToggleFavourite { .. } => "ftf",
            Action::CinemaFilms { .. } => "cfs",
            Action::FilmCinemas { .. } => "fcs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let encoded = Action::FilmToggleFavourite {
            film_uuid: "f1".to_string(),
            is_fav: true,
        }
        .encode()
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value, json!({"type": "ftf", "filmUuid": "f1", "isFav": true}));

        let encoded = Action::FilmCinemas {
            cinema_uuids: vec!["c1".to_string(), "c2".to_string()],
        }
        .encode()
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value, json!({"type": "fcs", "cinemaUuids": ["c1", "c2"]}));
    }

    #[test]
    fn test_encode_then_decode_keeps_fields() {
        let actions = vec![
            Action::CinemaLocation { lat: 55.75, lon: 37.61 },
            Action::FilmToggleFavourite {
                film_uuid: "f1".to_string(),
                is_fav: false,
            },
            Action::CinemaFilms {
                film_uuids: vec!["f1".to_string(), "f2".to_string()],
            },
            Action::FilmCinemas { cinema_uuids: vec![] },
        ];

        for action in actions {
            let payload = action.encode().unwrap();
            assert_eq!(Action::decode(&payload).unwrap(), action);
        }
    }

    #[test]
    fn test_decode_payload_from_other_clients() {
        let action = Action::decode(r#"{"lon":30.3,"type":"cl","lat":59.9}"#).unwrap();
        assert_eq!(action, Action::CinemaLocation { lat: 59.9, lon: 30.3 });
        assert_eq!(action.code(), "cl");
    }

    #[test]
    fn test_decode_rejects_non_json() {
        for payload in ["", "ftf", "not json at all", "{type:cl}", "[1, 2"] {
            assert!(Action::decode(payload).is_err(), "accepted {payload:?}");
        }
    }

    #[test]
    fn test_decode_rejects_unknown_or_incomplete_actions() {
        assert!(Action::decode(r#"{"type":"zzz"}"#).is_err());
        assert!(Action::decode(r#"{"lat":1.0,"lon":2.0}"#).is_err());
        assert!(Action::decode(r#"{"type":"ftf","filmUuid":"f1"}"#).is_err());
    }
}
