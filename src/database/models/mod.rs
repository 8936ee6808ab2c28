pub mod cinema;
pub mod film;
pub mod user;

pub use cinema::*;
pub use film::*;
pub use user::*;

/// Uuid lists are stored as JSON arrays in TEXT columns.
pub(crate) fn decode_uuid_list(raw: &str) -> Result<Vec<String>, sqlx::Error> {
    serde_json::from_str(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

pub(crate) fn encode_uuid_list(list: &[String]) -> Result<String, sqlx::Error> {
    serde_json::to_string(list).map_err(|e| sqlx::Error::Protocol(e.to_string()))
}
