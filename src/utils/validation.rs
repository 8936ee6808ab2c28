use anyhow::{anyhow, Result};

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(anyhow!("Coordinates must be finite numbers"));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(anyhow!("Latitude {} is out of range", latitude));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(anyhow!("Longitude {} is out of range", longitude));
    }

    Ok(())
}

/// Checks an identifier taken from a `/f` or `/c` command.
pub fn validate_item_uuid(uuid: &str) -> Result<()> {
    if uuid.is_empty() {
        return Err(anyhow!("Identifier cannot be empty"));
    }

    if uuid.len() > 64 {
        return Err(anyhow!("Identifier cannot be longer than 64 characters"));
    }

    if uuid.chars().any(char::is_whitespace) {
        return Err(anyhow!("Identifier cannot contain whitespace"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        assert!(validate_coordinates(55.7558, 37.6173).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_item_uuid() {
        assert!(validate_item_uuid("f123").is_ok());
        assert!(validate_item_uuid("").is_err());
        assert!(validate_item_uuid("a b").is_err());
        assert!(validate_item_uuid(&"x".repeat(65)).is_err());
    }
}
