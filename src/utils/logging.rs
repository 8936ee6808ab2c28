use tracing::{debug, error, info, warn};

/// Logs the start of an inbound event with consistent format
pub fn log_event_start(event: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "EVENT_START: {} by {}({}) in chat {} - {}",
            event, user, user_id, chat_id, d
        ),
        None => info!(
            "EVENT_START: {} by {}({}) in chat {}",
            event, user, user_id, chat_id
        ),
    }
}

/// Logs a handled event with consistent format
pub fn log_event_success(event: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "EVENT_SUCCESS: {} for {} in chat {} - {}",
            event, user_id, chat_id, d
        ),
        None => info!("EVENT_SUCCESS: {} for {} in chat {}", event, user_id, chat_id),
    }
}

/// Logs an event that was dropped without a reply
pub fn log_event_dropped(event: &str, user_id: i64, reason: &str) {
    warn!("EVENT_DROPPED: {} for {} - {}", event, user_id, reason);
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    match details {
        Some(d) => error!("DB_ERROR: {} on {} failed: {} - {}", operation, table, error, d),
        None => error!("DB_ERROR: {} on {} failed: {}", operation, table, error),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
