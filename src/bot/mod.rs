pub mod actions;
pub mod commands;
pub mod events;
pub mod formatter;
pub mod handlers;
pub mod keyboard;
pub mod router;
pub mod texts;
pub mod transport;
