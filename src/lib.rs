//! # Cinema Catalog Bot
//!
//! A Telegram bot for browsing a catalog of films and cinemas.
//!
//! ## Features
//! - Genre menus and ranked film lists
//! - Film and cinema cards with inline actions
//! - Nearby cinemas sorted by distance from a shared location
//! - Per-user favourite films
//! - Inline search from any chat
//! - Persistent storage with SQLite

/// Event routing, reply formatting and Telegram handlers
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Catalog records, the store seam and the SQLite implementation
pub mod database;
/// Favourites, distances and the health endpoint
pub mod services;
/// Utility functions for logging, escaping and validation
pub mod utils;
