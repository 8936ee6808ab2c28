pub mod favourites;
pub mod geo;
pub mod health;
