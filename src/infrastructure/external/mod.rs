//! External service adapters.

pub mod keydb;
pub mod tmdb;
