//! Disc identification core.
//!
//! Turns a physical optical disc into a structured, reviewed rip specification:
//! fingerprinting, scan parsing, TMDB identification, episode mapping.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;
