// REST API module.
// Provides the HTTP fetcher and the record types served by PokeAPI and JSONPlaceholder.

pub mod client;
pub mod types;

pub use client::{ApiClient, Fetcher};
pub use types::*;
