// Cache module.
// In-memory response cache shared by every fetch, plus platform directory paths.

pub mod paths;
pub mod swr;

pub use swr::{FetchCache, SharedState};
