// Fetch module.
// Typed, cancellable access to upstream resources through the shared cache.

pub mod hook;
pub mod state;
#[cfg(test)]
pub mod testing;

pub use hook::{FetchHandle, FetchHook};
pub use state::FetchState;
