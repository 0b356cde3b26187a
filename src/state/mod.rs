// State management module.
// Views for each tab plus the shared console the views report into.

pub mod console;
pub mod pokedex;
pub mod posts;

pub use console::{Console, ConsoleLevel};
pub use pokedex::{Card, ItemRender, ItemView, ListRender, ListView};
pub use posts::{PostsRender, PostsView};
