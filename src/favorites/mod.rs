//! Favorites projection store.

mod set;
mod store;

pub use set::FavoritesSet;
pub use store::FavoritesStore;
