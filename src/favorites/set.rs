use std::collections::HashMap;

use crate::catalog::Movie;

/// Id-keyed favorites with insertion order for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesSet {
    items: Vec<Movie>,
    index: HashMap<u64, usize>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted list. Later duplicates of an id are dropped.
    pub fn from_items(items: Vec<Movie>) -> Self {
        let mut set = Self::new();
        for movie in items {
            set.insert(movie);
        }
        set
    }

    pub fn contains(&self, id: u64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<&Movie> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    /// Insert unless already present. Returns whether the set changed.
    pub fn insert(&mut self, movie: Movie) -> bool {
        if self.contains(movie.id) {
            return false;
        }
        self.index.insert(movie.id, self.items.len());
        self.items.push(movie);
        true
    }

    pub fn remove(&mut self, id: u64) -> Option<Movie> {
        let pos = self.index.remove(&id)?;
        let removed = self.items.remove(pos);
        for (i, movie) in self.items.iter().enumerate().skip(pos) {
            self.index.insert(movie.id, i);
        }
        Some(removed)
    }

    /// Remove if present, insert otherwise. Returns whether `movie` is
    /// favorited afterwards.
    pub fn toggle(&mut self, movie: Movie) -> bool {
        if self.remove(movie.id).is_some() {
            false
        } else {
            self.insert(movie)
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
