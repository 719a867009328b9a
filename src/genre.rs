use std::collections::BTreeSet;

/// Genres every vocabulary starts with. These can never be deleted.
pub const DEFAULT_GENRES: [&str; 7] = [
    "Fiction",
    "Non-Fiction",
    "Mystery",
    "Science Fiction",
    "Fantasy",
    "Biography",
    "Self-Help",
];

pub fn is_default_genre(name: &str) -> bool {
    DEFAULT_GENRES.contains(&name)
}

/// The set of genre names offered when tagging books.
///
/// Removing a genre only affects the vocabulary; books that already carry
/// the tag keep it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreVocabulary {
    names: BTreeSet<String>,
}

impl Default for GenreVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl GenreVocabulary {
    pub fn new() -> Self {
        GenreVocabulary {
            names: DEFAULT_GENRES.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Rebuild from a persisted set. An empty set means "never customized".
    pub fn from_persisted(names: BTreeSet<String>) -> Self {
        if names.is_empty() {
            return Self::new();
        }
        GenreVocabulary { names }
    }

    /// Returns true if the genre was not known yet.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.names.insert(name.to_string())
    }

    /// Remove a custom genre. Default genres are kept.
    pub fn remove(&mut self, name: &str) -> bool {
        if is_default_genre(name) {
            return false;
        }
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_custom(&self, name: &str) -> bool {
        !is_default_genre(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }
}
