use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::capability::PlaceSearch;
use crate::place::{Coordinate, Place, Region};

/// Query that matches every place regardless of tags (the "❓" button).
pub const WILDCARD_QUERY: &str = "food";

/// Built-in dataset used when no `places.toml` exists.
const BUILTIN_PLACES: &str = include_str!("builtin_places.toml");

/// An offline place dataset loaded from a `[[place]]` TOML table.
#[derive(Debug, Clone, Default)]
pub struct PlaceBook {
    entries: Vec<PlaceEntry>,
}

#[derive(Debug, Clone)]
struct PlaceEntry {
    place: Place,
    tags: Vec<String>,
}

/// Intermediate struct that matches the TOML `[[place]]` table. Kept separate
/// from `Place` so the file schema can diverge from the session model.
#[derive(Debug, Deserialize)]
struct TomlPlaceFile {
    place: Vec<TomlPlace>,
}

#[derive(Debug, Deserialize)]
struct TomlPlace {
    /// Stable identifier; defaults to a slug of the name.
    #[serde(default)]
    id: String,
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: Vec<String>,
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

impl PlaceBook {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let file: TomlPlaceFile = toml::from_str(content)?;
        let entries = file
            .place
            .into_iter()
            .map(|p| {
                let id = if p.id.is_empty() { slugify(&p.name) } else { p.id };
                PlaceEntry {
                    place: Place::new(id, p.name, Coordinate::new(p.lat, p.lon)),
                    tags: p.tags,
                }
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// The compiled-in sample dataset (places around the default viewing
    /// center).
    pub fn builtin() -> anyhow::Result<Self> {
        Self::parse(BUILTIN_PLACES)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `PlaceSearch` over a `PlaceBook`: case-insensitive name substring or exact
/// tag match, filtered to the search region.
#[derive(Debug, Clone)]
pub struct LocalSearch {
    book: PlaceBook,
}

impl LocalSearch {
    pub fn new(book: PlaceBook) -> Self {
        Self { book }
    }

    fn matches(entry: &PlaceEntry, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        if query == WILDCARD_QUERY {
            return true;
        }
        entry.place.name.to_lowercase().contains(query)
            || entry.tags.iter().any(|t| t.eq_ignore_ascii_case(query))
    }
}

#[async_trait]
impl PlaceSearch for LocalSearch {
    async fn search(&self, query: &str, region: &Region) -> Vec<Place> {
        let query = query.trim().to_lowercase();
        let hits: Vec<Place> = self
            .book
            .entries
            .iter()
            .filter(|e| Self::matches(e, &query) && region.contains(e.place.coordinate))
            .map(|e| e.place.clone())
            .collect();
        debug!(query, hits = hits.len(), "local place search");
        hits
    }
}
