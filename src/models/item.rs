use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Year assumed for items whose release year is unknown
pub const DEFAULT_YEAR: i32 = 2000;
/// Runtime in minutes assumed for items whose runtime is unknown
pub const DEFAULT_RUNTIME: u32 = 120;

/// Stable identifier of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A catalog item with its precomputed feature vector
///
/// Items are immutable once the catalog is built. Genre and service strings
/// are trimmed on load; comparisons against user preferences are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub overview: Option<String>,
    pub features: Vec<f64>,
    pub genres: Vec<String>,
    pub services: Vec<String>,
    pub runtime: Option<u32>,
    pub year: Option<i32>,
    pub popularity: Option<f64>,
    pub vote_count: Option<f64>,
    pub language: Option<String>,
}

impl Item {
    /// Release year, falling back to [`DEFAULT_YEAR`]
    pub fn year_or_default(&self) -> i32 {
        self.year.unwrap_or(DEFAULT_YEAR)
    }

    /// Runtime in minutes, falling back to [`DEFAULT_RUNTIME`]
    pub fn runtime_or_default(&self) -> u32 {
        self.runtime.filter(|r| *r > 0).unwrap_or(DEFAULT_RUNTIME)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g.eq_ignore_ascii_case(genre))
    }

    pub fn has_service(&self, service: &str) -> bool {
        self.services.iter().any(|s| s.eq_ignore_ascii_case(service))
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary::from(self)
    }
}

/// Client-facing view of an item, without the feature vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSummary {
    pub id: ItemId,
    pub title: String,
    pub year: i32,
    pub runtime: u32,
    pub overview: String,
    pub genres: Vec<String>,
    pub services: Vec<String>,
    pub language: Option<String>,
}

impl From<&Item> for ItemSummary {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            year: item.year_or_default(),
            runtime: item.runtime_or_default(),
            overview: item.overview.clone().unwrap_or_default(),
            genres: item.genres.clone(),
            services: item.services.clone(),
            language: item.language.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_item(id: u64, genres: &[&str], runtime: Option<u32>) -> Item {
    Item {
        id: ItemId(id),
        title: format!("Movie {}", id),
        overview: None,
        features: vec![0.0; 4],
        genres: genres.iter().map(|g| g.to_string()).collect(),
        services: Vec::new(),
        runtime,
        year: Some(2015),
        popularity: None,
        vote_count: None,
        language: None,
    }
}
