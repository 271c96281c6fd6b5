//! Catalog store: the immutable item set the ranking engine reads from.
//!
//! The training pipeline emits a single JSON document; [`CatalogFile`] is its
//! wire format. [`CatalogFile::into_items`] validates it and produces typed
//! [`Item`]s, which [`CatalogSnapshot::build`] turns into a read-only snapshot
//! with every user-independent quantity precomputed.

use serde::Deserialize;
use std::collections::HashSet;

use crate::error::CatalogError;
use crate::models::{Item, ItemId};

pub mod snapshot;
pub mod source;

pub use snapshot::{CatalogSnapshot, SnapshotOptions};
pub use source::{CatalogSource, JsonFileSource};

/// One item as written by the training pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    pub features: Vec<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Catalog document produced by the offline feature pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    /// Index of the first genre one-hot column in every feature vector
    pub genre_offset: usize,
    /// Genre names in one-hot column order
    pub genre_vocabulary: Vec<String>,
    pub items: Vec<CatalogEntry>,
}

/// Validated catalog contents, ready to become a snapshot
#[derive(Debug, Clone)]
pub struct CatalogData {
    pub items: Vec<Item>,
    pub dimension: usize,
    pub genre_offset: usize,
    pub genre_vocabulary: Vec<String>,
}

fn clean_strings(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
        .collect()
}

impl CatalogData {
    /// Validates a set of items against the catalog-wide invariants
    ///
    /// Every vector must share the first item's dimension and the genre block
    /// must fit inside it. Non-finite feature values are zeroed and non-finite
    /// or negative popularity signals are dropped.
    pub fn new(
        mut items: Vec<Item>,
        genre_offset: usize,
        genre_vocabulary: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let dimension = match items.first() {
            Some(first) => first.features.len(),
            None => return Err(CatalogError::Empty),
        };

        let genre_end = genre_offset.checked_add(genre_vocabulary.len());
        if genre_end.map_or(true, |end| end > dimension) {
            return Err(CatalogError::GenreBlockOutOfRange {
                offset: genre_offset,
                end: genre_end.unwrap_or(usize::MAX),
                dimension,
            });
        }

        let mut ids = HashSet::new();
        for item in &mut items {
            if item.features.len() != dimension {
                return Err(CatalogError::DimensionMismatch {
                    id: item.id.0,
                    expected: dimension,
                    found: item.features.len(),
                });
            }
            if !ids.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id.0));
            }

            for value in item.features.iter_mut().filter(|v| !v.is_finite()) {
                *value = 0.0;
            }
            item.popularity = non_negative(item.popularity);
            item.vote_count = non_negative(item.vote_count);
        }

        Ok(Self {
            items,
            dimension,
            genre_offset,
            genre_vocabulary,
        })
    }
}

fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

impl CatalogFile {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Normalises entry strings and validates the resulting items
    pub fn into_items(self) -> Result<CatalogData, CatalogError> {
        let items = self
            .items
            .into_iter()
            .map(|entry| Item {
                id: ItemId(entry.id),
                title: entry.title.trim().to_string(),
                overview: entry.overview,
                features: entry.features,
                genres: clean_strings(entry.genres),
                services: clean_strings(entry.services),
                runtime: entry.runtime.filter(|r| *r > 0),
                year: entry.year,
                popularity: entry.popularity,
                vote_count: entry.vote_count,
                language: entry
                    .language
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty()),
            })
            .collect();

        let genre_vocabulary = self
            .genre_vocabulary
            .into_iter()
            .map(|g| g.trim().to_string())
            .collect();

        CatalogData::new(items, self.genre_offset, genre_vocabulary)
    }
}
