use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

use super::ItemId;

/// Inclusive runtime window in minutes; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl RuntimeBounds {
    pub fn new(min: Option<u32>, max: Option<u32>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Self { min, max })
        }
    }

    pub fn contains(&self, runtime: u32) -> bool {
        self.min.map_or(true, |min| runtime >= min) && self.max.map_or(true, |max| runtime <= max)
    }
}

/// Stored feedback a user gave on a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSignal {
    /// Positive evidence, feeds the profile
    Like,
    /// Soft negative evidence
    Dislike,
    /// Hard exclusion, never recommended again
    NotInterested,
}

/// One persisted feedback row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub item_id: ItemId,
    pub signal: FeedbackSignal,
}

/// Everything the ranking engine knows about a user's taste
///
/// Absence is always the empty set. String preferences are compared
/// case-insensitively; [`UserSignal::normalized`] lowercases them once so the
/// pipeline can use plain set lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSignal {
    #[serde(default)]
    pub liked_ids: HashSet<ItemId>,
    #[serde(default)]
    pub disliked_ids: HashSet<ItemId>,
    #[serde(default)]
    pub excluded_ids: HashSet<ItemId>,
    #[serde(default)]
    pub preferred_genres: BTreeSet<String>,
    #[serde(default)]
    pub preferred_services: BTreeSet<String>,
    #[serde(default)]
    pub runtime_bounds: Option<RuntimeBounds>,
    #[serde(default)]
    pub preferred_languages: BTreeSet<String>,
}

fn lowercase_set(values: &BTreeSet<String>) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

impl UserSignal {
    /// Assembles the id sets from stored feedback; the latest row per item wins
    pub fn from_feedback(records: &[FeedbackRecord]) -> Self {
        let mut latest: HashMap<ItemId, FeedbackSignal> = HashMap::new();
        for record in records {
            latest.insert(record.item_id, record.signal);
        }

        let mut signal = Self::default();
        for (item_id, feedback) in latest {
            match feedback {
                FeedbackSignal::Like => signal.liked_ids.insert(item_id),
                FeedbackSignal::Dislike => signal.disliked_ids.insert(item_id),
                FeedbackSignal::NotInterested => signal.excluded_ids.insert(item_id),
            };
        }
        signal
    }

    pub fn with_preferred_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_preferred_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_services = services.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_runtime_bounds(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.runtime_bounds = RuntimeBounds::new(min, max);
        self
    }

    /// Copy with every string preference trimmed and lowercased
    pub fn normalized(&self) -> Self {
        Self {
            liked_ids: self.liked_ids.clone(),
            disliked_ids: self.disliked_ids.clone(),
            excluded_ids: self.excluded_ids.clone(),
            preferred_genres: lowercase_set(&self.preferred_genres),
            preferred_services: lowercase_set(&self.preferred_services),
            runtime_bounds: self.runtime_bounds,
            preferred_languages: lowercase_set(&self.preferred_languages),
        }
    }

    /// True when the item must never be returned to this user
    pub fn is_blocked(&self, id: &ItemId) -> bool {
        self.excluded_ids.contains(id) || self.liked_ids.contains(id) || self.disliked_ids.contains(id)
    }

    pub fn prefers_genre(&self, genre: &str) -> bool {
        self.preferred_genres.contains(&genre.to_lowercase())
    }

    pub fn prefers_service(&self, service: &str) -> bool {
        self.preferred_services.contains(&service.to_lowercase())
    }

    pub fn prefers_language(&self, language: &str) -> bool {
        self.preferred_languages.contains(&language.to_lowercase())
    }
}
