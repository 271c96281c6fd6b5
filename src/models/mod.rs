use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

pub mod item;
pub mod mode;
pub mod signal;

pub use item::{Item, ItemId, ItemSummary, DEFAULT_RUNTIME, DEFAULT_YEAR};
pub use mode::{Mode, ModeParams, RuntimeBucket, ScoringWeights, YearBucket};
pub use signal::{FeedbackRecord, FeedbackSignal, RuntimeBounds, UserSignal};

/// A single ranked item returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(flatten)]
    pub item: ItemSummary,
    /// Combined score; `None` (JSON `null`) if it could not be computed
    pub score: Option<f64>,
    pub explanation: String,
}

/// Request body for `POST /api/recommendations`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: Option<String>,
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
    pub preferred_languages: BTreeSet<String>,
    pub runtime_min: Option<u32>,
    pub runtime_max: Option<u32>,
    pub mode: Option<String>,
    pub filter_genre: Option<String>,
    pub filter_service: Option<String>,
    pub year_bucket: Option<String>,
    pub runtime_bucket: Option<String>,
    pub k: Option<usize>,
}

impl RecommendationRequest {
    pub fn signal(&self) -> UserSignal {
        UserSignal {
            liked_ids: self.liked_ids.clone(),
            disliked_ids: self.disliked_ids.clone(),
            excluded_ids: self.excluded_ids.clone(),
            preferred_genres: self.preferred_genres.clone(),
            preferred_services: self.preferred_services.clone(),
            runtime_bounds: RuntimeBounds::new(self.runtime_min, self.runtime_max),
            preferred_languages: self.preferred_languages.clone(),
        }
    }

    pub fn mode_params(&self) -> ModeParams {
        ModeParams {
            filter_genre: self.filter_genre.clone(),
            filter_service: self.filter_service.clone(),
            year_bucket: self.year_bucket.clone(),
            runtime_bucket: self.runtime_bucket.clone(),
        }
    }
}

/// Response body for `POST /api/recommendations`
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    pub count: usize,
    pub user_id: String,
    pub mode: String,
}
