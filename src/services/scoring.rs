use std::collections::BTreeSet;

use crate::{
    catalog::{snapshot::l2_norm, CatalogSnapshot},
    models::{Item, Mode, ScoringWeights, UserSignal},
};

const GENRE_ALIGNMENT: f64 = 0.50;
const SERVICE_ALIGNMENT: f64 = 0.25;
const RUNTIME_ALIGNMENT: f64 = 0.15;
const LANGUAGE_ALIGNMENT: f64 = 0.10;

/// Score components for one item, kept for logging and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub similarity: f64,
    pub alignment: f64,
    pub popularity: f64,
    pub noise: f64,
}

impl ScoreBreakdown {
    /// Weighted sum; a non-finite result collapses to 0
    pub fn combine(&self, weights: &ScoringWeights) -> f64 {
        let total = weights.similarity * self.similarity
            + weights.alignment * self.alignment
            + weights.popularity * self.popularity
            + weights.noise * self.noise;
        if total.is_finite() {
            total
        } else {
            0.0
        }
    }
}

/// Cosine similarity with precomputed norms, clamped to `[-1, 1]`
///
/// Zero vectors and non-finite intermediate values yield 0.
pub fn cosine_similarity(a: &[f64], a_norm: f64, b: &[f64], b_norm: f64) -> f64 {
    if a.len() != b.len() || a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let sim = dot / (a_norm * b_norm);
    if sim.is_finite() {
        sim.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// How well an item matches the user's stated preferences, in `[0, 1]`
///
/// Expects a signal whose string sets are already lowercased.
pub fn alignment(item: &Item, signal: &UserSignal) -> f64 {
    let mut score = 0.0;

    let item_genres: BTreeSet<String> = item.genres.iter().map(|g| g.to_lowercase()).collect();
    score += GENRE_ALIGNMENT * jaccard(&item_genres, &signal.preferred_genres);

    if item.services.iter().any(|s| signal.prefers_service(s)) {
        score += SERVICE_ALIGNMENT;
    }

    score += match (signal.runtime_bounds, item.runtime) {
        (None, _) => RUNTIME_ALIGNMENT,
        (Some(_), None) => RUNTIME_ALIGNMENT / 2.0,
        (Some(bounds), Some(runtime)) if bounds.contains(runtime) => RUNTIME_ALIGNMENT,
        (Some(_), Some(_)) => 0.0,
    };

    if item
        .language
        .as_deref()
        .is_some_and(|language| signal.prefers_language(language))
    {
        score += LANGUAGE_ALIGNMENT;
    }

    score.clamp(0.0, 1.0)
}

/// Component scores for the item at `index`
pub fn breakdown(
    profile: &[f64],
    profile_norm: f64,
    catalog: &CatalogSnapshot,
    signal: &UserSignal,
    index: usize,
) -> ScoreBreakdown {
    let item = &catalog.items()[index];
    ScoreBreakdown {
        similarity: cosine_similarity(profile, profile_norm, &item.features, catalog.norms()[index]),
        alignment: alignment(item, signal),
        popularity: catalog.popularity()[index],
        noise: catalog.noise()[index],
    }
}

/// Scores every catalog item against the profile, in catalog order
pub fn score_all(
    profile: &[f64],
    catalog: &CatalogSnapshot,
    signal: &UserSignal,
    mode: &Mode,
) -> Vec<f64> {
    let weights = mode.weights();
    let profile_norm = l2_norm(profile);

    (0..catalog.len())
        .map(|index| breakdown(profile, profile_norm, catalog, signal, index).combine(&weights))
        .collect()
}
