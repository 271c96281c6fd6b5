use std::time::Instant;

use crate::{
    catalog::CatalogSnapshot,
    models::{Mode, Recommendation, UserSignal},
    services::{diversity, explain, filter, profile, scoring},
};

/// Ranks the catalog for one user and returns at most `k` explained results
///
/// The pipeline is pure over the snapshot: profile, score every item, filter
/// in score order, diversify, explain. Identical inputs give identical output.
/// Preference strings are normalised here, so callers may pass raw input.
pub fn recommend(
    catalog: &CatalogSnapshot,
    signal: &UserSignal,
    mode: &Mode,
    k: usize,
) -> Vec<Recommendation> {
    let started = Instant::now();
    if catalog.is_empty() || k == 0 {
        return Vec::new();
    }

    let signal = signal.normalized();
    let profile = profile::build_profile(&signal, catalog);
    let scores = scoring::score_all(&profile.vector, catalog, &signal, mode);
    let mut eligible = filter::eligible(&scores, catalog, &signal, mode);
    let candidates: Vec<usize> = eligible
        .by_ref()
        .take(k.saturating_mul(filter::CANDIDATE_MULTIPLIER))
        .collect();
    let selected =
        diversity::diversify(&candidates, eligible, catalog, &signal.preferred_genres, k);

    let items = catalog.items();
    let recommendations: Vec<Recommendation> = selected
        .into_iter()
        .map(|index| {
            let item = &items[index];
            let score = scores[index];
            Recommendation {
                item: item.summary(),
                score: score.is_finite().then_some(score),
                explanation: explain::explain(item, &signal),
            }
        })
        .collect();

    tracing::info!(
        mode = %mode,
        profile = ?profile.source,
        candidates = candidates.len(),
        returned = recommendations.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Recommendations ranked"
    );

    recommendations
}
