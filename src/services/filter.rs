use std::cmp::Ordering;

use crate::{
    catalog::CatalogSnapshot,
    models::{Mode, UserSignal},
};

/// How many candidates to collect per requested result
pub const CANDIDATE_MULTIPLIER: usize = 3;

/// Item indices ordered by descending score, ties broken by catalog order
pub fn rank_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}

/// Items the user may see, lazily in score order
///
/// Excluded, liked and disliked items are always dropped. The mode's hard
/// constraint is applied when it has one; stated preferences are not filtered
/// here since alignment already rewards them.
pub fn eligible<'a>(
    scores: &[f64],
    catalog: &'a CatalogSnapshot,
    signal: &'a UserSignal,
    mode: &'a Mode,
) -> impl Iterator<Item = usize> + 'a {
    let items = catalog.items();
    rank_order(scores).into_iter().filter(move |&index| {
        let item = &items[index];
        !signal.is_blocked(&item.id) && mode.admits(item)
    })
}

/// First `CANDIDATE_MULTIPLIER * k` eligible items
pub fn candidates(
    scores: &[f64],
    catalog: &CatalogSnapshot,
    signal: &UserSignal,
    mode: &Mode,
    k: usize,
) -> Vec<usize> {
    eligible(scores, catalog, signal, mode)
        .take(k.saturating_mul(CANDIDATE_MULTIPLIER))
        .collect()
}
