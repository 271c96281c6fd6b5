//! Genre coverage and concentration control
//!
//! Runs after filtering on the score-ordered candidate list. The coverage pass
//! guarantees one seed per preferred genre where the candidates allow it; the
//! cap pass then limits any single primary genre to half the result.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{catalog::CatalogSnapshot, models::Item};

/// Largest share of the result one genre may take
const MAX_GENRE_SHARE: f64 = 0.5;
/// Floor for the per-genre cap so small result sizes stay fillable
const MIN_GENRE_CAP: usize = 3;

pub fn max_per_genre(k: usize) -> usize {
    ((k as f64 * MAX_GENRE_SHARE).ceil() as usize).max(MIN_GENRE_CAP)
}

/// Genre an item counts against: its first preferred genre, else its first genre
pub fn primary_genre(item: &Item, preferred: &BTreeSet<String>) -> Option<String> {
    let lowered: Vec<String> = item.genres.iter().map(|g| g.to_lowercase()).collect();
    lowered
        .iter()
        .find(|g| preferred.contains(*g))
        .or_else(|| lowered.first())
        .cloned()
}

/// Selects at most `k` items from score-ordered candidates
///
/// `preferred_genres` must be lowercased. With no preferred genres this is
/// the plain top-k. Coverage seeds are always admitted and count against the
/// genre they cover. When the cap leaves the result short, further eligible
/// items are drawn from `reserve`, which must continue the same score order.
/// The result is returned in score order.
pub fn diversify<I>(
    candidates: &[usize],
    reserve: I,
    catalog: &CatalogSnapshot,
    preferred_genres: &BTreeSet<String>,
    k: usize,
) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    if preferred_genres.is_empty() {
        return candidates.iter().copied().chain(reserve).take(k).collect();
    }

    let items = catalog.items();

    // Coverage pass: positions into `candidates`, in score order
    let mut uncovered: BTreeSet<&String> = preferred_genres.iter().collect();
    let mut seeds: Vec<(usize, String)> = Vec::new();
    for (position, &index) in candidates.iter().enumerate() {
        if uncovered.is_empty() || seeds.len() >= k {
            break;
        }
        let Some(genre) = uncovered
            .iter()
            .find(|genre| items[index].has_genre(genre))
            .copied()
        else {
            continue;
        };
        uncovered.remove(genre);
        seeds.push((position, genre.clone()));
    }

    let cap = max_per_genre(k);
    let mut counts: HashMap<String, usize> = HashMap::new();
    // (rank, catalog index); reserve items rank after every candidate
    let mut selected: Vec<(usize, usize)> = Vec::with_capacity(k);
    for (position, genre) in &seeds {
        *counts.entry(genre.clone()).or_insert(0) += 1;
        selected.push((*position, candidates[*position]));
    }

    // Cap pass
    let seed_set: HashSet<usize> = seeds.iter().map(|(position, _)| *position).collect();
    let rest = candidates
        .iter()
        .copied()
        .enumerate()
        .filter(|(position, _)| !seed_set.contains(position))
        .chain(
            reserve
                .into_iter()
                .enumerate()
                .map(|(offset, index)| (candidates.len() + offset, index)),
        );
    for (rank, index) in rest {
        if selected.len() >= k {
            break;
        }
        let Some(genre) = primary_genre(&items[index], preferred_genres) else {
            continue;
        };
        let count = counts.entry(genre).or_insert(0);
        if *count < cap {
            *count += 1;
            selected.push((rank, index));
        }
    }

    tracing::debug!(
        seeds = seeds.len(),
        uncovered = uncovered.len(),
        cap,
        selected = selected.len(),
        from_reserve = selected.iter().filter(|(rank, _)| *rank >= candidates.len()).count(),
        "Diversification applied"
    );

    selected.sort_unstable_by_key(|&(rank, _)| rank);
    selected.into_iter().map(|(_, index)| index).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogData, SnapshotOptions};
    use crate::models::item::test_item;

    const NO_RESERVE: Option<usize> = None;

    fn preferred(genres: &[&str]) -> BTreeSet<String> {
        genres.iter().map(|g| g.to_string()).collect()
    }

    fn catalog(genres: &[&[&str]]) -> CatalogSnapshot {
        let items = genres
            .iter()
            .enumerate()
            .map(|(i, g)| test_item(i as u64 + 1, g, Some(100)))
            .collect();
        let data = CatalogData::new(items, 0, vec![]).unwrap();
        CatalogSnapshot::build(data, SnapshotOptions::default())
    }

    #[test]
    fn test_cap_values() {
        assert_eq!(max_per_genre(1), 3);
        assert_eq!(max_per_genre(6), 3);
        assert_eq!(max_per_genre(7), 4);
        assert_eq!(max_per_genre(20), 10);
    }

    #[test]
    fn test_no_preferences_is_plain_top_k() {
        let catalog = catalog(&[&["Drama"], &["Drama"], &["Drama"], &["Drama"], &["Drama"]]);
        let candidates = vec![4, 2, 0, 1, 3];
        let result = diversify(&candidates, NO_RESERVE, &catalog, &BTreeSet::new(), 3);
        assert_eq!(result, vec![4, 2, 0]);
    }

    #[test]
    fn test_primary_genre_prefers_matching_genre() {
        let item = test_item(1, &["Action", "Comedy"], Some(100));
        assert_eq!(primary_genre(&item, &preferred(&["comedy"])), Some("comedy".to_string()));
        assert_eq!(primary_genre(&item, &preferred(&["drama"])), Some("action".to_string()));
        let bare = test_item(2, &[], Some(100));
        assert_eq!(primary_genre(&bare, &preferred(&["drama"])), None);
    }

    #[test]
    fn test_coverage_seeds_every_preferred_genre() {
        // Eight comedies outrank the only horror title
        let mut genres: Vec<&[&str]> = vec![&["Comedy"]; 8];
        genres.push(&["Horror"]);
        let catalog = catalog(&genres);
        let candidates: Vec<usize> = (0..9).collect();

        let result = diversify(&candidates, NO_RESERVE, &catalog, &preferred(&["comedy", "horror"]), 4);
        assert_eq!(result.len(), 4);
        assert!(result.contains(&8));
        assert_eq!(result, vec![0, 1, 2, 8]);
    }

    #[test]
    fn test_cap_limits_genre_concentration() {
        let mut genres: Vec<&[&str]> = vec![&["Comedy"]; 10];
        genres.extend(vec![&["Drama"] as &[&str]; 5]);
        let catalog = catalog(&genres);
        let candidates: Vec<usize> = (0..15).collect();

        let result = diversify(&candidates, NO_RESERVE, &catalog, &preferred(&["comedy"]), 6);
        assert_eq!(result.len(), 6);
        let comedies = result.iter().filter(|&&i| i < 10).count();
        assert_eq!(comedies, max_per_genre(6));
    }

    #[test]
    fn test_items_without_genres_are_skipped() {
        let catalog = catalog(&[&[], &["Comedy"], &[]]);
        let result = diversify(&[0, 1, 2], NO_RESERVE, &catalog, &preferred(&["comedy"]), 3);
        assert_eq!(result, vec![1]);
    }

    #[test]
    fn test_each_item_seeds_one_genre() {
        let catalog = catalog(&[&["Comedy", "Horror"], &["Horror"], &["Comedy"]]);
        let result = diversify(&[0, 1, 2], NO_RESERVE, &catalog, &preferred(&["comedy", "horror"]), 2);
        // Item 0 seeds comedy only, so item 1 is needed for horror
        assert_eq!(result, vec![0, 1]);
    }

    #[test]
    fn test_seeds_survive_a_shared_primary_genre() {
        // Every seed is also a comedy; the war title must still make the cut
        let catalog = catalog(&[
            &["Comedy"],
            &["Comedy", "Action"],
            &["Comedy", "Horror"],
            &["Comedy", "War"],
            &["Drama"],
            &["Drama"],
            &["Drama"],
        ]);
        let candidates: Vec<usize> = (0..7).collect();
        let result = diversify(
            &candidates,
            NO_RESERVE,
            &catalog,
            &preferred(&["comedy", "action", "horror", "war"]),
            6,
        );

        assert_eq!(result.len(), 6);
        assert_eq!(&result[..4], &[0, 1, 2, 3]);
    }

    #[test]
    fn test_reserve_fills_result_after_cap() {
        let mut genres: Vec<&[&str]> = vec![&["Comedy"]; 18];
        genres.extend(vec![&["Drama"] as &[&str]; 6]);
        let catalog = catalog(&genres);
        let candidates: Vec<usize> = (0..18).collect();

        let result = diversify(&candidates, 18..24, &catalog, &preferred(&["comedy"]), 6);
        assert_eq!(result, vec![0, 1, 2, 18, 19, 20]);
    }

    #[test]
    fn test_reserve_unused_when_candidates_suffice() {
        let catalog = catalog(&[&["Comedy"], &["Drama"], &["Horror"], &["War"]]);
        let result = diversify(&[0, 1], 2..4, &catalog, &preferred(&["comedy"]), 2);
        assert_eq!(result, vec![0, 1]);
    }
}
