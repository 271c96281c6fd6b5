use chrono::{DateTime, Datelike, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap};

use crate::models::{Item, ItemId};

use super::CatalogData;

/// Reference year for the recency bonus
const RECENCY_BASE_YEAR: i32 = 1980;
/// Maximum recency bonus added to normalised popularity
const RECENCY_WEIGHT: f64 = 0.2;
/// Popularity assigned when the signal carries no information
pub const NEUTRAL_POPULARITY: f64 = 0.5;

/// Inputs to snapshot construction that are not part of the catalog itself
#[derive(Debug, Clone, Copy)]
pub struct SnapshotOptions {
    /// Upper end of the recency scale
    pub current_year: i32,
    /// Seed for the tie-break generator
    pub noise_seed: u64,
}

impl SnapshotOptions {
    pub fn new(noise_seed: u64) -> Self {
        Self {
            current_year: Utc::now().year(),
            noise_seed,
        }
    }
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Immutable, fully precomputed view of one catalog load
///
/// Built once and shared behind an `Arc`; nothing here depends on a user, so
/// any number of requests may read it concurrently. Reloading produces a new
/// snapshot rather than mutating this one.
#[derive(Debug)]
pub struct CatalogSnapshot {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
    dimension: usize,
    genre_vocabulary: Vec<String>,
    genre_positions: HashMap<String, usize>,
    norms: Vec<f64>,
    mean: Vec<f64>,
    popularity: Vec<f64>,
    noise: Vec<f64>,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn build(data: CatalogData, options: SnapshotOptions) -> Self {
        let CatalogData {
            items,
            dimension,
            genre_offset,
            genre_vocabulary,
        } = data;

        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id, i))
            .collect();

        let genre_positions = genre_vocabulary
            .iter()
            .enumerate()
            .map(|(j, genre)| (genre.to_lowercase(), genre_offset + j))
            .collect();

        let norms = items.iter().map(|item| l2_norm(&item.features)).collect();
        let mean = mean_vector(&items, dimension);
        let popularity = popularity_scores(&items, options.current_year);

        let mut rng = StdRng::seed_from_u64(options.noise_seed);
        let noise = (0..items.len()).map(|_| rng.gen::<f64>()).collect();

        tracing::info!(
            items = items.len(),
            dimension,
            genres = genre_vocabulary.len(),
            seed = options.noise_seed,
            "Catalog snapshot built"
        );

        Self {
            items,
            index,
            dimension,
            genre_vocabulary,
            genre_positions,
            norms,
            mean,
            popularity,
            noise,
            loaded_at: Utc::now(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.index_of(id).map(|i| &self.items[i])
    }

    pub fn genre_vocabulary(&self) -> &[String] {
        &self.genre_vocabulary
    }

    /// Feature column of a genre's one-hot slot, matched case-insensitively
    pub fn genre_position(&self, genre: &str) -> Option<usize> {
        self.genre_positions.get(&genre.trim().to_lowercase()).copied()
    }

    /// Distinct services across the catalog, sorted
    pub fn services(&self) -> Vec<String> {
        self.items
            .iter()
            .flat_map(|item| item.services.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn norms(&self) -> &[f64] {
        &self.norms
    }

    /// Element-wise mean of every feature vector
    pub fn mean_vector(&self) -> &[f64] {
        &self.mean
    }

    /// Normalised popularity with recency bonus, one value per item in `[0, 1]`
    pub fn popularity(&self) -> &[f64] {
        &self.popularity
    }

    /// Tie-break values in `[0, 1)`, fixed for the lifetime of the snapshot
    pub fn noise(&self) -> &[f64] {
        &self.noise
    }
}

pub(crate) fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn mean_vector(items: &[Item], dimension: usize) -> Vec<f64> {
    let mut mean = vec![0.0; dimension];
    if items.is_empty() {
        return mean;
    }
    for item in items {
        for (acc, value) in mean.iter_mut().zip(&item.features) {
            *acc += value;
        }
    }
    let n = items.len() as f64;
    mean.iter_mut().for_each(|v| *v /= n);
    mean
}

/// Min-max scales into `[0, 1]`; a flat or non-finite range maps to neutral
fn min_max(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= f64::EPSILON {
        return vec![NEUTRAL_POPULARITY; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

fn recency(year: i32, current_year: i32) -> f64 {
    let span = (current_year - RECENCY_BASE_YEAR) as f64;
    if span <= 0.0 {
        return 0.0;
    }
    ((year - RECENCY_BASE_YEAR) as f64 / span).clamp(0.0, 1.0)
}

/// Popularity column: `popularity` if any item has it, otherwise `vote_count`.
/// Items missing the chosen signal take the column minimum.
fn popularity_scores(items: &[Item], current_year: i32) -> Vec<f64> {
    let use_popularity = items.iter().any(|item| item.popularity.is_some());
    let raw: Vec<Option<f64>> = items
        .iter()
        .map(|item| {
            if use_popularity {
                item.popularity
            } else {
                item.vote_count
            }
        })
        .collect();

    let base = match raw.iter().flatten().copied().reduce(f64::min) {
        Some(floor) => min_max(&raw.iter().map(|r| r.unwrap_or(floor)).collect::<Vec<_>>()),
        None => vec![NEUTRAL_POPULARITY; items.len()],
    };

    let combined: Vec<f64> = items
        .iter()
        .zip(&base)
        .map(|(item, b)| b + recency(item.year_or_default(), current_year) * RECENCY_WEIGHT)
        .collect();

    min_max(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::test_item;

    fn options() -> SnapshotOptions {
        SnapshotOptions {
            current_year: 2025,
            noise_seed: 7,
        }
    }

    fn data(items: Vec<Item>) -> CatalogData {
        CatalogData::new(items, 2, vec!["Action".to_string(), "Comedy".to_string()]).unwrap()
    }

    fn sample_items() -> Vec<Item> {
        let mut a = test_item(1, &["Action"], Some(100));
        a.features = vec![1.0, 0.0, 1.0, 0.0];
        a.popularity = Some(10.0);
        a.year = Some(1990);
        let mut b = test_item(2, &["Comedy"], Some(95));
        b.features = vec![0.0, 1.0, 0.0, 1.0];
        b.popularity = Some(30.0);
        b.year = Some(2020);
        let mut c = test_item(3, &["Comedy"], Some(200));
        c.features = vec![1.0, 1.0, 0.0, 1.0];
        c.year = Some(2000);
        vec![a, b, c]
    }

    #[test]
    fn test_lookup_by_id_and_genre_position() {
        let snapshot = CatalogSnapshot::build(data(sample_items()), options());

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get(&ItemId(2)).unwrap().genres, vec!["Comedy"]);
        assert!(snapshot.get(&ItemId(99)).is_none());
        assert_eq!(snapshot.genre_position("COMEDY"), Some(3));
        assert_eq!(snapshot.genre_position("western"), None);
    }

    #[test]
    fn test_mean_vector() {
        let snapshot = CatalogSnapshot::build(data(sample_items()), options());
        let mean = snapshot.mean_vector();
        assert!((mean[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((mean[3] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_popularity_is_normalised_with_missing_values_at_floor() {
        let snapshot = CatalogSnapshot::build(data(sample_items()), options());
        let popularity = snapshot.popularity();

        assert!(popularity.iter().all(|p| (0.0..=1.0).contains(p)));
        // Most popular and most recent
        assert!((popularity[1] - 1.0).abs() < 1e-12);
        // Missing popularity takes the floor but is newer than item 1
        assert!(popularity[2] > popularity[0]);
    }

    #[test]
    fn test_vote_count_is_used_when_popularity_absent() {
        let mut items = sample_items();
        for item in &mut items {
            item.popularity = None;
            item.year = Some(2010);
        }
        items[0].vote_count = Some(5000.0);
        items[1].vote_count = Some(10.0);
        items[2].vote_count = Some(20.0);

        let snapshot = CatalogSnapshot::build(data(items), options());
        let popularity = snapshot.popularity();
        assert!((popularity[0] - 1.0).abs() < 1e-12);
        assert!(popularity[1].abs() < 1e-12);
    }

    #[test]
    fn test_flat_signal_is_neutral() {
        let mut items = sample_items();
        for item in &mut items {
            item.popularity = None;
            item.year = Some(2015);
        }
        let snapshot = CatalogSnapshot::build(data(items), options());
        assert!(snapshot.popularity().iter().all(|p| *p == NEUTRAL_POPULARITY));
    }

    #[test]
    fn test_noise_is_seeded() {
        let first = CatalogSnapshot::build(data(sample_items()), options());
        let second = CatalogSnapshot::build(data(sample_items()), options());
        assert_eq!(first.noise(), second.noise());
        assert!(first.noise().iter().all(|n| (0.0..1.0).contains(n)));

        let reseeded = CatalogSnapshot::build(
            data(sample_items()),
            SnapshotOptions {
                noise_seed: 8,
                ..options()
            },
        );
        assert_ne!(first.noise(), reseeded.noise());
    }

    #[test]
    fn test_non_finite_features_are_zeroed() {
        let mut items = sample_items();
        items[0].features[1] = f64::NAN;
        items[0].popularity = Some(f64::INFINITY);
        let data = data(items);
        assert_eq!(data.items[0].features[1], 0.0);
        assert_eq!(data.items[0].popularity, None);
    }

    #[test]
    fn test_services_are_distinct_and_sorted() {
        let mut items = sample_items();
        items[0].services = vec!["Netflix".to_string(), "Hulu".to_string()];
        items[1].services = vec!["Netflix".to_string()];
        let snapshot = CatalogSnapshot::build(data(items), options());
        assert_eq!(snapshot.services(), vec!["Hulu", "Netflix"]);
    }

    #[test]
    fn test_recency_is_clipped() {
        assert_eq!(recency(1950, 2025), 0.0);
        assert_eq!(recency(2030, 2025), 1.0);
        assert_eq!(recency(2000, 1980), 0.0);
    }
}
