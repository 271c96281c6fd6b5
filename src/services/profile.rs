use crate::{catalog::CatalogSnapshot, models::UserSignal};

/// Share of the liked-items centroid in a blended profile
const LIKED_WEIGHT: f64 = 0.8;
/// Share of the stated-genre vector in a blended profile
const GENRE_WEIGHT: f64 = 0.2;

/// Which evidence a profile was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    /// Liked items blended with stated genres
    Blended,
    /// Liked items only
    Liked,
    /// Stated genres only
    Genres,
    /// Catalog mean, no usable evidence
    ColdStart,
}

/// A user's taste as a point in the catalog feature space
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub vector: Vec<f64>,
    pub source: ProfileSource,
}

/// Builds the profile vector for a signal
///
/// Liked items are averaged; preferred genres become one-hot weights on the
/// genre columns. When both exist they are blended 0.8/0.2 so stated
/// preferences always count. Without either the catalog mean is used, so every
/// user gets a profile. Unknown ids and genres contribute nothing.
pub fn build_profile(signal: &UserSignal, catalog: &CatalogSnapshot) -> Profile {
    let liked = liked_centroid(signal, catalog);
    let genres = genre_boost(signal, catalog);

    let (vector, source) = match (liked, genres) {
        (Some(base), Some(boost)) => {
            let blended = base
                .iter()
                .zip(&boost)
                .map(|(b, g)| LIKED_WEIGHT * b + GENRE_WEIGHT * g)
                .collect();
            (blended, ProfileSource::Blended)
        }
        (Some(base), None) => (base, ProfileSource::Liked),
        (None, Some(boost)) => (boost, ProfileSource::Genres),
        (None, None) => (catalog.mean_vector().to_vec(), ProfileSource::ColdStart),
    };

    tracing::debug!(
        source = ?source,
        liked = signal.liked_ids.len(),
        preferred_genres = signal.preferred_genres.len(),
        "Profile built"
    );

    Profile { vector, source }
}

fn liked_centroid(signal: &UserSignal, catalog: &CatalogSnapshot) -> Option<Vec<f64>> {
    let mut indices: Vec<usize> = signal
        .liked_ids
        .iter()
        .filter_map(|id| {
            let index = catalog.index_of(id);
            if index.is_none() {
                tracing::debug!(item_id = %id, "Liked item not in catalog, skipping");
            }
            index
        })
        .collect();
    if indices.is_empty() {
        return None;
    }
    // Fixed summation order keeps the profile bit-identical across calls
    indices.sort_unstable();

    let items = catalog.items();
    let mut centroid = vec![0.0; catalog.dimension()];
    for &i in &indices {
        for (acc, value) in centroid.iter_mut().zip(&items[i].features) {
            *acc += value;
        }
    }
    let n = indices.len() as f64;
    centroid.iter_mut().for_each(|v| *v /= n);
    Some(centroid)
}

fn genre_boost(signal: &UserSignal, catalog: &CatalogSnapshot) -> Option<Vec<f64>> {
    if signal.preferred_genres.is_empty() {
        return None;
    }

    let mut boost = vec![0.0; catalog.dimension()];
    let mut matched = 0;
    for genre in &signal.preferred_genres {
        if let Some(position) = catalog.genre_position(genre) {
            boost[position] = 1.0;
            matched += 1;
        }
    }

    if matched == 0 {
        None
    } else {
        Some(boost)
    }
}
