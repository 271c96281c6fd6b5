use crate::models::{Item, UserSignal};

const SEPARATOR: &str = " • ";

/// Human-readable reason an item was recommended
///
/// Reasons appear in fixed priority order: matching genres, matching
/// services, similarity to liked items. The popularity fallback is used only
/// when none of those apply.
pub fn explain(item: &Item, signal: &UserSignal) -> String {
    let mut reasons = Vec::new();

    let genres: Vec<&str> = item
        .genres
        .iter()
        .filter(|g| signal.prefers_genre(g))
        .map(String::as_str)
        .collect();
    if !genres.is_empty() {
        reasons.push(format!("Matches your preferred genres: {}", genres.join(", ")));
    }

    let services: Vec<&str> = item
        .services
        .iter()
        .filter(|s| signal.prefers_service(s))
        .map(String::as_str)
        .collect();
    if !services.is_empty() {
        reasons.push(format!("Available on {}", services.join(", ")));
    }

    if !signal.liked_ids.is_empty() {
        reasons.push("Similar to movies you've liked".to_string());
    }

    if reasons.is_empty() {
        let top: Vec<&str> = item.genres.iter().take(2).map(String::as_str).collect();
        if top.is_empty() {
            reasons.push("Popular movie".to_string());
        } else {
            reasons.push(format!("Popular {} movie", top.join(", ")));
        }
    }

    reasons.join(SEPARATOR)
}
