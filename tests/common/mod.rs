#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::{json, Value};

use cinematch_api::catalog::{CatalogFile, CatalogSnapshot, SnapshotOptions};

pub const GENRES: [&str; 5] = ["Action", "Comedy", "Drama", "Sci-Fi", "Horror"];
pub const GENRE_OFFSET: usize = 2;
pub const CATALOG_SIZE: u64 = 30;

/// Item `i` has primary genre `GENRES[i % 5]`; every seventh item is also a drama
pub fn catalog_json(size: u64) -> Value {
    let items: Vec<Value> = (0..size)
        .map(|i| {
            let mut genres = vec![GENRES[(i % 5) as usize]];
            if i % 7 == 0 && genres[0] != "Drama" {
                genres.push("Drama");
            }

            let mut features = vec![(i as f64 * 0.37).sin(), (i as f64 * 0.53).cos()];
            for genre in GENRES {
                features.push(if genres.contains(&genre) { 1.0 } else { 0.0 });
            }

            let mut services = vec![if i % 2 == 0 { "Netflix" } else { "Hulu" }];
            if i % 3 == 0 {
                services.push("Max");
            }

            json!({
                "id": i + 1,
                "title": format!("Movie {}", i + 1),
                "overview": format!("Overview of movie {}", i + 1),
                "features": features,
                "genres": genres,
                "services": services,
                "runtime": 80 + (i * 7) % 100,
                "year": 1975 + (i as i32) * 2,
                "popularity": ((i * 13) % 50) as f64,
                "language": if i % 4 == 0 { "fr" } else { "en" },
            })
        })
        .collect();

    json!({
        "genre_offset": GENRE_OFFSET,
        "genre_vocabulary": GENRES,
        "items": items,
    })
}

pub fn snapshot_from(value: &Value) -> CatalogSnapshot {
    let data = CatalogFile::from_json(&value.to_string())
        .unwrap()
        .into_items()
        .unwrap();
    CatalogSnapshot::build(data, SnapshotOptions::default())
}

pub fn snapshot() -> CatalogSnapshot {
    snapshot_from(&catalog_json(CATALOG_SIZE))
}

pub fn temp_catalog_path() -> PathBuf {
    std::env::temp_dir().join(format!("cinematch-test-{}.json", uuid::Uuid::new_v4()))
}

pub fn write_catalog(path: &PathBuf, value: &Value) {
    std::fs::write(path, value.to_string()).unwrap();
}
