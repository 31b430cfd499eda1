//! Random pick and filtered listing over a catalog snapshot

use rand::Rng;
use til_types::{TilEntry, TilListResponse};

use super::cache::Catalog;

/// Uniform index source. Implementations must return a value in `0..len`.
pub trait RandomSource: Send + Sync {
    fn index(&self, len: usize) -> usize;
}

pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Parse a `categories=Go,Rust` query value.
///
/// Returns `None` (no filter) when the value is absent or holds no names.
pub fn parse_categories(raw: Option<&str>) -> Option<Vec<String>> {
    let categories: Vec<String> = raw?
        .split(',')
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .collect();

    if categories.is_empty() {
        None
    } else {
        Some(categories)
    }
}

fn matching<'a, 'f>(
    catalog: &'a Catalog,
    filter: Option<&'f [String]>,
) -> impl Iterator<Item = &'a TilEntry> {
    catalog.entries.iter().filter(move |entry| match filter {
        Some(categories) if !categories.is_empty() => categories.contains(&entry.category),
        _ => true,
    })
}

/// Pick one entry uniformly at random, optionally restricted to `filter` categories
pub fn pick_random<'a>(
    catalog: &'a Catalog,
    filter: Option<&[String]>,
    rng: &dyn RandomSource,
) -> Option<&'a TilEntry> {
    let candidates: Vec<&TilEntry> = matching(catalog, filter).collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.get(rng.index(candidates.len())).copied()
}

/// Filtered entries plus the catalog's full category list
pub fn list_filtered(catalog: &Catalog, filter: Option<&[String]>) -> TilListResponse {
    let entries: Vec<TilEntry> = matching(catalog, filter).cloned().collect();
    TilListResponse {
        total: entries.len(),
        entries,
        categories: catalog.categories.clone(),
    }
}
