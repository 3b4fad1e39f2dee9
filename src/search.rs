//! Item lookup by id, name or scanned barcode, and id allocation for new items.

use crate::error::{Result, StockOpnameError};
use crate::schema::Item;
use log::debug;
use serde::Serialize;

pub const SCORE_EXACT: u32 = 1000;
pub const SCORE_PREFIX: u32 = 500;
pub const SCORE_CONTAINS: u32 = 100;
pub const SCORE_FUZZY: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub item: &'a Item,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SearchOutcome<'a> {
    /// A single candidate, or an exact id/name match ranked first.
    Selected(&'a Item),
    Choices(Vec<SearchHit<'a>>),
    NotFound,
}

/// Scores every item against the query; zero-stock items are included.
pub fn search_items<'a>(items: &'a [Item], query: &str) -> Vec<SearchHit<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit<'a>> = items
        .iter()
        .filter_map(|item| {
            let score = score_item(item, &query);
            (score > 0).then_some(SearchHit { item, score })
        })
        .collect();

    // Stable, so equal scores keep master order.
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    debug!("Search '{}' matched {} item(s)", query, hits.len());
    hits
}

pub fn lookup<'a>(items: &'a [Item], query: &str) -> SearchOutcome<'a> {
    let hits = search_items(items, query);
    let selected = match hits.first() {
        None => return SearchOutcome::NotFound,
        Some(top) if hits.len() == 1 || top.score == SCORE_EXACT => Some(top.item),
        Some(_) => None,
    };

    match selected {
        Some(item) => SearchOutcome::Selected(item),
        None => SearchOutcome::Choices(hits),
    }
}

fn score_item(item: &Item, query: &str) -> u32 {
    let id = item.id.to_lowercase();
    let nama = item.nama.to_lowercase();

    if id == query || nama == query {
        SCORE_EXACT
    } else if id.starts_with(query) || nama.starts_with(query) {
        SCORE_PREFIX
    } else if id.contains(query) || nama.contains(query) {
        SCORE_CONTAINS
    } else if fuzzy_match(query, &nama) || fuzzy_match(query, &id) {
        SCORE_FUZZY
    } else {
        0
    }
}

/// True when the query's characters appear in order within the target, ignoring
/// whitespace, dashes and underscores.
pub fn fuzzy_match(query: &str, target: &str) -> bool {
    let is_separator = |c: &char| c.is_whitespace() || *c == '-' || *c == '_';
    let mut wanted = query.chars().filter(|c| !is_separator(c)).peekable();

    for c in target.chars().filter(|c| !is_separator(c)) {
        match wanted.peek() {
            Some(&w) if w == c => {
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }

    wanted.peek().is_none()
}

/// Next free id for a category initial: the first gap in the existing sequence, or one
/// past the highest number.
pub fn next_item_id(items: &[Item], initial: &str) -> Result<String> {
    let initial = initial.trim();
    if initial.is_empty() {
        return Err(StockOpnameError::validation(
            "kategori",
            "category initial must not be empty",
        ));
    }

    let prefix = format!("{}-", initial);
    let mut numbers: Vec<u32> = items
        .iter()
        .filter_map(|item| item.id.strip_prefix(&prefix))
        .filter_map(|rest| rest.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .collect();
    numbers.sort_unstable();
    numbers.dedup();

    let next = numbers
        .iter()
        .zip(1u32..)
        .find(|(n, expected)| **n != *expected)
        .map(|(_, expected)| expected)
        .unwrap_or(numbers.len() as u32 + 1);

    Ok(format!("{}{:04}", prefix, next))
}
