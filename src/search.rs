use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::bookmarks::Bookmark;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub score: u32,
}

/// Lowercases the terms and drops empty ones.
pub fn normalize_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Scores one bookmark: per term, +1 for a url hit, +2 for a title hit and
/// +1 more when the title starts with the term. `terms` must be lowercase.
pub fn score(bookmark: &Bookmark, terms: &[String]) -> u32 {
    let title = bookmark.title.to_lowercase();
    let url = bookmark.url.to_lowercase();

    let mut score = 0;
    for term in terms {
        if url.contains(term.as_str()) {
            score += 1;
        }
        if let Some(index) = title.find(term.as_str()) {
            score += 2;
            if index == 0 {
                score += 1;
            }
        }
    }
    score
}

/// Ranks `bmarks` against `terms`: highest score first, ties by title.
/// Bookmarks that match nothing are left out, and no terms means no results.
pub fn rank<S: AsRef<str>>(bmarks: &[Bookmark], terms: &[S]) -> Vec<SearchResult> {
    let terms = normalize_terms(terms);
    if terms.is_empty() {
        return vec![];
    }

    let mut results = bmarks
        .iter()
        .filter_map(|bookmark| {
            let score = score(bookmark, &terms);
            (score > 0).then(|| SearchResult {
                title: bookmark.title.clone(),
                url: bookmark.url.clone(),
                score,
            })
        })
        .collect::<Vec<_>>();

    results.sort_by(compare);
    results
}

// descending score, then case-folded title, then raw title and url for a total order
fn compare(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.url.cmp(&b.url))
}
