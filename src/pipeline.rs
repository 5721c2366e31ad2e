//! Derivation of the visible list from the canonical collection and the
//! current filter state. Everything here is pure; the canonical order is
//! never touched.
use std::cmp::Reverse;

use crate::{FavoritesFilter, FilterState, Note, SortBy, TagFilter};

/// Case-insensitive substring match against title, content or any tag.
/// A blank query matches every note; otherwise surrounding whitespace is
/// part of the needle.
pub fn matches_search(note: &Note, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();

    note.title.to_lowercase().contains(&needle)
        || note.content.to_lowercase().contains(&needle)
        || note.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
}

pub fn matches_favorites(note: &Note, filter: FavoritesFilter) -> bool {
    match filter {
        FavoritesFilter::All => true,
        FavoritesFilter::Favorites => note.is_favorite,
    }
}

/// Exact, case-sensitive tag membership.
pub fn matches_tag(note: &Note, filter: &TagFilter) -> bool {
    match filter {
        TagFilter::All => true,
        TagFilter::Tag(tag) => note.has_tag(tag),
    }
}

pub fn is_visible(note: &Note, filter: &FilterState) -> bool {
    matches_search(note, &filter.search_query)
        && matches_favorites(note, filter.favorites)
        && matches_tag(note, &filter.tag)
}

/// Notes passing every filter, newest first by the chosen timestamp. Notes
/// with equal timestamps keep their canonical relative order.
pub fn visible_notes<'a>(notes: &'a [Note], filter: &FilterState) -> Vec<&'a Note> {
    let mut visible: Vec<&Note> = notes.iter().filter(|n| is_visible(n, filter)).collect();

    // sort_by_key is stable
    match filter.sort_by {
        SortBy::UpdatedAt => visible.sort_by_key(|n| Reverse(n.updated_at)),
        SortBy::CreatedAt => visible.sort_by_key(|n| Reverse(n.created_at)),
    }
    visible
}
