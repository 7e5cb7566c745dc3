//! Cyclic search over the rows of the current [`DisplayTree`].

use crate::tree::{DisplayRow, DisplayTree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Typing: stay on the current row if it still matches.
    Incremental,
    /// Submit: always move past the current row.
    Advance,
}

/// Case-insensitive match on the node name, or on the full path once the
/// query contains a `/`. The server row never matches.
pub fn row_matches(row: &DisplayRow, needle: &str) -> bool {
    let Some(path) = row.path.as_ref() else {
        return false;
    };
    let haystack = if needle.contains('/') {
        path.as_str()
    } else {
        row.name.as_str()
    };
    haystack.to_lowercase().contains(needle)
}

/// Index of the next matching row starting from `selected`, wrapping around.
pub fn find_match(
    rows: &[DisplayRow],
    selected: usize,
    query: &str,
    mode: SearchMode,
) -> Option<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || rows.is_empty() {
        return None;
    }
    let selected = selected.min(rows.len() - 1);
    if mode == SearchMode::Incremental && row_matches(&rows[selected], &needle) {
        return Some(selected);
    }
    (1..=rows.len())
        .map(|offset| (selected + offset) % rows.len())
        .find(|idx| row_matches(&rows[*idx], &needle))
}

/// Move the selection to the next match. Leaves the selection alone and
/// returns `false` when nothing matches.
pub fn find_and_select(tree: &mut DisplayTree, query: &str, mode: SearchMode) -> bool {
    match find_match(tree.rows(), tree.selected_index(), query, mode) {
        Some(idx) => {
            tree.select_index(idx);
            true
        }
        None => false,
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
