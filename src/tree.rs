use std::collections::HashSet;

use crate::filter::{StateFilter, visible_nodes};
use crate::model::{NodeId, NodeKind, NodePath, NodeState, TreeSnapshot};

/// One line of the sidebar. Row 0 is always the server itself and has no path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRow {
    pub node: Option<NodeId>,
    pub path: Option<NodePath>,
    pub name: String,
    pub depth: usize,
    pub state: Option<NodeState>,
    pub kind: Option<NodeKind>,
    pub has_children: bool,
}

impl DisplayRow {
    fn server(label: &str) -> Self {
        Self {
            node: None,
            path: None,
            name: label.to_string(),
            depth: 0,
            state: None,
            kind: None,
            has_children: false,
        }
    }

    pub fn label(&self) -> String {
        match self.state {
            Some(state) => format!("{} {}", state.glyph(), self.name),
            None => self.name.clone(),
        }
    }
}

/// Filtered, flattened projection of one [`TreeSnapshot`].
///
/// Always rebuilt whole; selection and collapsed folders are carried over
/// from the previous tree by path.
#[derive(Clone, Debug)]
pub struct DisplayTree {
    rows: Vec<DisplayRow>,
    selected: usize,
    collapsed: HashSet<NodePath>,
    filter: StateFilter,
}

impl DisplayTree {
    /// Tree with only the server row, used before the first refresh and after
    /// a failed connection.
    pub fn placeholder(label: &str) -> Self {
        Self {
            rows: vec![DisplayRow::server(label)],
            selected: 0,
            collapsed: HashSet::new(),
            filter: StateFilter::All,
        }
    }

    pub fn build(
        snapshot: &TreeSnapshot,
        filter: StateFilter,
        root_label: &str,
        previous: Option<&DisplayTree>,
    ) -> Self {
        let visible = visible_nodes(snapshot, filter);
        let mut rows = vec![DisplayRow::server(root_label)];
        let mut stack: Vec<(NodeId, usize)> = snapshot
            .roots()
            .iter()
            .rev()
            .filter(|id| visible.contains(id))
            .map(|id| (*id, 1))
            .collect();
        while let Some((id, depth)) = stack.pop() {
            let node = snapshot.node(id);
            let children: Vec<NodeId> = node
                .children
                .iter()
                .copied()
                .filter(|c| visible.contains(c))
                .collect();
            rows.push(DisplayRow {
                node: Some(id),
                path: Some(node.path.clone()),
                name: node.name().to_string(),
                depth,
                state: Some(node.state),
                kind: Some(node.kind),
                has_children: !children.is_empty(),
            });
            stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
        }
        rows[0].has_children = rows.len() > 1;

        let mut tree = Self {
            rows,
            selected: 0,
            collapsed: HashSet::new(),
            filter,
        };
        if let Some(prev) = previous {
            tree.collapsed = prev
                .collapsed
                .iter()
                .filter(|p| tree.index_of(p).is_some())
                .cloned()
                .collect();
            if let Some(path) = prev.selected_path() {
                tree.selected = tree.index_of(path).unwrap_or(0);
            }
        }
        tree
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn filter(&self) -> StateFilter {
        self.filter
    }

    pub fn root_label(&self) -> &str {
        &self.rows[0].name
    }

    pub fn set_root_label(&mut self, label: &str) {
        self.rows[0].name = label.to_string();
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> &DisplayRow {
        &self.rows[self.selected]
    }

    /// `None` while the server row is selected.
    pub fn selected_path(&self) -> Option<&NodePath> {
        self.rows[self.selected].path.as_ref()
    }

    pub fn index_of(&self, path: &NodePath) -> Option<usize> {
        self.rows.iter().position(|r| r.path.as_ref() == Some(path))
    }

    /// Select row `idx`, expanding its ancestors so it is on screen.
    pub fn select_index(&mut self, idx: usize) {
        self.selected = idx.min(self.rows.len() - 1);
        if let Some(path) = self.rows[self.selected].path.clone() {
            self.collapsed.retain(|c| !c.is_ancestor_of(&path));
        }
    }

    pub fn select_path(&mut self, path: &NodePath) -> bool {
        match self.index_of(path) {
            Some(idx) => {
                self.select_index(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_collapsed(&self, idx: usize) -> bool {
        self.rows[idx]
            .path
            .as_ref()
            .is_some_and(|p| self.collapsed.contains(p))
    }

    /// Hidden rows sit below a collapsed ancestor.
    pub fn is_hidden(&self, idx: usize) -> bool {
        let Some(path) = self.rows[idx].path.as_ref() else {
            return false;
        };
        std::iter::successors(path.parent(), |p| p.parent()).any(|p| self.collapsed.contains(&p))
    }

    /// Row indices that would be drawn, in order.
    pub fn rendered_rows(&self) -> Vec<usize> {
        (0..self.rows.len()).filter(|i| !self.is_hidden(*i)).collect()
    }

    pub fn toggle_collapse(&mut self) {
        let row = &self.rows[self.selected];
        if !row.has_children {
            return;
        }
        if let Some(path) = row.path.clone() {
            if !self.collapsed.remove(&path) {
                self.collapsed.insert(path);
            }
        }
    }

    pub fn move_down(&mut self) {
        if let Some(next) = (self.selected + 1..self.rows.len()).find(|i| !self.is_hidden(*i)) {
            self.selected = next;
        }
    }

    pub fn move_up(&mut self) {
        if let Some(prev) = (0..self.selected).rev().find(|i| !self.is_hidden(*i)) {
            self.selected = prev;
        }
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
