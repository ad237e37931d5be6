//! Leaf column paths inside split cells.
//!
//! A leaf column path lists the column index chosen at each nested split
//! level that divides into more than one column. Row-only splits
//! (`cols == 1`, e.g. "10 / 20" stacked vertically) add no segment: they do
//! not create new columns.

use crate::config::SPLIT_DEPTH_LIMIT;
use crate::types::{Cell, Grid};

/// Column indices identifying a virtual column inside a split cell.
pub type LeafPath = Vec<usize>;

fn push_unique(out: &mut Vec<LeafPath>, path: LeafPath) {
    if !out.contains(&path) {
        out.push(path);
    }
}

/// Every distinct leaf column path reachable inside `cell`, in first-seen order.
///
/// Returns an empty list for a cell without column-dividing splits.
pub fn collect_leaf_col_paths(cell: &Cell) -> Vec<LeafPath> {
    collect_leaf_col_paths_bounded(cell, 0, SPLIT_DEPTH_LIMIT)
}

pub fn collect_leaf_col_paths_bounded(cell: &Cell, depth: usize, limit: usize) -> Vec<LeafPath> {
    let Some(split) = cell.as_split() else {
        return Vec::new();
    };
    if depth >= limit {
        log::debug!("split nesting deeper than {limit} levels, ignoring the rest");
        return Vec::new();
    }

    let mut out = Vec::new();
    if split.cols() > 1 {
        for col in 0..split.cols() {
            for child in split.column(col) {
                let sub = collect_leaf_col_paths_bounded(child, depth + 1, limit);
                if sub.is_empty() {
                    push_unique(&mut out, vec![col]);
                }
                for tail in sub {
                    let mut path = Vec::with_capacity(tail.len() + 1);
                    path.push(col);
                    path.extend(tail);
                    push_unique(&mut out, path);
                }
            }
        }
    } else {
        for child in split.children() {
            for path in collect_leaf_col_paths_bounded(child, depth + 1, limit) {
                push_unique(&mut out, path);
            }
        }
    }
    out
}

/// Canonical leaf path of a nested cell reached by `rendered_index_path`.
///
/// `rendered_index_path` holds the row-major child index a renderer used at
/// each split level. Only levels with more than one column contribute a
/// segment. Returns `None` when no such level was traversed. A path longer
/// than the split structure stops early with the segments gathered so far.
pub fn leaf_col_path_for_rendered_cell(
    grid: &Grid,
    row_index: usize,
    top_col_index: usize,
    rendered_index_path: &[usize],
) -> Option<LeafPath> {
    let cell = grid.cell(row_index, top_col_index)?;
    leaf_col_path_in_cell(cell, rendered_index_path, SPLIT_DEPTH_LIMIT)
}

/// Same as [`leaf_col_path_for_rendered_cell`], starting from a cell.
pub fn leaf_col_path_in_cell(
    cell: &Cell,
    rendered_index_path: &[usize],
    limit: usize,
) -> Option<LeafPath> {
    let mut current = cell;
    let mut path = Vec::new();
    for &index in rendered_index_path.iter().take(limit) {
        let Some(split) = current.as_split() else {
            break;
        };
        let Some(child) = split.child(index) else {
            break;
        };
        if split.cols() > 1 {
            path.push(index % split.cols());
        }
        current = child;
    }
    (!path.is_empty()).then_some(path)
}

/// Row-major index paths to every rendered leaf of `cell`.
///
/// An unsplit cell yields a single empty path. Nesting past the depth guard
/// is treated as a leaf.
pub fn enumerate_rendered_leaves(cell: &Cell) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    walk_rendered(cell, &mut prefix, &mut out, SPLIT_DEPTH_LIMIT);
    out
}

fn walk_rendered(cell: &Cell, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>, limit: usize) {
    match cell.as_split() {
        Some(split) if prefix.len() < limit => {
            for (index, child) in split.children().enumerate() {
                prefix.push(index);
                walk_rendered(child, prefix, out, limit);
                prefix.pop();
            }
        }
        _ => out.push(prefix.clone()),
    }
}

/// Follow a rendered index path down to the nested cell it names.
pub fn cell_at_rendered_path<'a>(cell: &'a Cell, rendered_index_path: &[usize]) -> Option<&'a Cell> {
    rendered_index_path
        .iter()
        .try_fold(cell, |current, &index| current.as_split()?.child(index))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::Row;

    fn two_by_two() -> Cell {
        Cell::split(
            2,
            2,
            vec![
                Cell::text("f"),
                Cell::text("s"),
                Cell::text("b"),
                Cell::text("r"),
            ],
        )
    }

    #[test]
    fn test_unsplit_cell_has_no_paths() {
        assert!(collect_leaf_col_paths(&Cell::text("x")).is_empty());
    }

    #[test]
    fn test_two_by_two_paths() {
        assert_eq!(collect_leaf_col_paths(&two_by_two()), vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_row_only_split_is_transparent() {
        let stacked = Cell::split(2, 1, vec![Cell::text("10"), Cell::text("20")]);
        assert!(collect_leaf_col_paths(&stacked).is_empty());

        let stacked_over_cols = Cell::split(2, 1, vec![Cell::text("title"), two_by_two()]);
        assert_eq!(
            collect_leaf_col_paths(&stacked_over_cols),
            vec![vec![0], vec![1]]
        );
    }

    #[test]
    fn test_nested_column_paths() {
        let inner = Cell::split(1, 2, vec![Cell::text("x"), Cell::text("y")]);
        let outer = Cell::split(1, 2, vec![inner, Cell::text("z")]);
        assert_eq!(
            collect_leaf_col_paths(&outer),
            vec![vec![0, 0], vec![0, 1], vec![1]]
        );
    }

    #[test]
    fn test_depth_guard_stops_recursion() {
        let mut cell = Cell::text("deep");
        for _ in 0..20 {
            cell = Cell::split(1, 2, vec![cell, Cell::text("side")]);
        }
        let paths = collect_leaf_col_paths(&cell);
        assert!(paths.iter().all(|p| p.len() <= SPLIT_DEPTH_LIMIT));
    }

    #[test]
    fn test_rendered_path_keeps_column_component() {
        let grid = Grid {
            rows: vec![Row::new(vec![two_by_two()])],
            ..Grid::default()
        };
        assert_eq!(leaf_col_path_for_rendered_cell(&grid, 0, 0, &[0]), Some(vec![0]));
        assert_eq!(leaf_col_path_for_rendered_cell(&grid, 0, 0, &[3]), Some(vec![1]));
        assert_eq!(leaf_col_path_for_rendered_cell(&grid, 0, 0, &[2]), Some(vec![0]));
    }

    #[test]
    fn test_rendered_path_through_row_split_is_none() {
        let stacked = Cell::split(2, 1, vec![Cell::text("10"), Cell::text("20")]);
        assert_eq!(leaf_col_path_in_cell(&stacked, &[1], SPLIT_DEPTH_LIMIT), None);
        assert_eq!(leaf_col_path_in_cell(&Cell::text("x"), &[], SPLIT_DEPTH_LIMIT), None);
    }

    #[test]
    fn test_rendered_path_longer_than_structure() {
        let cell = Cell::split(1, 2, vec![Cell::text("a"), Cell::text("b")]);
        assert_eq!(leaf_col_path_in_cell(&cell, &[1, 4, 2], SPLIT_DEPTH_LIMIT), Some(vec![1]));
        assert_eq!(leaf_col_path_in_cell(&cell, &[7], SPLIT_DEPTH_LIMIT), None);
    }

    #[test]
    fn test_enumerate_rendered_leaves() {
        assert_eq!(enumerate_rendered_leaves(&Cell::text("x")), vec![Vec::<usize>::new()]);
        let nested = Cell::split(
            1,
            2,
            vec![
                Cell::split(2, 1, vec![Cell::text("10"), Cell::text("20")]),
                Cell::text("z"),
            ],
        );
        assert_eq!(
            enumerate_rendered_leaves(&nested),
            vec![vec![0, 0], vec![0, 1], vec![1]]
        );
        assert_eq!(
            cell_at_rendered_path(&nested, &[0, 1]).unwrap().content,
            "20"
        );
    }

    #[test]
    fn test_rendered_leaves_agree_with_collected_paths() {
        let cell = Cell::split(
            2,
            2,
            vec![
                Cell::split(1, 2, vec![Cell::text("a"), Cell::text("b")]),
                Cell::text("c"),
                Cell::text("d"),
                Cell::split(2, 1, vec![Cell::text("e"), Cell::text("f")]),
            ],
        );
        let mut from_render: Vec<LeafPath> = Vec::new();
        for rendered in enumerate_rendered_leaves(&cell) {
            if let Some(path) = leaf_col_path_in_cell(&cell, &rendered, SPLIT_DEPTH_LIMIT) {
                push_unique(&mut from_render, path);
            }
        }
        let mut collected = collect_leaf_col_paths(&cell);
        collected.sort();
        from_render.sort();
        assert_eq!(collected, from_render);
    }
}
