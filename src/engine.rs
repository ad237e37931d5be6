//! Per-cell conditional formatting resolution.
//!
//! Stateless apart from the text cache: every call takes the grid position,
//! the cell and the rule-set snapshot, and returns the merged style patch.
//!
//! Precedence:
//! - header rows are never formatted
//! - whole-column sets run before leaf sets, so leaf fields win on conflict
//! - inside a set, rules run by ascending priority and later matches
//!   overwrite earlier ones; `stopIfTrue` ends the set, not the evaluation

use crate::conditional::matches_rule_condition;
use crate::types::{Cell, ColumnTarget, MatchMode, Rule, RuleSet, StylePatch};
use crate::value::{CellValue, TextCache};

/// Position of the cell being styled
#[derive(Debug, Clone, Copy)]
pub struct CellRef<'a> {
    pub row_index: usize,
    pub top_col_index: usize,
    /// Leaf column path of the rendered cell; `None` for an unsplit cell.
    pub leaf_path: Option<&'a [usize]>,
    pub cell: &'a Cell,
}

/// Evaluates rule sets against cells
#[derive(Debug, Default)]
pub struct RuleEngine {
    text: TextCache,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop memoized text extraction results.
    pub fn clear_cache(&self) {
        self.text.clear();
    }

    pub fn cache(&self) -> &TextCache {
        &self.text
    }

    /// Comparable value of a cell's content.
    pub fn value_of(&self, cell: &Cell) -> CellValue {
        self.text.value_of(&cell.content)
    }

    /// Merged style for one cell, or `None` when nothing matched.
    pub fn get_then(
        &self,
        cell_ref: &CellRef<'_>,
        rule_sets: &[RuleSet],
        header_row_count: usize,
    ) -> Option<StylePatch> {
        if cell_ref.row_index < header_row_count {
            return None;
        }

        let mut selected: Vec<(&RuleSet, &ColumnTarget)> = rule_sets
            .iter()
            .filter_map(|set| Some((set, set.target.as_ref()?)))
            .filter(|(set, target)| {
                set.enabled
                    && !set.rules.is_empty()
                    && applies_to(target, cell_ref.top_col_index, cell_ref.leaf_path)
            })
            .collect();
        if selected.is_empty() {
            return None;
        }
        // Stable: declaration order is kept within each kind.
        selected.sort_by_key(|(_, target)| target.is_leaf());

        let value = self.value_of(cell_ref.cell);
        let mut acc = StylePatch::default();
        let mut matched = false;

        for (set, _) in selected {
            for rule in sorted_rules(set) {
                let Some(when) = &rule.when else {
                    continue;
                };
                if !matches_rule_condition(when, &value) {
                    continue;
                }
                log::trace!(
                    "rule {:?} matched cell ({}, {})",
                    rule.id,
                    cell_ref.row_index,
                    cell_ref.top_col_index
                );
                acc.merge_from(&rule.then);
                matched = true;
                if rule.stop_if_true || set.match_mode == MatchMode::First {
                    break;
                }
            }
        }

        matched.then_some(acc)
    }
}

/// Whether a target covers the cell at `top_col_index` / `leaf_path`.
///
/// Leaf targets also apply to unsplit cells of their column.
pub fn applies_to(target: &ColumnTarget, top_col_index: usize, leaf_path: Option<&[usize]>) -> bool {
    match target {
        ColumnTarget::Whole {
            top_col_index: col,
        } => *col == top_col_index,
        ColumnTarget::Leaf {
            top_col_index: col,
            leaf_path: target_path,
        } => *col == top_col_index && leaf_path.map_or(true, |p| p == target_path.as_slice()),
    }
}

/// Enabled rules of a set by ascending priority, ties in declaration order.
fn sorted_rules(set: &RuleSet) -> Vec<&Rule> {
    let mut rules: Vec<&Rule> = set.rules.iter().filter(|r| r.enabled).collect();
    rules.sort_by_key(|r| r.priority);
    rules
}

/// One-shot evaluation with a throwaway cache.
pub fn get_then(
    cell_ref: &CellRef<'_>,
    rule_sets: &[RuleSet],
    header_row_count: usize,
) -> Option<StylePatch> {
    RuleEngine::new().get_then(cell_ref, rule_sets, header_row_count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{Condition, Operator};

    fn not_empty(color: &str) -> Rule {
        Rule::new(Condition::new(Operator::IsNotEmpty), StylePatch::background(color))
    }

    fn whole(col: usize, rules: Vec<Rule>) -> RuleSet {
        RuleSet::new(ColumnTarget::Whole { top_col_index: col }, rules)
    }

    fn at<'a>(cell: &'a Cell, row: usize, col: usize) -> CellRef<'a> {
        CellRef {
            row_index: row,
            top_col_index: col,
            leaf_path: None,
            cell,
        }
    }

    #[test]
    fn test_header_rows_never_formatted() {
        let cell = Cell::text("x");
        let sets = vec![whole(0, vec![not_empty("#f00")])];
        assert!(get_then(&at(&cell, 0, 0), &sets, 1).is_none());
        assert!(get_then(&at(&cell, 1, 0), &sets, 1).is_some());
    }

    #[test]
    fn test_disabled_and_empty_sets_skipped() {
        let cell = Cell::text("x");
        let mut disabled = whole(0, vec![not_empty("#f00")]);
        disabled.enabled = false;
        let empty = whole(0, Vec::new());
        assert!(get_then(&at(&cell, 1, 0), &[disabled, empty], 0).is_none());
    }

    #[test]
    fn test_other_column_ignored() {
        let cell = Cell::text("x");
        let sets = vec![whole(3, vec![not_empty("#f00")])];
        assert!(get_then(&at(&cell, 1, 0), &sets, 0).is_none());
    }

    #[test]
    fn test_disabled_rule_skipped() {
        let cell = Cell::text("x");
        let mut rule = not_empty("#f00");
        rule.enabled = false;
        assert!(get_then(&at(&cell, 1, 0), &[whole(0, vec![rule])], 0).is_none());
    }

    #[test]
    fn test_rule_without_condition_never_matches() {
        let cell = Cell::text("x");
        let mut rule = not_empty("#f00");
        rule.when = None;
        assert!(get_then(&at(&cell, 1, 0), &[whole(0, vec![rule])], 0).is_none());
    }

    #[test]
    fn test_first_match_mode() {
        let cell = Cell::text("x");
        let mut set = whole(
            0,
            vec![not_empty("#111").with_priority(0), not_empty("#222").with_priority(1)],
        );
        set.match_mode = MatchMode::First;
        let style = get_then(&at(&cell, 1, 0), &[set], 0).unwrap();
        assert_eq!(style.background_color.as_deref(), Some("#111"));
    }

    #[test]
    fn test_stop_if_true_only_ends_its_set() {
        let cell = Cell::text("x");
        let first = whole(
            0,
            vec![not_empty("#111").stop_if_true(), not_empty("#222").with_priority(1)],
        );
        let mut second_rule = not_empty("#333");
        second_rule.then = StylePatch {
            text_color: Some("#444".to_string()),
            ..StylePatch::default()
        };
        let second = whole(0, vec![second_rule]);
        let style = get_then(&at(&cell, 1, 0), &[first, second], 0).unwrap();
        assert_eq!(style.background_color.as_deref(), Some("#111"));
        assert_eq!(style.text_color.as_deref(), Some("#444"));
    }

    #[test]
    fn test_applies_to() {
        let leaf = ColumnTarget::Leaf {
            top_col_index: 0,
            leaf_path: vec![1],
        };
        assert!(applies_to(&leaf, 0, Some(&[1])));
        assert!(applies_to(&leaf, 0, None));
        assert!(!applies_to(&leaf, 0, Some(&[0])));
        assert!(!applies_to(&leaf, 1, None));
        let whole = ColumnTarget::Whole { top_col_index: 0 };
        assert!(applies_to(&whole, 0, Some(&[0, 1])));
    }
}
