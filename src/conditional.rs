//! Condition evaluation against a cell's comparable value.
//!
//! Every failure mode (unknown operator, missing operand, unparsable number
//! or date) is simply a non-match.

use crate::types::{Condition, ConditionGroup, Logic, Operand, Operator, RuleCondition};
use crate::value::{calendar_day, parse_date_ms, parse_number, CellValue};

/// Evaluate a single condition or a group.
pub fn matches_rule_condition(when: &RuleCondition, value: &CellValue) -> bool {
    match when {
        RuleCondition::Single(condition) => matches_condition(condition, value),
        RuleCondition::Group(group) => matches_group(group, value),
    }
}

/// `and` needs every condition, `or` needs one. An empty group never matches.
pub fn matches_group(group: &ConditionGroup, value: &CellValue) -> bool {
    if group.conditions.is_empty() {
        return false;
    }
    match group.logic {
        Logic::And => group.conditions.iter().all(|c| matches_condition(c, value)),
        Logic::Or => group.conditions.iter().any(|c| matches_condition(c, value)),
    }
}

pub fn matches_condition(condition: &Condition, value: &CellValue) -> bool {
    let ignore_case = condition.ignore_case.unwrap_or(true);
    let fold = |s: &str| {
        if ignore_case {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    };
    let operand_text = || condition.value.as_ref().map(|v| fold(v.as_text().as_str()));
    let text = || fold(value.text.as_str());

    match condition.op {
        Operator::IsEmpty => value.text.is_empty(),
        Operator::IsNotEmpty => !value.text.is_empty(),
        Operator::Equals => operand_text().is_some_and(|v| text() == v),
        Operator::NotEquals => operand_text().is_some_and(|v| text() != v),
        Operator::EqualsIgnoreCase => condition
            .value
            .as_ref()
            .is_some_and(|v| value.text.to_lowercase() == v.as_text().to_lowercase()),
        Operator::Contains => operand_text().is_some_and(|v| text().contains(&v)),
        Operator::NotContains => operand_text().is_some_and(|v| !text().contains(&v)),
        Operator::StartsWith => operand_text().is_some_and(|v| text().starts_with(&v)),
        Operator::EndsWith => operand_text().is_some_and(|v| text().ends_with(&v)),
        Operator::InList | Operator::NotInList => {
            let list: Vec<String> = list_items(condition)
                .iter()
                .map(|s| fold(s.as_str()))
                .collect();
            if list.is_empty() {
                return false;
            }
            let found = list.contains(&text());
            if condition.op == Operator::InList {
                found
            } else {
                !found
            }
        }
        Operator::GreaterThan => compare_num(condition, value, |a, b| a > b),
        Operator::GreaterThanOrEqual => compare_num(condition, value, |a, b| a >= b),
        Operator::LessThan => compare_num(condition, value, |a, b| a < b),
        Operator::LessThanOrEqual => compare_num(condition, value, |a, b| a <= b),
        Operator::Between | Operator::NotBetween => {
            let (Some(n), Some(lo), Some(hi)) = (
                value.num,
                condition.value.as_ref().and_then(operand_number),
                condition.value2.as_ref().and_then(operand_number),
            ) else {
                return false;
            };
            let inside = n >= lo.min(hi) && n <= lo.max(hi);
            if condition.op == Operator::Between {
                inside
            } else {
                !inside
            }
        }
        Operator::Before => compare_date(condition, value, |a, b| a < b),
        Operator::After => compare_date(condition, value, |a, b| a > b),
        Operator::On => {
            let (Some(cell_ms), Some(target_ms)) =
                (value.date_ms, condition.value.as_ref().and_then(operand_date))
            else {
                return false;
            };
            match (calendar_day(cell_ms), calendar_day(target_ms)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        Operator::BetweenDates => {
            let (Some(ms), Some(lo), Some(hi)) = (
                value.date_ms,
                condition.value.as_ref().and_then(operand_date),
                condition.value2.as_ref().and_then(operand_date),
            ) else {
                return false;
            };
            ms >= lo.min(hi) && ms <= lo.max(hi)
        }
        Operator::Unknown => {
            log::debug!("condition without a known operator never matches");
            false
        }
    }
}

/// Non-empty `values[]` when given, otherwise the comma-split of `value`.
fn list_items(condition: &Condition) -> Vec<String> {
    let explicit = condition.values.as_ref().filter(|values| !values.is_empty());
    let items: Vec<String> = match (explicit, &condition.value) {
        (Some(values), _) => values.iter().map(Operand::as_text).collect(),
        (None, Some(value)) => value.as_text().split(',').map(str::to_string).collect(),
        (None, None) => Vec::new(),
    };
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn operand_number(operand: &Operand) -> Option<f64> {
    match operand {
        Operand::Number(n) => n.is_finite().then_some(*n),
        Operand::Text(s) => parse_number(s),
        Operand::Bool(_) => None,
    }
}

fn operand_date(operand: &Operand) -> Option<i64> {
    match operand {
        Operand::Text(s) => parse_date_ms(s),
        Operand::Number(_) | Operand::Bool(_) => None,
    }
}

fn compare_num(condition: &Condition, value: &CellValue, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (value.num, condition.value.as_ref().and_then(operand_number)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

fn compare_date(condition: &Condition, value: &CellValue, cmp: impl Fn(i64, i64) -> bool) -> bool {
    match (value.date_ms, condition.value.as_ref().and_then(operand_date)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}
