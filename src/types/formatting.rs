use serde::{Deserialize, Deserializer, Serialize};

/// Column a rule set is attached to.
///
/// Serialized with an internal `kind` tag: `{"kind":"leaf","topColIndex":0,"leafPath":[1]}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ColumnTarget {
    /// The whole top-level column, including every split leaf inside it.
    Whole { top_col_index: usize },
    /// One virtual column inside split cells of a top-level column.
    Leaf {
        top_col_index: usize,
        leaf_path: Vec<usize>,
    },
}

impl ColumnTarget {
    pub fn top_col_index(&self) -> usize {
        match self {
            Self::Whole { top_col_index } | Self::Leaf { top_col_index, .. } => *top_col_index,
        }
    }

    pub fn leaf_path(&self) -> Option<&[usize]> {
        match self {
            Self::Whole { .. } => None,
            Self::Leaf { leaf_path, .. } => Some(leaf_path),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

/// How rules inside one set interact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    /// Evaluate every rule in priority order, honoring `stopIfTrue`.
    #[default]
    All,
    /// Stop at the first matching rule.
    First,
}

/// Conditional rules attached to one column target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// `None` when the persisted target could not be decoded; such a set never applies.
    #[serde(default, deserialize_with = "lenient")]
    pub target: Option<ColumnTarget>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Malformed rules are dropped on decode; the rest of the set survives.
    #[serde(default, deserialize_with = "lenient_list")]
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(target: ColumnTarget, rules: Vec<Rule>) -> Self {
        Self {
            target: Some(target),
            enabled: true,
            match_mode: MatchMode::All,
            rules,
        }
    }
}

/// A single conditional rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Lower runs first; later matches overwrite earlier ones.
    #[serde(default)]
    pub priority: i32,
    /// `None` when missing or malformed; such a rule never matches.
    #[serde(default, deserialize_with = "lenient")]
    pub when: Option<RuleCondition>,
    #[serde(default)]
    pub then: StylePatch,
    #[serde(default)]
    pub stop_if_true: bool,
}

impl Rule {
    pub fn new(when: impl Into<RuleCondition>, then: StylePatch) -> Self {
        Self {
            id: String::new(),
            enabled: true,
            priority: 0,
            when: Some(when.into()),
            then,
            stop_if_true: false,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn stop_if_true(mut self) -> Self {
        self.stop_if_true = true;
        self
    }
}

/// Either a single condition or a group of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleCondition {
    Group(ConditionGroup),
    Single(Condition),
}

impl From<Condition> for RuleCondition {
    fn from(condition: Condition) -> Self {
        Self::Single(condition)
    }
}

impl From<ConditionGroup> for RuleCondition {
    fn from(group: ConditionGroup) -> Self {
        Self::Group(group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Logic {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionGroup {
    #[serde(default)]
    pub logic: Logic,
    pub conditions: Vec<Condition>,
}

/// Comparison operators.
///
/// Unknown operator names decode to [`Operator::Unknown`], which never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    IsEmpty,
    IsNotEmpty,
    Equals,
    NotEquals,
    EqualsIgnoreCase,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    InList,
    NotInList,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Between,
    NotBetween,
    Before,
    After,
    On,
    BetweenDates,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Literal operand as authored: JSON number, string or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Operand {
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One comparison against a cell's value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub op: Operator,
    /// Primary operand; lower bound for range operators.
    #[serde(default, alias = "min", skip_serializing_if = "Option::is_none")]
    pub value: Option<Operand>,
    /// Upper bound for range operators.
    #[serde(default, alias = "max", skip_serializing_if = "Option::is_none")]
    pub value2: Option<Operand>,
    /// Explicit list for `inList`/`notInList`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Operand>>,
    /// Case folding for text operators; defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
}

impl Condition {
    pub fn new(op: Operator) -> Self {
        Self {
            op,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<Operand>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn value2(mut self, value: impl Into<Operand>) -> Self {
        self.value2 = Some(value.into());
        self
    }

    #[must_use]
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn case_sensitive(mut self) -> Self {
        self.ignore_case = Some(false);
        self
    }
}

/// Style fields a matching rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl StylePatch {
    pub fn background(color: &str) -> Self {
        Self {
            background_color: Some(color.to_string()),
            ..Self::default()
        }
    }

    /// Overlay `other` onto `self`.
    ///
    /// Every present field of `other` wins; `cell_class` and `tooltip` only
    /// win when non-empty.
    pub fn merge_from(&mut self, other: &Self) {
        fn overwrite(slot: &mut Option<String>, value: Option<&String>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }
        overwrite(&mut self.background_color, other.background_color.as_ref());
        overwrite(&mut self.text_color, other.text_color.as_ref());
        overwrite(&mut self.font_weight, other.font_weight.as_ref());
        overwrite(&mut self.font_style, other.font_style.as_ref());
        overwrite(&mut self.text_decoration, other.text_decoration.as_ref());
        overwrite(
            &mut self.cell_class,
            other.cell_class.as_ref().filter(|s| !s.is_empty()),
        );
        overwrite(
            &mut self.tooltip,
            other.tooltip.as_ref().filter(|s| !s.is_empty()),
        );
    }
}

fn default_true() -> bool {
    true
}

/// Decode a list, dropping elements that fail to decode.
///
/// Anything other than an array (or `null`) decodes as an empty list.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let items = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => Vec::new(),
        other => {
            log::warn!(
                "expected a list of {}, got {other}; ignoring it",
                std::any::type_name::<T>()
            );
            Vec::new()
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("dropping malformed {}: {e}", std::any::type_name::<T>());
                None
            }
        })
        .collect())
}

/// Decode an optional field, turning malformed input into `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            log::debug!("ignoring malformed {}: {e}", std::any::type_name::<T>());
            Ok(None)
        }
    }
}
