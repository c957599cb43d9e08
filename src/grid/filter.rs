//! Rule-based filter evaluation.
//!
//! Each column holds an ordered list of rules; a record must satisfy every
//! rule on every column to stay visible. Text rules carry three independent
//! modifiers (match case, whole word, regex). All pattern construction is
//! funneled through [`compile`], the one place an invalid pattern can occur:
//! a rule that fails to compile excludes every record rather than erroring.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};

use crate::model::{ColumnKey, TrackRecord, ValueType};

/// Filter rule operator.
///
/// `Eq`/`Gt`/`Lt`/`Between` apply to numeric and duration columns,
/// `Eq`/`Contains`/`NotContains`/`Starts`/`Ends` to text columns. The
/// pairing is validated at the CLI layer; see [`FilterOp::valid_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Lt,
    Between,
    Contains,
    NotContains,
    Starts,
    Ends,
}

impl FilterOp {
    pub fn parse(s: &str) -> Option<FilterOp> {
        match s {
            "eq" => Some(FilterOp::Eq),
            "gt" => Some(FilterOp::Gt),
            "lt" => Some(FilterOp::Lt),
            "between" => Some(FilterOp::Between),
            "contains" => Some(FilterOp::Contains),
            "not_contains" => Some(FilterOp::NotContains),
            "starts" => Some(FilterOp::Starts),
            "ends" => Some(FilterOp::Ends),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gt => "gt",
            FilterOp::Lt => "lt",
            FilterOp::Between => "between",
            FilterOp::Contains => "contains",
            FilterOp::NotContains => "not_contains",
            FilterOp::Starts => "starts",
            FilterOp::Ends => "ends",
        }
    }

    /// Whether this operator is meaningful for the given column type.
    pub fn valid_for(self, value_type: ValueType) -> bool {
        match value_type {
            ValueType::Number | ValueType::Duration => matches!(
                self,
                FilterOp::Eq | FilterOp::Gt | FilterOp::Lt | FilterOp::Between
            ),
            ValueType::Text => matches!(
                self,
                FilterOp::Eq
                    | FilterOp::Contains
                    | FilterOp::NotContains
                    | FilterOp::Starts
                    | FilterOp::Ends
            ),
            ValueType::Image => false,
        }
    }
}

/// One predicate attached to exactly one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRule {
    pub op: FilterOp,
    pub value: String,
    /// Upper bound, only meaningful for `Between`.
    pub value2: Option<String>,
    pub match_case: bool,
    pub whole_word: bool,
    pub use_regex: bool,
}

impl FilterRule {
    pub fn new(op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            op,
            value: value.into(),
            value2: None,
            match_case: false,
            whole_word: false,
            use_regex: false,
        }
    }

    pub fn between(low: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            value2: Some(high.into()),
            ..Self::new(FilterOp::Between, low)
        }
    }
}

/// The active rules, keyed by column. Columns with no rules impose no
/// constraint; rules on one column AND together, and so do columns.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    rules: BTreeMap<ColumnKey, Vec<FilterRule>>,
}

impl FilterSet {
    pub fn push(&mut self, key: ColumnKey, rule: FilterRule) {
        self.rules.entry(key).or_default().push(rule);
    }

    pub fn clear_column(&mut self, key: ColumnKey) {
        self.rules.remove(&key);
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rules.values().all(|rules| rules.is_empty())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    fn compiled(&self) -> Vec<(ColumnKey, Vec<Matcher>)> {
        self.rules
            .iter()
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(key, rules)| {
                let matchers = rules
                    .iter()
                    .map(|rule| compile(rule, key.value_type()))
                    .collect();
                (*key, matchers)
            })
            .collect()
    }
}

/// A rule compiled for evaluation.
enum Matcher {
    /// Numeric comparison; `Between` with a missing/unparsable upper bound
    /// matches nothing.
    Numeric {
        op: FilterOp,
        value: f64,
        value2: Option<f64>,
    },
    /// Numeric rule whose primary value failed to parse: never excludes.
    Vacuous,
    /// Plain string operation, optionally case-folded.
    Literal {
        op: FilterOp,
        needle: String,
        fold: bool,
    },
    /// Regex match (covers whole-word and user-pattern rules).
    Pattern { regex: Regex, negate: bool },
    /// Invalid pattern: fail closed, exclude everything.
    Exclude,
}

impl Matcher {
    fn matches(&self, record: &TrackRecord, key: ColumnKey) -> bool {
        match self {
            Matcher::Vacuous => true,
            Matcher::Exclude => false,
            Matcher::Numeric { op, value, value2 } => {
                let x = record.number_value(key).unwrap_or(0.0);
                match op {
                    FilterOp::Eq => x == *value,
                    FilterOp::Gt => x > *value,
                    FilterOp::Lt => x < *value,
                    FilterOp::Between => value2.is_some_and(|high| x >= *value && x <= high),
                    _ => true,
                }
            }
            Matcher::Literal { op, needle, fold } => {
                let cell = record.sort_value(key);
                let hay = if *fold {
                    cell.to_lowercase()
                } else {
                    cell.into_owned()
                };
                match op {
                    FilterOp::Contains => hay.contains(needle.as_str()),
                    FilterOp::NotContains => !hay.contains(needle.as_str()),
                    FilterOp::Starts => hay.starts_with(needle.as_str()),
                    FilterOp::Ends => hay.ends_with(needle.as_str()),
                    FilterOp::Eq => hay == *needle,
                    _ => true,
                }
            }
            Matcher::Pattern { regex, negate } => {
                let hit = regex.is_match(&record.sort_value(key));
                hit != *negate
            }
        }
    }
}

/// Compile one rule against its column's type.
///
/// This is the only place a pattern is built; `Exclude` is the fail-closed
/// result for an invalid regex.
fn compile(rule: &FilterRule, value_type: ValueType) -> Matcher {
    match value_type {
        ValueType::Number | ValueType::Duration => {
            let Ok(value) = rule.value.trim().parse::<f64>() else {
                return Matcher::Vacuous;
            };
            let value2 = rule
                .value2
                .as_deref()
                .and_then(|v| v.trim().parse::<f64>().ok());
            Matcher::Numeric {
                op: rule.op,
                value,
                value2,
            }
        }
        // Image cells evaluate against their presence marker; text semantics
        // below then apply unchanged.
        ValueType::Text | ValueType::Image => compile_text(rule),
    }
}

fn compile_text(rule: &FilterRule) -> Matcher {
    let negate = rule.op == FilterOp::NotContains;

    if rule.use_regex {
        let mut pattern = format!("(?:{})", rule.value);
        if rule.whole_word {
            pattern = format!(r"\b{pattern}\b");
        }
        pattern = match rule.op {
            FilterOp::Eq => format!("^{pattern}$"),
            FilterOp::Starts => format!("^{pattern}"),
            FilterOp::Ends => format!("{pattern}$"),
            _ => pattern,
        };
        return build_pattern(&pattern, rule.match_case, negate);
    }

    if rule.whole_word {
        // Whole word reduces every operator to a boundary-wrapped literal
        // match (negated for not_contains).
        let pattern = format!(r"\b(?:{})\b", regex::escape(&rule.value));
        return build_pattern(&pattern, rule.match_case, negate);
    }

    let fold = !rule.match_case;
    Matcher::Literal {
        op: rule.op,
        needle: if fold {
            rule.value.to_lowercase()
        } else {
            rule.value.clone()
        },
        fold,
    }
}

fn build_pattern(pattern: &str, match_case: bool, negate: bool) -> Matcher {
    match RegexBuilder::new(pattern)
        .case_insensitive(!match_case)
        .build()
    {
        Ok(regex) => Matcher::Pattern { regex, negate },
        Err(_) => Matcher::Exclude,
    }
}

/// Evaluate the filter set against a record slice.
///
/// Pure function of its inputs: returns the indices of passing records in
/// their original order. Rules are compiled once, not per row.
pub fn apply(records: &[TrackRecord], filters: &FilterSet) -> Vec<usize> {
    let compiled = filters.compiled();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            compiled.iter().all(|(key, matchers)| {
                matchers.iter().all(|matcher| matcher.matches(record, *key))
            })
        })
        .map(|(index, _)| index)
        .collect()
}
