//! Queue filters
//!
//! A predicate is `[!][=]operand`: `!` negates, then `=` asks for exact equality
//! instead of substring containment. The prefixes are only recognised in that order,
//! and there is no way to match a literal leading `!` or `=`.

use std::collections::HashSet;
use std::hash::Hash;
use serde_json::Value;
use thiserror::Error;
use crate::monitor::types::QueueView;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("destination query is not a valid JSON object: {0}")]
    InvalidQuery(#[from] serde_json::Error),
    #[error("destination query field '{0}' must be a string or number")]
    InvalidClause(String),
}

// ---------- StatPredicate ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatPredicate {
    pub negate: bool,
    pub exact: bool,
    pub operand: String,
}

impl StatPredicate {
    pub fn parse(expression: &str) -> Self {
        let (negate, rest) = match expression.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, expression),
        };
        let (exact, operand) = match rest.strip_prefix('=') {
            Some(operand) => (true, operand),
            None => (false, rest),
        };
        Self {
            negate,
            exact,
            operand: operand.to_string(),
        }
    }

    pub fn matches(&self, actual: &str) -> bool {
        let hit = if self.exact {
            actual == self.operand
        } else {
            actual.contains(self.operand.as_str())
        };
        hit != self.negate
    }
}

pub fn matches(actual: &str, expression: &str) -> bool {
    StatPredicate::parse(expression).matches(actual)
}

// ---------- DestinationQuery ----------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    Field { field: String, predicate: StatPredicate },
    AnyField(StatPredicate),
}

impl Clause {
    fn matches(&self, view: &QueueView) -> bool {
        match self {
            Clause::Field { field, predicate } => predicate.matches(&view.field_text(field)),
            Clause::AnyField(predicate) => {
                let texts = view.searchable_texts();
                if predicate.negate {
                    // "!x" on any field means: no field matches x
                    let positive = StatPredicate { negate: false, ..predicate.clone() };
                    !texts.iter().any(|text| positive.matches(text))
                } else {
                    texts.iter().any(|text| predicate.matches(text))
                }
            }
        }
    }
}

/// Parsed queue filter. All clauses must match; no clauses matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationQuery {
    clauses: Vec<Clause>,
}

impl DestinationQuery {
    /// Accepts an empty string, a JSON object of `field -> predicate`, or plain text
    /// matched against every field.
    pub fn parse(query: &str) -> Result<Self, FilterError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Self::default());
        }

        if !query.starts_with('{') {
            return Ok(Self {
                clauses: vec![Clause::AnyField(StatPredicate::parse(query))],
            });
        }

        let object: serde_json::Map<String, Value> = serde_json::from_str(query)?;
        let mut clauses = Vec::with_capacity(object.len());
        for (field, expected) in object {
            let expression = match expected {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => return Err(FilterError::InvalidClause(field)),
            };
            clauses.push(Clause::Field {
                field,
                predicate: StatPredicate::parse(&expression),
            });
        }
        Ok(Self { clauses })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, view: &QueueView) -> bool {
        self.clauses.iter().all(|clause| clause.matches(view))
    }
}

/// Keeps the first item seen for each key, preserving order.
pub fn unique_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}
