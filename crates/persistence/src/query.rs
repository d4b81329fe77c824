//! Typed query descriptors.
//!
//! A [`QueryDescriptor`] is an AND-ed list of `column op value` clauses. The
//! generic repository turns it into a `WHERE` fragment with bound parameters
//! and uses its fingerprint as part of the cache key.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::entities::{Entity, SqliteQueryAs};
use crate::error::{RepositoryError, RepositoryResult};

/// Comparison applied by a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOp {
    Eq,
    EqIgnoreCase,
    /// Substring match. `%` and `_` in the value are matched literally.
    Contains,
    Lte,
    Gte,
}

impl QueryOp {
    fn as_str(&self) -> &'static str {
        match self {
            QueryOp::Eq => "eq",
            QueryOp::EqIgnoreCase => "ieq",
            QueryOp::Contains => "contains",
            QueryOp::Lte => "lte",
            QueryOp::Gte => "gte",
        }
    }

    fn sql(&self, column: &str) -> String {
        match self {
            QueryOp::Eq => format!("{} = ?", column),
            QueryOp::EqIgnoreCase => format!("{} = ? COLLATE NOCASE", column),
            QueryOp::Contains => format!("{} LIKE ? ESCAPE '\\'", column),
            QueryOp::Lte => format!("{} <= ?", column),
            QueryOp::Gte => format!("{} >= ?", column),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(v) => f.write_str(v),
            QueryValue::Integer(v) => write!(f, "{}", v),
            QueryValue::Bool(v) => write!(f, "{}", v),
            QueryValue::Timestamp(v) => {
                f.write_str(&v.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
        }
    }
}

impl QueryValue {
    /// Type-tagged encoding for cache keys. Text is JSON-quoted so it can
    /// never read as another clause or another type.
    fn fingerprint(&self) -> String {
        match self {
            QueryValue::Text(v) => {
                serde_json::to_string(v).unwrap_or_else(|_| format!("{:?}", v))
            }
            QueryValue::Integer(v) => format!("i:{}", v),
            QueryValue::Bool(v) => format!("b:{}", v),
            QueryValue::Timestamp(_) => format!("t:{}", self),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(value: DateTime<Utc>) -> Self {
        QueryValue::Timestamp(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryClause {
    pub column: String,
    pub op: QueryOp,
    pub value: QueryValue,
}

/// AND-ed list of clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescriptor {
    clauses: Vec<QueryClause>,
}

impl QueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(
        mut self,
        column: impl Into<String>,
        op: QueryOp,
        value: impl Into<QueryValue>,
    ) -> Self {
        self.clauses.push(QueryClause {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.filter(column, QueryOp::Eq, value)
    }

    pub fn eq_ignore_case(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(column, QueryOp::EqIgnoreCase, QueryValue::Text(value.into()))
    }

    pub fn contains(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(column, QueryOp::Contains, QueryValue::Text(value.into()))
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.filter(column, QueryOp::Lte, value)
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.filter(column, QueryOp::Gte, value)
    }

    pub fn clauses(&self) -> &[QueryClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Stable cache-key fragment: `column=op:value&...` in clause order,
    /// with each value type-tagged and text JSON-quoted.
    pub fn fingerprint(&self) -> String {
        self.clauses
            .iter()
            .map(|c| format!("{}={}:{}", c.column, c.op.as_str(), c.value.fingerprint()))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Build the `WHERE` conditions for `E`, joined with `AND`.
    ///
    /// Returns an empty string for an empty descriptor. Fails if any clause
    /// names a column `E` does not expose.
    pub fn where_sql<E: Entity>(&self) -> RepositoryResult<String> {
        let mut conditions = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            if !E::is_queryable_column(&clause.column) {
                return Err(RepositoryError::InvalidQuery(format!(
                    "{} has no queryable column '{}'",
                    E::TYPE_NAME,
                    clause.column
                )));
            }
            conditions.push(clause.op.sql(&clause.column));
        }
        Ok(conditions.join(" AND "))
    }

    /// Bind every clause value, in clause order.
    pub fn bind_all<'q, O>(&'q self, mut query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        for clause in &self.clauses {
            query = match (&clause.op, &clause.value) {
                (QueryOp::Contains, QueryValue::Text(v)) => query.bind(like_pattern(v)),
                (QueryOp::Contains, other) => query.bind(like_pattern(&other.to_string())),
                (_, QueryValue::Text(v)) => query.bind(v.as_str()),
                (_, QueryValue::Integer(v)) => query.bind(*v),
                (_, QueryValue::Bool(v)) => query.bind(*v),
                (_, QueryValue::Timestamp(v)) => query.bind(*v),
            };
        }
        query
    }
}

/// `%needle%` with LIKE metacharacters escaped by `\`.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
