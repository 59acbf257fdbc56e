//! Query and patch builders.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use soquy_shared::types::PageRequest;
use std::cmp::Ordering;
use std::str::FromStr;

use super::StoreError;

/// A condition on one field, addressed by a dotted path such as
/// `"totals.grand_total"` or `"counterparty.kind"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the value.
    Eq(String, Value),
    /// Field is greater than or equal to the value.
    Gte(String, Value),
    /// Field is less than or equal to the value.
    Lte(String, Value),
}

impl Filter {
    /// Returns true if the document satisfies the condition.
    ///
    /// Missing fields never match.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        let (path, expected) = match self {
            Self::Eq(path, v) | Self::Gte(path, v) | Self::Lte(path, v) => (path, v),
        };
        let Some(actual) = lookup(doc, path) else {
            return false;
        };

        match self {
            Self::Eq(..) => compare_values(actual, expected) == Some(Ordering::Equal),
            Self::Gte(..) => matches!(
                compare_values(actual, expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lte(..) => matches!(
                compare_values(actual, expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

/// Sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Dotted field path.
    pub field: String,
    /// Largest first.
    pub descending: bool,
}

/// A filtered, sorted, paginated lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Conditions, all of which must hold.
    pub filters: Vec<Filter>,
    /// Sort key; insertion order when absent.
    pub sort: Option<Sort>,
    /// Requested page.
    pub page: PageRequest,
}

impl Query {
    /// Creates an unfiltered query for the first page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition.
    pub fn eq(self, field: &str, value: impl Serialize) -> Result<Self, StoreError> {
        let value = serde_json::to_value(value)?;
        Ok(self.with(Filter::Eq(field.to_string(), value)))
    }

    /// Adds a lower bound (inclusive).
    pub fn gte(self, field: &str, value: impl Serialize) -> Result<Self, StoreError> {
        let value = serde_json::to_value(value)?;
        Ok(self.with(Filter::Gte(field.to_string(), value)))
    }

    /// Adds an upper bound (inclusive).
    pub fn lte(self, field: &str, value: impl Serialize) -> Result<Self, StoreError> {
        let value = serde_json::to_value(value)?;
        Ok(self.with(Filter::Lte(field.to_string(), value)))
    }

    /// Adds an equality condition when `value` is present.
    pub fn eq_opt<V: Serialize>(self, field: &str, value: Option<V>) -> Result<Self, StoreError> {
        match value {
            Some(v) => self.eq(field, v),
            None => Ok(self),
        }
    }

    /// Adds a lower bound when `value` is present.
    pub fn gte_opt<V: Serialize>(self, field: &str, value: Option<V>) -> Result<Self, StoreError> {
        match value {
            Some(v) => self.gte(field, v),
            None => Ok(self),
        }
    }

    /// Adds an upper bound when `value` is present.
    pub fn lte_opt<V: Serialize>(self, field: &str, value: Option<V>) -> Result<Self, StoreError> {
        match value {
            Some(v) => self.lte(field, v),
            None => Ok(self),
        }
    }

    /// Adds a condition.
    #[must_use]
    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sorts by `field`, newest or largest first.
    #[must_use]
    pub fn sort_desc(mut self, field: &str) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            descending: true,
        });
        self
    }

    /// Sets the page.
    #[must_use]
    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Returns true if the document satisfies every condition.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }

    /// Orders two documents by the sort key.
    #[must_use]
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let Some(sort) = &self.sort else {
            return Ordering::Equal;
        };
        let ordering = match (lookup(a, &sort.field), lookup(b, &sort.field)) {
            (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if sort.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// A set of top-level field replacements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch(Map<String, Value>);

impl Patch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field.
    pub fn set(mut self, field: &str, value: impl Serialize) -> Result<Self, StoreError> {
        self.0.insert(field.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Returns true if the patch touches `field`.
    #[must_use]
    pub fn touches(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Merges the patch into a document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPatch` if the document is not an object or the
    /// patch tries to change its id.
    pub fn apply(self, doc: &mut Value) -> Result<(), StoreError> {
        if let Some(new_id) = self.0.get("id")
            && doc.get("id") != Some(new_id)
        {
            return Err(StoreError::InvalidPatch("id cannot be changed".into()));
        }
        let Value::Object(fields) = doc else {
            return Err(StoreError::InvalidPatch("document is not an object".into()));
        };
        fields.extend(self.0);
        Ok(())
    }
}

/// Follows a dotted path into a document.
pub(crate) fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, key| current.get(key))
}

/// Compares two field values.
///
/// Numbers and numeric strings compare as decimals, RFC 3339 timestamps
/// as instants, other strings lexically. `None` means incomparable.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_decimal(a), as_decimal(b)) {
        return Some(x.cmp(&y));
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => Some(x.cmp(&y)),
                _ => Some(x.cmp(y)),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ if a == b => Some(Ordering::Equal),
        _ => None,
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}
