use crate::error::TableDaoError;
use crate::types::{CriteriaValue, RowValues};

/// Insertion-ordered mapping from column name to criterion value.
///
/// Order is significant: it drives placeholder naming and binding order.
/// Re-inserting an existing column replaces its value in place.
///
/// ```rust
/// use table_dao::prelude::*;
///
/// let criteria = Criteria::new()
///     .with("status", "active")
///     .with("id", vec![1_i64, 2, 3]);
/// assert_eq!(criteria.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    entries: Vec<(String, CriteriaValue)>,
}

impl Criteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CriteriaValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CriteriaValue>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CriteriaValue> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CriteriaValue)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for Criteria
where
    K: Into<String>,
    V: Into<CriteriaValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = Criteria::new();
        for (k, v) in iter {
            criteria.insert(k, v);
        }
        criteria
    }
}

/// Ordered placeholder-name → value list, in the order the names were generated.
///
/// Names are stored without the leading `:`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedParams {
    entries: Vec<(String, RowValues)>,
}

impl NamedParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style push. A leading `:` on `name` is stripped.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RowValues>) {
        let name = name.into();
        let name = match name.strip_prefix(':') {
            Some(stripped) => stripped.to_string(),
            None => name,
        };
        self.entries.push((name, value.into()));
    }

    /// Push a generated name, refusing one that is already present.
    ///
    /// Two columns can map onto the same placeholder (`b` as a list and `b_1` as a
    /// scalar both yield `w_b_1`); SQLite would give both the same slot.
    pub(crate) fn push_unique(
        &mut self,
        name: String,
        value: RowValues,
    ) -> Result<(), TableDaoError> {
        if self.entries.iter().any(|(n, _)| *n == name) {
            return Err(TableDaoError::invalid(format!(
                "placeholder :{name} is generated twice; rename one of the colliding columns"
            )));
        }
        self.entries.push((name, value));
        Ok(())
    }

    pub fn extend(&mut self, other: NamedParams) {
        self.entries.extend(other.entries);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RowValues> {
        let name = name.strip_prefix(':').unwrap_or(name);
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Placeholder names with their leading `:`, in binding order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| format!(":{n}")).collect()
    }
}
