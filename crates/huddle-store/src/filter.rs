//! Subscription and query filters, evaluated against serialized documents.

use serde_json::Value;

/// A composable document filter for subscriptions and queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document in the collection.
    All,
    /// Field equals value.
    Eq { field: String, value: Value },
    /// Field is an array containing value.
    Contains { field: String, value: Value },
    /// At least one sub-filter matches.
    AnyOf(Vec<Filter>),
    /// Every sub-filter matches.
    AllOf(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn any_of(filters: Vec<Self>) -> Self {
        Self::AnyOf(filters)
    }

    #[must_use]
    pub fn all_of(filters: Vec<Self>) -> Self {
        Self::AllOf(filters)
    }

    /// Evaluate against a serialized document.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::All => true,
            Self::Eq { field, value } => doc.get(field) == Some(value),
            Self::Contains { field, value } => doc
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
            Self::AnyOf(filters) => filters.iter().any(|f| f.matches(doc)),
            Self::AllOf(filters) => filters.iter().all(|f| f.matches(doc)),
        }
    }
}
