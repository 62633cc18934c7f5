use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::services::error_handling::DeskError;

/// Identifier of a record within one page's collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it is one. Seed data uses "1".."n".
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Typed attribute value exposed by a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(OrderedFloat<f64>),
    Flag(bool),
    /// Dates stay in their display form; sorting normalises them.
    Date(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    pub fn date(value: impl Into<String>) -> Self {
        Self::Date(value.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Flag(_) => "flag",
            Self::Date(_) => "date",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Date(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n.into_inner()),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Text used by the search step. Whole numbers print without a
    /// fractional part (`150`, not `150.0`).
    pub fn search_text(&self) -> String {
        match self {
            Self::Text(s) | Self::Date(s) => s.clone(),
            Self::Number(n) => format_number(n.into_inner()),
            Self::Flag(b) => b.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.search_text())
    }
}

pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Page collections hold records behind `Arc` so mutations can reuse
/// every record they do not touch.
pub type Collection<R> = Vec<Arc<R>>;

/// A uniquely identified, attribute-bearing object shown in a list.
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    /// Name used in logs and error messages.
    const KIND: &'static str;

    fn id(&self) -> &RecordId;

    fn with_id(self, id: RecordId) -> Self;

    fn field(&self, name: &str) -> Option<FieldValue>;

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), DeskError>;
}

/// Shared helpers for `set_field` implementations.
pub(crate) fn expect_text(field: &str, value: FieldValue) -> Result<String, DeskError> {
    match value {
        FieldValue::Text(s) | FieldValue::Date(s) => Ok(s),
        _ => Err(DeskError::FieldTypeMismatch {
            field: field.to_string(),
            expected: "text",
        }),
    }
}

pub(crate) fn expect_number(field: &str, value: FieldValue) -> Result<f64, DeskError> {
    value.as_number().ok_or_else(|| DeskError::FieldTypeMismatch {
        field: field.to_string(),
        expected: "number",
    })
}

pub(crate) fn expect_flag(field: &str, value: FieldValue) -> Result<bool, DeskError> {
    value.as_flag().ok_or_else(|| DeskError::FieldTypeMismatch {
        field: field.to_string(),
        expected: "flag",
    })
}

pub(crate) fn unknown_field(record: &'static str, field: &str) -> DeskError {
    DeskError::UnknownField {
        record,
        field: field.to_string(),
    }
}

/// Wraps plain records into a page collection.
pub fn collect<R: Record>(records: impl IntoIterator<Item = R>) -> Collection<R> {
    records.into_iter().map(Arc::new).collect()
}
