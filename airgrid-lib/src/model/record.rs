//! Immutable provider record

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::error::FieldError;

/// One row delivered by a page provider.
///
/// Records are identified by a provider-assigned string id and hold their
/// fields as a `HashMap<String, Value>`. Once received a record is never
/// mutated; the builder-style [`Record::set`] exists for providers and tests
/// assembling rows.
///
/// The serde form is flat: `{"id": "rec1", "createdTime": "...", "Name": "..."}`.
///
/// # Example
///
/// ```
/// use airgrid_lib::model::Record;
///
/// let record = Record::new("rec1")
///     .set("name", "Zeta")
///     .set("price", 5i64);
///
/// assert_eq!(record.get_str("name").unwrap(), Some("Zeta"));
/// assert_eq!(record.text("missing"), "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: String,
    #[serde(
        rename = "createdTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    created_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new record with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_time: None,
            fields: HashMap::new(),
        }
    }

    /// Creates a record from already-decoded parts.
    pub fn from_parts(
        id: impl Into<String>,
        created_time: Option<DateTime<Utc>>,
        fields: HashMap<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            created_time,
            fields,
        }
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns the provider-assigned identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns when the provider created the record, if it reported it.
    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.created_time
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the string form of a field; missing fields read as empty.
    pub fn text(&self, field: &str) -> Cow<'_, str> {
        self.fields
            .get(field)
            .map(Value::to_text)
            .unwrap_or(Cow::Borrowed(""))
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if field is missing or wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field.
    pub fn get_str(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(FieldError::type_mismatch(field, "string", other.type_name())),
        }
    }

    /// Gets a numeric field; integers are widened to `f64`.
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n as f64)),
            Some(Value::Float(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(field, "number", other.type_name())),
        }
    }
}
