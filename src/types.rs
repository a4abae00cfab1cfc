use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlSessionError;

/// A single SQL-bindable value, shared by every connector.
///
/// Bindings convert program values into `SqlValue`s on the way into a
/// statement and back out of result rows, so generic code never touches
/// driver-specific types.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let SqlValue::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(value) => Some(*value),
            SqlValue::Int(1) => Some(true),
            SqlValue::Int(0) => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SqlValue::Float(value) => Some(*value),
            SqlValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Name of the variant, for error reporting.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Int(_) => "Int",
            SqlValue::Float(_) => "Float",
            SqlValue::Text(_) => "Text",
            SqlValue::Bool(_) => "Bool",
            SqlValue::Timestamp(_) => "Timestamp",
            SqlValue::Null => "Null",
            SqlValue::Json(_) => "Json",
            SqlValue::Blob(_) => "Blob",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<JsonValue> for SqlValue {
    fn from(value: JsonValue) -> Self {
        SqlValue::Json(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// Convert a program scalar into an [`SqlValue`] for input binding.
pub trait ToSqlValue {
    fn to_sql_value(&self) -> SqlValue;
}

/// Rebuild a program scalar from an [`SqlValue`] pulled out of a result row.
pub trait FromSqlValue: Sized {
    /// # Errors
    ///
    /// Returns `SqlSessionError::UnsupportedType` if the value cannot be
    /// represented as `Self`.
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError>;
}

fn unsupported(expected: &'static str, value: &SqlValue) -> SqlSessionError {
    SqlSessionError::UnsupportedType {
        expected,
        found: value.type_name(),
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Int(*self)
    }
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value.as_int().ok_or_else(|| unsupported("i64", value))
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Int(i64::from(*self))
    }
}

impl FromSqlValue for i32 {
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        let wide = value.as_int().ok_or_else(|| unsupported("i32", value))?;
        i32::try_from(wide).map_err(|_| unsupported("i32", value))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Float(*self)
    }
}

impl FromSqlValue for f64 {
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value.as_float().ok_or_else(|| unsupported("f64", value))
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value.as_bool().ok_or_else(|| unsupported("bool", value))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Text(s) => Ok(s.clone()),
            _ => Err(unsupported("String", value)),
        }
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Timestamp(*self)
    }
}

impl FromSqlValue for NaiveDateTime {
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value
            .as_timestamp()
            .ok_or_else(|| unsupported("NaiveDateTime", value))
    }
}

impl ToSqlValue for JsonValue {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Json(self.clone())
    }
}

impl FromSqlValue for JsonValue {
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Json(j) => Ok(j.clone()),
            _ => Err(unsupported("serde_json::Value", value)),
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Blob(self.clone())
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Blob(bytes) => Ok(bytes.clone()),
            _ => Err(unsupported("Vec<u8>", value)),
        }
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(&self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_sql_value(value).map(Some)
        }
    }
}

/// Mapping between a program type and one or more SQL columns.
///
/// Scalar types get this for free through [`ToSqlValue`]/[`FromSqlValue`];
/// composite record types implement it directly and may span several
/// parameter positions. A statement reconciles the sum of `COLUMNS`
/// across all input bindings against the placeholder count of its SQL
/// source at first execution.
pub trait SqlRecord: Sized {
    /// How many SQL parameter/column positions one value occupies.
    const COLUMNS: usize;

    /// Append this value's column values, in position order.
    fn bind_values(&self, out: &mut Vec<SqlValue>);

    /// Rebuild a value from exactly `COLUMNS` result columns.
    ///
    /// # Errors
    ///
    /// Returns `SqlSessionError::UnsupportedType` if any column cannot be
    /// converted.
    fn from_row(row: &[SqlValue]) -> Result<Self, SqlSessionError>;
}

impl<T> SqlRecord for T
where
    T: ToSqlValue + FromSqlValue,
{
    const COLUMNS: usize = 1;

    fn bind_values(&self, out: &mut Vec<SqlValue>) {
        out.push(self.to_sql_value());
    }

    fn from_row(row: &[SqlValue]) -> Result<Self, SqlSessionError> {
        match row {
            [value] => T::from_sql_value(value),
            _ => Err(SqlSessionError::BindingCountMismatch {
                placeholders: 1,
                bound: row.len(),
            }),
        }
    }
}

/// Key extraction for associative output targets.
///
/// Retrieving rows into a map inserts each element under the key its
/// type reports here.
pub trait Keyed {
    type Key;

    fn key(&self) -> Self::Key;
}
