use serde::Deserialize;

use crate::error::SqlSessionError;

/// Connection settings for the memory connector.
///
/// The connection string is either empty (or `:memory:`) for a private
/// anonymous database, a bare database name for a process-shared one,
/// or a JSON object:
///
/// ```text
/// {"name": "scores", "read_only": true}
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Shared database name; `None` gives this connection its own
    /// private database.
    pub name: Option<String>,
    /// Open with the `readOnly` feature already set.
    pub read_only: bool,
}

impl MemoryConfig {
    /// Parse a connector-defined connection string.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` for malformed JSON.
    pub fn parse(connection_string: &str) -> Result<Self, SqlSessionError> {
        let trimmed = connection_string.trim();
        if trimmed.is_empty() || trimmed == ":memory:" {
            Ok(Self::default())
        } else if trimmed.starts_with('{') {
            serde_json::from_str(trimmed).map_err(|e| {
                SqlSessionError::ConnectionError(format!("invalid connection string: {e}"))
            })
        } else {
            Ok(Self {
                name: Some(trimmed.to_string()),
                read_only: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_and_json_forms() {
        let cfg = MemoryConfig::parse("scores").unwrap();
        assert_eq!(cfg.name.as_deref(), Some("scores"));
        assert!(!cfg.read_only);

        let cfg = MemoryConfig::parse(r#"{"name": "scores", "read_only": true}"#).unwrap();
        assert_eq!(cfg.name.as_deref(), Some("scores"));
        assert!(cfg.read_only);

        let cfg = MemoryConfig::parse("  :memory:  ").unwrap();
        assert!(cfg.name.is_none());

        assert!(MemoryConfig::parse("{not json").is_err());
    }
}
