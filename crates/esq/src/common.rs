//! 📦 Common data structures — the building blocks of esq
//!
//! 🎬 COLD OPEN — INT. TERMINAL — 11:52 PM
//!
//! Somebody typed `esq index bulk "" docs.ndjson`. The empty string stared back.
//! It had no name. It wanted to be an index. It was not going to be an index.
//!
//! This module holds the two tiny types that ferry things through the pipeline:
//! [`Document`] (an opaque JSON payload we promise not to read) and
//! [`IndexName`] (a string that has been checked for the bare minimum of dignity).
//!
//! 🦆

use std::fmt;

use crate::error::IngestError;

/// 📄 One record to index, already serialized as JSON text.
///
/// We never parse it. We never validate it. We carry it to the backend like a sealed
/// envelope, and if it turns out to contain `{"oops":` then the backend gets to be the
/// one who says so, item error and all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(String);

impl Document {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Document {
    fn from(payload: String) -> Self {
        Self(payload)
    }
}

impl From<&str> for Document {
    fn from(payload: &str) -> Self {
        Self(payload.to_string())
    }
}

/// 🏷️ A validated target index name.
///
/// The only way in is [`IndexName::new`], which rejects empty and whitespace-only
/// names. Everything downstream can therefore assume it holds something that at least
/// *looks* like a name. Whether the cluster agrees (uppercase? leading underscore?) is
/// between you and the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexName(String);

impl IndexName {
    /// 🔒 Validate and wrap. No network involved, no excuses accepted.
    pub fn new(name: impl Into<String>) -> Result<Self, IngestError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(IngestError::Validation(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn the_one_where_blank_names_are_turned_away_at_the_door() {
        for blank in ["", " ", "   ", "\t\n"] {
            let err = IndexName::new(blank).expect_err("💀 blank names must not pass");
            assert_eq!(err.kind(), FailureKind::Validation);
        }
    }

    #[test]
    fn the_one_where_a_real_name_gets_in() {
        let index = IndexName::new("wiki-articles").expect("💀 a perfectly fine name was rejected");
        assert_eq!(index.as_str(), "wiki-articles");
        assert_eq!(index.to_string(), "wiki-articles");
    }

    #[test]
    fn the_one_where_documents_stay_sealed() {
        let doc = Document::from(r#"{"title":"not even json"#);
        assert_eq!(doc.as_str(), r#"{"title":"not even json"#);
        assert_eq!(doc.len(), 23);
        assert!(!doc.is_empty());
    }
}
