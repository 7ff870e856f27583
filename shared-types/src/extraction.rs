use serde::{Deserialize, Serialize};

use crate::{DocumentClass, FieldMap, RawMessage};

/// Core trait that every document-class extractor implements
pub trait Extractor {
    /// Which kind of email this extractor understands
    fn document_class(&self) -> DocumentClass;

    /// The ordered queries run against each document
    fn queries(&self) -> &[FieldQuery];

    /// Extract all fields this document class knows about from a message.
    ///
    /// A message that is not HTML, or that matches none of the queries, yields
    /// an empty map. Only invalid selectors or patterns are errors.
    fn extract(&self, message: &RawMessage) -> Result<FieldMap, ExtractionError>;

    /// Get extractor version for tracking
    fn version(&self) -> String {
        "1.0.0".to_string()
    }
}

/// Extraction error types
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown document class: {0}")]
    UnknownDocumentClass(String),
}

/// Ordered list of keywords that matched text must contain.
///
/// Whether all (AND) or any (OR) keyword has to be present depends on the
/// operation consuming the set; field queries always use AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keywords.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// How a field value is derived once its query has matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "rule", content = "arg")]
pub enum ValueRule {
    /// Whitespace-collapsed text of the first matching element
    Text,
    /// Last space-separated token of the first matching element
    LastToken,
    /// Text following the first keyword inside the first matching element
    AfterLabel,
    /// First match is a label, value is the next element in the match list
    NextElement,
    /// Like `NextElement`, with the value normalized as an amount
    NextElementAmount,
    /// Attribute of the first matching element (e.g. `href`)
    Attribute(String),
}

/// Describes how to locate one named value in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldQuery {
    pub name: String,
    pub selector: String,
    #[serde(default)]
    pub keywords: KeywordSet,
    pub value: ValueRule,
}

impl FieldQuery {
    pub fn new(name: &str, selector: &str, keywords: KeywordSet, value: ValueRule) -> Self {
        Self {
            name: name.to_string(),
            selector: selector.to_string(),
            keywords,
            value,
        }
    }
}
