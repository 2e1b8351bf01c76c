//! Document structure.

use serde_json::Value;

use crate::error::{DocTermsError, Result};

/// A document represents a single item to be indexed.
///
/// Field order is preserved; a field may hold any number of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: Vec<(String, Vec<String>)>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing documents in a fluent manner.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Append a value to a field.
    pub fn add_value<F, V>(&mut self, field: F, value: V)
    where
        F: Into<String>,
        V: Into<String>,
    {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((field, vec![value])),
        }
    }

    /// Get the values of a field (empty if the field is absent).
    pub fn values(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over `(field, values)` pairs in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Check if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert a JSON object into a document.
    ///
    /// Scalars become single values, arrays become multiple values and
    /// `null` is skipped.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| DocTermsError::bad_request("Document must be a JSON object"))?;

        let mut doc = Document::new();
        for (field, value) in object {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = scalar_to_string(field, item)? {
                            doc.add_value(field.as_str(), text);
                        }
                    }
                }
                other => {
                    if let Some(text) = scalar_to_string(field, other)? {
                        doc.add_value(field.as_str(), text);
                    }
                }
            }
        }
        Ok(doc)
    }
}

fn scalar_to_string(field: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(DocTermsError::bad_request(format!(
            "Field '{field}' holds a nested value"
        ))),
    }
}

/// A builder for constructing documents.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a field.
    pub fn add<F, V>(mut self, field: F, value: V) -> Self
    where
        F: Into<String>,
        V: Into<String>,
    {
        self.document.add_value(field, value);
        self
    }

    /// Append several values to a field.
    pub fn add_all<F, I, V>(mut self, field: F, values: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let field = field.into();
        for value in values {
            self.document.add_value(field.clone(), value);
        }
        self
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.document
    }
}
