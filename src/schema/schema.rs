//! Schema management.

use ahash::AHashMap;

use crate::error::{DocTermsError, Result};
use crate::schema::field::{FieldDefinition, FieldType};

/// A schema defines which fields exist and how their values are encoded.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Map of field names to their definitions
    fields: AHashMap<String, FieldDefinition>,
    /// Ordered list of field names (for consistent ordering)
    field_names: Vec<String>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from `(name, definition)` pairs.
    pub fn from_definitions<I, S>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, FieldDefinition)>,
        S: Into<String>,
    {
        let mut schema = Schema::new();
        for (name, definition) in definitions {
            schema.add_field(name, definition)?;
        }
        Ok(schema)
    }

    /// Add a field to the schema.
    pub fn add_field<S: Into<String>>(&mut self, name: S, definition: FieldDefinition) -> Result<()> {
        let name = name.into();

        if name.is_empty() {
            return Err(DocTermsError::schema("Field name cannot be empty"));
        }
        if self.fields.contains_key(&name) {
            return Err(DocTermsError::schema(format!(
                "Field '{name}' already exists"
            )));
        }

        self.fields.insert(name.clone(), definition);
        self.field_names.push(name);
        Ok(())
    }

    /// Builder-style variant of [`Schema::add_field`].
    pub fn with_field<S: Into<String>>(mut self, name: S, definition: FieldDefinition) -> Result<Self> {
        self.add_field(name, definition)?;
        Ok(self)
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Get the type of a field, if it exists.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(|def| def.field_type)
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get all field names in the order they were added.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup_fields() {
        let schema = Schema::new()
            .with_field("tags", FieldDefinition::new(FieldType::String))
            .unwrap()
            .with_field("price", FieldDefinition::new(FieldType::LongPoint))
            .unwrap();

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.field_names(), &["tags".to_string(), "price".to_string()]);
        assert_eq!(schema.field_type("price"), Some(FieldType::LongPoint));
        assert!(schema.get_field("missing").is_none());
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let mut schema = Schema::new();
        schema
            .add_field("tags", FieldDefinition::new(FieldType::String))
            .unwrap();

        assert!(schema
            .add_field("tags", FieldDefinition::new(FieldType::Long))
            .is_err());
        assert!(schema
            .add_field("", FieldDefinition::new(FieldType::Long))
            .is_err());
    }
}
