//! Generic field tree of a decoded resource
//!
//! Resources decode into name-keyed structs of loosely typed values. The
//! accessors here turn a lookup plus an expected type into a `Result`, so
//! callers validate a record once instead of casting at every use.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::resource::ResourceReference;
use super::AssetError;

/// One value in a field tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// 32-bit integer
    Int(i32),
    /// 32-bit float
    Float(f32),
    /// String
    String(String),
    /// Four-component float vector
    Vector4([f32; 4]),
    /// Reference to another resource
    ResourceRef(ResourceReference),
    /// Nested struct
    Struct(FieldStruct),
    /// Array of values
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Type name used in error messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Vector4(_) => "vector4",
            Self::ResourceRef(_) => "resource reference",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
        }
    }

    /// View this value as a struct; `context` names it in the error
    pub fn as_struct(&self, context: &str) -> Result<&FieldStruct, AssetError> {
        match self {
            Self::Struct(fields) => Ok(fields),
            other => Err(type_error(context, "struct", other)),
        }
    }
}

/// Name-keyed struct of field values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldStruct {
    fields: HashMap<String, FieldValue>,
}

impl FieldStruct {
    /// Create an empty struct
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Insert or replace a field
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Untyped lookup
    pub fn get(&self, name: &str) -> Result<&FieldValue, AssetError> {
        self.fields
            .get(name)
            .ok_or_else(|| AssetError::MissingField(name.to_string()))
    }

    /// Integer field
    pub fn int(&self, name: &str) -> Result<i32, AssetError> {
        match self.get(name)? {
            FieldValue::Int(value) => Ok(*value),
            other => Err(type_error(name, "int", other)),
        }
    }

    /// Float field
    pub fn float(&self, name: &str) -> Result<f32, AssetError> {
        match self.get(name)? {
            FieldValue::Float(value) => Ok(*value),
            other => Err(type_error(name, "float", other)),
        }
    }

    /// String field
    pub fn string(&self, name: &str) -> Result<&str, AssetError> {
        match self.get(name)? {
            FieldValue::String(value) => Ok(value),
            other => Err(type_error(name, "string", other)),
        }
    }

    /// Vector field in `[x, y, z, w]` order
    pub fn vector4(&self, name: &str) -> Result<[f32; 4], AssetError> {
        match self.get(name)? {
            FieldValue::Vector4(value) => Ok(*value),
            other => Err(type_error(name, "vector4", other)),
        }
    }

    /// Resource reference field
    pub fn resource_ref(&self, name: &str) -> Result<&ResourceReference, AssetError> {
        match self.get(name)? {
            FieldValue::ResourceRef(value) => Ok(value),
            other => Err(type_error(name, "resource reference", other)),
        }
    }

    /// Array field
    pub fn array(&self, name: &str) -> Result<&[FieldValue], AssetError> {
        match self.get(name)? {
            FieldValue::Array(values) => Ok(values),
            other => Err(type_error(name, "array", other)),
        }
    }

    /// Array field whose elements must all be structs
    pub fn struct_array(&self, name: &str) -> Result<Vec<&FieldStruct>, AssetError> {
        self.array(name)?
            .iter()
            .map(|value| value.as_struct(name))
            .collect()
    }
}

fn type_error(field: &str, expected: &'static str, found: &FieldValue) -> AssetError {
    AssetError::FieldType {
        field: field.to_string(),
        expected,
        found: found.type_name(),
    }
}
