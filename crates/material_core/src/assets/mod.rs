//! Asset loading: resource model, field trees and materials

pub mod field_tree;
pub mod resource;
pub mod materials;

#[cfg(test)]
mod test_material_loading;

pub use field_tree::{FieldStruct, FieldValue};
pub use materials::{MaterialLoader, MaterialResource};
pub use resource::{
    RawTextureHeader, ReadSeek, Resource, ResourceReference, ResourceResolver, TextureResource,
};

use thiserror::Error;

use crate::render::texture::TextureFormat;

/// Asset loading errors
///
/// `NotFound` and `UnsupportedFormat` are recoverable: the loader logs them
/// and substitutes the fallback texture. Every other variant aborts the load.
#[derive(Error, Debug)]
pub enum AssetError {
    /// Resource could not be resolved
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Known pixel format the decoder does not handle
    #[error("Unsupported texture format: {0:?}")]
    UnsupportedFormat(TextureFormat),

    /// Pixel format code outside the known set
    #[error("Unrecognized texture format: {0}")]
    UnrecognizedFormat(u32),

    /// Stream ended inside a mip level
    #[error("Texture stream truncated in mip level {level}: needed {expected} bytes")]
    TruncatedStream {
        /// Mip level being read
        level: u32,
        /// Bytes the level requires
        expected: usize,
    },

    /// Texture header that cannot describe a mip chain
    #[error("Invalid texture: {0}")]
    InvalidTexture(String),

    /// Required field absent from a field tree
    #[error("Required field not found: {0}")]
    MissingField(String),

    /// Field present with the wrong type
    #[error("Field {field} is {found}, expected {expected}")]
    FieldType {
        /// Field name
        field: String,
        /// Expected type
        expected: &'static str,
        /// Actual type
        found: &'static str,
    },

    /// Parameter name repeated within a table that requires unique names
    #[error("Duplicate {table} entry: {name}")]
    DuplicateParameter {
        /// Table the entry belongs to
        table: &'static str,
        /// Repeated name
        name: String,
    },

    /// Resource resolved to the wrong kind of data
    #[error("Resource {name} is a {found}, expected a {expected}")]
    UnexpectedResource {
        /// Compiled resource name
        name: String,
        /// Expected kind
        expected: &'static str,
        /// Actual kind
        found: &'static str,
    },

    /// IO error while reading a resource stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    /// Whether the loader degrades to a fallback instead of failing
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::UnsupportedFormat(_))
    }
}
