//! Resource resolution seam
//!
//! Finding a compiled resource by name (loose files next to the current file,
//! then archive packages) happens outside this crate. A [`ResourceResolver`]
//! hands back either the decoded field tree of a resource or, for textures,
//! the texture header plus a stream positioned anywhere in the resource.

use std::fmt;
use std::io::{Read, Seek};

use serde::{Deserialize, Serialize};

use super::field_tree::FieldStruct;

/// Reference from one resource to another
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceReference {
    /// Logical resource name, without the compiled suffix
    pub name: String,
    /// Hashed resource id, 0 when unknown
    #[serde(default)]
    pub id: u64,
}

impl ResourceReference {
    /// Reference by name only
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: 0,
        }
    }
}

/// Byte stream of a texture resource
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Texture header fields exactly as stored in the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawTextureHeader {
    /// Pixel format code
    pub format: u32,
    /// Width of the finest mip level
    pub width: u32,
    /// Height of the finest mip level
    pub height: u32,
    /// Number of stored mip levels
    pub mip_levels: u32,
    /// Texture flag bits
    pub flags: u32,
    /// Offset of the mip data within the stream
    pub data_offset: u64,
}

/// Texture resource: header plus the stream holding its mip data
pub struct TextureResource {
    /// Header fields
    pub header: RawTextureHeader,
    /// Resource stream
    pub stream: Box<dyn ReadSeek>,
}

impl TextureResource {
    /// Wrap a header and any seekable stream
    pub fn new(header: RawTextureHeader, stream: impl ReadSeek + 'static) -> Self {
        Self {
            header,
            stream: Box::new(stream),
        }
    }
}

impl fmt::Debug for TextureResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureResource")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// A resolved resource
#[derive(Debug)]
pub enum Resource {
    /// Structured resource, e.g. a material
    Fields(FieldStruct),
    /// Texture resource
    Texture(TextureResource),
}

impl Resource {
    /// Short kind name for diagnostics
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fields(_) => "field tree",
            Self::Texture(_) => "texture",
        }
    }
}

/// Locates compiled resources by name
pub trait ResourceResolver {
    /// Resolve a compiled resource name (suffix already applied); `None` when absent
    fn resolve(&mut self, name: &str) -> Option<Resource>;
}

impl<R: ResourceResolver + ?Sized> ResourceResolver for &mut R {
    fn resolve(&mut self, name: &str) -> Option<Resource> {
        (**self).resolve(name)
    }
}
