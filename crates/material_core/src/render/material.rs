//! Runtime material: parameter tables plus GPU textures bound to named slots

use std::collections::HashMap;

use crate::foundation::math::Vec4;
use super::graphics_api::TextureHandle;

/// Primary color texture slot; always present on a loaded material
pub const COLOR_SLOT: &str = "g_tColor";
/// Normal map slot
pub const NORMAL_SLOT: &str = "g_tNormal";
/// First alternate color slot of layered materials
pub const COLOR1_SLOT: &str = "g_tColor1";
/// Second alternate color slot of layered materials
pub const COLOR2_SLOT: &str = "g_tColor2";

/// Int parameter selecting the solid-color path
pub const SOLID_COLOR_PARAM: &str = "F_SOLID_COLOR";
/// Vector parameter holding the tint / solid color
pub const COLOR_TINT_PARAM: &str = "g_vColorTint";
/// Vector parameter holding the texture coordinate scale
pub const TEXCOORD_SCALE_PARAM: &str = "g_vTexCoordScale";
/// Vector parameter holding the texture coordinate offset
pub const TEXCOORD_OFFSET_PARAM: &str = "g_vTexCoordOffset";

/// Loaded material
///
/// Parameters feed rendering; attributes are descriptive metadata. Once a
/// material is handed out by the loader it is shared and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    /// Material name as stored in the resource
    pub name: String,
    /// Shader the material was authored for
    pub shader_name: String,
    /// Integer parameters
    pub int_params: HashMap<String, i32>,
    /// Float parameters
    pub float_params: HashMap<String, f32>,
    /// Vector parameters
    pub vector_params: HashMap<String, Vec4>,
    /// Integer attributes
    pub int_attributes: HashMap<String, i32>,
    /// Float attributes
    pub float_attributes: HashMap<String, f32>,
    /// Vector attributes
    pub vector_attributes: HashMap<String, Vec4>,
    /// String attributes
    pub string_attributes: HashMap<String, String>,
    /// Textures by slot name
    pub textures: HashMap<String, TextureHandle>,
}

impl Material {
    /// Create an empty material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Texture bound to `slot`
    pub fn texture(&self, slot: &str) -> Option<TextureHandle> {
        self.textures.get(slot).copied()
    }

    /// Integer parameter
    pub fn int_param(&self, name: &str) -> Option<i32> {
        self.int_params.get(name).copied()
    }

    /// Float parameter
    pub fn float_param(&self, name: &str) -> Option<f32> {
        self.float_params.get(name).copied()
    }

    /// Vector parameter
    pub fn vector_param(&self, name: &str) -> Option<Vec4> {
        self.vector_params.get(name).copied()
    }

    /// Whether the material asks for a generated solid-color texture
    pub fn is_solid_color(&self) -> bool {
        self.int_param(SOLID_COLOR_PARAM) == Some(1)
    }
}
