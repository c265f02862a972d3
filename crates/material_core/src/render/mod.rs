//! Rendering side of material loading
//!
//! The loader only needs textures from the GPU, so this module is small:
//! the [`GraphicsApi`] seam, a headless implementation of it, the runtime
//! [`Material`] type and texture decoding.

pub mod graphics_api;
pub mod headless;
pub mod material;
pub mod texture;

pub use graphics_api::{
    CompressedFormat, GraphicsApi, MagFilter, MinFilter, TextureHandle, TextureParameter, WrapMode,
};
pub use headless::RecordingDevice;
pub use material::{
    Material, COLOR1_SLOT, COLOR2_SLOT, COLOR_SLOT, COLOR_TINT_PARAM, NORMAL_SLOT,
    SOLID_COLOR_PARAM, TEXCOORD_OFFSET_PARAM, TEXCOORD_SCALE_PARAM,
};
