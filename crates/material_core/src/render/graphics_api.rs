//! Graphics API seam
//!
//! The loader never talks to a concrete graphics library. Everything it needs
//! from the GPU goes through [`GraphicsApi`], which mirrors the small slice of
//! a GL-style texture interface the loader uses. All calls are write-only:
//! nothing is queried back from the GPU.
//!
//! Call order per texture object: `create_texture`, then `bind_texture`, then
//! any number of parameter and upload calls, which apply to the bound object.

slotmap::new_key_type! {
    /// Opaque handle for a GPU texture object
    pub struct TextureHandle;
}

/// Minification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinFilter {
    /// Nearest texel, no mip blending
    Nearest,
    /// Linear within and between mip levels
    LinearMipmapLinear,
}

/// Magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagFilter {
    /// Nearest texel
    Nearest,
    /// Bilinear
    Linear,
}

/// Texture wrapping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Repeat the texture
    Repeat,
    /// Clamp to the edge texel
    Clamp,
}

/// Per-texture integer parameter applied to the bound texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureParameter {
    /// Highest mip level index that may be sampled
    MaxLevel(u32),
    /// Minification filter
    MinFilter(MinFilter),
    /// Magnification filter
    MagFilter(MagFilter),
    /// Wrap mode along S (u)
    WrapS(WrapMode),
    /// Wrap mode along T (v)
    WrapT(WrapMode),
    /// Maximum anisotropic filtering level
    MaxAnisotropy(u32),
}

/// Block-compressed upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressedFormat {
    /// S3TC DXT1 with 1-bit alpha, 8 bytes per 4x4 block
    RgbaS3tcDxt1,
    /// S3TC DXT5, 16 bytes per 4x4 block
    RgbaS3tcDxt5,
}

impl CompressedFormat {
    /// Bytes used by one 4x4 block
    pub const fn block_size(self) -> usize {
        match self {
            Self::RgbaS3tcDxt1 => 8,
            Self::RgbaS3tcDxt5 => 16,
        }
    }
}

/// Capability surface of the graphics context owning the textures
///
/// Implementations must run on the thread that owns the context.
pub trait GraphicsApi {
    /// Allocate a new texture object
    fn create_texture(&mut self) -> TextureHandle;

    /// Bind a texture object as the current 2D texture
    fn bind_texture(&mut self, texture: TextureHandle);

    /// Set an integer parameter on the bound texture
    fn set_parameter(&mut self, parameter: TextureParameter);

    /// Upload one compressed mip level of the bound texture
    fn upload_compressed(
        &mut self,
        level: u32,
        format: CompressedFormat,
        width: u32,
        height: u32,
        data: &[u8],
    );

    /// Upload level 0 of the bound texture as 32-bit float RGBA pixels
    fn upload_rgba32f(&mut self, width: u32, height: u32, pixels: &[u8]);

    /// Release a texture object
    fn delete_texture(&mut self, texture: TextureHandle);
}

impl<G: GraphicsApi + ?Sized> GraphicsApi for &mut G {
    fn create_texture(&mut self) -> TextureHandle {
        (**self).create_texture()
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        (**self).bind_texture(texture);
    }

    fn set_parameter(&mut self, parameter: TextureParameter) {
        (**self).set_parameter(parameter);
    }

    fn upload_compressed(
        &mut self,
        level: u32,
        format: CompressedFormat,
        width: u32,
        height: u32,
        data: &[u8],
    ) {
        (**self).upload_compressed(level, format, width, height, data);
    }

    fn upload_rgba32f(&mut self, width: u32, height: u32, pixels: &[u8]) {
        (**self).upload_rgba32f(width, height, pixels);
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        (**self).delete_texture(texture);
    }
}
