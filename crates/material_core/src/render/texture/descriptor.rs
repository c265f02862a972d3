//! Texture header interpretation and mip chain geometry

use bitflags::bitflags;

use crate::assets::{AssetError, RawTextureHeader};
use crate::render::graphics_api::{CompressedFormat, WrapMode};

bitflags! {
    /// Sampling hints stored with a texture resource
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureFlags: u32 {
        /// Clamp along S instead of repeating
        const SUGGEST_CLAMP_S = 0x0000_0001;
        /// Clamp along T instead of repeating
        const SUGGEST_CLAMP_T = 0x0000_0002;
        /// Clamp along U (volume textures)
        const SUGGEST_CLAMP_U = 0x0000_0004;
        /// Texture should not be streamed by LOD
        const NO_LOD = 0x0000_0008;
        /// Six-faced cube texture
        const CUBE_TEXTURE = 0x0000_0010;
        /// 3D texture
        const VOLUME_TEXTURE = 0x0000_0020;
        /// Array texture
        const TEXTURE_ARRAY = 0x0000_0040;
    }
}

/// Pixel formats a texture resource may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// S3TC DXT1
    Dxt1,
    /// S3TC DXT5
    Dxt5,
    /// 8-bit intensity
    I8,
    /// Uncompressed 8 bits per channel RGBA
    Rgba8888,
}

impl TextureFormat {
    /// Map a stored format code; unknown codes are corrupt data
    pub fn from_code(code: u32) -> Result<Self, AssetError> {
        match code {
            1 => Ok(Self::Dxt1),
            2 => Ok(Self::Dxt5),
            3 => Ok(Self::I8),
            4 => Ok(Self::Rgba8888),
            other => Err(AssetError::UnrecognizedFormat(other)),
        }
    }

    /// Upload format when the decoder can handle this format
    pub const fn compressed(self) -> Option<CompressedFormat> {
        match self {
            Self::Dxt1 => Some(CompressedFormat::RgbaS3tcDxt1),
            Self::Dxt5 => Some(CompressedFormat::RgbaS3tcDxt5),
            Self::I8 | Self::Rgba8888 => None,
        }
    }
}

/// Validated texture header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor {
    /// Declared pixel format
    pub format: TextureFormat,
    /// Width of mip level 0
    pub width: u32,
    /// Height of mip level 0
    pub height: u32,
    /// Number of mip levels in the stream
    pub mip_levels: u32,
    /// `width >> mip_levels`, the seed the level sizes are doubled from
    pub base_width: u32,
    /// `height >> mip_levels`
    pub base_height: u32,
    /// Sampling hints
    pub flags: TextureFlags,
    /// Byte offset of the smallest mip level within the resource stream
    pub data_offset: u64,
}

impl TryFrom<&RawTextureHeader> for TextureDescriptor {
    type Error = AssetError;

    fn try_from(header: &RawTextureHeader) -> Result<Self, Self::Error> {
        let format = TextureFormat::from_code(header.format)?;
        if header.mip_levels == 0 {
            return Err(AssetError::InvalidTexture("texture declares zero mip levels".to_string()));
        }
        if header.mip_levels > 32 {
            return Err(AssetError::InvalidTexture(format!(
                "texture declares {} mip levels",
                header.mip_levels
            )));
        }
        Ok(Self {
            format,
            width: header.width,
            height: header.height,
            mip_levels: header.mip_levels,
            base_width: header.width.checked_shr(header.mip_levels).unwrap_or(0),
            base_height: header.height.checked_shr(header.mip_levels).unwrap_or(0),
            flags: TextureFlags::from_bits_retain(header.flags),
            data_offset: header.data_offset,
        })
    }
}

impl TextureDescriptor {
    /// Dimensions of a mip level
    ///
    /// Sizes start from the base extent and double once per level from the
    /// coarsest level down to `level`; a zero base becomes 1 before doubling
    /// continues. For sizes that are not a power of two level 0 can come out
    /// smaller than `width` x `height`.
    pub const fn mip_extent(&self, level: u32) -> (u32, u32) {
        (
            doubled_extent(self.base_width, self.mip_levels, level),
            doubled_extent(self.base_height, self.mip_levels, level),
        )
    }

    /// Bytes level `level` occupies for the given block size
    pub fn level_size(&self, level: u32, block_size: usize) -> Result<usize, AssetError> {
        let (width, height) = self.mip_extent(level);
        compressed_size(width, height, block_size).ok_or_else(|| {
            AssetError::InvalidTexture(format!("mip level {} of {}x{} is too large", level, width, height))
        })
    }

    /// Wrap mode along S
    pub const fn wrap_s(&self) -> WrapMode {
        if self.flags.contains(TextureFlags::SUGGEST_CLAMP_S) {
            WrapMode::Clamp
        } else {
            WrapMode::Repeat
        }
    }

    /// Wrap mode along T
    pub const fn wrap_t(&self) -> WrapMode {
        if self.flags.contains(TextureFlags::SUGGEST_CLAMP_T) {
            WrapMode::Clamp
        } else {
            WrapMode::Repeat
        }
    }
}

const fn doubled_extent(base: u32, mip_levels: u32, level: u32) -> u32 {
    if base == 0 {
        1 << (mip_levels - 1).saturating_sub(level)
    } else {
        base << mip_levels.saturating_sub(level)
    }
}

/// Bytes occupied by a block-compressed image, `None` if that overflows `usize`
pub fn compressed_size(width: u32, height: u32, block_size: usize) -> Option<usize> {
    let blocks_wide = width.div_ceil(4) as usize;
    let blocks_high = height.div_ceil(4) as usize;
    blocks_wide.checked_mul(blocks_high)?.checked_mul(block_size)
}
