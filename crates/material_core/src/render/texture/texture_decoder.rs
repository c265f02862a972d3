//! Block-compressed texture decoding and upload
//!
//! Mip levels are stored coarsest first, so the stream is consumed from level
//! `mip_levels - 1` down to level 0. Each level occupies exactly
//! `ceil(w / 4) * ceil(h / 4) * block_size` bytes. The whole chain is read
//! before any GPU object is created, so a truncated stream never leaves a
//! half-uploaded texture behind.

use std::io::{Read, Seek, SeekFrom};

use super::descriptor::TextureDescriptor;
use super::texture_factory::TextureFactory;
use crate::assets::{AssetError, TextureResource};
use crate::render::graphics_api::{
    CompressedFormat, GraphicsApi, MagFilter, MinFilter, TextureHandle, TextureParameter,
};

/// Compressed bytes of one mip level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Level index, 0 is the finest
    pub level: u32,
    /// Level width in pixels
    pub width: u32,
    /// Level height in pixels
    pub height: u32,
    /// Compressed block data
    pub data: Vec<u8>,
}

/// Read every mip level of `descriptor` from `reader`, coarsest first
///
/// The returned levels are in stream order (coarsest first). The reader is
/// left positioned right after the finest level. Buffers grow with the bytes
/// actually read, so a header claiming a huge image fails on the short stream
/// instead of allocating the claimed size up front.
pub fn read_mip_chain<R: Read + ?Sized>(
    descriptor: &TextureDescriptor,
    format: CompressedFormat,
    reader: &mut R,
) -> Result<Vec<MipLevel>, AssetError> {
    let mut levels = Vec::with_capacity(descriptor.mip_levels as usize);

    for level in (0..descriptor.mip_levels).rev() {
        let (width, height) = descriptor.mip_extent(level);
        let expected = descriptor.level_size(level, format.block_size())?;

        let mut data = Vec::new();
        (&mut *reader).take(expected as u64).read_to_end(&mut data)?;
        if data.len() < expected {
            return Err(AssetError::TruncatedStream { level, expected });
        }

        levels.push(MipLevel {
            level,
            width,
            height,
            data,
        });
    }

    Ok(levels)
}

/// Total bytes a mip chain occupies in the stream
pub fn mip_chain_size(
    descriptor: &TextureDescriptor,
    format: CompressedFormat,
) -> Result<usize, AssetError> {
    (0..descriptor.mip_levels).try_fold(0usize, |total, level| {
        let size = descriptor.level_size(level, format.block_size())?;
        total
            .checked_add(size)
            .ok_or_else(|| AssetError::InvalidTexture("mip chain size overflows".to_string()))
    })
}

/// Uploads texture resources as mipmapped GPU textures
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureDecoder {
    max_anisotropy: u32,
}

impl TextureDecoder {
    /// Create a decoder; `max_anisotropy` of 0 leaves anisotropy unset
    pub const fn new(max_anisotropy: u32) -> Self {
        Self { max_anisotropy }
    }

    /// Configured anisotropy level
    pub const fn max_anisotropy(&self) -> u32 {
        self.max_anisotropy
    }

    /// Decode and upload `resource`, falling back on unsupported formats
    ///
    /// Unsupported but known formats yield the fallback texture. Unknown
    /// formats and short streams are returned as errors.
    pub fn decode<G: GraphicsApi>(
        &self,
        graphics: &mut G,
        factory: &mut TextureFactory,
        name: &str,
        resource: TextureResource,
    ) -> Result<TextureHandle, AssetError> {
        match self.upload(graphics, resource) {
            Ok(texture) => {
                log::debug!("Uploaded texture {}", name);
                Ok(texture)
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("{} in {}, using fallback texture", e, name);
                Ok(factory.fallback_texture(graphics))
            }
            Err(e) => Err(e),
        }
    }

    fn upload<G: GraphicsApi>(
        &self,
        graphics: &mut G,
        mut resource: TextureResource,
    ) -> Result<TextureHandle, AssetError> {
        let descriptor = TextureDescriptor::try_from(&resource.header)?;
        let format = descriptor
            .format
            .compressed()
            .ok_or(AssetError::UnsupportedFormat(descriptor.format))?;

        resource.stream.seek(SeekFrom::Start(descriptor.data_offset))?;
        let levels = read_mip_chain(&descriptor, format, &mut resource.stream)?;

        // Mip bytes are in memory; release the resource stream before touching the GPU
        drop(resource);

        let texture = graphics.create_texture();
        graphics.bind_texture(texture);
        graphics.set_parameter(TextureParameter::MaxLevel(descriptor.mip_levels - 1));

        for mip in &levels {
            log::trace!(
                "Uploading mip {} ({}x{}, {} bytes)",
                mip.level,
                mip.width,
                mip.height,
                mip.data.len()
            );
            graphics.upload_compressed(mip.level, format, mip.width, mip.height, &mip.data);
        }

        if self.max_anisotropy > 0 {
            graphics.set_parameter(TextureParameter::MaxAnisotropy(self.max_anisotropy));
        }

        graphics.set_parameter(TextureParameter::MinFilter(MinFilter::LinearMipmapLinear));
        graphics.set_parameter(TextureParameter::MagFilter(MagFilter::Linear));
        graphics.set_parameter(TextureParameter::WrapS(descriptor.wrap_s()));
        graphics.set_parameter(TextureParameter::WrapT(descriptor.wrap_t()));

        Ok(texture)
    }
}
