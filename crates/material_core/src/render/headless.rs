//! Headless graphics device
//!
//! [`RecordingDevice`] implements [`GraphicsApi`] without a GPU. It keeps the
//! parameters and uploaded bytes of every texture so tools and tests can
//! inspect what a real context would have received.

use std::collections::BTreeMap;

use slotmap::SlotMap;

use super::graphics_api::{
    CompressedFormat, GraphicsApi, MagFilter, MinFilter, TextureHandle, TextureParameter, WrapMode,
};

/// Pixel layout of an uploaded level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// Block-compressed data
    Compressed(CompressedFormat),
    /// Uncompressed 32-bit float RGBA
    Rgba32f,
}

/// One uploaded image level
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedLevel {
    /// Pixel layout
    pub format: UploadFormat,
    /// Level width in pixels
    pub width: u32,
    /// Level height in pixels
    pub height: u32,
    /// Raw bytes as handed to the device
    pub data: Vec<u8>,
}

/// Everything recorded about one texture object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureRecord {
    /// Highest sampled mip level
    pub max_level: Option<u32>,
    /// Minification filter
    pub min_filter: Option<MinFilter>,
    /// Magnification filter
    pub mag_filter: Option<MagFilter>,
    /// Wrap mode along S
    pub wrap_s: Option<WrapMode>,
    /// Wrap mode along T
    pub wrap_t: Option<WrapMode>,
    /// Anisotropy level, if one was set
    pub max_anisotropy: Option<u32>,
    /// Uploaded levels keyed by level index
    pub levels: BTreeMap<u32, UploadedLevel>,
}

/// Graphics device that records texture state instead of rendering
#[derive(Debug, Default)]
pub struct RecordingDevice {
    textures: SlotMap<TextureHandle, TextureRecord>,
    bound: Option<TextureHandle>,
    created_total: usize,
}

impl RecordingDevice {
    /// Create an empty device
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded state of a live texture
    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureRecord> {
        self.textures.get(handle)
    }

    /// Number of live texture objects
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of textures ever created, including deleted ones
    pub fn created_total(&self) -> usize {
        self.created_total
    }

    /// Currently bound texture
    pub fn bound_texture(&self) -> Option<TextureHandle> {
        self.bound
    }

    /// Read back the level-0 color of a float RGBA texture
    pub fn pixel_rgba(&self, handle: TextureHandle) -> Option<[f32; 4]> {
        let level = self.textures.get(handle)?.levels.get(&0)?;
        if level.format != UploadFormat::Rgba32f || level.data.len() < 16 {
            return None;
        }
        Some(bytemuck::pod_read_unaligned(&level.data[..16]))
    }

    fn bound_record(&mut self) -> Option<&mut TextureRecord> {
        let Some(handle) = self.bound else {
            log::warn!("Texture call with no texture bound");
            return None;
        };
        let record = self.textures.get_mut(handle);
        if record.is_none() {
            log::warn!("Texture call on deleted texture {:?}", handle);
        }
        record
    }
}

impl GraphicsApi for RecordingDevice {
    fn create_texture(&mut self) -> TextureHandle {
        self.created_total += 1;
        self.textures.insert(TextureRecord::default())
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.bound = Some(texture);
    }

    fn set_parameter(&mut self, parameter: TextureParameter) {
        let Some(record) = self.bound_record() else {
            return;
        };
        match parameter {
            TextureParameter::MaxLevel(level) => record.max_level = Some(level),
            TextureParameter::MinFilter(filter) => record.min_filter = Some(filter),
            TextureParameter::MagFilter(filter) => record.mag_filter = Some(filter),
            TextureParameter::WrapS(mode) => record.wrap_s = Some(mode),
            TextureParameter::WrapT(mode) => record.wrap_t = Some(mode),
            TextureParameter::MaxAnisotropy(level) => record.max_anisotropy = Some(level),
        }
    }

    fn upload_compressed(
        &mut self,
        level: u32,
        format: CompressedFormat,
        width: u32,
        height: u32,
        data: &[u8],
    ) {
        let Some(record) = self.bound_record() else {
            return;
        };
        record.levels.insert(
            level,
            UploadedLevel {
                format: UploadFormat::Compressed(format),
                width,
                height,
                data: data.to_vec(),
            },
        );
    }

    fn upload_rgba32f(&mut self, width: u32, height: u32, pixels: &[u8]) {
        let Some(record) = self.bound_record() else {
            return;
        };
        record.levels.insert(
            0,
            UploadedLevel {
                format: UploadFormat::Rgba32f,
                width,
                height,
                data: pixels.to_vec(),
            },
        );
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(texture);
        if self.bound == Some(texture) {
            self.bound = None;
        }
    }
}
