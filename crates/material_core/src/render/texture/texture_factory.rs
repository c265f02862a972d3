//! Solid-color textures and the shared fallback texture

use crate::render::graphics_api::{
    GraphicsApi, MagFilter, MinFilter, TextureHandle, TextureParameter, WrapMode,
};

/// Color of the fallback texture; loud enough to spot missing data on screen
pub const FALLBACK_COLOR: [f32; 4] = [173.0 / 255.0, 1.0, 47.0 / 255.0, 1.0];

/// Owns the lazily created fallback texture for one graphics context
#[derive(Debug, Default)]
pub struct TextureFactory {
    fallback: Option<TextureHandle>,
}

impl TextureFactory {
    /// Create a factory with no fallback allocated yet
    pub const fn new() -> Self {
        Self { fallback: None }
    }

    /// Shared fallback texture, created on first use
    pub fn fallback_texture<G: GraphicsApi>(&mut self, graphics: &mut G) -> TextureHandle {
        *self.fallback.get_or_insert_with(|| {
            log::debug!("Creating fallback texture");
            Self::solid_color(graphics, FALLBACK_COLOR)
        })
    }

    /// Whether `texture` is the fallback texture
    pub fn is_fallback(&self, texture: TextureHandle) -> bool {
        self.fallback == Some(texture)
    }

    /// Allocate a new 1x1 texture filled with `rgba`
    pub fn solid_color<G: GraphicsApi>(graphics: &mut G, rgba: [f32; 4]) -> TextureHandle {
        let texture = graphics.create_texture();

        graphics.bind_texture(texture);
        graphics.upload_rgba32f(1, 1, bytemuck::cast_slice(&rgba));
        graphics.set_parameter(TextureParameter::MaxLevel(0));
        graphics.set_parameter(TextureParameter::MinFilter(MinFilter::Nearest));
        graphics.set_parameter(TextureParameter::MagFilter(MagFilter::Nearest));
        graphics.set_parameter(TextureParameter::WrapS(WrapMode::Repeat));
        graphics.set_parameter(TextureParameter::WrapT(WrapMode::Repeat));

        texture
    }

    /// Delete the fallback texture, if one was created
    pub fn release<G: GraphicsApi>(&mut self, graphics: &mut G) {
        if let Some(texture) = self.fallback.take() {
            graphics.delete_texture(texture);
        }
    }
}
