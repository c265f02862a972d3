//! Material loader and cache
//!
//! Resolves material resources by name, loads every texture they reference and
//! keeps the finished materials for the lifetime of the loader. Missing
//! resources and unsupported texture formats degrade to the fallback texture;
//! corrupt data aborts the load and is reported to the caller.
//!
//! The loader owns the graphics context seam and must stay on the thread that
//! owns that context.

use std::collections::HashMap;
use std::sync::Arc;

use super::material_resource::MaterialResource;
use crate::assets::{AssetError, Resource, ResourceResolver};
use crate::config::LoaderConfig;
use crate::foundation::math::{vec4_one, Vec4};
use crate::render::texture::{TextureDecoder, TextureFactory};
use crate::render::{
    GraphicsApi, Material, TextureHandle, COLOR1_SLOT, COLOR2_SLOT, COLOR_SLOT, COLOR_TINT_PARAM,
    NORMAL_SLOT, TEXCOORD_OFFSET_PARAM, TEXCOORD_SCALE_PARAM,
};

/// Loads and caches materials by name
pub struct MaterialLoader<R: ResourceResolver, G: GraphicsApi> {
    resolver: R,
    graphics: G,
    config: LoaderConfig,
    decoder: TextureDecoder,
    textures: TextureFactory,
    /// Cache storage: material name -> material
    materials: HashMap<String, Arc<Material>>,
    /// Every texture name that resolved, in load order
    loaded_textures: Vec<String>,
}

impl<R: ResourceResolver, G: GraphicsApi> MaterialLoader<R, G> {
    /// Create a loader with an empty cache
    pub fn new(resolver: R, graphics: G, config: LoaderConfig) -> Self {
        log::debug!("Creating MaterialLoader with config: {:?}", config);
        Self {
            resolver,
            graphics,
            decoder: TextureDecoder::new(config.max_anisotropy),
            config,
            textures: TextureFactory::new(),
            materials: HashMap::new(),
            loaded_textures: Vec::new(),
        }
    }

    /// Material `name`, loading it on first request
    ///
    /// Repeated calls return the same shared material without touching the
    /// resolver or the GPU again.
    pub fn get_material(&mut self, name: &str) -> Result<Arc<Material>, AssetError> {
        if let Some(material) = self.materials.get(name) {
            return Ok(Arc::clone(material));
        }

        let material = Arc::new(self.load_material(name)?);
        self.materials.insert(name.to_string(), Arc::clone(&material));
        Ok(material)
    }

    /// Decode texture `name` and upload it, or hand back the fallback texture
    ///
    /// # Errors
    /// Unrecognized pixel formats, truncated mip data and IO failures.
    pub fn decode_texture(&mut self, name: &str) -> Result<TextureHandle, AssetError> {
        let resource = self.resolve(name).and_then(|resource| match resource {
            Resource::Texture(resource) => Ok(resource),
            other => Err(AssetError::UnexpectedResource {
                name: self.config.compiled_name(name),
                expected: "texture",
                found: other.kind(),
            }),
        });

        match resource {
            Ok(resource) => {
                self.loaded_textures.push(name.to_string());
                self.decoder
                    .decode(&mut self.graphics, &mut self.textures, name, resource)
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("{}, using fallback texture", e);
                Ok(self.fallback_texture())
            }
            Err(e) => Err(e),
        }
    }

    /// Shared fallback texture, created on first use
    pub fn fallback_texture(&mut self) -> TextureHandle {
        self.textures.fallback_texture(&mut self.graphics)
    }

    /// Create a new 1x1 texture of a single color
    pub fn solid_color_texture(&mut self, rgba: [f32; 4]) -> TextureHandle {
        TextureFactory::solid_color(&mut self.graphics, rgba)
    }

    /// Change the anisotropy level used for textures loaded from now on
    pub fn set_max_anisotropy(&mut self, level: u32) {
        self.config.max_anisotropy = level;
        self.decoder = TextureDecoder::new(level);
    }

    /// Active configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Names of all textures that resolved, in load order
    pub fn loaded_textures(&self) -> &[String] {
        &self.loaded_textures
    }

    /// Get a cached material without loading
    pub fn get_cached(&self, name: &str) -> Option<Arc<Material>> {
        self.materials.get(name).map(Arc::clone)
    }

    /// Check if a material is cached
    pub fn is_cached(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Get the number of cached materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Forget all cached materials
    ///
    /// Their GPU textures stay alive; the fallback texture is kept.
    pub fn clear(&mut self) {
        self.materials.clear();
    }

    /// Graphics backend
    pub fn graphics(&self) -> &G {
        &self.graphics
    }

    /// Resource resolver
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn resolve(&mut self, name: &str) -> Result<Resource, AssetError> {
        let compiled = self.config.compiled_name(name);
        self.resolver
            .resolve(&compiled)
            .ok_or(AssetError::NotFound(compiled))
    }

    fn load_material(&mut self, name: &str) -> Result<Material, AssetError> {
        let fields = match self.resolve(name) {
            Ok(Resource::Fields(fields)) => fields,
            Ok(other) => {
                return Err(AssetError::UnexpectedResource {
                    name: self.config.compiled_name(name),
                    expected: "field tree",
                    found: other.kind(),
                });
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("{}, material will use the fallback texture", e);
                let fallback = self.fallback_texture();
                let mut material = Material::new(name);
                material.textures.insert(COLOR_SLOT.to_string(), fallback);
                material.textures.insert(NORMAL_SLOT.to_string(), fallback);
                return Ok(material);
            }
            Err(e) => return Err(e),
        };

        let (mut material, texture_params) = MaterialResource::from_fields(&fields)?.into_material();

        let fallback = self.fallback_texture();
        material.textures.insert(COLOR_SLOT.to_string(), fallback);

        for (slot, reference) in texture_params {
            match self.decode_texture(&reference.name) {
                Ok(texture) => {
                    material.textures.insert(slot, texture);
                }
                Err(e) => {
                    // Nothing will own the textures of a material that failed to load
                    for texture in material.textures.into_values() {
                        self.release_texture(texture);
                    }
                    return Err(e);
                }
            }
        }

        self.apply_color_overrides(&mut material);
        apply_texcoord_defaults(&mut material);

        log::info!(
            "Loaded material {} ({}, {} textures)",
            name,
            material.shader_name,
            material.textures.len()
        );
        Ok(material)
    }

    /// Delete a texture unless it is the shared fallback
    fn release_texture(&mut self, texture: TextureHandle) {
        if !self.textures.is_fallback(texture) {
            self.graphics.delete_texture(texture);
        }
    }

    /// Solid-color materials, then layered color fallbacks (`g_tColor2` before `g_tColor1`)
    fn apply_color_overrides(&mut self, material: &mut Material) {
        if material.is_solid_color() {
            let tint = material.vector_param(COLOR_TINT_PARAM).unwrap_or_else(|| {
                log::warn!("Solid color material {} has no {}, using white", material.name, COLOR_TINT_PARAM);
                vec4_one()
            });
            let texture = self.solid_color_texture([tint.x, tint.y, tint.z, tint.w]);
            if let Some(replaced) = material.textures.insert(COLOR_SLOT.to_string(), texture) {
                self.release_texture(replaced);
            }
        }

        for alternate in [COLOR2_SLOT, COLOR1_SLOT] {
            let color_missing = material
                .texture(COLOR_SLOT)
                .map_or(true, |texture| self.textures.is_fallback(texture));
            if !color_missing {
                break;
            }
            if let Some(texture) = material.texture(alternate) {
                material.textures.insert(COLOR_SLOT.to_string(), texture);
            }
        }
    }
}

impl<R: ResourceResolver, G: GraphicsApi> Drop for MaterialLoader<R, G> {
    fn drop(&mut self) {
        self.textures.release(&mut self.graphics);
    }
}

fn apply_texcoord_defaults(material: &mut Material) {
    material
        .vector_params
        .entry(TEXCOORD_SCALE_PARAM.to_string())
        .or_insert_with(vec4_one);
    material
        .vector_params
        .entry(TEXCOORD_OFFSET_PARAM.to_string())
        .or_insert_with(Vec4::zeros);
}
