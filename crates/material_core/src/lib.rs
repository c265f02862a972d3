//! # Material Core
//!
//! Turns compiled material resources into runtime-ready rendering materials.
//!
//! A material resource carries a shader name and typed parameter tables; its
//! texture parameters name block-compressed texture resources that are decoded
//! and uploaded to the GPU. Missing or unsupported assets never abort a load:
//! they degrade to a shared, visually loud fallback texture.
//!
//! ## Features
//!
//! - **Parameter extraction**: field trees validated once into typed tables
//! - **Texture decoding**: DXT1/DXT5 mip chains with exact byte accounting
//! - **Fallback policy**: memoized sentinel texture, solid-color materials
//! - **Caching**: one material per name for the lifetime of a loader
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use material_core::prelude::*;
//!
//! fn load(resolver: impl ResourceResolver) -> Result<(), AssetError> {
//!     let mut loader = MaterialLoader::new(resolver, RecordingDevice::new(), LoaderConfig::default());
//!     let material = loader.get_material("materials/dev/floor")?;
//!     let color = material.texture(COLOR_SLOT);
//!     println!("{} uses {:?}", material.shader_name, color);
//!     Ok(())
//! }
//! ```

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;

/// Common imports for loader users
pub mod prelude {
    pub use crate::{
        assets::{
            AssetError, FieldStruct, FieldValue, MaterialLoader, MaterialResource, Resource,
            ResourceReference, ResourceResolver, TextureResource,
        },
        config::{Config, ConfigError, LoaderConfig},
        foundation::math::Vec4,
        render::{
            GraphicsApi, Material, RecordingDevice, TextureHandle, COLOR_SLOT, NORMAL_SLOT,
        },
    };
}
