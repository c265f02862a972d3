//! Material extraction and loading
//!
//! - [`MaterialResource`]: typed tables extracted from a material field tree
//! - [`MaterialLoader`]: name-keyed cache that resolves textures and applies
//!   the color and texture coordinate defaults

pub mod material_resource;
pub mod material_loader;

pub use material_resource::MaterialResource;
pub use material_loader::MaterialLoader;
