//! Texture decoding and texture creation
//!
//! - [`TextureDescriptor`]: validated header and mip chain geometry
//! - [`TextureDecoder`]: DXT1/DXT5 mip chain upload
//! - [`TextureFactory`]: solid-color textures and the shared fallback

pub mod descriptor;
pub mod texture_decoder;
pub mod texture_factory;

pub use descriptor::{compressed_size, TextureDescriptor, TextureFlags, TextureFormat};
pub use texture_decoder::{mip_chain_size, read_mip_chain, MipLevel, TextureDecoder};
pub use texture_factory::{TextureFactory, FALLBACK_COLOR};
