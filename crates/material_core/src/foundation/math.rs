//! Math types used by material parameters

pub use nalgebra::Vector4;

/// 4D vector type, used for vector parameters and attributes
pub type Vec4 = Vector4<f32>;

/// Build a [`Vec4`] from the `[x, y, z, w]` layout stored in resources
pub fn vec4_from_array(components: [f32; 4]) -> Vec4 {
    Vec4::from(components)
}

/// All components set to one
pub fn vec4_one() -> Vec4 {
    Vec4::repeat(1.0)
}
