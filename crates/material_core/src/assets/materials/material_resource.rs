//! Typed view of a compiled material resource
//!
//! [`MaterialResource::from_fields`] walks the material's field tree once and
//! produces the parameter and attribute tables. Every table entry is a struct
//! with an `m_name` field and a typed value field.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::assets::{AssetError, FieldStruct, ResourceReference};
use crate::foundation::math::{vec4_from_array, Vec4};
use crate::render::Material;

const NAME: &str = "m_name";
const INT_VALUE: &str = "m_nValue";
const FLOAT_VALUE: &str = "m_flValue";
const VALUE: &str = "m_value";
const RESOURCE_VALUE: &str = "m_pValue";

/// Parsed material resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialResource {
    /// `m_materialName`
    pub material_name: String,
    /// `m_shaderName`
    pub shader_name: String,
    /// `m_intParams`
    pub int_params: HashMap<String, i32>,
    /// `m_floatParams`
    pub float_params: HashMap<String, f32>,
    /// `m_vectorParams`; the first entry wins when a name repeats
    pub vector_params: HashMap<String, Vec4>,
    /// `m_textureParams`, in resource order
    pub texture_params: Vec<(String, ResourceReference)>,
    /// `m_dynamicParams`, validated but not interpreted
    pub dynamic_params: Vec<FieldStruct>,
    /// `m_dynamicTextureParams`, validated but not interpreted
    pub dynamic_texture_params: Vec<FieldStruct>,
    /// `m_intAttributes`
    pub int_attributes: HashMap<String, i32>,
    /// `m_floatAttributes`
    pub float_attributes: HashMap<String, f32>,
    /// `m_vectorAttributes`
    pub vector_attributes: HashMap<String, Vec4>,
    /// `m_textureAttributes`, validated but not interpreted
    pub texture_attributes: Vec<FieldStruct>,
    /// `m_stringAttributes`
    pub string_attributes: HashMap<String, String>,
}

impl MaterialResource {
    /// Extract all tables from a material field tree
    pub fn from_fields(fields: &FieldStruct) -> Result<Self, AssetError> {
        let mut vector_params = HashMap::new();
        for entry in fields.struct_array("m_vectorParams")? {
            let name = entry.string(NAME)?;
            let value = vec4_from_array(entry.vector4(VALUE)?);
            // Some compiled materials repeat a vector name; keep the first
            if let Entry::Vacant(slot) = vector_params.entry(name.to_string()) {
                slot.insert(value);
            } else {
                log::trace!("Ignoring repeated vector parameter {}", name);
            }
        }

        Ok(Self {
            material_name: fields.string("m_materialName")?.to_string(),
            shader_name: fields.string("m_shaderName")?.to_string(),
            int_params: unique_table(fields, "m_intParams", |e| e.int(INT_VALUE))?,
            float_params: unique_table(fields, "m_floatParams", |e| e.float(FLOAT_VALUE))?,
            vector_params,
            texture_params: unique_entries(fields, "m_textureParams", |e| {
                e.resource_ref(RESOURCE_VALUE).cloned()
            })?,
            dynamic_params: owned_structs(fields, "m_dynamicParams")?,
            dynamic_texture_params: owned_structs(fields, "m_dynamicTextureParams")?,
            int_attributes: unique_table(fields, "m_intAttributes", |e| e.int(INT_VALUE))?,
            float_attributes: unique_table(fields, "m_floatAttributes", |e| e.float(FLOAT_VALUE))?,
            vector_attributes: unique_table(fields, "m_vectorAttributes", |e| {
                e.vector4(VALUE).map(vec4_from_array)
            })?,
            texture_attributes: owned_structs(fields, "m_textureAttributes")?,
            string_attributes: unique_table(fields, "m_stringAttributes", |e| {
                e.string(VALUE).map(str::to_string)
            })?,
        })
    }

    /// Move the parameter and attribute tables into a fresh [`Material`]
    ///
    /// Texture parameters are returned separately, in resource order; they only
    /// name textures to load.
    pub fn into_material(self) -> (Material, Vec<(String, ResourceReference)>) {
        let material = Material {
            name: self.material_name,
            shader_name: self.shader_name,
            int_params: self.int_params,
            float_params: self.float_params,
            vector_params: self.vector_params,
            int_attributes: self.int_attributes,
            float_attributes: self.float_attributes,
            vector_attributes: self.vector_attributes,
            string_attributes: self.string_attributes,
            textures: HashMap::new(),
        };
        (material, self.texture_params)
    }
}

/// Build a name -> value table; a repeated name is an error
fn unique_table<T>(
    fields: &FieldStruct,
    table: &'static str,
    value: impl Fn(&FieldStruct) -> Result<T, AssetError>,
) -> Result<HashMap<String, T>, AssetError> {
    Ok(unique_entries(fields, table, value)?.into_iter().collect())
}

/// Name/value pairs in resource order; a repeated name is an error
fn unique_entries<T>(
    fields: &FieldStruct,
    table: &'static str,
    value: impl Fn(&FieldStruct) -> Result<T, AssetError>,
) -> Result<Vec<(String, T)>, AssetError> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for entry in fields.struct_array(table)? {
        let name = entry.string(NAME)?;
        if !seen.insert(name) {
            return Err(AssetError::DuplicateParameter {
                table,
                name: name.to_string(),
            });
        }
        result.push((name.to_string(), value(entry)?));
    }
    Ok(result)
}

fn owned_structs(fields: &FieldStruct, table: &str) -> Result<Vec<FieldStruct>, AssetError> {
    Ok(fields.struct_array(table)?.into_iter().cloned().collect())
}
