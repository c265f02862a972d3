//! End-to-end material loading
//!
//! Drives `MaterialLoader` against an in-memory resolver and the recording
//! device, covering caching, texture fallbacks and the color overrides.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use crate::assets::{
        AssetError, FieldStruct, FieldValue, MaterialLoader, RawTextureHeader, Resource,
        ResourceReference, ResourceResolver, TextureResource,
    };
    use crate::config::LoaderConfig;
    use crate::foundation::logging;
    use crate::foundation::math::Vec4;
    use crate::render::texture::FALLBACK_COLOR;
    use crate::render::{
        RecordingDevice, COLOR1_SLOT, COLOR2_SLOT, COLOR_SLOT, NORMAL_SLOT, TEXCOORD_OFFSET_PARAM,
        TEXCOORD_SCALE_PARAM,
    };

    const DXT1: u32 = 1;
    const RGBA8888: u32 = 4;

    /// Resolver backed by maps, recording every name it is asked for
    #[derive(Default)]
    struct MemoryResolver {
        materials: HashMap<String, FieldStruct>,
        textures: HashMap<String, (RawTextureHeader, Vec<u8>)>,
        requests: Vec<String>,
    }

    impl MemoryResolver {
        fn with_material(mut self, name: &str, fields: FieldStruct) -> Self {
            self.materials.insert(format!("{}_c", name), fields);
            self
        }

        fn with_texture(mut self, name: &str, header: RawTextureHeader, bytes: Vec<u8>) -> Self {
            self.textures.insert(format!("{}_c", name), (header, bytes));
            self
        }

        fn with_dxt1(self, name: &str) -> Self {
            let (header, bytes) = dxt1_texture(8);
            self.with_texture(name, header, bytes)
        }
    }

    impl ResourceResolver for MemoryResolver {
        fn resolve(&mut self, name: &str) -> Option<Resource> {
            self.requests.push(name.to_string());
            if let Some(fields) = self.materials.get(name) {
                return Some(Resource::Fields(fields.clone()));
            }
            self.textures.get(name).map(|(header, bytes)| {
                Resource::Texture(TextureResource::new(*header, Cursor::new(bytes.clone())))
            })
        }
    }

    /// Single-level DXT1 texture of `size` x `size`
    fn dxt1_texture(size: u32) -> (RawTextureHeader, Vec<u8>) {
        let header = RawTextureHeader {
            format: DXT1,
            width: size,
            height: size,
            mip_levels: 1,
            flags: 0,
            data_offset: 0,
        };
        let blocks = size.div_ceil(4) as usize;
        (header, vec![0x55; blocks * blocks * 8])
    }

    /// Builder for material field trees
    #[derive(Default)]
    struct MaterialFields {
        int_params: Vec<FieldValue>,
        vector_params: Vec<FieldValue>,
        texture_params: Vec<FieldValue>,
    }

    impl MaterialFields {
        fn int(mut self, name: &str, value: i32) -> Self {
            self.int_params.push(named(name, "m_nValue", FieldValue::Int(value)));
            self
        }

        fn vector(mut self, name: &str, value: [f32; 4]) -> Self {
            self.vector_params.push(named(name, "m_value", FieldValue::Vector4(value)));
            self
        }

        fn texture(mut self, slot: &str, texture: &str) -> Self {
            self.texture_params.push(named(
                slot,
                "m_pValue",
                FieldValue::ResourceRef(ResourceReference::named(texture)),
            ));
            self
        }

        fn build(self) -> FieldStruct {
            FieldStruct::new()
                .with("m_materialName", FieldValue::String("materials/test.vmat".to_string()))
                .with("m_shaderName", FieldValue::String("vr_standard.vfx".to_string()))
                .with("m_intParams", FieldValue::Array(self.int_params))
                .with("m_floatParams", FieldValue::Array(Vec::new()))
                .with("m_vectorParams", FieldValue::Array(self.vector_params))
                .with("m_textureParams", FieldValue::Array(self.texture_params))
                .with("m_dynamicParams", FieldValue::Array(Vec::new()))
                .with("m_dynamicTextureParams", FieldValue::Array(Vec::new()))
                .with("m_intAttributes", FieldValue::Array(Vec::new()))
                .with("m_floatAttributes", FieldValue::Array(Vec::new()))
                .with("m_vectorAttributes", FieldValue::Array(Vec::new()))
                .with("m_textureAttributes", FieldValue::Array(Vec::new()))
                .with("m_stringAttributes", FieldValue::Array(Vec::new()))
        }
    }

    fn named(name: &str, key: &str, value: FieldValue) -> FieldValue {
        FieldValue::Struct(
            FieldStruct::new()
                .with("m_name", FieldValue::String(name.to_string()))
                .with(key, value),
        )
    }

    fn loader(resolver: MemoryResolver) -> MaterialLoader<MemoryResolver, RecordingDevice> {
        logging::init_for_tests();
        MaterialLoader::new(resolver, RecordingDevice::new(), LoaderConfig::default())
    }

    #[test]
    fn test_get_material_is_cached() {
        let resolver = MemoryResolver::default()
            .with_material("floor", MaterialFields::default().texture(COLOR_SLOT, "floor_color").build())
            .with_dxt1("floor_color");
        let mut loader = loader(resolver);

        let first = loader.get_material("floor").unwrap();
        let requests = loader.resolver().requests.len();
        let textures = loader.graphics().created_total();

        let second = loader.get_material("floor").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.resolver().requests.len(), requests);
        assert_eq!(loader.graphics().created_total(), textures);
        assert_eq!(loader.len(), 1);
        assert!(loader.is_cached("floor"));
    }

    #[test]
    fn test_resolves_with_suffix() {
        let resolver = MemoryResolver::default()
            .with_material("floor", MaterialFields::default().texture(COLOR_SLOT, "floor_color").build())
            .with_dxt1("floor_color");
        let mut loader = loader(resolver);

        loader.get_material("floor").unwrap();

        assert_eq!(loader.resolver().requests, vec!["floor_c", "floor_color_c"]);
        assert_eq!(loader.loaded_textures(), ["floor_color".to_string()]);
    }

    #[test]
    fn test_missing_material_gets_fallback_color_and_normal() {
        let mut loader = loader(MemoryResolver::default());

        let material = loader.get_material("nowhere").unwrap();
        let fallback = loader.fallback_texture();

        assert_eq!(material.texture(COLOR_SLOT), Some(fallback));
        assert_eq!(material.texture(NORMAL_SLOT), Some(fallback));
        assert!(material.int_params.is_empty());
        assert_eq!(loader.graphics().pixel_rgba(fallback), Some(FALLBACK_COLOR));

        // Cached like any other material
        let again = loader.get_material("nowhere").unwrap();
        assert!(Arc::ptr_eq(&material, &again));
        assert_eq!(loader.resolver().requests.len(), 1);
    }

    #[test]
    fn test_fallback_shared_between_materials() {
        let mut loader = loader(MemoryResolver::default());

        let a = loader.get_material("a").unwrap();
        let b = loader.get_material("b").unwrap();

        assert_eq!(a.texture(COLOR_SLOT), b.texture(COLOR_SLOT));
        assert_eq!(loader.graphics().created_total(), 1);
    }

    #[test]
    fn test_missing_texture_uses_fallback() {
        let resolver = MemoryResolver::default().with_material(
            "wall",
            MaterialFields::default()
                .texture(COLOR_SLOT, "wall_color")
                .texture(NORMAL_SLOT, "wall_normal")
                .build(),
        );
        let mut loader = loader(resolver);

        let material = loader.get_material("wall").unwrap();
        let fallback = loader.fallback_texture();

        assert_eq!(material.texture(COLOR_SLOT), Some(fallback));
        assert_eq!(material.texture(NORMAL_SLOT), Some(fallback));
        assert!(loader.loaded_textures().is_empty());
    }

    #[test]
    fn test_color_always_present() {
        let resolver = MemoryResolver::default()
            .with_material("glass", MaterialFields::default().texture(NORMAL_SLOT, "glass_normal").build())
            .with_dxt1("glass_normal");
        let mut loader = loader(resolver);

        let material = loader.get_material("glass").unwrap();
        let fallback = loader.fallback_texture();

        assert_eq!(material.texture(COLOR_SLOT), Some(fallback));
        assert_ne!(material.texture(NORMAL_SLOT), Some(fallback));
    }

    #[test]
    fn test_color2_fills_missing_color() {
        let resolver = MemoryResolver::default()
            .with_material("blend", MaterialFields::default().texture(COLOR2_SLOT, "layer2").build())
            .with_dxt1("layer2");
        let mut loader = loader(resolver);

        let material = loader.get_material("blend").unwrap();

        assert!(material.texture(COLOR2_SLOT).is_some());
        assert_eq!(material.texture(COLOR_SLOT), material.texture(COLOR2_SLOT));
    }

    #[test]
    fn test_color2_wins_over_color1() {
        let resolver = MemoryResolver::default()
            .with_material(
                "blend",
                MaterialFields::default()
                    .texture(COLOR1_SLOT, "layer1")
                    .texture(COLOR2_SLOT, "layer2")
                    .build(),
            )
            .with_dxt1("layer1")
            .with_dxt1("layer2");
        let mut loader = loader(resolver);

        let material = loader.get_material("blend").unwrap();

        assert_ne!(material.texture(COLOR1_SLOT), material.texture(COLOR2_SLOT));
        assert_eq!(material.texture(COLOR_SLOT), material.texture(COLOR2_SLOT));
    }

    #[test]
    fn test_color1_used_when_color_texture_missing() {
        let resolver = MemoryResolver::default()
            .with_material(
                "blend",
                MaterialFields::default()
                    .texture(COLOR_SLOT, "gone")
                    .texture(COLOR1_SLOT, "layer1")
                    .build(),
            )
            .with_dxt1("layer1");
        let mut loader = loader(resolver);

        let material = loader.get_material("blend").unwrap();

        assert_eq!(material.texture(COLOR_SLOT), material.texture(COLOR1_SLOT));
        assert_ne!(material.texture(COLOR_SLOT), Some(loader.fallback_texture()));
    }

    #[test]
    fn test_real_color_not_replaced_by_layers() {
        let resolver = MemoryResolver::default()
            .with_material(
                "blend",
                MaterialFields::default()
                    .texture(COLOR_SLOT, "base")
                    .texture(COLOR2_SLOT, "layer2")
                    .build(),
            )
            .with_dxt1("base")
            .with_dxt1("layer2");
        let mut loader = loader(resolver);

        let material = loader.get_material("blend").unwrap();

        assert_ne!(material.texture(COLOR_SLOT), material.texture(COLOR2_SLOT));
    }

    #[test]
    fn test_solid_color_overrides_color_texture() {
        let resolver = MemoryResolver::default()
            .with_material(
                "paint",
                MaterialFields::default()
                    .int("F_SOLID_COLOR", 1)
                    .vector("g_vColorTint", [0.2, 0.4, 0.6, 1.0])
                    .texture(COLOR_SLOT, "paint_color")
                    .build(),
            )
            .with_dxt1("paint_color");
        let mut loader = loader(resolver);

        let material = loader.get_material("paint").unwrap();
        let color = material.texture(COLOR_SLOT).unwrap();
        let device = loader.graphics();

        let record = device.texture(color).unwrap();
        assert_eq!((record.levels[&0].width, record.levels[&0].height), (1, 1));

        // Fallback and solid color stay; the decoded color texture was replaced and deleted
        assert_eq!(device.created_total(), 3);
        assert_eq!(device.texture_count(), 2);

        let rgba = device.pixel_rgba(color).unwrap();
        assert_relative_eq!(rgba[0], 0.2);
        assert_relative_eq!(rgba[1], 0.4);
        assert_relative_eq!(rgba[2], 0.6);
        assert_relative_eq!(rgba[3], 1.0);
    }

    #[test]
    fn test_solid_color_flag_off() {
        let resolver = MemoryResolver::default()
            .with_material(
                "paint",
                MaterialFields::default()
                    .int("F_SOLID_COLOR", 0)
                    .vector("g_vColorTint", [0.2, 0.4, 0.6, 1.0])
                    .build(),
            );
        let mut loader = loader(resolver);

        let material = loader.get_material("paint").unwrap();

        assert_eq!(material.texture(COLOR_SLOT), Some(loader.fallback_texture()));
    }

    #[test]
    fn test_texcoord_defaults() {
        let resolver = MemoryResolver::default().with_material("plain", MaterialFields::default().build());
        let mut loader = loader(resolver);

        let material = loader.get_material("plain").unwrap();

        assert_relative_eq!(material.vector_param(TEXCOORD_SCALE_PARAM).unwrap(), Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_relative_eq!(material.vector_param(TEXCOORD_OFFSET_PARAM).unwrap(), Vec4::zeros());
    }

    #[test]
    fn test_texcoord_values_from_resource_kept() {
        let resolver = MemoryResolver::default().with_material(
            "tiled",
            MaterialFields::default()
                .vector("g_vTexCoordScale", [4.0, 4.0, 1.0, 1.0])
                .build(),
        );
        let mut loader = loader(resolver);

        let material = loader.get_material("tiled").unwrap();

        assert_eq!(material.vector_param(TEXCOORD_SCALE_PARAM), Some(Vec4::new(4.0, 4.0, 1.0, 1.0)));
        assert_eq!(material.vector_param(TEXCOORD_OFFSET_PARAM), Some(Vec4::zeros()));
    }

    #[test]
    fn test_unsupported_texture_format_uses_fallback() {
        let header = RawTextureHeader {
            format: RGBA8888,
            width: 4,
            height: 4,
            mip_levels: 1,
            flags: 0,
            data_offset: 0,
        };
        let resolver = MemoryResolver::default()
            .with_material("ui", MaterialFields::default().texture(NORMAL_SLOT, "ui_normal").build())
            .with_texture("ui_normal", header, vec![0; 64]);
        let mut loader = loader(resolver);

        let material = loader.get_material("ui").unwrap();

        assert_eq!(material.texture(NORMAL_SLOT), Some(loader.fallback_texture()));
        assert_eq!(loader.loaded_textures(), ["ui_normal".to_string()]);
    }

    #[test]
    fn test_corrupt_texture_aborts_load() {
        let header = RawTextureHeader {
            format: 200,
            width: 4,
            height: 4,
            mip_levels: 1,
            flags: 0,
            data_offset: 0,
        };
        let resolver = MemoryResolver::default()
            .with_material("broken", MaterialFields::default().texture(COLOR_SLOT, "broken_color").build())
            .with_texture("broken_color", header, vec![0; 8]);
        let mut loader = loader(resolver);

        let result = loader.get_material("broken");

        assert!(matches!(result, Err(AssetError::UnrecognizedFormat(200))));
        assert!(!loader.is_cached("broken"));
    }

    #[test]
    fn test_failed_load_deletes_its_textures() {
        let header = RawTextureHeader {
            format: 200,
            width: 4,
            height: 4,
            mip_levels: 1,
            flags: 0,
            data_offset: 0,
        };
        let resolver = MemoryResolver::default()
            .with_material(
                "half",
                MaterialFields::default()
                    .texture(NORMAL_SLOT, "half_normal")
                    .texture(COLOR1_SLOT, "half_layer")
                    .texture(COLOR_SLOT, "half_color")
                    .build(),
            )
            .with_dxt1("half_normal")
            .with_dxt1("half_layer")
            .with_texture("half_color", header, vec![0; 8]);
        let mut loader = loader(resolver);

        assert!(loader.get_material("half").is_err());

        // Fallback plus the two textures uploaded before the corrupt one
        assert_eq!(loader.graphics().created_total(), 3);
        assert_eq!(loader.graphics().texture_count(), 1);
        let fallback = loader.fallback_texture();
        assert!(loader.graphics().texture(fallback).is_some());
    }

    #[test]
    fn test_loaded_textures_follow_resource_order() {
        let resolver = MemoryResolver::default()
            .with_material(
                "layered",
                MaterialFields::default()
                    .texture(NORMAL_SLOT, "layered_normal")
                    .texture(COLOR2_SLOT, "layered_2")
                    .texture(COLOR_SLOT, "layered_color")
                    .texture(COLOR1_SLOT, "layered_1")
                    .build(),
            )
            .with_dxt1("layered_normal")
            .with_dxt1("layered_2")
            .with_dxt1("layered_color")
            .with_dxt1("layered_1");
        let mut loader = loader(resolver);

        loader.get_material("layered").unwrap();

        assert_eq!(
            loader.loaded_textures(),
            ["layered_normal", "layered_2", "layered_color", "layered_1"]
        );
        assert_eq!(
            loader.resolver().requests,
            vec!["layered_c", "layered_normal_c", "layered_2_c", "layered_color_c", "layered_1_c"]
        );
    }

    #[test]
    fn test_non_power_of_two_texture() {
        let header = RawTextureHeader {
            format: DXT1,
            width: 100,
            height: 100,
            mip_levels: 3,
            flags: 0,
            data_offset: 0,
        };
        let resolver = MemoryResolver::default()
            .with_material("odd", MaterialFields::default().texture(COLOR_SLOT, "odd_color").build())
            .with_texture("odd_color", header, vec![0x11; 6048]);
        let mut loader = loader(resolver);

        let material = loader.get_material("odd").unwrap();
        let color = material.texture(COLOR_SLOT).unwrap();

        let record = loader.graphics().texture(color).unwrap();
        let widths: Vec<_> = record.levels.values().map(|level| level.width).collect();
        assert_eq!(widths, vec![96, 48, 24]);
    }

    #[test]
    fn test_truncated_texture_aborts_load() {
        let (header, mut bytes) = dxt1_texture(8);
        bytes.truncate(bytes.len() - 1);
        let resolver = MemoryResolver::default()
            .with_material("short", MaterialFields::default().texture(COLOR_SLOT, "short_color").build())
            .with_texture("short_color", header, bytes);
        let mut loader = loader(resolver);

        assert!(matches!(
            loader.get_material("short"),
            Err(AssetError::TruncatedStream { level: 0, .. })
        ));
    }

    #[test]
    fn test_texture_name_resolving_to_material_is_fatal() {
        let resolver = MemoryResolver::default()
            .with_material("odd", MaterialFields::default().texture(COLOR_SLOT, "odd").build());
        let mut loader = loader(resolver);

        assert!(matches!(
            loader.get_material("odd"),
            Err(AssetError::UnexpectedResource { expected: "texture", .. })
        ));
    }

    #[test]
    fn test_clear_forgets_materials() {
        let resolver = MemoryResolver::default().with_material("plain", MaterialFields::default().build());
        let mut loader = loader(resolver);

        let first = loader.get_material("plain").unwrap();
        loader.clear();
        assert!(loader.is_empty());

        let second = loader.get_material("plain").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_drop_releases_fallback() {
        logging::init_for_tests();
        let mut device = RecordingDevice::new();
        let fallback = {
            let mut loader = MaterialLoader::new(MemoryResolver::default(), &mut device, LoaderConfig::default());
            loader.get_material("missing").unwrap();
            loader.fallback_texture()
        };

        assert!(device.texture(fallback).is_none());
        assert_eq!(device.created_total(), 1);
    }

    #[test]
    fn test_material_authored_in_ron() {
        let source = r#"{
            "m_materialName": String("materials/ron.vmat"),
            "m_shaderName": String("vr_simple.vfx"),
            "m_intParams": Array([]),
            "m_floatParams": Array([
                Struct({ "m_name": String("g_flRoughness"), "m_flValue": Float(0.75) }),
            ]),
            "m_vectorParams": Array([]),
            "m_textureParams": Array([
                Struct({ "m_name": String("g_tColor"), "m_pValue": ResourceRef((name: "ron_color")) }),
            ]),
            "m_dynamicParams": Array([]),
            "m_dynamicTextureParams": Array([]),
            "m_intAttributes": Array([]),
            "m_floatAttributes": Array([]),
            "m_vectorAttributes": Array([]),
            "m_textureAttributes": Array([]),
            "m_stringAttributes": Array([]),
        }"#;
        let fields: FieldStruct = ron::from_str(source).unwrap();
        let resolver = MemoryResolver::default()
            .with_material("ron", fields)
            .with_dxt1("ron_color");
        let mut loader = loader(resolver);

        let material = loader.get_material("ron").unwrap();

        assert_eq!(material.name, "materials/ron.vmat");
        assert_eq!(material.float_param("g_flRoughness"), Some(0.75));
        assert_ne!(material.texture(COLOR_SLOT), Some(loader.fallback_texture()));
    }
}
