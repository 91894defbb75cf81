//! Material descriptor → material record translation.
//!
//! Each descriptor yields a primary record and, when it carries a second
//! blend layer (`$basetexture2`), a secondary record named `<name>_`. The
//! record shape depends on the target [`SchemaVariant`]; both shapes share the
//! layer resolution in [`Layer::resolve`] and the surface lookup.

use crate::identifier::normalize;
use crate::surface::{self, CUSTOM_GLOSS, FULL_GLOSS, NO_SURFACE};
use crate::types::{Category, Fields, MaterialDescriptor, OutputRecord, SchemaVariant};
use indexmap::IndexMap;

/// Directory prefix of converted texture files, as seen by the target tools.
pub const TEXTURE_DIR: &str = "texture_assets\\corvid\\";

/// Parameter keys of one material layer.
#[derive(Debug, Clone, Copy)]
pub struct LayerKeys {
    pub base_texture: &'static str,
    pub bump_map: &'static str,
    pub ssbump: &'static str,
    pub env_mask: &'static str,
    pub base_alpha_env_mask: &'static str,
    pub normal_alpha_env_mask: &'static str,
    pub surface_prop: &'static str,
}

pub const PRIMARY_KEYS: LayerKeys = LayerKeys {
    base_texture: "$basetexture",
    bump_map: "$bumpmap",
    ssbump: "$ssbump",
    env_mask: "$envmapmask",
    base_alpha_env_mask: "$basealphaenvmapmask",
    normal_alpha_env_mask: "$normalmapalphaenvmapmask",
    surface_prop: "$surfaceprop",
};

pub const SECONDARY_KEYS: LayerKeys = LayerKeys {
    base_texture: "$basetexture2",
    bump_map: "$bumpmap2",
    ssbump: "$ssbump2",
    env_mask: "$envmapmask2",
    base_alpha_env_mask: "$basealphaenvmapmask2",
    normal_alpha_env_mask: "$normalmapalphaenvmapmask2",
    surface_prop: "$surfaceprop2",
};

pub const TRANSLUCENT_KEY: &str = "$translucent";
pub const ALPHA_TEST_KEYS: [&str; 2] = ["$alphatest", "$alpha"];
pub const NO_CULL_KEY: &str = "$nocull";
pub const SELF_ILLUM_KEY: &str = "$selfillum";
pub const REVEAL_KEY: &str = "$blendmodulatetexture";

/// Where a layer's cosine-power (gloss) map comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlossSource<'a> {
    /// A dedicated env-map mask texture.
    EnvMask(&'a str),
    /// The alpha channel of the color texture.
    BaseAlpha(&'a str),
    /// The alpha channel of the normal texture.
    NormalAlpha(&'a str),
}

impl<'a> GlossSource<'a> {
    /// Texture path the gloss data is read from.
    pub fn texture(&self) -> &'a str {
        match *self {
            GlossSource::EnvMask(path)
            | GlossSource::BaseAlpha(path)
            | GlossSource::NormalAlpha(path) => path,
        }
    }

    /// Whether the gloss lives in another texture's alpha channel.
    pub fn is_alpha_channel(&self) -> bool {
        !matches!(self, GlossSource::EnvMask(_))
    }
}

/// Texture references of one layer, resolved from a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer<'a> {
    pub color: Option<&'a str>,
    /// Normal map; suppressed when the bump map is self-shadowed.
    pub normal: Option<&'a str>,
    pub gloss: Option<GlossSource<'a>>,
    pub surface_prop: Option<&'a str>,
}

impl<'a> Layer<'a> {
    pub fn resolve(desc: &'a MaterialDescriptor, keys: &LayerKeys) -> Self {
        let color = desc.get(keys.base_texture);
        let bump = desc.get(keys.bump_map);
        let normal = bump.filter(|_| !desc.has(keys.ssbump));

        // First satisfied rule wins.
        let gloss = if let Some(mask) = desc.get(keys.env_mask) {
            Some(GlossSource::EnvMask(mask))
        } else if let Some(base) = color.filter(|_| desc.has(keys.base_alpha_env_mask)) {
            Some(GlossSource::BaseAlpha(base))
        } else {
            bump.filter(|_| desc.has(keys.normal_alpha_env_mask))
                .map(GlossSource::NormalAlpha)
        };

        Self {
            color,
            normal,
            gloss,
            surface_prop: desc.get(keys.surface_prop),
        }
    }
}

/// Behavior flags shared by both layers of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterialFlags {
    pub translucent: bool,
    pub alpha_test: bool,
    pub no_cull: bool,
    /// Only set when `$selfillum` is exactly `1`.
    pub self_illum: bool,
}

impl MaterialFlags {
    pub fn from_descriptor(desc: &MaterialDescriptor) -> Self {
        Self {
            translucent: desc.has(TRANSLUCENT_KEY),
            alpha_test: ALPHA_TEST_KEYS.iter().any(|key| desc.has(key)),
            no_cull: desc.has(NO_CULL_KEY),
            self_illum: desc.get(SELF_ILLUM_KEY) == Some("1"),
        }
    }

    /// Whether the color texture carries alpha that the target must keep.
    pub fn uses_color_alpha(&self) -> bool {
        self.translucent || self.alpha_test
    }
}

/// Ordered field builder; inserting an existing key keeps its position.
#[derive(Debug, Default)]
struct FieldBuilder(Fields);

impl FieldBuilder {
    fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    fn set_if(self, condition: bool, key: &str, value: &str) -> Self {
        if condition {
            self.set(key, value)
        } else {
            self
        }
    }

    fn set_opt(self, key: &str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    fn build(self) -> Fields {
        self.0
    }
}

/// Record shape of one target schema.
pub trait MaterialSchema {
    /// Reference to the converted texture with identifier `id`.
    fn texture_ref(&self, id: &str) -> String;

    /// Reference to the gloss texture extracted from `id`'s alpha channel.
    fn alpha_gloss_ref(&self, id: &str) -> String;

    /// Color map of a layer without a base texture.
    fn missing_color_map(&self) -> String;

    /// Fields of the primary record.
    fn primary(&self, desc: &MaterialDescriptor, layer: &Layer, flags: &MaterialFlags) -> Fields;

    /// Fields of the secondary (blend layer) record.
    fn secondary(&self, desc: &MaterialDescriptor, layer: &Layer, flags: &MaterialFlags) -> Fields;

    fn color_map(&self, layer: &Layer) -> String {
        match layer.color {
            Some(path) => self.texture_ref(&normalize(path)),
            None => self.missing_color_map(),
        }
    }

    fn normal_map(&self, layer: &Layer) -> Option<String> {
        layer.normal.map(|path| self.texture_ref(&normalize(path)))
    }

    fn gloss_map(&self, layer: &Layer) -> Option<String> {
        layer.gloss.map(|source| {
            let id = normalize(source.texture());
            if source.is_alpha_channel() {
                self.alpha_gloss_ref(&id)
            } else {
                self.texture_ref(&id)
            }
        })
    }
}

/// Older pipeline: `.tga` references, phong material types.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySchema;

/// Newer pipeline: image-record references, composed `lit_*` types.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModernSchema;

impl SchemaVariant {
    /// The material record strategy of this variant.
    pub fn material_schema(self) -> &'static dyn MaterialSchema {
        match self {
            SchemaVariant::Legacy => &LegacySchema,
            SchemaVariant::Modern => &ModernSchema,
        }
    }
}

/// Legacy material type of a shader.
pub fn legacy_material_type(shader: &str) -> &'static str {
    match shader {
        "lightmappedgeneric" | "worldvertextransition" => "world phong",
        "unlitgeneric" => "world unlit",
        "vertexlitgeneric" => "model phong",
        _ => "world phong",
    }
}

fn surface_type(layer: &Layer) -> &'static str {
    layer
        .surface_prop
        .map_or(NO_SURFACE, |id| surface::classify(id).surface)
}

/// Gloss class of a record: a custom gloss map overrides the taxonomy.
fn gloss_surface_type(layer: &Layer, has_gloss_map: bool) -> &'static str {
    if has_gloss_map {
        CUSTOM_GLOSS
    } else {
        layer
            .surface_prop
            .map_or(FULL_GLOSS, |id| surface::classify(id).gloss)
    }
}

impl MaterialSchema for LegacySchema {
    fn texture_ref(&self, id: &str) -> String {
        format!("{}{}.tga", TEXTURE_DIR, id)
    }

    fn alpha_gloss_ref(&self, id: &str) -> String {
        format!("{}{}_.tga", TEXTURE_DIR, id)
    }

    fn missing_color_map(&self) -> String {
        format!("{}noColorMap.tga", TEXTURE_DIR)
    }

    fn primary(&self, desc: &MaterialDescriptor, layer: &Layer, flags: &MaterialFlags) -> Fields {
        FieldBuilder::default()
            .set("materialType", legacy_material_type(&desc.shader))
            .set("usage", "tools")
            .set("colorMap", self.color_map(layer))
            .set_opt("normalMap", self.normal_map(layer))
            .set_opt("cosinePowerMap", self.gloss_map(layer))
            .set_if(flags.no_cull, "cullFace", "None")
            .set("surfaceType", surface_type(layer))
            .set_if(flags.alpha_test, "alphaTest", "GE128")
            .set_if(flags.translucent, "blendFunc", "Blend")
            .build()
    }

    fn secondary(&self, _desc: &MaterialDescriptor, layer: &Layer, flags: &MaterialFlags) -> Fields {
        FieldBuilder::default()
            .set("materialType", "world phong")
            .set("colorMap", self.color_map(layer))
            .set("blendFunc", "Blend")
            .set("usage", "tools")
            .set_opt("normalMap", self.normal_map(layer))
            .set_opt("cosinePowerMap2", self.gloss_map(layer))
            .set("surfaceType", surface_type(layer))
            .set_if(flags.alpha_test, "alphaTest", "GE128")
            .build()
    }
}

impl ModernSchema {
    /// Compose the `lit_*` type name: blend mode, then `_nocull`, then `_plus`.
    /// Emission overrides everything.
    pub fn material_type(plus: bool, flags: &MaterialFlags) -> String {
        if flags.self_illum {
            return "lit_emissive".to_string();
        }

        let mut material_type = String::from("lit");
        if flags.alpha_test {
            material_type.push_str("_alphatest");
        } else if flags.translucent {
            material_type.push_str("_transparent");
        }
        if flags.no_cull {
            material_type.push_str("_nocull");
        }
        if plus {
            material_type.push_str("_plus");
        }
        material_type
    }
}

impl MaterialSchema for ModernSchema {
    fn texture_ref(&self, id: &str) -> String {
        format!("i_{}", id)
    }

    fn alpha_gloss_ref(&self, id: &str) -> String {
        format!("i_{}_", id)
    }

    fn missing_color_map(&self) -> String {
        "404.tif".to_string()
    }

    fn primary(&self, _desc: &MaterialDescriptor, layer: &Layer, flags: &MaterialFlags) -> Fields {
        let gloss_map = self.gloss_map(layer);
        let plus = gloss_map.is_some();

        FieldBuilder::default()
            .set(
                "materialCategory",
                if plus { "Geometry Plus" } else { "Geometry" },
            )
            .set("materialType", Self::material_type(plus, flags))
            .set("colorMap", self.color_map(layer))
            .set("usage", "tools")
            .set_opt("normalMap", self.normal_map(layer))
            .set_opt("cosinePowerMap", gloss_map)
            .set("surfaceType", surface_type(layer))
            .set("glossSurfaceType", gloss_surface_type(layer, plus))
            .build()
    }

    fn secondary(&self, desc: &MaterialDescriptor, layer: &Layer, _flags: &MaterialFlags) -> Fields {
        let gloss_map = self.gloss_map(layer);
        let plus = gloss_map.is_some();
        let reveal_map = desc
            .get(REVEAL_KEY)
            .map(|path| self.texture_ref(&normalize(path)));

        FieldBuilder::default()
            .set("materialCategory", "Decal")
            .set(
                "materialType",
                if plus {
                    "lit_decal_reveal_plus"
                } else {
                    "lit_decal_reveal"
                },
            )
            .set("colorMap", self.color_map(layer))
            .set("usage", "tools")
            .set_opt("normalMap", self.normal_map(layer))
            .set_opt("alphaRevealMap", reveal_map)
            .set_opt("cosinePowerMap2", gloss_map)
            .set("surfaceType", surface_type(layer))
            .set("glossSurfaceType", gloss_surface_type(layer, plus))
            .build()
    }
}

/// Translate one descriptor into its material record(s).
///
/// Returns the primary record, followed by the `<name>_` blend-layer record
/// when the descriptor has a `$basetexture2`. Never fails: absent keys fall
/// back to the documented defaults.
pub fn map_material(
    name: &str,
    desc: &MaterialDescriptor,
    variant: SchemaVariant,
) -> Vec<OutputRecord> {
    let schema = variant.material_schema();
    let flags = MaterialFlags::from_descriptor(desc);
    let name = name.trim();

    let primary = Layer::resolve(desc, &PRIMARY_KEYS);
    let mut records = vec![OutputRecord::new(
        name,
        Category::Material,
        schema.primary(desc, &primary, &flags),
    )];

    if desc.has(SECONDARY_KEYS.base_texture) {
        let secondary = Layer::resolve(desc, &SECONDARY_KEYS);
        records.push(OutputRecord::new(
            format!("{}_", name),
            Category::Material,
            schema.secondary(desc, &secondary, &flags),
        ));
    }

    log::debug!("Mapped material {} -> {} record(s)", name, records.len());
    records
}

/// Translate a batch of named descriptors, preserving their order.
pub fn map_materials(
    descriptors: &IndexMap<String, MaterialDescriptor>,
    variant: SchemaVariant,
) -> Vec<OutputRecord> {
    descriptors
        .iter()
        .flat_map(|(name, desc)| map_material(name, desc, variant))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(shader: &str, params: &[(&str, &str)]) -> MaterialDescriptor {
        MaterialDescriptor::new(shader, params.iter().copied())
    }

    fn legacy_tex(path: &str) -> String {
        format!("texture_assets\\corvid\\{}.tga", normalize(path))
    }

    #[test]
    fn test_legacy_basic_world_material() {
        let d = desc(
            "lightmappedgeneric",
            &[("$basetexture", "a/b"), ("$surfaceprop", "wood")],
        );
        let records = map_material("wall", &d, SchemaVariant::Legacy);
        assert_eq!(records.len(), 1);

        let rec = &records[0];
        assert_eq!(rec.name, "wall");
        assert_eq!(rec.category, Category::Material);
        let keys: Vec<&str> = rec.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["materialType", "usage", "colorMap", "surfaceType"]);
        assert_eq!(rec.field("materialType"), Some("world phong"));
        assert_eq!(rec.field("usage"), Some("tools"));
        assert_eq!(rec.field("colorMap"), Some(legacy_tex("a/b").as_str()));
        assert_eq!(rec.field("surfaceType"), Some("wood"));
    }

    #[test]
    fn test_legacy_material_types() {
        assert_eq!(legacy_material_type("worldvertextransition"), "world phong");
        assert_eq!(legacy_material_type("unlitgeneric"), "world unlit");
        assert_eq!(legacy_material_type("vertexlitgeneric"), "model phong");
        assert_eq!(legacy_material_type("water"), "world phong");
    }

    #[test]
    fn test_legacy_alpha_and_blend_flags() {
        let d = desc(
            "lightmappedgeneric",
            &[("$basetexture", "a/b"), ("$alphatest", "1"), ("$translucent", "1")],
        );
        let rec = &map_material("m", &d, SchemaVariant::Legacy)[0];
        assert_eq!(rec.field("alphaTest"), Some("GE128"));
        assert_eq!(rec.field("blendFunc"), Some("Blend"));
        assert_eq!(rec.field("colorMap"), Some(legacy_tex("a/b").as_str()));
    }

    #[test]
    fn test_missing_base_texture_uses_placeholder() {
        let d = desc("unlitgeneric", &[]);
        let legacy = &map_material("m", &d, SchemaVariant::Legacy)[0];
        assert_eq!(
            legacy.field("colorMap"),
            Some("texture_assets\\corvid\\noColorMap.tga")
        );
        let modern = &map_material("m", &d, SchemaVariant::Modern)[0];
        assert_eq!(modern.field("colorMap"), Some("404.tif"));
    }

    #[test]
    fn test_ssbump_suppresses_normal_map() {
        let plain = desc("lightmappedgeneric", &[("$bumpmap", "a/n")]);
        let rec = &map_material("m", &plain, SchemaVariant::Legacy)[0];
        assert_eq!(rec.field("normalMap"), Some(legacy_tex("a/n").as_str()));

        let ssbump = desc("lightmappedgeneric", &[("$bumpmap", "a/n"), ("$ssbump", "1")]);
        for variant in [SchemaVariant::Legacy, SchemaVariant::Modern] {
            let rec = &map_material("m", &ssbump, variant)[0];
            assert_eq!(rec.field("normalMap"), None);
        }
    }

    #[test]
    fn test_env_mask_beats_base_alpha() {
        let d = desc(
            "lightmappedgeneric",
            &[
                ("$basetexture", "a/b"),
                ("$envmapmask", "a/mask"),
                ("$basealphaenvmapmask", "1"),
            ],
        );
        let rec = &map_material("m", &d, SchemaVariant::Legacy)[0];
        assert_eq!(rec.field("cosinePowerMap"), Some(legacy_tex("a/mask").as_str()));
    }

    #[test]
    fn test_base_alpha_gloss_uses_suffixed_color_texture() {
        let d = desc(
            "lightmappedgeneric",
            &[("$basetexture", "a/b"), ("$basealphaenvmapmask", "1")],
        );
        let rec = &map_material("m", &d, SchemaVariant::Legacy)[0];
        let expected = format!("texture_assets\\corvid\\{}_.tga", normalize("a/b"));
        assert_eq!(rec.field("cosinePowerMap"), Some(expected.as_str()));
    }

    #[test]
    fn test_base_alpha_wins_over_normal_alpha() {
        let d = desc(
            "lightmappedgeneric",
            &[
                ("$basetexture", "a/b"),
                ("$bumpmap", "a/n"),
                ("$basealphaenvmapmask", "1"),
                ("$normalmapalphaenvmapmask", "1"),
            ],
        );
        let layer = Layer::resolve(&d, &PRIMARY_KEYS);
        assert_eq!(layer.gloss, Some(GlossSource::BaseAlpha("a/b")));
    }

    #[test]
    fn test_normal_alpha_requires_bump_map() {
        let without = desc("lightmappedgeneric", &[("$normalmapalphaenvmapmask", "1")]);
        assert_eq!(Layer::resolve(&without, &PRIMARY_KEYS).gloss, None);

        let with = desc(
            "lightmappedgeneric",
            &[("$bumpmap", "a/n"), ("$normalmapalphaenvmapmask", "1")],
        );
        let rec = &map_material("m", &with, SchemaVariant::Modern)[0];
        let expected = format!("i_{}_", normalize("a/n"));
        assert_eq!(rec.field("cosinePowerMap"), Some(expected.as_str()));
    }

    #[test]
    fn test_no_cull() {
        let d = desc("lightmappedgeneric", &[("$nocull", "1")]);
        let rec = &map_material("m", &d, SchemaVariant::Legacy)[0];
        assert_eq!(rec.field("cullFace"), Some("None"));

        let culled = desc("lightmappedgeneric", &[]);
        let rec = &map_material("m", &culled, SchemaVariant::Legacy)[0];
        assert_eq!(rec.field("cullFace"), None);
    }

    #[test]
    fn test_unknown_surface_prop() {
        let d = desc("lightmappedgeneric", &[("$surfaceprop", "unobtanium")]);
        let legacy = &map_material("m", &d, SchemaVariant::Legacy)[0];
        assert_eq!(legacy.field("surfaceType"), Some("<none>"));
        let modern = &map_material("m", &d, SchemaVariant::Modern)[0];
        assert_eq!(modern.field("surfaceType"), Some("<none>"));
        assert_eq!(modern.field("glossSurfaceType"), Some("<full>"));
    }

    #[test]
    fn test_secondary_record_exists_iff_basetexture2() {
        let single = desc("worldvertextransition", &[("$basetexture", "a/b")]);
        let blended = desc(
            "worldvertextransition",
            &[("$basetexture", "a/b"), ("$basetexture2", "a/c")],
        );
        for variant in [SchemaVariant::Legacy, SchemaVariant::Modern] {
            assert_eq!(map_material("m", &single, variant).len(), 1);
            let records = map_material("m", &blended, variant);
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].name, "m");
            assert_eq!(records[1].name, "m_");
        }
    }

    #[test]
    fn test_legacy_secondary_layer() {
        let d = desc(
            "worldvertextransition",
            &[
                ("$basetexture", "a/b"),
                ("$basetexture2", "a/c"),
                ("$bumpmap2", "a/c_normal"),
                ("$envmapmask2", "a/c_mask"),
                ("$surfaceprop2", "grass"),
                ("$alphatest", "1"),
            ],
        );
        let records = map_material("m", &d, SchemaVariant::Legacy);
        let primary = &records[0];
        let secondary = &records[1];

        assert_eq!(primary.field("cosinePowerMap2"), None);
        assert_eq!(secondary.field("materialType"), Some("world phong"));
        assert_eq!(secondary.field("blendFunc"), Some("Blend"));
        assert_eq!(secondary.field("colorMap"), Some(legacy_tex("a/c").as_str()));
        assert_eq!(
            secondary.field("normalMap"),
            Some(legacy_tex("a/c_normal").as_str())
        );
        assert_eq!(
            secondary.field("cosinePowerMap2"),
            Some(legacy_tex("a/c_mask").as_str())
        );
        assert_eq!(secondary.field("surfaceType"), Some("grass"));
        assert_eq!(secondary.field("alphaTest"), Some("GE128"));
    }

    #[test]
    fn test_modern_defaults() {
        let d = desc(
            "lightmappedgeneric",
            &[("$basetexture", "a/b"), ("$surfaceprop", "grass")],
        );
        let rec = &map_material("m", &d, SchemaVariant::Modern)[0];
        let keys: Vec<&str> = rec.fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "materialCategory",
                "materialType",
                "colorMap",
                "usage",
                "surfaceType",
                "glossSurfaceType"
            ]
        );
        assert_eq!(rec.field("materialCategory"), Some("Geometry"));
        assert_eq!(rec.field("materialType"), Some("lit"));
        let expected = format!("i_{}", normalize("a/b"));
        assert_eq!(rec.field("colorMap"), Some(expected.as_str()));
        assert_eq!(rec.field("surfaceType"), Some("grass"));
        assert_eq!(rec.field("glossSurfaceType"), Some("foliage"));
    }

    #[test]
    fn test_modern_gloss_map_promotes_to_plus_and_custom_gloss() {
        let d = desc(
            "lightmappedgeneric",
            &[
                ("$basetexture", "a/b"),
                ("$basealphaenvmapmask", "1"),
                ("$surfaceprop", "metal"),
            ],
        );
        let rec = &map_material("m", &d, SchemaVariant::Modern)[0];
        assert_eq!(rec.field("materialCategory"), Some("Geometry Plus"));
        assert_eq!(rec.field("materialType"), Some("lit_plus"));
        assert_eq!(rec.field("glossSurfaceType"), Some("<custom>"));
    }

    #[test]
    fn test_modern_type_composition() {
        let flags = |translucent, alpha_test, no_cull| MaterialFlags {
            translucent,
            alpha_test,
            no_cull,
            self_illum: false,
        };
        assert_eq!(ModernSchema::material_type(false, &flags(false, false, false)), "lit");
        assert_eq!(
            ModernSchema::material_type(false, &flags(true, false, false)),
            "lit_transparent"
        );
        assert_eq!(
            ModernSchema::material_type(true, &flags(true, false, false)),
            "lit_transparent_plus"
        );
        assert_eq!(
            ModernSchema::material_type(false, &flags(true, true, false)),
            "lit_alphatest"
        );
        assert_eq!(
            ModernSchema::material_type(true, &flags(false, true, true)),
            "lit_alphatest_nocull_plus"
        );
        assert_eq!(
            ModernSchema::material_type(false, &flags(true, false, true)),
            "lit_transparent_nocull"
        );
        assert_eq!(
            ModernSchema::material_type(true, &flags(false, false, true)),
            "lit_nocull_plus"
        );
        assert_eq!(
            ModernSchema::material_type(false, &flags(false, false, true)),
            "lit_nocull"
        );
    }

    #[test]
    fn test_self_illum_forces_emissive_only_for_one() {
        let lit = desc(
            "lightmappedgeneric",
            &[("$translucent", "1"), ("$nocull", "1"), ("$selfillum", "1")],
        );
        let rec = &map_material("m", &lit, SchemaVariant::Modern)[0];
        assert_eq!(rec.field("materialType"), Some("lit_emissive"));

        let off = desc("lightmappedgeneric", &[("$selfillum", "0")]);
        let rec = &map_material("m", &off, SchemaVariant::Modern)[0];
        assert_eq!(rec.field("materialType"), Some("lit"));
    }

    #[test]
    fn test_modern_secondary_decal() {
        let d = desc(
            "worldvertextransition",
            &[
                ("$basetexture", "a/b"),
                ("$basetexture2", "a/c"),
                ("$blendmodulatetexture", "a/reveal"),
                ("$surfaceprop2", "dirt"),
            ],
        );
        let records = map_material("m", &d, SchemaVariant::Modern);
        let decal = &records[1];
        assert_eq!(decal.field("materialCategory"), Some("Decal"));
        assert_eq!(decal.field("materialType"), Some("lit_decal_reveal"));
        let reveal = format!("i_{}", normalize("a/reveal"));
        assert_eq!(decal.field("alphaRevealMap"), Some(reveal.as_str()));
        assert_eq!(decal.field("surfaceType"), Some("dirt"));
        assert_eq!(decal.field("glossSurfaceType"), Some("dirt"));
    }

    #[test]
    fn test_modern_secondary_gloss_is_own_record() {
        let d = desc(
            "worldvertextransition",
            &[
                ("$basetexture", "a/b"),
                ("$envmapmask", "a/mask"),
                ("$basetexture2", "a/c"),
                ("$surfaceprop2", "dirt"),
            ],
        );
        let records = map_material("m", &d, SchemaVariant::Modern);
        assert_eq!(records[0].field("glossSurfaceType"), Some("<custom>"));
        assert_eq!(records[1].field("glossSurfaceType"), Some("dirt"));

        let glossy = desc(
            "worldvertextransition",
            &[
                ("$basetexture2", "a/c"),
                ("$basealphaenvmapmask2", "1"),
            ],
        );
        let decal = &map_material("m", &glossy, SchemaVariant::Modern)[1];
        assert_eq!(decal.field("materialType"), Some("lit_decal_reveal_plus"));
        let expected = format!("i_{}_", normalize("a/c"));
        assert_eq!(decal.field("cosinePowerMap2"), Some(expected.as_str()));
        assert_eq!(decal.field("glossSurfaceType"), Some("<custom>"));
    }

    #[test]
    fn test_map_materials_preserves_order() {
        let mut descriptors = IndexMap::new();
        descriptors.insert(
            "second".to_string(),
            desc("lightmappedgeneric", &[("$basetexture2", "x/y")]),
        );
        descriptors.insert("first".to_string(), desc("unlitgeneric", &[]));
        let names: Vec<String> = map_materials(&descriptors, SchemaVariant::Legacy)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["second", "second_", "first"]);
    }
}
