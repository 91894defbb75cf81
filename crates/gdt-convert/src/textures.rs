//! Texture reference collection and image record generation.

use crate::identifier::{canonical_path, normalize};
use crate::material::{MaterialFlags, PRIMARY_KEYS, REVEAL_KEY, SECONDARY_KEYS, TEXTURE_DIR};
use crate::types::{Category, Fields, MaterialDescriptor, OutputRecord, SchemaVariant};
use indexmap::{IndexMap, IndexSet};

/// Purpose of a referenced texture; drives its image settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRole {
    /// Opaque color map.
    Color,
    /// Color map whose alpha channel is used (translucent / alpha-tested).
    ColorAlpha,
    Normal,
    /// Dedicated gloss (env-map mask) texture.
    Env,
    /// Gloss extracted from the alpha channel of a color or normal texture.
    EnvAlpha,
    /// Blend reveal mask of a two-layer material.
    Reveal,
}

impl TextureRole {
    /// All roles, in image record emission order.
    pub const ALL: [TextureRole; 6] = [
        TextureRole::Color,
        TextureRole::ColorAlpha,
        TextureRole::Normal,
        TextureRole::Env,
        TextureRole::EnvAlpha,
        TextureRole::Reveal,
    ];

    pub fn semantic(self) -> &'static str {
        match self {
            TextureRole::Color | TextureRole::ColorAlpha => "diffuseMap",
            TextureRole::Normal => "normalMap",
            TextureRole::Env | TextureRole::EnvAlpha => "glossMap",
            TextureRole::Reveal => "revealMap",
        }
    }

    pub fn compression_method(self) -> &'static str {
        match self {
            TextureRole::Color | TextureRole::ColorAlpha => "compressed high color",
            _ => "compressed",
        }
    }

    pub fn core_semantic(self) -> &'static str {
        match self {
            TextureRole::Color | TextureRole::ColorAlpha => "sRGB3chAlpha",
            TextureRole::Normal => "Normal",
            TextureRole::Env | TextureRole::EnvAlpha | TextureRole::Reveal => "Linear1ch",
        }
    }

    /// Suffix distinguishing an alpha-extracted gloss map from its source.
    pub fn suffix(self) -> &'static str {
        match self {
            TextureRole::EnvAlpha => "_",
            _ => "",
        }
    }

    /// Whether the role is backed by its own source file.
    pub fn has_own_file(self) -> bool {
        self != TextureRole::EnvAlpha
    }
}

/// Distinct textures referenced by a batch, grouped by role.
///
/// Each role maps normalized identifier → canonical source path, keeping the
/// first occurrence in discovery order.
#[derive(Debug, Clone, Default)]
pub struct TextureReferenceSet {
    pub color: IndexMap<String, String>,
    pub color_alpha: IndexMap<String, String>,
    pub normal: IndexMap<String, String>,
    pub env: IndexMap<String, String>,
    pub env_alpha: IndexMap<String, String>,
    pub reveal: IndexMap<String, String>,
}

impl TextureReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self, role: TextureRole) -> &IndexMap<String, String> {
        match role {
            TextureRole::Color => &self.color,
            TextureRole::ColorAlpha => &self.color_alpha,
            TextureRole::Normal => &self.normal,
            TextureRole::Env => &self.env,
            TextureRole::EnvAlpha => &self.env_alpha,
            TextureRole::Reveal => &self.reveal,
        }
    }

    fn role_mut(&mut self, role: TextureRole) -> &mut IndexMap<String, String> {
        match role {
            TextureRole::Color => &mut self.color,
            TextureRole::ColorAlpha => &mut self.color_alpha,
            TextureRole::Normal => &mut self.normal,
            TextureRole::Env => &mut self.env,
            TextureRole::EnvAlpha => &mut self.env_alpha,
            TextureRole::Reveal => &mut self.reveal,
        }
    }

    /// Record a texture path under `role`. Returns false if already present.
    ///
    /// A file-backed texture lives in exactly one file-backed role: the first
    /// role it was seen in. Alpha-extracted gloss is tracked separately since
    /// it produces its own `_`-suffixed image.
    pub fn insert(&mut self, role: TextureRole, path: &str) -> bool {
        let id = normalize(path);
        if role.has_own_file() {
            let claimed = TextureRole::ALL
                .iter()
                .filter(|r| r.has_own_file())
                .any(|&r| self.role(r).contains_key(&id));
            if claimed {
                return false;
            }
        }
        let entries = self.role_mut(role);
        if entries.contains_key(&id) {
            return false;
        }
        entries.insert(id, canonical_path(path));
        true
    }

    /// Identifiers of one role, in discovery order.
    pub fn identifiers(&self, role: TextureRole) -> Vec<&str> {
        self.role(role).keys().map(String::as_str).collect()
    }

    /// Whether any role references the identifier.
    pub fn contains(&self, id: &str) -> bool {
        TextureRole::ALL
            .iter()
            .any(|&role| self.role(role).contains_key(id))
    }

    pub fn len(&self) -> usize {
        TextureRole::ALL.iter().map(|&role| self.role(role).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record every texture a descriptor references.
    pub fn add_descriptor(&mut self, desc: &MaterialDescriptor) {
        let flags = MaterialFlags::from_descriptor(desc);

        if let Some(base) = desc.get(PRIMARY_KEYS.base_texture) {
            let role = if flags.uses_color_alpha() {
                TextureRole::ColorAlpha
            } else {
                TextureRole::Color
            };
            self.insert(role, base);
        }

        let single_file_roles = [
            (PRIMARY_KEYS.bump_map, TextureRole::Normal),
            (PRIMARY_KEYS.env_mask, TextureRole::Env),
            (REVEAL_KEY, TextureRole::Reveal),
            (SECONDARY_KEYS.base_texture, TextureRole::Color),
            (SECONDARY_KEYS.bump_map, TextureRole::Normal),
            (SECONDARY_KEYS.env_mask, TextureRole::Env),
        ];
        for (key, role) in single_file_roles {
            if let Some(path) = desc.get(key) {
                self.insert(role, path);
            }
        }

        // Alpha-channel gloss is keyed by the texture that carries it.
        for keys in [&PRIMARY_KEYS, &SECONDARY_KEYS] {
            let carriers = [
                (keys.base_alpha_env_mask, keys.base_texture),
                (keys.normal_alpha_env_mask, keys.bump_map),
            ];
            for (flag_key, carrier_key) in carriers {
                if !desc.has(flag_key) {
                    continue;
                }
                if let Some(carrier) = desc.get(carrier_key) {
                    self.insert(TextureRole::EnvAlpha, carrier);
                }
            }
        }
    }
}

/// Collect the texture references of a batch of descriptors, in order.
pub fn collect<'a>(
    descriptors: impl IntoIterator<Item = &'a MaterialDescriptor>,
) -> TextureReferenceSet {
    let mut set = TextureReferenceSet::new();
    for desc in descriptors {
        set.add_descriptor(desc);
    }
    set
}

/// Build one image record per collected texture.
///
/// Only the modern schema has image records; legacy materials reference the
/// texture files directly. A texture reaching two roles with the same record
/// name is emitted once, under the first role.
pub fn build_image_records(set: &TextureReferenceSet, variant: SchemaVariant) -> Vec<OutputRecord> {
    if variant == SchemaVariant::Legacy {
        return Vec::new();
    }

    let mut emitted: IndexSet<String> = IndexSet::new();
    let mut records = Vec::new();

    for role in TextureRole::ALL {
        for id in set.role(role).keys() {
            let name = format!("i_{}{}", id, role.suffix());
            if !emitted.insert(name.clone()) {
                log::debug!("Image {} already emitted, skipping {:?} duplicate", name, role);
                continue;
            }
            records.push(OutputRecord::new(name, Category::Image, image_fields(id, role)));
        }
    }

    records
}

fn image_fields(id: &str, role: TextureRole) -> Fields {
    let mut fields = Fields::new();
    fields.insert("imageType".into(), "Texture".into());
    fields.insert("type".into(), "image".into());
    fields.insert(
        "baseImage".into(),
        format!("{}{}{}.tif", TEXTURE_DIR, id, role.suffix()),
    );
    fields.insert("semantic".into(), role.semantic().into());
    fields.insert("compressionMethod".into(), role.compression_method().into());
    fields.insert("coreSemantic".into(), role.core_semantic().into());
    fields.insert("streamable".into(), "1".into());
    fields
}
