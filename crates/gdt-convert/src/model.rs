//! Model records and model-material resolution.

use crate::error::ConvertError;
use crate::identifier::normalize;
use crate::types::{Category, Fields, OutputRecord, SchemaVariant};
use std::path::Path;

/// Directory prefix of exported model files, as seen by the target tools.
pub const MODEL_DIR: &str = "corvid\\";

/// What the binary model reader reports about one model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelInfo {
    /// Material names referenced by the model (may include directories).
    pub material_names: Vec<String>,
    /// Material search directories declared by the model.
    pub material_dirs: Vec<String>,
    /// Physical surface property of the whole model.
    pub surface_prop: String,
}

/// Reader for binary model files.
pub trait ModelReader {
    fn read(&self, path: &Path) -> Result<ModelInfo, ConvertError>;
}

/// A material used by a model, with the surface property it inherits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMaterial {
    /// Material path relative to `materials/`, lower-case, `/`-separated.
    pub path: String,
    pub surface_prop: String,
}

impl SchemaVariant {
    /// Extension of exported model files.
    pub fn model_extension(self) -> &'static str {
        match self {
            SchemaVariant::Legacy => "xmodel_export",
            SchemaVariant::Modern => "xmodel_bin",
        }
    }

    /// Field name of the collision LOD setting.
    pub fn collision_lod_key(self) -> &'static str {
        match self {
            SchemaVariant::Legacy => "collisionLOD",
            SchemaVariant::Modern => "BulletCollisionLOD",
        }
    }
}

/// Build one `xmodel` record per model path.
pub fn build_model_records<S: AsRef<str>>(
    model_paths: &[S],
    variant: SchemaVariant,
) -> Vec<OutputRecord> {
    model_paths
        .iter()
        .map(|path| {
            let id = normalize(path.as_ref());
            let mut fields = Fields::new();
            fields.insert(variant.collision_lod_key().into(), "High".into());
            fields.insert(
                "filename".into(),
                format!("{}{}.{}", MODEL_DIR, id, variant.model_extension()),
            );
            fields.insert("type".into(), "rigid".into());
            fields.insert("physicsPreset".into(), "default".into());
            log::debug!("Model record {} for {}", id, path.as_ref());
            OutputRecord::new(id, Category::XModel, fields)
        })
        .collect()
}

fn to_posix_lower(path: &str) -> String {
    path.trim().replace('\\', "/").to_lowercase()
}

/// List every candidate material path of a model set.
///
/// For each material the model's search directories are tried with the
/// material's file name, then the material name as given. Candidates are
/// deduplicated in first-seen order; each carries its model's surface property.
pub fn resolve_model_materials(models: &[ModelInfo]) -> Vec<ModelMaterial> {
    let mut resolved: Vec<ModelMaterial> = Vec::new();
    let mut push = |path: String, surface_prop: &str| {
        if !path.is_empty() && !resolved.iter().any(|m| m.path == path) {
            resolved.push(ModelMaterial {
                path,
                surface_prop: surface_prop.to_string(),
            });
        }
    };

    for model in models {
        for material in &model.material_names {
            let material = to_posix_lower(material);
            let file_name = material.rsplit('/').next().unwrap_or_default();

            for dir in &model.material_dirs {
                let dir = to_posix_lower(dir);
                let dir = dir.trim_matches('/');
                let candidate = if dir.is_empty() {
                    file_name.to_string()
                } else {
                    format!("{}/{}", dir, file_name)
                };
                push(candidate, &model.surface_prop);
            }

            push(material.trim_matches('/').to_string(), &model.surface_prop);
        }
    }

    resolved
}

/// Read every model and resolve the materials they use.
pub fn read_model_materials<R: ModelReader + ?Sized>(
    reader: &R,
    model_files: &[&Path],
) -> Result<Vec<ModelMaterial>, ConvertError> {
    let infos = model_files
        .iter()
        .map(|path| reader.read(path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(resolve_model_materials(&infos))
}
