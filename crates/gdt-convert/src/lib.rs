/// Error types for conversion batches.
pub mod error;

/// Core type definitions: descriptors, records, configuration.
pub mod types;

/// Record/file identifier derivation.
pub mod identifier;

/// Physical surface taxonomy.
pub mod surface;

/// Material descriptor text reader.
pub mod vmt;

/// Material descriptor to material record translation.
pub mod material;

/// Texture reference collection and image records.
pub mod textures;

/// Model records and model-material resolution.
pub mod model;

/// Studio model header reader.
pub mod mdl;

/// Staging of source files into the work directory.
pub mod staging;

/// Asset-database (`.gdt`) and batch script output.
pub mod gdt;

pub use error::ConvertError;
pub use gdt::Gdt;
pub use mdl::MdlReader;
pub use model::{ModelInfo, ModelReader};
pub use staging::{FsSourceDir, SourceDir, StageKind, WorkDir};
pub use types::{
    Category, ConvertConfig, MaterialBatch, MaterialDescriptor, ModelBatch, OutputRecord,
    SchemaVariant,
};

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Convert a list of map materials found under `config.game_dir`.
///
/// Stages descriptors and textures into `config.work_dir`, then returns the
/// material records (and image records for the modern schema).
pub fn convert_materials(
    config: &ConvertConfig,
    material_paths: &[String],
) -> Result<MaterialBatch, ConvertError> {
    let source = FsSourceDir::new(&config.game_dir);
    convert_materials_from(config, &source, material_paths)
}

/// [`convert_materials`] over an arbitrary source.
pub fn convert_materials_from<S: SourceDir + ?Sized>(
    config: &ConvertConfig,
    source: &S,
    material_paths: &[String],
) -> Result<MaterialBatch, ConvertError> {
    let paths: Vec<&str> = material_paths.iter().map(String::as_str).collect();
    identifier::check_collisions(&paths)?;
    config.work_dir.create_all()?;

    log::info!("Staging {} materials", material_paths.len());
    let staged = staging::stage_materials(material_paths, source, &config.work_dir, StageKind::Map);
    let descriptors = staging::load_descriptors(&staged, &config.work_dir, StageKind::Map)?;

    build_material_batch(config, source, &descriptors, StageKind::Map)
}

/// Convert the materials used by a set of already staged models.
///
/// Pass the paths returned in [`ModelBatch::models`]; models whose staged file
/// is missing are skipped with a warning. Each model material inherits its
/// model's surface property unless it defines its own.
pub fn convert_model_materials<S, R>(
    config: &ConvertConfig,
    source: &S,
    reader: &R,
    model_paths: &[String],
) -> Result<MaterialBatch, ConvertError>
where
    S: SourceDir + ?Sized,
    R: ModelReader + ?Sized,
{
    config.work_dir.create_all()?;

    let model_files: Vec<PathBuf> = model_paths
        .iter()
        .map(|model| staging::staged_model(&config.work_dir, model))
        .filter(|file| {
            let present = file.is_file();
            if !present {
                log::warn!("Staged model missing, skipping: {}", file.display());
            }
            present
        })
        .collect();
    let model_files: Vec<&Path> = model_files.iter().map(PathBuf::as_path).collect();
    let candidates = model::read_model_materials(reader, &model_files)?;
    log::info!(
        "Resolved {} material candidates from {} models",
        candidates.len(),
        model_paths.len()
    );

    let staged = staging::stage_model_materials(&candidates, source, &config.work_dir);
    let names: Vec<String> = staged.iter().map(|m| m.path.clone()).collect();
    let mut descriptors = staging::load_descriptors(&names, &config.work_dir, StageKind::Model)?;

    for material in &staged {
        if let Some(desc) = descriptors.get_mut(&identifier::normalize(&material.path)) {
            *desc = std::mem::take(desc).with_default_surface_prop(&material.surface_prop);
        }
    }

    build_material_batch(config, source, &descriptors, StageKind::Model)
}

fn build_material_batch<S: SourceDir + ?Sized>(
    config: &ConvertConfig,
    source: &S,
    descriptors: &IndexMap<String, MaterialDescriptor>,
    kind: StageKind,
) -> Result<MaterialBatch, ConvertError> {
    let set = textures::collect(descriptors.values());
    let texture_paths: Vec<&str> = textures::TextureRole::ALL
        .iter()
        .flat_map(|&role| set.role(role).values().map(String::as_str))
        .collect();
    identifier::check_collisions(&texture_paths)?;

    let copied = staging::stage_textures(&set, source, &config.work_dir, kind);
    log::info!("Staged {} of {} textures", copied, set.len());

    let materials = material::map_materials(descriptors, config.schema);
    let images = textures::build_image_records(&set, config.schema);
    log::info!(
        "Built {} material and {} image records",
        materials.len(),
        images.len()
    );

    Ok(MaterialBatch { materials, images })
}

/// Stage model files and build their `xmodel` records.
///
/// Models that cannot be staged are left out of the returned batch.
pub fn convert_models<S: SourceDir + ?Sized>(
    config: &ConvertConfig,
    source: &S,
    model_paths: &[String],
) -> Result<ModelBatch, ConvertError> {
    let paths: Vec<&str> = model_paths.iter().map(String::as_str).collect();
    identifier::check_collisions(&paths)?;
    config.work_dir.create_all()?;

    log::info!("Staging {} models", model_paths.len());
    let models = staging::stage_models(model_paths, source, &config.work_dir);
    let records = model::build_model_records(&models, config.schema);
    Ok(ModelBatch { models, records })
}

/// Write `<stem>.gdt` (and `<stem>.bat` for the legacy schema) to `out_dir`.
///
/// Returns the written file paths.
pub fn write_batch(
    out_dir: &Path,
    stem: &str,
    records: Vec<OutputRecord>,
    schema: SchemaVariant,
) -> Result<Vec<PathBuf>, ConvertError> {
    if stem.is_empty() {
        return Err(ConvertError::Validation("empty output file name".to_string()));
    }
    std::fs::create_dir_all(out_dir)?;

    let gdt: Gdt = records.into_iter().collect();
    let mut written = Vec::new();

    let gdt_path = out_dir.join(format!("{}.gdt", stem));
    gdt.write_gdt(&gdt_path)?;
    log::info!("Wrote {} records to {}", gdt.len(), gdt_path.display());
    written.push(gdt_path);

    if schema == SchemaVariant::Legacy {
        let bat_path = out_dir.join(format!("{}.bat", stem));
        gdt.write_bat(&bat_path)?;
        written.push(bat_path);
    }

    Ok(written)
}

/// Read a list file: one entry per line, blank lines and `//` comments ignored.
pub fn read_list(path: &Path) -> Result<Vec<String>, ConvertError> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(|line| line.split("//").next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "brick/wall01\n\n// comment\n  metal/sheet // trailing\n").unwrap();
        assert_eq!(read_list(&path).unwrap(), ["brick/wall01", "metal/sheet"]);
    }

    #[test]
    fn test_write_batch_modern_has_no_bat() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_batch(dir.path(), "images", Vec::new(), SchemaVariant::Modern).unwrap();
        assert_eq!(written, [dir.path().join("images.gdt")]);
    }

    #[test]
    fn test_write_batch_rejects_empty_stem() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_batch(dir.path(), "", Vec::new(), SchemaVariant::Legacy).unwrap_err();
        assert!(matches!(err, ConvertError::Validation(_)));
    }
}
