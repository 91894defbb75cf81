//! Copying source files into the work directory before conversion.
//!
//! Copy failures are tolerated: the affected asset is left out of the batch
//! and a warning is logged.

use crate::error::ConvertError;
use crate::identifier::{canonical_path, normalize};
use crate::model::ModelMaterial;
use crate::textures::{TextureReferenceSet, TextureRole};
use crate::types::MaterialDescriptor;
use crate::vmt;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Model file companions copied next to each `.mdl`.
const MODEL_COMPANIONS: [&str; 3] = ["dx90.vtx", "vtx", "vvd"];

/// Staging directory for one conversion batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDir {
    root: PathBuf,
}

impl Default for WorkDir {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("corvid"))
    }
}

/// Which asset set a staged file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Materials referenced by map geometry.
    Map,
    /// Materials referenced by models.
    Model,
}

impl WorkDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Staged map material descriptors.
    pub fn materials(&self) -> PathBuf {
        self.root.join("mat")
    }

    /// Staged map material textures.
    pub fn material_textures(&self) -> PathBuf {
        self.root.join("matTex")
    }

    /// Staged model material descriptors.
    pub fn model_materials(&self) -> PathBuf {
        self.root.join("mdlMats")
    }

    /// Staged model material textures.
    pub fn model_textures(&self) -> PathBuf {
        self.root.join("mdlTex")
    }

    /// Staged model files.
    pub fn models(&self) -> PathBuf {
        self.root.join("mdl")
    }

    pub fn descriptor_dir(&self, kind: StageKind) -> PathBuf {
        match kind {
            StageKind::Map => self.materials(),
            StageKind::Model => self.model_materials(),
        }
    }

    pub fn texture_dir(&self, kind: StageKind) -> PathBuf {
        match kind {
            StageKind::Map => self.material_textures(),
            StageKind::Model => self.model_textures(),
        }
    }

    /// Create every staging sub-directory.
    pub fn create_all(&self) -> Result<(), ConvertError> {
        for dir in [
            self.materials(),
            self.material_textures(),
            self.model_materials(),
            self.model_textures(),
            self.models(),
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// Source of game files addressed by paths relative to the game root.
pub trait SourceDir {
    /// Copy `src` to `dst`. Returns false when the source does not exist or
    /// the copy failed.
    fn copy(&self, src: &str, dst: &Path) -> bool;
}

/// A loose game directory on disk.
#[derive(Debug, Clone)]
pub struct FsSourceDir {
    root: PathBuf,
}

impl FsSourceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a relative path, falling back to a case-insensitive match per
    /// component. Paths that climb out of the root (`..`) or are absolute never
    /// resolve.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = relative.replace('\\', "/");
        if relative.starts_with('/') || relative.split('/').any(|part| part == "..") {
            log::warn!("Refusing path outside the game directory: {}", relative);
            return None;
        }
        let exact = self.root.join(&relative);
        if exact.is_file() {
            return Some(exact);
        }

        let mut current = self.root.clone();
        for part in relative.split('/').filter(|p| !p.is_empty()) {
            let direct = current.join(part);
            if direct.exists() {
                current = direct;
                continue;
            }
            let entry = fs::read_dir(&current).ok()?.flatten().find(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.eq_ignore_ascii_case(part))
            })?;
            current = entry.path();
        }
        current.is_file().then_some(current)
    }
}

impl SourceDir for FsSourceDir {
    fn copy(&self, src: &str, dst: &Path) -> bool {
        let Some(source) = self.resolve(src) else {
            log::debug!("Source file not found: {}", src);
            return false;
        };

        let result = dst
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::copy(&source, dst));
        match result {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Failed to copy {} -> {}: {}", source.display(), dst.display(), e);
                false
            }
        }
    }
}

/// Staged descriptor file of a material path.
pub fn staged_descriptor(work_dir: &WorkDir, kind: StageKind, material: &str) -> PathBuf {
    vmt::descriptor_path(&work_dir.descriptor_dir(kind), &normalize(material))
}

/// Copy material descriptors into the work directory.
///
/// Returns the canonical paths of the materials that were staged.
pub fn stage_materials<S: SourceDir + ?Sized>(
    materials: &[String],
    source: &S,
    work_dir: &WorkDir,
    kind: StageKind,
) -> Vec<String> {
    let mut staged: Vec<String> = Vec::new();
    for material in materials {
        let path = canonical_path(material);
        if path.is_empty() || staged.contains(&path) {
            continue;
        }
        let dst = staged_descriptor(work_dir, kind, &path);
        if source.copy(&format!("materials/{}.vmt", path), &dst) {
            staged.push(path);
        } else {
            log::warn!("Material not found, skipping: {}", path);
        }
    }
    staged
}

/// Copy the descriptors of model materials; candidates that do not exist are
/// dropped silently since most search-dir candidates are speculative.
pub fn stage_model_materials<S: SourceDir + ?Sized>(
    materials: &[ModelMaterial],
    source: &S,
    work_dir: &WorkDir,
) -> Vec<ModelMaterial> {
    materials
        .iter()
        .filter(|material| {
            let dst = staged_descriptor(work_dir, StageKind::Model, &material.path);
            source.copy(&format!("materials/{}.vmt", material.path), &dst)
        })
        .cloned()
        .collect()
}

/// Copy every texture file referenced by a batch, named by identifier.
///
/// Returns the number of files copied.
pub fn stage_textures<S: SourceDir + ?Sized>(
    set: &TextureReferenceSet,
    source: &S,
    work_dir: &WorkDir,
    kind: StageKind,
) -> usize {
    let dir = work_dir.texture_dir(kind);
    let mut done: HashSet<&str> = HashSet::new();

    for role in TextureRole::ALL.into_iter().filter(|r| r.has_own_file()) {
        for (id, path) in set.role(role) {
            if !done.insert(id.as_str()) {
                continue;
            }
            let dst = dir.join(format!("{}.vtf", id));
            if !source.copy(&format!("materials/{}.vtf", path), &dst) {
                log::warn!("Texture not found: {}", path);
                done.remove(id.as_str());
            }
        }
    }

    done.len()
}

/// Copy model files (and their vertex/mesh companions) into the work directory.
///
/// Returns the model paths whose `.mdl` was staged.
pub fn stage_models<S: SourceDir + ?Sized>(
    models: &[String],
    source: &S,
    work_dir: &WorkDir,
) -> Vec<String> {
    let dir = work_dir.models();
    let mut staged = Vec::new();

    for model in models {
        let path = canonical_path(model);
        let id = normalize(&path);
        if !source.copy(&format!("{}.mdl", path), &dir.join(format!("{}.mdl", id))) {
            log::warn!("Model not found, skipping: {}", model);
            continue;
        }
        for ext in MODEL_COMPANIONS {
            if !source.copy(&format!("{}.{}", path, ext), &dir.join(format!("{}.{}", id, ext))) {
                log::debug!("No {} for {}", ext, path);
            }
        }
        staged.push(path);
    }

    staged
}

/// Staged model file of a model path.
pub fn staged_model(work_dir: &WorkDir, model: &str) -> PathBuf {
    work_dir.models().join(format!("{}.mdl", normalize(model)))
}

/// Read and parse staged descriptors, keyed by record identifier.
///
/// Missing staged files are skipped; malformed descriptors are errors.
pub fn load_descriptors(
    materials: &[String],
    work_dir: &WorkDir,
    kind: StageKind,
) -> Result<IndexMap<String, MaterialDescriptor>, ConvertError> {
    let mut descriptors = IndexMap::new();
    for material in materials {
        let file = staged_descriptor(work_dir, kind, material);
        if !file.is_file() {
            log::warn!("Staged descriptor missing: {}", file.display());
            continue;
        }
        let descriptor = vmt::parse_descriptor_file(&file)?;
        descriptors.insert(normalize(material), descriptor);
    }
    Ok(descriptors)
}
