use crate::staging::WorkDir;
use indexmap::IndexMap;
use std::path::PathBuf;

/// Ordered field mapping of one output record.
pub type Fields = IndexMap<String, String>;

/// Target record-shape convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum SchemaVariant {
    /// Older pipeline: materials reference `.tga` files directly.
    #[default]
    Legacy,
    /// Newer pipeline: materials reference image records (`i_*`).
    Modern,
}

/// Asset category of an output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Material,
    Image,
    XModel,
}

impl Category {
    /// Category name as used by the asset converter.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Material => "material",
            Category::Image => "image",
            Category::XModel => "xmodel",
        }
    }

    /// Name of the `.gdf` template the record is bound to.
    pub fn gdf(self) -> String {
        format!("{}.gdf", self.as_str())
    }
}

/// One `(name, category, fields)` triple handed to the serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    /// Record identifier, unique within its category for one batch.
    pub name: String,
    pub category: Category,
    /// Field name/value pairs in emission order.
    pub fields: Fields,
}

impl OutputRecord {
    pub fn new(name: impl Into<String>, category: Category, fields: Fields) -> Self {
        Self {
            name: name.into(),
            category,
            fields,
        }
    }

    /// Look up a field value.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// A parsed material: shader identifier plus its `$`-prefixed parameters.
///
/// Keys are stored lower-cased, values trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaterialDescriptor {
    pub shader: String,
    pub params: IndexMap<String, String>,
}

impl MaterialDescriptor {
    pub fn new<K, V>(shader: &str, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self {
            shader: shader.trim().to_lowercase(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.as_ref().trim().to_string()))
                .collect(),
        }
    }

    /// Whether a parameter key is present (its value is irrelevant).
    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Parameter value, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Give a model material the surface property of the model using it.
    ///
    /// A `$surfaceprop` already defined by the material wins.
    pub fn with_default_surface_prop(mut self, surface_prop: &str) -> Self {
        if !self.has("$surfaceprop") && !surface_prop.trim().is_empty() {
            self.params
                .shift_insert(0, "$surfaceprop".to_string(), surface_prop.trim().to_string());
        }
        self
    }
}

/// Configuration for one conversion batch.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Root of the source game's asset tree (contains `materials/`, `models/`).
    pub game_dir: PathBuf,
    /// Staging directory for copied source files.
    pub work_dir: WorkDir,
    /// Output directory for `.gdt`/`.bat` artifacts.
    pub out_dir: PathBuf,
    pub schema: SchemaVariant,
}

/// Records produced by a material conversion batch.
#[derive(Debug, Clone, Default)]
pub struct MaterialBatch {
    pub materials: Vec<OutputRecord>,
    /// Image records (modern schema only).
    pub images: Vec<OutputRecord>,
}

/// Records produced by a model conversion batch.
#[derive(Debug, Clone, Default)]
pub struct ModelBatch {
    /// Canonical paths of the models that were staged.
    pub models: Vec<String>,
    /// One `xmodel` record per staged model.
    pub records: Vec<OutputRecord>,
}

impl MaterialBatch {
    /// All records, materials first.
    pub fn into_records(self) -> Vec<OutputRecord> {
        let mut records = self.materials;
        records.extend(self.images);
        records
    }
}
