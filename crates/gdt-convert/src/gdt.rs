use crate::error::ConvertError;
use crate::types::OutputRecord;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Escape a value for a quoted GDT string.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// An ordered set of records rendered as one asset-database file.
#[derive(Debug, Clone, Default)]
pub struct Gdt {
    records: Vec<OutputRecord>,
}

impl Gdt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: OutputRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the `.gdt` text.
    pub fn to_gdt_string(&self) -> String {
        let mut out = String::from("{\n");
        for record in &self.records {
            out.push_str(&format!(
                "\t\"{}\" ( \"{}\" )\n\t{{\n",
                escape(&record.name),
                record.category.gdf()
            ));
            for (key, value) in &record.fields {
                out.push_str(&format!("\t\t\"{}\" \"{}\"\n", escape(key), escape(value)));
            }
            out.push_str("\t}\n");
        }
        out.push_str("}\n");
        out
    }

    /// Render the companion batch script converting every record.
    pub fn to_bat_string(&self) -> String {
        let mut out = String::from("@echo off\r\ncd ..\\bin\r\n");
        for record in &self.records {
            out.push_str(&format!(
                "converter -nopause -single \"{}\" \"{}\"\r\n",
                record.category.as_str(),
                record.name
            ));
        }
        out
    }

    /// Write the `.gdt` file.
    pub fn write_gdt(&self, path: &Path) -> Result<(), ConvertError> {
        let mut file = fs::File::create(path)?;
        file.write_all(self.to_gdt_string().as_bytes())?;
        Ok(())
    }

    /// Write the batch script.
    pub fn write_bat(&self, path: &Path) -> Result<(), ConvertError> {
        let mut file = fs::File::create(path)?;
        file.write_all(self.to_bat_string().as_bytes())?;
        Ok(())
    }
}

impl FromIterator<OutputRecord> for Gdt {
    fn from_iter<I: IntoIterator<Item = OutputRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<OutputRecord> for Gdt {
    fn extend<I: IntoIterator<Item = OutputRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}
