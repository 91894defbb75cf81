//! Studio model (`.mdl`) header reader.
//!
//! Only the parts needed for material resolution are decoded: texture names,
//! material search directories and the surface property.

use crate::error::ConvertError;
use crate::model::{ModelInfo, ModelReader};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

const MAGIC: &[u8; 4] = b"IDST";
const SUPPORTED_VERSIONS: std::ops::RangeInclusive<u32> = 44..=49;

const TEXTURE_TABLE_OFFSET: u64 = 204;
const SURFACE_PROP_OFFSET: u64 = 308;
/// Size of one texture entry.
const TEXTURE_ENTRY_SIZE: u64 = 64;
/// Upper bound on table lengths; anything larger is a corrupt header.
const MAX_TABLE_LEN: u32 = 4096;

/// [`ModelReader`] for studio model files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct MdlReader;

impl ModelReader for MdlReader {
    fn read(&self, path: &Path) -> Result<ModelInfo, ConvertError> {
        let model_error = |message: String| ConvertError::ModelRead {
            path: path.to_path_buf(),
            message,
        };
        let bytes = std::fs::read(path).map_err(|e| model_error(e.to_string()))?;
        parse_mdl(&bytes).map_err(model_error)
    }
}

/// Decode the material-related header fields of a model file.
pub fn parse_mdl(bytes: &[u8]) -> Result<ModelInfo, String> {
    let mut rdr = Cursor::new(bytes);

    let mut magic = [0u8; 4];
    rdr.read_exact(&mut magic).map_err(truncated)?;
    if &magic != MAGIC {
        return Err("not a studio model".to_string());
    }
    let version = rdr.read_u32::<LittleEndian>().map_err(truncated)?;
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(format!("unsupported model version {}", version));
    }

    rdr.seek(SeekFrom::Start(TEXTURE_TABLE_OFFSET)).map_err(truncated)?;
    let texture_count = read_len(&mut rdr)?;
    let texture_offset = read_offset(&mut rdr)?;
    let dir_count = read_len(&mut rdr)?;
    let dir_offset = read_offset(&mut rdr)?;

    rdr.seek(SeekFrom::Start(SURFACE_PROP_OFFSET)).map_err(truncated)?;
    let surface_prop_offset = read_offset(&mut rdr)?;

    let mut material_names = Vec::with_capacity(texture_count as usize);
    for i in 0..u64::from(texture_count) {
        let entry = texture_offset + i * TEXTURE_ENTRY_SIZE;
        rdr.seek(SeekFrom::Start(entry)).map_err(truncated)?;
        let name_index = rdr.read_i32::<LittleEndian>().map_err(truncated)?;
        let name_at = entry
            .checked_add_signed(i64::from(name_index))
            .ok_or_else(|| "texture name offset out of range".to_string())?;
        material_names.push(read_cstring_at(bytes, name_at)?);
    }

    let mut material_dirs = Vec::with_capacity(dir_count as usize);
    for i in 0..u64::from(dir_count) {
        rdr.seek(SeekFrom::Start(dir_offset + i * 4)).map_err(truncated)?;
        let at = read_offset(&mut rdr)?;
        material_dirs.push(read_cstring_at(bytes, at)?);
    }

    let surface_prop = if surface_prop_offset == 0 {
        String::new()
    } else {
        read_cstring_at(bytes, surface_prop_offset)?
    };

    Ok(ModelInfo {
        material_names,
        material_dirs,
        surface_prop,
    })
}

fn truncated(e: std::io::Error) -> String {
    format!("truncated header: {}", e)
}

fn read_len(rdr: &mut Cursor<&[u8]>) -> Result<u32, String> {
    let value = rdr.read_i32::<LittleEndian>().map_err(truncated)?;
    u32::try_from(value)
        .ok()
        .filter(|&n| n <= MAX_TABLE_LEN)
        .ok_or_else(|| format!("bad table length {}", value))
}

fn read_offset(rdr: &mut Cursor<&[u8]>) -> Result<u64, String> {
    let value = rdr.read_i32::<LittleEndian>().map_err(truncated)?;
    u64::try_from(value).map_err(|_| format!("negative offset {}", value))
}

fn read_cstring_at(bytes: &[u8], at: u64) -> Result<String, String> {
    let start = usize::try_from(at)
        .ok()
        .filter(|&s| s < bytes.len())
        .ok_or_else(|| format!("string offset {} past end of file", at))?;
    let tail = &bytes[start..];
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| format!("unterminated string at {}", at))?;
    Ok(String::from_utf8_lossy(&tail[..end]).into_owned())
}
