use crate::error::ConvertError;
use std::collections::HashMap;
use xxhash_rust::xxh64::xxh64;

/// Longest readable prefix kept in front of the digest.
const MAX_STEM_LEN: usize = 32;

/// Derive the record/file identifier for a resource path.
///
/// The identifier is the sanitized file stem followed by the 64-bit digest of
/// the canonical path (e.g. `brick/wall01` → `wall01_<16 hex digits>`), so two
/// resources sharing a file name in different directories stay distinct.
/// Pure and deterministic: the same path always yields the same identifier.
pub fn normalize(path: &str) -> String {
    let canonical = canonical_path(path);
    let stem = canonical.rsplit('/').next().unwrap_or_default();
    let digest = xxh64(canonical.as_bytes(), 0);
    format!("{}_{:016x}", sanitize_component(stem), digest)
}

/// Canonical form of a resource path used as digest input.
///
/// Lower-cased, forward slashes, no leading/duplicate separators and no
/// `.vtf`/`.vmt`/`.mdl` extension, so `Brick\Wall01.vtf` and `brick/wall01` agree.
pub fn canonical_path(path: &str) -> String {
    let lowered = path.trim().replace('\\', "/").to_lowercase();
    let joined = lowered
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    for ext in [".vtf", ".vmt", ".mdl"] {
        if let Some(stripped) = joined.strip_suffix(ext) {
            return stripped.to_string();
        }
    }
    joined
}

/// Check a list of source paths for identifier collisions.
///
/// Paths that are equal after canonicalization are the same resource and do
/// not collide. Returns the first collision found.
pub fn check_collisions(paths: &[&str]) -> Result<(), ConvertError> {
    let mut seen: HashMap<String, String> = HashMap::new();

    for &path in paths {
        let canonical = canonical_path(path);
        let ident = normalize(path);
        match seen.get(&ident) {
            Some(previous) if *previous != canonical => {
                return Err(ConvertError::IdentifierCollision {
                    identifier: ident,
                    path_a: previous.clone(),
                    path_b: canonical,
                });
            }
            Some(_) => {}
            None => {
                seen.insert(ident, canonical);
            }
        }
    }

    Ok(())
}

/// Sanitize a path component to `[a-z0-9_]`.
fn sanitize_component(s: &str) -> String {
    let mut result: String = s
        .chars()
        .take(MAX_STEM_LEN)
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();

    if result.is_empty() {
        result.push_str("asset");
    }

    result
}
