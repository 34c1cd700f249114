//! Comparison set serialization.
//!
//! Results are written as `MessagePack` for machine consumers and as JSON
//! for renderers. Support levels serialize as their ordinals
//! (`None = 0` through `Full = 3`) and trees as nested objects keyed by
//! symbol name.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use parity_foundation::{Error, ErrorKind, Result, VersionComparisonSet};

fn serialization_error(e: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::Serialization(e.to_string()))
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::Io(format!(
        "failed to {action} '{}': {e}",
        path.display()
    )))
}

/// Serializes a comparison set to `MessagePack` bytes.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_msgpack(set: &VersionComparisonSet) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(set).map_err(serialization_error)
}

/// Deserializes a comparison set from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_msgpack(bytes: &[u8]) -> Result<VersionComparisonSet> {
    rmp_serde::from_slice(bytes).map_err(serialization_error)
}

/// Serializes a comparison set to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(set: &VersionComparisonSet) -> Result<String> {
    serde_json::to_string_pretty(set).map_err(serialization_error)
}

/// Deserializes a comparison set from JSON.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_json(text: &str) -> Result<VersionComparisonSet> {
    serde_json::from_str(text).map_err(serialization_error)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_error("create directory", dir, &e))?;
    }
    let file = File::create(path).map_err(|e| io_error("create file", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .map_err(|e| io_error("write to file", path, &e))?;
    writer
        .flush()
        .map_err(|e| io_error("flush file", path, &e))?;
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| io_error("open file", path, &e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read file", path, &e))?;
    Ok(bytes)
}

/// Writes a comparison set to a `MessagePack` file, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_msgpack<P: AsRef<Path>>(set: &VersionComparisonSet, path: P) -> Result<()> {
    write_file(path.as_ref(), &to_msgpack(set)?)
}

/// Writes a comparison set to a JSON file, creating parent directories as
/// needed.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_json<P: AsRef<Path>>(set: &VersionComparisonSet, path: P) -> Result<()> {
    write_file(path.as_ref(), to_json(set)?.as_bytes())
}

/// Loads a comparison set from a `MessagePack` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialization fails.
pub fn load_msgpack<P: AsRef<Path>>(path: P) -> Result<VersionComparisonSet> {
    from_msgpack(&read_file(path.as_ref())?)
}

/// Loads a comparison set from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialization fails.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<VersionComparisonSet> {
    let bytes = read_file(path.as_ref())?;
    let text = String::from_utf8(bytes).map_err(serialization_error)?;
    from_json(&text)
}

#[cfg(test)]
mod tests {
    use parity_foundation::{ComparisonTree, FullAndFilteredComparisons, SupportLevel};

    use super::*;

    fn sample() -> VersionComparisonSet {
        let widget: ComparisonTree = [
            ("dispose", SupportLevel::None),
            ("render", SupportLevel::Full),
        ]
        .into_iter()
        .collect();
        let mut full = ComparisonTree::new();
        full.insert("Widget", widget);
        full.insert("version", SupportLevel::Stubbed);

        let mut set = VersionComparisonSet::new("1.40.0");
        set.candidate_platform
            .insert("master", FullAndFilteredComparisons::from_full(full.clone()));
        set.reference_platform.insert("1.39.0", full);
        set
    }

    #[test]
    fn msgpack_roundtrip() {
        let set = sample();
        let restored = from_msgpack(&to_msgpack(&set).unwrap()).unwrap();
        assert_eq!(restored, set);
    }

    #[test]
    fn json_uses_ordinals_and_nested_objects() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let full = &value["candidate_platform"]["master"]["full"];
        assert_eq!(full["Widget"]["dispose"], 0);
        assert_eq!(full["Widget"]["render"], 3);
        assert_eq!(full["version"], 1);
        assert_eq!(value["reference_version_label"], "1.40.0");
    }

    #[test]
    fn json_roundtrip_preserves_column_order() {
        let mut set = sample();
        set.candidate_platform
            .insert("0.9", FullAndFilteredComparisons::default());
        let restored = from_json(&to_json(&set).unwrap()).unwrap();
        assert_eq!(
            restored.candidate_platform.labels().collect::<Vec<_>>(),
            vec!["master", "0.9"]
        );
    }

    #[test]
    fn invalid_ordinal_is_rejected() {
        let err = from_json(
            r#"{"candidate_platform":{},"reference_platform":{"x":{"a":7}},"reference_version_label":"r"}"#,
        )
        .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Serialization(_)));
    }

    #[test]
    fn file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("parity_serialize_{}", std::process::id()));
        let json = dir.join("nested/set.json");
        let msgpack = dir.join("set.msgpack");

        save_json(&sample(), &json).unwrap();
        save_msgpack(&sample(), &msgpack).unwrap();
        assert_eq!(load_json(&json).unwrap(), sample());
        assert_eq!(load_msgpack(&msgpack).unwrap(), sample());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_nonexistent_file_fails() {
        assert!(load_msgpack("/nonexistent/path/set.msgpack").is_err());
    }
}
