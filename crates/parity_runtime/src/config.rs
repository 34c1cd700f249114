//! Run manifests.
//!
//! A manifest is a TOML document describing one audit:
//!
//! ```toml
//! base_dir = "sources"
//!
//! [reference]
//! label = "1.40.0"
//! locations = ["vscode/1.40.0/vscode.d.ts"]
//!
//! [[reference_history]]
//! label = "1.39.0"
//! locations = ["vscode/1.39.0/vscode.d.ts"]
//!
//! [[candidates]]
//! label = "master"
//! locations = ["theia/master/theia.d.ts"]
//!
//! [options]
//! parallel = true
//!
//! [output]
//! json = "out/comparison.json"
//!
//! [notes]
//! "window.showMessage" = "Modal dialogs are not supported"
//!
//! [notes.Widget]
//! _note = "Rendering is delegated to the host"
//! ```
//!
//! Notes may be written as dotted keys or as nested tables; a `_note` key
//! attaches to the table's own path.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use parity_checker::CheckOptions;
use parity_engine::{AggregatorOptions, Notes, VersionSource};
use parity_foundation::{Error, ErrorKind, Result};
use serde::Deserialize;

/// Key under which a notes table stores the note of its own path.
pub const OWN_NOTE_KEY: &str = "_note";

/// One version entry of a manifest.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VersionEntry {
    /// Version label.
    pub label: String,
    /// Source locations relative to the base directory.
    pub locations: Vec<String>,
}

impl From<&VersionEntry> for VersionSource {
    fn from(entry: &VersionEntry) -> Self {
        Self::new(entry.label.clone(), entry.locations.iter().cloned())
    }
}

/// The `[options]` table.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RunOptions {
    /// Compare versions on separate threads.
    pub parallel: bool,
    /// Treat `null` and `undefined` as distinct types.
    pub strict_null_checks: bool,
    /// Recursion limit of structural checks.
    pub max_depth: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        let check = CheckOptions::default();
        Self {
            parallel: false,
            strict_null_checks: check.strict_null_checks,
            max_depth: check.max_depth,
        }
    }
}

impl RunOptions {
    /// Converts to aggregator options.
    #[must_use]
    pub fn aggregator_options(&self) -> AggregatorOptions {
        AggregatorOptions::default()
            .with_parallel(self.parallel)
            .with_check(
                CheckOptions::default()
                    .with_strict_null_checks(self.strict_null_checks)
                    .with_max_depth(self.max_depth),
            )
    }
}

/// The `[output]` table.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPaths {
    /// Where to write the comparison set as JSON.
    pub json: Option<PathBuf>,
    /// Where to write the comparison set as `MessagePack`.
    pub msgpack: Option<PathBuf>,
}

/// A parsed run manifest.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunManifest {
    /// Directory that source locations are relative to.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// The pinned reference version.
    pub reference: VersionEntry,
    /// Further reference versions, in column order.
    #[serde(default)]
    pub reference_history: Vec<VersionEntry>,
    /// Candidate versions, in column order.
    #[serde(default)]
    pub candidates: Vec<VersionEntry>,
    /// Run options.
    #[serde(default)]
    pub options: RunOptions,
    /// Output files.
    #[serde(default)]
    pub output: OutputPaths,
    /// Raw notes table.
    #[serde(default)]
    notes: toml::Table,
}

impl RunManifest {
    /// Parses and validates a manifest.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not valid TOML, does not
    /// match the manifest layout, or fails validation.
    pub fn parse_str(text: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(text).map_err(|e| Error::config(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads and parses a manifest file.
    ///
    /// A relative `base_dir` is resolved against the manifest's directory;
    /// without one, the manifest's directory is the base.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or any error of
    /// [`RunManifest::parse_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::new(ErrorKind::Io(format!(
                "failed to read manifest '{}': {e}",
                path.display()
            )))
        })?;
        let mut manifest = Self::parse_str(&text)?;
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        manifest.base_dir = Some(match manifest.base_dir.take() {
            Some(base) if base.is_absolute() => base,
            Some(base) => dir.join(base),
            None => dir.to_path_buf(),
        });
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in std::iter::once(&self.reference)
            .chain(&self.reference_history)
            .chain(&self.candidates)
        {
            if entry.label.trim().is_empty() {
                return Err(Error::config("version labels must not be empty"));
            }
            if entry.locations.is_empty() {
                return Err(Error::config(format!(
                    "version '{}' has no source locations",
                    entry.label
                )));
            }
        }
        for entry in std::iter::once(&self.reference).chain(&self.reference_history) {
            if !seen.insert(entry.label.as_str()) {
                return Err(Error::config(format!(
                    "reference version '{}' is listed twice",
                    entry.label
                )));
            }
        }
        seen.clear();
        for entry in &self.candidates {
            if !seen.insert(entry.label.as_str()) {
                return Err(Error::config(format!(
                    "candidate version '{}' is listed twice",
                    entry.label
                )));
            }
        }
        if self.options.max_depth == 0 {
            return Err(Error::config("max_depth must be at least 1"));
        }
        self.notes()?;
        Ok(())
    }

    /// Returns the directory source locations are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.base_dir.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Returns the pinned reference version.
    #[must_use]
    pub fn pinned(&self) -> VersionSource {
        VersionSource::from(&self.reference)
    }

    /// Returns the additional reference versions.
    #[must_use]
    pub fn references(&self) -> Vec<VersionSource> {
        self.reference_history.iter().map(VersionSource::from).collect()
    }

    /// Returns the candidate versions.
    #[must_use]
    pub fn candidate_versions(&self) -> Vec<VersionSource> {
        self.candidates.iter().map(VersionSource::from).collect()
    }

    /// Flattens the `[notes]` table into dotted paths.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a note is not a string.
    pub fn notes(&self) -> Result<Notes> {
        let mut notes = Notes::new();
        flatten_notes(&self.notes, "", &mut notes)?;
        Ok(notes)
    }
}

fn flatten_notes(table: &toml::Table, prefix: &str, out: &mut Notes) -> Result<()> {
    for (key, value) in table {
        let path = match (prefix.is_empty(), key.as_str()) {
            (_, OWN_NOTE_KEY) => prefix.to_string(),
            (true, _) => key.clone(),
            (false, _) => format!("{prefix}.{key}"),
        };
        match value {
            toml::Value::String(note) if !path.is_empty() => out.insert(path, note.clone()),
            toml::Value::Table(inner) => flatten_notes(inner, &path, out)?,
            _ => {
                return Err(Error::config(format!(
                    "note '{}' must be a string or a table",
                    if path.is_empty() { key } else { &path }
                )));
            }
        }
    }
    Ok(())
}
