//! Executing a run manifest.

use std::time::Instant;

use parity_engine::{Aggregator, FsLoader, Report, SourceLoader};
use parity_foundation::{Result, VersionComparisonSet};

use crate::config::RunManifest;
use crate::serialize;

/// Everything one run produced.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// Per-version comparison trees.
    pub set: VersionComparisonSet,
    /// Row model built from `set` and the manifest's notes.
    pub report: Report,
}

/// Runs a manifest, reading sources from its base directory.
///
/// # Errors
///
/// Returns the first load, parse, or configuration failure.
pub fn run_manifest(manifest: &RunManifest) -> Result<RunOutcome> {
    let loader = FsLoader::new(manifest.base_dir());
    run_with_loader(manifest, &loader)
}

/// Runs a manifest with sources from `loader`.
///
/// # Errors
///
/// Returns the first load, parse, or configuration failure.
pub fn run_with_loader(manifest: &RunManifest, loader: &dyn SourceLoader) -> Result<RunOutcome> {
    let started = Instant::now();
    let notes = manifest.notes()?;
    let set = Aggregator::new(loader)
        .with_options(manifest.options.aggregator_options())
        .run(
            &manifest.pinned(),
            &manifest.references(),
            &manifest.candidate_versions(),
        )?;
    let report = Report::build(&set, &notes);
    tracing::info!(
        component = module_path!(),
        op = "run_manifest",
        event = "end",
        duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        rows = report.row_count(),
        problems = report.has_problems(),
    );
    Ok(RunOutcome { set, report })
}

/// Writes the outputs named in the manifest.
///
/// # Errors
///
/// Returns an error if a file cannot be written.
pub fn write_outputs(manifest: &RunManifest, outcome: &RunOutcome) -> Result<()> {
    if let Some(path) = &manifest.output.json {
        let path = manifest.base_dir().join(path);
        serialize::save_json(&outcome.set, &path)?;
        tracing::info!(path = %path.display(), "Wrote JSON comparison set");
    }
    if let Some(path) = &manifest.output.msgpack {
        let path = manifest.base_dir().join(path);
        serialize::save_msgpack(&outcome.set, &path)?;
        tracing::info!(path = %path.display(), "Wrote MessagePack comparison set");
    }
    Ok(())
}
