//! Multi-version aggregation.
//!
//! An [`Aggregator`] runs one audit: it loads the pinned reference version,
//! every additional reference version, and every candidate version through a
//! [`SourceLoader`], then
//!
//! - compares each candidate with the pinned reference inside one fresh
//!   [`Session`] holding both versions' sources, and
//! - measures each additional reference version's drift from the pinned one
//!   in a session of its own.
//!
//! Versions are independent, so their work may run on scoped threads; the
//! results are joined in input order before anything is assembled.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use parity_checker::{CheckOptions, Session, SourceId, build_tree};
use parity_foundation::{
    ComparisonTree, Error, ErrorKind, FullAndFilteredComparisons, Result, VersionComparisonSet,
};
use parity_language::{DeclarationFile, parse_file};

use crate::compare::compare;
use crate::presence::{TreeInSession, drift};

// =============================================================================
// Sources
// =============================================================================

/// Reads declaration source text by location.
pub trait SourceLoader: Send + Sync {
    /// Returns the text stored at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::SourceLoad`] if the source cannot be read.
    fn load(&self, location: &str) -> Result<String>;
}

/// Loads sources from files relative to a base directory.
#[derive(Clone, Debug, Default)]
pub struct FsLoader {
    base: PathBuf,
}

impl FsLoader {
    /// Creates a loader resolving locations against `base`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl SourceLoader for FsLoader {
    fn load(&self, location: &str) -> Result<String> {
        let path = self.base.join(location);
        std::fs::read_to_string(&path)
            .map_err(|e| Error::source_load(path.display().to_string(), e.to_string()))
    }
}

/// Serves sources from memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    sources: HashMap<String, String>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source.
    #[must_use]
    pub fn with_source(mut self, location: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(location, text);
        self
    }

    /// Adds or replaces a source.
    pub fn insert(&mut self, location: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(location.into(), text.into());
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, location: &str) -> Result<String> {
        self.sources
            .get(location)
            .cloned()
            .ok_or_else(|| Error::source_load(location, "no such source"))
    }
}

/// One version of an API surface: a label and its ordered source locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionSource {
    /// Version label, used as the report column header.
    pub label: String,
    /// Declaration source locations, in load order.
    pub locations: Vec<String>,
}

impl VersionSource {
    /// Creates a version with the given sources.
    #[must_use]
    pub fn new<L: Into<String>>(
        label: impl Into<String>,
        locations: impl IntoIterator<Item = L>,
    ) -> Self {
        Self {
            label: label.into(),
            locations: locations.into_iter().map(Into::into).collect(),
        }
    }
}

/// The parsed sources of one version.
#[derive(Clone, Debug)]
struct LoadedVersion {
    label: String,
    files: Vec<Arc<DeclarationFile>>,
}

impl LoadedVersion {
    fn add_to(&self, session: &mut Session) -> Vec<SourceId> {
        self.files
            .iter()
            .map(|file| session.add_source(Arc::clone(file)))
            .collect()
    }
}

// =============================================================================
// Options
// =============================================================================

/// Settings for one aggregation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregatorOptions {
    /// Run per-version work on separate threads.
    pub parallel: bool,
    /// Settings for every session the run creates.
    pub check: CheckOptions,
}

impl AggregatorOptions {
    /// Sets parallel execution.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the session options.
    #[must_use]
    pub const fn with_check(mut self, check: CheckOptions) -> Self {
        self.check = check;
        self
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Runs a full audit over a version matrix.
pub struct Aggregator<'l> {
    loader: &'l dyn SourceLoader,
    options: AggregatorOptions,
}

impl<'l> Aggregator<'l> {
    /// Creates an aggregator reading sources through `loader`.
    #[must_use]
    pub fn new(loader: &'l dyn SourceLoader) -> Self {
        Self {
            loader,
            options: AggregatorOptions::default(),
        }
    }

    /// Sets the run options.
    #[must_use]
    pub const fn with_options(mut self, options: AggregatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the run options.
    #[must_use]
    pub const fn options(&self) -> AggregatorOptions {
        self.options
    }

    /// Compares every candidate version with `pinned` and measures the drift
    /// of every version in `references` from it.
    ///
    /// Candidate columns and reference columns keep their input order.
    ///
    /// # Errors
    ///
    /// Returns the first failure in input order, tagged with the version
    /// label. A version that fails contributes nothing.
    pub fn run(
        &self,
        pinned: &VersionSource,
        references: &[VersionSource],
        candidates: &[VersionSource],
    ) -> Result<VersionComparisonSet> {
        let started = Instant::now();
        tracing::info!(
            component = module_path!(),
            op = "aggregate",
            event = "start",
            pinned = %pinned.label,
            references = references.len(),
            candidates = candidates.len(),
            parallel = self.options.parallel,
        );

        let result = self.run_inner(pinned, references, candidates);
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(set) => tracing::info!(
                component = module_path!(),
                op = "aggregate",
                event = "end",
                duration_ms,
                columns = set.column_count(),
            ),
            Err(err) => tracing::error!(
                component = module_path!(),
                op = "aggregate",
                event = "end_error",
                duration_ms,
                error = %err,
            ),
        }
        result
    }

    fn run_inner(
        &self,
        pinned: &VersionSource,
        references: &[VersionSource],
        candidates: &[VersionSource],
    ) -> Result<VersionComparisonSet> {
        let pinned = self.load_version(pinned)?;
        let mut pinned_session = Session::new(self.options.check);
        let pinned_ids = pinned.add_to(&mut pinned_session);
        let pinned_tree = build_tree(&mut pinned_session, &pinned_ids)
            .map_err(|e| e.in_version(pinned.label.clone()))?;

        let candidate_results = self.for_each(candidates, |version| {
            self.compare_candidate(&pinned, version)
        })?;
        let pinned_view = TreeInSession::new(&pinned_tree, &pinned_session);
        let reference_results = self.for_each(references, |version| {
            self.reference_drift(pinned_view, version)
        })?;

        let mut set = VersionComparisonSet::new(pinned.label.clone());
        for (version, result) in candidates.iter().zip(candidate_results) {
            set.candidate_platform.insert(version.label.clone(), result);
        }
        for (version, result) in references.iter().zip(reference_results) {
            set.reference_platform.insert(version.label.clone(), result);
        }
        Ok(set)
    }

    /// Applies `work` to every version, possibly in parallel, returning the
    /// results in input order or the first error in input order.
    fn for_each<T, F>(&self, versions: &[VersionSource], work: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&VersionSource) -> Result<T> + Sync,
    {
        if !self.options.parallel || versions.len() < 2 {
            return versions.iter().map(&work).collect();
        }

        let work = &work;
        std::thread::scope(|scope| {
            let handles: Vec<_> = versions
                .iter()
                .map(|version| scope.spawn(move || work(version)))
                .collect();
            let joined: Vec<Result<T>> = handles
                .into_iter()
                .zip(versions)
                .map(|(handle, version)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(Error::new(ErrorKind::Internal(format!(
                            "worker for version {} panicked",
                            version.label
                        ))))
                    })
                })
                .collect();
            joined.into_iter().collect()
        })
    }

    fn load_version(&self, version: &VersionSource) -> Result<LoadedVersion> {
        if version.locations.is_empty() {
            return Err(
                Error::config("version has no source locations").in_version(version.label.clone()),
            );
        }
        let files = version
            .locations
            .iter()
            .map(|location| {
                let text = self.loader.load(location)?;
                parse_file(location.clone(), &text).map(Arc::new)
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.in_version(version.label.clone()))?;
        tracing::debug!(
            version = %version.label,
            sources = files.len(),
            "Loaded version sources"
        );
        Ok(LoadedVersion {
            label: version.label.clone(),
            files,
        })
    }

    fn compare_candidate(
        &self,
        pinned: &LoadedVersion,
        version: &VersionSource,
    ) -> Result<FullAndFilteredComparisons> {
        let started = Instant::now();
        let candidate = self.load_version(version)?;

        let mut session = Session::new(self.options.check);
        let reference_ids = pinned.add_to(&mut session);
        let candidate_ids = candidate.add_to(&mut session);
        let result = build_tree(&mut session, &reference_ids)
            .and_then(|reference| {
                let candidate_tree = build_tree(&mut session, &candidate_ids)?;
                compare(&mut session, &reference, &candidate_tree)
            })
            .map_err(|e| e.in_version(version.label.clone()))?;

        tracing::info!(
            component = module_path!(),
            op = "compare_candidate",
            event = "end",
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            version = %version.label,
            imperfect = result.filtered.leaves().len(),
        );
        Ok(result)
    }

    fn reference_drift(
        &self,
        pinned: TreeInSession<'_>,
        version: &VersionSource,
    ) -> Result<ComparisonTree> {
        let started = Instant::now();
        let loaded = self.load_version(version)?;
        let mut session = Session::new(self.options.check);
        let ids = loaded.add_to(&mut session);
        let tree =
            build_tree(&mut session, &ids).map_err(|e| e.in_version(version.label.clone()))?;
        let result = drift(pinned, TreeInSession::new(&tree, &session));

        tracing::info!(
            component = module_path!(),
            op = "reference_drift",
            event = "end",
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            version = %version.label,
        );
        Ok(result)
    }
}
