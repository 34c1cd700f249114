//! Report rows.
//!
//! [`Report::build`] turns a [`VersionComparisonSet`] into the table a
//! renderer draws: one column per candidate version, the pinned reference
//! column, then one column per additional reference version. Rows are
//! grouped in sections; the top level is the `root` section and every
//! namespace (a container whose name starts with a lowercase letter) opens
//! a section of its own. Classes and interfaces produce a complex row
//! summarizing their direct members, followed by one simple row per member.

use parity_foundation::{
    ColumnAccumulator, ComparisonNode, ComparisonTree, SupportLevel, VersionComparisonSet,
};

use crate::notes::{NoteLookup, ROOT_SEGMENT};

/// Which platform a column reports on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// A candidate version compared with the pinned reference.
    Candidate,
    /// The pinned reference version itself.
    PinnedReference,
    /// Another reference version, by drift from the pinned one.
    Reference,
}

/// A report column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Version label.
    pub label: String,
    /// Platform of the version.
    pub kind: ColumnKind,
}

/// Whether a row stands for a single symbol or a whole type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// A leaf symbol.
    Simple,
    /// A class or interface, aggregated over its direct members.
    Complex,
}

/// One report row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Path of the symbol from the report root.
    pub path: Vec<String>,
    /// Row kind.
    pub kind: RowKind,
    /// One level per column, in column order.
    pub cells: Vec<SupportLevel>,
    /// Note attached to the path.
    pub note: Option<String>,
}

impl Row {
    /// Returns the last path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// Returns true if any candidate column is not `Full`.
    #[must_use]
    pub fn has_problems(&self, columns: &[Column]) -> bool {
        columns
            .iter()
            .zip(&self.cells)
            .any(|(column, level)| column.kind == ColumnKind::Candidate && !level.is_full())
    }
}

/// A titled group of rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Path of the namespace, empty for the root section.
    pub path: Vec<String>,
    /// Rows in traversal order.
    pub rows: Vec<Row>,
}

impl Section {
    /// Returns the display title: `root` or `namespace/<name>`.
    #[must_use]
    pub fn title(&self) -> String {
        match self.path.last() {
            None => ROOT_SEGMENT.to_string(),
            Some(name) => format!("namespace/{name}"),
        }
    }
}

/// The complete row model of one aggregation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    columns: Vec<Column>,
    sections: Vec<Section>,
}

impl Report {
    /// Builds the report of `set`, attaching notes from `notes`.
    ///
    /// The row layout follows the first candidate's `full` tree, or the
    /// first reference drift tree when there are no candidates; all of them
    /// share the pinned reference's shape.
    #[must_use]
    pub fn build(set: &VersionComparisonSet, notes: &dyn NoteLookup) -> Self {
        let mut columns: Vec<Column> = set
            .candidate_platform
            .labels()
            .map(|label| Column {
                label: label.to_string(),
                kind: ColumnKind::Candidate,
            })
            .collect();
        columns.push(Column {
            label: set.reference_version_label.clone(),
            kind: ColumnKind::PinnedReference,
        });
        columns.extend(set.reference_platform.labels().map(|label| Column {
            label: label.to_string(),
            kind: ColumnKind::Reference,
        }));

        let layout = set
            .candidate_platform
            .values()
            .map(|pair| &pair.full)
            .next()
            .or_else(|| set.reference_platform.values().next());

        let mut builder = Builder {
            set,
            notes,
            sections: vec![Section {
                path: Vec::new(),
                rows: Vec::new(),
            }],
        };
        if let Some(tree) = layout {
            builder.traverse(tree, 0, &mut Vec::new());
        }

        let report = Self {
            columns,
            sections: builder.sections,
        };
        tracing::debug!(
            columns = report.columns.len(),
            sections = report.sections.len(),
            rows = report.row_count(),
            "Built report"
        );
        report
    }

    /// Returns the columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the sections in display order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Counts rows over all sections.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }

    /// Returns true if any row has a problem.
    #[must_use]
    pub fn has_problems(&self) -> bool {
        self.rows().any(|row| row.has_problems(&self.columns))
    }

    /// Iterates over every row in display order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.sections.iter().flat_map(|s| s.rows.iter())
    }

    /// Returns the report reduced to rows with problems, dropping sections
    /// left empty.
    #[must_use]
    pub fn filtered(&self) -> Self {
        let sections = self
            .sections
            .iter()
            .filter_map(|section| {
                let rows: Vec<Row> = section
                    .rows
                    .iter()
                    .filter(|row| row.has_problems(&self.columns))
                    .cloned()
                    .collect();
                (!rows.is_empty()).then(|| Section {
                    path: section.path.clone(),
                    rows,
                })
            })
            .collect();
        Self {
            columns: self.columns.clone(),
            sections,
        }
    }
}

// =============================================================================
// Traversal
// =============================================================================

struct Builder<'a> {
    set: &'a VersionComparisonSet,
    notes: &'a dyn NoteLookup,
    sections: Vec<Section>,
}

impl Builder<'_> {
    /// Emits the rows of `tree` into section `section` and returns the
    /// per-column fold of its direct leaves.
    fn traverse(
        &mut self,
        tree: &ComparisonTree,
        section: usize,
        path: &mut Vec<String>,
    ) -> Vec<ColumnAccumulator> {
        let mut columns = vec![ColumnAccumulator::new(); self.set.column_count()];
        for (key, node) in tree.iter() {
            path.push(key.clone());
            match node {
                ComparisonNode::Tree(inner) if is_namespace(key) => {
                    self.sections.push(Section {
                        path: path.clone(),
                        rows: Vec::new(),
                    });
                    let index = self.sections.len() - 1;
                    self.traverse(inner, index, path);
                }
                ComparisonNode::Tree(inner) => {
                    let slot = self.sections[section].rows.len();
                    self.push_row(section, path, RowKind::Complex, Vec::new());
                    let folded = self.traverse(inner, section, path);
                    let cells = folded
                        .iter()
                        .map(|acc| acc.value_or(SupportLevel::Full))
                        .collect();
                    self.sections[section].rows[slot].cells = cells;
                }
                ComparisonNode::Level(_) => {
                    let cells = self.simple_cells(path);
                    for (acc, level) in columns.iter_mut().zip(&cells) {
                        acc.fold(*level);
                    }
                    self.push_row(section, path, RowKind::Simple, cells);
                }
            }
            path.pop();
        }
        columns
    }

    fn push_row(&mut self, section: usize, path: &[String], kind: RowKind, cells: Vec<SupportLevel>) {
        let note = self.notes.note(path).map(ToString::to_string);
        self.sections[section].rows.push(Row {
            path: path.to_vec(),
            kind,
            cells,
            note,
        });
    }

    fn simple_cells(&self, path: &[String]) -> Vec<SupportLevel> {
        let candidates = self
            .set
            .candidate_platform
            .values()
            .map(|pair| level_in(&pair.full, path));
        let references = self
            .set
            .reference_platform
            .values()
            .map(|tree| level_in(tree, path));
        candidates
            .chain(std::iter::once(SupportLevel::Full))
            .chain(references)
            .collect()
    }
}

/// Level at `path`; a missing entry is `None` and a container where a leaf
/// was expected is `Partial`.
fn level_in(tree: &ComparisonTree, path: &[String]) -> SupportLevel {
    match tree.lookup(path) {
        Some(ComparisonNode::Level(level)) => *level,
        Some(ComparisonNode::Tree(_)) => SupportLevel::Partial,
        None => SupportLevel::None,
    }
}

fn is_namespace(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_lowercase)
}
