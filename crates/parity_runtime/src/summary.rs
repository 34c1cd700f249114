//! Plain-text summaries of a report.

use std::fmt;

use parity_engine::{ColumnKind, Report, RowKind};
use parity_foundation::SupportLevel;

/// Level counts of one candidate column over all symbol rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnTally {
    /// Version label.
    pub label: String,
    /// Count per level, indexed by ordinal.
    pub counts: [usize; 4],
}

impl ColumnTally {
    /// Returns the count of one level.
    #[must_use]
    pub const fn count(&self, level: SupportLevel) -> usize {
        self.counts[level.ordinal() as usize]
    }

    /// Returns the number of symbols counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Summary of a report: per-candidate tallies and, optionally, the rows
/// with problems.
#[derive(Clone, Debug)]
pub struct Summary<'r> {
    report: &'r Report,
    tallies: Vec<ColumnTally>,
    list_problems: bool,
}

impl<'r> Summary<'r> {
    /// Tallies the simple rows of `report`.
    #[must_use]
    pub fn new(report: &'r Report) -> Self {
        let mut tallies: Vec<ColumnTally> = report
            .columns()
            .iter()
            .filter(|c| c.kind == ColumnKind::Candidate)
            .map(|c| ColumnTally {
                label: c.label.clone(),
                counts: [0; 4],
            })
            .collect();
        for row in report.rows().filter(|r| r.kind == RowKind::Simple) {
            let candidate_cells = report
                .columns()
                .iter()
                .zip(&row.cells)
                .filter(|(c, _)| c.kind == ColumnKind::Candidate)
                .map(|(_, level)| *level);
            for (tally, level) in tallies.iter_mut().zip(candidate_cells) {
                tally.counts[level.ordinal() as usize] += 1;
            }
        }
        Self {
            report,
            tallies,
            list_problems: false,
        }
    }

    /// Also lists every row with a problem.
    #[must_use]
    pub const fn with_problems(mut self, list: bool) -> Self {
        self.list_problems = list;
        self
    }

    /// Returns the per-candidate tallies in column order.
    #[must_use]
    pub fn tallies(&self) -> &[ColumnTally] {
        &self.tallies
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pinned = self
            .report
            .columns()
            .iter()
            .find(|c| c.kind == ColumnKind::PinnedReference)
            .map_or("?", |c| c.label.as_str());
        writeln!(f, "Reference {pinned}")?;
        for tally in &self.tallies {
            write!(f, "  {:<16} {:>5} symbols:", tally.label, tally.total())?;
            for level in SupportLevel::ALL.iter().rev() {
                write!(f, " {} {}", tally.count(*level), level.label())?;
            }
            writeln!(f)?;
        }

        if self.list_problems {
            let filtered = self.report.filtered();
            for section in filtered.sections() {
                writeln!(f, "{}", section.title())?;
                for row in &section.rows {
                    let cells: Vec<String> = row.cells.iter().map(ToString::to_string).collect();
                    write!(f, "  {:<40} {}", row.path.join("."), cells.join(" | "))?;
                    if let Some(note) = &row.note {
                        write!(f, "  ({note})")?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}
