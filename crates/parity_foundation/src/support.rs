//! Support levels and the column merge fold.
//!
//! A [`SupportLevel`] classifies one reference symbol against one candidate
//! version. [`ColumnAccumulator`] folds many of them into the aggregate shown
//! for a container row.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How well a candidate supports a reference symbol.
///
/// Ordered `None < Stubbed < Partial < Full`; the ordinal values are part of
/// the serialized format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SupportLevel {
    /// The symbol is missing.
    None = 0,
    /// The symbol exists but is documented as an intentional stub.
    Stubbed = 1,
    /// The symbol exists with an incompatible shape.
    Partial = 2,
    /// The symbol exists with a compatible shape.
    Full = 3,
}

impl SupportLevel {
    /// All levels in ascending order.
    pub const ALL: [SupportLevel; 4] = [Self::None, Self::Stubbed, Self::Partial, Self::Full];

    /// Returns the ordinal value of this level.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Returns the level for an ordinal value.
    #[must_use]
    pub const fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Stubbed),
            2 => Some(Self::Partial),
            3 => Some(Self::Full),
            _ => None,
        }
    }

    /// Returns true for [`SupportLevel::Full`].
    #[must_use]
    pub const fn is_full(self) -> bool {
        matches!(self, Self::Full)
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Unsupported",
            Self::Stubbed => "Stubbed",
            Self::Partial => "Partial",
            Self::Full => "Supported",
        }
    }
}

impl fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "serde")]
impl Serialize for SupportLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.ordinal())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SupportLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::from_ordinal(value).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid support level ordinal: {value}"))
        })
    }
}

// =============================================================================
// Column Accumulator
// =============================================================================

/// Aggregate of the leaf levels folded into one report column.
///
/// The fold is order-dependent: folding `None` then `Full` yields `Full`,
/// folding `Full` then `None` yields `Partial`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnAccumulator {
    value: Option<SupportLevel>,
}

impl ColumnAccumulator {
    /// Creates an unset accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Folds one level into the accumulator.
    pub fn fold(&mut self, incoming: SupportLevel) {
        self.value = Some(match self.value {
            None => incoming,
            Some(current) if current == incoming => current,
            Some(SupportLevel::Full) => SupportLevel::Partial,
            Some(current) => current.max(incoming),
        });
    }

    /// Folds every level of an iterator, in order.
    pub fn fold_all(&mut self, levels: impl IntoIterator<Item = SupportLevel>) {
        for level in levels {
            self.fold(level);
        }
    }

    /// Returns the accumulated level, or `None` if nothing was folded.
    #[must_use]
    pub const fn value(&self) -> Option<SupportLevel> {
        self.value
    }

    /// Returns the accumulated level, treating an unset column as `default`.
    #[must_use]
    pub fn value_or(&self, default: SupportLevel) -> SupportLevel {
        self.value.unwrap_or(default)
    }
}

impl FromIterator<SupportLevel> for ColumnAccumulator {
    fn from_iter<I: IntoIterator<Item = SupportLevel>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.fold_all(iter);
        acc
    }
}
