//! Per-version result sets.

#[cfg(feature = "serde")]
use std::fmt;
#[cfg(feature = "serde")]
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::de::{MapAccess, Visitor};
#[cfg(feature = "serde")]
use serde::ser::SerializeMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::comparison::{ComparisonTree, FullAndFilteredComparisons};

/// An insertion-ordered map from version label to a per-version value.
///
/// Order matters: it is the column order of the report. Serialized as a map
/// whose entries keep that order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> VersionMap<T> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the number of versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no versions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a value, replacing in place if the label already exists.
    pub fn insert(&mut self, label: impl Into<String>, value: T) {
        let label = label.into();
        if let Some(slot) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            slot.1 = value;
        } else {
            self.entries.push((label, value));
        }
    }

    /// Gets the value for a label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| value)
    }

    /// Iterates over `(label, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }

    /// Iterates over labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Returns the first inserted value.
    #[must_use]
    pub fn first(&self) -> Option<(&str, &T)> {
        self.entries.first().map(|(l, v)| (l.as_str(), v))
    }
}

impl<T> Default for VersionMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for VersionMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (label, value) in iter {
            map.insert(label, value);
        }
        map
    }
}

#[cfg(feature = "serde")]
impl<T: Serialize> Serialize for VersionMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, T: Deserialize<'de>> Deserialize<'de> for VersionMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = VersionMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from version label to value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = VersionMap::new();
                while let Some((label, value)) = access.next_entry::<String, T>()? {
                    map.insert(label, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// Every comparison produced by one aggregation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VersionComparisonSet {
    /// Candidate version label to its comparison against the pinned reference.
    pub candidate_platform: VersionMap<FullAndFilteredComparisons>,
    /// Additional reference version label to its drift from the pinned reference.
    pub reference_platform: VersionMap<ComparisonTree>,
    /// Label of the pinned reference version.
    pub reference_version_label: String,
}

impl VersionComparisonSet {
    /// Creates an empty set for a pinned reference version.
    #[must_use]
    pub fn new(reference_version_label: impl Into<String>) -> Self {
        Self {
            candidate_platform: VersionMap::new(),
            reference_platform: VersionMap::new(),
            reference_version_label: reference_version_label.into(),
        }
    }

    /// Total number of report columns: candidates, the pinned reference,
    /// and the additional reference versions.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.candidate_platform.len() + 1 + self.reference_platform.len()
    }
}
