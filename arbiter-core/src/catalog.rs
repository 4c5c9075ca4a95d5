//! Algorithm Catalog: on-disk enumeration of candidate identifiers.
//!
//! The catalog root holds one sub-directory per [`AlgorithmCategory`], each
//! containing one `<identifier>.params` descriptor file per algorithm.

use crate::error::{ArbiterError, Result};
use crate::types::{AlgorithmCategory, AlgorithmDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Extension of algorithm descriptor files.
pub const PARAMS_EXTENSION: &str = "params";

/// Name of the catalog directory inside a distribution root.
pub const PARAMS_DIR: &str = "params";

/// Restricts catalog enumeration to its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.0.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a comma-separated list, ignoring blanks.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A catalog rooted at a `params` directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn partition_dir(&self, category: AlgorithmCategory) -> PathBuf {
        self.root.join(category.partition())
    }

    /// Candidates for `category`, sorted by identifier.
    ///
    /// Fails with [`ArbiterError::CatalogMissing`] when the partition is not a
    /// directory; that indicates a broken installation rather than a problem
    /// with any single algorithm.
    pub fn list_candidates(
        &self,
        category: AlgorithmCategory,
        allow_list: Option<&AllowList>,
    ) -> Result<Vec<AlgorithmDescriptor>> {
        let dir = self.partition_dir(category);
        if !dir.is_dir() {
            return Err(ArbiterError::CatalogMissing { path: dir });
        }

        let mut identifiers = BTreeSet::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if let Some(identifier) = params_identifier(&entry.file_name().to_string_lossy()) {
                identifiers.insert(identifier.to_string());
            }
        }

        let candidates: Vec<AlgorithmDescriptor> = identifiers
            .into_iter()
            .filter(|id| allow_list.is_none_or(|allowed| allowed.contains(id)))
            .map(|id| {
                let path = dir.join(format!("{}.{}", id, PARAMS_EXTENSION));
                AlgorithmDescriptor::new(id, category).with_params_path(path)
            })
            .collect();

        tracing::debug!(
            %category,
            dir = %dir.display(),
            count = candidates.len(),
            "Listed catalog candidates"
        );
        Ok(candidates)
    }
}

/// Identifier for a descriptor file name, or `None` for hidden files and
/// files with another extension.
pub fn params_identifier(file_name: &str) -> Option<&str> {
    if file_name.starts_with('.') {
        return None;
    }
    let identifier = file_name.strip_suffix(PARAMS_EXTENSION)?.strip_suffix('.')?;
    (!identifier.is_empty()).then_some(identifier)
}

/// Result of searching for a distribution root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionLookup {
    pub root: PathBuf,
    /// `false` when no directory with a `params/` child was found and
    /// `root` is the `.` fallback.
    pub detected: bool,
}

impl DistributionLookup {
    pub fn params_dir(&self) -> PathBuf {
        self.root.join(PARAMS_DIR)
    }
}

/// Walk up from `start` looking for a directory containing `params/`.
///
/// Callers decide whether and how often to warn when `detected` is false.
pub fn locate_distribution(start: &Path) -> DistributionLookup {
    let mut dir = Some(start);
    while let Some(current) = dir {
        if current.join(PARAMS_DIR).is_dir() {
            return DistributionLookup {
                root: current.to_path_buf(),
                detected: true,
            };
        }
        dir = current.parent();
    }
    DistributionLookup {
        root: PathBuf::from("."),
        detected: false,
    }
}
