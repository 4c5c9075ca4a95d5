//! Shared types: algorithm categories, kinds and descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Ordered option tokens (flag/value pairs) handed to an algorithm before
/// its capabilities are queried.
pub type OptionVector = Vec<String>;

/// The catalog partition an algorithm is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmCategory {
    BaseClassifier,
    MetaClassifier,
    EnsembleClassifier,
    BaseFilter,
    MetaFilter,
    AttributeSearch,
    AttributeEvaluator,
}

impl AlgorithmCategory {
    pub const ALL: [AlgorithmCategory; 7] = [
        Self::BaseClassifier,
        Self::MetaClassifier,
        Self::EnsembleClassifier,
        Self::BaseFilter,
        Self::MetaFilter,
        Self::AttributeSearch,
        Self::AttributeEvaluator,
    ];

    /// Directory of this category's descriptor files, relative to the
    /// catalog root.
    pub fn partition(&self) -> PathBuf {
        match self {
            Self::BaseClassifier => PathBuf::from("base"),
            Self::MetaClassifier => PathBuf::from("meta"),
            Self::EnsembleClassifier => PathBuf::from("ensemble"),
            Self::BaseFilter => PathBuf::from("baseFilters"),
            Self::MetaFilter => PathBuf::from("metaFilters"),
            Self::AttributeSearch => Path::new("attribselection").join("search"),
            Self::AttributeEvaluator => Path::new("attribselection").join("eval"),
        }
    }

    /// The kind of implementation candidates in this category must resolve to.
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Self::BaseClassifier | Self::MetaClassifier | Self::EnsembleClassifier => {
                AlgorithmKind::Classifier
            }
            Self::BaseFilter | Self::MetaFilter => AlgorithmKind::Filter,
            Self::AttributeSearch => AlgorithmKind::AttributeSearch,
            Self::AttributeEvaluator => AlgorithmKind::AttributeEvaluator,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseClassifier => "base_classifier",
            Self::MetaClassifier => "meta_classifier",
            Self::EnsembleClassifier => "ensemble_classifier",
            Self::BaseFilter => "base_filter",
            Self::MetaFilter => "meta_filter",
            Self::AttributeSearch => "attribute_search",
            Self::AttributeEvaluator => "attribute_evaluator",
        }
    }
}

impl fmt::Display for AlgorithmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown category '{}', expected one of: {}",
                    s,
                    Self::ALL
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// The interface an implementation is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    Classifier,
    Filter,
    AttributeSearch,
    AttributeEvaluator,
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Classifier => "classifier",
            Self::Filter => "filter",
            Self::AttributeSearch => "attribute search",
            Self::AttributeEvaluator => "attribute evaluator",
        };
        f.write_str(name)
    }
}

/// An admissible algorithm as handed to the search-space builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmDescriptor {
    pub identifier: String,
    pub category: AlgorithmCategory,
    /// The catalog descriptor file the identifier was read from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params_path: Option<PathBuf>,
}

impl AlgorithmDescriptor {
    pub fn new(identifier: impl Into<String>, category: AlgorithmCategory) -> Self {
        Self {
            identifier: identifier.into(),
            category,
            params_path: None,
        }
    }

    pub fn with_params_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.params_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for category in AlgorithmCategory::ALL {
            assert!(seen.insert(category.partition()));
        }
    }

    #[test]
    fn test_category_kinds() {
        assert_eq!(
            AlgorithmCategory::EnsembleClassifier.kind(),
            AlgorithmKind::Classifier
        );
        assert_eq!(AlgorithmCategory::MetaFilter.kind(), AlgorithmKind::Filter);
        assert_eq!(
            AlgorithmCategory::AttributeSearch.kind(),
            AlgorithmKind::AttributeSearch
        );
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "meta-classifier".parse::<AlgorithmCategory>().unwrap(),
            AlgorithmCategory::MetaClassifier
        );
        assert_eq!(
            "Attribute_Evaluator".parse::<AlgorithmCategory>().unwrap(),
            AlgorithmCategory::AttributeEvaluator
        );
        assert!("bogus".parse::<AlgorithmCategory>().is_err());
    }

    #[test]
    fn test_descriptor_serializes_without_path() {
        let d = AlgorithmDescriptor::new("weka.classifiers.trees.J48", AlgorithmCategory::BaseClassifier);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["category"], "base_classifier");
        assert!(json.get("params_path").is_none());
    }
}
